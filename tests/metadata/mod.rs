// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::Result;
use odata_query::*;
use std::ptr;

pub fn shop() -> Result<Metadata> {
    let json = std::fs::read_to_string("tests/metadata/shop.json")?;
    Ok(Metadata::from_json_str(&json)?)
}

fn load_err(json: &str) -> MetadataError {
    match Metadata::from_json_str(json) {
        Ok(m) => panic!("document loaded: {m:?}"),
        Err(e) => e,
    }
}

#[test]
fn loads_types_and_sets() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let metadata = shop()?;

    let product = metadata
        .resource_type("Shop.Product")
        .ok_or_else(|| anyhow::anyhow!("missing Shop.Product"))?;
    assert_eq!(product.kind(), ResourceTypeKind::EntityType);
    assert_eq!(product.name(), "Shop.Product");
    assert_eq!(product.key(), ["ID".to_string()]);

    let price = product
        .property("Price")
        .ok_or_else(|| anyhow::anyhow!("missing Price"))?;
    assert_eq!(*price.property_type, ResourceType::nullable(PrimitiveType::Decimal));

    let origin = product
        .property("Origin")
        .ok_or_else(|| anyhow::anyhow!("missing Origin"))?;
    assert_eq!(origin.property_type.kind(), ResourceTypeKind::ComplexType);
    let geo = origin
        .property_type
        .property("Geo")
        .ok_or_else(|| anyhow::anyhow!("missing Geo"))?;
    assert_eq!(geo.property_type.name(), "Shop.Point");

    // Types are resolved once and shared.
    let address = metadata
        .resource_type("Shop.Address")
        .ok_or_else(|| anyhow::anyhow!("missing Shop.Address"))?;
    assert!(ptr::eq(&**address, &*origin.property_type));

    let products = metadata
        .resource_set("Products")
        .ok_or_else(|| anyhow::anyhow!("missing Products"))?;
    assert!(ptr::eq(&*products.resource_type, &**product));

    let mut names: Vec<&str> = metadata.resource_sets().map(|s| s.name.as_str()).collect();
    names.sort();
    assert_eq!(names, ["Orders", "Products"]);
    assert!(metadata.resource_set("Customers").is_none());
    Ok(())
}

#[test]
fn primitive_names() {
    assert_eq!(PrimitiveType::from_name("Edm.Int32"), Some(PrimitiveType::Int32));
    assert_eq!(PrimitiveType::from_name("Int32"), None);
    assert_eq!(PrimitiveType::Guid.name(), "Edm.Guid");
    assert!(PrimitiveType::Byte.is_numeric());
    assert!(!PrimitiveType::String.is_numeric());
    assert_eq!(ResourceType::primitive(PrimitiveType::Int16).name(), "Edm.Int16");
}

#[test]
fn invalid_document() {
    assert!(matches!(
        load_err("{ \"types\": 3 }"),
        MetadataError::InvalidDocument(_)
    ));
    assert!(matches!(
        load_err(r#"{ "types": [ { "kind": "enum", "name": "E" } ] }"#),
        MetadataError::InvalidDocument(_)
    ));
}

#[test]
fn duplicate_names() {
    let err = load_err(
        r#"{ "types": [
            { "kind": "complex", "name": "A" },
            { "kind": "complex", "name": "A" } ] }"#,
    );
    assert_eq!(err, MetadataError::DuplicateType("A".to_string()));

    let err = load_err(
        r#"{ "types": [ { "kind": "entity", "name": "E", "key": [] } ],
             "resourceSets": [
               { "name": "S", "entityType": "E" },
               { "name": "S", "entityType": "E" } ] }"#,
    );
    assert_eq!(err, MetadataError::DuplicateResourceSet("S".to_string()));
}

#[test]
fn unknown_types() {
    let err = load_err(
        r#"{ "types": [ { "kind": "complex", "name": "A",
             "properties": [ { "name": "b", "type": "B" } ] } ] }"#,
    );
    assert_eq!(
        err,
        MetadataError::UnknownType {
            name: "B".to_string(),
            referenced_by: "A".to_string()
        }
    );
    assert_eq!(err.to_string(), "type `B` referenced by `A` is not defined");

    let err = load_err(r#"{ "resourceSets": [ { "name": "S", "entityType": "E" } ] }"#);
    assert_eq!(
        err,
        MetadataError::UnknownType {
            name: "E".to_string(),
            referenced_by: "S".to_string()
        }
    );
}

#[test]
fn cyclic_types() {
    let err = load_err(
        r#"{ "types": [
            { "kind": "complex", "name": "A", "properties": [ { "name": "b", "type": "B" } ] },
            { "kind": "complex", "name": "B", "properties": [ { "name": "a", "type": "A" } ] } ] }"#,
    );
    assert_eq!(err, MetadataError::CyclicType("A".to_string()));
}

#[test]
fn key_must_be_a_property() {
    let err = load_err(
        r#"{ "types": [ { "kind": "entity", "name": "E", "key": ["Id"],
             "properties": [ { "name": "Name", "type": "Edm.String" } ] } ] }"#,
    );
    assert_eq!(
        err,
        MetadataError::UnknownKeyProperty {
            type_name: "E".to_string(),
            property: "Id".to_string()
        }
    );
}

#[test]
fn sets_need_entity_types() -> Result<()> {
    let err = load_err(
        r#"{ "types": [ { "kind": "complex", "name": "A" } ],
             "resourceSets": [ { "name": "S", "entityType": "A" } ] }"#,
    );
    assert_eq!(
        err,
        MetadataError::NotAnEntityType {
            set: "S".to_string(),
            type_name: "A".to_string()
        }
    );

    let mut metadata = shop()?;
    let numbers = ResourceSet::new("Numbers", ResourceType::primitive(PrimitiveType::Int32));
    assert!(matches!(
        metadata.add_resource_set(numbers),
        Err(MetadataError::NotAnEntityType { .. })
    ));

    let order = metadata
        .resource_type("Shop.Order")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("missing Shop.Order"))?;
    assert_eq!(
        metadata.add_resource_set(ResourceSet::new("Orders", order.clone())),
        Err(MetadataError::DuplicateResourceSet("Orders".to_string()))
    );

    let archived = metadata.add_resource_set(ResourceSet::new("ArchivedOrders", order))?;
    assert_eq!(archived.name, "ArchivedOrders");
    assert!(metadata.resource_set("ArchivedOrders").is_some());
    Ok(())
}
