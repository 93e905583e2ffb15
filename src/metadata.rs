// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Resource types and resource sets referenced by query nodes.
//!
//! A [`Metadata`] document is usually loaded once per service from JSON:
//!
//! ```json
//! {
//!   "types": [
//!     { "kind": "entity", "name": "Shop.Product", "key": ["ID"],
//!       "properties": [
//!         { "name": "ID", "type": "Edm.Int32" },
//!         { "name": "Price", "type": "Edm.Decimal", "nullable": true },
//!         { "name": "Origin", "type": "Shop.Address" } ] },
//!     { "kind": "complex", "name": "Shop.Address",
//!       "properties": [ { "name": "City", "type": "Edm.String" } ] }
//!   ],
//!   "resourceSets": [ { "name": "Products", "entityType": "Shop.Product" } ]
//! }
//! ```

use crate::Rc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum PrimitiveType {
    Binary,
    Boolean,
    Byte,
    DateTime,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    String,
}

impl PrimitiveType {
    const ALL: [PrimitiveType; 13] = [
        PrimitiveType::Binary,
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::DateTime,
        PrimitiveType::Decimal,
        PrimitiveType::Double,
        PrimitiveType::Guid,
        PrimitiveType::Int16,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::SByte,
        PrimitiveType::Single,
        PrimitiveType::String,
    ];

    /// Qualified `Edm.*` name.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Binary => "Edm.Binary",
            PrimitiveType::Boolean => "Edm.Boolean",
            PrimitiveType::Byte => "Edm.Byte",
            PrimitiveType::DateTime => "Edm.DateTime",
            PrimitiveType::Decimal => "Edm.Decimal",
            PrimitiveType::Double => "Edm.Double",
            PrimitiveType::Guid => "Edm.Guid",
            PrimitiveType::Int16 => "Edm.Int16",
            PrimitiveType::Int32 => "Edm.Int32",
            PrimitiveType::Int64 => "Edm.Int64",
            PrimitiveType::SByte => "Edm.SByte",
            PrimitiveType::Single => "Edm.Single",
            PrimitiveType::String => "Edm.String",
        }
    }

    pub fn from_name(name: &str) -> Option<PrimitiveType> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            PrimitiveType::Byte
                | PrimitiveType::Decimal
                | PrimitiveType::Double
                | PrimitiveType::Int16
                | PrimitiveType::Int32
                | PrimitiveType::Int64
                | PrimitiveType::SByte
                | PrimitiveType::Single
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum ResourceTypeKind {
    Primitive,
    ComplexType,
    EntityType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceProperty {
    pub name: String,
    pub property_type: Rc<ResourceType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceType {
    Primitive {
        primitive: PrimitiveType,
        /// Whether the value may be null, i.e. the type is an optional value
        /// type such as `Edm.Int32?`.
        nullable: bool,
    },
    Complex {
        name: String,
        properties: Vec<ResourceProperty>,
    },
    Entity {
        name: String,
        key: Vec<String>,
        properties: Vec<ResourceProperty>,
    },
}

impl ResourceType {
    pub fn primitive(primitive: PrimitiveType) -> Self {
        ResourceType::Primitive {
            primitive,
            nullable: false,
        }
    }

    pub fn nullable(primitive: PrimitiveType) -> Self {
        ResourceType::Primitive {
            primitive,
            nullable: true,
        }
    }

    pub fn kind(&self) -> ResourceTypeKind {
        match self {
            ResourceType::Primitive { .. } => ResourceTypeKind::Primitive,
            ResourceType::Complex { .. } => ResourceTypeKind::ComplexType,
            ResourceType::Entity { .. } => ResourceTypeKind::EntityType,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResourceType::Primitive { primitive, .. } => primitive.name(),
            ResourceType::Complex { name, .. } | ResourceType::Entity { name, .. } => name,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, ResourceType::Primitive { nullable: true, .. })
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            ResourceType::Primitive { primitive, .. } => Some(*primitive),
            _ => None,
        }
    }

    pub fn properties(&self) -> &[ResourceProperty] {
        match self {
            ResourceType::Primitive { .. } => &[],
            ResourceType::Complex { properties, .. } | ResourceType::Entity { properties, .. } => {
                properties
            }
        }
    }

    pub fn property(&self, name: &str) -> Option<&ResourceProperty> {
        self.properties().iter().find(|p| p.name == name)
    }

    /// Key property names; empty unless this is an entity type.
    pub fn key(&self) -> &[String] {
        match self {
            ResourceType::Entity { key, .. } => key,
            _ => &[],
        }
    }
}

/// A named collection of entities, the root of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSet {
    pub name: String,
    pub resource_type: Rc<ResourceType>,
}

impl ResourceSet {
    pub fn new(name: &str, resource_type: impl Into<Rc<ResourceType>>) -> Self {
        Self {
            name: name.to_string(),
            resource_type: resource_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("invalid metadata document: {0}")]
    InvalidDocument(String),
    #[error("type `{0}` is defined more than once")]
    DuplicateType(String),
    #[error("resource set `{0}` is defined more than once")]
    DuplicateResourceSet(String),
    #[error("type `{name}` referenced by `{referenced_by}` is not defined")]
    UnknownType { name: String, referenced_by: String },
    #[error("type `{0}` contains itself")]
    CyclicType(String),
    #[error("key property `{property}` is not a property of `{type_name}`")]
    UnknownKeyProperty { type_name: String, property: String },
    #[error("resource set `{set}` must be bound to an entity type, `{type_name}` is not one")]
    NotAnEntityType { set: String, type_name: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    types: Vec<TypeDef>,
    #[serde(default)]
    resource_sets: Vec<ResourceSetDef>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
#[serde(rename_all = "camelCase")]
enum TypeDef {
    Complex {
        name: String,
        #[serde(default)]
        properties: Vec<PropertyDef>,
    },
    Entity {
        name: String,
        key: Vec<String>,
        #[serde(default)]
        properties: Vec<PropertyDef>,
    },
}

impl TypeDef {
    fn name(&self) -> &str {
        match self {
            TypeDef::Complex { name, .. } | TypeDef::Entity { name, .. } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PropertyDef {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    nullable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSetDef {
    name: String,
    entity_type: String,
}

/// Resolves structured type definitions by name, each exactly once.
struct Resolver<'d> {
    defs: BTreeMap<&'d str, &'d TypeDef>,
    resolved: BTreeMap<String, Rc<ResourceType>>,
    in_progress: Vec<&'d str>,
}

impl<'d> Resolver<'d> {
    fn resolve(&mut self, name: &'d str) -> Result<Rc<ResourceType>, MetadataError> {
        if let Some(t) = self.resolved.get(name) {
            return Ok(t.clone());
        }
        if self.in_progress.contains(&name) {
            return Err(MetadataError::CyclicType(name.to_string()));
        }

        let def = match self.defs.get(name) {
            Some(def) => *def,
            None => {
                return Err(MetadataError::UnknownType {
                    name: name.to_string(),
                    referenced_by: self.in_progress.last().copied().unwrap_or("").to_string(),
                })
            }
        };

        self.in_progress.push(name);
        let resource_type = match def {
            TypeDef::Complex { properties, .. } => ResourceType::Complex {
                name: name.to_string(),
                properties: self.properties(properties)?,
            },
            TypeDef::Entity {
                key, properties, ..
            } => {
                let properties = self.properties(properties)?;
                if let Some(missing) = key.iter().find(|k| !properties.iter().any(|p| &p.name == *k)) {
                    return Err(MetadataError::UnknownKeyProperty {
                        type_name: name.to_string(),
                        property: missing.clone(),
                    });
                }
                ResourceType::Entity {
                    name: name.to_string(),
                    key: key.clone(),
                    properties,
                }
            }
        };
        self.in_progress.pop();

        let resource_type = Rc::new(resource_type);
        self.resolved.insert(name.to_string(), resource_type.clone());
        Ok(resource_type)
    }

    fn properties(
        &mut self,
        defs: &'d [PropertyDef],
    ) -> Result<Vec<ResourceProperty>, MetadataError> {
        let mut properties = Vec::with_capacity(defs.len());
        for def in defs {
            let property_type = match PrimitiveType::from_name(&def.type_name) {
                Some(primitive) => Rc::new(ResourceType::Primitive {
                    primitive,
                    nullable: def.nullable,
                }),
                None => self.resolve(&def.type_name)?,
            };
            properties.push(ResourceProperty {
                name: def.name.clone(),
                property_type,
            });
        }
        Ok(properties)
    }
}

/// Structured types and resource sets known to a service.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    types: BTreeMap<String, Rc<ResourceType>>,
    resource_sets: BTreeMap<String, Rc<ResourceSet>>,
}

impl Metadata {
    pub fn from_json_str(json: &str) -> Result<Metadata, MetadataError> {
        let document: Document = serde_json::from_str(json)
            .map_err(|e| MetadataError::InvalidDocument(format!("{e}")))?;
        Self::from_document(&document)
    }

    fn from_document(document: &Document) -> Result<Metadata, MetadataError> {
        let mut defs = BTreeMap::new();
        for def in &document.types {
            if defs.insert(def.name(), def).is_some() {
                return Err(MetadataError::DuplicateType(def.name().to_string()));
            }
        }

        let mut resolver = Resolver {
            defs,
            resolved: BTreeMap::new(),
            in_progress: Vec::new(),
        };
        for def in &document.types {
            resolver.resolve(def.name())?;
        }

        let mut resource_sets = BTreeMap::new();
        for set in &document.resource_sets {
            let resource_type = match resolver.resolved.get(&set.entity_type) {
                Some(t) => t.clone(),
                None => {
                    return Err(MetadataError::UnknownType {
                        name: set.entity_type.clone(),
                        referenced_by: set.name.clone(),
                    })
                }
            };
            if resource_type.kind() != ResourceTypeKind::EntityType {
                return Err(MetadataError::NotAnEntityType {
                    set: set.name.clone(),
                    type_name: set.entity_type.clone(),
                });
            }

            let set_ref = Rc::new(ResourceSet::new(&set.name, resource_type));
            if resource_sets.insert(set.name.clone(), set_ref).is_some() {
                return Err(MetadataError::DuplicateResourceSet(set.name.clone()));
            }
        }

        debug!(
            "loaded metadata with {} types and {} resource sets",
            resolver.resolved.len(),
            resource_sets.len()
        );

        Ok(Metadata {
            types: resolver.resolved,
            resource_sets,
        })
    }

    /// Registers an additional resource set.
    pub fn add_resource_set(&mut self, set: ResourceSet) -> Result<Rc<ResourceSet>, MetadataError> {
        if set.resource_type.kind() != ResourceTypeKind::EntityType {
            return Err(MetadataError::NotAnEntityType {
                set: set.name.clone(),
                type_name: set.resource_type.name().to_string(),
            });
        }
        if self.resource_sets.contains_key(&set.name) {
            return Err(MetadataError::DuplicateResourceSet(set.name));
        }

        let set = Rc::new(set);
        self.types
            .entry(set.resource_type.name().to_string())
            .or_insert_with(|| set.resource_type.clone());
        self.resource_sets.insert(set.name.clone(), set.clone());
        Ok(set)
    }

    pub fn resource_type(&self, name: &str) -> Option<&Rc<ResourceType>> {
        self.types.get(name)
    }

    pub fn resource_set(&self, name: &str) -> Option<&Rc<ResourceSet>> {
        self.resource_sets.get(name)
    }

    pub fn resource_sets(&self) -> impl Iterator<Item = &Rc<ResourceSet>> {
        self.resource_sets.values()
    }
}
