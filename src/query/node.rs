// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::error::ParseError;
use crate::literal::{parse_literal, ConstantValue};
use crate::metadata::{ResourceSet, ResourceType};
use crate::token::Token;
use crate::Rc;

use alloc::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum QueryNodeKind {
    Constant,
    Parameter,
    ResourceSet,
}

impl QueryNodeKind {
    /// Whether nodes of this kind stand for a collection rather than a single value.
    pub fn is_collection(self) -> bool {
        matches!(self, QueryNodeKind::ResourceSet)
    }
}

/// A constant value, typically converted from a literal token.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantNode {
    pub value: ConstantValue,
}

impl ConstantNode {
    pub fn new(value: ConstantValue) -> Self {
        Self { value }
    }

    pub fn from_token(token: &Token<'_>) -> Result<Self, ParseError> {
        Ok(Self::new(parse_literal(token)?))
    }

    /// Non-nullable primitive type of the value. The null literal has none.
    pub fn result_type(&self) -> Option<ResourceType> {
        self.value.primitive_type().map(ResourceType::primitive)
    }
}

/// A parameter of the expression, e.g. the implicit `$it` a filter applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterNode {
    pub parameter_type: Rc<ResourceType>,
}

impl ParameterNode {
    pub fn new(parameter_type: impl Into<Rc<ResourceType>>) -> Self {
        Self {
            parameter_type: parameter_type.into(),
        }
    }

    pub fn result_type(&self) -> &ResourceType {
        &self.parameter_type
    }
}

/// The root of a query: every entity of a resource set.
///
/// The resource set belongs to the service metadata; the node only refers to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSetNode {
    pub resource_set: Rc<ResourceSet>,
}

impl ResourceSetNode {
    pub fn new(resource_set: impl Into<Rc<ResourceSet>>) -> Self {
        Self {
            resource_set: resource_set.into(),
        }
    }

    pub fn item_type(&self) -> &ResourceType {
        &self.resource_set.resource_type
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Constant(ConstantNode),
    Parameter(ParameterNode),
    ResourceSet(ResourceSetNode),
}

impl QueryNode {
    pub fn kind(&self) -> QueryNodeKind {
        match self {
            QueryNode::Constant(_) => QueryNodeKind::Constant,
            QueryNode::Parameter(_) => QueryNodeKind::Parameter,
            QueryNode::ResourceSet(_) => QueryNodeKind::ResourceSet,
        }
    }

    /// Type of a single-valued node. `None` for collections and for the null
    /// constant.
    pub fn result_type(&self) -> Option<Cow<'_, ResourceType>> {
        match self {
            QueryNode::Constant(c) => c.result_type().map(Cow::Owned),
            QueryNode::Parameter(p) => Some(Cow::Borrowed(p.result_type())),
            QueryNode::ResourceSet(_) => None,
        }
    }

    /// Type of one item of a collection node. `None` for single values.
    pub fn item_type(&self) -> Option<&ResourceType> {
        match self {
            QueryNode::ResourceSet(r) => Some(r.item_type()),
            QueryNode::Constant(_) | QueryNode::Parameter(_) => None,
        }
    }

    pub fn as_entity_collection(&self) -> Option<EntityCollectionNode<'_>> {
        super::as_entity_collection_node(self)
    }
}

impl From<ConstantNode> for QueryNode {
    fn from(node: ConstantNode) -> Self {
        QueryNode::Constant(node)
    }
}

impl From<ParameterNode> for QueryNode {
    fn from(node: ParameterNode) -> Self {
        QueryNode::Parameter(node)
    }
}

impl From<ResourceSetNode> for QueryNode {
    fn from(node: ResourceSetNode) -> Self {
        QueryNode::ResourceSet(node)
    }
}

/// A collection node whose items are entities.
#[derive(Debug, Clone, Copy)]
pub struct EntityCollectionNode<'n> {
    pub(super) node: &'n QueryNode,
    pub(super) item_type: &'n ResourceType,
}

impl<'n> EntityCollectionNode<'n> {
    pub fn node(&self) -> &'n QueryNode {
        self.node
    }

    pub fn item_type(&self) -> &'n ResourceType {
        self.item_type
    }
}
