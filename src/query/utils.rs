// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::node::{EntityCollectionNode, QueryNode};
use crate::metadata::{PrimitiveType, ResourceType, ResourceTypeKind};
use crate::token::{keywords, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ast", derive(serde::Serialize))]
pub enum BinaryOperatorKind {
    Or,
    And,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperatorKind {
    const ALL: [BinaryOperatorKind; 13] = [
        BinaryOperatorKind::Or,
        BinaryOperatorKind::And,
        BinaryOperatorKind::Equal,
        BinaryOperatorKind::NotEqual,
        BinaryOperatorKind::GreaterThan,
        BinaryOperatorKind::GreaterThanOrEqual,
        BinaryOperatorKind::LessThan,
        BinaryOperatorKind::LessThanOrEqual,
        BinaryOperatorKind::Add,
        BinaryOperatorKind::Subtract,
        BinaryOperatorKind::Multiply,
        BinaryOperatorKind::Divide,
        BinaryOperatorKind::Modulo,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOperatorKind::Or => keywords::OR,
            BinaryOperatorKind::And => keywords::AND,
            BinaryOperatorKind::Equal => keywords::EQUAL,
            BinaryOperatorKind::NotEqual => keywords::NOT_EQUAL,
            BinaryOperatorKind::GreaterThan => keywords::GREATER_THAN,
            BinaryOperatorKind::GreaterThanOrEqual => keywords::GREATER_THAN_OR_EQUAL,
            BinaryOperatorKind::LessThan => keywords::LESS_THAN,
            BinaryOperatorKind::LessThanOrEqual => keywords::LESS_THAN_OR_EQUAL,
            BinaryOperatorKind::Add => keywords::ADD,
            BinaryOperatorKind::Subtract => keywords::SUB,
            BinaryOperatorKind::Multiply => keywords::MUL,
            BinaryOperatorKind::Divide => keywords::DIV,
            BinaryOperatorKind::Modulo => keywords::MOD,
        }
    }

    /// The operator an identifier token spells, if any.
    pub fn from_token(token: &Token<'_>) -> Option<BinaryOperatorKind> {
        if token.kind != TokenKind::Identifier {
            return None;
        }
        Self::ALL.into_iter().find(|op| op.keyword() == token.text)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::Equal
                | BinaryOperatorKind::NotEqual
                | BinaryOperatorKind::GreaterThan
                | BinaryOperatorKind::GreaterThanOrEqual
                | BinaryOperatorKind::LessThan
                | BinaryOperatorKind::LessThanOrEqual
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::Add
                | BinaryOperatorKind::Subtract
                | BinaryOperatorKind::Multiply
                | BinaryOperatorKind::Divide
                | BinaryOperatorKind::Modulo
        )
    }
}

/// Narrows `node` to a collection of entities.
///
/// Returns `None` for single-valued nodes and for collections of primitive or
/// complex values.
pub fn as_entity_collection_node(node: &QueryNode) -> Option<EntityCollectionNode<'_>> {
    if !node.kind().is_collection() {
        return None;
    }

    let item_type = node.item_type()?;
    if item_type.kind() != ResourceTypeKind::EntityType {
        return None;
    }

    Some(EntityCollectionNode { node, item_type })
}

/// Result type of `left op right` where both operands have already been
/// promoted to `operand`.
///
/// Logical and comparison operators yield a boolean that is nullable exactly
/// when the operand is. Arithmetic operators yield the operand type.
pub fn binary_operator_result_type(
    operand: &ResourceType,
    operator: BinaryOperatorKind,
) -> ResourceType {
    match operator {
        BinaryOperatorKind::Or
        | BinaryOperatorKind::And
        | BinaryOperatorKind::Equal
        | BinaryOperatorKind::NotEqual
        | BinaryOperatorKind::GreaterThan
        | BinaryOperatorKind::GreaterThanOrEqual
        | BinaryOperatorKind::LessThan
        | BinaryOperatorKind::LessThanOrEqual => ResourceType::Primitive {
            primitive: PrimitiveType::Boolean,
            nullable: operand.is_nullable(),
        },

        BinaryOperatorKind::Add
        | BinaryOperatorKind::Subtract
        | BinaryOperatorKind::Multiply
        | BinaryOperatorKind::Divide
        | BinaryOperatorKind::Modulo => operand.clone(),
    }
}
