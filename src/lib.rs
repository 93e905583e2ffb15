// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Expression front end for OData style query options.
//!
//! [`Lexer`] turns `$filter`, `$orderby` and key-predicate text into classified
//! [`Token`]s. The [`query`] module holds the node variants a parser assembles
//! from those tokens together with the typing helpers a query planner needs.
//! [`literal`] converts literal tokens into typed values and [`metadata`]
//! models the resource types and resource sets nodes refer to.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "arc")]
pub(crate) use alloc::sync::Arc as Rc;

#[cfg(not(feature = "arc"))]
pub(crate) use alloc::rc::Rc;

mod error;
mod lexer;
pub mod literal;
pub mod metadata;
pub mod query;
mod source;
mod token;

pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Tokens};
pub use literal::{parse_literal, ConstantValue};
pub use metadata::{
    Metadata, MetadataError, PrimitiveType, ResourceProperty, ResourceSet, ResourceType,
    ResourceTypeKind,
};
pub use query::{
    as_entity_collection_node, binary_operator_result_type, BinaryOperatorKind, ConstantNode,
    EntityCollectionNode, ParameterNode, QueryNode, QueryNodeKind, ResourceSetNode,
};
pub use source::Source;
pub use token::{keywords, Token, TokenKind};

#[cfg(test)]
mod tests;
