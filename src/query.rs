// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Query nodes built by an expression parser and the typing facts a planner
//! derives from them.

mod node;
mod utils;

pub use node::{
    ConstantNode, EntityCollectionNode, ParameterNode, QueryNode, QueryNodeKind, ResourceSetNode,
};
pub use utils::{as_entity_collection_node, binary_operator_result_type, BinaryOperatorKind};
