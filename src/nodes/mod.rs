//! Query node tree model
//!
//! A parsed query is an arena of [`Node`]s addressed by [`NodeId`]. Each
//! node carries a [`NodeKind`] payload, a [`FieldName`] and the [`Span`] it
//! came from. Trees can be deep-cloned, compared structurally and rendered
//! back to query syntax.

mod escape;
mod kind;
mod render;
mod tree;

pub use escape::{EscapeQuerySyntax, StandardEscaper};
pub use kind::{
    Conjunction, Modifier, NodeKind, NodeType, NumericBound, NumericValue, RangeFlags,
};
pub use render::NodeView;
pub use tree::{FieldName, Node, NodeId, QueryTree, Span};
