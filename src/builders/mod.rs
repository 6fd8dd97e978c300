//! Compiles a processed query node tree into a [`Query`]
//!
//! Every node type has one [`QueryBuilder`] in a [`BuilderRegistry`]. The
//! [`QueryTreeBuilder`] walks the tree children first, so a builder always
//! finds the queries of its children in [`BuiltQueries`].

mod boolean;
mod leaf;
mod numeric;

use std::collections::HashMap;
use std::fmt::Debug;
use tracing::{debug, trace};

pub use boolean::{
    BooleanQueryNodeBuilder, BoostQueryNodeBuilder, GroupQueryNodeBuilder, ModifierQueryNodeBuilder,
};
pub use leaf::{
    FieldQueryNodeBuilder, MatchNoneQueryNodeBuilder, TermRangeQueryNodeBuilder,
    WildcardQueryNodeBuilder,
};
pub use numeric::{NumericQueryNodeBuilder, NumericRangeQueryNodeBuilder};

use crate::config::QueryConfigHandler;
use crate::error::{QueryNodeError, Result};
use crate::nodes::{NodeId, NodeType, QueryTree};
use crate::search::{Occur, Query};

/// Read-only inputs of one build
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    pub tree: &'a QueryTree,
    pub config: &'a QueryConfigHandler,
    pub default_field: &'a str,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        tree: &'a QueryTree,
        config: &'a QueryConfigHandler,
        default_field: &'a str,
    ) -> Self {
        Self {
            tree,
            config,
            default_field,
        }
    }

    /// Field of `id`, with the default sentinel resolved
    pub fn field_of(&self, id: NodeId) -> &'a str {
        self.tree.node(id).field().resolve(self.default_field)
    }
}

/// Queries built so far, keyed by the node they were built from
#[derive(Debug, Default)]
pub struct BuiltQueries {
    queries: HashMap<NodeId, Query>,
}

impl BuiltQueries {
    pub fn insert(&mut self, id: NodeId, query: Query) {
        self.queries.insert(id, query);
    }

    pub fn get(&self, id: NodeId) -> Option<&Query> {
        self.queries.get(&id)
    }

    /// Remove and return the query of `id`
    pub fn take(&mut self, id: NodeId) -> Option<Query> {
        self.queries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

/// Builds the query of one node from the queries of its children
///
/// `Ok(None)` means the node contributes nothing; parents skip it.
pub trait QueryBuilder: Send + Sync + Debug {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        built: &mut BuiltQueries,
    ) -> Result<Option<Query>>;
}

/// Table from node type to builder
#[derive(Debug)]
pub struct BuilderRegistry {
    builders: [Option<Box<dyn QueryBuilder>>; NodeType::COUNT],
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl BuilderRegistry {
    /// Registry with no builders
    pub fn empty() -> Self {
        Self {
            builders: std::array::from_fn(|_| None),
        }
    }

    /// Registry with a builder for every node type
    pub fn standard() -> Self {
        Self::empty()
            .with(NodeType::Field, FieldQueryNodeBuilder)
            .with(NodeType::Wildcard, WildcardQueryNodeBuilder)
            .with(NodeType::Numeric, NumericQueryNodeBuilder)
            .with(NodeType::NumericRange, NumericRangeQueryNodeBuilder)
            .with(NodeType::TermRange, TermRangeQueryNodeBuilder)
            .with(NodeType::Boolean, BooleanQueryNodeBuilder::new(Occur::Should))
            .with(NodeType::And, BooleanQueryNodeBuilder::new(Occur::Must))
            .with(NodeType::Or, BooleanQueryNodeBuilder::new(Occur::Should))
            .with(NodeType::Modifier, ModifierQueryNodeBuilder)
            .with(NodeType::Group, GroupQueryNodeBuilder)
            .with(NodeType::Boost, BoostQueryNodeBuilder)
            .with(NodeType::MatchNone, MatchNoneQueryNodeBuilder)
    }

    pub fn set(&mut self, node_type: NodeType, builder: impl QueryBuilder + 'static) {
        self.builders[node_type.index()] = Some(Box::new(builder));
    }

    pub fn with(mut self, node_type: NodeType, builder: impl QueryBuilder + 'static) -> Self {
        self.set(node_type, builder);
        self
    }

    pub fn remove(&mut self, node_type: NodeType) -> Option<Box<dyn QueryBuilder>> {
        self.builders[node_type.index()].take()
    }

    pub fn get(&self, node_type: NodeType) -> Option<&dyn QueryBuilder> {
        self.builders[node_type.index()].as_deref()
    }

    pub fn contains(&self, node_type: NodeType) -> bool {
        self.builders[node_type.index()].is_some()
    }
}

/// Recursive tree-to-query compiler
#[derive(Debug, Default)]
pub struct QueryTreeBuilder {
    registry: BuilderRegistry,
}

impl QueryTreeBuilder {
    pub fn new(registry: BuilderRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BuilderRegistry {
        &mut self.registry
    }

    /// Build the query of the whole tree
    ///
    /// An empty tree, or a root that yields nothing, builds to
    /// [`Query::MatchNone`]. The tree is not modified.
    pub fn build(
        &self,
        tree: &QueryTree,
        config: &QueryConfigHandler,
        default_field: &str,
    ) -> Result<Query> {
        let Some(root) = tree.root() else {
            return Ok(Query::MatchNone);
        };

        let ctx = BuildContext::new(tree, config, default_field);
        let order = tree.post_order(root);
        debug!(nodes = order.len(), default_field, "building query tree");

        let mut built = BuiltQueries::default();
        for id in order {
            let node = tree.node(id);
            let builder = self
                .registry
                .get(node.node_type())
                .ok_or(QueryNodeError::UnsupportedNodeType {
                    node_type: node.node_type(),
                    span: node.span(),
                })?;
            if let Some(query) = builder.build(&ctx, id, &mut built)? {
                trace!(node = %id, query_type = query.query_type(), "built node");
                built.insert(id, query);
            }
        }

        Ok(built.take(root).unwrap_or(Query::MatchNone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Conjunction, Modifier, Span};
    use crate::search::{BooleanQuery, TermQuery};

    fn build(tree: &QueryTree) -> Result<Query> {
        QueryTreeBuilder::default().build(tree, &QueryConfigHandler::default(), "body")
    }

    #[test]
    fn test_standard_registry_covers_every_type() {
        let registry = BuilderRegistry::standard();
        for node_type in NodeType::ALL {
            assert!(registry.contains(node_type), "{node_type}");
        }
        assert!(NodeType::ALL.iter().all(|&t| !BuilderRegistry::empty().contains(t)));
    }

    #[test]
    fn test_missing_builder_fails_and_leaves_tree_unmodified() {
        let mut tree = QueryTree::new();
        let a = tree.field("title", "rust", Span::new(0, 10));
        let b = tree.wildcard("title", "comp*", Span::new(11, 22));
        let root = tree.boolean(vec![a, b], vec![Conjunction::Implicit]);
        tree.set_root(root);
        let before = tree.clone();

        let mut registry = BuilderRegistry::standard();
        registry.remove(NodeType::Wildcard);
        let err = QueryTreeBuilder::new(registry)
            .build(&tree, &QueryConfigHandler::default(), "body")
            .unwrap_err();

        assert_eq!(
            err,
            QueryNodeError::UnsupportedNodeType {
                node_type: NodeType::Wildcard,
                span: Span::new(11, 22),
            }
        );
        assert_eq!(err.code(), "LUCENE_QUERY_CONVERSION_ERROR");
        assert_eq!(tree, before);
    }

    #[test]
    fn test_empty_tree_builds_match_none() {
        assert_eq!(build(&QueryTree::new()).unwrap(), Query::MatchNone);

        let mut tree = QueryTree::new();
        let root = tree.match_none("title", Span::default());
        tree.set_root(root);
        assert_eq!(build(&tree).unwrap(), Query::MatchNone);
    }

    #[test]
    fn test_modifiers_map_to_occur() {
        let mut tree = QueryTree::new();
        let a = tree.field("title", "rust", Span::default());
        let a = tree.modifier(Modifier::Required, a);
        let b = tree.field(crate::nodes::FieldName::Default, "go", Span::default());
        let b = tree.modifier(Modifier::Prohibited, b);
        let c = tree.field("title", "zig", Span::default());
        let root = tree.boolean(vec![a, b, c], vec![Conjunction::Implicit; 2]);
        tree.set_root(root);

        let expected = BooleanQuery::new()
            .with_clause(Query::Term(TermQuery::new("title", "rust")), Occur::Must)
            .with_clause(Query::Term(TermQuery::new("body", "go")), Occur::MustNot)
            .with_clause(Query::Term(TermQuery::new("title", "zig")), Occur::Should);
        assert_eq!(build(&tree).unwrap(), Query::Boolean(expected));
    }

    #[test]
    fn test_custom_builder_replaces_standard_one() {
        #[derive(Debug)]
        struct Upper;

        impl QueryBuilder for Upper {
            fn build(
                &self,
                ctx: &BuildContext<'_>,
                id: NodeId,
                _built: &mut BuiltQueries,
            ) -> Result<Option<Query>> {
                let text = ctx.tree.kind(id).text().unwrap_or_default().to_uppercase();
                Ok(Some(Query::Term(TermQuery::new(ctx.field_of(id), text))))
            }
        }

        let mut tree = QueryTree::new();
        let root = tree.field("title", "rust", Span::default());
        tree.set_root(root);

        let registry = BuilderRegistry::standard().with(NodeType::Field, Upper);
        let builder = QueryTreeBuilder::new(registry);
        let query = builder.build(&tree, &QueryConfigHandler::default(), "body").unwrap();
        assert_eq!(query, Query::Term(TermQuery::new("title", "RUST")));
    }
}
