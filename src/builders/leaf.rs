use super::{BuildContext, BuiltQueries, QueryBuilder};
use crate::error::{QueryNodeError, Result};
use crate::nodes::{NodeId, NodeKind};
use crate::search::{Query, TermQuery, TermRangeQuery, WildcardQuery};

fn unexpected(ctx: &BuildContext<'_>, id: NodeId) -> QueryNodeError {
    let node = ctx.tree.node(id);
    QueryNodeError::UnsupportedNodeType {
        node_type: node.node_type(),
        span: node.span(),
    }
}

/// Field term to [`TermQuery`]
///
/// Bounds of a term range yield nothing; the range builder reads them.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldQueryNodeBuilder;

impl QueryBuilder for FieldQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        _built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        if ctx.tree.is_range_bound(id) {
            return Ok(None);
        }
        match ctx.tree.kind(id) {
            NodeKind::Field { text } => {
                Ok(Some(Query::Term(TermQuery::new(ctx.field_of(id), text.as_str()))))
            }
            _ => Err(unexpected(ctx, id)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WildcardQueryNodeBuilder;

impl QueryBuilder for WildcardQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        _built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        match ctx.tree.kind(id) {
            NodeKind::Wildcard { text } => Ok(Some(Query::Wildcard(WildcardQuery::new(
                ctx.field_of(id),
                text.as_str(),
            )))),
            _ => Err(unexpected(ctx, id)),
        }
    }
}

/// Term range to [`TermRangeQuery`]; empty bound text is an open bound
#[derive(Clone, Copy, Debug, Default)]
pub struct TermRangeQueryNodeBuilder;

impl QueryBuilder for TermRangeQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        _built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        let (NodeKind::TermRange { flags }, Some((lower, upper))) =
            (ctx.tree.kind(id), ctx.tree.range_bounds(id))
        else {
            return Err(unexpected(ctx, id));
        };
        let bound = |child: NodeId| match ctx.tree.kind(child) {
            NodeKind::Field { text } if !text.is_empty() => Some(text.clone()),
            _ => None,
        };

        Ok(Some(Query::TermRange(TermRangeQuery::new(
            ctx.field_of(id),
            bound(lower),
            bound(upper),
            flags.lower_inclusive,
            flags.upper_inclusive,
        ))))
    }
}

/// Match-none nodes contribute no clause
///
/// A root that yields nothing builds to [`Query::MatchNone`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchNoneQueryNodeBuilder;

impl QueryBuilder for MatchNoneQueryNodeBuilder {
    fn build(
        &self,
        _ctx: &BuildContext<'_>,
        _id: NodeId,
        _built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::QueryTreeBuilder;
    use crate::config::QueryConfigHandler;
    use crate::nodes::{FieldName, QueryTree, RangeFlags, Span};

    fn build(tree: &QueryTree) -> Query {
        QueryTreeBuilder::default()
            .build(tree, &QueryConfigHandler::default(), "body")
            .unwrap()
    }

    #[test]
    fn test_default_field_is_resolved() {
        let mut tree = QueryTree::new();
        let root = tree.field(FieldName::Default, "rust", Span::new(0, 4));
        tree.set_root(root);
        assert_eq!(build(&tree), Query::Term(TermQuery::new("body", "rust")));
    }

    #[test]
    fn test_wildcard() {
        let mut tree = QueryTree::new();
        let root = tree.wildcard("title", "ru?t*", Span::new(0, 11));
        tree.set_root(root);

        let Query::Wildcard(query) = build(&tree) else {
            panic!("expected a wildcard query");
        };
        assert_eq!(query.field, "title");
        assert_eq!(query.extract_prefix().as_deref(), Some("ru"));
        assert!(query.matches("rusty").unwrap());
    }

    #[test]
    fn test_term_range_open_bound() {
        let mut tree = QueryTree::new();
        let root = tree.term_range("name", "", "m", RangeFlags::new(false, true), Span::new(0, 15));
        tree.set_root(root);

        assert_eq!(
            build(&tree),
            Query::TermRange(TermRangeQuery::new("name", None, Some("m".to_string()), false, true))
        );
    }

    #[test]
    fn test_term_range_without_two_bounds_is_an_error() {
        let mut tree = QueryTree::new();
        let root = tree.term_range("name", "a", "m", RangeFlags::INCLUSIVE, Span::new(0, 15));
        let lower = tree.children(root)[0];
        tree.set_children(root, vec![lower]);
        tree.set_root(root);

        let err = QueryTreeBuilder::default()
            .build(&tree, &QueryConfigHandler::default(), "body")
            .unwrap_err();
        assert_eq!(
            err,
            QueryNodeError::UnsupportedNodeType {
                node_type: crate::nodes::NodeType::TermRange,
                span: Span::new(0, 15),
            }
        );
    }
}
