use super::{BuildContext, BuiltQueries, QueryBuilder};
use crate::error::Result;
use crate::nodes::{Modifier, NodeId, NodeKind};
use crate::search::{BooleanQuery, BoostQuery, Occur, Query};

/// Boolean, AND and OR nodes to [`BooleanQuery`]
///
/// Clauses take `default_occur` unless their node is a required or
/// prohibited modifier. Children that built to nothing are skipped, and a
/// node left with no clauses yields nothing.
#[derive(Clone, Copy, Debug)]
pub struct BooleanQueryNodeBuilder {
    default_occur: Occur,
}

impl BooleanQueryNodeBuilder {
    pub fn new(default_occur: Occur) -> Self {
        Self { default_occur }
    }

    pub fn default_occur(&self) -> Occur {
        self.default_occur
    }
}

impl QueryBuilder for BooleanQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        let mut query = BooleanQuery::new();
        for &child in ctx.tree.children(id) {
            let occur = match ctx.tree.kind(child) {
                NodeKind::Modifier(Modifier::Required) => Occur::Must,
                NodeKind::Modifier(Modifier::Prohibited) => Occur::MustNot,
                _ => self.default_occur,
            };
            if let Some(clause) = built.take(child) {
                query.add(clause, occur);
            }
        }

        if query.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Query::Boolean(query)))
        }
    }
}

fn forward(ctx: &BuildContext<'_>, id: NodeId, built: &mut BuiltQueries) -> Option<Query> {
    ctx.tree
        .children(id)
        .first()
        .and_then(|&child| built.take(child))
}

/// Required and prohibited modifiers
///
/// Directly under a boolean, AND or OR node the child query is forwarded
/// and the enclosing builder picks the occur. Anywhere else, such as at
/// the root or inside a group or boost, the child becomes the single
/// `Must` or `MustNot` clause of its own [`BooleanQuery`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ModifierQueryNodeBuilder;

impl QueryBuilder for ModifierQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        let query = forward(ctx, id, built);
        let in_boolean = ctx.tree.parent(id).is_some_and(|parent| {
            matches!(
                ctx.tree.kind(parent),
                NodeKind::Boolean { .. } | NodeKind::And | NodeKind::Or
            )
        });
        if in_boolean {
            return Ok(query);
        }

        let occur = match ctx.tree.kind(id) {
            NodeKind::Modifier(Modifier::Required) => Occur::Must,
            NodeKind::Modifier(Modifier::Prohibited) => Occur::MustNot,
            _ => return Ok(query),
        };
        Ok(query.map(|query| Query::Boolean(BooleanQuery::new().with_clause(query, occur))))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GroupQueryNodeBuilder;

impl QueryBuilder for GroupQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        Ok(forward(ctx, id, built))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BoostQueryNodeBuilder;

impl QueryBuilder for BoostQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        let boost = match ctx.tree.kind(id) {
            NodeKind::Boost(boost) => *boost,
            _ => 1.0,
        };
        Ok(forward(ctx, id, built).map(|query| Query::Boost(BoostQuery::new(query, boost))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::QueryTreeBuilder;
    use crate::config::QueryConfigHandler;
    use crate::nodes::{Conjunction, QueryTree, Span};
    use crate::search::TermQuery;

    fn term(text: &str) -> Query {
        Query::Term(TermQuery::new("f", text))
    }

    fn build(tree: &QueryTree) -> Query {
        QueryTreeBuilder::default()
            .build(tree, &QueryConfigHandler::default(), "body")
            .unwrap()
    }

    #[test]
    fn test_and_or_groups() {
        let mut tree = QueryTree::new();
        let leaves: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|text| tree.field("f", *text, Span::default()))
            .collect();
        let and = tree.and(vec![leaves[0], leaves[1]]);
        let root = tree.or(vec![and, leaves[2]]);
        tree.set_root(root);

        let inner = BooleanQuery::new()
            .with_clause(term("a"), Occur::Must)
            .with_clause(term("b"), Occur::Must);
        let expected = BooleanQuery::new()
            .with_clause(Query::Boolean(inner), Occur::Should)
            .with_clause(term("c"), Occur::Should);
        assert_eq!(build(&tree), Query::Boolean(expected));
        assert_eq!(build(&tree).to_string_with_default("f"), "(+a +b) c");
    }

    #[test]
    fn test_empty_clauses_are_skipped() {
        let mut tree = QueryTree::new();
        let none = tree.match_none("f", Span::default());
        let none = tree.modifier(Modifier::Required, none);
        let a = tree.field("f", "a", Span::default());
        let root = tree.boolean(vec![none, a], vec![Conjunction::Implicit]);
        tree.set_root(root);

        assert_eq!(
            build(&tree),
            Query::Boolean(BooleanQuery::new().with_clause(term("a"), Occur::Should))
        );
    }

    #[test]
    fn test_group_and_boost() {
        let mut tree = QueryTree::new();
        let a = tree.field("f", "a", Span::default());
        let group = tree.group(a);
        let root = tree.boost(2.5, group);
        tree.set_root(root);

        assert_eq!(build(&tree), Query::Boost(BoostQuery::new(term("a"), 2.5)));
        assert_eq!(build(&tree).to_string(), "f:a^2.5");
    }

    #[test]
    fn test_prohibited_root_keeps_its_occur() {
        let mut tree = QueryTree::new();
        let a = tree.field("f", "a", Span::default());
        let root = tree.modifier(Modifier::Prohibited, a);
        tree.set_root(root);

        assert_eq!(
            build(&tree),
            Query::Boolean(BooleanQuery::new().with_clause(term("a"), Occur::MustNot))
        );
        assert_eq!(build(&tree).to_string_with_default("f"), "-a");
    }

    #[test]
    fn test_modifier_inside_group_keeps_its_occur() {
        let mut tree = QueryTree::new();
        let a = tree.field("f", "a", Span::default());
        let b = tree.field("f", "b", Span::default());
        let b = tree.modifier(Modifier::Prohibited, b);
        let group = tree.group(b);
        let group = tree.modifier(Modifier::Required, group);
        let a = tree.modifier(Modifier::Required, a);
        let root = tree.boolean(vec![a, group], vec![Conjunction::Implicit]);
        tree.set_root(root);

        let prohibited = BooleanQuery::new().with_clause(term("b"), Occur::MustNot);
        let expected = BooleanQuery::new()
            .with_clause(term("a"), Occur::Must)
            .with_clause(Query::Boolean(prohibited), Occur::Must);
        assert_eq!(build(&tree), Query::Boolean(expected));
        assert_eq!(build(&tree).to_string_with_default("f"), "+a +(-b)");
    }

    #[test]
    fn test_boosted_required_clause() {
        let mut tree = QueryTree::new();
        let a = tree.field("f", "a", Span::default());
        let required = tree.modifier(Modifier::Required, a);
        let root = tree.boost(2.0, required);
        tree.set_root(root);

        let required = BooleanQuery::new().with_clause(term("a"), Occur::Must);
        assert_eq!(
            build(&tree),
            Query::Boost(BoostQuery::new(Query::Boolean(required), 2.0))
        );
    }

    #[test]
    fn test_unmodified_root_is_forwarded() {
        let mut tree = QueryTree::new();
        let a = tree.field("f", "a", Span::default());
        let root = tree.modifier(Modifier::None, a);
        tree.set_root(root);
        assert_eq!(build(&tree), term("a"));
    }
}
