use super::{ProcessContext, QueryNodeProcessor};
use crate::config::DefaultOperator;
use crate::error::Result;
use crate::nodes::{Conjunction, Modifier, NodeId, NodeKind, QueryTree};

/// Gives each clause of a flat boolean sequence an explicit modifier
///
/// The sequence keeps its shape: AND and OR do not bind differently. A
/// clause joined by AND makes its left neighbour required unless that
/// neighbour is prohibited; with default operator AND, a clause joined by
/// OR makes its left neighbour optional. Clauses written with `+`, `-` or
/// `NOT` keep their modifier. Operators are reset to juxtaposition.
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanModifiersProcessor;

impl QueryNodeProcessor for BooleanModifiersProcessor {
    fn name(&self) -> &'static str {
        "boolean_modifiers"
    }

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        let Some(root) = tree.root() else {
            return Ok(());
        };

        for id in tree.post_order(root) {
            if let NodeKind::Boolean { operators } = tree.kind(id) {
                let operators = operators.clone();
                apply_modifiers(tree, id, &operators, ctx.config.default_operator);
            }
        }
        Ok(())
    }
}

fn explicit_modifier(tree: &QueryTree, id: NodeId) -> Option<Modifier> {
    match tree.kind(id) {
        NodeKind::Modifier(modifier) if *modifier != Modifier::None => Some(*modifier),
        _ => None,
    }
}

fn apply_modifiers(
    tree: &mut QueryTree,
    id: NodeId,
    operators: &[Conjunction],
    default_operator: DefaultOperator,
) {
    let clauses = tree.children(id).to_vec();
    let explicit: Vec<Option<Modifier>> = clauses
        .iter()
        .map(|&clause| explicit_modifier(tree, clause))
        .collect();
    let mut modifiers: Vec<Modifier> = explicit
        .iter()
        .map(|m| m.unwrap_or(Modifier::None))
        .collect();

    for i in 0..clauses.len() {
        let conjunction = if i == 0 { None } else { Some(operators[i - 1]) };

        if i > 0 && explicit[i - 1].is_none() {
            match (conjunction, default_operator) {
                (Some(Conjunction::And), _) => modifiers[i - 1] = Modifier::Required,
                (Some(Conjunction::Or), DefaultOperator::And) => modifiers[i - 1] = Modifier::None,
                _ => {}
            }
        }

        if explicit[i].is_none() {
            let required = match default_operator {
                DefaultOperator::Or => conjunction == Some(Conjunction::And),
                DefaultOperator::And => conjunction != Some(Conjunction::Or),
            };
            modifiers[i] = if required {
                Modifier::Required
            } else {
                Modifier::None
            };
        }
    }

    for (i, &clause) in clauses.iter().enumerate() {
        if explicit[i].is_none() && modifiers[i] == Modifier::Required {
            tree.wrap(clause, NodeKind::Modifier(Modifier::Required));
        }
    }
    tree.set_kind(
        id,
        NodeKind::Boolean {
            operators: vec![Conjunction::Implicit; operators.len()],
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfigHandler;
    use crate::nodes::StandardEscaper;
    use crate::syntax::{StandardSyntaxParser, SyntaxParser};

    fn rewrite(query: &str, default_operator: DefaultOperator) -> String {
        let mut tree = StandardSyntaxParser.parse(query).unwrap();
        let config = QueryConfigHandler::default().with_default_operator(default_operator);
        BooleanModifiersProcessor
            .process(&mut tree, &ProcessContext::new(&config, "body"))
            .unwrap();
        assert!(tree.is_consistent());
        tree.to_query_string_root(&StandardEscaper)
    }

    #[test]
    fn test_mixed_operators_flatten_to_required() {
        assert_eq!(rewrite("a AND b OR c AND d", DefaultOperator::Or), "+a +b +c +d");
    }

    #[test]
    fn test_or_default_keeps_juxtaposed_optional() {
        assert_eq!(rewrite("a b c", DefaultOperator::Or), "a b c");
        assert_eq!(rewrite("a OR b", DefaultOperator::Or), "a b");
    }

    #[test]
    fn test_and_default() {
        assert_eq!(rewrite("a b c", DefaultOperator::And), "+a +b +c");
        assert_eq!(rewrite("a OR b c", DefaultOperator::And), "a b +c");
    }

    #[test]
    fn test_explicit_modifiers_win() {
        assert_eq!(rewrite("-a AND b", DefaultOperator::Or), "-a +b");
        assert_eq!(rewrite("+a OR b", DefaultOperator::And), "+a b");
        assert_eq!(rewrite("a AND NOT b", DefaultOperator::Or), "+a -b");
    }

    #[test]
    fn test_nested_groups_are_processed() {
        assert_eq!(
            rewrite("x AND (a AND b)", DefaultOperator::Or),
            "+x +(+a +b)"
        );
    }
}
