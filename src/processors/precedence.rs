use tracing::trace;

use super::{ProcessContext, QueryNodeProcessor};
use crate::config::DefaultOperator;
use crate::error::Result;
use crate::nodes::{Conjunction, NodeId, NodeKind, QueryTree};

/// Regroups flat boolean sequences so that AND binds tighter than OR
///
/// Clauses are split into maximal runs joined by AND. A run of several
/// clauses becomes an AND group; a run of one clause is kept as is. Several
/// runs become an OR group over the runs, a single run takes the place of
/// the sequence. Juxtaposed clauses count as AND when the default operator
/// is AND, otherwise as OR. Modifier nodes stay on their clause.
///
/// `a AND b OR c AND d` becomes `OR(AND(a, b), AND(c, d))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrecedenceProcessor;

impl QueryNodeProcessor for PrecedenceProcessor {
    fn name(&self) -> &'static str {
        "precedence"
    }

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        let Some(root) = tree.root() else {
            return Ok(());
        };

        // Post-order regroups innermost sequences first.
        for id in tree.post_order(root) {
            if let NodeKind::Boolean { operators } = tree.kind(id) {
                let runs = split_runs(tree.children(id), operators, ctx.config.default_operator);
                regroup(tree, id, runs);
            }
        }
        Ok(())
    }
}

fn binds_as_and(conjunction: Conjunction, default_operator: DefaultOperator) -> bool {
    match conjunction {
        Conjunction::And => true,
        Conjunction::Or => false,
        Conjunction::Implicit => default_operator == DefaultOperator::And,
    }
}

/// Maximal runs of clauses joined by AND, in order
fn split_runs(
    clauses: &[NodeId],
    operators: &[Conjunction],
    default_operator: DefaultOperator,
) -> Vec<Vec<NodeId>> {
    let mut runs: Vec<Vec<NodeId>> = Vec::new();
    for (i, &clause) in clauses.iter().enumerate() {
        let joins_previous = i > 0 && binds_as_and(operators[i - 1], default_operator);
        match runs.last_mut() {
            Some(run) if joins_previous => run.push(clause),
            _ => runs.push(vec![clause]),
        }
    }
    runs
}

fn regroup(tree: &mut QueryTree, id: NodeId, mut runs: Vec<Vec<NodeId>>) {
    trace!(node = %id, runs = runs.len(), "regrouping boolean sequence");

    if runs.len() == 1 {
        let run = runs.remove(0);
        if run.len() == 1 {
            tree.replace(id, run[0]);
        } else {
            tree.set_kind(id, NodeKind::And);
        }
        return;
    }

    let groups = runs
        .into_iter()
        .map(|run| {
            if run.len() == 1 {
                run[0]
            } else {
                tree.and(run)
            }
        })
        .collect();
    tree.set_children(id, groups);
    tree.set_kind(id, NodeKind::Or);
}
