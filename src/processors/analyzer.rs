use tracing::trace;

use super::{ProcessContext, QueryNodeProcessor};
use crate::error::Result;
use crate::nodes::{NodeKind, QueryTree};

/// Runs the configured analyzer over field terms
///
/// One token replaces the term text, several tokens become a parenthesised
/// OR group of terms on the same field, and no tokens turn the term into a
/// match-none node. Wildcards and range bounds are left alone.
///
/// Quoted phrases are analyzed like any other term text, so a phrase of
/// several words matches any of them. Word order and adjacency are not
/// kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnalyzerProcessor;

impl QueryNodeProcessor for AnalyzerProcessor {
    fn name(&self) -> &'static str {
        "analyzer"
    }

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        let Some(analyzer) = ctx.config.analyzer() else {
            return Ok(());
        };
        let Some(root) = tree.root() else {
            return Ok(());
        };

        for id in tree.post_order(root) {
            let NodeKind::Field { text } = tree.kind(id) else {
                continue;
            };
            if tree.is_range_bound(id) {
                continue;
            }

            let node = tree.node(id);
            let field = node.field().clone();
            let span = node.span();
            let mut tokens = analyzer.analyze(field.resolve(ctx.default_field), text);
            trace!(field = %field, text = %text, tokens = tokens.len(), "analyzed field term");

            match tokens.len() {
                0 => {
                    let none = tree.match_none(field, span);
                    tree.replace(id, none);
                }
                1 => {
                    let text = tokens.remove(0);
                    tree.set_kind(id, NodeKind::Field { text });
                }
                _ => {
                    let terms = tokens
                        .into_iter()
                        .map(|token| tree.field(field.clone(), token, span))
                        .collect();
                    let or = tree.or(terms);
                    let group = tree.group(or);
                    tree.replace(id, group);
                }
            }
        }
        Ok(())
    }
}
