use super::{ProcessContext, QueryNodeProcessor};
use crate::error::Result;
use crate::nodes::{NodeKind, QueryTree};

/// Lowercases wildcard patterns and term range bounds
///
/// These terms bypass analysis, so they are lowercased here to match
/// lowercased index terms. Disabled by `lowercase_expanded_terms`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LowercaseExpandedTermsProcessor;

impl QueryNodeProcessor for LowercaseExpandedTermsProcessor {
    fn name(&self) -> &'static str {
        "lowercase_expanded_terms"
    }

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        if !ctx.config.lowercase_expanded_terms {
            return Ok(());
        }
        let Some(root) = tree.root() else {
            return Ok(());
        };

        for id in tree.post_order(root) {
            let expanded = match tree.kind(id) {
                NodeKind::Wildcard { .. } => true,
                NodeKind::Field { .. } => tree.is_range_bound(id),
                _ => false,
            };
            if !expanded {
                continue;
            }
            if let NodeKind::Wildcard { text } | NodeKind::Field { text } = tree.kind_mut(id) {
                *text = text.to_lowercase();
            }
        }
        Ok(())
    }
}
