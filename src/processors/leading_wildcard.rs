use super::{ProcessContext, QueryNodeProcessor};
use crate::error::{QueryNodeError, Result};
use crate::nodes::{NodeKind, QueryTree};

/// Rejects wildcard patterns starting with `*` or `?` unless
/// `allow_leading_wildcard` is set
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowLeadingWildcardProcessor;

impl QueryNodeProcessor for AllowLeadingWildcardProcessor {
    fn name(&self) -> &'static str {
        "allow_leading_wildcard"
    }

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        if ctx.config.allow_leading_wildcard {
            return Ok(());
        }
        let Some(root) = tree.root() else {
            return Ok(());
        };

        for id in tree.post_order(root) {
            if let NodeKind::Wildcard { text } = tree.kind(id) {
                if text.starts_with(['*', '?']) {
                    return Err(QueryNodeError::LeadingWildcardNotAllowed {
                        text: text.clone(),
                        span: tree.node(id).span(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfigHandler;
    use crate::nodes::{FieldName, Span};

    fn tree_with(pattern: &str) -> QueryTree {
        let mut tree = QueryTree::new();
        let id = tree.wildcard(FieldName::Default, pattern, Span::new(4, 9));
        tree.set_root(id);
        tree
    }

    #[test]
    fn test_leading_wildcard_rejected_by_default() {
        let config = QueryConfigHandler::default();
        let mut tree = tree_with("*ing");
        let err = AllowLeadingWildcardProcessor
            .process(&mut tree, &ProcessContext::new(&config, "body"))
            .unwrap_err();
        assert_eq!(err.code(), "LEADING_WILDCARD_NOT_ALLOWED");
        assert_eq!(err.span(), Some(Span::new(4, 9)));
    }

    #[test]
    fn test_trailing_and_escaped_wildcards_pass() {
        let config = QueryConfigHandler::default();
        for pattern in ["ing*", "\\*ing?"] {
            let mut tree = tree_with(pattern);
            assert!(AllowLeadingWildcardProcessor
                .process(&mut tree, &ProcessContext::new(&config, "body"))
                .is_ok());
        }
    }

    #[test]
    fn test_leading_wildcard_allowed_by_config() {
        let config = QueryConfigHandler::default().with_allow_leading_wildcard(true);
        let mut tree = tree_with("?ing");
        assert!(AllowLeadingWildcardProcessor
            .process(&mut tree, &ProcessContext::new(&config, "body"))
            .is_ok());
    }
}
