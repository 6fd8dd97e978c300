use tracing::trace;

use super::{ProcessContext, QueryNodeProcessor};
use crate::config::{NumericConfig, NumericType};
use crate::error::{QueryNodeError, Result};
use crate::nodes::{
    NodeId, NodeKind, NodeType, NumericBound, NumericValue, QueryTree, RangeFlags, Span,
};

/// Turns terms and term ranges on numeric fields into numeric ranges
///
/// `field:5` becomes `field:[5 TO 5]`, term ranges keep their flags, and
/// every numeric range gets the configuration of its field attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericProcessor;

impl QueryNodeProcessor for NumericProcessor {
    fn name(&self) -> &'static str {
        "numeric"
    }

    fn process(&self, tree: &mut QueryTree, ctx: &ProcessContext<'_>) -> Result<()> {
        let Some(root) = tree.root() else {
            return Ok(());
        };

        for id in tree.post_order(root) {
            let field = tree.node(id).field().resolve(ctx.default_field).to_string();
            let config = ctx.config.numeric_config(&field).cloned();

            match (tree.kind(id).clone(), config) {
                (NodeKind::Field { text }, Some(config)) if !tree.is_range_bound(id) => {
                    let value = parse_value(&text, &config, tree.node(id).span())?;
                    let value = NumericBound::Value(value);
                    trace!(field = %field, text = %text, "numeric term becomes a range");
                    convert(tree, id, value, value, RangeFlags::INCLUSIVE, config);
                }
                (NodeKind::TermRange { flags }, Some(config)) => {
                    let span = tree.node(id).span();
                    let Some((lower, upper)) = tree.range_bounds(id) else {
                        return Err(QueryNodeError::UnsupportedNodeType {
                            node_type: NodeType::TermRange,
                            span,
                        });
                    };
                    let lower = parse_bound(tree, lower, &config, span)?;
                    let upper = parse_bound(tree, upper, &config, span)?;
                    trace!(field = %field, "term range becomes a numeric range");
                    convert(tree, id, lower, upper, flags, config);
                }
                (NodeKind::NumericRange { flags, .. }, config) => {
                    tree.set_kind(id, NodeKind::NumericRange { flags, config });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn convert(
    tree: &mut QueryTree,
    id: NodeId,
    lower: NumericBound,
    upper: NumericBound,
    flags: RangeFlags,
    config: NumericConfig,
) {
    let node = tree.node(id);
    let (field, span) = (node.field().clone(), node.span());
    let range = tree.numeric_range(field, lower, upper, flags, span);
    tree.set_kind(
        range,
        NodeKind::NumericRange {
            flags,
            config: Some(config),
        },
    );
    tree.replace(id, range);
}

fn parse_bound(
    tree: &QueryTree,
    id: NodeId,
    config: &NumericConfig,
    span: Span,
) -> Result<NumericBound> {
    match tree.kind(id) {
        NodeKind::Field { text } if text.is_empty() => Ok(NumericBound::Unbounded),
        NodeKind::Field { text } => parse_value(text, config, span).map(NumericBound::Value),
        NodeKind::Numeric { bound } => Ok(*bound),
        _ => Ok(NumericBound::Unbounded),
    }
}

fn parse_value(text: &str, config: &NumericConfig, span: Span) -> Result<NumericValue> {
    // Unsupported types still get a value; the builder reports the type.
    let parse_as = if config.numeric_type.is_supported() {
        config.numeric_type.clone()
    } else {
        NumericType::Double
    };
    NumericValue::parse(text, &parse_as).ok_or_else(|| QueryNodeError::CouldNotParseNumber {
        text: text.to_string(),
        numeric_type: config.numeric_type.clone(),
        span,
    })
}
