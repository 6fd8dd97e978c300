use tracing::trace;

use super::{BuildContext, BuiltQueries, QueryBuilder};
use crate::config::NumericType;
use crate::error::{QueryNodeError, Result};
use crate::nodes::{NodeId, NodeKind, NumericValue};
use crate::search::{NumericRangeQuery, Query};

/// Numeric range bounds yield nothing; the range builder reads them
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericQueryNodeBuilder;

impl QueryBuilder for NumericQueryNodeBuilder {
    fn build(
        &self,
        _ctx: &BuildContext<'_>,
        _id: NodeId,
        _built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        Ok(None)
    }
}

/// Numeric range to [`NumericRangeQuery`]
///
/// The query kind and precision step come from the numeric configuration
/// attached to the node. Inclusivity flags pass through unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NumericRangeQueryNodeBuilder;

impl QueryBuilder for NumericRangeQueryNodeBuilder {
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        id: NodeId,
        _built: &mut BuiltQueries,
    ) -> Result<Option<Query>> {
        let node = ctx.tree.node(id);
        let (NodeKind::NumericRange { flags, config }, Some((lower, upper))) =
            (node.kind(), ctx.tree.range_bounds(id))
        else {
            return Err(QueryNodeError::UnsupportedNodeType {
                node_type: node.node_type(),
                span: node.span(),
            });
        };
        let field = ctx.field_of(id);
        let config = config.as_ref().ok_or_else(|| QueryNodeError::MissingNumericConfig {
            field: field.to_string(),
        })?;

        let bounds = Bounds {
            field,
            expected: &config.numeric_type,
            lower: bound_value(ctx, lower),
            upper: bound_value(ctx, upper),
        };
        let step = config.precision_step;
        let (min_inclusive, max_inclusive) = (flags.lower_inclusive, flags.upper_inclusive);

        trace!(field, numeric_type = %config.numeric_type, step, "building numeric range");
        let query = match &config.numeric_type {
            NumericType::Long => {
                let (min, max) = bounds.typed(|v| match v {
                    NumericValue::Long(v) => Some(v),
                    _ => None,
                })?;
                NumericRangeQuery::new_long_range(
                    field,
                    step,
                    min,
                    max,
                    min_inclusive,
                    max_inclusive,
                )?
            }
            NumericType::Int => {
                let (min, max) = bounds.typed(|v| match v {
                    NumericValue::Int(v) => Some(v),
                    _ => None,
                })?;
                NumericRangeQuery::new_int_range(
                    field,
                    step,
                    min,
                    max,
                    min_inclusive,
                    max_inclusive,
                )?
            }
            NumericType::Float => {
                let (min, max) = bounds.typed(|v| match v {
                    NumericValue::Float(v) => Some(v),
                    _ => None,
                })?;
                NumericRangeQuery::new_float_range(
                    field,
                    step,
                    min,
                    max,
                    min_inclusive,
                    max_inclusive,
                )?
            }
            NumericType::Double => {
                let (min, max) = bounds.typed(|v| match v {
                    NumericValue::Double(v) => Some(v),
                    _ => None,
                })?;
                NumericRangeQuery::new_double_range(
                    field,
                    step,
                    min,
                    max,
                    min_inclusive,
                    max_inclusive,
                )?
            }
            NumericType::Other(_) => {
                return Err(QueryNodeError::UnsupportedNumericType {
                    type_tag: config.numeric_type.clone(),
                })
            }
        };
        Ok(Some(Query::NumericRange(query)))
    }
}

fn bound_value(ctx: &BuildContext<'_>, id: NodeId) -> Option<NumericValue> {
    match ctx.tree.kind(id) {
        NodeKind::Numeric { bound } => bound.value(),
        _ => None,
    }
}

struct Bounds<'a> {
    field: &'a str,
    expected: &'a NumericType,
    lower: Option<NumericValue>,
    upper: Option<NumericValue>,
}

impl Bounds<'_> {
    /// Both bounds as `T`, failing on a value of another kind
    fn typed<T>(
        &self,
        extract: impl Fn(NumericValue) -> Option<T>,
    ) -> Result<(Option<T>, Option<T>)> {
        let convert = |bound: Option<NumericValue>| match bound {
            None => Ok(None),
            Some(value) => {
                extract(value)
                    .map(Some)
                    .ok_or_else(|| QueryNodeError::NumericTypeMismatch {
                        field: self.field.to_string(),
                        expected: self.expected.clone(),
                        actual: value.numeric_type(),
                    })
            }
        };
        Ok((convert(self.lower)?, convert(self.upper)?))
    }
}
