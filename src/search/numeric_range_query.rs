//! Numeric range query over trie-encoded numeric fields
//!
//! # Example
//!
//! ```rust
//! use flexquery::search::NumericRangeQuery;
//!
//! let query =
//!     NumericRangeQuery::new_int_range("year", 4, Some(2020), Some(2024), true, false).unwrap();
//! assert_eq!(query.to_string(), "year:[2020 TO 2024}");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric_utils::{split_range, NumericPrimitive, SubRange};
use crate::config::NumericType;
use crate::error::{QueryNodeError, Result};

/// Range over one numeric kind
///
/// `None` bounds are open. Inclusivity flags are kept exactly as given.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NumericRange<T> {
    pub field: String,
    pub precision_step: u32,
    pub min: Option<T>,
    pub max: Option<T>,
    pub min_inclusive: bool,
    pub max_inclusive: bool,
}

impl<T: NumericPrimitive> NumericRange<T> {
    pub fn new(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<T>,
        max: Option<T>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        if precision_step < 1 {
            return Err(QueryNodeError::InvalidPrecisionStep(precision_step));
        }
        Ok(Self {
            field: field.into(),
            precision_step,
            min,
            max,
            min_inclusive,
            max_inclusive,
        })
    }

    /// Inclusive bounds of the matched interval in sortable space
    ///
    /// Exclusive bounds are narrowed by one unit of the encoding. Returns
    /// `None` when the range matches nothing.
    pub fn sortable_bounds(&self) -> Option<(u64, u64)> {
        let lower = match self.min {
            Some(min) if self.min_inclusive => min.to_sortable(),
            Some(min) => min.to_sortable().checked_add(1)?,
            None => T::lowest().to_sortable(),
        };
        let upper = match self.max {
            Some(max) if self.max_inclusive => max.to_sortable(),
            Some(max) => max.to_sortable().checked_sub(1)?,
            None => T::highest().to_sortable(),
        };
        if lower > upper || upper > T::max_sortable() {
            return None;
        }
        Some((lower, upper))
    }

    /// Smallest and largest matched values, `None` when the range is empty
    pub fn inclusive_bounds(&self) -> Option<(T, T)> {
        self.sortable_bounds()
            .map(|(lower, upper)| (T::from_sortable(lower), T::from_sortable(upper)))
    }

    pub fn contains(&self, value: T) -> bool {
        match self.sortable_bounds() {
            Some((lower, upper)) => (lower..=upper).contains(&value.to_sortable()),
            None => false,
        }
    }

    /// Trie decomposition of the matched interval
    pub fn sub_ranges(&self) -> Vec<SubRange> {
        match self.sortable_bounds() {
            Some((lower, upper)) => split_range(T::BITS, self.precision_step, lower, upper),
            None => Vec::new(),
        }
    }

    fn fmt_with_field(&self, f: &mut fmt::Formatter<'_>, show_field: bool) -> fmt::Result {
        if show_field {
            write!(f, "{}:", self.field)?;
        }
        f.write_str(if self.min_inclusive { "[" } else { "{" })?;
        match &self.min {
            Some(min) => write!(f, "{}", min)?,
            None => f.write_str("*")?,
        }
        f.write_str(" TO ")?;
        match &self.max {
            Some(max) => write!(f, "{}", max)?,
            None => f.write_str("*")?,
        }
        f.write_str(if self.max_inclusive { "]" } else { "}" })
    }
}

/// Range query over one of the four supported numeric kinds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NumericRangeQuery {
    Long(NumericRange<i64>),
    Int(NumericRange<i32>),
    Float(NumericRange<f32>),
    Double(NumericRange<f64>),
}

impl NumericRangeQuery {
    pub fn new_long_range(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<i64>,
        max: Option<i64>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        NumericRange::new(field, precision_step, min, max, min_inclusive, max_inclusive)
            .map(NumericRangeQuery::Long)
    }

    pub fn new_int_range(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<i32>,
        max: Option<i32>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        NumericRange::new(field, precision_step, min, max, min_inclusive, max_inclusive)
            .map(NumericRangeQuery::Int)
    }

    pub fn new_float_range(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<f32>,
        max: Option<f32>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        NumericRange::new(field, precision_step, min, max, min_inclusive, max_inclusive)
            .map(NumericRangeQuery::Float)
    }

    pub fn new_double_range(
        field: impl Into<String>,
        precision_step: u32,
        min: Option<f64>,
        max: Option<f64>,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> Result<Self> {
        NumericRange::new(field, precision_step, min, max, min_inclusive, max_inclusive)
            .map(NumericRangeQuery::Double)
    }

    pub fn field(&self) -> &str {
        match self {
            NumericRangeQuery::Long(range) => &range.field,
            NumericRangeQuery::Int(range) => &range.field,
            NumericRangeQuery::Float(range) => &range.field,
            NumericRangeQuery::Double(range) => &range.field,
        }
    }

    pub fn numeric_type(&self) -> NumericType {
        match self {
            NumericRangeQuery::Long(_) => i64::numeric_type(),
            NumericRangeQuery::Int(_) => i32::numeric_type(),
            NumericRangeQuery::Float(_) => f32::numeric_type(),
            NumericRangeQuery::Double(_) => f64::numeric_type(),
        }
    }

    pub fn precision_step(&self) -> u32 {
        match self {
            NumericRangeQuery::Long(range) => range.precision_step,
            NumericRangeQuery::Int(range) => range.precision_step,
            NumericRangeQuery::Float(range) => range.precision_step,
            NumericRangeQuery::Double(range) => range.precision_step,
        }
    }

    /// Inclusivity flags of the lower and upper bound
    pub fn inclusive_flags(&self) -> (bool, bool) {
        match self {
            NumericRangeQuery::Long(r) => (r.min_inclusive, r.max_inclusive),
            NumericRangeQuery::Int(r) => (r.min_inclusive, r.max_inclusive),
            NumericRangeQuery::Float(r) => (r.min_inclusive, r.max_inclusive),
            NumericRangeQuery::Double(r) => (r.min_inclusive, r.max_inclusive),
        }
    }

    pub fn sub_ranges(&self) -> Vec<SubRange> {
        match self {
            NumericRangeQuery::Long(range) => range.sub_ranges(),
            NumericRangeQuery::Int(range) => range.sub_ranges(),
            NumericRangeQuery::Float(range) => range.sub_ranges(),
            NumericRangeQuery::Double(range) => range.sub_ranges(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NumericRangeQuery::Long(range) => range.sortable_bounds().is_none(),
            NumericRangeQuery::Int(range) => range.sortable_bounds().is_none(),
            NumericRangeQuery::Float(range) => range.sortable_bounds().is_none(),
            NumericRangeQuery::Double(range) => range.sortable_bounds().is_none(),
        }
    }

    pub(crate) fn fmt_with_field(
        &self,
        f: &mut fmt::Formatter<'_>,
        show_field: bool,
    ) -> fmt::Result {
        match self {
            NumericRangeQuery::Long(range) => range.fmt_with_field(f, show_field),
            NumericRangeQuery::Int(range) => range.fmt_with_field(f, show_field),
            NumericRangeQuery::Float(range) => range.fmt_with_field(f, show_field),
            NumericRangeQuery::Double(range) => range.fmt_with_field(f, show_field),
        }
    }
}

impl fmt::Display for NumericRangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_field(f, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_range(
        min: i32,
        max: i32,
        min_inclusive: bool,
        max_inclusive: bool,
    ) -> NumericRange<i32> {
        NumericRange::new("n", 4, Some(min), Some(max), min_inclusive, max_inclusive).unwrap()
    }

    #[test]
    fn test_inclusive_int_range() {
        let range = int_range(1, 10, true, true);
        assert_eq!(range.inclusive_bounds(), Some((1, 10)));
        assert!(range.contains(1));
        assert!(range.contains(10));
        assert!(!range.contains(0));
        assert!(!range.contains(11));
    }

    #[test]
    fn test_exclusive_flags_narrow_by_one() {
        assert_eq!(int_range(1, 10, false, true).inclusive_bounds(), Some((2, 10)));
        assert_eq!(int_range(1, 10, true, false).inclusive_bounds(), Some((1, 9)));
        assert_eq!(int_range(1, 10, false, false).inclusive_bounds(), Some((2, 9)));
    }

    #[test]
    fn test_empty_ranges() {
        assert_eq!(int_range(5, 5, false, true).inclusive_bounds(), None);
        assert_eq!(int_range(10, 1, true, true).inclusive_bounds(), None);
        assert!(int_range(10, 1, true, true).sub_ranges().is_empty());

        let above_max =
            NumericRange::new("n", 4, Some(i64::MAX), None, false, true).unwrap();
        assert_eq!(above_max.sortable_bounds(), None);
    }

    #[test]
    fn test_open_bounds() {
        let range = NumericRange::<i64>::new("n", 8, None, Some(0), true, true).unwrap();
        assert_eq!(range.inclusive_bounds(), Some((i64::MIN, 0)));
        assert!(range.contains(i64::MIN));
        assert!(!range.contains(1));
    }

    #[test]
    fn test_double_range_contains() {
        let range = NumericRange::new("price", 4, Some(0.5f64), Some(2.5), true, false).unwrap();
        assert!(range.contains(0.5));
        assert!(range.contains(2.4999));
        assert!(!range.contains(2.5));
        assert!(!range.contains(-1.0));
        assert!(!range.contains(f64::NAN));
    }

    #[test]
    fn test_invalid_precision_step() {
        let err =
            NumericRangeQuery::new_long_range("n", 0, Some(1), Some(2), true, true).unwrap_err();
        assert_eq!(err, QueryNodeError::InvalidPrecisionStep(0));
    }

    #[test]
    fn test_display() {
        let query =
            NumericRangeQuery::new_double_range("price", 4, None, Some(9.5), false, true).unwrap();
        assert_eq!(query.to_string(), "price:{* TO 9.5]");
        assert_eq!(query.numeric_type(), NumericType::Double);
        assert_eq!(query.inclusive_flags(), (false, true));
    }
}
