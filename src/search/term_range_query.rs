//! Term range query - lexicographic range over the terms of a field

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query matching terms between two text bounds
///
/// `None` bounds are open.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermRangeQuery {
    pub field: String,
    pub lower: Option<String>,
    pub upper: Option<String>,
    pub include_lower: bool,
    pub include_upper: bool,
}

impl TermRangeQuery {
    pub fn new(
        field: impl Into<String>,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    ) -> Self {
        Self {
            field: field.into(),
            lower,
            upper,
            include_lower,
            include_upper,
        }
    }

    /// Whether `term` lies inside the range, comparing by byte order
    pub fn contains(&self, term: &str) -> bool {
        let above_lower = match &self.lower {
            Some(lower) if self.include_lower => term >= lower.as_str(),
            Some(lower) => term > lower.as_str(),
            None => true,
        };
        let below_upper = match &self.upper {
            Some(upper) if self.include_upper => term <= upper.as_str(),
            Some(upper) => term < upper.as_str(),
            None => true,
        };
        above_lower && below_upper
    }

    pub(crate) fn fmt_with_default(
        &self,
        f: &mut fmt::Formatter<'_>,
        default_field: &str,
    ) -> fmt::Result {
        if self.field != default_field {
            write!(f, "{}:", self.field)?;
        }
        write!(
            f,
            "{}{} TO {}{}",
            if self.include_lower { '[' } else { '{' },
            self.lower.as_deref().unwrap_or("*"),
            self.upper.as_deref().unwrap_or("*"),
            if self.include_upper { ']' } else { '}' },
        )
    }
}

impl fmt::Display for TermRangeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_default(f, "")
    }
}
