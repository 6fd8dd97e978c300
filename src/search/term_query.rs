//! Term query - exact match on a field

use serde::{Deserialize, Serialize};
use std::fmt;

/// Matches one exact term of a field
///
/// The term is stored as analyzed; no escaping is undone or applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermQuery {
    pub field: String,
    pub term: String,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
        }
    }

    pub fn matches(&self, term: &str) -> bool {
        self.term == term
    }

    pub(crate) fn fmt_with_default(
        &self,
        f: &mut fmt::Formatter<'_>,
        default_field: &str,
    ) -> fmt::Result {
        if self.field != default_field {
            write!(f, "{}:", self.field)?;
        }
        f.write_str(&self.term)
    }
}

impl fmt::Display for TermQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_default(f, "")
    }
}
