//! Executable query objects
//!
//! The output of a build. Queries are plain values handed to an execution
//! engine; this module only defines their shape, their query-syntax
//! rendering and a few matching helpers used when inspecting them.

mod boolean_query;
mod numeric_range_query;
pub mod numeric_utils;
mod term_query;
mod term_range_query;
mod wildcard_query;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use boolean_query::{BooleanClause, BooleanQuery, Occur};
pub use numeric_range_query::{NumericRange, NumericRangeQuery};
pub use numeric_utils::{NumericPrimitive, SubRange};
pub use term_query::TermQuery;
pub use term_range_query::TermRangeQuery;
pub use wildcard_query::WildcardQuery;

/// Boost wrapped around a query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoostQuery {
    pub query: Box<Query>,
    pub boost: f32,
}

impl BoostQuery {
    pub fn new(query: Query, boost: f32) -> Self {
        Self {
            query: Box::new(query),
            boost,
        }
    }
}

/// An executable query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    Term(TermQuery),
    Wildcard(WildcardQuery),
    TermRange(TermRangeQuery),
    NumericRange(NumericRangeQuery),
    Boolean(BooleanQuery),
    Boost(BoostQuery),
    /// Matches no documents
    MatchNone,
}

impl Query {
    /// Get the query type name for debugging and logging
    pub fn query_type(&self) -> &'static str {
        match self {
            Query::Term(_) => "term",
            Query::Wildcard(_) => "wildcard",
            Query::TermRange(_) => "term_range",
            Query::NumericRange(_) => "numeric_range",
            Query::Boolean(_) => "boolean",
            Query::Boost(_) => "boost",
            Query::MatchNone => "match_none",
        }
    }

    /// Query syntax rendering that omits `default_field` prefixes
    pub fn to_string_with_default(&self, default_field: &str) -> String {
        QueryDisplay {
            query: self,
            default_field,
        }
        .to_string()
    }

    pub(crate) fn fmt_with_default(
        &self,
        f: &mut fmt::Formatter<'_>,
        default_field: &str,
    ) -> fmt::Result {
        match self {
            Query::Term(query) => query.fmt_with_default(f, default_field),
            Query::Wildcard(query) => query.fmt_with_default(f, default_field),
            Query::TermRange(query) => query.fmt_with_default(f, default_field),
            Query::NumericRange(query) => {
                query.fmt_with_field(f, query.field() != default_field)
            }
            Query::Boolean(query) => query.fmt_with_default(f, default_field),
            Query::Boost(boost) => {
                if let Query::Boolean(_) = *boost.query {
                    f.write_str("(")?;
                    boost.query.fmt_with_default(f, default_field)?;
                    f.write_str(")")?;
                } else {
                    boost.query.fmt_with_default(f, default_field)?;
                }
                write!(f, "^{}", boost.boost)
            }
            Query::MatchNone => f.write_str("MatchNone"),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_default(f, "")
    }
}

struct QueryDisplay<'a> {
    query: &'a Query,
    default_field: &'a str,
}

impl fmt::Display for QueryDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.query.fmt_with_default(f, self.default_field)
    }
}
