//! Boolean query - combines clauses with must, should and must-not semantics

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Query;

/// How a clause takes part in a boolean query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occur {
    /// Clause must match
    Must,
    /// At least one should clause matches when there is no must clause
    #[default]
    Should,
    /// Clause must not match
    MustNot,
}

impl Occur {
    pub fn as_prefix(self) -> &'static str {
        match self {
            Occur::Must => "+",
            Occur::Should => "",
            Occur::MustNot => "-",
        }
    }
}

/// A sub-query with its occurrence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BooleanClause {
    pub query: Query,
    pub occur: Occur,
}

impl BooleanClause {
    pub fn new(query: Query, occur: Occur) -> Self {
        Self { query, occur }
    }
}

/// Boolean query combining multiple clauses
///
/// # Example
///
/// ```rust
/// use flexquery::search::{BooleanQuery, Occur, Query, TermQuery};
///
/// let query = BooleanQuery::new()
///     .with_clause(Query::Term(TermQuery::new("body", "rust")), Occur::Must)
///     .with_clause(Query::Term(TermQuery::new("body", "draft")), Occur::MustNot);
/// assert_eq!(Query::Boolean(query).to_string_with_default("body"), "+rust -draft");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanQuery {
    pub clauses: Vec<BooleanClause>,
}

impl BooleanQuery {
    /// Create a new empty boolean query
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, query: Query, occur: Occur) {
        self.clauses.push(BooleanClause::new(query, occur));
    }

    pub fn with_clause(mut self, query: Query, occur: Occur) -> Self {
        self.add(query, occur);
        self
    }

    pub fn clauses(&self) -> &[BooleanClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Clauses with the given occurrence
    pub fn clauses_with(&self, occur: Occur) -> impl Iterator<Item = &Query> {
        self.clauses
            .iter()
            .filter(move |clause| clause.occur == occur)
            .map(|clause| &clause.query)
    }

    pub(crate) fn fmt_with_default(
        &self,
        f: &mut fmt::Formatter<'_>,
        default_field: &str,
    ) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(clause.occur.as_prefix())?;
            match &clause.query {
                Query::Boolean(inner) => {
                    f.write_str("(")?;
                    inner.fmt_with_default(f, default_field)?;
                    f.write_str(")")?;
                }
                query => query.fmt_with_default(f, default_field)?,
            }
        }
        Ok(())
    }
}
