use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::analysis::Analyzer;
use crate::error::{QueryNodeError, Result};

/// Default precision step for numeric fields
pub const PRECISION_STEP_DEFAULT: u32 = 4;

/// Operator applied between clauses that are juxtaposed without AND/OR
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    /// Juxtaposed clauses are all required
    And,
    /// Juxtaposed clauses are optional
    #[default]
    Or,
}

/// Numeric type tag of an indexed numeric field
///
/// `Other` keeps tags this crate cannot build range queries for, so the
/// builder can report them verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NumericType {
    /// 64-bit integer
    Long,
    /// 32-bit integer
    Int,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Any other tag
    Other(String),
}

impl NumericType {
    pub fn as_str(&self) -> &str {
        match self {
            NumericType::Long => "long",
            NumericType::Int => "int",
            NumericType::Float => "float",
            NumericType::Double => "double",
            NumericType::Other(tag) => tag,
        }
    }

    /// Whether numeric range queries can be built for this type
    pub fn is_supported(&self) -> bool {
        !matches!(self, NumericType::Other(_))
    }
}

impl From<String> for NumericType {
    fn from(tag: String) -> Self {
        match tag.to_lowercase().as_str() {
            "long" | "int64" => NumericType::Long,
            "int" | "int32" => NumericType::Int,
            "float" | "float32" => NumericType::Float,
            "double" | "float64" => NumericType::Double,
            _ => NumericType::Other(tag),
        }
    }
}

impl From<&str> for NumericType {
    fn from(tag: &str) -> Self {
        NumericType::from(tag.to_string())
    }
}

impl From<NumericType> for String {
    fn from(numeric_type: NumericType) -> Self {
        numeric_type.as_str().to_string()
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric type and indexing granularity of one field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericConfig {
    pub numeric_type: NumericType,
    #[serde(default = "default_precision_step")]
    pub precision_step: u32,
}

fn default_precision_step() -> u32 {
    PRECISION_STEP_DEFAULT
}

impl NumericConfig {
    /// Create a numeric configuration, rejecting a zero precision step
    pub fn new(numeric_type: NumericType, precision_step: u32) -> Result<Self> {
        if precision_step < 1 {
            return Err(QueryNodeError::InvalidPrecisionStep(precision_step));
        }
        Ok(Self {
            numeric_type,
            precision_step,
        })
    }
}

/// Per-parser configuration store
///
/// Populated while the parser is set up and read-only once parsing starts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfigHandler {
    pub default_operator: DefaultOperator,
    pub allow_leading_wildcard: bool,
    pub lowercase_expanded_terms: bool,
    pub numeric_configs: HashMap<String, NumericConfig>,
    #[serde(skip)]
    pub analyzer: Option<Arc<dyn Analyzer>>,
}

impl Default for QueryConfigHandler {
    fn default() -> Self {
        Self {
            default_operator: DefaultOperator::Or,
            allow_leading_wildcard: false,
            lowercase_expanded_terms: true,
            numeric_configs: HashMap::new(),
            analyzer: None,
        }
    }
}

impl QueryConfigHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON, validating numeric configs
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: QueryConfigHandler = serde_json::from_str(json)?;
        for numeric in config.numeric_configs.values() {
            if numeric.precision_step < 1 {
                return Err(QueryNodeError::InvalidPrecisionStep(numeric.precision_step));
            }
        }
        Ok(config)
    }

    /// Numeric configuration resolved for a field
    pub fn numeric_config(&self, field: &str) -> Option<&NumericConfig> {
        self.numeric_configs.get(field)
    }

    pub fn set_numeric_config(&mut self, field: impl Into<String>, config: NumericConfig) {
        self.numeric_configs.insert(field.into(), config);
    }

    pub fn analyzer(&self) -> Option<&Arc<dyn Analyzer>> {
        self.analyzer.as_ref()
    }

    pub fn with_default_operator(mut self, operator: DefaultOperator) -> Self {
        self.default_operator = operator;
        self
    }

    pub fn with_allow_leading_wildcard(mut self, allow: bool) -> Self {
        self.allow_leading_wildcard = allow;
        self
    }

    pub fn with_lowercase_expanded_terms(mut self, lowercase: bool) -> Self {
        self.lowercase_expanded_terms = lowercase;
        self
    }

    pub fn with_numeric_config(mut self, field: impl Into<String>, config: NumericConfig) -> Self {
        self.set_numeric_config(field, config);
        self
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QueryConfigHandler::default();
        assert_eq!(config.default_operator, DefaultOperator::Or);
        assert!(!config.allow_leading_wildcard);
        assert!(config.lowercase_expanded_terms);
        assert!(config.numeric_config("price").is_none());
    }

    #[test]
    fn test_numeric_config_rejects_zero_step() {
        assert_eq!(
            NumericConfig::new(NumericType::Int, 0),
            Err(QueryNodeError::InvalidPrecisionStep(0))
        );
        assert!(NumericConfig::new(NumericType::Int, 8).is_ok());
    }

    #[test]
    fn test_numeric_type_tags() {
        assert_eq!(NumericType::from("INT"), NumericType::Int);
        assert_eq!(NumericType::from("float64"), NumericType::Double);
        assert_eq!(
            NumericType::from("date"),
            NumericType::Other("date".to_string())
        );
        assert!(!NumericType::from("date").is_supported());
        assert_eq!(NumericType::Long.to_string(), "long");
    }

    #[test]
    fn test_config_from_json() {
        let config = QueryConfigHandler::from_json_str(
            r#"{
                "default_operator": "and",
                "numeric_configs": {
                    "price": { "numeric_type": "double", "precision_step": 8 },
                    "year": { "numeric_type": "int" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.default_operator, DefaultOperator::And);
        assert!(config.lowercase_expanded_terms);
        let price = config.numeric_config("price").unwrap();
        assert_eq!(price.numeric_type, NumericType::Double);
        assert_eq!(price.precision_step, 8);
        let year = config.numeric_config("year").unwrap();
        assert_eq!(year.precision_step, PRECISION_STEP_DEFAULT);
    }

    #[test]
    fn test_config_from_json_rejects_bad_step() {
        let err = QueryConfigHandler::from_json_str(
            r#"{ "numeric_configs": { "n": { "numeric_type": "long", "precision_step": 0 } } }"#,
        )
        .unwrap_err();
        assert_eq!(err, QueryNodeError::InvalidPrecisionStep(0));

        let err = QueryConfigHandler::from_json_str("not json").unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIGURATION");
    }
}
