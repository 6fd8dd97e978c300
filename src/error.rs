use thiserror::Error;

use crate::config::NumericType;
use crate::nodes::{NodeType, Span};

/// Main error type for query parsing, processing and building
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryNodeError {
    #[error("No builder registered for node type {node_type} at {span}")]
    UnsupportedNodeType { node_type: NodeType, span: Span },

    #[error("Unsupported numeric data type: {type_tag}")]
    UnsupportedNumericType { type_tag: NumericType },

    #[error("No numeric configuration for field '{field}'")]
    MissingNumericConfig { field: String },

    #[error(
        "Numeric value of type {actual} cannot be used for field '{field}' configured as {expected}"
    )]
    NumericTypeMismatch {
        field: String,
        expected: NumericType,
        actual: NumericType,
    },

    #[error("Invalid precision step {0}: must be >= 1")]
    InvalidPrecisionStep(u32),

    #[error("Could not parse '{text}' as {numeric_type} at {span}")]
    CouldNotParseNumber {
        text: String,
        numeric_type: NumericType,
        span: Span,
    },

    #[error("Leading wildcard is not allowed: '{text}' at {span}")]
    LeadingWildcardNotAllowed { text: String, span: Span },

    #[error("Syntax error at position {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for query node operations
pub type Result<T> = std::result::Result<T, QueryNodeError>;

impl QueryNodeError {
    /// Stable message code used by external message formatters
    pub fn code(&self) -> &'static str {
        match self {
            QueryNodeError::UnsupportedNodeType { .. } => "LUCENE_QUERY_CONVERSION_ERROR",
            QueryNodeError::UnsupportedNumericType { .. } => "UNSUPPORTED_NUMERIC_DATA_TYPE",
            QueryNodeError::MissingNumericConfig { .. } => "NUMERIC_CONFIG_MISSING",
            QueryNodeError::NumericTypeMismatch { .. } => {
                "NUMBER_CLASS_NOT_SUPPORTED_BY_NUMERIC_RANGE_QUERY"
            }
            QueryNodeError::InvalidPrecisionStep(_) => "INVALID_PRECISION_STEP",
            QueryNodeError::CouldNotParseNumber { .. } => "COULD_NOT_PARSE_NUMBER",
            QueryNodeError::LeadingWildcardNotAllowed { .. } => "LEADING_WILDCARD_NOT_ALLOWED",
            QueryNodeError::Syntax { .. } => "INVALID_SYNTAX",
            QueryNodeError::Config(_) => "INVALID_CONFIGURATION",
        }
    }

    /// Message arguments, in the order a localized template expects them
    pub fn arguments(&self) -> Vec<String> {
        match self {
            QueryNodeError::UnsupportedNodeType { node_type, span } => {
                vec![node_type.to_string(), span.to_string()]
            }
            QueryNodeError::UnsupportedNumericType { type_tag } => vec![type_tag.to_string()],
            QueryNodeError::MissingNumericConfig { field } => vec![field.clone()],
            QueryNodeError::NumericTypeMismatch {
                field,
                expected,
                actual,
            } => vec![field.clone(), expected.to_string(), actual.to_string()],
            QueryNodeError::InvalidPrecisionStep(step) => vec![step.to_string()],
            QueryNodeError::CouldNotParseNumber {
                text, numeric_type, ..
            } => vec![text.clone(), numeric_type.to_string()],
            QueryNodeError::LeadingWildcardNotAllowed { text, .. } => vec![text.clone()],
            QueryNodeError::Syntax { message, position } => {
                vec![message.clone(), position.to_string()]
            }
            QueryNodeError::Config(message) => vec![message.clone()],
        }
    }

    /// Source span of the offending node, when known
    pub fn span(&self) -> Option<Span> {
        match self {
            QueryNodeError::UnsupportedNodeType { span, .. }
            | QueryNodeError::CouldNotParseNumber { span, .. }
            | QueryNodeError::LeadingWildcardNotAllowed { span, .. } => Some(*span),
            QueryNodeError::Syntax { position, .. } => Some(Span::new(*position, *position)),
            _ => None,
        }
    }

    /// Whether the failure comes from parser configuration rather than query text
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            QueryNodeError::UnsupportedNumericType { .. }
                | QueryNodeError::MissingNumericConfig { .. }
                | QueryNodeError::NumericTypeMismatch { .. }
                | QueryNodeError::InvalidPrecisionStep(_)
                | QueryNodeError::Config(_)
        )
    }
}

impl From<serde_json::Error> for QueryNodeError {
    fn from(err: serde_json::Error) -> Self {
        QueryNodeError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QueryNodeError::MissingNumericConfig {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "No numeric configuration for field 'price'");
        assert_eq!(err.code(), "NUMERIC_CONFIG_MISSING");
        assert_eq!(err.arguments(), vec!["price".to_string()]);
    }

    #[test]
    fn test_unsupported_node_type_carries_span() {
        let err = QueryNodeError::UnsupportedNodeType {
            node_type: NodeType::Wildcard,
            span: Span::new(3, 7),
        };
        assert_eq!(err.span(), Some(Span::new(3, 7)));
        assert_eq!(err.arguments()[0], "wildcard");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_configuration_errors() {
        let err = QueryNodeError::UnsupportedNumericType {
            type_tag: NumericType::Other("date".to_string()),
        };
        assert!(err.is_configuration_error());
        assert_eq!(err.code(), "UNSUPPORTED_NUMERIC_DATA_TYPE");
        assert_eq!(err.arguments(), vec!["date".to_string()]);
    }
}
