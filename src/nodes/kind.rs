//! Node kinds and their payloads

use std::fmt;

use crate::config::{NumericConfig, NumericType};

/// Type tag of a node kind, used for builder dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    Field,
    Wildcard,
    Numeric,
    NumericRange,
    TermRange,
    Boolean,
    And,
    Or,
    Modifier,
    Group,
    Boost,
    MatchNone,
}

impl NodeType {
    pub const COUNT: usize = 12;

    pub const ALL: [NodeType; NodeType::COUNT] = [
        NodeType::Field,
        NodeType::Wildcard,
        NodeType::Numeric,
        NodeType::NumericRange,
        NodeType::TermRange,
        NodeType::Boolean,
        NodeType::And,
        NodeType::Or,
        NodeType::Modifier,
        NodeType::Group,
        NodeType::Boost,
        NodeType::MatchNone,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeType::Field => "field",
            NodeType::Wildcard => "wildcard",
            NodeType::Numeric => "numeric",
            NodeType::NumericRange => "numeric_range",
            NodeType::TermRange => "term_range",
            NodeType::Boolean => "boolean",
            NodeType::And => "and",
            NodeType::Or => "or",
            NodeType::Modifier => "modifier",
            NodeType::Group => "group",
            NodeType::Boost => "boost",
            NodeType::MatchNone => "match_none",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator written between two clauses of a boolean sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Conjunction {
    And,
    Or,
    /// Clauses juxtaposed without an operator
    Implicit,
}

impl Conjunction {
    pub fn as_query_str(self) -> &'static str {
        match self {
            Conjunction::And => " AND ",
            Conjunction::Or => " OR ",
            Conjunction::Implicit => " ",
        }
    }
}

/// Per-clause modifier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Modifier {
    #[default]
    None,
    /// `+clause`
    Required,
    /// `-clause` or `NOT clause`
    Prohibited,
}

impl Modifier {
    pub fn as_prefix(self) -> &'static str {
        match self {
            Modifier::None => "",
            Modifier::Required => "+",
            Modifier::Prohibited => "-",
        }
    }

    fn diagnostic_name(self) -> &'static str {
        match self {
            Modifier::None => "MOD_NONE",
            Modifier::Required => "MOD_REQ",
            Modifier::Prohibited => "MOD_NOT",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.diagnostic_name())
    }
}

/// A typed numeric value
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericValue {
    Long(i64),
    Int(i32),
    Float(f32),
    Double(f64),
}

impl NumericValue {
    pub fn numeric_type(&self) -> NumericType {
        match self {
            NumericValue::Long(_) => NumericType::Long,
            NumericValue::Int(_) => NumericType::Int,
            NumericValue::Float(_) => NumericType::Float,
            NumericValue::Double(_) => NumericType::Double,
        }
    }

    /// Parse `text` as a value of `numeric_type`
    ///
    /// Returns `None` when the text is not a valid number of that type or the
    /// type is unsupported.
    pub fn parse(text: &str, numeric_type: &NumericType) -> Option<Self> {
        let text = text.trim();
        match numeric_type {
            NumericType::Long => text.parse().ok().map(NumericValue::Long),
            NumericType::Int => text.parse().ok().map(NumericValue::Int),
            NumericType::Float => text.parse().ok().map(NumericValue::Float),
            NumericType::Double => text.parse().ok().map(NumericValue::Double),
            NumericType::Other(_) => None,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Long(v) => write!(f, "{}", v),
            NumericValue::Int(v) => write!(f, "{}", v),
            NumericValue::Float(v) => write!(f, "{}", v),
            NumericValue::Double(v) => write!(f, "{}", v),
        }
    }
}

/// One end of a numeric range
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumericBound {
    Value(NumericValue),
    Unbounded,
}

impl NumericBound {
    pub fn value(&self) -> Option<NumericValue> {
        match self {
            NumericBound::Value(v) => Some(*v),
            NumericBound::Unbounded => None,
        }
    }
}

impl fmt::Display for NumericBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericBound::Value(v) => v.fmt(f),
            NumericBound::Unbounded => f.write_str("*"),
        }
    }
}

/// Inclusive/exclusive flags of a range, one per bound
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeFlags {
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl RangeFlags {
    pub const INCLUSIVE: RangeFlags = RangeFlags {
        lower_inclusive: true,
        upper_inclusive: true,
    };

    pub const EXCLUSIVE: RangeFlags = RangeFlags {
        lower_inclusive: false,
        upper_inclusive: false,
    };

    pub fn new(lower_inclusive: bool, upper_inclusive: bool) -> Self {
        Self {
            lower_inclusive,
            upper_inclusive,
        }
    }

    pub fn open_char(&self) -> char {
        if self.lower_inclusive {
            '['
        } else {
            '{'
        }
    }

    pub fn close_char(&self) -> char {
        if self.upper_inclusive {
            ']'
        } else {
            '}'
        }
    }
}

/// Kind-specific payload of a node
///
/// Range kinds always have exactly two children: lower bound, then upper
/// bound. Numeric ranges hold numeric children, term ranges hold field
/// children whose empty text means an open bound.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Field { text: String },
    /// Text in wildcard pattern syntax
    Wildcard { text: String },
    Numeric { bound: NumericBound },
    NumericRange {
        flags: RangeFlags,
        config: Option<NumericConfig>,
    },
    TermRange { flags: RangeFlags },
    /// Flat clause sequence; `operators[i]` joins children `i` and `i + 1`
    Boolean { operators: Vec<Conjunction> },
    And,
    Or,
    Modifier(Modifier),
    Group,
    Boost(f32),
    MatchNone,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Field { .. } => NodeType::Field,
            NodeKind::Wildcard { .. } => NodeType::Wildcard,
            NodeKind::Numeric { .. } => NodeType::Numeric,
            NodeKind::NumericRange { .. } => NodeType::NumericRange,
            NodeKind::TermRange { .. } => NodeType::TermRange,
            NodeKind::Boolean { .. } => NodeType::Boolean,
            NodeKind::And => NodeType::And,
            NodeKind::Or => NodeType::Or,
            NodeKind::Modifier(_) => NodeType::Modifier,
            NodeKind::Group => NodeType::Group,
            NodeKind::Boost(_) => NodeType::Boost,
            NodeKind::MatchNone => NodeType::MatchNone,
        }
    }

    /// Text of field-like leaves
    pub fn text(&self) -> Option<&str> {
        match self {
            NodeKind::Field { text } | NodeKind::Wildcard { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_indices_are_dense() {
        for (i, node_type) in NodeType::ALL.iter().enumerate() {
            assert_eq!(node_type.index(), i);
        }
    }

    #[test]
    fn test_numeric_value_parse() {
        assert_eq!(
            NumericValue::parse("42", &NumericType::Int),
            Some(NumericValue::Int(42))
        );
        assert_eq!(
            NumericValue::parse("-7", &NumericType::Long),
            Some(NumericValue::Long(-7))
        );
        assert_eq!(
            NumericValue::parse("2.5", &NumericType::Double),
            Some(NumericValue::Double(2.5))
        );
        assert_eq!(NumericValue::parse("2.5", &NumericType::Int), None);
        assert_eq!(NumericValue::parse("3000000000", &NumericType::Int), None);
        assert_eq!(
            NumericValue::parse("1", &NumericType::Other("date".to_string())),
            None
        );
    }

    #[test]
    fn test_range_flag_chars() {
        let flags = RangeFlags::new(true, false);
        assert_eq!(flags.open_char(), '[');
        assert_eq!(flags.close_char(), '}');
    }

    #[test]
    fn test_numeric_bound_display() {
        assert_eq!(NumericBound::Unbounded.to_string(), "*");
        assert_eq!(NumericBound::Value(NumericValue::Int(3)).to_string(), "3");
    }
}
