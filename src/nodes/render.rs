//! Rendering of trees back to query syntax and to diagnostic dumps

use std::fmt;

use super::escape::EscapeQuerySyntax;
use super::kind::{Conjunction, NodeKind};
use super::tree::{FieldName, NodeId, QueryTree};

impl QueryTree {
    /// Render the subtree under `id` as query syntax
    pub fn to_query_string(&self, id: NodeId, escaper: &dyn EscapeQuerySyntax) -> String {
        let node = self.node(id);
        let children = node.children();

        match node.kind() {
            NodeKind::Field { text } => {
                format!("{}{}", field_prefix(node.field()), escaper.escape(text))
            }
            // Wildcard text is already in pattern syntax.
            NodeKind::Wildcard { text } => format!("{}{}", field_prefix(node.field()), text),
            NodeKind::Numeric { bound } => format!("{}{}", field_prefix(node.field()), bound),
            NodeKind::NumericRange { flags, .. } | NodeKind::TermRange { flags } => {
                let (lower, upper) = match self.range_bounds(id) {
                    Some((lower, upper)) => (
                        self.bound_string(lower, escaper),
                        self.bound_string(upper, escaper),
                    ),
                    None => ("*".to_string(), "*".to_string()),
                };
                format!(
                    "{}{}{} TO {}{}",
                    field_prefix(node.field()),
                    flags.open_char(),
                    lower,
                    upper,
                    flags.close_char()
                )
            }
            NodeKind::Boolean { operators } => {
                let mut rendered = String::new();
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        let operator = operators
                            .get(i - 1)
                            .copied()
                            .unwrap_or(Conjunction::Implicit);
                        rendered.push_str(operator.as_query_str());
                    }
                    rendered.push_str(&self.to_query_string(child, escaper));
                }
                rendered
            }
            NodeKind::And => self.join_children(id, Conjunction::And, escaper),
            NodeKind::Or => self.join_children(id, Conjunction::Or, escaper),
            NodeKind::Modifier(modifier) => format!(
                "{}{}",
                modifier.as_prefix(),
                self.first_child_string(children, escaper)
            ),
            NodeKind::Group => format!("({})", self.first_child_string(children, escaper)),
            NodeKind::Boost(boost) => {
                format!("{}^{}", self.first_child_string(children, escaper), boost)
            }
            NodeKind::MatchNone => String::new(),
        }
    }

    /// Render the whole tree as query syntax
    pub fn to_query_string_root(&self, escaper: &dyn EscapeQuerySyntax) -> String {
        self.root()
            .map(|root| self.to_query_string(root, escaper))
            .unwrap_or_default()
    }

    fn first_child_string(&self, children: &[NodeId], escaper: &dyn EscapeQuerySyntax) -> String {
        children
            .first()
            .map(|&child| self.to_query_string(child, escaper))
            .unwrap_or_default()
    }

    fn bound_string(&self, id: NodeId, escaper: &dyn EscapeQuerySyntax) -> String {
        match self.kind(id) {
            NodeKind::Numeric { bound } => bound.to_string(),
            NodeKind::Field { text } if text.is_empty() => "*".to_string(),
            NodeKind::Field { text } => escaper.escape(text),
            _ => self.to_query_string(id, escaper),
        }
    }

    fn join_children(
        &self,
        id: NodeId,
        operator: Conjunction,
        escaper: &dyn EscapeQuerySyntax,
    ) -> String {
        self.children(id)
            .iter()
            .map(|&child| self.to_query_string(child, escaper))
            .collect::<Vec<_>>()
            .join(operator.as_query_str())
    }

    /// Diagnostic view of a node, rendered through `Display`
    pub fn view(&self, id: NodeId) -> NodeView<'_> {
        NodeView { tree: self, id }
    }
}

fn field_prefix(field: &FieldName) -> String {
    match field {
        FieldName::Default => String::new(),
        FieldName::Named(name) => format!("{}:", name),
    }
}

/// XML-like rendering of a node for debugging and tree dumps
pub struct NodeView<'a> {
    tree: &'a QueryTree,
    id: NodeId,
}

impl NodeView<'_> {
    fn child(&self, id: NodeId) -> NodeView<'_> {
        NodeView {
            tree: self.tree,
            id,
        }
    }

    fn write_children(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &child in self.tree.children(self.id) {
            writeln!(f)?;
            write!(f, "{}", self.child(child))?;
        }
        writeln!(f)
    }
}

impl fmt::Display for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.tree.node(self.id);
        let field = node.field();

        match node.kind() {
            NodeKind::Field { text } => write!(f, "<field field='{}' text='{}'/>", field, text),
            NodeKind::Wildcard { text } => {
                write!(f, "<wildcard field='{}' term='{}'/>", field, text)
            }
            NodeKind::Numeric { bound } => {
                write!(f, "<numeric field='{}' number='{}'/>", field, bound)
            }
            NodeKind::NumericRange { flags, config } => {
                write!(
                    f,
                    "<numericRange lowerInclusive='{}' upperInclusive='{}'",
                    flags.lower_inclusive, flags.upper_inclusive
                )?;
                if let Some(config) = config {
                    write!(
                        f,
                        " type='{}' precisionStep='{}'",
                        config.numeric_type, config.precision_step
                    )?;
                }
                write!(f, ">")?;
                self.write_children(f)?;
                write!(f, "</numericRange>")
            }
            NodeKind::TermRange { flags } => {
                write!(
                    f,
                    "<termRange lowerInclusive='{}' upperInclusive='{}'>",
                    flags.lower_inclusive, flags.upper_inclusive
                )?;
                self.write_children(f)?;
                write!(f, "</termRange>")
            }
            NodeKind::Boolean { operators } => {
                let operators: Vec<&str> = operators
                    .iter()
                    .map(|op| match op {
                        Conjunction::And => "AND",
                        Conjunction::Or => "OR",
                        Conjunction::Implicit => "_",
                    })
                    .collect();
                write!(f, "<boolean operators='{}'>", operators.join(" "))?;
                self.write_children(f)?;
                write!(f, "</boolean>")
            }
            NodeKind::And => {
                write!(f, "<and>")?;
                self.write_children(f)?;
                write!(f, "</and>")
            }
            NodeKind::Or => {
                write!(f, "<or>")?;
                self.write_children(f)?;
                write!(f, "</or>")
            }
            NodeKind::Modifier(modifier) => {
                write!(f, "<modifier operation='{}'>", modifier)?;
                self.write_children(f)?;
                write!(f, "</modifier>")
            }
            NodeKind::Group => {
                write!(f, "<group>")?;
                self.write_children(f)?;
                write!(f, "</group>")
            }
            NodeKind::Boost(boost) => {
                write!(f, "<boost value='{}'>", boost)?;
                self.write_children(f)?;
                write!(f, "</boost>")
            }
            NodeKind::MatchNone => write!(f, "<matchNone field='{}'/>", field),
        }
    }
}

impl fmt::Display for QueryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => write!(f, "{}", self.view(root)),
            None => write!(f, "<empty/>"),
        }
    }
}
