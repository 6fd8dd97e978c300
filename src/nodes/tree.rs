//! Arena-backed query node tree
//!
//! Nodes live in a `Vec` and reference each other by [`NodeId`]. Children
//! are owned through the parent's child list; the parent link is only used
//! for navigation. Every public mutation leaves parent links consistent
//! with child lists.

use std::fmt;

use super::kind::{Conjunction, Modifier, NodeKind, NodeType, NumericBound, RangeFlags};

/// Stable index of a node inside its [`QueryTree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Character offsets of a node in the original query string
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Smallest span containing both spans
    pub fn cover(self, other: Span) -> Span {
        Span {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.begin, self.end)
    }
}

/// Field a node applies to
///
/// `Default` is the sentinel for "the parser's default field".
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FieldName {
    #[default]
    Default,
    Named(String),
}

impl FieldName {
    pub fn named(name: impl Into<String>) -> Self {
        FieldName::Named(name.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, FieldName::Default)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FieldName::Default => None,
            FieldName::Named(name) => Some(name),
        }
    }

    /// Field name with the sentinel replaced by `default_field`
    pub fn resolve<'a>(&'a self, default_field: &'a str) -> &'a str {
        match self {
            FieldName::Default => default_field,
            FieldName::Named(name) => name,
        }
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        if name.is_empty() {
            FieldName::Default
        } else {
            FieldName::Named(name.to_string())
        }
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        if name.is_empty() {
            FieldName::Default
        } else {
            FieldName::Named(name)
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Default => Ok(()),
            FieldName::Named(name) => f.write_str(name),
        }
    }
}

/// A node of the query tree
#[derive(Clone, Debug)]
pub struct Node {
    kind: NodeKind,
    field: FieldName,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn field(&self) -> &FieldName {
        &self.field
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Query node tree produced per parse call
#[derive(Debug, Default)]
pub struct QueryTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl QueryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the root, detaching it from any parent
    pub fn set_root(&mut self, id: NodeId) {
        self.detach(id);
        self.root = Some(id);
    }

    /// Number of arena slots, including nodes no longer reachable
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    pub fn set_field(&mut self, id: NodeId, field: FieldName) {
        self.nodes[id.index()].field = field;
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.index()].span = span;
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Lower and upper bound of a range node, `None` unless it has exactly two children
    pub fn range_bounds(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match self.children(id) {
            [lower, upper] => Some((*lower, *upper)),
            _ => None,
        }
    }

    /// Whether `id` is a bound of a range node
    pub fn is_range_bound(&self, id: NodeId) -> bool {
        self.parent(id).is_some_and(|parent| {
            matches!(
                self.kind(parent),
                NodeKind::TermRange { .. } | NodeKind::NumericRange { .. }
            )
        })
    }

    /// Add a node adopting `children`, which are detached from any
    /// previous parent
    pub fn add(
        &mut self,
        kind: NodeKind,
        field: FieldName,
        span: Span,
        children: Vec<NodeId>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            kind,
            field,
            span,
            parent: None,
            children: Vec::new(),
        });
        self.set_children(id, children);
        id
    }

    /// Replace the child list of `id`
    ///
    /// Previous children become detached; new children are moved out of
    /// their previous parent.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        let old = std::mem::take(&mut self.nodes[id.index()].children);
        for child in old {
            self.nodes[child.index()].parent = None;
        }
        for &child in &children {
            debug_assert_ne!(child, id, "a node cannot be its own child");
            self.detach(child);
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes[id.index()].children = children;
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Remove `id` from its parent's child list
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|&c| c != id);
        }
    }

    /// Put `new` at the position of `old`; `old` ends up detached
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if old == new {
            return;
        }
        self.detach(new);
        if let Some(parent) = self.nodes[old.index()].parent.take() {
            if let Some(slot) = self.nodes[parent.index()]
                .children
                .iter_mut()
                .find(|c| **c == old)
            {
                *slot = new;
            }
            self.nodes[new.index()].parent = Some(parent);
        }
        if self.root == Some(old) {
            self.root = Some(new);
        }
    }

    /// Insert a new single-child node of `kind` above `id`
    pub fn wrap(&mut self, id: NodeId, kind: NodeKind) -> NodeId {
        let span = self.nodes[id.index()].span;
        let wrapper = self.add(kind, FieldName::Default, span, Vec::new());
        self.replace(id, wrapper);
        self.set_children(wrapper, vec![id]);
        wrapper
    }

    pub fn field(
        &mut self,
        field: impl Into<FieldName>,
        text: impl Into<String>,
        span: Span,
    ) -> NodeId {
        let kind = NodeKind::Field { text: text.into() };
        self.add(kind, field.into(), span, Vec::new())
    }

    pub fn wildcard(
        &mut self,
        field: impl Into<FieldName>,
        text: impl Into<String>,
        span: Span,
    ) -> NodeId {
        let kind = NodeKind::Wildcard { text: text.into() };
        self.add(kind, field.into(), span, Vec::new())
    }

    pub fn numeric(
        &mut self,
        field: impl Into<FieldName>,
        bound: NumericBound,
        span: Span,
    ) -> NodeId {
        self.add(NodeKind::Numeric { bound }, field.into(), span, Vec::new())
    }

    /// Numeric range with its two bound children; the config is resolved later
    pub fn numeric_range(
        &mut self,
        field: impl Into<FieldName>,
        lower: NumericBound,
        upper: NumericBound,
        flags: RangeFlags,
        span: Span,
    ) -> NodeId {
        let field = field.into();
        let lower = self.numeric(field.clone(), lower, span);
        let upper = self.numeric(field.clone(), upper, span);
        let kind = NodeKind::NumericRange {
            flags,
            config: None,
        };
        self.add(kind, field, span, vec![lower, upper])
    }

    /// Term range; an empty bound text is an open bound
    pub fn term_range(
        &mut self,
        field: impl Into<FieldName>,
        lower: &str,
        upper: &str,
        flags: RangeFlags,
        span: Span,
    ) -> NodeId {
        let field = field.into();
        let lower = self.field(field.clone(), lower, span);
        let upper = self.field(field.clone(), upper, span);
        self.add(NodeKind::TermRange { flags }, field, span, vec![lower, upper])
    }

    pub fn boolean(&mut self, children: Vec<NodeId>, operators: Vec<Conjunction>) -> NodeId {
        debug_assert_eq!(operators.len() + 1, children.len().max(1));
        let span = self.covering_span(&children);
        self.add(
            NodeKind::Boolean { operators },
            FieldName::Default,
            span,
            children,
        )
    }

    pub fn and(&mut self, children: Vec<NodeId>) -> NodeId {
        let span = self.covering_span(&children);
        self.add(NodeKind::And, FieldName::Default, span, children)
    }

    pub fn or(&mut self, children: Vec<NodeId>) -> NodeId {
        let span = self.covering_span(&children);
        self.add(NodeKind::Or, FieldName::Default, span, children)
    }

    pub fn modifier(&mut self, modifier: Modifier, child: NodeId) -> NodeId {
        let span = self.nodes[child.index()].span;
        self.add(
            NodeKind::Modifier(modifier),
            FieldName::Default,
            span,
            vec![child],
        )
    }

    pub fn group(&mut self, child: NodeId) -> NodeId {
        let span = self.nodes[child.index()].span;
        self.add(NodeKind::Group, FieldName::Default, span, vec![child])
    }

    pub fn boost(&mut self, boost: f32, child: NodeId) -> NodeId {
        let span = self.nodes[child.index()].span;
        self.add(NodeKind::Boost(boost), FieldName::Default, span, vec![child])
    }

    pub fn match_none(&mut self, field: impl Into<FieldName>, span: Span) -> NodeId {
        self.add(NodeKind::MatchNone, field.into(), span, Vec::new())
    }

    fn covering_span(&self, children: &[NodeId]) -> Span {
        children
            .iter()
            .map(|&c| self.nodes[c.index()].span)
            .reduce(Span::cover)
            .unwrap_or_default()
    }

    /// Nodes of the subtree under `id`, children before parents
    pub fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            stack.push((current, true));
            for &child in self.children(current).iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    /// Number of nodes reachable from the root
    pub fn node_count(&self) -> usize {
        self.root.map(|root| self.post_order(root).len()).unwrap_or(0)
    }

    /// Deep copy of the subtree under `id` into a fresh, compact tree
    pub fn clone_subtree(&self, id: NodeId) -> QueryTree {
        let mut clone = QueryTree::new();
        let root = self.copy_into(id, &mut clone);
        clone.root = Some(root);
        clone
    }

    /// Deep copy of the whole tree; nodes not reachable from the root are dropped
    pub fn clone_tree(&self) -> QueryTree {
        match self.root {
            Some(root) => self.clone_subtree(root),
            None => QueryTree::new(),
        }
    }

    fn copy_into(&self, id: NodeId, target: &mut QueryTree) -> NodeId {
        let node = self.node(id);
        let children = node
            .children
            .iter()
            .map(|&child| self.copy_into(child, target))
            .collect();
        target.add(node.kind.clone(), node.field.clone(), node.span, children)
    }

    /// Same kind, payload, field and recursively equal children in order
    ///
    /// Spans are not compared.
    pub fn structurally_eq(&self, a: NodeId, other: &QueryTree, b: NodeId) -> bool {
        let (x, y) = (self.node(a), other.node(b));
        x.kind == y.kind
            && x.field == y.field
            && x.children.len() == y.children.len()
            && x
                .children
                .iter()
                .zip(&y.children)
                .all(|(&ca, &cb)| self.structurally_eq(ca, other, cb))
    }

    /// Check parent links, acyclicity and the child-count rules of each kind
    pub fn is_consistent(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        if self.node(root).parent.is_some() {
            return false;
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if seen[id.index()] {
                return false;
            }
            seen[id.index()] = true;

            let node = self.node(id);
            let arity_ok = match &node.kind {
                NodeKind::Boolean { operators } => {
                    operators.len() + 1 == node.children.len().max(1)
                }
                NodeKind::NumericRange { .. } | NodeKind::TermRange { .. } => {
                    node.children.len() == 2
                }
                NodeKind::Modifier(_) | NodeKind::Group | NodeKind::Boost(_) => {
                    node.children.len() == 1
                }
                NodeKind::Field { .. }
                | NodeKind::Wildcard { .. }
                | NodeKind::Numeric { .. }
                | NodeKind::MatchNone => node.children.is_empty(),
                NodeKind::And | NodeKind::Or => true,
            };
            if !arity_ok {
                return false;
            }

            for &child in &node.children {
                if self.node(child).parent != Some(id) {
                    return false;
                }
                stack.push(child);
            }
        }
        true
    }
}

impl Clone for QueryTree {
    fn clone(&self) -> Self {
        self.clone_tree()
    }
}

impl PartialEq for QueryTree {
    fn eq(&self, other: &Self) -> bool {
        match (self.root, other.root) {
            (Some(a), Some(b)) => self.structurally_eq(a, other, b),
            (None, None) => true,
            _ => false,
        }
    }
}
