// AST (Abstract Syntax Tree) definitions

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Scalar payload carried by literal, name and operator nodes
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Str(s) => write!(f, "{}", s),
            Scalar::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Node kinds. Closed, so consumers can match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    FunctionDef, // value: name; children: [parameters, suite]
    Parameters,
    Parameter, // value: name; children: [default]?
    Suite,
    If,   // children: [condition, suite, elif*, else?]
    Elif, // children: [condition, suite]
    Else, // children: [suite]
    While,
    For, // children: [target, iterable, suite]
    Return,
    Pass,
    Break,
    Continue,
    Assignment, // value: operator; children: [target, value]
    ExpressionStmt,
    BinaryOp,
    UnaryOp,
    Comparison,
    BooleanOp,
    Call,      // children: [callee, args...]
    Subscript, // children: [object, index]
    Slice,     // children: [lower, upper], `none` for a missing bound
    Attribute, // value: name; children: [object]
    Identifier,
    Number,
    String,
    Boolean,
    None,
    List,
    Dict,
    Set,
    Pair,
    Tuple,
}

impl NodeKind {
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::FunctionDef => "function_def",
            NodeKind::Parameters => "parameters",
            NodeKind::Parameter => "parameter",
            NodeKind::Suite => "suite",
            NodeKind::If => "if",
            NodeKind::Elif => "elif",
            NodeKind::Else => "else",
            NodeKind::While => "while",
            NodeKind::For => "for",
            NodeKind::Return => "return",
            NodeKind::Pass => "pass",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::Assignment => "assignment",
            NodeKind::ExpressionStmt => "expression_stmt",
            NodeKind::BinaryOp => "binary_op",
            NodeKind::UnaryOp => "unary_op",
            NodeKind::Comparison => "comparison",
            NodeKind::BooleanOp => "boolean_op",
            NodeKind::Call => "call",
            NodeKind::Subscript => "subscript",
            NodeKind::Slice => "slice",
            NodeKind::Attribute => "attribute",
            NodeKind::Identifier => "identifier",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Boolean => "boolean",
            NodeKind::None => "none",
            NodeKind::List => "list",
            NodeKind::Dict => "dict",
            NodeKind::Set => "set",
            NodeKind::Pair => "pair",
            NodeKind::Tuple => "tuple",
        }
    }

    /// Kinds that may appear on the left of `=`
    pub fn is_assignable(self) -> bool {
        matches!(
            self,
            NodeKind::Identifier | NodeKind::Attribute | NodeKind::Subscript
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the syntax tree.
///
/// Every node owns its children exclusively. Fields are private: once the
/// parser hands a tree out it is only read through the accessors below.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    value: Option<Scalar>,
    children: Vec<Node>,
    location: SourceLocation,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, location: SourceLocation) -> Self {
        Node {
            kind,
            value: None,
            children: Vec::new(),
            location,
        }
    }

    pub(crate) fn with_value(mut self, value: Scalar) -> Self {
        self.value = Some(value);
        self
    }

    pub(crate) fn with_name(self, name: impl Into<String>) -> Self {
        self.with_value(Scalar::Str(name.into()))
    }

    pub(crate) fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn value(&self) -> Option<&Scalar> {
        self.value.as_ref()
    }

    /// The value as text, for names and operators
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Structural equality: same kinds, values and child order, locations ignored.
    pub fn same_shape(&self, other: &Node) -> bool {
        self.kind == other.kind
            && self.value == other.value
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Depth-first outline, one `(depth, label)` entry per node.
    pub fn outline(&self) -> Vec<(usize, String)> {
        let mut lines = Vec::new();
        self.collect_outline(0, &mut lines);
        lines
    }

    fn collect_outline(&self, depth: usize, lines: &mut Vec<(usize, String)>) {
        lines.push((depth, self.label()));
        for child in &self.children {
            child.collect_outline(depth + 1, lines);
        }
    }

    fn label(&self) -> String {
        match &self.value {
            Some(Scalar::Str(s)) if self.kind == NodeKind::String => {
                format!("{}: {:?}", self.kind, s)
            }
            Some(value) => format!("{}: {}", self.kind, value),
            None => self.kind.to_string(),
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, label) in self.outline() {
            writeln!(f, "{}{}", "  ".repeat(depth), label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, line: usize) -> Node {
        Node::new(NodeKind::Identifier, SourceLocation::new(line, 1)).with_name(name)
    }

    #[test]
    fn test_same_shape_ignores_locations() {
        let a = Node::new(NodeKind::List, SourceLocation::new(1, 1))
            .with_child(ident("x", 1))
            .with_child(ident("y", 1));
        let b = Node::new(NodeKind::List, SourceLocation::new(4, 9))
            .with_child(ident("x", 5))
            .with_child(ident("y", 6));
        assert!(a.same_shape(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_shape_detects_order() {
        let a = Node::new(NodeKind::List, SourceLocation::default())
            .with_children(vec![ident("x", 1), ident("y", 1)]);
        let b = Node::new(NodeKind::List, SourceLocation::default())
            .with_children(vec![ident("y", 1), ident("x", 1)]);
        assert!(!a.same_shape(&b));
    }

    #[test]
    fn test_display_outline() {
        let tree = Node::new(NodeKind::BinaryOp, SourceLocation::default())
            .with_name("+")
            .with_child(ident("a", 1))
            .with_child(
                Node::new(NodeKind::Number, SourceLocation::default()).with_value(Scalar::Int(2)),
            );
        assert_eq!(
            tree.to_string(),
            "binary_op: +\n  identifier: a\n  number: 2\n"
        );
        assert_eq!(tree.count(), 3);
    }
}
