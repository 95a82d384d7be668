//! Expressions, the value-producing half of the tree.

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// The operator's source (and GLSL) spelling.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// An expression subtree.
///
/// Literals stay textual: parsing preserves the source spelling, and folding
/// re-renders through [`render_f32`] so equal results get equal lexemes.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A numeric literal in its textual form.
    Literal(String),
    /// A reference to a declared or built-in name.
    Identifier(String),
    /// A binary arithmetic operation.
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Member access, e.g. `position.xyz`. Swizzle letters are carried
    /// opaquely; no validation happens here.
    Member { object: Box<Expr>, member: String },
    /// A function or type-constructor call.
    Call {
        function: String,
        arguments: Vec<Expr>,
    },
}

impl Expr {
    /// Builds a literal from a binary32 value using the canonical renderer.
    pub fn literal(value: f32) -> Self {
        Self::Literal(render_f32(value))
    }

    /// The numeric value of this node, if it is a parsable literal.
    pub fn literal_value(&self) -> Option<f32> {
        match self {
            Self::Literal(lexeme) => lexeme.parse().ok(),
            _ => None,
        }
    }

    /// The identifier an lvalue is rooted at: the identifier itself, or the
    /// identifier under a member-access chain. `None` for anything that is
    /// not syntactically an lvalue.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            Self::Member { object, .. } => object.base_name(),
            _ => None,
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Literal(_) | Self::Identifier(_) => 1,
            Self::Binary { left, right, .. } => 1 + left.node_count() + right.node_count(),
            Self::Member { object, .. } => 1 + object.node_count(),
            Self::Call { arguments, .. } => {
                1 + arguments.iter().map(Expr::node_count).sum::<usize>()
            }
        }
    }
}

/// Canonical textual rendering for folded binary32 results.
///
/// Rust's default float formatting is shortest-round-trip: the same bit
/// pattern always renders to the same bytes, which keeps emission
/// reproducible across runs.
pub fn render_f32(value: f32) -> String {
    format!("{value}")
}
