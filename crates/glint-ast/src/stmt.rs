//! Statements of a shader `main` block.

use crate::expr::Expr;

/// A statement. The language has assignments only; control flow does not
/// exist at this level.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `target = value;` where the target is an identifier or a member
    /// access rooted at one. The parser guarantees the lvalue shape.
    Assign { target: Expr, value: Expr },
}

impl Stmt {
    /// Number of nodes in this statement, itself included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Assign { target, value } => 1 + target.node_count() + value.node_count(),
        }
    }
}
