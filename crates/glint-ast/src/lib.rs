//! glint abstract syntax tree.
//!
//! The tree-shaped program representation shared by the parser, the
//! optimizer, and the GLSL emitter. Every node owns its children
//! exclusively; optimization passes rewrite the tree by consuming a subtree
//! and installing its replacement in the parent slot.

mod display;
mod expr;
mod shader;
mod stmt;

pub use expr::{BinOp, Expr, render_f32};
pub use shader::{Program, ShaderDecl, Stage, VarDecl};
pub use stmt::Stmt;
