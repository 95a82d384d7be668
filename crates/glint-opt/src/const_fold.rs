//! Constant folding pass.
//!
//! Evaluates binary operators whose operands are both literals, replacing
//! the operation with a literal carrying the canonically rendered binary32
//! result. Traversal is post-order: children fold first, so newly literal
//! subtrees become foldable at their parent within a single run.

use glint_ast::{BinOp, Expr, Program, Stmt};

use crate::{LITERAL_TOLERANCE, Pass, PassStats};

/// Folds literal-operand arithmetic at compile time.
#[derive(Debug)]
pub struct ConstantFolding;

impl Pass for ConstantFolding {
    fn name(&self) -> &str {
        "const-fold"
    }

    fn run(&self, program: &mut Program, stats: &mut PassStats) -> bool {
        let mut changed = false;
        for shader in &mut program.shaders {
            let statements = std::mem::take(&mut shader.statements);
            shader.statements = statements
                .into_iter()
                .map(|stmt| {
                    let Stmt::Assign { target, value } = stmt;
                    let value = fold_expr(value, stats, &mut changed);
                    Stmt::Assign { target, value }
                })
                .collect();
        }
        changed
    }
}

/// Post-order fold. Consumes the subtree and returns its replacement.
fn fold_expr(expr: Expr, stats: &mut PassStats, changed: &mut bool) -> Expr {
    match expr {
        Expr::Binary { op, left, right } => {
            let left = fold_expr(*left, stats, changed);
            let right = fold_expr(*right, stats, changed);
            if let (Some(l), Some(r)) = (left.literal_value(), right.literal_value())
                && let Some(result) = fold_binary(op, l, r)
            {
                stats.constants_folded += 1;
                *changed = true;
                return Expr::literal(result);
            }
            Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        Expr::Call {
            function,
            arguments,
        } => Expr::Call {
            function,
            arguments: arguments
                .into_iter()
                .map(|arg| fold_expr(arg, stats, changed))
                .collect(),
        },
        Expr::Member { object, member } => Expr::Member {
            object: Box::new(fold_expr(*object, stats, changed)),
            member,
        },
        other @ (Expr::Literal(_) | Expr::Identifier(_)) => other,
    }
}

/// Evaluates `l op r` in binary32. Division refuses divisors whose
/// magnitude is below the fold tolerance.
fn fold_binary(op: BinOp, l: f32, r: f32) -> Option<f32> {
    match op {
        BinOp::Add => Some(l + r),
        BinOp::Sub => Some(l - r),
        BinOp::Mul => Some(l * r),
        BinOp::Div if r.abs() >= LITERAL_TOLERANCE => Some(l / r),
        BinOp::Div => None,
    }
}
