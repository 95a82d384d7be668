//! Algebraic simplification pass.
//!
//! Pattern-matches binary subtrees against a table of identities (`x * 1`,
//! `x + 0`, ...) and constant-combining shapes (`(x * c1) * c2`), replacing
//! the matched node with a smaller subtree. Children are simplified before
//! their parents, and the matched subtree's operands move into the
//! replacement rather than being cloned.

use glint_ast::{BinOp, Expr, Program, Stmt};

use crate::{LITERAL_TOLERANCE, Pass, PassStats};

/// Applies algebraic identities and combines constants in associative
/// chains.
#[derive(Debug)]
pub struct AlgebraicSimplification;

impl Pass for AlgebraicSimplification {
    fn name(&self) -> &str {
        "algebraic"
    }

    fn run(&self, program: &mut Program, stats: &mut PassStats) -> bool {
        let mut changed = false;
        for shader in &mut program.shaders {
            let statements = std::mem::take(&mut shader.statements);
            shader.statements = statements
                .into_iter()
                .map(|stmt| {
                    let Stmt::Assign { target, value } = stmt;
                    let value = simplify_expr(value, stats, &mut changed);
                    Stmt::Assign { target, value }
                })
                .collect();
        }
        changed
    }
}

/// Post-order simplification. Consumes the subtree and returns its
/// replacement.
fn simplify_expr(expr: Expr, stats: &mut PassStats, changed: &mut bool) -> Expr {
    match expr {
        Expr::Binary { op, left, right } => {
            let left = simplify_expr(*left, stats, changed);
            let right = simplify_expr(*right, stats, changed);
            simplify_binary(op, left, right, stats, changed)
        }
        Expr::Call {
            function,
            arguments,
        } => Expr::Call {
            function,
            arguments: arguments
                .into_iter()
                .map(|arg| simplify_expr(arg, stats, changed))
                .collect(),
        },
        Expr::Member { object, member } => Expr::Member {
            object: Box::new(simplify_expr(*object, stats, changed)),
            member,
        },
        other @ (Expr::Literal(_) | Expr::Identifier(_)) => other,
    }
}

/// Applies one rewrite from the table, or rebuilds the node unchanged.
fn simplify_binary(
    op: BinOp,
    left: Expr,
    right: Expr,
    stats: &mut PassStats,
    changed: &mut bool,
) -> Expr {
    let (left, right) = match combine_constants(op, left, right, stats, changed) {
        Ok(combined) => return combined,
        Err(operands) => operands,
    };

    match op {
        BinOp::Mul => {
            if is_literal_value(&right, 1.0) {
                note(stats, changed);
                return left;
            }
            if is_literal_value(&left, 1.0) {
                note(stats, changed);
                return right;
            }
            if is_literal_value(&right, 0.0) || is_literal_value(&left, 0.0) {
                note(stats, changed);
                return Expr::Literal("0.0".to_owned());
            }
        }
        BinOp::Add => {
            if is_literal_value(&right, 0.0) {
                note(stats, changed);
                return left;
            }
            if is_literal_value(&left, 0.0) {
                note(stats, changed);
                return right;
            }
        }
        BinOp::Sub => {
            if is_literal_value(&right, 0.0) {
                note(stats, changed);
                return left;
            }
        }
        BinOp::Div => {
            if is_literal_value(&right, 1.0) {
                note(stats, changed);
                return left;
            }
        }
    }

    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// `(x op c1) op c2` and `c1 op (x op c2)` for `op` in `{+, *}` become
/// `x op (c1 op c2)` with the constant pre-evaluated, so a later fold has
/// nothing left to do. Returns the operands untouched if no shape matches.
///
/// Counts as both an algebraic rewrite and a fold.
fn combine_constants(
    op: BinOp,
    left: Expr,
    right: Expr,
    stats: &mut PassStats,
    changed: &mut bool,
) -> Result<Expr, (Expr, Expr)> {
    if !matches!(op, BinOp::Add | BinOp::Mul) {
        return Err((left, right));
    }

    match (left, right) {
        // (x op c1) op c2
        (
            Expr::Binary {
                op: inner,
                left: x,
                right: c1,
            },
            c2,
        ) if inner == op => match (c1.literal_value(), c2.literal_value()) {
            (Some(a), Some(b)) => {
                stats.algebraic_simplifications += 1;
                stats.constants_folded += 1;
                *changed = true;
                Ok(Expr::Binary {
                    op,
                    left: x,
                    right: Box::new(Expr::literal(apply(op, a, b))),
                })
            }
            _ => Err((
                Expr::Binary {
                    op: inner,
                    left: x,
                    right: c1,
                },
                c2,
            )),
        },

        // c1 op (x op c2)
        (
            c1,
            Expr::Binary {
                op: inner,
                left: x,
                right: c2,
            },
        ) if inner == op => match (c1.literal_value(), c2.literal_value()) {
            (Some(a), Some(b)) => {
                stats.algebraic_simplifications += 1;
                stats.constants_folded += 1;
                *changed = true;
                Ok(Expr::Binary {
                    op,
                    left: x,
                    right: Box::new(Expr::literal(apply(op, a, b))),
                })
            }
            _ => Err((
                c1,
                Expr::Binary {
                    op: inner,
                    left: x,
                    right: c2,
                },
            )),
        },

        operands => Err(operands),
    }
}

fn apply(op: BinOp, a: f32, b: f32) -> f32 {
    match op {
        BinOp::Add => a + b,
        BinOp::Mul => a * b,
        // combine_constants only passes Add or Mul.
        BinOp::Sub | BinOp::Div => unreachable!("non-associative operator"),
    }
}

fn is_literal_value(expr: &Expr, value: f32) -> bool {
    expr.literal_value()
        .is_some_and(|v| (v - value).abs() < LITERAL_TOLERANCE)
}

fn note(stats: &mut PassStats, changed: &mut bool) {
    stats.algebraic_simplifications += 1;
    *changed = true;
}
