//! Dead code elimination pass.
//!
//! Removes top-level assignments whose target name is never read, is not a
//! declared output, and is not a writable built-in. Declared outputs are
//! live by definition. Surviving statements keep their relative order.

use std::collections::HashSet;

use glint_ast::{Expr, Program, ShaderDecl, Stmt};

use crate::{Pass, PassStats};

/// Names the pipeline observes even when no statement reads them.
const BUILTIN_OUTPUTS: [&str; 3] = ["gl_Position", "gl_FragColor", "gl_FragDepth"];

/// Removes assignments to names nothing observes.
#[derive(Debug)]
pub struct DeadCodeElimination;

impl Pass for DeadCodeElimination {
    fn name(&self) -> &str {
        "dce"
    }

    fn run(&self, program: &mut Program, stats: &mut PassStats) -> bool {
        let mut changed = false;
        for shader in &mut program.shaders {
            changed |= run_on_shader(shader, stats);
        }
        changed
    }
}

fn run_on_shader(shader: &mut ShaderDecl, stats: &mut PassStats) -> bool {
    // Read-set: every identifier read on the right-hand side of any
    // statement, including inside call arguments and member objects.
    let mut read: HashSet<&str> = HashSet::new();
    for stmt in &shader.statements {
        let Stmt::Assign { value, .. } = stmt;
        collect_reads(value, &mut read);
    }

    let mut remove = Vec::new();
    for (index, stmt) in shader.statements.iter().enumerate() {
        let Stmt::Assign { target, .. } = stmt;
        let Some(name) = target.base_name() else {
            // The parser rejects non-lvalue targets; reaching this is a bug.
            unreachable!("assignment target is not an lvalue");
        };
        if !read.contains(name) && !shader.is_output(name) && !BUILTIN_OUTPUTS.contains(&name) {
            remove.push(index);
        }
    }

    if remove.is_empty() {
        return false;
    }
    stats.dead_code_removed += remove.len();
    let mut index = 0;
    shader.statements.retain(|_| {
        let dead = remove.contains(&index);
        index += 1;
        !dead
    });
    true
}

fn collect_reads<'a>(expr: &'a Expr, read: &mut HashSet<&'a str>) {
    match expr {
        Expr::Identifier(name) => {
            read.insert(name);
        }
        Expr::Binary { left, right, .. } => {
            collect_reads(left, read);
            collect_reads(right, read);
        }
        Expr::Member { object, .. } => collect_reads(object, read),
        Expr::Call { arguments, .. } => {
            for arg in arguments {
                collect_reads(arg, read);
            }
        }
        Expr::Literal(_) => {}
    }
}
