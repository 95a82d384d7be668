//! Deterministic GLSL 4.50 text generation.

use std::fmt::Write;

use glint_ast::{Expr, Program, ShaderDecl, Stage, Stmt};

use crate::CodeGenError;

/// Renders the declaration matching `stage` as a GLSL 4.50 compilation
/// unit.
///
/// Input and output locations count from 0 in declaration order, each
/// direction with its own counter. Binary expressions are always
/// parenthesized, so the output never leans on GLSL precedence.
pub fn emit_glsl(program: &Program, stage: Stage) -> Result<String, CodeGenError> {
    let shader = program
        .shader(stage)
        .ok_or(CodeGenError::MissingStage(stage))?;
    Ok(emit_shader(shader))
}

fn emit_shader(shader: &ShaderDecl) -> String {
    let mut out = String::new();
    out.push_str("#version 450\n\n");

    for (location, var) in shader.inputs.iter().enumerate() {
        let _ = writeln!(
            out,
            "layout(location = {location}) in {} {};",
            map_type(&var.ty),
            var.name
        );
    }
    if !shader.inputs.is_empty() {
        out.push('\n');
    }

    for (location, var) in shader.outputs.iter().enumerate() {
        let _ = writeln!(
            out,
            "layout(location = {location}) out {} {};",
            map_type(&var.ty),
            var.name
        );
    }
    if !shader.outputs.is_empty() {
        out.push('\n');
    }

    out.push_str("void main() {\n");
    for stmt in &shader.statements {
        let Stmt::Assign { target, value } = stmt;
        let _ = writeln!(out, "    {} = {};", expr_glsl(target), expr_glsl(value));
    }
    out.push_str("}\n");

    out
}

/// DSL type names coincide with GLSL's; anything unrecognized passes
/// through unchanged.
fn map_type(ty: &str) -> &str {
    ty
}

fn expr_glsl(expr: &Expr) -> String {
    match expr {
        Expr::Literal(lexeme) => lexeme.clone(),
        Expr::Identifier(name) => name.clone(),
        Expr::Binary { op, left, right } => {
            format!("({} {} {})", expr_glsl(left), op, expr_glsl(right))
        }
        Expr::Member { object, member } => format!("{}.{member}", expr_glsl(object)),
        Expr::Call {
            function,
            arguments,
        } => {
            let arguments: Vec<String> = arguments.iter().map(expr_glsl).collect();
            format!("{function}({})", arguments.join(", "))
        }
    }
}
