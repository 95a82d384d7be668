//! Programs, shader declarations, and stage tags.

use std::str::FromStr;

use crate::stmt::Stmt;

/// The pipeline position a shader declaration targets.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    /// The file extension `glslangValidator` uses to infer the stage.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::Fragment => "frag",
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" => Ok(Self::Vertex),
            "fragment" => Ok(Self::Fragment),
            other => Err(format!(
                "invalid stage '{other}', expected 'vertex' or 'fragment'"
            )),
        }
    }
}

/// An input or output variable declaration.
///
/// The type is kept as its source spelling; the emitter passes unknown
/// names through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub ty: String,
    pub name: String,
}

/// One `shader <stage> { ... }` block.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderDecl {
    pub stage: Stage,
    pub inputs: Vec<VarDecl>,
    pub outputs: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
}

impl ShaderDecl {
    /// An empty declaration for `stage`.
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            inputs: Vec::new(),
            outputs: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// True if `name` is a declared output of this shader.
    pub fn is_output(&self, name: &str) -> bool {
        self.outputs.iter().any(|out| out.name == name)
    }

    /// True if `name` is a declared input or output of this shader.
    pub fn declares(&self, name: &str) -> bool {
        self.inputs.iter().any(|var| var.name == name) || self.is_output(name)
    }
}

/// A parsed source file: at most one shader declaration per stage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub shaders: Vec<ShaderDecl>,
}

impl Program {
    /// The declaration for `stage`, if the source provided one.
    pub fn shader(&self, stage: Stage) -> Option<&ShaderDecl> {
        self.shaders.iter().find(|decl| decl.stage == stage)
    }

    /// Total number of AST nodes, the program node included.
    pub fn node_count(&self) -> usize {
        let mut count = 1;
        for shader in &self.shaders {
            count += 1;
            count += shader.inputs.len() + shader.outputs.len();
            count += shader
                .statements
                .iter()
                .map(Stmt::node_count)
                .sum::<usize>();
        }
        count
    }

    /// Total number of `main` statements across all shaders.
    pub fn statement_count(&self) -> usize {
        self.shaders.iter().map(|decl| decl.statements.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Expr;

    #[test]
    fn stage_from_str() {
        assert_eq!("vertex".parse::<Stage>(), Ok(Stage::Vertex));
        assert_eq!("fragment".parse::<Stage>(), Ok(Stage::Fragment));
        assert!("geometry".parse::<Stage>().is_err());
    }

    #[test]
    fn stage_file_extensions() {
        assert_eq!(Stage::Vertex.file_extension(), "vert");
        assert_eq!(Stage::Fragment.file_extension(), "frag");
    }

    #[test]
    fn program_lookup_by_stage() {
        let mut program = Program::default();
        program.shaders.push(ShaderDecl::new(Stage::Fragment));
        assert!(program.shader(Stage::Fragment).is_some());
        assert!(program.shader(Stage::Vertex).is_none());
    }

    #[test]
    fn declared_name_lookup() {
        let mut shader = ShaderDecl::new(Stage::Vertex);
        shader.inputs.push(VarDecl {
            ty: "vec3".into(),
            name: "position".into(),
        });
        shader.outputs.push(VarDecl {
            ty: "vec3".into(),
            name: "color".into(),
        });
        assert!(shader.declares("position"));
        assert!(shader.is_output("color"));
        assert!(!shader.is_output("position"));
        assert!(!shader.declares("normal"));
    }

    #[test]
    fn counts_cover_every_node() {
        let mut shader = ShaderDecl::new(Stage::Vertex);
        shader.inputs.push(VarDecl {
            ty: "vec3".into(),
            name: "position".into(),
        });
        shader.statements.push(Stmt::Assign {
            target: Expr::Identifier("gl_Position".into()),
            value: Expr::Identifier("position".into()),
        });
        let program = Program {
            shaders: vec![shader],
        };
        // program + shader + input + (assign + target + value)
        assert_eq!(program.node_count(), 6);
        assert_eq!(program.statement_count(), 1);
    }
}
