//! GLSL 4.50 emission and the SPIR-V translation edge.
//!
//! [`emit_glsl`] renders an optimized program for one stage as GLSL text;
//! [`compile_glsl_to_spirv`] hands that text to `glslangValidator` and
//! loads the resulting SPIR-V word sequence. Emission is pure and testable
//! without the translator installed.

mod spirv;
mod writer;

pub use spirv::{SPIRV_MAGIC, compile_glsl_to_spirv};
pub use writer::emit_glsl;

use glint_ast::Stage;

/// Errors from GLSL emission or SPIR-V translation.
#[derive(Debug, thiserror::Error)]
pub enum CodeGenError {
    /// The program has no declaration for the requested stage.
    #[error("no shader declaration found for stage: {0}")]
    MissingStage(Stage),

    /// The external translator exited with a failure. Carries the full
    /// generated GLSL so the offending line can be found.
    #[error("GLSL translation failed\ncommand: {command}\noutput: {output}\ngenerated GLSL:\n{glsl}")]
    Translator {
        command: String,
        output: String,
        glsl: String,
    },

    /// The translator produced something that is not SPIR-V.
    #[error("invalid SPIR-V output: {0}")]
    InvalidSpirv(String),

    /// Temp-file or subprocess I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
