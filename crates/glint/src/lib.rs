//! glint: a shader-DSL to SPIR-V compiler.
//!
//! The pipeline is linear: lex, parse, optimize to a fixed point, emit
//! GLSL 4.50, then hand the text to the external `glslangValidator` for
//! translation to SPIR-V. [`Compiler`] sequences the stages, captures
//! [`CompileStats`], and converts stage failures into the staged
//! [`CompileError`].
//!
//! ```no_run
//! use glint::{Compiler, Stage};
//!
//! let source = "shader vertex {
//!     input vec3 position;
//!     main { gl_Position = vec4(position, 1.0); }
//! }";
//!
//! let mut compiler = Compiler::new();
//! let words = compiler.compile(source, Stage::Vertex)?;
//! assert_eq!(words[0], glint::SPIRV_MAGIC);
//! # Ok::<(), glint::CompileError>(())
//! ```

mod error;
mod stats;

pub use error::CompileError;
pub use stats::CompileStats;

pub use glint_ast::{Program, Stage};
pub use glint_glsl::SPIRV_MAGIC;
pub use glint_opt::PassStats;

use std::path::Path;
use std::time::Instant;

use glint_opt::PassManager;

/// A shader compiler instance.
///
/// Instances are independent: options, statistics, and the generated-GLSL
/// buffer are all per instance, so concurrent compilations need one
/// instance each. A compile call is synchronous and blocks until the
/// translator subprocess returns.
#[derive(Debug)]
pub struct Compiler {
    optimization_enabled: bool,
    verbose: bool,
    stats: CompileStats,
    generated_glsl: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    /// A compiler with optimization on and verbose logging off.
    pub fn new() -> Self {
        Self {
            optimization_enabled: true,
            verbose: false,
            stats: CompileStats::default(),
            generated_glsl: String::new(),
        }
    }

    /// Enables or disables the optimization passes.
    pub fn set_optimization_enabled(&mut self, enabled: bool) {
        self.optimization_enabled = enabled;
    }

    pub fn optimization_enabled(&self) -> bool {
        self.optimization_enabled
    }

    /// With verbose on, per-stage progress is logged at `info` level
    /// instead of `debug`.
    pub fn set_verbose(&mut self, enabled: bool) {
        self.verbose = enabled;
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Statistics of the most recent compile call.
    pub fn stats(&self) -> &CompileStats {
        &self.stats
    }

    /// The GLSL produced by the most recent successful emission.
    pub fn generated_glsl(&self) -> &str {
        &self.generated_glsl
    }

    /// Compiles `source` for `stage` all the way to SPIR-V words.
    ///
    /// The returned sequence is non-empty and starts with [`SPIRV_MAGIC`].
    pub fn compile(&mut self, source: &str, stage: Stage) -> Result<Vec<u32>, CompileError> {
        let total_start = Instant::now();
        let glsl = self.run_to_glsl(source, stage)?;

        let translate_start = Instant::now();
        let words = glint_glsl::compile_glsl_to_spirv(&glsl, stage)?;
        self.stats.codegen_ms += millis_since(translate_start);

        self.stats.spirv_word_count = words.len();
        self.stats.spirv_size_bytes = words.len() * 4;
        self.stats.total_ms = millis_since(total_start);
        self.log(format_args!(
            "code generation complete: {} bytes of SPIR-V ({} words)",
            self.stats.spirv_size_bytes, self.stats.spirv_word_count
        ));

        Ok(words)
    }

    /// Reads UTF-8 source from `path` and compiles it.
    pub fn compile_file(
        &mut self,
        path: impl AsRef<Path>,
        stage: Stage,
    ) -> Result<Vec<u32>, CompileError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        if source.is_empty() {
            return Err(CompileError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("shader file is empty: {}", path.display()),
            )));
        }
        self.log(format_args!(
            "loaded {} ({} bytes)",
            path.display(),
            source.len()
        ));
        self.compile(&source, stage)
    }

    /// Runs the pipeline up to GLSL emission, skipping the translator.
    ///
    /// This is the front end's full observable output; the subprocess edge
    /// adds nothing but the SPIR-V encoding.
    pub fn compile_to_glsl(
        &mut self,
        source: &str,
        stage: Stage,
    ) -> Result<String, CompileError> {
        let total_start = Instant::now();
        let glsl = self.run_to_glsl(source, stage)?;
        self.stats.total_ms = millis_since(total_start);
        Ok(glsl)
    }

    fn run_to_glsl(&mut self, source: &str, stage: Stage) -> Result<String, CompileError> {
        self.stats = CompileStats::default();
        self.generated_glsl.clear();

        let lex_start = Instant::now();
        let tokens = glint_parser::tokenize(source)?;
        self.stats.lexing_ms = millis_since(lex_start);
        self.stats.token_count = tokens.len();
        self.log(format_args!("lexing complete: {} tokens", tokens.len()));

        let parse_start = Instant::now();
        let mut program = glint_parser::Parser::new(tokens).parse()?;
        self.stats.parsing_ms = millis_since(parse_start);
        self.stats.ast_node_count = program.node_count();
        self.stats.statements_before = program.statement_count();
        self.log(format_args!(
            "parsing complete: {} nodes, {} statements",
            self.stats.ast_node_count, self.stats.statements_before
        ));

        if self.optimization_enabled {
            let opt_start = Instant::now();
            let pass_stats = PassManager::with_default_passes().run(&mut program);
            self.stats.optimization_ms = millis_since(opt_start);
            self.stats.constants_folded = pass_stats.constants_folded;
            self.stats.algebraic_simplifications = pass_stats.algebraic_simplifications;
            self.stats.dead_code_removed = pass_stats.dead_code_removed;
            self.stats.total_passes = pass_stats.total_passes;
            self.log(format_args!(
                "optimization complete: {} passes, {} folded, {} simplified, {} removed",
                pass_stats.total_passes,
                pass_stats.constants_folded,
                pass_stats.algebraic_simplifications,
                pass_stats.dead_code_removed
            ));
        } else {
            self.log(format_args!("optimization disabled, skipping"));
        }
        self.stats.statements_after = program.statement_count();

        let emit_start = Instant::now();
        let glsl = glint_glsl::emit_glsl(&program, stage)?;
        self.stats.codegen_ms = millis_since(emit_start);
        self.generated_glsl = glsl.clone();

        Ok(glsl)
    }

    fn log(&self, args: std::fmt::Arguments<'_>) {
        if self.verbose {
            log::info!("{args}");
        } else {
            log::debug!("{args}");
        }
    }
}

fn millis_since(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
