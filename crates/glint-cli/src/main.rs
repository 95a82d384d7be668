use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::{Context, IntoDiagnostic};

use glint::{CompileStats, Compiler, Stage};

/// glint: shader DSL to SPIR-V compiler
#[derive(Parser)]
#[command(version, about)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Input shader source file
    input: PathBuf,

    /// Pipeline stage to compile: vertex or fragment
    #[arg(short, long, value_parser = parse_stage)]
    stage: Stage,

    /// Output SPIR-V path (default: the input with a .spv extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable optimization passes
    #[arg(long)]
    no_opt: bool,

    /// Print the generated GLSL to stdout
    #[arg(long)]
    emit_glsl: bool,

    /// Print compilation statistics
    #[arg(long)]
    stats: bool,

    /// Verbose per-stage logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_stage(s: &str) -> Result<Stage, String> {
    s.parse()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> miette::Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Info);
    }
    logger.try_init().ok();

    let mut compiler = Compiler::new();
    compiler.set_optimization_enabled(!cli.no_opt);
    compiler.set_verbose(cli.verbose);

    let words = compiler
        .compile_file(&cli.input, cli.stage)
        .map_err(|e| miette::miette!("{e}"))
        .wrap_err_with(|| format!("failed to compile {}", cli.input.display()))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("spv"));
    write_spirv(&output, &words)?;
    println!(
        "wrote {} ({} bytes, {} words)",
        output.display(),
        words.len() * 4,
        words.len()
    );

    if cli.emit_glsl {
        print!("{}", compiler.generated_glsl());
    }
    if cli.stats {
        print_stats(compiler.stats(), !cli.no_opt);
    }

    Ok(())
}

fn write_spirv(path: &Path, words: &[u32]) -> miette::Result<()> {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    std::fs::write(path, bytes)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {}", path.display()))
}

fn print_stats(stats: &CompileStats, optimized: bool) {
    println!("timing:");
    println!("  total:        {:.3} ms", stats.total_ms);
    println!("  lexing:       {:.3} ms", stats.lexing_ms);
    println!("  parsing:      {:.3} ms", stats.parsing_ms);
    println!("  optimization: {:.3} ms", stats.optimization_ms);
    println!("  code gen:     {:.3} ms", stats.codegen_ms);
    println!("tokens: {}", stats.token_count);
    println!("ast nodes: {}", stats.ast_node_count);
    if optimized {
        println!("optimizer:");
        println!("  passes: {}", stats.total_passes);
        println!("  constants folded: {}", stats.constants_folded);
        println!(
            "  algebraic simplifications: {}",
            stats.algebraic_simplifications
        );
        println!("  dead code removed: {}", stats.dead_code_removed);
    }
    println!(
        "statements: {} -> {}",
        stats.statements_before, stats.statements_after
    );
    println!(
        "spir-v: {} bytes ({} words)",
        stats.spirv_size_bytes, stats.spirv_word_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["glint", "shader.dsl", "--stage", "vertex"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("shader.dsl"));
        assert_eq!(cli.stage, Stage::Vertex);
        assert!(cli.output.is_none());
        assert!(!cli.no_opt);
        assert!(!cli.emit_glsl);
        assert!(!cli.stats);
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_all_flags() {
        let cli = Cli::try_parse_from([
            "glint",
            "shader.dsl",
            "--stage",
            "fragment",
            "--output",
            "out.spv",
            "--no-opt",
            "--emit-glsl",
            "--stats",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(cli.stage, Stage::Fragment);
        assert_eq!(cli.output.unwrap(), PathBuf::from("out.spv"));
        assert!(cli.no_opt);
        assert!(cli.emit_glsl);
        assert!(cli.stats);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_short_flags() {
        let cli =
            Cli::try_parse_from(["glint", "in.dsl", "-s", "vertex", "-o", "out.spv", "-v"])
                .unwrap();
        assert_eq!(cli.stage, Stage::Vertex);
        assert_eq!(cli.output.unwrap(), PathBuf::from("out.spv"));
        assert!(cli.verbose);
    }

    #[test]
    fn cli_requires_a_stage() {
        assert!(Cli::try_parse_from(["glint", "shader.dsl"]).is_err());
    }

    #[test]
    fn cli_rejects_invalid_stage() {
        let result = Cli::try_parse_from(["glint", "shader.dsl", "--stage", "geometry"]);
        assert!(result.is_err());
    }

    #[test]
    fn stage_parser_accepts_both_stages() {
        assert_eq!(parse_stage("vertex").unwrap(), Stage::Vertex);
        assert_eq!(parse_stage("fragment").unwrap(), Stage::Fragment);
        let err = parse_stage("geometry").unwrap_err();
        assert!(err.contains("invalid stage"));
    }

    #[test]
    fn default_output_path_swaps_the_extension() {
        let input = PathBuf::from("shaders/demo.dsl");
        assert_eq!(input.with_extension("spv"), PathBuf::from("shaders/demo.spv"));
    }
}
