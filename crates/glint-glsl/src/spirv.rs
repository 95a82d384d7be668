//! SPIR-V translation through the external `glslangValidator` process.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use glint_ast::Stage;

use crate::CodeGenError;

/// First word of every valid SPIR-V module.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

const TRANSLATOR: &str = "glslangValidator";

/// Per-process temp-file counter. Combined with the pid this keeps
/// concurrent compilations from colliding on file names.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A file under the system temp directory, deleted on drop whatever the
/// exit path (success, error return, or unwind).
struct TempFile {
    path: PathBuf,
}

impl TempFile {
    fn new(extension: &str) -> Self {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("shader_{}_{}.{}", std::process::id(), counter, extension);
        Self {
            path: env::temp_dir().join(name),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// Translates GLSL text to SPIR-V words with `glslangValidator -V`.
///
/// The stage determines the input file extension, which is how the
/// translator infers the pipeline position. On a non-zero exit the error
/// carries the command line, the translator's combined output, and the full
/// GLSL source.
pub fn compile_glsl_to_spirv(glsl: &str, stage: Stage) -> Result<Vec<u32>, CodeGenError> {
    let input = TempFile::new(stage.file_extension());
    let output = TempFile::new("spv");

    fs::write(input.path(), glsl)?;

    log::debug!(
        "invoking {TRANSLATOR} on {} -> {}",
        input.path().display(),
        output.path().display()
    );
    let result = Command::new(TRANSLATOR)
        .arg("-V")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .output()?;

    if !result.status.success() {
        let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&result.stderr));
        return Err(CodeGenError::Translator {
            command: format!(
                "{TRANSLATOR} -V {} -o {}",
                input.path().display(),
                output.path().display()
            ),
            output: combined,
            glsl: glsl.to_owned(),
        });
    }

    read_spirv_words(output.path())
}

/// Loads a binary SPIR-V file as a little-endian 32-bit word sequence and
/// checks the magic number.
fn read_spirv_words(path: &Path) -> Result<Vec<u32>, CodeGenError> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(CodeGenError::InvalidSpirv(format!(
            "file size {} is not a multiple of 4 bytes",
            bytes.len()
        )));
    }

    let words: Vec<u32> = bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    match words.first() {
        Some(&SPIRV_MAGIC) => Ok(words),
        Some(&word) => Err(CodeGenError::InvalidSpirv(format!(
            "bad magic number {word:#010x}"
        ))),
        None => Err(CodeGenError::InvalidSpirv("empty file".into())),
    }
}
