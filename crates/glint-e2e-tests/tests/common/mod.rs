use std::process::Command;

use glint::{Compiler, Stage};

/// True when the external translator is on the PATH. Tests that need the
/// subprocess edge bail out early (with a message) when it is not.
pub fn glslang_available() -> bool {
    Command::new("glslangValidator")
        .arg("--version")
        .output()
        .is_ok()
}

/// Compile source with a fresh compiler, panicking on failure.
#[allow(dead_code)]
pub fn compile(source: &str, stage: Stage) -> Vec<u32> {
    Compiler::new()
        .compile(source, stage)
        .unwrap_or_else(|e| panic!("compilation failed: {e}"))
}

#[allow(dead_code)]
pub fn skip_unless_glslang() -> bool {
    if glslang_available() {
        true
    } else {
        eprintln!("skipping: glslangValidator not found on PATH");
        false
    }
}
