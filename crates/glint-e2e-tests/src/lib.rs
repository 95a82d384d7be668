//! Test-only crate. The suite lives under `tests/` and requires
//! `glslangValidator` on the PATH; each test skips itself with a message
//! when the translator is missing.
