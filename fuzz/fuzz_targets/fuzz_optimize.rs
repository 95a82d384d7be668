#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Whatever parses must also survive optimization to a fixed point.
        if let Ok(mut program) = glint_parser::parse(source) {
            glint_opt::optimize(&mut program);
        }
    }
});
