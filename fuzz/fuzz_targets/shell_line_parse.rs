//! Fuzz target for annotate shell command lines.

#![no_main]

use boxlabel::session::parse_shell_line;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let line = String::from_utf8_lossy(data);
    let _ = parse_shell_line(&line);
});
