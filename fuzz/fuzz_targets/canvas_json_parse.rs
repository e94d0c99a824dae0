//! Fuzz target for canvas JSON parsing.
//!
//! Feeds arbitrary UTF-8 input to the canvas payload parser, checking for
//! panics, crashes, or hangs.

#![no_main]

use boxlabel::canvas::fuzz_parse_canvas_json;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(input) = std::str::from_utf8(data) {
        let _ = fuzz_parse_canvas_json(input);
    }
});
