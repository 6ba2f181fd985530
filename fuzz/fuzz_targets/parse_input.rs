#![no_main]

use lanes_core::calculate;
use lanes_core::input::{InputFormat, parse_entries};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for format in [InputFormat::Text, InputFormat::Json, InputFormat::Jsonl] {
        if let Ok(entries) = parse_entries(text, format) {
            let layout = calculate(&entries);
            assert_eq!(layout.len(), entries.len());
            let _ = serde_json::to_string(&layout);
        }
    }
});
