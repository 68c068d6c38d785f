#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Config parsing and validation should never panic
        if let Ok((config, _warnings)) =
            shipyard::config::parse_with_warnings(content, Path::new("shipyard.toml"))
        {
            let _ = config.validate();
        }
    }
});
