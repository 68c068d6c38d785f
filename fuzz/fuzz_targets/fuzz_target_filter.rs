#![no_main]

use libfuzzer_sys::fuzz_target;
use shipyard::Filter;

fuzz_target!(|data: &[u8]| {
    if let Ok(spec) = std::str::from_utf8(data) {
        if let Ok(filter) = Filter::parse(spec) {
            // Displayed filters must parse back to themselves
            let reparsed = Filter::parse(&filter.to_string()).expect("display form parses");
            assert_eq!(reparsed, filter);
        }
    }
});
