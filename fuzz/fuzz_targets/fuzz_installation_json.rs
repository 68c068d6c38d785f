#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Installation metadata comes from remote hosts and must never panic
    let _ = serde_json::from_slice::<shipyard::Installation>(data);
});
