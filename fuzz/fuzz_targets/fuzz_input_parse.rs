#![no_main]

use libfuzzer_sys::fuzz_target;

// Hash and outpoint strings arrive from operators and callers.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(txid) = staker_types::parse_txid(s) {
        assert_eq!(staker_types::parse_txid(&txid.to_string()).ok(), Some(txid));
    }
    if let Ok(outpoint) = staker_types::parse_outpoint(s) {
        assert_eq!(
            staker_types::parse_outpoint(&outpoint.to_string()).ok(),
            Some(outpoint)
        );
    }
});
