#![no_main]

use libfuzzer_sys::fuzz_target;
use staker_store::codec;

// Stored bytes come from disk and may be corrupted: decoding must reject them
// with an error, never panic. Anything that does decode must re-encode to a
// record that decodes to the same value.
fuzz_target!(|data: &[u8]| {
    let Ok(record) = codec::decode(data) else {
        return;
    };
    let encoded = codec::encode(&record).expect("decoded record re-encodes");
    let again = codec::decode(&encoded).expect("re-encoded record decodes");
    assert_eq!(again, record);
});
