#![no_main]

use interpose::runtime::Signature;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(signature) = Signature::parse(text) {
            // A parsed signature must survive its own encoding.
            let encoded = signature.encode();
            let reparsed = Signature::parse(&encoded).unwrap();
            assert_eq!(signature, reparsed);
        }
    }
});
