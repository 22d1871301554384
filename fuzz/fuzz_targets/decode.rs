#![no_main]

use libfuzzer_sys::fuzz_target;
use sanitizer::decode;
use std::borrow::Cow;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let decoded = decode(input);
    if !input.contains('&') {
        assert!(matches!(decoded, Cow::Borrowed(_)));
        assert_eq!(decoded, input);
    }
    // Every reference is at least two bytes and decodes to at most four.
    assert!(decoded.len() <= input.len() * 2);
});
