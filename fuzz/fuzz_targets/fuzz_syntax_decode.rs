// fuzz/fuzz_targets/fuzz_syntax_decode.rs
#![no_main]

use kui_engine::syntax::decode;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // `decode` is the only place arbitrary, user-authored text reaches the
    // engine (mapping trigger/replacement text, `--map` flags, map files).
    // It must never panic, regardless of how malformed the input is.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(seq) = decode(text) {
        // Any successfully decoded sequence must be non-empty per the
        // trigger/replacement invariant `Mapping` relies on.
        assert!(!seq.is_empty());
    }
});
