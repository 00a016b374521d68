// fuzz/fuzz_targets/fuzz_matcher.rs
#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use kui_engine::keycode::KeyCode;
use kui_engine::mapset::{MappingSet, MatchState};
use libfuzzer_sys::fuzz_target;

// Bound both the number of registered triggers and the input length so a
// single fuzz case can't spend unbounded time in the matcher loop.
const MAX_TRIGGERS: usize = 16;
const MAX_TRIGGER_LEN: usize = 8;
const MAX_INPUT_LEN: usize = 256;

#[derive(Arbitrary, Debug, Clone)]
struct ArbTrigger {
    keys: Vec<u8>,
}

#[derive(Arbitrary, Debug)]
struct FuzzCase {
    triggers: Vec<ArbTrigger>,
    input: Vec<u8>,
}

/// Turn arbitrary bytes into a key-syntax string `register` can decode:
/// printable, non-zero ASCII with `<` dropped so it never opens a tag.
fn as_trigger_text(bytes: &[u8]) -> Option<String> {
    let filtered: String = bytes
        .iter()
        .take(MAX_TRIGGER_LEN)
        .filter(|&&b| b != 0 && b != b'<' && b.is_ascii())
        .map(|&b| b as char)
        .collect();
    if filtered.is_empty() {
        None
    } else {
        Some(filtered)
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(case) = FuzzCase::arbitrary(&mut u) else {
        return;
    };

    let mut set = MappingSet::new();
    for (i, t) in case.triggers.iter().take(MAX_TRIGGERS).enumerate() {
        if let Some(trigger_text) = as_trigger_text(&t.keys) {
            let _ = set.register(&trigger_text, &format!("out{i}"));
        }
    }

    // Replay the input against the matcher exactly the way `KuiContext::find_key`
    // does: feed while StillLooking, stop once no set can extend further. The
    // goal is panics/hangs, not a specific match outcome.
    let mut matcher = set.matcher();
    for (position, &byte) in case.input.iter().take(MAX_INPUT_LEN).enumerate() {
        if matcher.state() != MatchState::StillLooking {
            break;
        }
        let key = (byte as KeyCode).max(1);
        let _ = matcher.feed(key, position);
    }
    matcher.finalize();
    let _ = matcher.matched();
});
