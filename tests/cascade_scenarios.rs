//! Exercises overlapping-trigger, idle-cutoff, recursive-expansion, and
//! re-registration scenarios directly against `KuiContext`/`KuiManager`,
//! using the shared `test-helpers` crate for pipe plumbing instead of
//! duplicating it per test file.

use std::os::unix::io::AsRawFd;
use std::time::Duration;

use kui_engine::config::Config;
use kui_engine::context::{KeyResult, KuiContext};
use kui_engine::keycode::KeyCode;
use kui_engine::manager::KuiManager;
use kui_engine::mapping::Mapping;
use kui_engine::mapset::MappingSet;
use test_helpers::{dummy_config, feed, mapping_set, pipe};

const SHORT: Duration = Duration::from_millis(60);
const LONG: Duration = Duration::from_millis(250);

fn context_with(input: &[u8], set: MappingSet) -> (KuiContext, std::fs::File) {
    let (r, w) = pipe();
    feed(&w, input);
    let mut ctx = KuiContext::from_fd(r.as_raw_fd(), SHORT, 4096);
    ctx.add_map_set(set);
    (ctx, w)
}

/// Overlapping triggers `ab -> X`, `abc -> Y`: the longer match wins
/// when it's present, the shorter one still wins on its own.
#[test]
fn overlapping_triggers_resolve_to_longest_match() {
    let set = mapping_set(&[("ab", "X"), ("abc", "Y")]);
    let (mut ctx, _w) = context_with(b"abd", set.clone());
    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'X' as KeyCode));
    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'd' as KeyCode));

    let (mut ctx2, _w2) = context_with(b"abcd", set);
    assert_eq!(ctx2.get_key().unwrap(), KeyResult::Key(b'Y' as KeyCode));
    assert_eq!(ctx2.get_key().unwrap(), KeyResult::Key(b'd' as KeyCode));
}

/// An idle timeout finalizes a still-pending prefix match, then feeding
/// the rest of the trigger on a later call completes the longer one.
#[test]
fn idle_cutoff_then_later_feed_completes_match() {
    let set = mapping_set(&[("abc", "Y")]);
    let (r, w) = pipe();
    feed(&w, b"ab");
    let mut ctx = KuiContext::from_fd(r.as_raw_fd(), SHORT, 4096);
    ctx.add_map_set(set);

    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'a' as KeyCode));
    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'b' as KeyCode));

    feed(&w, b"c");
    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'Y' as KeyCode));
}

/// Recursive macro expansion: `j -> k`, `kk -> Z`, input `jj` resolves
/// through both rounds to `Z`.
#[test]
fn recursive_expansion_resolves_through_multiple_rounds() {
    let set = mapping_set(&[("j", "k"), ("kk", "Z")]);
    let (mut ctx, _w) = context_with(b"jj", set);
    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'Z' as KeyCode));
}

/// A decoded terminal escape sequence feeds straight into a user macro,
/// driven through the full `KuiManager` cascade.
#[test]
fn terminal_decode_feeds_user_macro_through_cascade() {
    let (r, w) = pipe();
    feed(&w, b"\x1b[A");
    let config = dummy_config(SHORT, LONG);
    let mut manager = KuiManager::create(r.as_raw_fd(), &config);

    let mut user_set = MappingSet::new();
    user_set.register_mapping(
        Mapping::from_sequences(
            kui_engine::keycode::KeySequence::single(kui_engine::keycode::symbolic::UP),
            kui_engine::keycode::KeySequence::new(vec![b'G' as KeyCode]),
            "<Up>",
            "G",
        )
        .unwrap(),
    );
    manager.add_map_set(user_set);

    assert_eq!(manager.get_key().unwrap(), KeyResult::Key(b'G' as KeyCode));
}

/// A lone escape byte with no continuation and no matching user macro
/// still resolves to the symbolic `Esc` key.
#[test]
fn lone_escape_with_no_user_macros_resolves_to_esc() {
    let (r, w) = pipe();
    feed(&w, b"\x1b");
    let config = Config::builder()
        .terminal_read_timeout(SHORT)
        .user_read_timeout(LONG)
        .build();
    let mut manager = KuiManager::create(r.as_raw_fd(), &config);
    assert_eq!(
        manager.get_key().unwrap(),
        KeyResult::Key(kui_engine::keycode::symbolic::ESC)
    );
}

/// Re-registering the same trigger keeps exactly one mapping, with the
/// latest replacement value.
#[test]
fn re_registration_overwrites_prior_replacement() {
    let mut set = MappingSet::new();
    set.register("x", "A").unwrap();
    set.register("x", "B").unwrap();
    assert_eq!(set.len(), 1);

    let (mut ctx, _w) = context_with(b"x", set);
    assert_eq!(ctx.get_key().unwrap(), KeyResult::Key(b'B' as KeyCode));
}
