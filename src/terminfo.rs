//! External terminal-key database: the fixed set of escape sequences the
//! terminal-decoding context matches against.
//!
//! Instead of shelling out to terminfo/ncurses at runtime, the common
//! xterm/VT220 escape sequences are baked in as a compile-time table and
//! loaded into a [`MappingSet`] once at startup. A real terminal-aware
//! build would read `$TERM`'s terminfo entry; this engine's scope is the
//! matcher and cascade, not terminal-capability negotiation, so one
//! representative table stands in for it.

use crate::keycode::{symbolic, KeyCode};
use crate::mapping::Mapping;
use crate::mapset::MappingSet;

/// `(escape sequence bytes, symbolic replacement, descriptive trigger text)`.
const SEQUENCES: &[(&[u8], KeyCode, &str)] = &[
    (b"\x1b", symbolic::ESC, "<Esc>"),
    (b"\x1b[A", symbolic::UP, "<Esc>[A"),
    (b"\x1b[B", symbolic::DOWN, "<Esc>[B"),
    (b"\x1b[C", symbolic::RIGHT, "<Esc>[C"),
    (b"\x1b[D", symbolic::LEFT, "<Esc>[D"),
    (b"\x1bOA", symbolic::UP, "<Esc>OA"),
    (b"\x1bOB", symbolic::DOWN, "<Esc>OB"),
    (b"\x1bOC", symbolic::RIGHT, "<Esc>OC"),
    (b"\x1bOD", symbolic::LEFT, "<Esc>OD"),
    (b"\x1b[H", symbolic::HOME, "<Esc>[H"),
    (b"\x1b[F", symbolic::END, "<Esc>[F"),
    (b"\x1b[1~", symbolic::HOME, "<Esc>[1~"),
    (b"\x1b[4~", symbolic::END, "<Esc>[4~"),
    (b"\x1b[2~", symbolic::INSERT, "<Esc>[2~"),
    (b"\x1b[3~", symbolic::DELETE, "<Esc>[3~"),
    (b"\x1b[5~", symbolic::PAGE_UP, "<Esc>[5~"),
    (b"\x1b[6~", symbolic::PAGE_DOWN, "<Esc>[6~"),
    (b"\x1b[Z", symbolic::BACKTAB, "<Esc>[Z"),
    (b"\x1bOP", symbolic::F1, "<Esc>OP"),
    (b"\x1bOQ", symbolic::F2, "<Esc>OQ"),
    (b"\x1bOR", symbolic::F3, "<Esc>OR"),
    (b"\x1bOS", symbolic::F4, "<Esc>OS"),
    (b"\x1b[15~", symbolic::F5, "<Esc>[15~"),
    (b"\x1b[17~", symbolic::F6, "<Esc>[17~"),
    (b"\x1b[18~", symbolic::F7, "<Esc>[18~"),
    (b"\x1b[19~", symbolic::F8, "<Esc>[19~"),
    (b"\x1b[20~", symbolic::F9, "<Esc>[20~"),
    (b"\x1b[21~", symbolic::F10, "<Esc>[21~"),
    (b"\x1b[23~", symbolic::F11, "<Esc>[23~"),
    (b"\x1b[24~", symbolic::F12, "<Esc>[24~"),
];

/// Build the fixed mapping set the terminal-decoding context matches
/// against: every known escape sequence, plus the lone `Esc` press.
pub fn terminal_mappings() -> MappingSet {
    let mut set = MappingSet::new();
    for &(bytes, replacement, text) in SEQUENCES {
        let trigger = bytes.iter().map(|&b| b as KeyCode).collect::<Vec<_>>().into();
        let mapping = Mapping::from_sequences(
            trigger,
            crate::keycode::KeySequence::single(replacement),
            text,
            crate::keycode::describe(replacement),
        )
        .expect("built-in terminal sequences are never empty");
        set.register_mapping(mapping);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapset::MatchState;

    #[test]
    fn bare_escape_and_cursor_sequence_coexist() {
        let set = terminal_mappings();
        assert!(set.len() >= SEQUENCES.len());

        let mut m = set.matcher();
        m.feed(0x1B, 0).unwrap();
        assert_eq!(m.state(), MatchState::StillLooking);
        m.feed(b'[' as KeyCode, 1).unwrap();
        assert_eq!(m.state(), MatchState::StillLooking);
        m.feed(b'A' as KeyCode, 2).unwrap();
        assert_eq!(m.state(), MatchState::Found);
        assert_eq!(m.matched().unwrap().replacement().as_slice(), &[symbolic::UP]);
    }

    #[test]
    fn lone_escape_finalizes_when_no_continuation_follows() {
        let set = terminal_mappings();
        let mut m = set.matcher();
        m.feed(0x1B, 0).unwrap();
        assert_eq!(m.state(), MatchState::StillLooking);
        m.finalize();
        assert_eq!(m.matched().unwrap().replacement().as_slice(), &[symbolic::ESC]);
    }
}
