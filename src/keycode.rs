//! Component A: the key code alphabet shared by every layer of the engine.
//!
//! A [`KeyCode`] is a positive integer. Codes `1..=255` are raw bytes as
//! read from a terminal fd; `0` is reserved as the matcher's internal
//! sequence terminator and is never a valid fed key. Codes `>= 256` name
//! symbolic keys — cursor keys, function keys, and the lone `Esc` press —
//! that only ever appear as the *replacement* side of a terminal mapping,
//! never as raw input.

use phf::phf_map;

/// A single key in the engine's alphabet. See the module docs for the
/// raw-byte / symbolic split.
pub type KeyCode = u16;

/// Reserved terminator; never a legal argument to [`crate::mapset::Matcher::feed`].
pub const TERMINATOR: KeyCode = 0;

/// Highest raw-byte key code. Codes above this are symbolic.
pub const RAW_BYTE_MAX: KeyCode = 0xFF;

/// First symbolic key code.
pub const SYMBOLIC_BASE: KeyCode = 0x100;

/// Symbolic key codes produced by terminal-sequence decoding.
///
/// These never appear in raw input; they are only ever the replacement
/// side of a terminal-layer [`crate::mapping::Mapping`].
pub mod symbolic {
    use super::KeyCode;

    pub const ESC: KeyCode = 0x100;
    pub const UP: KeyCode = 0x101;
    pub const DOWN: KeyCode = 0x102;
    pub const LEFT: KeyCode = 0x103;
    pub const RIGHT: KeyCode = 0x104;
    pub const HOME: KeyCode = 0x105;
    pub const END: KeyCode = 0x106;
    pub const PAGE_UP: KeyCode = 0x107;
    pub const PAGE_DOWN: KeyCode = 0x108;
    pub const INSERT: KeyCode = 0x109;
    pub const DELETE: KeyCode = 0x10A;
    pub const BACKTAB: KeyCode = 0x10B;
    pub const F1: KeyCode = 0x110;
    pub const F2: KeyCode = 0x111;
    pub const F3: KeyCode = 0x112;
    pub const F4: KeyCode = 0x113;
    pub const F5: KeyCode = 0x114;
    pub const F6: KeyCode = 0x115;
    pub const F7: KeyCode = 0x116;
    pub const F8: KeyCode = 0x117;
    pub const F9: KeyCode = 0x118;
    pub const F10: KeyCode = 0x119;
    pub const F11: KeyCode = 0x11A;
    pub const F12: KeyCode = 0x11B;
}

static SYMBOLIC_NAMES: phf::Map<u16, &'static str> = phf_map! {
    0x100u16 => "Esc",
    0x101u16 => "Up",
    0x102u16 => "Down",
    0x103u16 => "Left",
    0x104u16 => "Right",
    0x105u16 => "Home",
    0x106u16 => "End",
    0x107u16 => "PageUp",
    0x108u16 => "PageDown",
    0x109u16 => "Insert",
    0x10Au16 => "Delete",
    0x10Bu16 => "BackTab",
    0x110u16 => "F1",
    0x111u16 => "F2",
    0x112u16 => "F3",
    0x113u16 => "F4",
    0x114u16 => "F5",
    0x115u16 => "F6",
    0x116u16 => "F7",
    0x117u16 => "F8",
    0x118u16 => "F9",
    0x119u16 => "F10",
    0x11Au16 => "F11",
    0x11Bu16 => "F12",
};

/// Look up the display name of a symbolic key code, if any.
pub fn symbolic_name(code: KeyCode) -> Option<&'static str> {
    SYMBOLIC_NAMES.get(&code).copied()
}

/// Human-readable description of any key code, raw or symbolic. Used by
/// diagnostics and `kui-probe`'s echo mode, never by matching logic.
pub fn describe(code: KeyCode) -> String {
    if code == TERMINATOR {
        return "<NUL>".to_string();
    }
    if code <= RAW_BYTE_MAX {
        return match code {
            0x09 => "Tab".to_string(),
            0x0D => "Enter".to_string(),
            0x1B => "Esc".to_string(),
            0x20 => "Space".to_string(),
            0x7F => "Backspace".to_string(),
            c if c < 0x20 => format!("C-{}", (b'a' + (c as u8 - 1)) as char),
            c => format!("{}", c as u8 as char),
        };
    }
    symbolic_name(code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("<key {code:#x}>"))
}

/// An ordered, non-empty run of key codes. Used both as a mapping's
/// trigger/replacement and as the lookahead buffer the matcher walks.
///
/// `Vec<KeyCode>`'s derived `Ord` is exactly the "shorter prefix sorts
/// before its own extensions" order the matcher's sorted-container
/// algorithm relies on, so `KeySequence` just wraps it rather than
/// reimplementing comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct KeySequence(Vec<KeyCode>);

impl KeySequence {
    pub fn new(codes: Vec<KeyCode>) -> Self {
        Self(codes)
    }

    pub fn single(code: KeyCode) -> Self {
        Self(vec![code])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[KeyCode] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&KeyCode> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyCode> {
        self.0.iter()
    }
}

impl std::fmt::Display for KeySequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, &code) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", describe(code))?;
        }
        Ok(())
    }
}

impl From<Vec<KeyCode>> for KeySequence {
    fn from(codes: Vec<KeyCode>) -> Self {
        Self(codes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_prefix_sorts_before_its_extension() {
        let ab = KeySequence::new(vec![b'a' as KeyCode, b'b' as KeyCode]);
        let abc = KeySequence::new(vec![b'a' as KeyCode, b'b' as KeyCode, b'c' as KeyCode]);
        assert!(ab < abc);
    }

    #[test]
    fn describe_control_byte() {
        assert_eq!(describe(0x01), "C-a");
    }

    #[test]
    fn describe_symbolic_key() {
        assert_eq!(describe(symbolic::UP), "Up");
        assert_eq!(describe(symbolic::F10), "F10");
    }
}
