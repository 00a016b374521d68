//! Component B: a single trigger/replacement pair.

use crate::error::{Error, Result};
use crate::keycode::KeySequence;
use crate::syntax;

/// A registered trigger/replacement pair, plus the original text on both
/// sides for diagnostics and round-tripping back to a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    trigger: KeySequence,
    replacement: KeySequence,
    trigger_text: String,
    replacement_text: String,
}

impl Mapping {
    /// Decode `trigger_text` and `replacement_text` via [`syntax::decode`]
    /// and build a `Mapping`. The trigger must decode to a non-empty
    /// sequence; the replacement may be empty (a trigger that is simply
    /// swallowed).
    pub fn create(trigger_text: &str, replacement_text: &str) -> Result<Self> {
        let trigger = syntax::decode(trigger_text)?;
        let replacement = if replacement_text.is_empty() {
            KeySequence::new(Vec::new())
        } else {
            syntax::decode(replacement_text)?
        };
        Self::from_sequences(trigger, replacement, trigger_text, replacement_text)
    }

    /// Build a `Mapping` from already-decoded sequences, bypassing the
    /// text decoder. Used internally to construct the terminal key
    /// database directly from raw escape-sequence bytes.
    pub(crate) fn from_sequences(
        trigger: KeySequence,
        replacement: KeySequence,
        trigger_text: impl Into<String>,
        replacement_text: impl Into<String>,
    ) -> Result<Self> {
        if trigger.is_empty() {
            return Err(Error::invalid("trigger must not be empty"));
        }
        Ok(Self {
            trigger,
            replacement,
            trigger_text: trigger_text.into(),
            replacement_text: replacement_text.into(),
        })
    }

    pub fn trigger(&self) -> &KeySequence {
        &self.trigger
    }

    pub fn replacement(&self) -> &KeySequence {
        &self.replacement
    }

    pub fn trigger_text(&self) -> &str {
        &self.trigger_text
    }

    pub fn replacement_text(&self) -> &str {
        &self.replacement_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_decodes_both_sides() {
        let m = Mapping::create("<C-a>", "hello").unwrap();
        assert_eq!(m.trigger().as_slice(), &[0x01]);
        assert_eq!(m.replacement().len(), 5);
    }

    #[test]
    fn create_rejects_empty_trigger() {
        assert!(Mapping::create("", "x").is_err());
    }

    #[test]
    fn create_allows_empty_replacement() {
        let m = Mapping::create("<C-a>", "").unwrap();
        assert!(m.replacement().is_empty());
    }
}
