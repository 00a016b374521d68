//! Component C: the mapping set container and its incremental matcher.
//!
//! Entries are kept in a `Vec<Mapping>` sorted by trigger, mirroring the
//! sorted intrusive structure the original engine walks with a cursor —
//! a plain sorted `Vec` plus `binary_search` gets the same locality
//! without the intrusive-list bookkeeping. `KeySequence`'s derived `Ord`
//! is exactly the order the algorithm needs: a trigger sorts strictly
//! before any trigger it is a prefix of.
//!
//! Match state (`cursor`, `state`, `best_found`) is deliberately not a
//! field of `MappingSet` itself. A `FindKey` pass needs one matcher per
//! mapping set alive only for the duration of that single pass, and
//! Rust's borrow checker makes it painful for `MappingSet` to hand out a
//! long-lived mutable matcher handle while also being read elsewhere
//! (registration can happen between passes). Making `Matcher` a small,
//! freshly constructed value per pass sidesteps that instead of fighting
//! it with interior mutability.

use crate::error::{Error, Result};
use crate::keycode::{KeyCode, KeySequence};
use crate::mapping::Mapping;

/// A sorted collection of [`Mapping`]s that can be matched incrementally
/// against a stream of key codes.
#[derive(Debug, Default, Clone)]
pub struct MappingSet {
    entries: Vec<Mapping>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Decode and register a trigger/replacement pair given as text. If a
    /// mapping with the same trigger already exists, its replacement is
    /// overwritten.
    pub fn register(&mut self, trigger_text: &str, replacement_text: &str) -> Result<()> {
        let mapping = Mapping::create(trigger_text, replacement_text)?;
        self.register_mapping(mapping);
        Ok(())
    }

    /// Insert an already-built `Mapping`, keeping `entries` sorted by
    /// trigger and replacing any existing entry with the same trigger.
    pub(crate) fn register_mapping(&mut self, mapping: Mapping) {
        match self
            .entries
            .binary_search_by(|e| e.trigger().cmp(mapping.trigger()))
        {
            Ok(idx) => self.entries[idx] = mapping,
            Err(idx) => self.entries.insert(idx, mapping),
        }
    }

    /// Remove the mapping whose trigger decodes from `trigger_text`.
    /// Returns [`Error::NotPresent`] if no such trigger is registered —
    /// a direct membership check rather than the "iterator landed back
    /// at begin" heuristic, which breaks when the very first entry is
    /// the one being removed.
    pub fn deregister(&mut self, trigger_text: &str) -> Result<()> {
        let trigger = crate::syntax::decode(trigger_text)?;
        match self.entries.binary_search_by(|e| e.trigger().cmp(&trigger)) {
            Ok(idx) => {
                self.entries.remove(idx);
                Ok(())
            }
            Err(_) => Err(Error::NotPresent),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mapping> {
        self.entries.iter()
    }

    /// Start a fresh matcher over this set's current entries. Must not
    /// outlive a single `FindKey` pass — entries registered after a
    /// matcher is built are not reflected in it, by design.
    pub fn matcher(&self) -> Matcher<'_> {
        Matcher::new(&self.entries)
    }
}

impl<'a> IntoIterator for &'a MappingSet {
    type Item = &'a Mapping;
    type IntoIter = std::slice::Iter<'a, Mapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The three states a [`Matcher`] can be in after a `Feed` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// At least one registered trigger could still extend the keys fed
    /// so far; more input may change the outcome.
    StillLooking,
    /// No further input could change the winning match recorded so far.
    Found,
    /// No registered trigger is consistent with the keys fed so far.
    NotFound,
}

/// A single pass of the longest-match algorithm over one [`MappingSet`].
///
/// `cursor` walks the sorted entries; `best_found` remembers the longest
/// complete match seen so far (superseded the instant a longer one is
/// found); `state` is the public summary `FindKey` inspects after every
/// `Feed`.
pub struct Matcher<'a> {
    entries: &'a [Mapping],
    cursor: usize,
    state: MatchState,
    best_found: Option<usize>,
}

fn shares_prefix(a: &KeySequence, b: &KeySequence, len: usize) -> bool {
    a.len() >= len && b.len() >= len && a.as_slice()[..len] == b.as_slice()[..len]
}

impl<'a> Matcher<'a> {
    fn new(entries: &'a [Mapping]) -> Self {
        let mut m = Self {
            entries,
            cursor: 0,
            state: MatchState::StillLooking,
            best_found: None,
        };
        if entries.is_empty() {
            m.state = MatchState::NotFound;
        }
        m
    }

    /// Re-arm this matcher for a new pass over the same entries.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.best_found = None;
        self.state = if self.entries.is_empty() {
            MatchState::NotFound
        } else {
            MatchState::StillLooking
        };
    }

    pub fn state(&self) -> MatchState {
        self.state
    }

    /// Feed the next key at `position` (0-based index into the current
    /// lookahead run). Requires `state() == StillLooking`; any other
    /// call is an [`Error::Internal`].
    ///
    /// Implements the sorted-cursor advance precisely: entries whose
    /// trigger's first `position` keys equal the anchor's, but whose key
    /// at `position` is *absent* (the trigger was fully consumed by an
    /// earlier, shorter match) are always treated as "too small" and
    /// skipped — any continuation sorts after its own bare prefix. This
    /// is what lets a shorter trigger (`"ab"`) and a longer one sharing
    /// its prefix (`"abc"`) both stay live across repeated `Feed` calls.
    pub fn feed(&mut self, key: KeyCode, position: usize) -> Result<()> {
        if self.state != MatchState::StillLooking {
            return Err(Error::internal("feed called while matcher is not StillLooking"));
        }
        if key == 0 {
            return Err(Error::invalid("fed key code must be positive"));
        }

        let entries = self.entries;
        let anchor = entries[self.cursor].trigger().clone();

        while self.cursor < entries.len() {
            let trig = entries[self.cursor].trigger();
            if !shares_prefix(trig, &anchor, position) {
                break;
            }
            match trig.get(position) {
                Some(&k) if k < key => self.cursor += 1,
                None => self.cursor += 1,
                _ => break,
            }
        }

        if self.cursor >= entries.len() {
            self.state = MatchState::NotFound;
            return Ok(());
        }

        let trig = entries[self.cursor].trigger();
        if !shares_prefix(trig, &anchor, position) {
            self.state = MatchState::NotFound;
            return Ok(());
        }
        match trig.get(position) {
            Some(&k) if k == key => {}
            _ => {
                self.state = MatchState::NotFound;
                return Ok(());
            }
        }

        if trig.len() == position + 1 {
            self.best_found = Some(self.cursor);
            let still_looking = entries
                .get(self.cursor + 1)
                .is_some_and(|next| shares_prefix(next.trigger(), trig, position + 1));
            self.state = if still_looking {
                MatchState::StillLooking
            } else {
                MatchState::Found
            };
        }
        // Else: the entry at cursor is longer than position + 1, so this
        // candidate itself still needs more input regardless of
        // siblings — stay StillLooking.
        Ok(())
    }

    /// Commit the best complete match seen, if any. Idempotent; safe to
    /// call once the read loop stops for any reason (found, not found,
    /// or idle).
    pub fn finalize(&mut self) {
        if let Some(best) = self.best_found {
            self.cursor = best;
            self.state = MatchState::Found;
        }
    }

    /// The winning mapping, if `state() == Found`.
    pub fn matched(&self) -> Option<&'a Mapping> {
        if self.state == MatchState::Found {
            Some(&self.entries[self.cursor])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, &str)]) -> MappingSet {
        let mut s = MappingSet::new();
        for (t, r) in pairs {
            s.register(t, r).unwrap();
        }
        s
    }

    fn run(set: &MappingSet, input: &[KeyCode]) -> (Option<String>, usize) {
        let mut m = set.matcher();
        let mut position = 0usize;
        let mut consumed = 0usize;
        for (i, &k) in input.iter().enumerate() {
            if m.state() != MatchState::StillLooking {
                break;
            }
            m.feed(k, i).unwrap();
            position = i;
            consumed = i + 1;
            if m.state() != MatchState::StillLooking {
                break;
            }
        }
        let _ = position;
        m.finalize();
        (
            m.matched().map(|mm| mm.replacement_text().to_string()),
            m.matched().map(|mm| mm.trigger().len()).unwrap_or(consumed.min(1)),
        )
    }

    #[test]
    fn longest_prefix_wins_over_shorter_sibling() {
        let s = set(&[("ab", "X"), ("abc", "Y")]);
        let (matched, len) = run(&s, &[b'a' as u16, b'b' as u16, b'd' as u16]);
        assert_eq!(matched.as_deref(), Some("X"));
        assert_eq!(len, 2);
    }

    #[test]
    fn full_longer_match_wins() {
        let s = set(&[("ab", "X"), ("abc", "Y")]);
        let (matched, len) = run(&s, &[b'a' as u16, b'b' as u16, b'c' as u16]);
        assert_eq!(matched.as_deref(), Some("Y"));
        assert_eq!(len, 3);
    }

    #[test]
    fn no_match_reports_not_found() {
        let s = set(&[("abc", "Y")]);
        let mut m = s.matcher();
        m.feed(b'x' as u16, 0).unwrap();
        assert_eq!(m.state(), MatchState::NotFound);
        m.finalize();
        assert!(m.matched().is_none());
    }

    #[test]
    fn partial_prefix_remains_still_looking_until_complete() {
        let s = set(&[("abc", "Y")]);
        let mut m = s.matcher();
        m.feed(b'a' as u16, 0).unwrap();
        assert_eq!(m.state(), MatchState::StillLooking);
        m.feed(b'b' as u16, 1).unwrap();
        assert_eq!(m.state(), MatchState::StillLooking);
        m.feed(b'c' as u16, 2).unwrap();
        assert_eq!(m.state(), MatchState::Found);
    }

    #[test]
    fn empty_set_is_immediately_not_found() {
        let s = MappingSet::new();
        let m = s.matcher();
        assert_eq!(m.state(), MatchState::NotFound);
    }

    #[test]
    fn feed_rejects_zero_key() {
        let s = set(&[("a", "X")]);
        let mut m = s.matcher();
        assert!(m.feed(0, 0).is_err());
    }

    #[test]
    fn feed_after_not_found_is_an_error() {
        let s = set(&[("abc", "Y")]);
        let mut m = s.matcher();
        m.feed(b'x' as u16, 0).unwrap();
        assert!(m.feed(b'y' as u16, 1).is_err());
    }

    #[test]
    fn register_overwrites_existing_trigger() {
        let mut s = set(&[("a", "X")]);
        s.register("a", "Z").unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.iter().next().unwrap().replacement_text(), "Z");
    }

    #[test]
    fn deregister_removes_entry() {
        let mut s = set(&[("a", "X"), ("b", "Y")]);
        s.deregister("a").unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn deregister_missing_trigger_errors() {
        let mut s = set(&[("a", "X")]);
        assert!(matches!(s.deregister("zz"), Err(Error::NotPresent)));
    }

    #[test]
    fn deregister_first_entry_does_not_misreport_missing() {
        let mut s = set(&[("a", "X"), ("b", "Y"), ("c", "Z")]);
        assert!(s.deregister("a").is_ok());
        assert_eq!(s.len(), 2);
    }
}
