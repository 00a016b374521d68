//! Component D: a KUI context — one layer of the matching cascade.
//!
//! A context owns an upstream key source (either a raw fd or another
//! context, chained), a pushback queue, and an ordered list of mapping
//! sets. `FindKey` is the whole engine in miniature: read keys one at a
//! time, feed every still-looking mapping set, stop at idle or once no
//! set can still extend, then resolve the winner (last-registered set
//! wins ties) and push back unconsumed lookahead plus the replacement.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::os::unix::io::RawFd;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::error::{Error, Result};
use crate::io::{self, ReadOutcome};
use crate::keycode::KeyCode;
use crate::mapset::{MappingSet, MatchState};

/// Where a context pulls its next raw key from.
enum Source {
    /// A raw terminal fd, read one byte at a time.
    Fd(RawFd),
    /// Another context, consulted non-speculatively: its buffered keys
    /// first, then a readiness probe on the underlying fd before asking
    /// it to decode a key outright. This is the two-stage cascade the
    /// manager builds — see [`crate::manager`].
    Chained(Rc<RefCell<KuiContext>>),
}

/// Result of a single `next_raw` pull: a key, or idle (nothing ready
/// within the timeout). End-of-file on the underlying fd also
/// surfaces as idle at this layer — see [`crate::io::ReadOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawRead {
    Key(KeyCode),
    Idle,
}

/// Outcome of one `GetKey` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Key(KeyCode),
    Idle,
}

enum FindKeyResult {
    Key(KeyCode),
    Idle,
    /// A mapping expanded and pushed its replacement back; the caller
    /// should call `find_key` again.
    Expanded,
}

pub struct KuiContext {
    source: Source,
    timeout: Duration,
    pushback: VecDeque<KeyCode>,
    map_sets: Vec<MappingSet>,
    lookahead_max: usize,
}

impl KuiContext {
    /// A context that reads directly from a terminal fd.
    pub fn from_fd(fd: RawFd, timeout: Duration, lookahead_max: usize) -> Self {
        Self {
            source: Source::Fd(fd),
            timeout,
            pushback: VecDeque::new(),
            map_sets: Vec::new(),
            lookahead_max,
        }
    }

    /// A context whose upstream is another context.
    pub fn chained(upstream: Rc<RefCell<KuiContext>>, timeout: Duration, lookahead_max: usize) -> Self {
        Self {
            source: Source::Chained(upstream),
            timeout,
            pushback: VecDeque::new(),
            map_sets: Vec::new(),
            lookahead_max,
        }
    }

    /// Append a mapping set. Last-registered set wins ties when two sets
    /// complete a match of the same length in the same `FindKey` pass.
    pub fn add_map_set(&mut self, set: MappingSet) {
        self.map_sets.push(set);
    }

    pub fn map_sets(&self) -> &[MappingSet] {
        &self.map_sets
    }

    /// True if a key is available without blocking: either pushback is
    /// non-empty, or (for a chained context) the upstream reports the
    /// same. Never touches the fd — this is a non-speculative check.
    pub fn can_get_key(&self) -> bool {
        if !self.pushback.is_empty() {
            return true;
        }
        match &self.source {
            Source::Fd(_) => false,
            Source::Chained(up) => up.borrow().can_get_key(),
        }
    }

    /// Repeat `find_key` until it yields a key or goes idle.
    pub fn get_key(&mut self) -> Result<KeyResult> {
        loop {
            match self.find_key()? {
                FindKeyResult::Key(k) => return Ok(KeyResult::Key(k)),
                FindKeyResult::Idle => return Ok(KeyResult::Idle),
                FindKeyResult::Expanded => continue,
            }
        }
    }

    fn root_fd(&self) -> RawFd {
        match &self.source {
            Source::Fd(fd) => *fd,
            Source::Chained(up) => up.borrow().root_fd(),
        }
    }

    fn next_raw(&mut self) -> Result<RawRead> {
        if let Some(k) = self.pushback.pop_front() {
            return Ok(RawRead::Key(k));
        }
        match &self.source {
            Source::Fd(fd) => match io::read_key(*fd, self.timeout)? {
                ReadOutcome::Key(k) => Ok(RawRead::Key(k)),
                ReadOutcome::Idle | ReadOutcome::Eof => Ok(RawRead::Idle),
            },
            Source::Chained(upstream) => {
                let ready_now = upstream.borrow().can_get_key();
                if ready_now {
                    return match upstream.borrow_mut().get_key()? {
                        KeyResult::Key(k) => Ok(RawRead::Key(k)),
                        KeyResult::Idle => Ok(RawRead::Idle),
                    };
                }
                let fd = upstream.borrow().root_fd();
                if io::data_ready(fd, self.timeout)? {
                    match upstream.borrow_mut().get_key()? {
                        KeyResult::Key(k) => Ok(RawRead::Key(k)),
                        KeyResult::Idle => Ok(RawRead::Idle),
                    }
                } else {
                    Ok(RawRead::Idle)
                }
            }
        }
    }

    /// One pass of the longest-match algorithm across every mapping set
    /// this context owns. See `crate::mapset::Matcher::feed` for the
    /// per-set matching rule this drives.
    fn find_key(&mut self) -> Result<FindKeyResult> {
        let mut matchers: Vec<_> = self.map_sets.iter().map(|s| s.matcher()).collect();
        let mut lookahead: Vec<KeyCode> = Vec::new();

        loop {
            let raw = self.next_raw()?;
            let key = match raw {
                RawRead::Idle => break,
                RawRead::Key(k) => k,
            };
            if lookahead.len() >= self.lookahead_max {
                return Err(Error::exhausted("lookahead buffer exceeded configured maximum"));
            }
            let position = lookahead.len();
            lookahead.push(key);
            for matcher in matchers.iter_mut() {
                if matcher.state() == MatchState::StillLooking {
                    matcher.feed(key, position)?;
                }
            }
            if !matchers.iter().any(|m| m.state() == MatchState::StillLooking) {
                break;
            }
        }

        if lookahead.is_empty() {
            return Ok(FindKeyResult::Idle);
        }

        for matcher in matchers.iter_mut() {
            matcher.finalize();
        }

        // Last-registered mapping set wins a tie between two completed
        // matches, so scan in reverse.
        let winner = matchers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, m)| m.state() == MatchState::Found);

        match winner {
            Some((set_idx, matcher)) => {
                let mapping = matcher
                    .matched()
                    .expect("Found state always carries a matched mapping");
                trace!(set = set_idx, trigger = %mapping.trigger(), "mapping expanded");
                let consumed = mapping.trigger().len();
                for &k in lookahead[consumed..].iter().rev() {
                    self.pushback.push_front(k);
                }
                for &k in mapping.replacement().as_slice().iter().rev() {
                    self.pushback.push_front(k);
                }
                Ok(FindKeyResult::Expanded)
            }
            None => {
                for &k in lookahead[1..].iter().rev() {
                    self.pushback.push_front(k);
                }
                Ok(FindKeyResult::Key(lookahead[0]))
            }
        }
    }
}
