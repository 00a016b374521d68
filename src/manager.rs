//! Component E: the KUI manager — the two-stage cascade applications
//! actually talk to.
//!
//! Wires a terminal-decoding [`KuiContext`] (fixed escape-sequence table,
//! owns the real fd) as the upstream of a user-macro `KuiContext` (empty
//! mapping-set list at construction; callers register their own via
//! [`KuiManager::add_map_set`]). The terminal context is shared through
//! `Rc<RefCell<_>>` rather than threaded through as a borrowed reference:
//! the user context's upstream needs a handle it can call back into on
//! every `next_raw`, and Rust has no way to express "the user context
//! borrows the terminal context for its whole lifetime" without also
//! preventing the manager from holding both at once. Shared, reference-
//! counted interior mutability is the idiomatic way out of that
//! self-referential-struct corner, not a design smell.

use std::cell::RefCell;
use std::os::unix::io::RawFd;
use std::rc::Rc;

use crate::config::Config;
use crate::context::{KeyResult, KuiContext};
use crate::error::Result;
use crate::mapset::MappingSet;
use crate::terminfo;

pub struct KuiManager {
    terminal: Rc<RefCell<KuiContext>>,
    user: KuiContext,
}

impl KuiManager {
    /// Build a manager reading raw bytes from `fd`, with the built-in
    /// terminal key database pre-loaded as the terminal context's sole
    /// mapping set.
    pub fn create(fd: RawFd, config: &Config) -> Self {
        let mut terminal_ctx = KuiContext::from_fd(
            fd,
            config.terminal_read_timeout(),
            config.lookahead_max(),
        );
        terminal_ctx.add_map_set(terminfo::terminal_mappings());
        let terminal = Rc::new(RefCell::new(terminal_ctx));

        let user = KuiContext::chained(
            Rc::clone(&terminal),
            config.user_read_timeout(),
            config.lookahead_max(),
        );

        Self { terminal, user }
    }

    /// Register a user-macro mapping set. Sets added later win ties
    /// against sets added earlier.
    pub fn add_map_set(&mut self, set: MappingSet) {
        self.user.add_map_set(set);
    }

    pub fn get_map_sets(&self) -> &[MappingSet] {
        self.user.map_sets()
    }

    /// True if the next `get_key` call is guaranteed not to block.
    pub fn can_get_key(&self) -> bool {
        self.user.can_get_key()
    }

    /// Decode and expand the next logical key, cascading through the
    /// terminal layer first.
    pub fn get_key(&mut self) -> Result<KeyResult> {
        self.user.get_key()
    }

    /// Access the terminal-layer context directly — used by `kui-probe`
    /// to report raw vs. decoded key counts separately.
    pub fn terminal_context(&self) -> &Rc<RefCell<KuiContext>> {
        &self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keycode::{symbolic, KeyCode};
    use crate::mapping::Mapping;
    use std::os::unix::io::{AsRawFd, FromRawFd};
    use std::time::Duration;

    fn pipe() -> (std::fs::File, std::fs::File) {
        let mut fds = [0 as libc::c_int; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        unsafe { (std::fs::File::from_raw_fd(fds[0]), std::fs::File::from_raw_fd(fds[1])) }
    }

    #[test]
    fn cascade_decodes_escape_then_expands_user_macro() {
        let (r, w) = pipe();
        crate::io::write_all(w.as_raw_fd(), b"\x1b[A").unwrap();

        let config = Config::builder()
            .terminal_read_timeout(Duration::from_millis(60))
            .user_read_timeout(Duration::from_millis(200))
            .build();
        let mut manager = KuiManager::create(r.as_raw_fd(), &config);

        let mut user_set = MappingSet::new();
        user_set.register_mapping(
            Mapping::from_sequences(
                crate::keycode::KeySequence::single(symbolic::UP),
                crate::keycode::KeySequence::new(vec![b'G' as KeyCode]),
                "<Up>",
                "G",
            )
            .unwrap(),
        );
        manager.add_map_set(user_set);

        assert_eq!(manager.get_key().unwrap(), KeyResult::Key(b'G' as KeyCode));
    }

    #[test]
    fn unmapped_raw_byte_passes_through_both_layers() {
        let (r, w) = pipe();
        crate::io::write_all(w.as_raw_fd(), b"q").unwrap();
        let config = Config::default();
        let mut manager = KuiManager::create(r.as_raw_fd(), &config);
        assert_eq!(manager.get_key().unwrap(), KeyResult::Key(b'q' as KeyCode));
    }
}
