//! Common helper functions for tests and benchmarks.

use kui_engine::config::Config;
use kui_engine::mapset::MappingSet;
use std::time::Duration;

/// Build a [`MappingSet`] from `(trigger_text, replacement_text)` pairs.
pub fn mapping_set(pairs: &[(&str, &str)]) -> MappingSet {
    let mut set = MappingSet::new();
    for (trigger, replacement) in pairs {
        set.register(trigger, replacement)
            .unwrap_or_else(|e| panic!("failed to register {trigger:?}={replacement:?}: {e}"));
    }
    set
}

/// A `Config` tuned for fast, deterministic tests: short timeouts so a
/// test never waits the production defaults' full second for idle.
pub fn dummy_config(terminal_timeout: Duration, user_timeout: Duration) -> Config {
    Config::builder()
        .terminal_read_timeout(terminal_timeout)
        .user_read_timeout(user_timeout)
        .build()
}

/// Create a connected pipe `(read_end, write_end)` for feeding raw bytes
/// into a `KuiContext`/`KuiManager` under test without a real terminal.
pub fn pipe() -> (std::fs::File, std::fs::File) {
    use std::os::unix::io::FromRawFd;
    let mut fds = [0 as libc::c_int; 2];
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0, "pipe(2) failed");
    unsafe { (std::fs::File::from_raw_fd(fds[0]), std::fs::File::from_raw_fd(fds[1])) }
}

/// Write `bytes` into `write_end` so they're immediately available to a
/// reader on the matching read end.
pub fn feed(write_end: &std::fs::File, bytes: &[u8]) {
    use std::os::unix::io::AsRawFd;
    kui_engine::io::write_all(write_end.as_raw_fd(), bytes).expect("write_all into test pipe");
}
