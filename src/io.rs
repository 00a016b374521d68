//! External fd read / data-ready collaborators.
//!
//! A blocking `libc::poll` with a bounded timeout, EINTR retried rather
//! than surfaced, followed by a `libc::read` of exactly one byte. One
//! byte at a time keeps the matcher's `position` bookkeeping simple and
//! matches how a terminal fd in raw mode actually delivers bytes — there
//! is no framing to batch on.

use std::os::unix::io::RawFd;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::keycode::KeyCode;

/// Outcome of a single timed read attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A byte arrived within the timeout.
    Key(KeyCode),
    /// The timeout elapsed with nothing to read. Not an error.
    Idle,
    /// The fd reached end-of-file.
    Eof,
}

/// Poll `fd` for readability within `timeout`, retrying on `EINTR`, then
/// read a single byte if one is ready.
///
/// A `timeout` of zero polls non-blockingly. An elapsed timeout and an
/// EOF-on-read both collapse to the caller seeing "nothing more to read
/// right now" at the `next_raw` layer — see [`crate::context`] — but are
/// kept distinct here since EOF is a one-time terminal condition while
/// an idle timeout recurs.
pub fn read_key(fd: RawFd, timeout: Duration) -> Result<ReadOutcome> {
    if !poll_readable(fd, timeout)? {
        return Ok(ReadOutcome::Idle);
    }
    let mut buf = [0u8; 1];
    loop {
        let n = unsafe { libc::read(fd, buf.as_mut_ptr() as *mut libc::c_void, 1) };
        if n > 0 {
            return Ok(ReadOutcome::Key(buf[0] as KeyCode));
        }
        if n == 0 {
            return Ok(ReadOutcome::Eof);
        }
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            continue;
        }
        return Err(err.into());
    }
}

/// Non-speculative readiness probe: true if `fd` has data ready within
/// `timeout`, without consuming it.
pub fn data_ready(fd: RawFd, timeout: Duration) -> Result<bool> {
    poll_readable(fd, timeout)
}

fn poll_readable(fd: RawFd, timeout: Duration) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let millis = remaining.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        let rc = unsafe { libc::poll(&mut pfd, 1, millis) };
        if rc > 0 {
            return Ok(pfd.revents & (libc::POLLIN | libc::POLLHUP) != 0);
        }
        if rc == 0 {
            return Ok(false);
        }
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            if Instant::now() >= deadline {
                return Ok(false);
            }
            continue;
        }
        return Err(err.into());
    }
}

/// Write raw bytes to `fd`, retrying on short writes and `EINTR`. Used
/// by `kui-probe` to echo replacement sequences it does not consume
/// itself.
pub fn write_all(fd: RawFd, mut buf: &[u8]) -> Result<()> {
    while !buf.is_empty() {
        let n = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if n > 0 {
            buf = &buf[n as usize..];
            continue;
        }
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::Interrupted {
            continue;
        }
        return Err(err.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn reads_a_byte_written_to_a_pipe() {
        let (r, w) = pipe();
        write_all(w.as_raw_fd(), b"x").unwrap();
        let out = read_key(r.as_raw_fd(), Duration::from_millis(200)).unwrap();
        assert_eq!(out, ReadOutcome::Key(b'x' as KeyCode));
    }

    #[test]
    fn idle_on_empty_pipe() {
        let (r, _w) = pipe();
        let out = read_key(r.as_raw_fd(), Duration::from_millis(20)).unwrap();
        assert_eq!(out, ReadOutcome::Idle);
    }

    #[test]
    fn eof_when_writer_dropped() {
        let (r, w) = pipe();
        drop(w);
        let out = read_key(r.as_raw_fd(), Duration::from_millis(200)).unwrap();
        assert_eq!(out, ReadOutcome::Eof);
    }

    fn pipe() -> (std::fs::File, std::fs::File) {
        use std::os::unix::io::FromRawFd;
        let mut fds = [0 as libc::c_int; 2];
        let rc = unsafe { libc::pipe(fds.as_mut_ptr()) };
        assert_eq!(rc, 0);
        unsafe { (std::fs::File::from_raw_fd(fds[0]), std::fs::File::from_raw_fd(fds[1])) }
    }
}
