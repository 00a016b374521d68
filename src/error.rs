//! Error kinds shared across the engine.
//!
//! Every fallible operation in `kui_engine` returns a `Result<_, Error>`;
//! there is no panic path for conditions this crate classifies as
//! recoverable. Timeouts are never errors — see [`crate::io::ReadOutcome`].

use thiserror::Error;

/// The failure modes the engine can report, grouped the way the design
/// classifies them rather than by the module that happens to raise them.
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied argument violates a documented precondition:
    /// an empty or malformed key-syntax string, a zero key fed to the
    /// matcher, a negative lookahead position, and similar.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded resource was exceeded — the lookahead buffer grew past
    /// its configured cap, or an allocation failed.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The fd-read or data-ready collaborator reported a hard I/O error.
    #[error("upstream I/O error: {0}")]
    UpstreamIo(#[from] std::io::Error),

    /// A deregister call named a trigger that is not present in the set.
    #[error("mapping not present")]
    NotPresent,

    /// The matcher or container detected a state it should never reach:
    /// `Feed` called while not `StillLooking`, an entry with an empty
    /// trigger, or the sorted invariant broken.
    #[error("internal invariant violation: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    pub(crate) fn exhausted(msg: impl Into<String>) -> Self {
        Error::ResourceExhausted(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
