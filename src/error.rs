//! Crate-wide error taxonomy.
//!
//! Callers (the command layer) branch on [`ErrorKind`] to pick a user-facing
//! message; the fine-grained variants carry enough detail for logging.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All failures surfaced by registry, cache and feed operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The profile triple is already bound by a different user.
    #[error("handle is already bound by another user")]
    AlreadyBoundToOther,

    /// The caller already holds this profile triple.
    #[error("handle is already bound by this user")]
    AlreadyBoundToSelf,

    /// Bind-time verification found no such profile upstream (HTTP 404).
    #[error("profile does not exist upstream")]
    ProfileNotFound,

    /// A 1-based selector fell outside the owner's handle list.
    #[error("selection {given} is out of range 1..={len}")]
    IndexOutOfRange { given: usize, len: usize },

    /// The owner has handles, but none is marked active.
    #[error("no active handle set")]
    NoActiveHandle,

    /// The owner has no handles at all.
    #[error("no handles bound")]
    NoHandles,

    /// A handle string or triple component failed validation.
    #[error("malformed handle: {0}")]
    InvalidHandle(String),

    /// An upstream HTTP dependency failed or answered with an
    /// unexpected status.
    #[error("upstream service unavailable")]
    Upstream(#[source] anyhow::Error),

    /// The persistent store failed.
    #[error("storage failure")]
    Store(#[source] anyhow::Error),
}

/// Coarse error classes the command layer maps to user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidArgument,
    UpstreamUnavailable,
    NoActiveState,
    Internal,
}

impl Error {
    /// Wrap an upstream transport/protocol failure.
    pub fn upstream(err: impl Into<anyhow::Error>) -> Self {
        Self::Upstream(err.into())
    }

    /// Wrap a storage-backend failure.
    pub fn store(err: impl Into<anyhow::Error>) -> Self {
        Self::Store(err.into())
    }

    /// Coarse class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProfileNotFound => ErrorKind::NotFound,
            Self::AlreadyBoundToOther | Self::AlreadyBoundToSelf => ErrorKind::Conflict,
            Self::IndexOutOfRange { .. } | Self::InvalidHandle(_) => ErrorKind::InvalidArgument,
            Self::Upstream(_) => ErrorKind::UpstreamUnavailable,
            Self::NoActiveHandle | Self::NoHandles => ErrorKind::NoActiveState,
            Self::Store(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_taxonomy() {
        assert_eq!(Error::AlreadyBoundToOther.kind(), ErrorKind::Conflict);
        assert_eq!(Error::AlreadyBoundToSelf.kind(), ErrorKind::Conflict);
        assert_eq!(Error::ProfileNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::IndexOutOfRange { given: 3, len: 2 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(Error::NoHandles.kind(), ErrorKind::NoActiveState);
        assert_eq!(Error::NoActiveHandle.kind(), ErrorKind::NoActiveState);
        assert_eq!(
            Error::upstream(anyhow::anyhow!("boom")).kind(),
            ErrorKind::UpstreamUnavailable
        );
        assert_eq!(
            Error::store(anyhow::anyhow!("boom")).kind(),
            ErrorKind::Internal
        );
    }
}
