//! Jitter buffer error handling.

use std::{error::Error, fmt};

/// Convenience type for jitter buffer read results.
pub type Result<T> = std::result::Result<T, JitterError>;

/// Non-success outcomes of [`JitterBuffer::get_packet`].
///
/// Put operations never fail: the write path drops the oldest frame under
/// pressure rather than rejecting a packet. Only the read path can report
/// one of these.
///
/// [`JitterBuffer::get_packet`]: crate::JitterBuffer::get_packet
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum JitterError {
    /// The buffer has not yet accumulated `frame_len` complete frames.
    /// The caller should wait and try again.
    MoreData,
    /// The expected packet is missing and not recoverable right now. Audio
    /// callers should perform packet-loss concealment; video callers should
    /// wait for a future read to recover via resync.
    NotFound,
    /// The buffer reset itself internally after detecting a stream
    /// discontinuity. The caller should re-synchronise (e.g. request a new
    /// keyframe out-of-band) and retry.
    Restart,
}

impl fmt::Display for JitterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JitterError::MoreData => write!(f, "jitter buffer is still filling"),
            JitterError::NotFound => write!(f, "expected packet is missing"),
            JitterError::Restart => write!(f, "jitter buffer was reset, caller must resync"),
        }
    }
}

impl Error for JitterError {}
