//! Construction-time configuration for a [`JitterBuffer`](crate::JitterBuffer).
//!
//! Follows the teacher's consuming-builder shape (see `songbird::Config`):
//! a `#[non_exhaustive]` struct with a `Default` impl and `with_*` methods
//! that take and return `Self` by value, so call sites read as
//! `Config::default().with_debug_level(2)`.

use crate::flags::JitterFlags;

/// Whether a buffer tracks frames by RTP sequence number or by timestamp.
///
/// Audio streams are read back one packet per frame and indexed by
/// sequence; video streams group packets sharing a timestamp into a frame
/// and additionally index by timestamp.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum JitterKind {
    /// One packet is one frame, read back by sequence number.
    Audio,
    /// Frames span multiple packets sharing a timestamp, read back by
    /// timestamp; enables the bitrate-hint side channel on the depth
    /// controller.
    Video,
}

/// Construction-time configuration for a [`JitterBuffer`](crate::JitterBuffer).
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Config {
    pub(crate) min_frame_len: u32,
    pub(crate) max_frame_len: u32,
    pub(crate) debug_level: u8,
    pub(crate) flags: JitterFlags,
}

impl Config {
    /// Sets the floor and ceiling of the adaptive depth controller.
    #[must_use]
    pub fn with_frames(mut self, min_frame_len: u32, max_frame_len: u32) -> Self {
        self.min_frame_len = min_frame_len;
        self.max_frame_len = max_frame_len.max(min_frame_len);
        self
    }

    /// Sets the verbosity of internal `tracing` diagnostics (0 disables
    /// buffer-specific trace spans beyond the default level).
    #[must_use]
    pub fn with_debug_level(mut self, level: u8) -> Self {
        self.debug_level = level;
        self
    }

    /// Sets the initial behaviour flags.
    #[must_use]
    pub fn with_flags(mut self, flags: JitterFlags) -> Self {
        self.flags = flags;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_frame_len: 2,
            max_frame_len: 10,
            debug_level: 0,
            flags: JitterFlags::empty(),
        }
    }
}
