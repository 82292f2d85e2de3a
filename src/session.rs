//! The abstract session/channel collaborator.
//!
//! The original jitter buffer reaches directly into a media session and its
//! channel to request keyframes and push bitrate-change messages. Session
//! and channel objects themselves are out of scope for this crate (see
//! `SPEC_FULL.md` §1); callers implement [`MediaSession`] to receive the two
//! events the jitter buffer can raise.

/// Sink for the handful of out-of-band signals a video jitter buffer needs
/// to raise against its owning media session.
pub trait MediaSession: Send + Sync {
    /// Called when the read path cannot locate an expected packet (or a
    /// resync occurs) and the decoder will need a fresh keyframe to recover.
    fn request_keyframe(&self) {}

    /// Called when the depth controller's `frame_len` departs from its
    /// floor (`min_frame_len`), with `unmanageable = true`, or returns to it,
    /// with `unmanageable = false`. While `true`, the session should avoid
    /// further bitrate increases.
    ///
    /// `bitrate_bps` carries a requested cap (only meaningful alongside
    /// `unmanageable = true`).
    fn set_bitrate_hint(&self, unmanageable: bool, bitrate_bps: u32) {
        let _ = (unmanageable, bitrate_bps);
    }
}

/// A [`MediaSession`] that ignores every event, for tests and for callers
/// that don't need keyframe/bitrate signalling.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSession;

impl MediaSession for NullSession {}

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    use super::MediaSession;

    /// Records how many times each event fired, for assertions in tests.
    #[derive(Default)]
    pub struct RecordingSession {
        pub keyframe_requests: AtomicUsize,
        pub bitrate_sets: AtomicUsize,
        pub last_bitrate_bps: AtomicU32,
        pub unmanageable: std::sync::atomic::AtomicBool,
    }

    impl MediaSession for RecordingSession {
        fn request_keyframe(&self) {
            self.keyframe_requests.fetch_add(1, Ordering::SeqCst);
        }

        fn set_bitrate_hint(&self, unmanageable: bool, bitrate_bps: u32) {
            self.bitrate_sets.fetch_add(1, Ordering::SeqCst);
            self.last_bitrate_bps.store(bitrate_bps, Ordering::SeqCst);
            self.unmanageable.store(unmanageable, Ordering::SeqCst);
        }
    }
}
