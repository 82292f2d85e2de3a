//! Adaptive frame-depth controller.
//!
//! Mirrors `jb_hit`/`jb_miss`/`jb_frame_inc` from the original: the buffer
//! grows by one frame the instant a read misses, and only shrinks after a
//! long streak of clean reads, so depth reacts to loss quickly but backs off
//! cautiously.

use crate::{
    constants::{BITRATE_HINT_KBPS, PERIOD_LEN, SHRINK_GOOD_STREAK},
    session::MediaSession,
};

/// Tracks the buffer's current target frame depth and the hit/miss streak
/// that drives it up or down.
pub struct DepthController {
    frame_len: u32,
    min_frame_len: u32,
    max_frame_len: u32,
    highest_frame_len: u32,
    good_streak: u32,
    samples_this_period: u32,
    video: bool,
    unmanageable: bool,
}

impl DepthController {
    /// Creates a controller starting at `min_frame_len`.
    #[must_use]
    pub fn new(min_frame_len: u32, max_frame_len: u32, video: bool) -> Self {
        Self {
            frame_len: min_frame_len,
            min_frame_len,
            max_frame_len,
            highest_frame_len: min_frame_len,
            good_streak: 0,
            samples_this_period: 0,
            video,
            unmanageable: false,
        }
    }

    /// Current target frame depth.
    #[must_use]
    pub fn frame_len(&self) -> u32 {
        self.frame_len
    }

    /// Highest frame depth ever reached by this controller.
    #[must_use]
    pub fn highest_frame_len(&self) -> u32 {
        self.highest_frame_len
    }

    /// Configured floor.
    #[must_use]
    pub fn min_frame_len(&self) -> u32 {
        self.min_frame_len
    }

    /// Configured ceiling.
    #[must_use]
    pub fn max_frame_len(&self) -> u32 {
        self.max_frame_len
    }

    /// Resets the min/max floor and ceiling, clamping the current depth into
    /// the new range.
    pub fn set_frames(&mut self, min: u32, max: u32) {
        self.min_frame_len = min;
        self.max_frame_len = max.max(min);
        self.frame_len = self.frame_len.clamp(self.min_frame_len, self.max_frame_len);
        self.highest_frame_len = self.highest_frame_len.max(self.frame_len);
    }

    /// Records a successful read: extends the good streak, and shrinks by
    /// one frame once a full clean period has elapsed.
    pub fn hit(&mut self, session: &dyn MediaSession) {
        self.good_streak += 1;
        self.samples_this_period += 1;

        if self.samples_this_period >= PERIOD_LEN {
            if self.good_streak >= SHRINK_GOOD_STREAK {
                self.frame_inc(-1, session);
            }
            self.good_streak = 0;
            self.samples_this_period = 0;
        }
    }

    /// Records a missed read: breaks the good streak and grows by one
    /// frame immediately.
    pub fn miss(&mut self, session: &dyn MediaSession) {
        self.good_streak = 0;
        self.samples_this_period = 0;
        self.frame_inc(1, session);
    }

    /// Adjusts `frame_len` by `delta` (expected to be -1, 0, or 1), clamped
    /// to `[min_frame_len, max_frame_len]`, and notifies `session` of a
    /// bitrate-hint change when the depth crosses away from or back to the
    /// floor.
    pub fn frame_inc(&mut self, delta: i32, session: &dyn MediaSession) {
        let next = (i64::from(self.frame_len) + i64::from(delta))
            .clamp(i64::from(self.min_frame_len), i64::from(self.max_frame_len));
        self.frame_len = next as u32;
        self.highest_frame_len = self.highest_frame_len.max(self.frame_len);

        if !self.video {
            return;
        }

        let now_unmanageable = self.frame_len > self.min_frame_len;
        if now_unmanageable != self.unmanageable {
            self.unmanageable = now_unmanageable;
            session.set_bitrate_hint(now_unmanageable, BITRATE_HINT_KBPS * 1000);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_util::RecordingSession;

    #[test]
    fn miss_grows_depth_immediately() {
        let session = RecordingSession::default();
        let mut depth = DepthController::new(2, 10, false);
        depth.miss(&session);
        assert_eq!(depth.frame_len(), 3);
    }

    #[test]
    fn growth_is_clamped_to_max() {
        let session = RecordingSession::default();
        let mut depth = DepthController::new(2, 3, false);
        depth.miss(&session);
        depth.miss(&session);
        assert_eq!(depth.frame_len(), 3);
    }

    #[test]
    fn shrink_requires_a_full_clean_period() {
        let session = RecordingSession::default();
        let mut depth = DepthController::new(2, 10, false);
        depth.miss(&session);
        assert_eq!(depth.frame_len(), 3);

        for _ in 0..crate::constants::PERIOD_LEN - 1 {
            depth.hit(&session);
        }
        assert_eq!(depth.frame_len(), 3, "period not yet elapsed");

        depth.hit(&session);
        assert_eq!(depth.frame_len(), 2, "full clean period shrinks by one");
    }

    #[test]
    fn shrink_does_not_happen_after_a_bad_period() {
        let session = RecordingSession::default();
        let mut depth = DepthController::new(2, 10, false);
        depth.miss(&session);

        for _ in 0..crate::constants::PERIOD_LEN / 2 {
            depth.hit(&session);
        }
        depth.miss(&session);
        for _ in 0..crate::constants::PERIOD_LEN / 2 {
            depth.hit(&session);
        }
        assert_eq!(depth.frame_len(), 4, "streak reset by the mid-period miss");
    }

    #[test]
    fn video_depth_growth_raises_bitrate_hint() {
        let session = RecordingSession::default();
        let mut depth = DepthController::new(2, 10, true);
        depth.miss(&session);
        assert_eq!(
            session
                .bitrate_sets
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
        assert!(session
            .unmanageable
            .load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn audio_depth_growth_never_touches_bitrate_hint() {
        let session = RecordingSession::default();
        let mut depth = DepthController::new(2, 10, false);
        depth.miss(&session);
        assert_eq!(
            session
                .bitrate_sets
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
