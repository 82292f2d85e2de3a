//! Constants governing jitter buffer timing and thresholds.

/// Number of `get_packet` calls over which hit/miss statistics accumulate
/// before the depth controller is allowed to shrink.
pub const PERIOD_LEN: u32 = 500;

/// Extra headroom (in frames) allowed above `max_frame_len` before the
/// write path evicts the oldest buffered frame.
pub const MAX_FRAME_PADDING: u32 = 2;

/// Consecutive good reads required, out of a period of [`PERIOD_LEN`], before
/// the depth controller will shrink by one frame.
pub const SHRINK_GOOD_STREAK: u32 = PERIOD_LEN - 5;

/// Largest acceptable apparent sequence gap between writes before it is
/// treated as a stream identity change (wrap/reset) rather than loss.
pub const SEQ_RESET_GAP: i64 = 1000;

/// Largest acceptable timestamp delta (in RTP ticks) between consecutive
/// writes before a resync is forced. `900_000` ticks is five seconds at a
/// 180kHz video clock; kept as a flat constant exactly as the original.
pub const TS_RESET_GAP: i64 = 900_000 * 5;

/// Number of incremental sequence numbers the seq-mode read path will probe
/// past a miss before giving up and returning not-found.
pub const VIDEO_SEEK_AHEAD: u16 = 10;

/// Size, in sequence numbers, of the NACK follow-on bitmap (BLP).
pub const NACK_BLP_BITS: u16 = 16;

/// Video bitrate requested of the session once the depth controller grows
/// past its floor, in kilobits per second.
pub const BITRATE_HINT_KBPS: u32 = 512;

/// Top of the 16-bit sequence space, used for wraparound boundary checks.
pub const USHRT_MAX: u16 = u16::MAX;

/// Width of the "near the wrap boundary" window used when deciding whether
/// a small new sequence number is a legitimate forward step past wrap.
pub const WRAP_BOUNDARY: u16 = 10;
