//! Packet and header types accepted by the jitter buffer.
//!
//! RTP parsing/framing itself is out of scope for this crate: callers are
//! expected to have already demuxed a wire packet (e.g. via `discortp`) into
//! an [`RtpHeader`] and a payload before calling [`JitterBuffer::put_packet`].
//!
//! [`JitterBuffer::put_packet`]: crate::JitterBuffer::put_packet

use std::num::Wrapping;

use bytes::Bytes;

use crate::constants::WRAP_BOUNDARY;

/// A 16-bit RTP sequence number, wrapping on overflow.
pub type RtpSequence = Wrapping<u16>;

/// A 32-bit RTP timestamp, wrapping on overflow.
pub type RtpTimestamp = Wrapping<u32>;

/// The header fields of one RTP packet that the jitter buffer cares about.
///
/// Fields are retained exactly as handed to this crate -- no byte-order
/// conversion happens internally. Comparisons between headers are always
/// done via wrapping arithmetic, never by re-deriving host order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RtpHeader {
    /// Sequence number of this packet.
    pub sequence: RtpSequence,
    /// Timestamp of this packet, at the media clock rate of the stream.
    pub timestamp: RtpTimestamp,
    /// Marker bit. Conventionally set on the last packet of a video frame.
    pub marker: bool,
    /// RTP payload type.
    pub payload_type: u8,
    /// Synchronization source identifier.
    pub ssrc: u32,
}

impl RtpHeader {
    /// Builds a header with all non-sequence/timestamp fields zeroed, useful
    /// for tests and for callers that don't track payload type/SSRC.
    #[must_use]
    pub fn new(sequence: u16, timestamp: u32) -> Self {
        Self {
            sequence: Wrapping(sequence),
            timestamp: Wrapping(timestamp),
            marker: false,
            payload_type: 0,
            ssrc: 0,
        }
    }

    /// Builder-style setter for the marker bit.
    #[must_use]
    pub fn with_marker(mut self, marker: bool) -> Self {
        self.marker = marker;
        self
    }
}

/// One buffered RTP packet: header plus payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoredPacket {
    /// This packet's header.
    pub header: RtpHeader,
    /// Raw payload bytes, exactly as received.
    pub body: Bytes,
}

/// Returns whether `candidate` is a legitimate forward step from `previous`,
/// honouring 16-bit wraparound: a jump from just below [`u16::MAX`] down to a
/// small value near zero counts as forward motion, not a step backward.
#[must_use]
pub fn seq_is_forward(previous: RtpSequence, candidate: RtpSequence) -> bool {
    candidate.0 > previous.0 || (previous.0 > u16::MAX - WRAP_BOUNDARY && candidate.0 <= WRAP_BOUNDARY)
}

/// Returns whether `candidate` sits strictly ahead of `previous` in the
/// 32-bit timestamp space, honouring wraparound: the standard "is this
/// sequence number newer" comparison applied to RTP timestamps, treating
/// half the timestamp space as "ahead" and the other half as "behind".
#[must_use]
pub fn ts_is_forward(previous: RtpTimestamp, candidate: RtpTimestamp) -> bool {
    candidate.0 != previous.0 && candidate.0.wrapping_sub(previous.0) < (1 << 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_step_is_detected() {
        assert!(seq_is_forward(Wrapping(10), Wrapping(11)));
        assert!(!seq_is_forward(Wrapping(11), Wrapping(10)));
    }

    #[test]
    fn wraparound_counts_as_forward() {
        assert!(seq_is_forward(Wrapping(u16::MAX - 2), Wrapping(1)));
        assert!(seq_is_forward(Wrapping(u16::MAX), Wrapping(0)));
        assert!(!seq_is_forward(Wrapping(u16::MAX - 200), Wrapping(1)));
    }

    #[test]
    fn ts_forward_step_is_detected() {
        assert!(ts_is_forward(Wrapping(1000), Wrapping(1160)));
        assert!(!ts_is_forward(Wrapping(1160), Wrapping(1000)));
        assert!(!ts_is_forward(Wrapping(1000), Wrapping(1000)));
    }

    #[test]
    fn ts_wraparound_counts_as_forward() {
        assert!(ts_is_forward(Wrapping(u32::MAX - 10), Wrapping(5)));
        assert!(!ts_is_forward(Wrapping(5), Wrapping(u32::MAX - 10)));
    }
}
