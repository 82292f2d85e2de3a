//! Runtime behaviour flags.

use bitflags::bitflags;

bitflags! {
    /// Behaviour toggles settable at any time via
    /// [`JitterBuffer::set_flag`](crate::JitterBuffer::set_flag) /
    /// [`JitterBuffer::clear_flag`](crate::JitterBuffer::clear_flag).
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct JitterFlags: u32 {
        /// Packets are queued and reordered but never handed back via
        /// `get_packet`; useful for feeding a NACK generator off a stream
        /// the caller reads some other way.
        const QUEUE_ONLY = 1 << 0;
        /// Suppresses keyframe requests that would otherwise fire when the
        /// read path can't locate an expected packet.
        const NO_KEYFRAME_REQUESTS = 1 << 1;
    }
}
