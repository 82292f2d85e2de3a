//! The jitter buffer itself.
//!
//! Two `parking_lot::ReentrantMutex`es stand in for the original's two
//! locks: `buffer` guards buffer-wide bookkeeping (cursors, depth, flags),
//! `list` guards the node store and its indexes. Both are reentrant because,
//! exactly as in the original, an inner helper (e.g. eviction during a
//! write) may need to re-enter a lock already held by its caller on the
//! same thread. `RefCell` gives us interior mutability inside each guard,
//! since `parking_lot::ReentrantMutex` only ever hands out shared
//! references.

use std::{cell::RefCell, collections::HashSet};

use bytes::Bytes;
use parking_lot::ReentrantMutex;
use tracing::{debug, trace, warn};

use crate::{
    config::{Config, JitterKind},
    constants::{MAX_FRAME_PADDING, SEQ_RESET_GAP, TS_RESET_GAP, VIDEO_SEEK_AHEAD},
    depth::DepthController,
    error::{JitterError, Result},
    flags::JitterFlags,
    index::{MissingIndex, SequenceIndex, TimestampIndex},
    nack,
    node::{NodeHandle, NodeStore},
    packet::{seq_is_forward, ts_is_forward, RtpHeader, RtpSequence, RtpTimestamp, StoredPacket},
    session::{MediaSession, NullSession},
};

/// Current and configured frame-depth bounds, as reported by
/// [`JitterBuffer::get_frames`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameLens {
    /// Floor of the adaptive depth controller.
    pub min: u32,
    /// Ceiling of the adaptive depth controller.
    pub max: u32,
    /// Current target depth.
    pub current: u32,
    /// Highest depth ever reached by the adaptive controller.
    pub highest: u32,
}

/// Anchor for [`JitterBuffer::peek_frame`]: either a sequence number (seq
/// mode) or a timestamp (ts mode), shifted by the call's `offset`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PeekLocator {
    /// Anchor on a sequence number; `offset` shifts by that many sequence
    /// numbers.
    Seq(RtpSequence),
    /// Anchor on a timestamp; `offset` shifts by that many
    /// `samples_per_frame` units (see [`JitterBuffer::ts_mode`]).
    Ts(RtpTimestamp),
}

/// A non-destructive look at a buffered packet, returned by
/// [`JitterBuffer::peek_frame`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FrameSnapshot {
    /// The header of the peeked packet.
    pub header: RtpHeader,
    /// How many packets currently sit buffered alongside this one.
    pub visible_nodes: u32,
}

/// Outcome of one attempt to pick the next packet to deliver.
enum Selection {
    /// A packet was found; deliver it.
    Hit(NodeHandle),
    /// The expected packet is missing and not recoverable this attempt.
    Miss,
    /// The seek-ahead probe found a candidate that was already delivered
    /// (marker bit set, or its ts matches `highest_read_ts`); its ts group
    /// was just dropped and the caller should retry selection from the top.
    RetryStaleFrame,
}

struct ListState {
    nodes: NodeStore,
    seq_index: SequenceIndex,
    ts_index: Option<TimestampIndex>,
    missing: MissingIndex,
}

impl ListState {
    fn new() -> Self {
        Self {
            nodes: NodeStore::new(),
            seq_index: SequenceIndex::new(),
            ts_index: None,
            missing: MissingIndex::new(),
        }
    }

    fn reset(&mut self) {
        self.nodes.hide_all();
        self.seq_index.clear();
        if let Some(ts) = self.ts_index.as_mut() {
            ts.clear();
        }
        self.missing.clear();
    }

    /// Hides every visible node sharing `ts`, removing each from both
    /// indexes. `pop` is forwarded to `NodeStore::hide` (see its docs).
    fn hide_ts_group(&mut self, ts: u32, pop: bool) {
        let handles: Vec<NodeHandle> = self
            .nodes
            .iter_visible()
            .filter(|(_, packet)| packet.header.timestamp.0 == ts)
            .map(|(handle, _)| handle)
            .collect();
        for handle in handles {
            let seq = self.nodes.packet(handle).header.sequence.0;
            self.seq_index.remove(seq);
            if let Some(ts_index) = self.ts_index.as_mut() {
                ts_index.remove(ts);
            }
            self.nodes.hide(handle, pop);
        }
    }

    /// Number of distinct frames currently buffered: one per visible packet
    /// in seq mode (audio), one per distinct timestamp among visible
    /// packets in frame-grouping mode (video).
    fn frame_count(&self, video: bool) -> u32 {
        if !video {
            return self.nodes.visible_nodes();
        }
        let mut seen = HashSet::new();
        for (_, packet) in self.nodes.iter_visible() {
            seen.insert(packet.header.timestamp.0);
        }
        seen.len() as u32
    }
}

struct BufferState {
    kind: JitterKind,
    depth: DepthController,
    flags: JitterFlags,
    debug_level: u8,
    session: Box<dyn MediaSession>,
    samples_per_frame: u32,
    samples_per_second: u32,

    /// Set once the first frame's worth of packets has been seen, so a
    /// trailing short buffer below `frame_len` doesn't re-stall reads that
    /// already started flowing.
    primed: bool,
    /// Set once at least one packet has been written, gating the very first
    /// call to `verify_oldest_frame` (there is no "previous frame" yet).
    write_init: bool,

    highest_wrote_seq: Option<RtpSequence>,
    highest_wrote_ts: Option<RtpTimestamp>,
    highest_read_seq: Option<RtpSequence>,
    highest_read_ts: Option<RtpTimestamp>,

    target_seq: Option<RtpSequence>,
    target_ts: Option<RtpTimestamp>,
    pseudo_seq: RtpSequence,

    consec_miss: u32,

    /// Set when the video read path jumps forward over a missing frame;
    /// the *next* `get_packet` call resets the seq cursor, grows depth by
    /// one, and requests a keyframe before doing anything else.
    dropped: bool,

    last_read_len: usize,
}

impl BufferState {
    fn video(&self) -> bool {
        matches!(self.kind, JitterKind::Video)
    }
}

/// A reordering, depth-adapting, NACK-generating buffer for one RTP stream.
///
/// See the crate documentation for the overall model. All methods take
/// `&self`: interior locking makes the buffer usable from a single owner
/// shared across the write and read sides of a session without an external
/// `Mutex`.
pub struct JitterBuffer {
    list: ReentrantMutex<RefCell<ListState>>,
    buffer: ReentrantMutex<RefCell<BufferState>>,
}

impl JitterBuffer {
    /// Creates a buffer with default configuration beyond the given frame
    /// bounds. Equivalent to
    /// `with_config(kind, Config::default().with_frames(min, max))`.
    #[must_use]
    pub fn new(kind: JitterKind, min_frame_len: u32, max_frame_len: u32) -> Self {
        Self::with_config(kind, Config::default().with_frames(min_frame_len, max_frame_len))
    }

    /// Creates a buffer from an explicit [`Config`].
    #[must_use]
    pub fn with_config(kind: JitterKind, config: Config) -> Self {
        let video = matches!(kind, JitterKind::Video);
        Self {
            list: ReentrantMutex::new(RefCell::new(ListState::new())),
            buffer: ReentrantMutex::new(RefCell::new(BufferState {
                kind,
                depth: DepthController::new(config.min_frame_len, config.max_frame_len, video),
                flags: config.flags,
                debug_level: config.debug_level,
                session: Box::new(NullSession),
                samples_per_frame: 0,
                samples_per_second: 0,
                primed: false,
                write_init: false,
                highest_wrote_seq: None,
                highest_wrote_ts: None,
                highest_read_seq: None,
                highest_read_ts: None,
                target_seq: None,
                target_ts: None,
                pseudo_seq: std::num::Wrapping(0),
                consec_miss: 0,
                dropped: false,
                last_read_len: 0,
            })),
        }
    }

    /// Installs the session that receives keyframe requests and bitrate
    /// hints raised by this buffer.
    pub fn set_session(&self, session: Box<dyn MediaSession>) {
        self.buffer.lock().borrow_mut().session = session;
    }

    /// Switches the buffer into timestamp mode, grouping packets that share
    /// a timestamp into one frame and selecting reads by timestamp instead
    /// of by sequence number.
    pub fn ts_mode(&self, samples_per_frame: u32, samples_per_second: u32) {
        {
            let buf = self.buffer.lock();
            let mut buf = buf.borrow_mut();
            buf.samples_per_frame = samples_per_frame;
            buf.samples_per_second = samples_per_second;
        }
        let list = self.list.lock();
        let mut list = list.borrow_mut();
        if list.ts_index.is_none() {
            list.ts_index = Some(TimestampIndex::new());
        }
    }

    /// Adjusts the depth controller's floor and ceiling.
    pub fn set_frames(&self, min: u32, max: u32) {
        self.buffer.lock().borrow_mut().depth.set_frames(min, max);
    }

    /// Reports the depth controller's current bounds and target depth.
    #[must_use]
    pub fn get_frames(&self) -> FrameLens {
        let buf = self.buffer.lock();
        let buf = buf.borrow();
        FrameLens {
            min: buf.depth.min_frame_len(),
            max: buf.depth.max_frame_len(),
            current: buf.depth.frame_len(),
            highest: buf.depth.highest_frame_len(),
        }
    }

    /// Sets one or more behaviour flags.
    pub fn set_flag(&self, flag: JitterFlags) {
        self.buffer.lock().borrow_mut().flags.insert(flag);
    }

    /// Clears one or more behaviour flags.
    pub fn clear_flag(&self, flag: JitterFlags) {
        self.buffer.lock().borrow_mut().flags.remove(flag);
    }

    /// Sets the verbosity of internal `tracing` diagnostics.
    pub fn debug_level(&self, level: u8) {
        self.buffer.lock().borrow_mut().debug_level = level;
    }

    /// Drops every buffered packet and every read/write cursor, as though
    /// the buffer were freshly constructed. Does not touch configuration
    /// (frame bounds, flags, debug level, session).
    pub fn reset(&self) {
        let buf = self.buffer.lock();
        let mut buf = buf.borrow_mut();
        let list = self.list.lock();
        let mut list = list.borrow_mut();
        self.reset_locked(&mut buf, &mut list);
    }

    fn reset_locked(&self, buf: &mut BufferState, list: &mut ListState) {
        list.reset();
        buf.highest_wrote_seq = None;
        buf.highest_wrote_ts = None;
        buf.highest_read_seq = None;
        buf.highest_read_ts = None;
        buf.target_seq = None;
        buf.target_ts = None;
        buf.pseudo_seq = std::num::Wrapping(0);
        buf.consec_miss = 0;
        buf.primed = false;
        buf.write_init = false;
        buf.dropped = false;
        if buf.debug_level >= 1 {
            debug!("jitter buffer reset");
        }
    }

    /// Accepts a freshly arrived packet, detecting stream discontinuities
    /// (large sequence or timestamp jumps) and resyncing the buffer when
    /// one is seen.
    pub fn put_packet(&self, header: RtpHeader, body: Bytes) {
        self.insert(header, body, false);
    }

    /// Accepts a packet without discontinuity detection, bypassing the
    /// resync check `put_packet` performs. Intended for packets recovered
    /// out-of-band (e.g. via FEC) where a large apparent jump is expected
    /// and not a real stream restart.
    pub fn push_packet(&self, header: RtpHeader, body: Bytes) {
        self.insert(header, body, true);
    }

    fn insert(&self, header: RtpHeader, body: Bytes, force: bool) {
        let buf = self.buffer.lock();
        let mut buf = buf.borrow_mut();
        let list = self.list.lock();
        let mut list = list.borrow_mut();

        if !force && self.looks_like_restart(&buf, header) {
            if buf.debug_level >= 1 {
                warn!(seq = header.sequence.0, ts = header.timestamp.0, "stream discontinuity, resyncing");
            }
            self.reset_locked(&mut buf, &mut list);
        }

        if buf.video() && !buf.flags.contains(JitterFlags::QUEUE_ONLY) {
            self.track_missing(&buf, &mut list, header.sequence);
        }

        let seq = header.sequence.0;
        let ts = header.timestamp.0;
        let handle = list.nodes.acquire(StoredPacket { header, body });
        list.seq_index.insert(seq, handle);
        if let Some(ts_index) = list.ts_index.as_mut() {
            ts_index.insert(ts, handle);
        }

        if buf.highest_wrote_seq.map_or(true, |prev| seq_is_forward(prev, header.sequence)) {
            buf.highest_wrote_seq = Some(header.sequence);
        }

        if buf.video() {
            let is_new_ts = buf.highest_wrote_ts.map_or(true, |prev| ts_is_forward(prev, header.timestamp));
            if is_new_ts {
                let had_previous_frame = buf.write_init;
                buf.highest_wrote_ts = Some(header.timestamp);
                if had_previous_frame {
                    self.verify_oldest_frame(&mut buf, &mut list);
                }
            }
        } else {
            buf.highest_wrote_ts = Some(header.timestamp);
        }
        buf.write_init = true;

        list.nodes.sort();
        list.nodes.coalesce_free();

        self.evict_overflow(&buf, &mut list);
        if buf.debug_level >= 2 {
            trace!(seq, ts, visible = list.nodes.visible_nodes(), "packet stored");
        }
    }

    fn looks_like_restart(&self, buf: &BufferState, header: RtpHeader) -> bool {
        let seq_jump = buf.highest_wrote_seq.is_some_and(|prev| {
            let delta = i64::from(header.sequence.0) - i64::from(prev.0);
            delta.unsigned_abs() as i64 >= i64::from(buf.depth.max_frame_len())
        });
        let ts_jump = buf.highest_wrote_ts.is_some_and(|prev| {
            let delta = i64::from(header.timestamp.0) - i64::from(prev.0);
            delta.abs() > TS_RESET_GAP
        });
        seq_jump || ts_jump
    }

    /// Marks the gap between the last-known write cursor and `incoming` as
    /// missing (video only, and only when tracking isn't suppressed by
    /// `QUEUE_ONLY`). The outer `!missing || want == got` guard from the
    /// original is always true there (`missing` is read but never assigned),
    /// so this always runs the walk once a gap is detected; preserved per
    /// the open question in `SPEC_FULL.md` rather than inferring stricter
    /// intent.
    fn track_missing(&self, buf: &BufferState, list: &mut ListState, incoming: RtpSequence) {
        list.missing.resolve(incoming.0);

        let Some(prev) = buf.highest_wrote_seq else {
            return;
        };
        let want = prev.0.wrapping_add(1);
        let got = incoming.0;
        if got == want {
            return;
        }

        let gap = i64::from(want) - i64::from(got);
        let advances = seq_is_forward(std::num::Wrapping(want), std::num::Wrapping(got)) || gap.unsigned_abs() as i64 > SEQ_RESET_GAP;
        if !advances {
            return;
        }

        let mut s = want;
        while s != got {
            list.missing.mark_missing(s);
            s = s.wrapping_add(1);
        }
    }

    /// After a new frame boundary is written, checks whether the oldest
    /// buffered frame (lowest timestamp) is contiguous and terminated by a
    /// marker bit. Requests a keyframe if it can't verify a complete frame.
    /// Video only. No caller threads the three-state verification result
    /// back out; the keyframe request is the only observable effect (see
    /// `DESIGN.md`'s Open Questions for the "treat as void" reading this
    /// follows).
    fn verify_oldest_frame(&self, buf: &mut BufferState, list: &mut ListState) {
        list.nodes.sort();

        let Some(start_ts) = list.nodes.iter_visible().map(|(_, p)| p.header.timestamp.0).min() else {
            return;
        };

        let mut seqs: Vec<u16> = list
            .nodes
            .iter_visible()
            .filter(|(_, p)| p.header.timestamp.0 == start_ts)
            .map(|(_, p)| p.header.sequence.0)
            .collect();
        seqs.sort_unstable();

        let Some(&first) = seqs.first() else {
            return;
        };

        let mut expected = first;
        let mut complete = false;
        for &seq in &seqs {
            if seq != expected {
                list.missing.mark_missing(expected);
                break;
            }
            let marker = list
                .nodes
                .iter_visible()
                .any(|(_, p)| p.header.timestamp.0 == start_ts && p.header.sequence.0 == seq && p.header.marker);
            if marker {
                complete = true;
                break;
            }
            expected = expected.wrapping_add(1);
        }

        if !complete && !buf.flags.contains(JitterFlags::NO_KEYFRAME_REQUESTS) {
            buf.session.request_keyframe();
        }
    }

    /// Drops the oldest buffered frame(s) (lowest timestamp, all packets
    /// sharing it) until the buffer is back within `max_frame_len + 2`.
    fn evict_overflow(&self, buf: &BufferState, list: &mut ListState) {
        let ceiling = buf.depth.max_frame_len() + MAX_FRAME_PADDING;
        loop {
            if list.frame_count(buf.video()) <= ceiling {
                break;
            }
            let Some(ts) = list.nodes.iter_visible().map(|(_, p)| p.header.timestamp.0).min() else {
                break;
            };
            list.hide_ts_group(ts, true);
        }
        list.nodes.coalesce_free();
    }

    /// Pops the oldest buffered packet in delivery order (by sequence
    /// number in seq mode, by timestamp in ts mode).
    ///
    /// Returns [`JitterError::MoreData`] while the buffer has not yet
    /// accumulated a first full frame's worth of packets,
    /// [`JitterError::NotFound`] when the next expected packet is known to
    /// be missing and not recoverable, and [`JitterError::Restart`] when a
    /// miss forced an internal resync.
    pub fn get_packet(&self) -> Result<StoredPacket> {
        let buf = self.buffer.lock();
        let mut buf = buf.borrow_mut();
        let list = self.list.lock();
        let mut list = list.borrow_mut();

        if buf.dropped {
            self.apply_dropped_recovery(&mut buf);
        }

        if !buf.primed {
            if list.frame_count(buf.video()) < buf.depth.frame_len() {
                return Err(JitterError::MoreData);
            }
            buf.primed = true;
        }

        let ts_mode = list.ts_index.is_some();

        for _ in 0..4 {
            let selection = if ts_mode {
                self.select_ts(&mut buf, &mut list)
            } else {
                self.select_seq(&mut buf, &mut list)
            };

            match selection {
                Selection::Hit(handle) => return Ok(self.deliver(&mut buf, &mut list, handle, ts_mode)),
                Selection::RetryStaleFrame => {
                    self.apply_dropped_recovery(&mut buf);
                    continue;
                },
                Selection::Miss => return self.handle_miss(&mut buf, &mut list),
            }
        }

        self.handle_miss(&mut buf, &mut list)
    }

    /// Clears the "dropped a stale already-delivered frame" state: resets
    /// the seq cursor so the next selection starts from the lowest visible
    /// packet, grows depth by one, and requests a keyframe. Mirrors the
    /// original's handling at the top of its read-selection loop whenever a
    /// same-frame drop was just flagged.
    fn apply_dropped_recovery(&self, buf: &mut BufferState) {
        buf.dropped = false;
        buf.target_seq = None;
        buf.depth.frame_inc(1, buf.session.as_ref());
        if buf.video() && !buf.flags.contains(JitterFlags::NO_KEYFRAME_REQUESTS) {
            buf.session.request_keyframe();
        }
    }

    fn select_seq(&self, buf: &mut BufferState, list: &mut ListState) -> Selection {
        let Some(target) = buf.target_seq else {
            return match list.nodes.iter_visible().min_by_key(|(_, p)| p.header.sequence.0) {
                Some((handle, _)) => Selection::Hit(handle),
                None => Selection::Miss,
            };
        };

        if let Some(handle) = list.seq_index.get(target.0) {
            return Selection::Hit(handle);
        }

        if !buf.video() {
            buf.target_seq = Some(std::num::Wrapping(target.0.wrapping_add(1)));
            return Selection::Miss;
        }

        if !buf.flags.contains(JitterFlags::NO_KEYFRAME_REQUESTS) {
            buf.session.request_keyframe();
        }

        for step in 1..=VIDEO_SEEK_AHEAD {
            let candidate = target.0.wrapping_add(step);
            let Some(handle) = list.seq_index.get(candidate) else {
                continue;
            };

            let packet = list.nodes.packet(handle);
            let already_delivered = packet.header.marker
                || buf.highest_read_ts.is_some_and(|highest| packet.header.timestamp.0 == highest.0);

            if already_delivered {
                // The candidate is part of a frame that was already handed
                // back to the caller (its marker bit closed it out, or its
                // timestamp matches the last one read): drop the whole
                // stale frame rather than deliver it again.
                let ts = packet.header.timestamp.0;
                list.hide_ts_group(ts, false);
                buf.dropped = true;
                return Selection::RetryStaleFrame;
            }

            return Selection::Hit(handle);
        }

        Selection::Miss
    }

    fn select_ts(&self, buf: &mut BufferState, list: &mut ListState) -> Selection {
        let Some(target) = buf.target_ts else {
            return match list.nodes.iter_visible().min_by_key(|(_, p)| p.header.timestamp.0) {
                Some((handle, _)) => Selection::Hit(handle),
                None => Selection::Miss,
            };
        };

        let found = list.ts_index.as_ref().and_then(|ts_index| ts_index.get(target.0));
        match found {
            Some(handle) => Selection::Hit(handle),
            None => {
                buf.target_ts = Some(std::num::Wrapping(target.0.wrapping_add(buf.samples_per_frame)));
                Selection::Miss
            },
        }
    }

    fn deliver(&self, buf: &mut BufferState, list: &mut ListState, handle: NodeHandle, ts_mode: bool) -> StoredPacket {
        buf.consec_miss = 0;
        buf.depth.hit(buf.session.as_ref());

        let mut packet = list.nodes.packet(handle).clone();
        let seq = packet.header.sequence.0;
        let ts = packet.header.timestamp;

        if buf.highest_read_seq.map_or(true, |prev| seq_is_forward(prev, packet.header.sequence)) {
            buf.highest_read_seq = Some(packet.header.sequence);
        }
        if buf.highest_read_ts.map_or(true, |prev| ts_is_forward(prev, ts)) {
            buf.highest_read_ts = Some(ts);
        }

        if ts_mode {
            packet.header.sequence = buf.pseudo_seq;
            buf.pseudo_seq = std::num::Wrapping(buf.pseudo_seq.0.wrapping_add(1));
            buf.target_ts = Some(std::num::Wrapping(ts.0.wrapping_add(buf.samples_per_frame)));
        } else {
            buf.target_seq = Some(std::num::Wrapping(seq.wrapping_add(1)));
        }

        list.seq_index.remove(seq);
        if let Some(ts_index) = list.ts_index.as_mut() {
            ts_index.remove(ts.0);
        }
        list.nodes.hide(handle, true);

        buf.last_read_len = packet.body.len();
        packet
    }

    fn handle_miss(&self, buf: &mut BufferState, list: &mut ListState) -> Result<StoredPacket> {
        buf.consec_miss += 1;

        // Video always grows depth by one on a miss or a forced resync.
        // Audio only grows when sustained misses force a resync below --
        // an ordinary PLC miss (caller should conceal, not resize) leaves
        // the depth controller untouched.
        if buf.video() {
            buf.depth.miss(buf.session.as_ref());
            self.reset_locked(buf, list);
            return Err(JitterError::Restart);
        }

        if buf.consec_miss > buf.depth.frame_len() {
            buf.depth.miss(buf.session.as_ref());
            self.reset_locked(buf, list);
            return Err(JitterError::Restart);
        }
        Err(JitterError::NotFound)
    }

    /// Looks up a buffered packet by sequence number without disturbing the
    /// read cursor. Returns `None` if that sequence number isn't currently
    /// buffered.
    #[must_use]
    pub fn get_packet_by_seq(&self, seq: RtpSequence) -> Option<StoredPacket> {
        let list = self.list.lock();
        let list = list.borrow();
        let handle = list.seq_index.get(seq.0)?;
        Some(list.nodes.packet(handle).clone())
    }

    /// Non-destructively inspects a buffered packet anchored at a sequence
    /// number or timestamp, shifted by `offset`.
    #[must_use]
    pub fn peek_frame(&self, locator: PeekLocator, offset: i32) -> Option<FrameSnapshot> {
        let buf = self.buffer.lock();
        let buf = buf.borrow();
        let list = self.list.lock();
        let list = list.borrow();

        let handle = match locator {
            PeekLocator::Seq(seq) => {
                let target = (i64::from(seq.0) + i64::from(offset)).rem_euclid(i64::from(u16::MAX) + 1) as u16;
                list.seq_index.get(target)?
            },
            PeekLocator::Ts(ts) => {
                let step = i64::from(offset) * i64::from(buf.samples_per_frame);
                let target = (i64::from(ts.0) + step).rem_euclid(i64::from(u32::MAX) + 1) as u32;
                list.ts_index.as_ref()?.get(target)?
            },
        };

        Some(FrameSnapshot {
            header: list.nodes.packet(handle).header,
            visible_nodes: list.nodes.visible_nodes(),
        })
    }

    /// Whether a full frame is ready to be popped via [`Self::get_packet`].
    #[must_use]
    pub fn poll(&self) -> bool {
        let buf = self.buffer.lock();
        let buf = buf.borrow();
        let list = self.list.lock();
        let list = list.borrow();
        list.frame_count(buf.video()) >= buf.depth.frame_len()
    }

    /// Number of complete frames currently buffered and ready for delivery.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        let buf = self.buffer.lock();
        let buf = buf.borrow();
        let list = self.list.lock();
        let list = list.borrow();
        list.frame_count(buf.video())
    }

    /// Pops the next pending generic NACK descriptor, if any sequence
    /// numbers are known to be missing and not yet reported.
    #[must_use]
    pub fn pop_nack(&self) -> Option<u32> {
        let list = self.list.lock();
        let mut list = list.borrow_mut();
        nack::pop_nack(&mut list.missing)
    }

    /// Size in bytes of the payload returned by the most recent successful
    /// [`Self::get_packet`] call.
    #[must_use]
    pub fn get_last_read_len(&self) -> usize {
        self.buffer.lock().borrow().last_read_len
    }
}
