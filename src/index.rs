//! Lookup indexes kept alongside the node store.
//!
//! The original keeps two `switch_inthash_t` tables (by sequence, and
//! optionally by timestamp) plus a third tracking sequence numbers known to
//! be missing. `nohash_hasher::IntMap` is the teacher's own answer to
//! "integer key, no need to hash it" (see `driver/scheduler/idle.rs`), so we
//! reuse it here for the same reason: these keys are already well
//! distributed and hashing them is wasted work.

use nohash_hasher::IntMap;

use crate::node::NodeHandle;

/// Maps RTP sequence number to the node currently holding that packet.
#[derive(Default)]
pub struct SequenceIndex(IntMap<u16, NodeHandle>);

impl SequenceIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `seq` is held by `handle`, returning any node previously
    /// indexed under the same sequence number.
    pub fn insert(&mut self, seq: u16, handle: NodeHandle) -> Option<NodeHandle> {
        self.0.insert(seq, handle)
    }

    /// Looks up the node holding `seq`, if any.
    #[must_use]
    pub fn get(&self, seq: u16) -> Option<NodeHandle> {
        self.0.get(&seq).copied()
    }

    /// Removes any entry for `seq`.
    pub fn remove(&mut self, seq: u16) {
        self.0.remove(&seq);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of tracked entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Maps RTP timestamp to the node holding the first packet of that frame.
/// Only populated when the buffer is in timestamp mode.
#[derive(Default)]
pub struct TimestampIndex(IntMap<u32, NodeHandle>);

impl TimestampIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `ts` is held by `handle`.
    pub fn insert(&mut self, ts: u32, handle: NodeHandle) -> Option<NodeHandle> {
        self.0.insert(ts, handle)
    }

    /// Looks up the node holding `ts`, if any.
    #[must_use]
    pub fn get(&self, ts: u32) -> Option<NodeHandle> {
        self.0.get(&ts).copied()
    }

    /// Removes any entry for `ts`.
    pub fn remove(&mut self, ts: u32) {
        self.0.remove(&ts);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// State of a sequence number known to be missing from the stream.
///
/// The original tracks this with two disjoint hashtables (`missing_seq` and
/// `missing_seq_reported`); a node only ever needs to be in one, so a single
/// two-state token per key expresses the same thing without the bookkeeping
/// of moving a key between two tables.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MissingToken {
    /// Detected missing but not yet surfaced via [`JitterBuffer::pop_nack`].
    ///
    /// [`JitterBuffer::pop_nack`]: crate::JitterBuffer::pop_nack
    Pending,
    /// Already surfaced via a NACK; kept around so a repeated arrival of the
    /// same gap doesn't generate a duplicate report.
    Reported,
}

/// Tracks sequence numbers known to be missing from the stream, and whether
/// each has already been reported via a NACK.
#[derive(Default)]
pub struct MissingIndex(IntMap<u16, MissingToken>);

impl MissingIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `seq` missing if it isn't already tracked. Does not downgrade an
    /// already-`Reported` entry back to `Pending`.
    pub fn mark_missing(&mut self, seq: u16) {
        self.0.entry(seq).or_insert(MissingToken::Pending);
    }

    /// Clears the missing state for `seq` (the packet arrived).
    pub fn resolve(&mut self, seq: u16) {
        self.0.remove(&seq);
    }

    /// Current token for `seq`, if tracked.
    #[must_use]
    pub fn get(&self, seq: u16) -> Option<MissingToken> {
        self.0.get(&seq).copied()
    }

    /// Marks `seq` as reported, if it is currently tracked.
    pub fn mark_reported(&mut self, seq: u16) {
        if let Some(token) = self.0.get_mut(&seq) {
            *token = MissingToken::Reported;
        }
    }

    /// Iterates `(seq, token)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, MissingToken)> + '_ {
        self.0.iter().map(|(&seq, &token)| (seq, token))
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeHandle;

    fn handle(n: usize) -> NodeHandle {
        // NodeHandle has no public constructor; round-trip one through a
        // NodeStore instead of reaching into its private field.
        let mut store = crate::node::NodeStore::new();
        let mut last = None;
        for i in 0..=n {
            last = Some(store.acquire(crate::packet::StoredPacket {
                header: crate::packet::RtpHeader::new(i as u16, 0),
                body: bytes::Bytes::new(),
            }));
        }
        last.unwrap()
    }

    #[test]
    fn sequence_index_round_trips() {
        let mut idx = SequenceIndex::new();
        let h = handle(0);
        idx.insert(42, h);
        assert_eq!(idx.get(42), Some(h));
        idx.remove(42);
        assert_eq!(idx.get(42), None);
    }

    #[test]
    fn missing_index_does_not_downgrade_reported() {
        let mut idx = MissingIndex::new();
        idx.mark_missing(7);
        idx.mark_reported(7);
        idx.mark_missing(7);
        assert_eq!(idx.get(7), Some(MissingToken::Reported));
    }

    #[test]
    fn missing_index_resolve_clears_entry() {
        let mut idx = MissingIndex::new();
        idx.mark_missing(7);
        idx.resolve(7);
        assert_eq!(idx.get(7), None);
    }
}
