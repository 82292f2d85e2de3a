//! Pool-backed intrusive doubly linked list of packet slots.
//!
//! This is the Rust reading of the original's `switch_jb_node_t` arena: an
//! allocate-once, reuse-forever pool of slots, threaded together as an
//! intrusive list so that a slot can move to the head (fast-recycle hint)
//! without touching anything else. Indices into [`NodeStore`]'s internal
//! `Vec` stand in for the original's raw pointers.

use std::cmp::Ordering;

use crate::packet::StoredPacket;

/// Opaque handle to a slot inside a [`NodeStore`]. Stable for the lifetime
/// of the node (slots are never moved once allocated, only relinked).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeHandle(usize);

struct Slot {
    packet: Option<StoredPacket>,
    visible: bool,
    bad_hits: u8,
    prev: Option<NodeHandle>,
    next: Option<NodeHandle>,
}

/// Arena of packet slots threaded into an intrusive doubly linked list.
///
/// New slots are appended at the head only when no free slot exists; free
/// slots are always preferred for reuse. The list is never shrunk: once
/// allocated, a slot lives until the store itself is dropped.
#[derive(Default)]
pub struct NodeStore {
    slots: Vec<Slot>,
    head: Option<NodeHandle>,
    visible_nodes: u32,
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots currently marked visible.
    #[must_use]
    pub fn visible_nodes(&self) -> u32 {
        self.visible_nodes
    }

    /// Finds the first free slot (scanning list order from the head) or
    /// allocates a new one, marks it visible, and returns its handle.
    pub fn acquire(&mut self, packet: StoredPacket) -> NodeHandle {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let slot = self.slot(handle);
            if !slot.visible {
                let slot = self.slot_mut(handle);
                slot.packet = Some(packet);
                slot.visible = true;
                slot.bad_hits = 0;
                self.visible_nodes += 1;
                return handle;
            }
            cursor = slot.next;
        }

        let handle = NodeHandle(self.slots.len());
        self.slots.push(Slot {
            packet: Some(packet),
            visible: true,
            bad_hits: 0,
            prev: None,
            next: self.head,
        });
        if let Some(old_head) = self.head {
            self.slot_mut(old_head).prev = Some(handle);
        }
        self.head = Some(handle);
        self.visible_nodes += 1;
        handle
    }

    /// Hides a node (marks it free for reuse). If `pop` is set, the node is
    /// additionally relinked to the head of the list as a fast-recycle hint.
    /// No-op if the node is already hidden.
    pub fn hide(&mut self, handle: NodeHandle, pop: bool) {
        if !self.slot(handle).visible {
            return;
        }

        {
            let slot = self.slot_mut(handle);
            slot.visible = false;
            slot.bad_hits = 0;
        }
        self.visible_nodes -= 1;

        if pop {
            self.push_to_top(handle);
        }
    }

    /// Hides every node in the store, visible or not.
    pub fn hide_all(&mut self) {
        let handles: Vec<NodeHandle> = self.iter_handles().collect();
        for handle in handles {
            self.hide(handle, false);
        }
    }

    /// Detaches `handle` from wherever it sits in the list and relinks it as
    /// the new head.
    pub fn push_to_top(&mut self, handle: NodeHandle) {
        if self.head == Some(handle) {
            return;
        }

        let (prev, next) = {
            let slot = self.slot(handle);
            (slot.prev, slot.next)
        };

        if let Some(prev) = prev {
            self.slot_mut(prev).next = next;
        }
        if let Some(next) = next {
            self.slot_mut(next).prev = prev;
        }

        let old_head = self.head;
        {
            let slot = self.slot_mut(handle);
            slot.next = old_head;
            slot.prev = None;
        }
        if let Some(old_head) = old_head {
            self.slot_mut(old_head).prev = Some(handle);
        }
        self.head = Some(handle);
    }

    /// Stable sort of the whole list: visible nodes before free nodes, and
    /// within visible nodes, ascending by raw (possibly wrapped) sequence
    /// number.
    ///
    /// The comparator intentionally compares raw sequence values rather than
    /// unwrapping around the 16-bit boundary -- see `SPEC_FULL.md`'s Open
    /// Questions. Call sites only ever sort small spans immediately after
    /// ingest, where this is acceptable.
    pub fn sort(&mut self) {
        let mut handles: Vec<NodeHandle> = self.iter_handles().collect();
        handles.sort_by(|&a, &b| Self::cmp(self.slot(a), self.slot(b)));

        self.head = handles.first().copied();
        for window in handles.windows(2) {
            let (a, b) = (window[0], window[1]);
            self.slot_mut(a).next = Some(b);
            self.slot_mut(b).prev = Some(a);
        }
        if let Some(&first) = handles.first() {
            self.slot_mut(first).prev = None;
        }
        if let Some(&last) = handles.last() {
            self.slot_mut(last).next = None;
        }
    }

    /// Walks the list once, pushing every free slot encountered after the
    /// first visible slot to the head, so that free slots cluster together
    /// and stay cheap to find on the next [`NodeStore::acquire`].
    pub fn coalesce_free(&mut self) {
        let handles: Vec<NodeHandle> = self.iter_handles().collect();
        let mut started = false;

        for handle in handles {
            let visible = self.slot(handle).visible;
            if visible {
                started = true;
            } else if started {
                self.push_to_top(handle);
            }
        }
    }

    /// Iterates handles in current list order, head to tail.
    pub fn iter_handles(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let handle = cursor?;
            cursor = self.slot(handle).next;
            Some(handle)
        })
    }

    /// Iterates `(handle, &StoredPacket)` for every currently visible node.
    pub fn iter_visible(&self) -> impl Iterator<Item = (NodeHandle, &StoredPacket)> + '_ {
        self.iter_handles().filter_map(move |handle| {
            let slot = self.slot(handle);
            slot.visible.then(|| (handle, slot.packet.as_ref().expect("visible slot always holds a packet")))
        })
    }

    /// Borrows the stored packet for a handle, regardless of visibility.
    #[must_use]
    pub fn packet(&self, handle: NodeHandle) -> &StoredPacket {
        self.slot(handle)
            .packet
            .as_ref()
            .expect("acquired slots always hold a packet")
    }

    /// Whether a handle currently refers to a visible node.
    #[must_use]
    pub fn is_visible(&self, handle: NodeHandle) -> bool {
        self.slot(handle).visible
    }

    fn slot(&self, handle: NodeHandle) -> &Slot {
        &self.slots[handle.0]
    }

    fn slot_mut(&mut self, handle: NodeHandle) -> &mut Slot {
        &mut self.slots[handle.0]
    }

    fn cmp(a: &Slot, b: &Slot) -> Ordering {
        match (a.visible, b.visible) {
            (false, false) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => {
                let a_seq = a.packet.as_ref().expect("visible").header.sequence.0;
                let b_seq = b.packet.as_ref().expect("visible").header.sequence.0;
                a_seq.cmp(&b_seq)
            },
        }
    }
}
