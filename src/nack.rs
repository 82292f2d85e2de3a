//! Generic NACK (RFC 4585 §6.2.1) generation from the missing-sequence
//! index.
//!
//! One descriptor packs a packet ID (PID) with a 16-bit bitmask of
//! following packets also lost (BLP). Mirrors `switch_jb_pop_nack`: find the
//! lowest still-pending missing sequence, fold in any of the next sixteen
//! sequence numbers tracked as missing -- `Pending` or already `Reported` --
//! and mark everything folded in as reported so repeat calls don't
//! re-announce the same gap. Folding in already-`Reported` neighbours
//! matters because the original's lookup (`switch_core_inthash_delete`)
//! succeeds regardless of which of its two token hashtables the entry lives
//! in.

use crate::{constants::NACK_BLP_BITS, index::MissingIndex};

/// One RFC 4585 generic NACK descriptor: packet ID in the low 16 bits,
/// bitmask of lost packets following it in the high 16 bits.
#[must_use]
pub fn pop_nack(missing: &mut MissingIndex) -> Option<u32> {
    let pid = missing
        .iter()
        .filter(|(_, token)| matches!(token, crate::index::MissingToken::Pending))
        .map(|(seq, _)| seq)
        .min()?;

    let mut blp: u16 = 0;
    for offset in 1..=NACK_BLP_BITS {
        let seq = pid.wrapping_add(offset);
        if missing.get(seq).is_some() {
            blp |= 1 << (offset - 1);
            missing.mark_reported(seq);
        }
    }
    missing.mark_reported(pid);

    Some((u32::from(blp) << 16) | u32::from(pid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MissingToken;

    #[test]
    fn nack_reports_lowest_pending_as_pid() {
        let mut missing = MissingIndex::new();
        missing.mark_missing(10);
        missing.mark_missing(5);
        let nack = pop_nack(&mut missing).unwrap();
        assert_eq!(nack & 0xFFFF, 5);
    }

    #[test]
    fn nack_folds_nearby_losses_into_blp() {
        let mut missing = MissingIndex::new();
        missing.mark_missing(5);
        missing.mark_missing(6);
        missing.mark_missing(8);
        let nack = pop_nack(&mut missing).unwrap();
        assert_eq!(nack & 0xFFFF, 5);
        let blp = nack >> 16;
        assert_eq!(blp & 0b1, 1, "seq 6 is offset 1 from pid 5");
        assert_eq!(blp & 0b100, 0b100, "seq 8 is offset 3 from pid 5");
    }

    #[test]
    fn reported_entries_are_not_reannounced() {
        let mut missing = MissingIndex::new();
        missing.mark_missing(5);
        assert!(pop_nack(&mut missing).is_some());
        assert_eq!(missing.get(5), Some(MissingToken::Reported));
        assert!(pop_nack(&mut missing).is_none());
    }

    #[test]
    fn no_pending_entries_returns_none() {
        let mut missing = MissingIndex::new();
        assert!(pop_nack(&mut missing).is_none());
    }

    #[test]
    fn already_reported_neighbours_still_fold_into_blp() {
        let mut missing = MissingIndex::new();
        missing.mark_missing(5);
        missing.mark_missing(6);
        missing.mark_reported(6);
        missing.mark_missing(10);

        let nack = pop_nack(&mut missing).unwrap();
        assert_eq!(nack & 0xFFFF, 5);
        let blp = nack >> 16;
        assert_eq!(blp & 0b1, 1, "already-reported seq 6 must still be folded in");
        assert_eq!(blp & 0b10000, 0b10000, "pending seq 10 is offset 5 from pid 5");
    }
}
