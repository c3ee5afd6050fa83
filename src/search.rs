//! Shape-only classification of search input.
//!
//! A query is classified by charset and length alone, never by whether the
//! target exists on-chain. Digits-only input is a slot number and nothing
//! else; base58 input is an address or a signature depending on length. The
//! length windows below are the canonical check for the whole crate.

use std::ops::RangeInclusive;

/// Base58 length window of a 32-byte address
pub const ADDRESS_LEN: RangeInclusive<usize> = 32..=44;

/// Base58 length window of a 64-byte signature
pub const SIGNATURE_LEN: RangeInclusive<usize> = 87..=88;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Address,
    Signature,
    Slot(u64),
}

fn is_base58(s: &str) -> bool {
    // The standard alphabet omits 0, O, I, and l.
    s.bytes().all(|b| {
        matches!(b,
            b'1'..=b'9'
            | b'A'..=b'H' | b'J'..=b'N' | b'P'..=b'Z'
            | b'a'..=b'k' | b'm'..=b'z')
    })
}

/// Classifies `query` into the lookups worth attempting.
///
/// Returns an empty list for input that matches no shape; a malformed query
/// yields zero search results rather than an error.
pub fn classify(query: &str) -> Vec<QueryKind> {
    let q = query.trim();
    if q.is_empty() {
        return Vec::new();
    }

    if q.bytes().all(|b| b.is_ascii_digit()) {
        // Numeric input is a slot and only a slot.
        return q.parse().map(QueryKind::Slot).into_iter().collect();
    }

    let mut kinds = Vec::new();
    if is_base58(q) {
        if ADDRESS_LEN.contains(&q.len()) {
            kinds.push(QueryKind::Address);
        }
        if SIGNATURE_LEN.contains(&q.len()) {
            kinds.push(QueryKind::Signature);
        }
    }
    kinds
}
