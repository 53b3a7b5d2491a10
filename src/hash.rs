//! First-level hash: the `hashpjw` fold from the dragon book.
//!
//! The value is deterministic across runs and platforms for the same
//! bytes. It is not meant to resist adversarial input.

/// Hash a key with a 4-bit rotating fold.
///
/// Never returns 0: a fold that ends at zero (including the empty key)
/// yields 1, since 0 means "unset" for callers that cache hashes.
#[inline]
pub fn pjw_hash(key: &[u8]) -> u32 {
    let h = key
        .iter()
        .fold(0u32, |h, &b| (h << 4) ^ (h >> 28) ^ u32::from(b));
    if h == 0 {
        1
    } else {
        h
    }
}

/// Low byte of the full hash, used as the primary ordering key inside a
/// bucket's tree.
#[inline]
pub fn tie_break_tag(hash: u32) -> u8 {
    hash as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_hashes_to_one() {
        assert_eq!(pjw_hash(b""), 1);
    }

    /// `0x01` folds to 1, then `(1 << 4) ^ 0x10` cancels to 0.
    #[test]
    fn zero_fold_is_remapped() {
        assert_eq!(pjw_hash(&[0x01, 0x10]), 1);
    }

    #[test]
    fn known_values() {
        assert_eq!(pjw_hash(b"a"), 0x61);
        assert_eq!(pjw_hash(b"foo"), 24735);
        assert_eq!(pjw_hash(b"bar"), 25698);
        assert_eq!(pjw_hash(b"baz"), 25706);
        assert_eq!(tie_break_tag(pjw_hash(b"foo")), 0x9f);
    }

    /// High nibble wraps around into the low bits instead of being lost.
    #[test]
    fn long_keys_keep_mixing() {
        let a = pjw_hash(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let b = pjw_hash(b"baaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert_ne!(a, b);
    }

    #[test]
    fn deterministic() {
        for key in [&b"unit"[..], b"", b"\xff\xfe", b"peasant-hall"] {
            assert_eq!(pjw_hash(key), pjw_hash(key));
            assert_ne!(pjw_hash(key), 0);
        }
    }
}
