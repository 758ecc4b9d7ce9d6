//! Collision collection flags to collision bitmask

/// Widest flag vector that fits the mask type
pub const MAX_MASK_BITS: usize = u32::BITS as usize;

/// OR together `1 << i` for every set flag `i`.
///
/// The exported document uses the result as both collision group and
/// collision mask, so bodies collide exactly when they share a collection.
/// Flags past the first [`MAX_MASK_BITS`] have no bit and are ignored; scene
/// loading already limits bodies to 20 collections.
pub fn encode_mask(flags: &[bool]) -> u32 {
    flags
        .iter()
        .take(MAX_MASK_BITS)
        .enumerate()
        .filter(|(_, set)| **set)
        .fold(0, |mask, (bit, _)| mask | (1 << bit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use physexport_scene::{CollisionCollections, COLLECTION_SLOTS};
    use proptest::prelude::*;

    #[test]
    fn test_all_false_is_zero() {
        assert_eq!(encode_mask(&[false; COLLECTION_SLOTS]), 0);
        assert_eq!(encode_mask(&[]), 0);
    }

    #[test]
    fn test_single_slot() {
        let mut flags = [false; COLLECTION_SLOTS];
        flags[3] = true;
        assert_eq!(encode_mask(&flags), 8);
    }

    #[test]
    fn test_collections_two_and_five() {
        let collections = CollisionCollections::from_indices(&[2, 5]).unwrap();
        assert_eq!(encode_mask(collections.as_slice()), 36);
    }

    #[test]
    fn test_every_host_slot() {
        assert_eq!(encode_mask(&[true; COLLECTION_SLOTS]), (1 << COLLECTION_SLOTS) - 1);
        assert_eq!(encode_mask(&[true; MAX_MASK_BITS]), u32::MAX);
    }

    #[test]
    fn test_flags_past_mask_width_are_ignored() {
        let mut flags = vec![false; MAX_MASK_BITS + 8];
        flags[1] = true;
        flags[MAX_MASK_BITS] = true;
        flags[MAX_MASK_BITS + 7] = true;
        assert_eq!(encode_mask(&flags), 2);
    }

    proptest! {
        #[test]
        fn test_mask_matches_flags(flags in proptest::collection::vec(any::<bool>(), 0..=MAX_MASK_BITS)) {
            let mask = encode_mask(&flags);
            for (bit, set) in flags.iter().enumerate() {
                prop_assert_eq!(mask & (1 << bit) != 0, *set);
            }
            prop_assert_eq!(mask.count_ones() as usize, flags.iter().filter(|f| **f).count());
        }
    }
}
