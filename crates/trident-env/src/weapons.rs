//! Weapon combination encoding.
//!
//! With `n` compatible weapons available, selection indices `0..=2^n - 2`
//! address the `2^n - 1` non-empty subsets. A raw index `r` selects the
//! bitmask `(r mod (2^n - 1)) + 1` over the weapon list as it is right now,
//! so the same raw index can pick different weapons once availability
//! changes. Lists longer than 64 weapons are addressed by their first 64.

use trident_core::types::WeaponId;

const MAX_ADDRESSABLE: usize = 64;

/// Number of non-empty combinations of `available` weapons.
pub fn combination_count(available: usize) -> u64 {
    match available.min(MAX_ADDRESSABLE) {
        0 => 0,
        64 => u64::MAX,
        n => (1u64 << n) - 1,
    }
}

/// Whether `selection` is a valid combination index for `available` weapons.
pub fn is_valid_selection(available: usize, selection: i64) -> bool {
    u64::try_from(selection).is_ok_and(|s| s < combination_count(available))
}

/// Decode a raw index to a bitmask. Never zero when `available > 0`.
pub fn decode_mask(available: usize, raw: i64) -> u64 {
    let count = combination_count(available);
    if count == 0 {
        return 0;
    }
    let reduced = i128::from(raw).rem_euclid(i128::from(count));
    // reduced < count <= u64::MAX, so reduced + 1 fits.
    (reduced as u64) + 1
}

/// Weapons selected by `raw` from the currently available list.
pub fn select(available: &[WeaponId], raw: i64) -> Vec<WeaponId> {
    let mask = decode_mask(available.len(), raw);
    available
        .iter()
        .take(MAX_ADDRESSABLE)
        .enumerate()
        .filter(|(i, _)| mask & (1u64 << i) != 0)
        .map(|(_, w)| *w)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u32) -> Vec<WeaponId> {
        (0..n).map(WeaponId).collect()
    }

    #[test]
    fn counts() {
        assert_eq!(combination_count(0), 0);
        assert_eq!(combination_count(1), 1);
        assert_eq!(combination_count(3), 7);
        assert_eq!(combination_count(64), u64::MAX);
        assert_eq!(combination_count(100), u64::MAX);
    }

    #[test]
    fn valid_indices_exclude_empty_combination() {
        assert!(is_valid_selection(3, 0));
        assert!(is_valid_selection(3, 6));
        assert!(!is_valid_selection(3, 7));
        assert!(!is_valid_selection(3, -1));
        assert!(!is_valid_selection(0, 0));
    }

    #[test]
    fn decode_is_non_empty_subset() {
        for n in 1..=6u32 {
            let available = ids(n);
            for raw in [-100, -1, 0, 1, 2, 7, 31, 62, 63, 1000, i64::MAX, i64::MIN] {
                let chosen = select(&available, raw);
                assert!(!chosen.is_empty(), "n={n} raw={raw}");
                assert!(chosen.iter().all(|w| available.contains(w)));
                // Pure function of (n, raw).
                assert_eq!(chosen, select(&available, raw));
            }
        }
    }

    #[test]
    fn decode_wraps_modulo_combinations() {
        let available = ids(2);
        assert_eq!(select(&available, 0), vec![WeaponId(0)]);
        assert_eq!(select(&available, 1), vec![WeaponId(1)]);
        assert_eq!(select(&available, 2), vec![WeaponId(0), WeaponId(1)]);
        assert_eq!(select(&available, 3), vec![WeaponId(0)]);
    }

    #[test]
    fn same_raw_index_follows_live_list() {
        let before = vec![WeaponId(4), WeaponId(7)];
        let after = vec![WeaponId(7)];
        assert_eq!(select(&before, 0), vec![WeaponId(4)]);
        assert_eq!(select(&after, 0), vec![WeaponId(7)]);
    }

    #[test]
    fn nothing_available_selects_nothing() {
        assert!(select(&[], 5).is_empty());
        assert_eq!(decode_mask(0, 5), 0);
    }
}
