//! Hashing helpers for the unique table and the computed cache.
//!
//! Keys are small integers (node indices and variable ids), so a plain pairing of them lands
//! in neighbouring buckets. Every hash is therefore passed through a 64-bit finalizer.

/// Szudzik's elegant pairing, `a < b ? b² + a : a² + a + b`, in wrapping arithmetic.
pub fn pairing_szudzik(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

/// Finalizer of SplitMix64: a bijection on `u64` spreading every input bit over the output.
pub fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

pub fn pairing2(a: u64, b: u64) -> u64 {
    mix64(pairing_szudzik(a, b))
}

pub fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    mix64(pairing_szudzik(pairing_szudzik(a, b), c))
}

/// Hash used to pick a bucket in [`Table`][crate::table::Table] and [`Cache`][crate::cache::Cache].
pub trait MyHash {
    fn hash(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_szudzik_is_injective_on_small_grid() {
        let mut seen = std::collections::HashSet::new();
        for a in 0..32 {
            for b in 0..32 {
                assert!(seen.insert(pairing_szudzik(a, b)), "collision at ({}, {})", a, b);
            }
        }
        // The grid 0..n x 0..n maps exactly onto 0..n².
        assert_eq!(seen.len(), 32 * 32);
        assert_eq!(seen.iter().max(), Some(&(32 * 32 - 1)));
    }

    #[test]
    fn test_mix64() {
        assert_eq!(mix64(0), 0);
        assert_ne!(mix64(1), 1);
        // Neighbouring inputs differ in many low bits.
        let low = |x: u64| x & 0xffff;
        assert_ne!(low(mix64(1)), low(mix64(2)));
        assert_ne!(low(mix64(2)), low(mix64(3)));
    }

    #[test]
    fn test_pairing_distinguishes_order() {
        assert_ne!(pairing2(1, 2), pairing2(2, 1));
        assert_ne!(pairing3(1, 2, 3), pairing3(3, 2, 1));
        assert_ne!(pairing3(1, 2, 3), pairing3(1, 3, 2));
    }
}
