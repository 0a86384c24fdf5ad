//! # Safe identifier range
//!
//! Identifiers minted by a 63-bit Snowflake-style generator do not survive a
//! round-trip through runtimes that store integers as IEEE-754 doubles. Those
//! runtimes can only represent integers up to [`MAX_SAFE_INTEGER`] exactly.
//!
//! [`downshift`] maps an oversized identifier into the safe range by dropping
//! its low [`SHIFT`] bits, which keeps the timestamp-bearing high bits intact.
//! Values already in range are returned as-is, so the mapping is idempotent
//! and a migration built on it can be re-run safely.

/// Bit width of the generator that produced the oversized identifiers.
pub const SOURCE_BITS: u32 = 63;

/// Bit width of the integer range a double can represent exactly.
pub const SAFE_BITS: u32 = 53;

/// Number of low bits discarded from an oversized identifier.
pub const SHIFT: u32 = SOURCE_BITS - SAFE_BITS;

/// Largest integer representable without precision loss, `2^53 - 1`.
pub const MAX_SAFE_INTEGER: i64 = (1 << SAFE_BITS) - 1;

/// Returns `true` if `id` lies outside the safe integer range and would be
/// rewritten by [`downshift`].
///
/// ```
/// use idshift::{MAX_SAFE_INTEGER, needs_downshift};
///
/// assert!(!needs_downshift(MAX_SAFE_INTEGER));
/// assert!(needs_downshift(MAX_SAFE_INTEGER + 1));
/// ```
#[inline]
pub const fn needs_downshift(id: i64) -> bool {
    id > MAX_SAFE_INTEGER
}

/// Maps an identifier into the safe integer range.
///
/// Identifiers at or below [`MAX_SAFE_INTEGER`] are returned unchanged. Larger
/// identifiers are arithmetically shifted right by [`SHIFT`] bits. Any `i64`
/// shifted this way lands at or below [`MAX_SAFE_INTEGER`], so applying the
/// function twice is the same as applying it once.
///
/// ```
/// use idshift::{MAX_SAFE_INTEGER, downshift};
///
/// assert_eq!(downshift(42), 42);
/// assert_eq!(downshift(MAX_SAFE_INTEGER), MAX_SAFE_INTEGER);
/// assert_eq!(downshift(1 << 53), 1 << 43);
/// assert_eq!(downshift(i64::MAX), MAX_SAFE_INTEGER);
/// ```
#[inline]
pub const fn downshift(id: i64) -> i64 {
    if needs_downshift(id) { id >> SHIFT } else { id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shift_is_generator_width_minus_safe_width() {
        assert_eq!(SHIFT, 10);
        assert_eq!(MAX_SAFE_INTEGER, 9_007_199_254_740_991);
    }

    #[test]
    fn boundary_is_never_shifted() {
        assert_eq!(downshift(MAX_SAFE_INTEGER), MAX_SAFE_INTEGER);
        assert!(!needs_downshift(MAX_SAFE_INTEGER));
    }

    #[test]
    fn first_unsafe_value_is_shifted() {
        let two_pow_53 = MAX_SAFE_INTEGER + 1;
        assert!(needs_downshift(two_pow_53));
        assert_eq!(downshift(two_pow_53), 1 << 43);
    }

    #[test]
    fn known_value_maps_to_expected() {
        assert_eq!(downshift(9_007_199_254_740_993), 8_796_093_022_208);
    }

    #[test]
    fn largest_i64_lands_on_the_boundary() {
        assert_eq!(downshift(i64::MAX), MAX_SAFE_INTEGER);
    }

    #[test]
    fn negative_values_are_left_alone() {
        assert_eq!(downshift(-1), -1);
        assert_eq!(downshift(i64::MIN), i64::MIN);
    }

    proptest! {
        #[test]
        fn identity_below_threshold(v in i64::MIN..=MAX_SAFE_INTEGER) {
            prop_assert_eq!(downshift(v), v);
        }

        #[test]
        fn shifted_above_threshold(v in (MAX_SAFE_INTEGER + 1)..=i64::MAX) {
            let shifted = downshift(v);
            prop_assert_eq!(shifted, v >> 10);
            prop_assert!(shifted <= MAX_SAFE_INTEGER);
        }

        #[test]
        fn idempotent(v in 0..=i64::MAX) {
            prop_assert_eq!(downshift(downshift(v)), downshift(v));
        }
    }
}
