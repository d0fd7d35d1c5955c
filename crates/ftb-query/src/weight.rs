//! Weight factor tables.
//!
//! Each `>` raises the weight index of the following word or group by one,
//! each `<` lowers it, and the index is clamped to `[-5, 5]`.

/// Lowest weight adjustment.
pub const MIN_ADJUST: i32 = -5;

/// Highest weight adjustment.
pub const MAX_ADJUST: i32 = 5;

/// `1.5^i` for `i` in `-5..=5`.
pub const WEIGHTS: [f64; 11] = [
    0.131_687_242_798_354,
    0.197_530_864_197_531,
    0.296_296_296_296_296,
    0.444_444_444_444_444,
    0.666_666_666_666_667,
    1.0,
    1.5,
    2.25,
    3.375,
    5.0625,
    7.593_75,
];

/// `-0.5 * 1.5^i` for `i` in `-5..=5`.
pub const NEGATIVE_WEIGHTS: [f64; 11] = [
    -0.065_843_621_399_177,
    -0.098_765_432_098_766,
    -0.148_148_148_148_148,
    -0.222_222_222_222_222,
    -0.333_333_333_333_334,
    -0.5,
    -0.75,
    -1.125,
    -1.6875,
    -2.531_25,
    -3.796_875,
];

/// Returns the weight factor for an adjustment, from the negative table when
/// `negative` is set.
pub fn weight_for(adjust: i32, negative: bool) -> f64 {
    let clamped = adjust.clamp(MIN_ADJUST, MAX_ADJUST);
    let index = usize::try_from(clamped - MIN_ADJUST).unwrap_or_default();
    if negative {
        NEGATIVE_WEIGHTS[index]
    } else {
        WEIGHTS[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_weight_is_one() {
        assert_eq!(weight_for(0, false), 1.0);
        assert_eq!(weight_for(0, true), -0.5);
    }

    #[test]
    fn steps_follow_powers_of_one_and_a_half() {
        for i in MIN_ADJUST..=MAX_ADJUST {
            let expected = 1.5_f64.powi(i);
            assert!((weight_for(i, false) - expected).abs() < 1e-12, "step {i}");
            assert!((weight_for(i, true) + 0.5 * expected).abs() < 1e-12, "negative step {i}");
        }
    }

    #[test]
    fn adjustment_is_clamped() {
        assert_eq!(weight_for(9, false), weight_for(5, false));
        assert_eq!(weight_for(-12, false), weight_for(-5, false));
    }

    #[test]
    fn weights_increase_with_adjustment() {
        assert!(WEIGHTS.windows(2).all(|w| w[0] < w[1]));
        assert!(NEGATIVE_WEIGHTS.windows(2).all(|w| w[0] > w[1]));
    }
}
