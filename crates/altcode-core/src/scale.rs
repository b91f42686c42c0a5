//! Nearest-value-within-threshold matching.
//!
//! One algorithm shared by spacing, sizing, radius, font-size rounding and the
//! palette color gate: find the candidate with the smallest deviation from
//! the goal (first minimum wins), then accept it only when the relative
//! deviation stays within a percentage threshold.

/// Index and deviation of the candidate closest to zero distance.
/// Ties keep the earliest candidate.
pub fn nearest_by<T>(candidates: &[T], distance: impl Fn(&T) -> f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (index, candidate) in candidates.iter().enumerate() {
        let d = distance(candidate);
        if !d.is_finite() {
            continue;
        }
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((index, d)),
        }
    }
    best
}

/// `deviation / reference * 100 <= threshold_percent`.
pub fn within_threshold(deviation: f64, reference: f64, threshold_percent: f64) -> bool {
    if reference == 0.0 {
        return deviation == 0.0;
    }
    deviation.abs() / reference.abs() * 100.0 <= threshold_percent
}

/// Closest entry of `scale` to `goal`, if within `threshold_percent` of it.
///
/// A goal of zero is always an exact match at zero.
pub fn nearest_value_within(goal: f64, scale: &[f64], threshold_percent: f64) -> Option<f64> {
    if goal == 0.0 {
        return Some(0.0);
    }
    let (index, deviation) = nearest_by(scale, |entry| (entry - goal).abs())?;
    within_threshold(deviation, goal, threshold_percent).then(|| scale[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: [f64; 11] = [0.0, 4.0, 8.0, 12.0, 16.0, 20.0, 24.0, 32.0, 40.0, 48.0, 64.0];

    #[test]
    fn test_rounds_within_threshold() {
        assert_eq!(nearest_value_within(18.0, &SCALE, 15.0), Some(16.0));
    }

    #[test]
    fn test_beyond_last_entry() {
        assert_eq!(nearest_value_within(72.0, &SCALE, 15.0), Some(64.0));
    }

    #[test]
    fn test_tie_keeps_smaller_entry() {
        let scale = [64.0, 80.0];
        assert_eq!(nearest_value_within(72.0, &scale, 15.0), Some(64.0));
    }

    #[test]
    fn test_no_match_beyond_threshold() {
        let scale = [0.0, 4.0, 8.0, 16.0, 32.0, 64.0, 96.0, 128.0, 256.0];
        assert_eq!(nearest_value_within(200.0, &scale, 15.0), None);
    }

    #[test]
    fn test_zero_goal_is_exact() {
        assert_eq!(nearest_value_within(0.0, &[4.0, 8.0], 0.0), Some(0.0));
    }

    #[test]
    fn test_negative_goal_uses_magnitude() {
        assert_eq!(nearest_value_within(-9.0, &[-8.0, 8.0], 15.0), Some(-8.0));
        assert_eq!(nearest_value_within(-9.0, &[8.0], 15.0), None);
    }

    #[test]
    fn test_nearest_by_first_minimum() {
        let values = [3.0, 1.0, 1.0];
        assert_eq!(nearest_by(&values, |v| *v), Some((1, 1.0)));
        assert_eq!(nearest_by::<f64>(&[], |v| *v), None);
    }
}
