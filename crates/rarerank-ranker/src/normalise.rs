//! Score normalisation functions.
//!
//! Both primitives clamp at `max_value` (winsorization) before scaling, so
//! counts beyond the ceiling never leave `[0, scale_factor]`. `max_value` must
//! be positive; configuration validation guarantees it.

pub use rarerank_config::DEFAULT_SCALE_FACTOR;

/// "More is better": 0 → 0.0, `max_value` or above → `scale_factor`.
pub fn winsorized_min_max_scaling(value: f64, max_value: f64, scale_factor: f64) -> f64 {
    if value >= max_value {
        return scale_factor;
    }
    (value / max_value) * scale_factor
}

/// "Fewer is better": 0 → `scale_factor`, `max_value` or above → 0.0.
/// Used for therapy availability, where absence of treatment means higher
/// unmet need.
pub fn reverse_winsorized_min_max_scaling(value: f64, max_value: f64, scale_factor: f64) -> f64 {
    if value >= max_value {
        return 0.0;
    }
    (1.0 - value / max_value) * scale_factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAXES: [f64; 6] = [0.5, 1.0, 3.0, 10.0, 20.0, 100.0];

    #[test]
    fn test_winsorized_endpoints() {
        for m in MAXES {
            assert_eq!(winsorized_min_max_scaling(m, m, DEFAULT_SCALE_FACTOR), 10.0);
            assert_eq!(winsorized_min_max_scaling(0.0, m, DEFAULT_SCALE_FACTOR), 0.0);
        }
    }

    #[test]
    fn test_reverse_winsorized_endpoints() {
        for m in MAXES {
            assert_eq!(reverse_winsorized_min_max_scaling(0.0, m, DEFAULT_SCALE_FACTOR), 10.0);
            assert_eq!(reverse_winsorized_min_max_scaling(m, m, DEFAULT_SCALE_FACTOR), 0.0);
        }
    }

    #[test]
    fn test_values_above_ceiling_are_clamped() {
        assert_eq!(winsorized_min_max_scaling(250.0, 100.0, 10.0), 10.0);
        assert_eq!(reverse_winsorized_min_max_scaling(25.0, 10.0, 10.0), 0.0);
    }

    #[test]
    fn test_linear_between_endpoints() {
        assert!((winsorized_min_max_scaling(5.0, 100.0, 10.0) - 0.5).abs() < 1e-12);
        assert!((winsorized_min_max_scaling(1.0, 3.0, 10.0) - 10.0 / 3.0).abs() < 1e-12);
        assert!((reverse_winsorized_min_max_scaling(5.0, 20.0, 10.0) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_monotonic() {
        let mut prev_up = -1.0;
        let mut prev_down = f64::INFINITY;
        for count in 0..15 {
            let v = f64::from(count);
            let up = winsorized_min_max_scaling(v, 10.0, 10.0);
            let down = reverse_winsorized_min_max_scaling(v, 10.0, 10.0);
            assert!(up >= prev_up);
            assert!(down <= prev_down);
            prev_up = up;
            prev_down = down;
        }
    }

    #[test]
    fn test_custom_scale_factor() {
        assert_eq!(winsorized_min_max_scaling(3.0, 3.0, 5.0), 5.0);
        assert_eq!(reverse_winsorized_min_max_scaling(0.0, 3.0, 5.0), 5.0);
    }
}
