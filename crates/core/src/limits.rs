//! Per-asset weight cap applied after strategy allocation.

use serde::{Deserialize, Serialize};

use crate::projection;

/// Optional risk limits supplied with an optimization request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskLimits {
    /// Maximum fraction any single asset may hold, in `(0, 1]`.
    pub max_weight: Option<f64>,
}

/// Clamps weights to `max_weight` and renormalizes.
///
/// A finite positive `max_weight` is first clamped into `[0.01, 1.0]`;
/// anything else disables the cap. This is a soft cap: renormalization
/// redistributes mass proportionally, so entries can land back above the
/// cap (e.g. `[0.6, 0.4]` capped at 0.3 clamps to `[0.3, 0.3]` and
/// renormalizes to `[0.5, 0.5]`). Preserved deliberately; see
/// `cap_renormalization_can_exceed_cap`.
#[must_use]
pub fn apply_limits(weights: &[f64], max_weight: Option<f64>) -> Vec<f64> {
    let Some(cap) = max_weight.filter(|c| c.is_finite() && *c > 0.0) else {
        return weights.to_vec();
    };
    let cap = cap.clamp(0.01, 1.0);
    let clamped: Vec<f64> = weights.iter().map(|w| w.min(cap)).collect();
    projection::normalize_to_one(&clamped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cap_returns_weights_unchanged() {
        let w = vec![0.6, 0.4];
        assert_eq!(apply_limits(&w, None), w);
    }

    #[test]
    fn non_positive_or_non_finite_cap_is_ignored() {
        let w = vec![0.6, 0.4];
        assert_eq!(apply_limits(&w, Some(0.0)), w);
        assert_eq!(apply_limits(&w, Some(-0.3)), w);
        assert_eq!(apply_limits(&w, Some(f64::NAN)), w);
        assert_eq!(apply_limits(&w, Some(f64::INFINITY)), w);
    }

    #[test]
    fn cap_renormalization_can_exceed_cap() {
        // Documents the soft-cap behavior: [0.6, 0.4] with cap 0.3 clamps
        // to [0.3, 0.3] and renormalizes to [0.5, 0.5] - above the cap.
        let w = apply_limits(&[0.6, 0.4], Some(0.3));
        assert!((w[0] - 0.5).abs() < 1e-12, "w0 was {}", w[0]);
        assert!((w[1] - 0.5).abs() < 1e-12, "w1 was {}", w[1]);
    }

    #[test]
    fn cap_redistributes_to_smaller_positions() {
        let w = apply_limits(&[0.7, 0.2, 0.1], Some(0.4));
        // [0.4, 0.2, 0.1] renormalized over 0.7.
        assert!((w[0] - 4.0 / 7.0).abs() < 1e-12);
        assert!((w[1] - 2.0 / 7.0).abs() < 1e-12);
        assert!((w[2] - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn cap_above_all_weights_is_a_no_op() {
        let w = apply_limits(&[0.6, 0.4], Some(0.9));
        assert!((w[0] - 0.6).abs() < 1e-12);
        assert!((w[1] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn tiny_cap_is_clamped_up_to_one_percent() {
        // cap 0.001 clamps to 0.01; every entry hits the cap, so the
        // renormalized result is uniform.
        let w = apply_limits(&[0.5, 0.3, 0.2], Some(0.001));
        for x in &w {
            assert!((x - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn cap_above_one_is_clamped_down_to_one() {
        let w = apply_limits(&[0.6, 0.4], Some(5.0));
        assert!((w[0] - 0.6).abs() < 1e-12);
        assert!((w[1] - 0.4).abs() < 1e-12);
    }
}
