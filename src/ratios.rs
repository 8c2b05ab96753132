//! Body-fat and shape ratios from pixel measurements.
//!
//! The body-fat figure adapts the US Navy circumference regression to the
//! width proxies available from a single photograph. It is an approximation
//! and only as good as the landmark detection behind it.

use serde::Serialize;

use crate::formulas::{round2, Gender};
use crate::geometry::BodyMeasurements;

/// Ratios and raw measurements derived for one body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyRatios {
    /// Landmark-based body fat estimate, `None` when the geometry is too
    /// degenerate to compute one
    pub body_fat_percent: Option<f64>,

    /// Hip width divided by shoulder width. This is not a waist-to-hip ratio:
    /// the waist is not among the measured landmarks. Zero when the shoulder
    /// width is zero.
    pub hip_to_shoulder_ratio: f64,

    pub shoulder_width_px: f64,
    pub hip_width_px: f64,
    pub height_px: f64,
}

impl BodyRatios {
    /// Never fails: marginal geometry yields `None` for body fat and a zero
    /// ratio instead of an error.
    pub fn estimate(m: &BodyMeasurements, gender: Gender) -> Self {
        // NaN counts as degenerate too
        let positive = |v: f64| v > 0.0;
        let degenerate =
            !(positive(m.shoulder_width_px) && positive(m.hip_width_px) && positive(m.height_px));

        let (body_fat_percent, hip_to_shoulder_ratio) = if degenerate {
            (None, 0.0)
        } else {
            (
                landmark_body_fat(m, gender),
                hip_to_shoulder_ratio(m.hip_width_px, m.shoulder_width_px),
            )
        };

        if body_fat_percent.is_none() {
            tracing::warn!(
                hip_width_px = m.hip_width_px,
                shoulder_width_px = m.shoulder_width_px,
                height_px = m.height_px,
                "body fat not computable from measurements"
            );
        }

        Self {
            body_fat_percent,
            hip_to_shoulder_ratio,
            shoulder_width_px: m.shoulder_width_px,
            hip_width_px: m.hip_width_px,
            height_px: m.height_px,
        }
    }
}

/// `hip / shoulder` rounded to two decimals, or 0 when undefined.
pub fn hip_to_shoulder_ratio(hip_width_px: f64, shoulder_width_px: f64) -> f64 {
    if shoulder_width_px > 0.0 {
        round2(hip_width_px / shoulder_width_px)
    } else {
        0.0
    }
}

/// Width-proxy body fat percentage, rounded to two decimals.
///
/// Returns `None` when the regression denominator is zero or any
/// intermediate value is not finite.
pub fn landmark_body_fat(m: &BodyMeasurements, gender: Gender) -> Option<f64> {
    let denom = match gender {
        Gender::Male => {
            1.0324 - 0.19077 * m.hip_width_px.log10() + 0.15456 * m.height_px.log10()
        }
        Gender::Female => {
            1.29579 - 0.35004 * (m.hip_width_px + m.shoulder_width_px).log10()
                + 0.22100 * m.height_px.log10()
        }
    };

    body_fat_from_density(denom)
}

/// Siri equation on a body density estimate. `None` for a zero or
/// non-finite density, or when the quotient overflows.
fn body_fat_from_density(density: f64) -> Option<f64> {
    if !density.is_finite() || density == 0.0 {
        return None;
    }

    let body_fat = 495.0 / density - 450.0;
    body_fat.is_finite().then(|| round2(body_fat))
}
