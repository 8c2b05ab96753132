//! Pixel-space body measurements from pose landmarks.
//!
//! Landmarks arrive normalized to the image; this module projects the ones it
//! needs onto the pixel grid and derives body widths and overall height.

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::types::{ImageDimensions, LandmarkRole, PixelPoint, PoseLandmarks};

/// Roles that must be present for a measurement to be attempted.
pub const REQUIRED_ROLES: [LandmarkRole; 5] = [
    LandmarkRole::LeftHip,
    LandmarkRole::RightHip,
    LandmarkRole::LeftShoulder,
    LandmarkRole::RightShoulder,
    LandmarkRole::LeftAnkle,
];

/// Body distances measured on the image, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyMeasurements {
    /// Distance between the left and right hip landmarks
    pub hip_width_px: f64,

    /// Distance between the left and right shoulder landmarks
    pub shoulder_width_px: f64,

    /// Vertical span of all sufficiently visible landmarks
    pub height_px: f64,
}

impl BodyMeasurements {
    pub fn new(hip_width_px: f64, shoulder_width_px: f64, height_px: f64) -> Self {
        Self {
            hip_width_px,
            shoulder_width_px,
            height_px,
        }
    }

    /// Measure a detected body.
    ///
    /// Height is taken from the whole visible skeleton rather than a single
    /// shoulder-ankle pair, so it holds up when the body is tilted relative
    /// to the camera.
    ///
    /// # Errors
    ///
    /// - `MissingLandmark` if any of [`REQUIRED_ROLES`] is absent
    /// - `InsufficientVisibility` if no landmark clears the visibility threshold
    /// - `InvalidMeasurement` if the resulting height is not positive
    pub fn from_landmarks(
        landmarks: &PoseLandmarks,
        dims: ImageDimensions,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        for role in REQUIRED_ROLES {
            landmarks.require(role)?;
        }

        let pixel = |role: LandmarkRole| -> Result<PixelPoint> {
            Ok(landmarks.require(role)?.to_pixel(dims))
        };

        let left_hip = pixel(LandmarkRole::LeftHip)?;
        let right_hip = pixel(LandmarkRole::RightHip)?;
        let left_shoulder = pixel(LandmarkRole::LeftShoulder)?;
        let right_shoulder = pixel(LandmarkRole::RightShoulder)?;

        let hip_width_px = left_hip.distance(&right_hip);
        let shoulder_width_px = left_shoulder.distance(&right_shoulder);
        let height_px = visible_height(landmarks, dims, config.visibility_threshold)?;

        if height_px <= 0.0 {
            return Err(Error::InvalidMeasurement(format!(
                "body height in pixels must be positive, got {}",
                height_px
            )));
        }

        tracing::debug!(
            hip_width_px,
            shoulder_width_px,
            height_px,
            "measured body on {}x{} image",
            dims.width(),
            dims.height()
        );

        Ok(Self {
            hip_width_px,
            shoulder_width_px,
            height_px,
        })
    }
}

/// Vertical pixel extent of the landmarks whose visibility exceeds `threshold`.
pub fn visible_height(
    landmarks: &PoseLandmarks,
    dims: ImageDimensions,
    threshold: f64,
) -> Result<f64> {
    let (min_y, max_y) = landmarks
        .iter()
        .filter(|lm| lm.visibility > threshold)
        .map(|lm| lm.to_pixel(dims).y)
        .fold(None, |acc: Option<(u32, u32)>, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
        .ok_or(Error::InsufficientVisibility { threshold })?;

    Ok((max_y - min_y) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;

    fn pose_with(points: &[(LandmarkRole, f64, f64)], visibility: f64) -> PoseLandmarks {
        let mut all = vec![Landmark::new(0.5, 0.5, 0.0); LandmarkRole::COUNT];
        for &(role, x, y) in points {
            all[role.index()] = Landmark::new(x, y, visibility);
        }
        PoseLandmarks::new(all)
    }

    fn standing_pose() -> Vec<(LandmarkRole, f64, f64)> {
        vec![
            (LandmarkRole::Nose, 0.5, 0.1),
            (LandmarkRole::LeftShoulder, 0.6, 0.25),
            (LandmarkRole::RightShoulder, 0.4, 0.25),
            (LandmarkRole::LeftHip, 0.55, 0.55),
            (LandmarkRole::RightHip, 0.45, 0.55),
            (LandmarkRole::LeftAnkle, 0.55, 0.9),
            (LandmarkRole::RightAnkle, 0.45, 0.95),
        ]
    }

    #[test]
    fn measures_widths_and_height() {
        let dims = ImageDimensions::new(1000, 1000).unwrap();
        let pose = pose_with(&standing_pose(), 1.0);

        let m = BodyMeasurements::from_landmarks(&pose, dims, &AnalysisConfig::default()).unwrap();

        assert!((m.shoulder_width_px - 200.0).abs() < 1e-9);
        assert!((m.hip_width_px - 100.0).abs() < 1e-9);
        // Nose at 100 down to right ankle at 950, not the shoulder-ankle pair
        assert!((m.height_px - 850.0).abs() < 1e-9);
    }

    #[test]
    fn height_spans_all_visible_landmarks() {
        let dims = ImageDimensions::new(640, 480).unwrap();
        let points: Vec<_> = (0..LandmarkRole::COUNT)
            .map(|i| Landmark::new(0.5, 0.2 + 0.02 * i as f64, 1.0))
            .collect();
        let pose = PoseLandmarks::new(points);

        let ys: Vec<u32> = pose.iter().map(|lm| lm.to_pixel(dims).y).collect();
        let expected = (ys.iter().max().unwrap() - ys.iter().min().unwrap()) as f64;

        let m = BodyMeasurements::from_landmarks(&pose, dims, &AnalysisConfig::default()).unwrap();
        assert_eq!(m.height_px, expected);
    }

    #[test]
    fn invisible_landmarks_ignored_for_height() {
        let dims = ImageDimensions::new(100, 100).unwrap();
        let mut pose = pose_with(&standing_pose(), 1.0);
        // Far outlier with low confidence
        pose.points[LandmarkRole::LeftHeel.index()] = Landmark::new(0.5, 0.99, 0.2);

        let height = visible_height(&pose, dims, 0.5).unwrap();
        assert_eq!(height, 85.0);
    }

    #[test]
    fn visibility_must_exceed_threshold() {
        let dims = ImageDimensions::new(100, 100).unwrap();
        let pose = pose_with(&standing_pose(), 0.5);

        let err = BodyMeasurements::from_landmarks(&pose, dims, &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientVisibility { .. }));
    }

    #[test]
    fn missing_required_role() {
        let dims = ImageDimensions::new(100, 100).unwrap();
        // Stops right before LEFT_ANKLE
        let pose = PoseLandmarks::new(vec![Landmark::new(0.5, 0.5, 1.0); 27]);

        let err = BodyMeasurements::from_landmarks(&pose, dims, &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingLandmark(LandmarkRole::LeftAnkle)));

        let empty = PoseLandmarks::default();
        let err = BodyMeasurements::from_landmarks(&empty, dims, &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingLandmark(LandmarkRole::LeftHip)));
    }

    #[test]
    fn flat_pose_is_invalid_measurement() {
        let dims = ImageDimensions::new(100, 100).unwrap();
        let points = vec![Landmark::new(0.3, 0.5, 1.0); LandmarkRole::COUNT];
        let pose = PoseLandmarks::new(points);

        let err = BodyMeasurements::from_landmarks(&pose, dims, &AnalysisConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidMeasurement(_)));
    }

    #[test]
    fn lower_threshold_admits_more_landmarks() {
        let dims = ImageDimensions::new(100, 100).unwrap();
        let pose = pose_with(&standing_pose(), 0.4);
        let config = AnalysisConfig {
            visibility_threshold: 0.3,
        };

        let m = BodyMeasurements::from_landmarks(&pose, dims, &config).unwrap();
        assert_eq!(m.height_px, 85.0);
    }
}
