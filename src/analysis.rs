//! Request-level analyses combining the formula library and the landmark
//! pipeline into named metric sets.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::formulas::{self, round2, ActivityLevel, Gender};
use crate::geometry::BodyMeasurements;
use crate::ratios::BodyRatios;
use crate::types::{ImageDimensions, PoseDetection};

/// Metric names used as keys in [`AnalysisResult`].
pub mod metric {
    pub const BMI: &str = "bmi";
    pub const BMR: &str = "bmr";
    pub const DAILY_CALORIES: &str = "daily_calories";
    /// Heuristic from BMI and age
    pub const BMI_BODY_FAT_PERCENT: &str = "bmi_body_fat_percent";
    pub const IDEAL_WEIGHT_KG: &str = "ideal_weight_kg";
    /// Width regression on pose landmarks
    pub const LANDMARK_BODY_FAT_PERCENT: &str = "landmark_body_fat_percent";
    pub const HIP_TO_SHOULDER_WIDTH_RATIO: &str = "hip_to_shoulder_width_ratio";
    pub const SHOULDER_WIDTH_PX: &str = "shoulder_width_px";
    pub const HIP_WIDTH_PX: &str = "hip_width_px";
    pub const HEIGHT_PX: &str = "height_px";
}

/// A metric value, or an explicit marker that it could not be computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Value(f64),
    Unavailable,
}

impl MetricValue {
    pub fn value(self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(v),
            MetricValue::Unavailable => None,
        }
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(MetricValue::Unavailable, MetricValue::Value)
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            MetricValue::Value(v) => serializer.serialize_f64(*v),
            MetricValue::Unavailable => serializer.serialize_str("unavailable"),
        }
    }
}

/// Named metrics in insertion order. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    metrics: Vec<(&'static str, MetricValue)>,
}

impl AnalysisResult {
    pub fn new(metrics: Vec<(&'static str, MetricValue)>) -> Self {
        Self { metrics }
    }

    pub fn get(&self, name: &str) -> Option<MetricValue> {
        self.metrics
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Shorthand for `get(name)` flattened to the numeric value.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(MetricValue::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, MetricValue)> + '_ {
        self.metrics.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.metrics.len()))?;
        for (key, value) in &self.metrics {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Measurements entered by the user for one request.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AnthropometricProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
}

impl AnthropometricProfile {
    pub fn validate(&self) -> Result<()> {
        if self.weight_kg.is_nan() || self.weight_kg <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "weight must be positive, got {} kg",
                self.weight_kg
            )));
        }
        if self.height_cm.is_nan() || self.height_cm <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "height must be positive, got {} cm",
                self.height_cm
            )));
        }
        if self.age_years.is_nan() || self.age_years <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "age must be positive, got {}",
                self.age_years
            )));
        }
        Ok(())
    }

    /// Every formula-based metric for this profile.
    ///
    /// BMR feeds daily calories and BMI feeds the BMI body fat heuristic, so
    /// each later value uses the rounded earlier one.
    pub fn report(&self) -> Result<AnalysisResult> {
        self.validate()?;

        let bmi = formulas::bmi(self.weight_kg, self.height_cm)?;
        let bmr = formulas::bmr(self.weight_kg, self.height_cm, self.age_years, self.gender);
        let calories = formulas::daily_calories(bmr, self.activity_level);
        let body_fat = formulas::body_fat_percentage_from_bmi(bmi, self.age_years, self.gender);
        let ideal = formulas::ideal_weight(self.height_cm, self.gender);

        Ok(AnalysisResult::new(vec![
            (metric::BMI, MetricValue::Value(bmi)),
            (metric::BMR, MetricValue::Value(bmr)),
            (metric::DAILY_CALORIES, MetricValue::Value(calories)),
            (metric::BMI_BODY_FAT_PERCENT, MetricValue::Value(body_fat)),
            (metric::IDEAL_WEIGHT_KG, MetricValue::Value(ideal)),
        ]))
    }
}

/// Landmark analysis for one photograph.
///
/// # Errors
///
/// `NoPoseDetected` when the pose model found no body, otherwise any
/// error from [`BodyMeasurements::from_landmarks`]. A body fat value that
/// cannot be computed is reported as unavailable, not as an error.
pub fn analyze_pose(
    detection: &PoseDetection,
    dims: ImageDimensions,
    gender: Gender,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    if !detection.detected {
        return Err(Error::NoPoseDetected);
    }

    let measurements = BodyMeasurements::from_landmarks(&detection.landmarks, dims, config)?;
    let ratios = BodyRatios::estimate(&measurements, gender);

    Ok(AnalysisResult::new(vec![
        (
            metric::LANDMARK_BODY_FAT_PERCENT,
            MetricValue::from(ratios.body_fat_percent),
        ),
        (
            metric::HIP_TO_SHOULDER_WIDTH_RATIO,
            MetricValue::Value(ratios.hip_to_shoulder_ratio),
        ),
        (
            metric::SHOULDER_WIDTH_PX,
            MetricValue::Value(round2(ratios.shoulder_width_px)),
        ),
        (
            metric::HIP_WIDTH_PX,
            MetricValue::Value(round2(ratios.hip_width_px)),
        ),
        (metric::HEIGHT_PX, MetricValue::Value(round2(ratios.height_px))),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Landmark, LandmarkRole, PoseLandmarks};
    use assert_approx_eq::assert_approx_eq;

    fn profile() -> AnthropometricProfile {
        AnthropometricProfile {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30.0,
            gender: Gender::Male,
            activity_level: ActivityLevel::Moderate,
        }
    }

    #[test]
    fn profile_report() {
        let result = profile().report().unwrap();

        assert_eq!(result.len(), 5);
        assert_approx_eq!(result.value(metric::BMI).unwrap(), 22.86);
        assert_eq!(result.value(metric::BMR), Some(1649.0));
        assert_eq!(result.value(metric::DAILY_CALORIES), Some(2556.0));
        assert_approx_eq!(result.value(metric::BMI_BODY_FAT_PERCENT).unwrap(), 18.13);
        assert_approx_eq!(result.value(metric::IDEAL_WEIGHT_KG).unwrap(), 31.96);
    }

    #[test]
    fn profile_rejects_bad_values() {
        let mut p = profile();
        p.height_cm = 0.0;
        assert!(matches!(p.report(), Err(Error::InvalidInput(_))));

        let mut p = profile();
        p.weight_kg = -1.0;
        assert!(matches!(p.report(), Err(Error::InvalidInput(_))));

        let mut p = profile();
        p.age_years = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = profile();
        p.age_years = 0.0;
        assert!(matches!(p.report(), Err(Error::InvalidInput(_))));

        let mut p = profile();
        p.age_years = 0.5;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn profile_from_json() {
        let json = r#"{"weight_kg": 60, "height_cm": 165, "age_years": 25, "gender": "female", "activity_level": "light"}"#;
        let p: AnthropometricProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.gender, Gender::Female);
        assert_eq!(p.activity_level, ActivityLevel::Light);

        let bad = r#"{"weight_kg": 60, "height_cm": 165, "age_years": 25, "gender": "x", "activity_level": "light"}"#;
        assert!(serde_json::from_str::<AnthropometricProfile>(bad).is_err());
    }

    #[test]
    fn undetected_pose() {
        let dims = ImageDimensions::new(640, 480).unwrap();
        let err = analyze_pose(
            &PoseDetection::not_detected(),
            dims,
            Gender::Male,
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NoPoseDetected));
    }

    #[test]
    fn coincident_hips_report_unavailable_body_fat() {
        let dims = ImageDimensions::new(100, 100).unwrap();
        let mut points = vec![Landmark::new(0.5, 0.5, 1.0); LandmarkRole::COUNT];
        points[LandmarkRole::Nose.index()] = Landmark::new(0.5, 0.1, 1.0);
        points[LandmarkRole::LeftShoulder.index()] = Landmark::new(0.6, 0.25, 1.0);
        points[LandmarkRole::RightShoulder.index()] = Landmark::new(0.4, 0.25, 1.0);
        points[LandmarkRole::LeftHip.index()] = Landmark::new(0.5, 0.55, 1.0);
        points[LandmarkRole::RightHip.index()] = Landmark::new(0.5, 0.55, 1.0);
        points[LandmarkRole::LeftAnkle.index()] = Landmark::new(0.5, 0.9, 1.0);
        let detection = PoseDetection::with_landmarks(PoseLandmarks::new(points));

        let result = analyze_pose(&detection, dims, Gender::Male, &AnalysisConfig::default())
            .unwrap();

        assert_eq!(
            result.get(metric::LANDMARK_BODY_FAT_PERCENT),
            Some(MetricValue::Unavailable)
        );
        assert_eq!(result.value(metric::HIP_TO_SHOULDER_WIDTH_RATIO), Some(0.0));
        assert_eq!(result.value(metric::HIP_WIDTH_PX), Some(0.0));
        assert_eq!(result.value(metric::SHOULDER_WIDTH_PX), Some(20.0));
        assert_eq!(result.value(metric::HEIGHT_PX), Some(80.0));
    }

    #[test]
    fn serializes_unavailable_marker() {
        let result = AnalysisResult::new(vec![
            ("a", MetricValue::Value(1.5)),
            ("b", MetricValue::Unavailable),
        ]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"a":1.5,"b":"unavailable"}"#);
    }
}
