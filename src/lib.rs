//! # body-metrics
//!
//! Body-composition estimates from user measurements and pose landmarks.
//!
//! This crate provides:
//! - **Formulas**: BMI, BMR (Mifflin-St Jeor), daily calories, a BMI-based
//!   body fat heuristic and ideal weight (Devine)
//! - **Geometry**: pixel-space hip width, shoulder width and body height from
//!   normalized pose landmarks
//! - **Ratios**: a width-based body fat regression and the hip-to-shoulder
//!   width ratio
//!
//! Pose detection itself is left to the caller: any model that yields the
//! 33 BlazePose landmarks in normalized image coordinates can feed
//! [`analyze_pose`].
//!
//! ## Quick Start
//!
//! ```rust
//! use body_metrics::{
//!     analyze_pose, metric, ActivityLevel, AnalysisConfig, AnthropometricProfile, Gender,
//!     ImageDimensions, Landmark, LandmarkRole, PoseDetection, PoseLandmarks,
//! };
//!
//! let profile = AnthropometricProfile {
//!     weight_kg: 70.0,
//!     height_cm: 175.0,
//!     age_years: 30.0,
//!     gender: Gender::Male,
//!     activity_level: ActivityLevel::Moderate,
//! };
//! let report = profile.report().unwrap();
//! assert_eq!(report.value(metric::BMI), Some(22.86));
//!
//! // Landmarks as returned by a pose model
//! let mut points = vec![Landmark::new(0.5, 0.5, 0.9); LandmarkRole::COUNT];
//! points[LandmarkRole::Nose.index()] = Landmark::new(0.5, 0.1, 0.9);
//! points[LandmarkRole::LeftShoulder.index()] = Landmark::new(0.6, 0.25, 0.9);
//! points[LandmarkRole::RightShoulder.index()] = Landmark::new(0.4, 0.25, 0.9);
//! points[LandmarkRole::LeftHip.index()] = Landmark::new(0.55, 0.55, 0.9);
//! points[LandmarkRole::RightHip.index()] = Landmark::new(0.45, 0.55, 0.9);
//! points[LandmarkRole::LeftAnkle.index()] = Landmark::new(0.55, 0.9, 0.9);
//! let detection = PoseDetection::with_landmarks(PoseLandmarks::new(points));
//!
//! let dims = ImageDimensions::new(1000, 1000).unwrap();
//! let result = analyze_pose(&detection, dims, Gender::Male, &AnalysisConfig::default()).unwrap();
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```

mod analysis;
mod config;
mod error;
pub mod formulas;
mod geometry;
mod ratios;
mod types;

pub use analysis::{analyze_pose, metric, AnalysisResult, AnthropometricProfile, MetricValue};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use formulas::{
    bmi, bmr, body_fat_percentage_from_bmi, daily_calories, ideal_weight, ActivityLevel, Gender,
};
pub use geometry::{visible_height, BodyMeasurements, REQUIRED_ROLES};
pub use ratios::{hip_to_shoulder_ratio, landmark_body_fat, BodyRatios};
pub use types::{
    ImageDimensions, Landmark, LandmarkRole, PixelPoint, Point, PoseDetection, PoseLandmarks,
};
