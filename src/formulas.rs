//! Closed-form health indices from user-entered measurements.
//!
//! Every function here is pure. Gender and activity level are closed enums,
//! so malformed strings are rejected once, when they are parsed at the
//! boundary, instead of inside each formula.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const CM_PER_INCH: f64 = 2.54;
const KG_PER_LB: f64 = 0.45359237;

/// Heights below this are outside the range the Devine formula was fitted on.
const DEVINE_BASE_INCHES: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(Error::InvalidInput(format!(
                "gender must be 'male' or 'female', got '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Physical activity level used to scale BMR into daily energy needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Very,
    Extra,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Very,
        ActivityLevel::Extra,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Very => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Very => "very",
            ActivityLevel::Extra => "extra",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.name() == wanted)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "activity level must be one of sedentary, light, moderate, very, extra; got '{}'",
                    s
                ))
            })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Round to two decimal places, halves away from zero.
///
/// Unlike banker's rounding, an exact half always moves outward:
/// `round2(0.125) == 0.13`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Body Mass Index in kg/m², rounded to two decimals.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<f64> {
    if height_cm.is_nan() || height_cm <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "height must be positive, got {} cm",
            height_cm
        )));
    }
    let height_m = height_cm / 100.0;
    Ok(round2(weight_kg / (height_m * height_m)))
}

/// Basal Metabolic Rate in kcal/day (Mifflin-St Jeor), rounded to an integer.
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    let offset = match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    (base + offset).round()
}

/// Daily energy needs in kcal/day, rounded to an integer.
pub fn daily_calories(bmr: f64, activity_level: ActivityLevel) -> f64 {
    (bmr * activity_level.multiplier()).round()
}

/// Body fat percentage estimated from BMI and age (Deurenberg-style).
///
/// This is a coarse population heuristic and unrelated to the landmark-based
/// estimate in [`crate::ratios`].
pub fn body_fat_percentage_from_bmi(bmi: f64, age_years: f64, gender: Gender) -> f64 {
    let offset = match gender {
        Gender::Male => 16.2,
        Gender::Female => 5.4,
    };
    round2(1.20 * bmi + 0.23 * age_years - offset)
}

/// Ideal body weight in kg using the Devine formula.
///
/// The formula is linear in inches above five feet and is applied as-is:
/// heights under 60 inches give values below the base constant, and very
/// short heights give negative weights.
pub fn ideal_weight(height_cm: f64, gender: Gender) -> f64 {
    let height_in = height_cm / CM_PER_INCH;
    if height_in < DEVINE_BASE_INCHES {
        tracing::debug!(
            height_cm,
            "height below {} in is outside the Devine formula's range",
            DEVINE_BASE_INCHES
        );
    }
    let base = match gender {
        Gender::Male => 50.0,
        Gender::Female => 45.5,
    };
    let ideal = base + 2.3 * (height_in - DEVINE_BASE_INCHES);
    round2(ideal * KG_PER_LB)
}
