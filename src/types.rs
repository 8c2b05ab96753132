use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An integer pixel location inside an image.
///
/// Always satisfies `x < width` and `y < height` for the image it was
/// projected onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    pub fn distance(&self, other: &PixelPoint) -> f64 {
        self.to_point().distance(&other.to_point())
    }
}

/// Image size in pixels. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageDimensions {
    width: u32,
    height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Read the size from an image file header without decoding the pixels.
    pub fn from_image<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (width, height) =
            image::image_dimensions(path).map_err(|e| Error::unreadable(path, e))?;
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// A body landmark as produced by the pose model.
///
/// `x` and `y` are normalized to [0,1] relative to the image width and height;
/// `visibility` is the detector's confidence that the point is visible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    /// Project onto the image, clipping to the pixel grid.
    ///
    /// Normalized values of exactly 1.0 (or small detector overshoot) land on
    /// the last row/column instead of outside the image.
    pub fn to_pixel(&self, dims: ImageDimensions) -> PixelPoint {
        let w = dims.width() as f64;
        let h = dims.height() as f64;
        // NaN coordinates clamp to 0 through the `as` cast
        let x = (self.x * w).clamp(0.0, w - 1.0);
        let y = (self.y * h).clamp(0.0, h - 1.0);
        PixelPoint::new(x as u32, y as u32)
    }
}

/// Anatomical role of a landmark, in the pose model's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LandmarkRole {
    Nose,
    LeftEyeInner,
    LeftEye,
    LeftEyeOuter,
    RightEyeInner,
    RightEye,
    RightEyeOuter,
    LeftEar,
    RightEar,
    MouthLeft,
    MouthRight,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftPinky,
    RightPinky,
    LeftIndex,
    RightIndex,
    LeftThumb,
    RightThumb,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHeel,
    RightHeel,
    LeftFootIndex,
    RightFootIndex,
}

impl LandmarkRole {
    pub const COUNT: usize = 33;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        use LandmarkRole::*;
        match self {
            Nose => "NOSE",
            LeftEyeInner => "LEFT_EYE_INNER",
            LeftEye => "LEFT_EYE",
            LeftEyeOuter => "LEFT_EYE_OUTER",
            RightEyeInner => "RIGHT_EYE_INNER",
            RightEye => "RIGHT_EYE",
            RightEyeOuter => "RIGHT_EYE_OUTER",
            LeftEar => "LEFT_EAR",
            RightEar => "RIGHT_EAR",
            MouthLeft => "MOUTH_LEFT",
            MouthRight => "MOUTH_RIGHT",
            LeftShoulder => "LEFT_SHOULDER",
            RightShoulder => "RIGHT_SHOULDER",
            LeftElbow => "LEFT_ELBOW",
            RightElbow => "RIGHT_ELBOW",
            LeftWrist => "LEFT_WRIST",
            RightWrist => "RIGHT_WRIST",
            LeftPinky => "LEFT_PINKY",
            RightPinky => "RIGHT_PINKY",
            LeftIndex => "LEFT_INDEX",
            RightIndex => "RIGHT_INDEX",
            LeftThumb => "LEFT_THUMB",
            RightThumb => "RIGHT_THUMB",
            LeftHip => "LEFT_HIP",
            RightHip => "RIGHT_HIP",
            LeftKnee => "LEFT_KNEE",
            RightKnee => "RIGHT_KNEE",
            LeftAnkle => "LEFT_ANKLE",
            RightAnkle => "RIGHT_ANKLE",
            LeftHeel => "LEFT_HEEL",
            RightHeel => "RIGHT_HEEL",
            LeftFootIndex => "LEFT_FOOT_INDEX",
            RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

/// Landmarks for one detected body, ordered by [`LandmarkRole::index`].
///
/// A role whose index lies past the end of the collection counts as not
/// detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseLandmarks {
    pub points: Vec<Landmark>,
}

impl PoseLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, role: LandmarkRole) -> Option<&Landmark> {
        self.points.get(role.index())
    }

    /// Like [`get`](Self::get), failing with `MissingLandmark` when absent.
    pub fn require(&self, role: LandmarkRole) -> Result<&Landmark> {
        self.get(role).ok_or(Error::MissingLandmark(role))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }
}

/// Output of the external pose model for one image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDetection {
    pub detected: bool,
    #[serde(default)]
    pub landmarks: PoseLandmarks,
}

impl PoseDetection {
    pub fn with_landmarks(landmarks: PoseLandmarks) -> Self {
        Self {
            detected: true,
            landmarks,
        }
    }

    pub fn not_detected() -> Self {
        Self::default()
    }

    /// Load pose model output from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::unreadable(path, e))?;
        serde_json::from_str(&content).map_err(|e| Error::unreadable(path, e))
    }
}
