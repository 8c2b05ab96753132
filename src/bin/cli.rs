//! CLI application for body-composition metrics.
//!
//! Usage:
//!   body-metrics bmi --weight 70 --height 175
//!   body-metrics profile --weight 70 --height 175 --age 30 --gender male --activity moderate
//!   body-metrics analyze pose.json --gender female --image photo.jpg --json
//!
//! Domain errors (bad input, unreadable input files, missing landmarks) are
//! reported verbatim and exit with status 2. Anything else is reported
//! generically and exits with 1; its detail is only logged with `-v`.

use body_metrics::{
    analyze_pose, bmi, bmr, body_fat_percentage_from_bmi, daily_calories, ideal_weight, metric,
    ActivityLevel, AnalysisConfig, AnalysisResult, AnthropometricProfile, Gender,
    ImageDimensions, MetricValue, PoseDetection,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "body-metrics")]
#[command(author, version, about = "Body-composition metrics from measurements and pose landmarks", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(short, long, global = true)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Analysis config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Body Mass Index
    Bmi {
        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
        /// Height in centimeters
        #[arg(long)]
        height: f64,
    },

    /// Basal Metabolic Rate (Mifflin-St Jeor)
    Bmr {
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        height: f64,
        /// Age in years
        #[arg(long)]
        age: f64,
        /// male or female
        #[arg(long)]
        gender: String,
    },

    /// Daily calorie needs from a BMR
    DailyCalories {
        #[arg(long)]
        bmr: f64,
        /// sedentary, light, moderate, very or extra
        #[arg(long)]
        activity: String,
    },

    /// Body fat percentage estimated from BMI and age
    BodyFat {
        #[arg(long)]
        bmi: f64,
        #[arg(long)]
        age: f64,
        #[arg(long)]
        gender: String,
    },

    /// Ideal weight (Devine formula)
    IdealWeight {
        #[arg(long)]
        height: f64,
        #[arg(long)]
        gender: String,
    },

    /// All formula-based metrics for one person
    Profile {
        #[arg(long)]
        weight: f64,
        #[arg(long)]
        height: f64,
        #[arg(long)]
        age: f64,
        #[arg(long)]
        gender: String,
        #[arg(long, default_value = "sedentary")]
        activity: String,
    },

    /// Landmark-based body analysis
    Analyze {
        /// Pose detection output: {"detected": bool, "landmarks": [{x, y, visibility}, ...]}
        #[arg(required = true)]
        landmarks: PathBuf,

        #[arg(long, default_value = "male")]
        gender: String,

        /// Photo the landmarks were detected on; its size is read from the file
        #[arg(long, conflicts_with_all = ["image_width", "image_height"])]
        image: Option<PathBuf>,

        /// Image width in pixels
        #[arg(long, requires = "image_height")]
        image_width: Option<u32>,

        /// Image height in pixels
        #[arg(long, requires = "image_width")]
        image_height: Option<u32>,
    },
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    analysis: &'static str,
    metrics: AnalysisResult,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        std::process::exit(report_error(e.as_ref()));
    }
}

/// Print an error for the user and pick the exit status.
fn report_error(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<body_metrics::Error>() {
        Some(e) if e.is_client_error() => {
            eprintln!("Error: {}", e);
            2
        }
        _ => {
            tracing::debug!(error = %err, "unexpected failure");
            eprintln!("Error: an unexpected internal error occurred");
            1
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    let output = match &args.command {
        Command::Bmi { weight, height } => Output {
            analysis: "bmi",
            metrics: single(metric::BMI, bmi(*weight, *height)?),
        },
        Command::Bmr {
            weight,
            height,
            age,
            gender,
        } => Output {
            analysis: "bmr",
            metrics: single(metric::BMR, bmr(*weight, *height, *age, gender.parse::<Gender>()?)),
        },
        Command::DailyCalories { bmr, activity } => Output {
            analysis: "daily-calories",
            metrics: single(
                metric::DAILY_CALORIES,
                daily_calories(*bmr, activity.parse::<ActivityLevel>()?),
            ),
        },
        Command::BodyFat { bmi, age, gender } => Output {
            analysis: "body-fat",
            metrics: single(
                metric::BMI_BODY_FAT_PERCENT,
                body_fat_percentage_from_bmi(*bmi, *age, gender.parse::<Gender>()?),
            ),
        },
        Command::IdealWeight { height, gender } => Output {
            analysis: "ideal-weight",
            metrics: single(metric::IDEAL_WEIGHT_KG, ideal_weight(*height, gender.parse::<Gender>()?)),
        },
        Command::Profile {
            weight,
            height,
            age,
            gender,
            activity,
        } => {
            let profile = AnthropometricProfile {
                weight_kg: *weight,
                height_cm: *height,
                age_years: *age,
                gender: gender.parse::<Gender>()?,
                activity_level: activity.parse::<ActivityLevel>()?,
            };
            Output {
                analysis: "profile",
                metrics: profile.report()?,
            }
        }
        Command::Analyze {
            landmarks,
            gender,
            image: image_path,
            image_width,
            image_height,
        } => {
            let gender: Gender = gender.parse::<Gender>()?;

            let dims = match (image_path, image_width, image_height) {
                (Some(path), _, _) => {
                    tracing::debug!("reading image size from {:?}", path);
                    ImageDimensions::from_image(path)?
                }
                (None, Some(w), Some(h)) => ImageDimensions::new(*w, *h)?,
                _ => {
                    return Err(body_metrics::Error::InvalidInput(
                        "either --image or --image-width and --image-height is required".into(),
                    )
                    .into())
                }
            };

            tracing::debug!("loading landmarks from {:?}", landmarks);
            let detection = PoseDetection::load(landmarks)?;

            Output {
                analysis: "analyze",
                metrics: analyze_pose(&detection, dims, gender, &config)?,
            }
        }
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        tracing::debug!("output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn single(name: &'static str, value: f64) -> AnalysisResult {
    AnalysisResult::new(vec![(name, MetricValue::Value(value))])
}

fn label(name: &str) -> (&'static str, &'static str) {
    match name {
        metric::BMI => ("BMI", " kg/m²"),
        metric::BMR => ("BMR", " kcal/day"),
        metric::DAILY_CALORIES => ("Daily calories", " kcal/day"),
        metric::BMI_BODY_FAT_PERCENT => ("Body fat (BMI estimate)", "%"),
        metric::IDEAL_WEIGHT_KG => ("Ideal weight", " kg"),
        metric::LANDMARK_BODY_FAT_PERCENT => ("Body fat (landmark estimate)", "%"),
        metric::HIP_TO_SHOULDER_WIDTH_RATIO => ("Hip/shoulder width ratio", ""),
        metric::SHOULDER_WIDTH_PX => ("Shoulder width", " px"),
        metric::HIP_WIDTH_PX => ("Hip width", " px"),
        metric::HEIGHT_PX => ("Body height", " px"),
        _ => ("", ""),
    }
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    for (name, value) in output.metrics.iter() {
        let (title, unit) = label(name);
        let title = if title.is_empty() { name } else { title };
        match value {
            MetricValue::Value(v) => s.push_str(&format!("{:<30} {}{}\n", title, v, unit)),
            MetricValue::Unavailable => {
                s.push_str(&format!("{:<30} not computable\n", title))
            }
        }
    }

    s.truncate(s.trim_end().len());
    s
}
