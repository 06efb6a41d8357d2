//! Scoring constants and runtime configuration.

use std::ops::RangeInclusive;

/// Valid range of a single attribute.
pub const ATTRIBUTE_RANGE: RangeInclusive<i64> = 1..=20;
/// Valid range of a category score (technical, mental, physical, goalkeeping).
pub const CATEGORY_SCORE_RANGE: RangeInclusive<i64> = 5..=100;
/// Valid range of the overall score.
pub const OVERALL_SCORE_RANGE: RangeInclusive<i64> = 10..=200;

/// 1-20 attribute average to 5-100 category score (20 * 5 = 100).
pub const ATTRIBUTE_TO_CATEGORY_SCALE: f64 = 5.0;
/// 5-100 category score back to 1-20 attribute average.
pub const CATEGORY_TO_ATTRIBUTE_SCALE: f64 = 5.0;

pub const TECHNICAL_WEIGHT: i64 = 3;
pub const MENTAL_WEIGHT: i64 = 2;
pub const PHYSICAL_WEIGHT: i64 = 3;
pub const GK_WEIGHT: i64 = 2;

/// All categories at 100 weigh 1000; dividing by 5 maps that to 200.
pub const OVERALL_SCORE_DIVISOR: i64 = 5;

/// Overall drift accepted after the goalkeeping correction pass.
pub const OVERALL_DRIFT_TOLERANCE: i64 = 2;

/// Trial offsets around the computed correction, evaluated in this order.
pub const CORRECTION_WINDOW: [i64; 5] = [-2, -1, 0, 1, 2];

/// Upper bound on swap-refinement passes when balancing two teams.
pub const ALLOCATION_MAX_ITERATIONS: usize = 100;

pub const STARTER_DEFENDER_RATIO: f64 = 0.4;
pub const STARTER_MIDFIELDER_RATIO: f64 = 0.35;
pub const SUBSTITUTE_GOALKEEPER_RATIO: f64 = 0.1;
pub const SUBSTITUTE_DEFENDER_RATIO: f64 = 0.4;
pub const SUBSTITUTE_MIDFIELDER_RATIO: f64 = 0.35;

/// Clamp `value` into an inclusive range.
pub fn clamp_to(value: i64, range: &RangeInclusive<i64>) -> i64 {
    value.clamp(*range.start(), *range.end())
}

/// Runtime settings for the web binary, read from the environment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Seed for the position shuffle; `None` draws from entropy.
    pub shuffle_seed: Option<u64>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shuffle_seed: None,
        }
    }
}

impl AppConfig {
    /// Read `HOST`, `PORT` and `SHUFFLE_SEED`. Unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or_else(default_port);
        let shuffle_seed = lookup("SHUFFLE_SEED").and_then(|s| s.trim().parse().ok());
        Self {
            host,
            port,
            shuffle_seed,
        }
    }
}
