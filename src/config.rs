use std::str::FromStr;

use tracing::warn;

use crate::rating::RatingError;
use crate::scoring::MatchType;

pub const ENV_INITIAL_RATING: &str = "RATING_INITIAL";
pub const ENV_EXPERIENCE_THRESHOLD: &str = "RATING_EXPERIENCE_THRESHOLD";
pub const ENV_K_PROVISIONAL: &str = "RATING_K_PROVISIONAL";
pub const ENV_K_ESTABLISHED: &str = "RATING_K_ESTABLISHED";

/// Tuning knobs for the Elo engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingSettings {
    pub initial_rating: i32,
    /// Players with fewer rated matches than this use `k_provisional`
    pub experience_threshold: u32,
    pub k_provisional: f64,
    pub k_established: f64,
    /// Only matches of this type move ratings
    pub rated_match_type: MatchType,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            initial_rating: 1500,
            experience_threshold: 10,
            k_provisional: 32.0,
            k_established: 16.0,
            rated_match_type: MatchType::X01,
        }
    }
}

impl RatingSettings {
    /// Builds settings from the environment, keeping the default for any
    /// variable that is missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            initial_rating: read_or(&lookup, ENV_INITIAL_RATING, defaults.initial_rating),
            experience_threshold: read_or(
                &lookup,
                ENV_EXPERIENCE_THRESHOLD,
                defaults.experience_threshold,
            ),
            k_provisional: read_or(&lookup, ENV_K_PROVISIONAL, defaults.k_provisional),
            k_established: read_or(&lookup, ENV_K_ESTABLISHED, defaults.k_established),
            rated_match_type: defaults.rated_match_type,
        }
    }

    pub fn validate(&self) -> Result<(), RatingError> {
        if self.initial_rating <= 0 {
            return Err(RatingError::Validation(format!(
                "Initial rating must be positive, got {}",
                self.initial_rating
            )));
        }
        for (name, k) in [
            ("k_provisional", self.k_provisional),
            ("k_established", self.k_established),
        ] {
            if !k.is_finite() || k <= 0.0 {
                return Err(RatingError::Validation(format!(
                    "{} must be a positive number, got {}",
                    name, k
                )));
            }
        }
        Ok(())
    }
}

fn read_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key = key, value = %raw, "Ignoring unparsable rating setting");
            default
        }),
        None => default,
    }
}
