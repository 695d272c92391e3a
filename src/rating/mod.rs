pub mod elo;
pub mod errors;
pub mod models;
pub mod recalculate;
pub mod repository;
pub mod service;

pub use elo::{expected_score, k_factor, update_rating_for_match};
pub use errors::RatingError;
pub use models::{
    MatchResult, PlayerRating, RatingChange, RatingScope, RatingSnapshot, RatingTable,
};
pub use recalculate::{
    apply_match, apply_matches, calculate_tournament_ratings, rebuild_snapshot,
    recalculate_ratings,
};
pub use repository::{InMemoryRatingRepository, RatingRepository};
pub use service::RatingService;
