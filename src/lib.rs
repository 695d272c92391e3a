// Library crate for the darts scoring and rating engine
// This file exposes the public API for embedders and integration tests

pub mod config;
pub mod rating;
pub mod scoring;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::RatingSettings;
pub use rating::{
    calculate_tournament_ratings, recalculate_ratings, update_rating_for_match,
    InMemoryRatingRepository, MatchResult, PlayerRating, RatingChange, RatingError,
    RatingRepository, RatingScope, RatingService, RatingSnapshot, RatingTable,
};
pub use scoring::{
    replay_accepted, replay_leg, score_visit, Dart, InMemoryLegRepository, LegParameters, LegReplay,
    LegRepository, LegState, MatchType, Multiplier, OutshotType, Ruling, ScoringError,
    ScoringService, StoredLeg, Throw, TicTacToeBoard, Visit,
};
pub use shared::{LegId, MatchId, PlayerId, TournamentId, VisitId};
