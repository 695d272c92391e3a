pub mod darts;
pub mod engine;
pub mod errors;
pub mod leg;
pub mod replay;
pub mod repository;
pub mod service;
pub mod turn;
pub mod variants;

#[cfg(test)]
pub(crate) mod test_utils;

pub use darts::{Dart, DartError, Multiplier, Throw, Visit, BULL, DARTS_PER_VISIT, MISS};
pub use engine::{score_visit, Ruling};
pub use errors::ScoringError;
pub use leg::{LegParameters, LegState, MatchType, OutshotType, PlayerLegState, TicTacToeBoard};
pub use replay::{replay_accepted, replay_leg, LegReplay};
pub use repository::{InMemoryLegRepository, LegRepository, StoredLeg};
pub use service::ScoringService;
pub use variants::{rules_for, Verdict, VariantRules};
