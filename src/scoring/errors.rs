use thiserror::Error;

use super::darts::DartError;
use crate::shared::{LegId, PlayerId, VisitId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("Invalid dart: {0}")]
    InvalidDart(#[from] DartError),

    #[error("Player {0} is not the current player")]
    NotCurrentPlayer(PlayerId),

    #[error("Leg {0} already finished")]
    LegAlreadyFinished(LegId),

    #[error("Visit for leg {visit_leg} cannot be scored on leg {leg}")]
    LegMismatch { visit_leg: LegId, leg: LegId },

    #[error("Leg {0} was modified concurrently")]
    ConcurrentModification(LegId),

    #[error("Leg not found: {0}")]
    LegNotFound(LegId),

    #[error("Visit not found: {0}")]
    VisitNotFound(VisitId),

    #[error("Leg {0} has no visits to delete")]
    NoVisitsToDelete(LegId),

    #[error("Invalid leg setup: {0}")]
    InvalidSetup(String),

    #[error("Repository error: {0}")]
    Repository(String),
}
