use thiserror::Error;

use crate::shared::MatchId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("Match {match_id} cannot be rated: {reason}")]
    MalformedMatch { match_id: MatchId, reason: String },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
