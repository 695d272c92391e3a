//! Identifier types shared by the scoring and rating modules.

pub type PlayerId = i32;
pub type LegId = i32;
pub type MatchId = i32;
pub type TournamentId = i32;
pub type VisitId = i32;
