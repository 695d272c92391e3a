use chrono::{DateTime, Duration, TimeZone, Utc};

use dartscore::{MatchId, MatchResult, MatchType, PlayerId, TournamentId};

// ============================================================================
// Match Result Utilities
// ============================================================================

fn season_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 6, 19, 0, 0).unwrap()
}

pub struct MatchBuilder {
    result: MatchResult,
}

impl MatchBuilder {
    /// A rated first-to-one X01 match finished `minute` minutes into the evening.
    pub fn won(match_id: MatchId, winner: PlayerId, loser: PlayerId, minute: i64) -> Self {
        Self {
            result: MatchResult {
                match_id,
                tournament_id: None,
                match_type: MatchType::X01,
                winner_id: Some(winner),
                loser_id: Some(loser),
                first_to: 1,
                is_finished: true,
                is_practice: false,
                is_abandoned: false,
                completed_at: season_start() + Duration::minutes(minute),
            },
        }
    }

    pub fn in_tournament(mut self, tournament_id: TournamentId) -> Self {
        self.result.tournament_id = Some(tournament_id);
        self
    }

    pub fn practice(mut self) -> Self {
        self.result.is_practice = true;
        self
    }

    pub fn abandoned(mut self) -> Self {
        self.result.is_abandoned = true;
        self
    }

    pub fn of_type(mut self, match_type: MatchType) -> Self {
        self.result.match_type = match_type;
        self
    }

    pub fn build(self) -> MatchResult {
        self.result
    }
}
