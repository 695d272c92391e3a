use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RatingError;
use crate::config::RatingSettings;
use crate::scoring::MatchType;
use crate::shared::{MatchId, PlayerId, TournamentId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRating {
    pub player_id: PlayerId,
    pub rating: i32,
    pub matches_played: u32,
}

impl PlayerRating {
    pub fn initial(player_id: PlayerId, settings: &RatingSettings) -> Self {
        Self {
            player_id,
            rating: settings.initial_rating,
            matches_played: 0,
        }
    }
}

/// A finished (or abandoned) match as the rating engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: MatchId,
    pub tournament_id: Option<TournamentId>,
    pub match_type: MatchType,
    pub winner_id: Option<PlayerId>,
    pub loser_id: Option<PlayerId>,
    /// Legs needed to win the match
    pub first_to: u32,
    pub is_finished: bool,
    pub is_practice: bool,
    pub is_abandoned: bool,
    pub completed_at: DateTime<Utc>,
}

impl MatchResult {
    /// Whether the match should move ratings at all.
    pub fn qualifies(&self, settings: &RatingSettings) -> bool {
        self.is_finished
            && !self.is_practice
            && !self.is_abandoned
            && self.match_type == settings.rated_match_type
            && self.first_to == 1
    }

    /// Winner and loser of a qualifying match.
    pub fn participants(&self) -> Result<(PlayerId, PlayerId), RatingError> {
        let malformed = |reason: &str| RatingError::MalformedMatch {
            match_id: self.match_id,
            reason: reason.to_string(),
        };

        let winner = self.winner_id.ok_or_else(|| malformed("no winner"))?;
        let loser = self.loser_id.ok_or_else(|| malformed("no loser"))?;
        if winner == loser {
            return Err(malformed("winner and loser are the same player"));
        }
        Ok((winner, loser))
    }
}

/// Where a rating lives: the global ladder or one tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingScope {
    Global,
    Tournament(TournamentId),
}

/// One changelog line: a player's rating before and after a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingChange {
    pub match_id: MatchId,
    pub scope: RatingScope,
    pub player_id: PlayerId,
    pub rating_before: i32,
    pub rating_after: i32,
    /// Matches played after this one
    pub matches_played: u32,
}

impl RatingChange {
    pub fn between(match_id: MatchId, scope: RatingScope, before: &PlayerRating, after: &PlayerRating) -> Self {
        Self {
            match_id,
            scope,
            player_id: after.player_id,
            rating_before: before.rating,
            rating_after: after.rating,
            matches_played: after.matches_played,
        }
    }

    pub fn rating(&self) -> PlayerRating {
        PlayerRating {
            player_id: self.player_id,
            rating: self.rating_after,
            matches_played: self.matches_played,
        }
    }
}

/// Ratings keyed by player. Players not in the table are unrated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingTable {
    ratings: BTreeMap<PlayerId, PlayerRating>,
}

impl RatingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every listed player on the initial rating.
    pub fn seeded(player_ids: &[PlayerId], settings: &RatingSettings) -> Self {
        let mut table = Self::new();
        for &player_id in player_ids {
            table.insert(PlayerRating::initial(player_id, settings));
        }
        table
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerRating> {
        self.ratings.get(&player_id)
    }

    pub fn get_or_initial(&self, player_id: PlayerId, settings: &RatingSettings) -> PlayerRating {
        self.get(player_id)
            .copied()
            .unwrap_or_else(|| PlayerRating::initial(player_id, settings))
    }

    pub fn insert(&mut self, rating: PlayerRating) {
        self.ratings.insert(rating.player_id, rating);
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRating> {
        self.ratings.values()
    }

    /// Highest rating first, ties by player id.
    pub fn standings(&self) -> Vec<PlayerRating> {
        let mut standings: Vec<PlayerRating> = self.ratings.values().copied().collect();
        standings.sort_by(|a, b| b.rating.cmp(&a.rating).then(a.player_id.cmp(&b.player_id)));
        standings
    }
}

/// Every stored rating at once, as produced by a full recalculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSnapshot {
    pub global: RatingTable,
    pub tournaments: BTreeMap<TournamentId, RatingTable>,
    pub changelog: Vec<RatingChange>,
}

impl RatingSnapshot {
    pub fn table(&self, scope: RatingScope) -> Option<&RatingTable> {
        match scope {
            RatingScope::Global => Some(&self.global),
            RatingScope::Tournament(id) => self.tournaments.get(&id),
        }
    }
}
