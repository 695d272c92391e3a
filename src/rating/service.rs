use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, instrument};

use super::elo::update_rating_for_match;
use super::recalculate::{calculate_tournament_ratings, rebuild_snapshot};
use super::repository::RatingRepository;
use super::{
    MatchResult, PlayerRating, RatingChange, RatingError, RatingScope, RatingSnapshot, RatingTable,
};
use crate::config::RatingSettings;
use crate::shared::{PlayerId, TournamentId};

/// Keeps stored ratings in step with completed matches.
pub struct RatingService {
    repository: Arc<dyn RatingRepository>,
    settings: RatingSettings,
    // Rating writes touch two players at once, so they are serialized
    write_lock: AsyncMutex<()>,
}

impl RatingService {
    pub fn new(
        repository: Arc<dyn RatingRepository>,
        settings: RatingSettings,
    ) -> Result<Self, RatingError> {
        settings.validate()?;
        Ok(Self {
            repository,
            settings,
            write_lock: AsyncMutex::new(()),
        })
    }

    pub fn settings(&self) -> &RatingSettings {
        &self.settings
    }

    /// Records the match and, when it qualifies, moves both players'
    /// ratings globally and within its tournament. Returns the changelog
    /// entries written, empty for a match that does not count.
    #[instrument(skip(self, result), fields(match_id = result.match_id))]
    pub async fn process_completed_match(
        &self,
        result: MatchResult,
    ) -> Result<Vec<RatingChange>, RatingError> {
        let _guard = self.write_lock.lock().await;

        let qualifies = result.qualifies(&self.settings);
        let participants = if qualifies {
            Some(result.participants()?)
        } else {
            None
        };
        self.repository.record_match(result.clone()).await?;

        let Some((winner_id, loser_id)) = participants else {
            debug!("Match does not qualify for rating");
            return Ok(Vec::new());
        };

        let mut scopes = vec![RatingScope::Global];
        if let Some(tournament_id) = result.tournament_id {
            scopes.push(RatingScope::Tournament(tournament_id));
        }

        let mut changes = Vec::with_capacity(scopes.len() * 2);
        for scope in scopes {
            let table = self.repository.ratings(scope).await?;
            let winner = table.get_or_initial(winner_id, &self.settings);
            let loser = table.get_or_initial(loser_id, &self.settings);
            let (winner_after, loser_after) =
                update_rating_for_match(result.match_id, &winner, &loser, &self.settings)?;

            changes.push(RatingChange::between(result.match_id, scope, &winner, &winner_after));
            changes.push(RatingChange::between(result.match_id, scope, &loser, &loser_after));
        }

        self.repository.apply_changes(changes.clone()).await?;
        info!(
            winner_id,
            loser_id,
            changes = changes.len(),
            "Ratings updated for match"
        );
        Ok(changes)
    }

    /// Stored global rating, or the initial rating for an unrated player.
    pub async fn rating(&self, player_id: PlayerId) -> Result<PlayerRating, RatingError> {
        let table = self.repository.ratings(RatingScope::Global).await?;
        Ok(table.get_or_initial(player_id, &self.settings))
    }

    pub async fn ratings(&self, scope: RatingScope) -> Result<RatingTable, RatingError> {
        self.repository.ratings(scope).await
    }

    /// Rebuilds every rating from match history. The stored tables change
    /// only if the whole rebuild succeeds and `dry_run` is off.
    #[instrument(skip(self))]
    pub async fn recalculate(&self, dry_run: bool) -> Result<RatingSnapshot, RatingError> {
        let _guard = self.write_lock.lock().await;

        let history = self.repository.match_history().await?;
        let snapshot = rebuild_snapshot(&history, &self.settings)?;

        if dry_run {
            info!(players = snapshot.global.len(), "Ratings not replaced, dry run");
            return Ok(snapshot);
        }

        self.repository.replace_all(snapshot.clone()).await?;
        info!(
            matches = history.len(),
            players = snapshot.global.len(),
            "Ratings recalculated"
        );
        Ok(snapshot)
    }

    /// Tournament-local standings computed from history. Nothing is stored.
    #[instrument(skip(self, player_ids))]
    pub async fn calculate_tournament(
        &self,
        tournament_id: TournamentId,
        player_ids: &[PlayerId],
    ) -> Result<Vec<PlayerRating>, RatingError> {
        let history = self.repository.match_history().await?;
        let table =
            calculate_tournament_ratings(tournament_id, player_ids, &history, &self.settings)?;

        let standings = table.standings();
        for (position, rating) in standings.iter().enumerate() {
            debug!(
                position = position + 1,
                player_id = rating.player_id,
                rating = rating.rating,
                matches = rating.matches_played,
                "Tournament standing"
            );
        }
        Ok(standings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::InMemoryRatingRepository;
    use crate::scoring::MatchType;
    use chrono::{Duration, Utc};

    fn service() -> RatingService {
        RatingService::new(
            Arc::new(InMemoryRatingRepository::new()),
            RatingSettings::default(),
        )
        .unwrap()
    }

    fn finished(match_id: i32, winner: i32, loser: i32) -> MatchResult {
        MatchResult {
            match_id,
            tournament_id: None,
            match_type: MatchType::X01,
            winner_id: Some(winner),
            loser_id: Some(loser),
            first_to: 1,
            is_finished: true,
            is_practice: false,
            is_abandoned: false,
            completed_at: Utc::now() + Duration::seconds(match_id as i64),
        }
    }

    #[tokio::test]
    async fn rejects_invalid_settings() {
        let settings = RatingSettings {
            k_provisional: -1.0,
            ..RatingSettings::default()
        };
        let result = RatingService::new(Arc::new(InMemoryRatingRepository::new()), settings);
        assert!(matches!(result, Err(RatingError::Validation(_))));
    }

    #[tokio::test]
    async fn qualifying_match_moves_ratings() {
        let service = service();
        let changes = service.process_completed_match(finished(1, 1, 2)).await.unwrap();

        assert_eq!(changes.len(), 2);
        assert_eq!(service.rating(1).await.unwrap().rating, 1516);
        assert_eq!(service.rating(2).await.unwrap().rating, 1484);
        assert_eq!(service.rating(3).await.unwrap().rating, 1500);
    }

    #[tokio::test]
    async fn tournament_match_updates_both_scopes() {
        let service = service();
        let mut result = finished(1, 1, 2);
        result.tournament_id = Some(4);

        let changes = service.process_completed_match(result).await.unwrap();
        assert_eq!(changes.len(), 4);

        let tournament = service.ratings(RatingScope::Tournament(4)).await.unwrap();
        assert_eq!(tournament.get(1).unwrap().rating, 1516);
    }

    #[tokio::test]
    async fn practice_match_is_recorded_but_not_rated() {
        let service = service();
        let mut result = finished(1, 1, 2);
        result.is_practice = true;

        let changes = service.process_completed_match(result).await.unwrap();
        assert!(changes.is_empty());
        assert!(service.ratings(RatingScope::Global).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_match_is_rejected() {
        let service = service();
        service.process_completed_match(finished(1, 1, 2)).await.unwrap();
        assert!(matches!(
            service.process_completed_match(finished(1, 1, 2)).await,
            Err(RatingError::Validation(_))
        ));
        assert_eq!(service.rating(1).await.unwrap().matches_played, 1);
    }

    #[tokio::test]
    async fn malformed_match_changes_nothing() {
        let service = service();
        let result = service.process_completed_match(finished(1, 1, 1)).await;
        assert!(matches!(result, Err(RatingError::MalformedMatch { .. })));
        assert!(service.ratings(RatingScope::Global).await.unwrap().is_empty());
    }
}
