use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument, warn};

use super::darts::{Throw, Visit, DARTS_PER_VISIT};
use super::engine::{score_visit, Ruling};
use super::errors::ScoringError;
use super::leg::{LegParameters, LegState, MatchType};
use super::replay::{replay_accepted, replay_leg, LegReplay};
use super::repository::{LegRepository, StoredLeg};
use crate::shared::{LegId, PlayerId, VisitId};

/// Stateful front of the rule engine: loads a leg, scores a visit against
/// it and commits the result, one writer per leg at a time.
pub struct ScoringService {
    repository: Arc<dyn LegRepository>,
    leg_mutexes: Arc<RwLock<HashMap<LegId, Arc<AsyncMutex<()>>>>>,
}

impl ScoringService {
    pub fn new(repository: Arc<dyn LegRepository>) -> Self {
        Self {
            repository,
            leg_mutexes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Start a leg where everyone begins on the variant's starting score
    #[instrument(skip(self, parameters, player_ids))]
    pub async fn start_leg(
        &self,
        leg_id: LegId,
        match_type: MatchType,
        parameters: LegParameters,
        player_ids: &[PlayerId],
    ) -> Result<LegState, ScoringError> {
        let leg = LegState::start(leg_id, match_type, parameters, player_ids)?;
        let stored = self.repository.create_leg(leg).await?;
        info!(players = player_ids.len(), "Leg started");
        Ok(stored.state)
    }

    /// Start an X01 handicap leg with a starting score per player
    #[instrument(skip(self, parameters, seats))]
    pub async fn start_handicap_leg(
        &self,
        leg_id: LegId,
        parameters: LegParameters,
        seats: &[(PlayerId, i32)],
    ) -> Result<LegState, ScoringError> {
        let leg = LegState::start_with_scores(leg_id, MatchType::X01Handicap, parameters, seats)?;
        let stored = self.repository.create_leg(leg).await?;
        info!(players = seats.len(), "Handicap leg started");
        Ok(stored.state)
    }

    pub async fn get_leg(&self, leg_id: LegId) -> Result<StoredLeg, ScoringError> {
        self.repository
            .get_leg(leg_id)
            .await?
            .ok_or(ScoringError::LegNotFound(leg_id))
    }

    /// Score a visit and commit it. Nothing is stored when the visit is rejected.
    #[instrument(skip(self, visit), fields(leg_id = visit.leg_id, player_id = visit.player_id))]
    pub async fn add_visit(&self, visit: Visit) -> Result<Ruling, ScoringError> {
        let leg_lock = self.leg_lock(visit.leg_id).await;
        let _guard = leg_lock.lock().await;

        let stored = self.get_leg(visit.leg_id).await?;
        let mut ruling = score_visit(&visit, &stored.state).inspect_err(|e| {
            warn!(error = %e, "Visit rejected");
        })?;

        let committed = self
            .repository
            .commit_visit(
                visit.leg_id,
                stored.version,
                ruling.visit.clone(),
                ruling.leg.clone(),
            )
            .await?;
        ruling.visit.id = committed.visits.last().and_then(|v| v.id);

        info!(
            visit_id = ?ruling.visit.id,
            score_delta = ruling.score_delta,
            is_bust = ruling.is_bust,
            is_leg_finished = ruling.is_leg_finished,
            "Visit added"
        );
        if ruling.is_leg_finished {
            info!(winner_id = ?ruling.winner_id, "Leg finished");
            self.clear_leg_lock(visit.leg_id).await;
        }

        Ok(ruling)
    }

    /// What adding the visit would do, without storing anything.
    pub async fn preview_visit(&self, visit: &Visit) -> Result<Ruling, ScoringError> {
        let stored = self.get_leg(visit.leg_id).await?;
        score_visit(visit, &stored.state)
    }

    /// Correct the darts of a stored visit. No variant rules run and the leg
    /// state is left as it was; use `recalculate_leg` to re-derive it.
    #[instrument(skip(self, throws))]
    pub async fn modify_visit(
        &self,
        leg_id: LegId,
        visit_id: VisitId,
        throws: [Throw; DARTS_PER_VISIT],
    ) -> Result<Visit, ScoringError> {
        let leg_lock = self.leg_lock(leg_id).await;
        let _guard = leg_lock.lock().await;

        let stored = self.get_leg(leg_id).await?;
        let mut visit = stored
            .visit(visit_id)
            .cloned()
            .ok_or(ScoringError::VisitNotFound(visit_id))?;
        visit.correct_throws(throws)?;

        self.repository.modify_visit(leg_id, visit.clone()).await?;
        info!(visit = %visit, "Visit modified");
        Ok(visit)
    }

    /// Drop the most recent visit and rebuild the leg from the rest.
    #[instrument(skip(self))]
    pub async fn delete_last_visit(&self, leg_id: LegId) -> Result<LegState, ScoringError> {
        let leg_lock = self.leg_lock(leg_id).await;
        let _guard = leg_lock.lock().await;

        let stored = self.get_leg(leg_id).await?;
        let position = stored
            .visits
            .len()
            .checked_sub(1)
            .ok_or(ScoringError::NoVisitsToDelete(leg_id))?;
        self.remove_visit(&stored, position).await
    }

    /// Drop any stored visit and rebuild the leg from the rest.
    #[instrument(skip(self))]
    pub async fn delete_visit(
        &self,
        leg_id: LegId,
        visit_id: VisitId,
    ) -> Result<LegState, ScoringError> {
        let leg_lock = self.leg_lock(leg_id).await;
        let _guard = leg_lock.lock().await;

        let stored = self.get_leg(leg_id).await?;
        let position = stored
            .visits
            .iter()
            .position(|v| v.id == Some(visit_id))
            .ok_or(ScoringError::VisitNotFound(visit_id))?;
        self.remove_visit(&stored, position).await
    }

    /// Removes the visit at `position` and rescores what is left. Visits
    /// from the first one the engine rejects onwards are kept as stored,
    /// so a delete always goes through.
    async fn remove_visit(
        &self,
        stored: &StoredLeg,
        position: usize,
    ) -> Result<LegState, ScoringError> {
        let leg_id = stored.state.leg_id;
        let mut visits = stored.visits.clone();
        let removed = visits.remove(position);

        let (replay, rejected) = replay_accepted(&stored.initial, &visits);
        let mut history = replay.visits;
        if let Some((at, error)) = rejected {
            warn!(
                error = %error,
                visit_id = ?visits[at].id,
                unscored = visits.len() - at,
                "Visits kept as stored, they no longer fit the leg"
            );
            history.extend_from_slice(&visits[at..]);
        }

        let updated = self
            .repository
            .replace_history(leg_id, stored.version, history, replay.leg)
            .await?;

        info!(visit_id = ?removed.id, remaining = updated.visits.len(), "Visit deleted");
        if updated.state.is_finished {
            self.clear_leg_lock(leg_id).await;
        }
        Ok(updated.state)
    }

    /// Re-run every stored visit through the engine. With `dry_run` the
    /// outcome is only reported.
    #[instrument(skip(self))]
    pub async fn recalculate_leg(
        &self,
        leg_id: LegId,
        dry_run: bool,
    ) -> Result<LegReplay, ScoringError> {
        let leg_lock = self.leg_lock(leg_id).await;
        let _guard = leg_lock.lock().await;

        let stored = self.get_leg(leg_id).await?;
        let replay = replay_leg(&stored.initial, &stored.visits)?;

        if dry_run {
            debug!(changed = replay.changed.len(), "Dry run, nothing stored");
            return Ok(replay);
        }

        self.repository
            .replace_history(
                leg_id,
                stored.version,
                replay.visits.clone(),
                replay.leg.clone(),
            )
            .await?;
        info!(changed = replay.changed.len(), "Leg recalculated");
        if replay.leg.is_finished {
            self.clear_leg_lock(leg_id).await;
        }
        Ok(replay)
    }

    async fn leg_lock(&self, leg_id: LegId) -> Arc<AsyncMutex<()>> {
        {
            let guard = self.leg_mutexes.read().await;
            if let Some(lock) = guard.get(&leg_id) {
                return lock.clone();
            }
        }

        let mut guard = self.leg_mutexes.write().await;
        guard
            .entry(leg_id)
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    async fn clear_leg_lock(&self, leg_id: LegId) {
        let mut guard = self.leg_mutexes.write().await;
        guard.remove(&leg_id);
    }
}
