use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::darts::Visit;
use super::errors::ScoringError;
use super::leg::LegState;
use crate::shared::{LegId, VisitId};

/// A leg as persisted: where it started, where it is now, and how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLeg {
    pub initial: LegState,
    pub state: LegState,
    /// Bumped on every write
    pub version: u64,
    pub visits: Vec<Visit>,
}

impl StoredLeg {
    pub fn visit(&self, visit_id: VisitId) -> Option<&Visit> {
        self.visits.iter().find(|v| v.id == Some(visit_id))
    }
}

#[async_trait]
pub trait LegRepository: Send + Sync {
    async fn create_leg(&self, initial: LegState) -> Result<StoredLeg, ScoringError>;
    async fn get_leg(&self, leg_id: LegId) -> Result<Option<StoredLeg>, ScoringError>;
    /// Appends a scored visit and stores the resulting state. Assigns the
    /// visit id. Fails if the leg changed since `expected_version` was read.
    async fn commit_visit(
        &self,
        leg_id: LegId,
        expected_version: u64,
        visit: Visit,
        state: LegState,
    ) -> Result<StoredLeg, ScoringError>;
    /// Overwrites a stored visit in place, leaving the leg state alone.
    async fn modify_visit(&self, leg_id: LegId, visit: Visit) -> Result<StoredLeg, ScoringError>;
    /// Swaps the whole history and state in one write.
    async fn replace_history(
        &self,
        leg_id: LegId,
        expected_version: u64,
        visits: Vec<Visit>,
        state: LegState,
    ) -> Result<StoredLeg, ScoringError>;
}

#[derive(Debug, Default)]
struct LegStore {
    legs: HashMap<LegId, StoredLeg>,
    last_visit_id: VisitId,
}

impl LegStore {
    fn leg_mut(&mut self, leg_id: LegId) -> Result<&mut StoredLeg, ScoringError> {
        self.legs
            .get_mut(&leg_id)
            .ok_or(ScoringError::LegNotFound(leg_id))
    }

    fn next_visit_id(&mut self) -> VisitId {
        self.last_visit_id += 1;
        self.last_visit_id
    }
}

fn check_version(stored: &StoredLeg, expected_version: u64) -> Result<(), ScoringError> {
    if stored.version != expected_version {
        warn!(
            leg_id = stored.state.leg_id,
            expected_version,
            actual_version = stored.version,
            "Rejected stale leg write"
        );
        return Err(ScoringError::ConcurrentModification(stored.state.leg_id));
    }
    Ok(())
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryLegRepository {
    store: Arc<RwLock<LegStore>>,
}

impl InMemoryLegRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LegRepository for InMemoryLegRepository {
    #[instrument(skip(self, initial), fields(leg_id = initial.leg_id))]
    async fn create_leg(&self, initial: LegState) -> Result<StoredLeg, ScoringError> {
        let mut store = self.store.write().await;
        if store.legs.contains_key(&initial.leg_id) {
            return Err(ScoringError::InvalidSetup(format!(
                "Leg {} already exists",
                initial.leg_id
            )));
        }

        let stored = StoredLeg {
            initial: initial.clone(),
            state: initial.clone(),
            version: 0,
            visits: Vec::new(),
        };
        store.legs.insert(initial.leg_id, stored.clone());
        debug!("Leg stored");
        Ok(stored)
    }

    async fn get_leg(&self, leg_id: LegId) -> Result<Option<StoredLeg>, ScoringError> {
        let store = self.store.read().await;
        Ok(store.legs.get(&leg_id).cloned())
    }

    #[instrument(skip(self, visit, state))]
    async fn commit_visit(
        &self,
        leg_id: LegId,
        expected_version: u64,
        mut visit: Visit,
        state: LegState,
    ) -> Result<StoredLeg, ScoringError> {
        let mut store = self.store.write().await;
        check_version(store.leg_mut(leg_id)?, expected_version)?;

        visit.id = Some(store.next_visit_id());
        let stored = store.leg_mut(leg_id)?;
        stored.visits.push(visit);
        stored.state = state;
        stored.version += 1;

        debug!(version = stored.version, "Visit committed");
        Ok(stored.clone())
    }

    #[instrument(skip(self, visit), fields(visit_id = ?visit.id))]
    async fn modify_visit(&self, leg_id: LegId, visit: Visit) -> Result<StoredLeg, ScoringError> {
        let mut store = self.store.write().await;
        let stored = store.leg_mut(leg_id)?;

        let visit_id = visit.id.ok_or_else(|| {
            ScoringError::InvalidSetup("Only stored visits can be modified".to_string())
        })?;
        let slot = stored
            .visits
            .iter_mut()
            .find(|v| v.id == Some(visit_id))
            .ok_or(ScoringError::VisitNotFound(visit_id))?;
        *slot = visit;
        stored.version += 1;

        debug!(version = stored.version, "Visit modified");
        Ok(stored.clone())
    }

    #[instrument(skip(self, visits, state), fields(visits = visits.len()))]
    async fn replace_history(
        &self,
        leg_id: LegId,
        expected_version: u64,
        visits: Vec<Visit>,
        state: LegState,
    ) -> Result<StoredLeg, ScoringError> {
        let mut store = self.store.write().await;
        let stored = store.leg_mut(leg_id)?;
        check_version(stored, expected_version)?;

        stored.visits = visits;
        stored.state = state;
        stored.version += 1;

        debug!(version = stored.version, "Leg history replaced");
        Ok(stored.clone())
    }
}
