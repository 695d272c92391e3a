use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::{MatchResult, RatingChange, RatingError, RatingScope, RatingSnapshot, RatingTable};
use crate::shared::{MatchId, TournamentId};

#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn ratings(&self, scope: RatingScope) -> Result<RatingTable, RatingError>;
    /// Writes the new ratings carried by `changes` and appends them to the
    /// changelog, all or nothing.
    async fn apply_changes(&self, changes: Vec<RatingChange>) -> Result<(), RatingError>;
    /// Swaps every stored table and the changelog for `snapshot`.
    async fn replace_all(&self, snapshot: RatingSnapshot) -> Result<(), RatingError>;
    async fn changelog(&self) -> Result<Vec<RatingChange>, RatingError>;
    async fn record_match(&self, result: MatchResult) -> Result<(), RatingError>;
    async fn match_history(&self) -> Result<Vec<MatchResult>, RatingError>;
}

#[derive(Debug, Default)]
struct RatingStore {
    global: RatingTable,
    tournaments: BTreeMap<TournamentId, RatingTable>,
    changelog: Vec<RatingChange>,
    matches: Vec<MatchResult>,
    recorded: HashSet<MatchId>,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRatingRepository {
    store: Arc<RwLock<RatingStore>>,
}

impl InMemoryRatingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepository for InMemoryRatingRepository {
    async fn ratings(&self, scope: RatingScope) -> Result<RatingTable, RatingError> {
        let store = self.store.read().await;
        Ok(match scope {
            RatingScope::Global => store.global.clone(),
            RatingScope::Tournament(id) => store.tournaments.get(&id).cloned().unwrap_or_default(),
        })
    }

    #[instrument(skip(self, changes), fields(changes = changes.len()))]
    async fn apply_changes(&self, changes: Vec<RatingChange>) -> Result<(), RatingError> {
        let mut store = self.store.write().await;
        for change in &changes {
            let table = match change.scope {
                RatingScope::Global => &mut store.global,
                RatingScope::Tournament(id) => store.tournaments.entry(id).or_default(),
            };
            table.insert(change.rating());
        }
        store.changelog.extend(changes);
        debug!("Rating changes applied");
        Ok(())
    }

    #[instrument(skip(self, snapshot), fields(players = snapshot.global.len()))]
    async fn replace_all(&self, snapshot: RatingSnapshot) -> Result<(), RatingError> {
        let mut store = self.store.write().await;
        store.global = snapshot.global;
        store.tournaments = snapshot.tournaments;
        store.changelog = snapshot.changelog;
        debug!("Rating tables replaced");
        Ok(())
    }

    async fn changelog(&self) -> Result<Vec<RatingChange>, RatingError> {
        let store = self.store.read().await;
        Ok(store.changelog.clone())
    }

    #[instrument(skip(self, result), fields(match_id = result.match_id))]
    async fn record_match(&self, result: MatchResult) -> Result<(), RatingError> {
        let mut store = self.store.write().await;
        if !store.recorded.insert(result.match_id) {
            return Err(RatingError::Validation(format!(
                "Match {} already recorded",
                result.match_id
            )));
        }
        store.matches.push(result);
        Ok(())
    }

    async fn match_history(&self) -> Result<Vec<MatchResult>, RatingError> {
        let store = self.store.read().await;
        Ok(store.matches.clone())
    }
}
