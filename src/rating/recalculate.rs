//! Rating replay over match history.
//!
//! Qualifying matches are applied oldest first (stable on equal completion
//! times), so the same history always yields the same table, and applying
//! an older prefix then the rest gives the same result as applying all of it.

use std::collections::BTreeMap;

use tracing::info;

use super::elo::update_rating_for_match;
use super::{MatchResult, RatingChange, RatingError, RatingScope, RatingSnapshot, RatingTable};
use crate::config::RatingSettings;
use crate::shared::{PlayerId, TournamentId};

fn qualifying_in_order<'a>(matches: &'a [MatchResult], settings: &RatingSettings) -> Vec<&'a MatchResult> {
    let mut ordered: Vec<&MatchResult> = matches.iter().filter(|m| m.qualifies(settings)).collect();
    ordered.sort_by_key(|m| m.completed_at);
    ordered
}

/// Applies one match to `table`, seeding unseen players at the initial
/// rating. Returns the changelog entries for winner and loser.
pub fn apply_match(
    table: &mut RatingTable,
    scope: RatingScope,
    result: &MatchResult,
    settings: &RatingSettings,
) -> Result<[RatingChange; 2], RatingError> {
    let (winner_id, loser_id) = result.participants()?;
    let winner = table.get_or_initial(winner_id, settings);
    let loser = table.get_or_initial(loser_id, settings);

    let (winner_after, loser_after) =
        update_rating_for_match(result.match_id, &winner, &loser, settings)?;
    table.insert(winner_after);
    table.insert(loser_after);

    Ok([
        RatingChange::between(result.match_id, scope, &winner, &winner_after),
        RatingChange::between(result.match_id, scope, &loser, &loser_after),
    ])
}

/// Continues `table` with the qualifying matches in `matches`.
pub fn apply_matches(
    mut table: RatingTable,
    matches: &[MatchResult],
    settings: &RatingSettings,
) -> Result<RatingTable, RatingError> {
    for result in qualifying_in_order(matches, settings) {
        apply_match(&mut table, RatingScope::Global, result, settings)?;
    }
    Ok(table)
}

/// Global ratings from scratch: everyone starts at the initial rating.
pub fn recalculate_ratings(
    matches: &[MatchResult],
    settings: &RatingSettings,
) -> Result<RatingTable, RatingError> {
    apply_matches(RatingTable::new(), matches, settings)
}

/// Ratings local to one tournament. `player_ids` are listed in the result
/// even if they never played a rated match.
pub fn calculate_tournament_ratings(
    tournament_id: TournamentId,
    player_ids: &[PlayerId],
    matches: &[MatchResult],
    settings: &RatingSettings,
) -> Result<RatingTable, RatingError> {
    let scope = RatingScope::Tournament(tournament_id);
    let mut table = RatingTable::seeded(player_ids, settings);

    for result in qualifying_in_order(matches, settings)
        .into_iter()
        .filter(|m| m.tournament_id == Some(tournament_id))
    {
        apply_match(&mut table, scope, result, settings)?;
    }
    Ok(table)
}

/// Every scope rebuilt from history with its changelog, ready to replace
/// what is stored.
pub fn rebuild_snapshot(
    matches: &[MatchResult],
    settings: &RatingSettings,
) -> Result<RatingSnapshot, RatingError> {
    let mut global = RatingTable::new();
    let mut tournaments: BTreeMap<TournamentId, RatingTable> = BTreeMap::new();
    let mut changelog = Vec::new();

    let ordered = qualifying_in_order(matches, settings);
    for result in &ordered {
        changelog.extend(apply_match(&mut global, RatingScope::Global, result, settings)?);

        if let Some(tournament_id) = result.tournament_id {
            let table = tournaments.entry(tournament_id).or_default();
            let scope = RatingScope::Tournament(tournament_id);
            changelog.extend(apply_match(table, scope, result, settings)?);
        }
    }

    info!(
        matches = ordered.len(),
        players = global.len(),
        tournaments = tournaments.len(),
        "Rebuilt ratings from history"
    );

    Ok(RatingSnapshot {
        global,
        tournaments,
        changelog,
    })
}
