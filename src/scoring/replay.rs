use serde::Serialize;
use tracing::debug;

use super::darts::Visit;
use super::engine::score_visit;
use super::errors::ScoringError;
use super::leg::LegState;

/// Result of running a leg's history through the engine again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegReplay {
    pub leg: LegState,
    /// Visits as the engine rules them now, ids preserved
    pub visits: Vec<Visit>,
    /// Positions of visits whose stored form differs from the replayed one
    pub changed: Vec<usize>,
}

/// Scores `visits` in order starting from `initial`.
///
/// Stored bust flags and invalidations are ignored; every visit is judged
/// from its darts alone. A visit that no longer fits the leg (thrown after
/// the leg now ends, or out of turn) fails the whole replay.
pub fn replay_leg(initial: &LegState, visits: &[Visit]) -> Result<LegReplay, ScoringError> {
    match replay_accepted(initial, visits) {
        (replay, None) => Ok(replay),
        (_, Some((_, error))) => Err(error),
    }
}

/// Scores `visits` in order until the engine rejects one. Returns the
/// replay of the accepted prefix together with the position of the first
/// rejected visit and why it was rejected.
pub fn replay_accepted(
    initial: &LegState,
    visits: &[Visit],
) -> (LegReplay, Option<(usize, ScoringError)>) {
    let mut leg = initial.clone();
    let mut replayed = Vec::with_capacity(visits.len());
    let mut changed = Vec::new();
    let mut rejected = None;

    for (position, stored) in visits.iter().enumerate() {
        let ruling = match score_visit(stored, &leg) {
            Ok(ruling) => ruling,
            Err(error) => {
                rejected = Some((position, error));
                break;
            }
        };
        if ruling.visit != *stored {
            changed.push(position);
        }
        replayed.push(ruling.visit);
        leg = ruling.leg;
    }

    debug!(
        leg_id = initial.leg_id,
        visits = visits.len(),
        accepted = replayed.len(),
        changed = changed.len(),
        "Replayed leg"
    );

    let replay = LegReplay {
        leg,
        visits: replayed,
        changed,
    };
    (replay, rejected)
}
