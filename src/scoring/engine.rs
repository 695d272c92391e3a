use serde::Serialize;
use tracing::debug;

use super::darts::{Visit, DARTS_PER_VISIT};
use super::errors::ScoringError;
use super::leg::LegState;
use super::turn;
use super::variants::rules_for;
use crate::shared::PlayerId;

/// Outcome of scoring one visit. Nothing here is persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ruling {
    /// The visit as it should be stored: invalidated darts removed, bust flag set
    pub visit: Visit,
    /// Signed change of the throwing player's running score
    pub score_delta: i32,
    pub is_bust: bool,
    pub is_leg_finished: bool,
    pub winner_id: Option<PlayerId>,
    /// Slots (0-based) that were thrown but no longer count
    pub invalidated: Vec<usize>,
    /// None when the visit finished the leg
    pub next_player_id: Option<PlayerId>,
    /// Leg state after the visit
    pub leg: LegState,
}

/// Scores a visit against the leg it was thrown in.
///
/// Pure: the passed leg state is left untouched and the updated copy is
/// returned inside the ruling. Rejections happen before any rule runs.
pub fn score_visit(visit: &Visit, leg: &LegState) -> Result<Ruling, ScoringError> {
    if visit.leg_id != leg.leg_id {
        return Err(ScoringError::LegMismatch {
            visit_leg: visit.leg_id,
            leg: leg.leg_id,
        });
    }
    // A finished leg has nobody left to throw
    if leg.is_finished {
        return Err(ScoringError::LegAlreadyFinished(leg.leg_id));
    }
    if visit.player_id != leg.current_player_id {
        return Err(ScoringError::NotCurrentPlayer(visit.player_id));
    }
    let seat = leg
        .seat_of(visit.player_id)
        .ok_or(ScoringError::NotCurrentPlayer(visit.player_id))?;
    leg.parameters.check(leg.match_type)?;

    let mut scored = visit.clone();
    let mut next = leg.clone();
    let verdict = rules_for(leg.match_type).apply(&mut scored, &mut next, seat);

    scored.is_bust = verdict.is_bust;
    next.visits_played += 1;

    let invalidated: Vec<usize> = (0..DARTS_PER_VISIT)
        .filter(|&i| visit.throw(i).is_thrown() && !scored.throw(i).is_thrown())
        .collect();
    let score_delta = next.seat(seat).current_score - leg.seat(seat).current_score;

    let next_player_id = if verdict.is_finished {
        next.is_finished = true;
        next.winner_id = verdict.winner_id;
        None
    } else {
        let next_player = turn::next_player(next.players(), visit.player_id).ok_or_else(|| {
            ScoringError::InvalidSetup(format!("Leg {} has a broken turn order", leg.leg_id))
        })?;
        next.current_player_id = next_player;
        Some(next_player)
    };

    debug!(
        leg_id = leg.leg_id,
        player_id = visit.player_id,
        match_type = %leg.match_type,
        visit = %scored,
        score_delta,
        is_bust = verdict.is_bust,
        is_finished = verdict.is_finished,
        "Scored visit"
    );

    Ok(Ruling {
        visit: scored,
        score_delta,
        is_bust: verdict.is_bust,
        is_leg_finished: verdict.is_finished,
        winner_id: verdict.winner_id,
        invalidated,
        next_player_id,
        leg: next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::leg::{LegParameters, MatchType};
    use crate::scoring::test_utils::{leg, visit};

    #[test]
    fn test_rejects_player_out_of_turn_without_mutation() {
        let state = leg(MatchType::X01, LegParameters::default(), &[1, 2]);
        let result = score_visit(&visit(&state, 2, &["T20"]), &state);
        assert_eq!(result.unwrap_err(), ScoringError::NotCurrentPlayer(2));
        assert_eq!(state.visits_played, 0);
    }

    #[test]
    fn test_rejects_unknown_player() {
        let state = leg(MatchType::X01, LegParameters::default(), &[1, 2]);
        let result = score_visit(&visit(&state, 99, &["T20"]), &state);
        assert!(matches!(result, Err(ScoringError::NotCurrentPlayer(99))));
    }

    #[test]
    fn test_rejects_finished_leg() {
        let mut state = leg(MatchType::X01, LegParameters::default(), &[1, 2]);
        state.is_finished = true;
        let result = score_visit(&visit(&state, 1, &["T20"]), &state);
        assert_eq!(result.unwrap_err(), ScoringError::LegAlreadyFinished(state.leg_id));
    }

    #[test]
    fn test_finished_leg_rejects_every_player() {
        let parameters = LegParameters {
            starting_score: 40,
            ..LegParameters::default()
        };
        let state = leg(MatchType::X01, parameters, &[1, 2]);
        let finished = score_visit(&visit(&state, 1, &["D20"]), &state).unwrap().leg;

        for player_id in [1, 2] {
            let result = score_visit(&visit(&finished, player_id, &["S1"]), &finished);
            assert_eq!(result.unwrap_err(), ScoringError::LegAlreadyFinished(state.leg_id));
        }
    }

    #[test]
    fn test_rejects_tic_tac_toe_leg_without_board() {
        let parameters = LegParameters {
            board: Some(crate::scoring::TicTacToeBoard::new([1, 2, 3, 4, 5, 6, 7, 8, 9])),
            ..LegParameters::default()
        };
        let mut state = leg(MatchType::TicTacToe, parameters, &[1, 2]);
        state.parameters.board = None;

        let result = score_visit(&visit(&state, 1, &["S1"]), &state);
        assert!(matches!(result, Err(ScoringError::InvalidSetup(_))));
    }

    #[test]
    fn test_rejects_visit_for_other_leg() {
        let state = leg(MatchType::X01, LegParameters::default(), &[1, 2]);
        let mut v = visit(&state, 1, &["T20"]);
        v.leg_id = state.leg_id + 1;
        assert!(matches!(
            score_visit(&v, &state),
            Err(ScoringError::LegMismatch { .. })
        ));
    }

    #[test]
    fn test_turn_advances_and_input_is_untouched() {
        let state = leg(MatchType::X01, LegParameters::default(), &[1, 2, 3]);
        let before = state.clone();

        let ruling = score_visit(&visit(&state, 1, &["T20", "T20", "T20"]), &state).unwrap();

        assert_eq!(state, before);
        assert_eq!(ruling.next_player_id, Some(2));
        assert_eq!(ruling.leg.current_player_id, 2);
        assert_eq!(ruling.leg.visits_played, 1);
        assert_eq!(ruling.score_delta, -180);
        assert_eq!(ruling.leg.score_of(1), Some(321));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let state = leg(MatchType::Cricket, LegParameters::default(), &[1, 2]);
        let v = visit(&state, 1, &["T20", "T20", "D25"]);
        assert_eq!(score_visit(&v, &state), score_visit(&v, &state));
    }
}
