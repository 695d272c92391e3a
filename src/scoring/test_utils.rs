use super::darts::{Dart, Visit};
use super::engine::{score_visit, Ruling};
use super::leg::{LegParameters, LegState, MatchType};
use crate::shared::PlayerId;

pub const TEST_LEG_ID: i32 = 1;

pub fn leg(match_type: MatchType, parameters: LegParameters, players: &[PlayerId]) -> LegState {
    LegState::start(TEST_LEG_ID, match_type, parameters, players).unwrap()
}

pub fn visit(leg: &LegState, player_id: PlayerId, darts: &[&str]) -> Visit {
    let darts: Vec<Dart> = darts.iter().map(|s| Dart::from_string(s).unwrap()).collect();
    Visit::from_darts(leg.leg_id, player_id, &darts).unwrap()
}

/// Scores one visit for whoever is up and returns the ruling.
pub fn throw(leg: &LegState, darts: &[&str]) -> Ruling {
    score_visit(&visit(leg, leg.current_player_id, darts), leg).unwrap()
}

/// Plays visits in turn order, returning the leg after the last one.
pub fn play(mut leg: LegState, visits: &[&[&str]]) -> LegState {
    for darts in visits {
        leg = throw(&leg, darts).leg;
    }
    leg
}
