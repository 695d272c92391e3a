//! One rule set per match type, all behind the same contract.
//!
//! A rule set receives a private copy of the visit and of the leg state. It
//! invalidates darts on the visit, updates running scores and marks on the
//! leg, and reports whether the visit busted or finished the leg. Turn order,
//! visit counting and the pre-checks live in the engine, not here.

mod around_the_clock;
mod cricket;
mod gotcha;
mod kill_bull;
mod rounds;
mod tic_tac_toe;
mod x01;

pub use around_the_clock::AroundTheClock;
pub use cricket::{Cricket, CRICKET_NUMBERS};
pub use gotcha::Gotcha;
pub use kill_bull::KillBull;
pub use rounds::{
    AroundTheWorld, BermudaTriangle, DartsAtX, FourTwenty, JdcPractice, Shanghai, Shootout,
};
pub use tic_tac_toe::TicTacToe;
pub use x01::X01;

use super::darts::{Visit, DARTS_PER_VISIT};
use super::leg::{LegState, MatchType};
use crate::shared::PlayerId;

/// What a rule set decided about one visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Verdict {
    pub is_bust: bool,
    pub is_finished: bool,
    pub winner_id: Option<PlayerId>,
}

impl Verdict {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn bust() -> Self {
        Self {
            is_bust: true,
            ..Self::default()
        }
    }

    pub fn won_by(player_id: PlayerId) -> Self {
        Self {
            is_finished: true,
            winner_id: Some(player_id),
            ..Self::default()
        }
    }

    /// Finished without a winner, or with one decided by the caller.
    pub fn finished(winner_id: Option<PlayerId>) -> Self {
        Self {
            is_finished: true,
            winner_id,
            ..Self::default()
        }
    }
}

pub trait VariantRules: Send + Sync {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict;
}

pub fn rules_for(match_type: MatchType) -> &'static dyn VariantRules {
    match match_type {
        MatchType::X01 | MatchType::X01Handicap => &X01,
        MatchType::Shootout => &Shootout,
        MatchType::Cricket => &Cricket,
        MatchType::DartsAtX => &DartsAtX,
        MatchType::AroundTheWorld => &AroundTheWorld,
        MatchType::Shanghai => &Shanghai,
        MatchType::AroundTheClock => &AroundTheClock,
        MatchType::TicTacToe => &TicTacToe,
        MatchType::BermudaTriangle => &BermudaTriangle,
        MatchType::FourTwenty => &FourTwenty,
        MatchType::KillBull => &KillBull,
        MatchType::Gotcha => &Gotcha,
        MatchType::JdcPractice => &JdcPractice,
    }
}

/// Fixed-length legs end once every player has thrown `visits_per_player`
/// visits; the visit being scored is not yet counted in `visits_played`.
pub(crate) fn is_last_fixed_visit(leg: &LegState, visits_per_player: usize) -> bool {
    let required = visits_per_player * DARTS_PER_VISIT * leg.player_count();
    ((leg.visits_played + 1) * DARTS_PER_VISIT) % required == 0
}

/// The unique highest running score, if there is one.
pub(crate) fn highest_scorer(leg: &LegState) -> Option<PlayerId> {
    let best = leg.players().iter().map(|p| p.current_score).max()?;
    let mut leaders = leg.players().iter().filter(|p| p.current_score == best);
    match (leaders.next(), leaders.next()) {
        (Some(leader), None) => Some(leader.player_id),
        _ => None,
    }
}
