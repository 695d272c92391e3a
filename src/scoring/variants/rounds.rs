//! Variants played over a fixed number of visits per player, where every
//! round has its own target and the highest total wins.

use super::{highest_scorer, is_last_fixed_visit, Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit, BULL};
use crate::scoring::leg::LegState;

const SHOOTOUT_VISITS: usize = 3;
const DARTS_AT_X_VISITS: usize = 33;
const AROUND_THE_WORLD_VISITS: usize = 21;
const SHANGHAI_VISITS: usize = 20;
const BERMUDA_VISITS: usize = 13;
const FOUR_TWENTY_VISITS: usize = 20;
const JDC_VISITS: usize = 19;

const DEFAULT_DARTS_AT_X_TARGET: u8 = 20;
const JDC_SHANGHAI_BONUS: i32 = 100;
const JDC_DOUBLE_POINTS: i32 = 50;

/// Doubles in clockwise board order starting at the top.
const FOUR_TWENTY_ORDER: [u8; 20] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Adds `points` to the visitor and closes the leg after the last fixed
/// visit, naming the unique leader as winner.
fn settle(leg: &mut LegState, seat: usize, points: i32, visits_per_player: usize) -> Verdict {
    leg.seat_mut(seat).current_score += points;
    if is_last_fixed_visit(leg, visits_per_player) {
        Verdict::finished(highest_scorer(leg))
    } else {
        Verdict::open()
    }
}

fn points_on(visit: &Visit, target: u8) -> i32 {
    visit
        .darts()
        .filter(|(_, d)| !d.is_miss() && d.value() == target)
        .map(|(_, d)| d.score())
        .sum()
}

fn is_shanghai_on(visit: &Visit, target: u8) -> bool {
    visit.is_shanghai() && visit.darts().next().map(|(_, d)| d.value()) == Some(target)
}

/// Nine darts, everything counts.
pub struct Shootout;

impl VariantRules for Shootout {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        settle(leg, seat, visit.score(), SHOOTOUT_VISITS)
    }
}

/// 99 darts at one number, one point per mark.
pub struct DartsAtX;

impl VariantRules for DartsAtX {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let target = leg.parameters.target.unwrap_or(DEFAULT_DARTS_AT_X_TARGET);
        let marks = visit.hit_count(target);
        leg.seat_mut(seat).add_marks(target, marks);
        settle(leg, seat, marks as i32, DARTS_AT_X_VISITS)
    }
}

/// 1 through 20 then the bull, one round each.
pub struct AroundTheWorld;

impl VariantRules for AroundTheWorld {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let round = leg.round();
        let target = if round <= 20 { round as u8 } else { BULL };
        settle(leg, seat, points_on(visit, target), AROUND_THE_WORLD_VISITS)
    }
}

/// Round number is the target; a Shanghai on it ends the leg at once.
pub struct Shanghai;

impl VariantRules for Shanghai {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let round = leg.round();
        let target = round as u8;
        let points = points_on(visit, target);

        if round <= SHANGHAI_VISITS && is_shanghai_on(visit, target) {
            let player_id = leg.seat(seat).player_id;
            leg.seat_mut(seat).current_score += points;
            return Verdict::won_by(player_id);
        }
        settle(leg, seat, points, SHANGHAI_VISITS)
    }
}

#[derive(Debug, Clone, Copy)]
enum BermudaTarget {
    Number(u8),
    AnyDouble,
    AnyTriple,
    AnyBull,
    DoubleBull,
}

static BERMUDA_TARGETS: [BermudaTarget; BERMUDA_VISITS] = [
    BermudaTarget::Number(12),
    BermudaTarget::Number(13),
    BermudaTarget::Number(14),
    BermudaTarget::AnyDouble,
    BermudaTarget::Number(15),
    BermudaTarget::Number(16),
    BermudaTarget::Number(17),
    BermudaTarget::AnyTriple,
    BermudaTarget::Number(18),
    BermudaTarget::Number(19),
    BermudaTarget::Number(20),
    BermudaTarget::AnyBull,
    BermudaTarget::DoubleBull,
];

impl BermudaTarget {
    fn is_hit(&self, dart: &Dart) -> bool {
        match self {
            BermudaTarget::Number(n) => !dart.is_miss() && dart.value() == *n,
            BermudaTarget::AnyDouble => dart.is_double(),
            BermudaTarget::AnyTriple => dart.is_triple(),
            BermudaTarget::AnyBull => dart.is_bull(),
            BermudaTarget::DoubleBull => dart.is_bull() && dart.is_double(),
        }
    }
}

/// Thirteen targets; a visit without a hit halves the running score.
pub struct BermudaTriangle;

impl VariantRules for BermudaTriangle {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let Some(target) = BERMUDA_TARGETS.get(leg.round() - 1) else {
            return settle(leg, seat, 0, BERMUDA_VISITS);
        };

        let hits: Vec<Dart> = visit
            .darts()
            .map(|(_, d)| d)
            .filter(|d| target.is_hit(d))
            .collect();

        let points = if hits.is_empty() {
            let current = leg.seat(seat).current_score;
            -(current - current / 2)
        } else {
            hits.iter().map(Dart::score).sum()
        };
        settle(leg, seat, points, BERMUDA_VISITS)
    }
}

/// Doubles only, around the board in order.
pub struct FourTwenty;

impl VariantRules for FourTwenty {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let points = match FOUR_TWENTY_ORDER.get(leg.round() - 1) {
            Some(&target) => visit
                .darts()
                .filter(|(_, d)| d.is_double() && d.value() == target)
                .map(|(_, d)| d.score())
                .sum(),
            None => 0,
        };
        settle(leg, seat, points, FOUR_TWENTY_VISITS)
    }
}

/// Shanghai on 10-15, then every double plus the bull three at a time, then
/// Shanghai on 15-20.
pub struct JdcPractice;

impl JdcPractice {
    fn shanghai_round(visit: &Visit, target: u8) -> i32 {
        let bonus = if is_shanghai_on(visit, target) {
            JDC_SHANGHAI_BONUS
        } else {
            0
        };
        points_on(visit, target) + bonus
    }

    /// Each dart of the visit has its own double; number 21 stands for the bull.
    fn doubles_round(visit: &Visit, round: usize) -> i32 {
        let first = (round - 7) * 3 + 1;
        visit
            .darts()
            .filter(|(index, dart)| {
                let number = first + index;
                let target = if number > 20 { BULL } else { number as u8 };
                dart.is_double() && dart.value() == target
            })
            .count() as i32
            * JDC_DOUBLE_POINTS
    }
}

impl VariantRules for JdcPractice {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let round = leg.round();
        let points = match round {
            1..=6 => Self::shanghai_round(visit, 9 + round as u8),
            7..=13 => Self::doubles_round(visit, round),
            14..=19 => Self::shanghai_round(visit, round as u8 + 1),
            _ => 0,
        };
        settle(leg, seat, points, JDC_VISITS)
    }
}
