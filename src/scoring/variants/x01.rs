use super::{Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit};
use crate::scoring::leg::LegState;

/// Count down from the starting score and check out on the out-shot rule.
/// Handicap legs only differ in their starting scores.
pub struct X01;

impl VariantRules for X01 {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let outshot = leg.parameters.outshot;
        let player_id = leg.seat(seat).player_id;
        let mut remaining = leg.seat(seat).current_score;

        let darts: Vec<(usize, Dart)> = visit.darts().collect();
        for (index, dart) in darts {
            if dart.is_bust(remaining, outshot) {
                visit.invalidate_after(index);
                return Verdict::bust();
            }

            remaining -= dart.score();
            if remaining == 0 {
                visit.invalidate_after(index);
                leg.seat_mut(seat).current_score = 0;
                return Verdict::won_by(player_id);
            }
        }

        leg.seat_mut(seat).current_score = remaining;
        Verdict::open()
    }
}
