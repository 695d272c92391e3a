use super::{Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit};
use crate::scoring::leg::LegState;

/// Count up to the target exactly. Landing on an opponent's score sends
/// that opponent back to zero.
pub struct Gotcha;

impl VariantRules for Gotcha {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let target = leg.parameters.starting_score;
        let player_id = leg.seat(seat).player_id;
        let mut total = leg.seat(seat).current_score;

        let darts: Vec<(usize, Dart)> = visit.darts().collect();
        for (index, dart) in darts {
            total += dart.score();
            if total > target {
                visit.invalidate_after(index);
                return Verdict::bust();
            }
            if total == target {
                visit.invalidate_after(index);
                leg.seat_mut(seat).current_score = total;
                return Verdict::won_by(player_id);
            }
        }

        leg.seat_mut(seat).current_score = total;
        for (i, opponent) in leg.players_mut().iter_mut().enumerate() {
            if i != seat && total > 0 && opponent.current_score == total {
                opponent.current_score = 0;
            }
        }
        Verdict::open()
    }
}
