use super::{Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit};
use crate::scoring::leg::LegState;

/// Only bulls count; the first player to bring the starting score down to
/// zero or below wins.
pub struct KillBull;

impl VariantRules for KillBull {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let player_id = leg.seat(seat).player_id;
        let mut remaining = leg.seat(seat).current_score;

        let darts: Vec<(usize, Dart)> = visit.darts().collect();
        for (index, dart) in darts {
            if !dart.is_bull() {
                continue;
            }
            remaining -= dart.score();
            if remaining <= 0 {
                visit.invalidate_after(index);
                leg.seat_mut(seat).current_score = 0;
                return Verdict::won_by(player_id);
            }
        }

        leg.seat_mut(seat).current_score = remaining;
        Verdict::open()
    }
}
