use super::{Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit, BULL};
use crate::scoring::leg::LegState;

/// Progress value at which the bull becomes the target.
const BULL_STEP: i32 = 21;

/// Hit 1 to 20 in sequence, then the bull. The running score is the
/// progress so far.
pub struct AroundTheClock;

fn target_for(progress: i32) -> u8 {
    let next = progress + 1;
    if next >= BULL_STEP {
        BULL
    } else {
        next as u8
    }
}

impl VariantRules for AroundTheClock {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let player_id = leg.seat(seat).player_id;
        let mut progress = leg.seat(seat).current_score;

        let darts: Vec<(usize, Dart)> = visit.darts().collect();
        for (index, dart) in darts {
            if dart.is_miss() || dart.value() != target_for(progress) {
                continue;
            }
            progress += 1;
            if progress == BULL_STEP {
                visit.invalidate_after(index);
                leg.seat_mut(seat).current_score = progress;
                return Verdict::won_by(player_id);
            }
        }

        leg.seat_mut(seat).current_score = progress;
        Verdict::open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::leg::{LegParameters, MatchType};
    use crate::scoring::test_utils::{leg, throw};

    fn at_progress(progress: i32) -> LegState {
        let mut state = leg(MatchType::AroundTheClock, LegParameters::default(), &[1, 2]);
        state.seat_mut(0).current_score = progress;
        state
    }

    #[test]
    fn test_hits_in_sequence_advance() {
        let ruling = throw(&at_progress(0), &["S1", "T2", "D3"]);
        assert_eq!(ruling.leg.score_of(1), Some(3));
        assert_eq!(ruling.score_delta, 3);
    }

    #[test]
    fn test_out_of_sequence_hits_do_nothing() {
        let ruling = throw(&at_progress(0), &["S2", "S1", "S3"]);
        assert_eq!(ruling.leg.score_of(1), Some(1));
    }

    #[test]
    fn test_twenty_leads_to_bull() {
        let ruling = throw(&at_progress(19), &["S20", "S19", "M"]);
        assert_eq!(ruling.leg.score_of(1), Some(20));
        assert!(!ruling.is_leg_finished);
    }

    #[test]
    fn test_bull_finishes_and_invalidates_rest() {
        let ruling = throw(&at_progress(20), &["S25", "S1", "S2"]);
        assert!(ruling.is_leg_finished);
        assert_eq!(ruling.winner_id, Some(1));
        assert_eq!(ruling.invalidated, vec![1, 2]);
        assert_eq!(ruling.leg.score_of(1), Some(21));
    }
}
