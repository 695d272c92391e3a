use super::{Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit, BULL};
use crate::scoring::leg::LegState;

pub const CRICKET_NUMBERS: [u8; 7] = [15, 16, 17, 18, 19, 20, BULL];
const MARKS_TO_CLOSE: u32 = 3;

/// Cut-throat cricket: surplus marks on a number you closed score against
/// every opponent who has not closed it yet. Lowest score wins.
pub struct Cricket;

impl VariantRules for Cricket {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let player_id = leg.seat(seat).player_id;

        let darts: Vec<(usize, Dart)> = visit.darts().collect();
        for (index, dart) in darts {
            if CRICKET_NUMBERS.contains(&dart.value()) {
                mark(leg, seat, &dart);
            }
            if has_won(leg, seat) {
                visit.invalidate_after(index);
                return Verdict::won_by(player_id);
            }
        }

        Verdict::open()
    }
}

/// Open while at least one seated player still lacks three marks.
fn is_open(leg: &LegState, value: u8) -> bool {
    leg.players().iter().any(|p| p.marks(value) < MARKS_TO_CLOSE)
}

fn mark(leg: &mut LegState, seat: usize, dart: &Dart) {
    let value = dart.value();
    if !is_open(leg, value) {
        return;
    }

    let marks = dart.multiplier().factor() as u32;
    let before = leg.seat(seat).marks(value);
    leg.seat_mut(seat).add_marks(value, marks);

    let surplus = marks.saturating_sub(MARKS_TO_CLOSE.saturating_sub(before));
    if surplus == 0 {
        return;
    }

    let points = surplus as i32 * value as i32;
    for (i, opponent) in leg.players_mut().iter_mut().enumerate() {
        if i != seat && opponent.marks(value) < MARKS_TO_CLOSE {
            opponent.current_score += points;
        }
    }
}

fn has_won(leg: &LegState, seat: usize) -> bool {
    let me = leg.seat(seat);
    let all_closed = CRICKET_NUMBERS
        .iter()
        .all(|&n| me.marks(n) >= MARKS_TO_CLOSE);

    all_closed
        && leg
            .players()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != seat)
            .all(|(_, other)| me.current_score < other.current_score)
}
