use super::{Verdict, VariantRules};
use crate::scoring::darts::{Dart, Visit};
use crate::scoring::leg::LegState;

/// Each visit tries to check out on one of the nine board numbers; the
/// first player to own a full line wins, a full board without a line is a
/// draw.
pub struct TicTacToe;

impl VariantRules for TicTacToe {
    fn apply(&self, visit: &mut Visit, leg: &mut LegState, seat: usize) -> Verdict {
        let outshot = leg.parameters.outshot;
        let player_id = leg.seat(seat).player_id;
        let Some(board) = leg.parameters.board.as_mut() else {
            return Verdict::open();
        };

        let mut claimed = None;
        let mut total = 0;
        let darts: Vec<(usize, Dart)> = visit.darts().collect();
        for (index, dart) in darts {
            total += dart.score();
            if !outshot.allows(&dart) {
                continue;
            }
            if let Some(cell) = board.open_cell(total) {
                board.claim(cell, player_id);
                visit.invalidate_after(index);
                claimed = Some(total);
                break;
            }
        }

        let won = board.is_winner(player_id);
        let full = board.is_full();

        if let Some(points) = claimed {
            leg.seat_mut(seat).current_score += points;
        }

        if won {
            Verdict::won_by(player_id)
        } else if full {
            Verdict::finished(None)
        } else {
            Verdict::open()
        }
    }
}
