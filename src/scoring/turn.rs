use std::collections::HashMap;

use super::leg::PlayerLegState;
use crate::shared::PlayerId;

/// Order position that throws after `current_order` (both 1-based).
pub fn next_order(current_order: usize, player_count: usize) -> usize {
    (current_order % player_count) + 1
}

/// Player who throws after `current`, looked up from the order table only.
pub fn next_player(players: &[PlayerLegState], current: PlayerId) -> Option<PlayerId> {
    let current_order = players.iter().find(|p| p.player_id == current)?.order;
    let by_order: HashMap<usize, PlayerId> =
        players.iter().map(|p| (p.order, p.player_id)).collect();

    by_order
        .get(&next_order(current_order, players.len()))
        .copied()
}
