//! Pairwise Elo updates.

use tracing::debug;

use super::{PlayerRating, RatingError};
use crate::config::RatingSettings;
use crate::shared::MatchId;

/// Probability that a player rated `rating` beats one rated `opponent`.
pub fn expected_score(rating: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10_f64.powf((opponent - rating) as f64 / 400.0))
}

pub fn k_factor(matches_played: u32, settings: &RatingSettings) -> f64 {
    if matches_played < settings.experience_threshold {
        settings.k_provisional
    } else {
        settings.k_established
    }
}

fn new_rating(player: &PlayerRating, opponent_rating: i32, actual: f64, settings: &RatingSettings) -> i32 {
    let expected = expected_score(player.rating, opponent_rating);
    let k = k_factor(player.matches_played, settings);
    (player.rating as f64 + k * (actual - expected)).round() as i32
}

/// New ratings for both players after `winner` beat `loser`.
pub fn update_rating_for_match(
    match_id: MatchId,
    winner: &PlayerRating,
    loser: &PlayerRating,
    settings: &RatingSettings,
) -> Result<(PlayerRating, PlayerRating), RatingError> {
    if winner.player_id == loser.player_id {
        return Err(RatingError::MalformedMatch {
            match_id,
            reason: "winner and loser are the same player".to_string(),
        });
    }

    let winner_after = PlayerRating {
        player_id: winner.player_id,
        rating: new_rating(winner, loser.rating, 1.0, settings),
        matches_played: winner.matches_played + 1,
    };
    let loser_after = PlayerRating {
        player_id: loser.player_id,
        rating: new_rating(loser, winner.rating, 0.0, settings),
        matches_played: loser.matches_played + 1,
    };

    debug!(
        match_id,
        winner_id = winner.player_id,
        winner_rating = winner_after.rating,
        loser_id = loser.player_id,
        loser_rating = loser_after.rating,
        "Updated ratings for match"
    );
    Ok((winner_after, loser_after))
}
