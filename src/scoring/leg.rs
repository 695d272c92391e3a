use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use super::darts::Dart;
use super::errors::ScoringError;
use crate::shared::{LegId, PlayerId};

/// Which darts may finish a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum OutshotType {
    Any = 1,
    #[default]
    Double = 2,
    /// Double or triple
    Master = 3,
}

impl OutshotType {
    pub fn allows(&self, dart: &Dart) -> bool {
        match self {
            OutshotType::Any => !dart.is_miss(),
            OutshotType::Double => dart.is_double(),
            OutshotType::Master => dart.is_double() || dart.is_triple(),
        }
    }
}

impl TryFrom<u8> for OutshotType {
    type Error = ScoringError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(OutshotType::Any),
            2 => Ok(OutshotType::Double),
            3 => Ok(OutshotType::Master),
            other => Err(ScoringError::InvalidSetup(format!(
                "Unknown outshot type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum MatchType {
    X01 = 1,
    Shootout = 2,
    X01Handicap = 3,
    Cricket = 4,
    DartsAtX = 5,
    AroundTheWorld = 6,
    Shanghai = 7,
    AroundTheClock = 8,
    TicTacToe = 9,
    BermudaTriangle = 10,
    FourTwenty = 11,
    KillBull = 12,
    Gotcha = 13,
    JdcPractice = 14,
}

impl MatchType {
    pub fn id(&self) -> u8 {
        *self as u8
    }

    /// Running score every player starts a leg with.
    pub fn starting_score(&self, parameters: &LegParameters) -> i32 {
        match self {
            MatchType::X01 | MatchType::X01Handicap | MatchType::KillBull => {
                parameters.starting_score
            }
            _ => 0,
        }
    }
}

impl TryFrom<u8> for MatchType {
    type Error = ScoringError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        use strum::IntoEnumIterator;

        MatchType::iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| ScoringError::InvalidSetup(format!("Unknown match type: {}", id)))
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MatchType::X01 => "501",
                MatchType::Shootout => "9 Dart Shootout",
                MatchType::X01Handicap => "X01 Handicap",
                MatchType::Cricket => "Cricket",
                MatchType::DartsAtX => "99 Darts at X",
                MatchType::AroundTheWorld => "Around the World",
                MatchType::Shanghai => "Shanghai",
                MatchType::AroundTheClock => "Around the Clock",
                MatchType::TicTacToe => "Tic-Tac-Toe",
                MatchType::BermudaTriangle => "Bermuda Triangle",
                MatchType::FourTwenty => "420",
                MatchType::KillBull => "Kill Bull",
                MatchType::Gotcha => "Gotcha",
                MatchType::JdcPractice => "JDC Practice",
            }
        )
    }
}

/// Nine numbers laid out row by row, with the owner of each claimed cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeBoard {
    pub numbers: [i32; 9],
    pub owners: [Option<PlayerId>; 9],
}

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

impl TicTacToeBoard {
    pub fn new(numbers: [i32; 9]) -> Self {
        Self {
            numbers,
            owners: [None; 9],
        }
    }

    /// First unclaimed cell holding `number`.
    pub fn open_cell(&self, number: i32) -> Option<usize> {
        (0..9).find(|&i| self.numbers[i] == number && self.owners[i].is_none())
    }

    pub fn claim(&mut self, cell: usize, player_id: PlayerId) {
        self.owners[cell] = Some(player_id);
    }

    /// 3x3 ownership grid for one player.
    pub fn ownership(&self, player_id: PlayerId) -> [[bool; 3]; 3] {
        let mut grid = [[false; 3]; 3];
        for (i, owner) in self.owners.iter().enumerate() {
            grid[i / 3][i % 3] = *owner == Some(player_id);
        }
        grid
    }

    pub fn is_winner(&self, player_id: PlayerId) -> bool {
        let grid = self.ownership(player_id);
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| grid[i / 3][i % 3]))
    }

    pub fn is_full(&self) -> bool {
        self.owners.iter().all(Option::is_some)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegParameters {
    pub outshot: OutshotType,
    /// X01 starting score, Kill Bull starting score or Gotcha target
    pub starting_score: i32,
    /// Number thrown at in Darts at X
    pub target: Option<u8>,
    pub board: Option<TicTacToeBoard>,
}

impl LegParameters {
    /// Rejects parameters the variant cannot be played with.
    pub fn check(&self, match_type: MatchType) -> Result<(), ScoringError> {
        match match_type {
            MatchType::TicTacToe if self.board.is_none() => Err(ScoringError::InvalidSetup(
                "Tic-Tac-Toe needs a board".to_string(),
            )),
            MatchType::Gotcha if self.starting_score <= 0 => Err(ScoringError::InvalidSetup(
                format!("Gotcha target must be positive, got {}", self.starting_score),
            )),
            _ => Ok(()),
        }
    }
}

/// Lowest starting score a countdown variant can still be finished from.
fn lowest_starting_score(match_type: MatchType) -> Option<i32> {
    match match_type {
        // Leaving 1 is a bust, so X01 needs at least 2
        MatchType::X01 | MatchType::X01Handicap => Some(2),
        MatchType::KillBull => Some(1),
        _ => None,
    }
}

impl Default for LegParameters {
    fn default() -> Self {
        Self {
            outshot: OutshotType::Double,
            starting_score: 501,
            target: None,
            board: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerLegState {
    pub player_id: PlayerId,
    /// 1-based throwing order, unique within the leg
    pub order: usize,
    pub current_score: i32,
    /// Marks per board number
    pub hits: BTreeMap<u8, u32>,
}

impl PlayerLegState {
    pub fn marks(&self, value: u8) -> u32 {
        self.hits.get(&value).copied().unwrap_or_default()
    }

    pub fn add_marks(&mut self, value: u8, marks: u32) {
        *self.hits.entry(value).or_insert(0) += marks;
    }
}

/// Everything the rule engine needs to know about a leg in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegState {
    pub leg_id: LegId,
    pub match_type: MatchType,
    pub parameters: LegParameters,
    players: Vec<PlayerLegState>, // Sorted by throwing order
    pub current_player_id: PlayerId,
    pub visits_played: usize,
    pub is_finished: bool,
    pub winner_id: Option<PlayerId>,
}

impl LegState {
    /// Starts a leg with every player on the variant's starting score,
    /// throwing in the given order.
    pub fn start(
        leg_id: LegId,
        match_type: MatchType,
        parameters: LegParameters,
        player_ids: &[PlayerId],
    ) -> Result<Self, ScoringError> {
        let score = match_type.starting_score(&parameters);
        let seats: Vec<(PlayerId, i32)> = player_ids.iter().map(|&id| (id, score)).collect();
        Self::start_with_scores(leg_id, match_type, parameters, &seats)
    }

    /// Starts a leg with explicit per-player starting scores (handicap legs).
    pub fn start_with_scores(
        leg_id: LegId,
        match_type: MatchType,
        parameters: LegParameters,
        seats: &[(PlayerId, i32)],
    ) -> Result<Self, ScoringError> {
        if seats.is_empty() {
            return Err(ScoringError::InvalidSetup(
                "A leg needs at least one player".to_string(),
            ));
        }

        let mut unique = HashSet::new();
        if !seats.iter().all(|(id, _)| unique.insert(*id)) {
            return Err(ScoringError::InvalidSetup(
                "All player ids must be unique".to_string(),
            ));
        }

        parameters.check(match_type)?;
        if let Some(lowest) = lowest_starting_score(match_type) {
            if let Some((player_id, score)) = seats.iter().find(|(_, score)| *score < lowest) {
                return Err(ScoringError::InvalidSetup(format!(
                    "Player {} cannot start {} on {}",
                    player_id, match_type, score
                )));
            }
        }

        let players = seats
            .iter()
            .enumerate()
            .map(|(i, &(player_id, current_score))| PlayerLegState {
                player_id,
                order: i + 1,
                current_score,
                hits: BTreeMap::new(),
            })
            .collect();

        Ok(Self {
            leg_id,
            match_type,
            parameters,
            players,
            current_player_id: seats[0].0,
            visits_played: 0,
            is_finished: false,
            winner_id: None,
        })
    }

    pub fn players(&self) -> &[PlayerLegState] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Index of a player in the order table.
    pub fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.player_id == player_id)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerLegState> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub(crate) fn seat(&self, seat: usize) -> &PlayerLegState {
        &self.players[seat]
    }

    pub(crate) fn seat_mut(&mut self, seat: usize) -> &mut PlayerLegState {
        &mut self.players[seat]
    }

    pub(crate) fn players_mut(&mut self) -> &mut [PlayerLegState] {
        &mut self.players
    }

    /// Current round, starting at 1 for the first visit of every player.
    pub fn round(&self) -> usize {
        self.visits_played / self.player_count() + 1
    }

    pub fn score_of(&self, player_id: PlayerId) -> Option<i32> {
        self.player(player_id).map(|p| p.current_score)
    }
}
