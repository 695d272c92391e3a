use dartscore::{
    Dart, LegId, LegParameters, LegState, MatchType, OutshotType, PlayerId, TicTacToeBoard, Visit,
};

// ============================================================================
// Visit Creation
// ============================================================================

/// Visit from dart codes such as "T20", "D25", "S5" or "M".
pub fn visit(leg_id: LegId, player_id: PlayerId, darts: &[&str]) -> Visit {
    let darts: Vec<Dart> = darts
        .iter()
        .map(|code| Dart::from_string(code).expect("dart code should parse"))
        .collect();
    Visit::from_darts(leg_id, player_id, &darts).expect("visit should be valid")
}

// ============================================================================
// Leg Setup Utilities
// ============================================================================

pub struct LegBuilder {
    leg_id: LegId,
    match_type: MatchType,
    parameters: LegParameters,
    players: Vec<PlayerId>,
}

impl LegBuilder {
    pub fn new(match_type: MatchType) -> Self {
        Self {
            leg_id: 1,
            match_type,
            parameters: LegParameters::default(),
            players: vec![1, 2],
        }
    }

    pub fn x01(starting_score: i32) -> Self {
        Self::new(MatchType::X01).with_starting_score(starting_score)
    }

    pub fn with_leg_id(mut self, leg_id: LegId) -> Self {
        self.leg_id = leg_id;
        self
    }

    pub fn with_players(mut self, players: &[PlayerId]) -> Self {
        self.players = players.to_vec();
        self
    }

    pub fn with_starting_score(mut self, starting_score: i32) -> Self {
        self.parameters.starting_score = starting_score;
        self
    }

    pub fn with_outshot(mut self, outshot: OutshotType) -> Self {
        self.parameters.outshot = outshot;
        self
    }

    pub fn with_board(mut self, numbers: [i32; 9]) -> Self {
        self.parameters.board = Some(TicTacToeBoard::new(numbers));
        self
    }

    pub fn leg_id(&self) -> LegId {
        self.leg_id
    }

    pub fn parameters(&self) -> LegParameters {
        self.parameters.clone()
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn match_type(&self) -> MatchType {
        self.match_type
    }

    pub fn build(&self) -> LegState {
        LegState::start(
            self.leg_id,
            self.match_type,
            self.parameters.clone(),
            &self.players,
        )
        .expect("leg setup should be valid")
    }
}
