use std::sync::Arc;

use dartscore::{
    InMemoryLegRepository, InMemoryRatingRepository, LegState, RatingService, RatingSettings,
    ScoringService,
};

use super::leg_builders::LegBuilder;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub scoring_service: Arc<ScoringService>,
    pub rating_service: Arc<RatingService>,
    pub leg_repository: Arc<InMemoryLegRepository>,
    pub rating_repository: Arc<InMemoryRatingRepository>,
    pub legs: Vec<LegState>,
}

pub struct TestSetupBuilder {
    legs: Vec<LegBuilder>,
    settings: RatingSettings,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            legs: vec![],
            settings: RatingSettings::default(),
        }
    }

    pub fn with_leg(mut self, leg: LegBuilder) -> Self {
        self.legs.push(leg);
        self
    }

    pub fn with_settings(mut self, settings: RatingSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn build(self) -> TestSetup {
        let leg_repository = Arc::new(InMemoryLegRepository::new());
        let rating_repository = Arc::new(InMemoryRatingRepository::new());

        let scoring_service = Arc::new(ScoringService::new(leg_repository.clone()));
        let rating_service = Arc::new(
            RatingService::new(rating_repository.clone(), self.settings)
                .expect("settings should be valid"),
        );

        let mut legs = Vec::new();
        for leg in &self.legs {
            let started = scoring_service
                .start_leg(
                    leg.leg_id(),
                    leg.match_type(),
                    leg.parameters(),
                    leg.players(),
                )
                .await
                .expect("leg should start");
            legs.push(started);
        }

        TestSetup {
            scoring_service,
            rating_service,
            leg_repository,
            rating_repository,
            legs,
        }
    }
}
