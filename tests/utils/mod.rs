pub mod leg_builders;
pub mod match_builders;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use leg_builders::{visit, LegBuilder};
#[allow(unused_imports)]
pub use match_builders::MatchBuilder;
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
