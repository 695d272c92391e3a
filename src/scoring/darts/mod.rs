pub mod dart;
pub mod visit;

#[cfg(test)]
mod tests;

pub use dart::{Dart, DartError, Multiplier, Throw, BULL, MISS};
pub use visit::{Visit, DARTS_PER_VISIT};
