use std::fmt;

use serde::Serialize;

use super::dart::{Dart, DartError, Multiplier, Throw};
use crate::scoring::leg::OutshotType;
use crate::shared::{LegId, PlayerId, VisitId};

pub const DARTS_PER_VISIT: usize = 3;

/// Up to three darts thrown by one player in one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub id: Option<VisitId>,
    pub leg_id: LegId,
    pub player_id: PlayerId,
    throws: [Throw; DARTS_PER_VISIT],
    pub is_bust: bool,
}

impl Visit {
    pub fn new(
        leg_id: LegId,
        player_id: PlayerId,
        throws: [Throw; DARTS_PER_VISIT],
    ) -> Result<Self, DartError> {
        validate_throws(&throws)?;
        Ok(Self {
            id: None,
            leg_id,
            player_id,
            throws,
            is_bust: false,
        })
    }

    /// Builds a visit from the darts actually thrown, in order.
    pub fn from_darts(leg_id: LegId, player_id: PlayerId, darts: &[Dart]) -> Result<Self, DartError> {
        if darts.is_empty() {
            return Err(DartError::FirstDartNotThrown);
        }
        if darts.len() > DARTS_PER_VISIT {
            return Err(DartError::TooManyDarts(darts.len()));
        }

        let mut throws = [Throw::NotThrown; DARTS_PER_VISIT];
        for (slot, dart) in throws.iter_mut().zip(darts) {
            *slot = Throw::from(*dart);
        }
        Self::new(leg_id, player_id, throws)
    }

    pub fn throws(&self) -> &[Throw; DARTS_PER_VISIT] {
        &self.throws
    }

    pub fn throw(&self, index: usize) -> Throw {
        self.throws.get(index).copied().unwrap_or_default()
    }

    /// Thrown darts with their slot index, misses included.
    pub fn darts(&self) -> impl Iterator<Item = (usize, Dart)> + '_ {
        self.throws
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.dart().map(|d| (i, d)))
    }

    pub fn score(&self) -> i32 {
        self.throws.iter().map(Throw::score).sum()
    }

    pub fn darts_thrown(&self) -> usize {
        self.throws.iter().filter(|t| t.is_thrown()).count()
    }

    pub fn last_dart(&self) -> Option<Dart> {
        self.darts().last().map(|(_, d)| d)
    }

    /// Total marks the visit put on `value`.
    pub fn hit_count(&self, value: u8) -> u32 {
        self.darts().map(|(_, d)| d.marks_on(value)).sum()
    }

    /// A single, a double and a triple of the same number.
    pub fn is_shanghai(&self) -> bool {
        let darts: Vec<Dart> = self.darts().map(|(_, d)| d).collect();
        if darts.len() != DARTS_PER_VISIT || darts.iter().any(Dart::is_miss) {
            return false;
        }

        let value = darts[0].value();
        let mut multipliers: Vec<Multiplier> = darts.iter().map(Dart::multiplier).collect();
        multipliers.sort();

        darts.iter().all(|d| d.value() == value)
            && multipliers == [Multiplier::Single, Multiplier::Double, Multiplier::Triple]
    }

    /// Remaining score reaches zero and the last thrown dart is a valid out-shot.
    pub fn is_checkout(&self, remaining: i32, outshot: OutshotType) -> bool {
        remaining - self.score() == 0
            && self
                .last_dart()
                .map(|dart| outshot.allows(&dart))
                .unwrap_or(false)
    }

    /// Marks every dart after `index` as not thrown and returns the slots
    /// that were thrown before.
    pub(crate) fn invalidate_after(&mut self, index: usize) -> Vec<usize> {
        let mut invalidated = Vec::new();
        for i in (index + 1)..DARTS_PER_VISIT {
            if self.throws[i].is_thrown() {
                invalidated.push(i);
            }
            self.throws[i] = Throw::NotThrown;
        }
        invalidated
    }

    /// Replaces the darts without running any variant rules.
    pub fn correct_throws(&mut self, throws: [Throw; DARTS_PER_VISIT]) -> Result<(), DartError> {
        validate_throws(&throws)?;
        self.throws = throws;
        Ok(())
    }
}

fn validate_throws(throws: &[Throw; DARTS_PER_VISIT]) -> Result<(), DartError> {
    if !throws[0].is_thrown() {
        return Err(DartError::FirstDartNotThrown);
    }
    for i in 1..DARTS_PER_VISIT {
        if throws[i].is_thrown() && !throws[i - 1].is_thrown() {
            return Err(DartError::ThrowAfterNotThrown(i));
        }
    }
    if let Some(i) = throws
        .iter()
        .position(|t| matches!(t, Throw::Hit(dart) if dart.is_miss()))
    {
        return Err(DartError::HitWithoutValue(i));
    }
    Ok(())
}

impl fmt::Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.throws[0], self.throws[1], self.throws[2])
    }
}
