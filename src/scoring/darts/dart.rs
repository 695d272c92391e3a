use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use thiserror::Error;

use crate::scoring::leg::OutshotType;

pub const MISS: u8 = 0;
pub const BULL: u8 = 25;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DartError {
    #[error("Invalid dart value: {0}")]
    InvalidValue(u8),
    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(u8),
    #[error("Bull cannot be tripled")]
    TripleBull,
    #[error("Cannot parse dart: {0}")]
    Unparsable(String),
    #[error("First dart must be thrown")]
    FirstDartNotThrown,
    #[error("Dart {0} thrown after a dart that was not thrown")]
    ThrowAfterNotThrown(usize),
    #[error("A visit holds at most three darts, got {0}")]
    TooManyDarts(usize),
    #[error("Dart {0} is a hit without a value, record it as a miss")]
    HitWithoutValue(usize),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Multiplier {
    Single = 1,
    Double = 2,
    Triple = 3,
}

impl Multiplier {
    pub fn factor(self) -> i32 {
        self as i32
    }
}

impl TryFrom<u8> for Multiplier {
    type Error = DartError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Multiplier::Single),
            2 => Ok(Multiplier::Double),
            3 => Ok(Multiplier::Triple),
            other => Err(DartError::InvalidMultiplier(other)),
        }
    }
}

impl From<Multiplier> for u8 {
    fn from(multiplier: Multiplier) -> Self {
        multiplier as u8
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Multiplier::Single => "S",
                Multiplier::Double => "D",
                Multiplier::Triple => "T",
            }
        )
    }
}

#[derive(Deserialize)]
struct DartRecord {
    value: u8,
    multiplier: u8,
}

impl TryFrom<DartRecord> for Dart {
    type Error = DartError;

    fn try_from(record: DartRecord) -> Result<Self, Self::Error> {
        Dart::new(record.value, record.multiplier)
    }
}

/// A single thrown dart. A value of zero is a thrown miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DartRecord")]
pub struct Dart {
    value: u8,
    multiplier: Multiplier,
}

impl Dart {
    pub fn new(value: u8, multiplier: u8) -> Result<Self, DartError> {
        let multiplier = Multiplier::try_from(multiplier)?;
        if value > 20 && value != BULL {
            return Err(DartError::InvalidValue(value));
        }
        if value == BULL && multiplier == Multiplier::Triple {
            return Err(DartError::TripleBull);
        }
        Ok(Self { value, multiplier })
    }

    pub fn miss() -> Self {
        Self {
            value: MISS,
            multiplier: Multiplier::Single,
        }
    }

    /// Parses `T20`, `D25`, `S5`, `5` (single) or `0`/`M` (miss).
    pub fn from_string(s: &str) -> Result<Self, DartError> {
        let s = s.trim();
        let unparsable = || DartError::Unparsable(s.to_string());

        if s.eq_ignore_ascii_case("M") {
            return Ok(Self::miss());
        }

        let (multiplier, digits) = match s.chars().next() {
            Some('S') | Some('s') => (1, &s[1..]),
            Some('D') | Some('d') => (2, &s[1..]),
            Some('T') | Some('t') => (3, &s[1..]),
            Some(c) if c.is_ascii_digit() => (1, s),
            _ => return Err(unparsable()),
        };

        let value: u8 = digits.parse().map_err(|_| unparsable())?;
        Self::new(value, multiplier)
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }

    pub fn score(&self) -> i32 {
        self.value as i32 * self.multiplier.factor()
    }

    pub fn is_miss(&self) -> bool {
        self.value == MISS
    }

    pub fn is_bull(&self) -> bool {
        self.value == BULL
    }

    pub fn is_single(&self) -> bool {
        !self.is_miss() && self.multiplier == Multiplier::Single
    }

    pub fn is_double(&self) -> bool {
        !self.is_miss() && self.multiplier == Multiplier::Double
    }

    pub fn is_triple(&self) -> bool {
        !self.is_miss() && self.multiplier == Multiplier::Triple
    }

    /// Marks this dart puts on `value`, zero when it hit something else.
    pub fn marks_on(&self, value: u8) -> u32 {
        if !self.is_miss() && self.value == value {
            self.multiplier.factor() as u32
        } else {
            0
        }
    }

    /// Whether throwing this dart with `remaining` left busts the visit.
    pub fn is_bust(&self, remaining: i32, outshot: OutshotType) -> bool {
        let after = remaining - self.score();
        after < 0 || after == 1 || (after == 0 && !outshot.allows(self))
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_miss() {
            write!(f, "M")
        } else {
            write!(f, "{}{}", self.multiplier, self.value)
        }
    }
}

/// One dart slot of a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Throw {
    #[default]
    NotThrown,
    Miss,
    Hit(Dart),
}

impl Throw {
    pub fn is_thrown(&self) -> bool {
        !matches!(self, Throw::NotThrown)
    }

    /// The thrown dart, with a miss reported as a zero-value dart.
    pub fn dart(&self) -> Option<Dart> {
        match self {
            Throw::NotThrown => None,
            Throw::Miss => Some(Dart::miss()),
            Throw::Hit(dart) => Some(*dart),
        }
    }

    pub fn score(&self) -> i32 {
        self.dart().map(|d| d.score()).unwrap_or_default()
    }
}

impl From<Dart> for Throw {
    fn from(dart: Dart) -> Self {
        if dart.is_miss() {
            Throw::Miss
        } else {
            Throw::Hit(dart)
        }
    }
}

impl From<Option<Dart>> for Throw {
    fn from(dart: Option<Dart>) -> Self {
        dart.map(Throw::from).unwrap_or(Throw::NotThrown)
    }
}

impl fmt::Display for Throw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Throw::NotThrown => write!(f, "-"),
            Throw::Miss => write!(f, "M"),
            Throw::Hit(dart) => write!(f, "{}", dart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dart_from_string() {
        let triple_twenty = Dart::from_string("T20").unwrap();
        assert_eq!(triple_twenty.value(), 20);
        assert_eq!(triple_twenty.multiplier(), Multiplier::Triple);
        assert_eq!(triple_twenty.score(), 60);

        let bullseye = Dart::from_string("D25").unwrap();
        assert!(bullseye.is_bull());
        assert!(bullseye.is_double());
        assert_eq!(bullseye.score(), 50);

        assert_eq!(Dart::from_string("7").unwrap().score(), 7);
        assert!(Dart::from_string("M").unwrap().is_miss());
        assert!(Dart::from_string("0").unwrap().is_miss());

        assert!(Dart::from_string("X20").is_err());
        assert!(Dart::from_string("T").is_err());
        assert!(Dart::from_string("").is_err());
    }

    #[test]
    fn test_dart_validation() {
        assert_eq!(Dart::new(25, 3), Err(DartError::TripleBull));
        assert_eq!(Dart::new(21, 1), Err(DartError::InvalidValue(21)));
        assert_eq!(Dart::new(20, 4), Err(DartError::InvalidMultiplier(4)));
        assert_eq!(Dart::new(20, 0), Err(DartError::InvalidMultiplier(0)));
        assert!(Dart::new(0, 1).is_ok());
        assert!(Dart::new(25, 2).is_ok());
    }

    #[test]
    fn test_miss_is_never_classified_as_double() {
        let miss = Dart::new(0, 2).unwrap();
        assert!(miss.is_miss());
        assert!(!miss.is_double());
        assert!(!miss.is_single());
        assert_eq!(miss.score(), 0);
    }

    #[test]
    fn test_dart_display() {
        assert_eq!(Dart::new(20, 3).unwrap().to_string(), "T20");
        assert_eq!(Dart::new(25, 1).unwrap().to_string(), "S25");
        assert_eq!(Dart::miss().to_string(), "M");
        assert_eq!(Throw::NotThrown.to_string(), "-");
    }

    #[test]
    fn test_throw_from_dart_keeps_miss_distinct() {
        assert_eq!(Throw::from(Dart::miss()), Throw::Miss);
        assert_eq!(Throw::from(None), Throw::NotThrown);
        assert!(Throw::Miss.is_thrown());
        assert!(!Throw::NotThrown.is_thrown());
        assert_eq!(Throw::Miss.score(), 0);
    }

    #[test]
    fn test_deserialize_rejects_triple_bull() {
        let ok: Dart = serde_json::from_str(r#"{"value":20,"multiplier":3}"#).unwrap();
        assert_eq!(ok.score(), 60);

        let err = serde_json::from_str::<Dart>(r#"{"value":25,"multiplier":3}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<Dart>(r#"{"value":19,"multiplier":5}"#);
        assert!(err.is_err());
    }
}
