use super::dart::{Dart, DartError, Throw};
use super::visit::Visit;
use crate::scoring::leg::OutshotType;
use rstest::rstest;

fn dart(code: &str) -> Dart {
    Dart::from_string(code).unwrap()
}

fn visit(codes: &[&str]) -> Visit {
    let darts: Vec<Dart> = codes.iter().map(|c| dart(c)).collect();
    Visit::from_darts(1, 1, &darts).unwrap()
}

#[test]
fn test_visit_score_and_darts_thrown() {
    let v = visit(&["T20", "T20", "T20"]);
    assert_eq!(v.score(), 180);
    assert_eq!(v.darts_thrown(), 3);

    let v = visit(&["D25"]);
    assert_eq!(v.score(), 50);
    assert_eq!(v.darts_thrown(), 1);
    assert_eq!(v.throw(1), Throw::NotThrown);
}

#[test]
fn test_visit_rejects_gaps_and_empty_first_dart() {
    let t20 = Throw::from(dart("T20"));

    let err = Visit::new(1, 1, [Throw::NotThrown, t20, Throw::NotThrown]).unwrap_err();
    assert_eq!(err, DartError::FirstDartNotThrown);

    let err = Visit::new(1, 1, [t20, Throw::NotThrown, t20]).unwrap_err();
    assert_eq!(err, DartError::ThrowAfterNotThrown(2));

    let err = Visit::from_darts(1, 1, &[]).unwrap_err();
    assert_eq!(err, DartError::FirstDartNotThrown);

    let four = [dart("1"), dart("2"), dart("3"), dart("4")];
    assert_eq!(
        Visit::from_darts(1, 1, &four).unwrap_err(),
        DartError::TooManyDarts(4)
    );
}

#[test]
fn test_hit_count_uses_marks() {
    let v = visit(&["T20", "S20", "D19"]);
    assert_eq!(v.hit_count(20), 4);
    assert_eq!(v.hit_count(19), 2);
    assert_eq!(v.hit_count(18), 0);
}

#[rstest]
#[case(&["S20", "D20", "T20"], true)]
#[case(&["T7", "S7", "D7"], true)]
#[case(&["S20", "S20", "T20"], false)]
#[case(&["S20", "D20", "T19"], false)]
#[case(&["S20", "D20"], false)]
fn test_is_shanghai(#[case] codes: &[&str], #[case] expected: bool) {
    assert_eq!(visit(codes).is_shanghai(), expected);
}

#[rstest]
#[case(&["S20", "S20", "S20"], 60, OutshotType::Any, true)]
#[case(&["S20", "S20", "S20"], 60, OutshotType::Double, false)]
#[case(&["T20"], 60, OutshotType::Master, true)]
#[case(&["T20"], 60, OutshotType::Double, false)]
#[case(&["D20"], 40, OutshotType::Double, true)]
#[case(&["D25"], 50, OutshotType::Double, true)]
#[case(&["S20", "D10"], 41, OutshotType::Double, false)]
fn test_is_checkout(
    #[case] codes: &[&str],
    #[case] remaining: i32,
    #[case] outshot: OutshotType,
    #[case] expected: bool,
) {
    assert_eq!(visit(codes).is_checkout(remaining, outshot), expected);
}

#[rstest]
#[case("T20", 59, OutshotType::Double, true)] // overshoot
#[case("S19", 20, OutshotType::Any, true)] // leaves one
#[case("S20", 20, OutshotType::Double, true)] // single cannot finish
#[case("D10", 20, OutshotType::Double, false)]
#[case("S20", 20, OutshotType::Any, false)]
#[case("T20", 60, OutshotType::Master, false)]
#[case("M", 40, OutshotType::Double, false)]
fn test_dart_is_bust(
    #[case] code: &str,
    #[case] remaining: i32,
    #[case] outshot: OutshotType,
    #[case] expected: bool,
) {
    assert_eq!(dart(code).is_bust(remaining, outshot), expected);
}

#[test]
fn test_invalidate_after_cascades_forward() {
    let mut v = visit(&["S1", "M", "S3"]);
    let invalidated = v.invalidate_after(0);
    assert_eq!(invalidated, vec![1, 2]);
    assert_eq!(v.throw(0), Throw::from(dart("S1")));
    assert_eq!(v.throw(1), Throw::NotThrown);
    assert_eq!(v.throw(2), Throw::NotThrown);
    assert_eq!(v.to_string(), "S1 - -");
}

#[test]
fn test_correct_throws_validates_shape() {
    let mut v = visit(&["S1", "S2", "S3"]);
    let t20 = Throw::from(dart("T20"));
    v.correct_throws([t20, t20, Throw::NotThrown]).unwrap();
    assert_eq!(v.score(), 120);

    assert!(v
        .correct_throws([Throw::NotThrown, t20, Throw::NotThrown])
        .is_err());
    assert_eq!(v.score(), 120);
}

#[test]
fn test_thrown_miss_has_one_spelling() {
    let t20 = Throw::from(dart("T20"));
    let zero_hit = Throw::Hit(Dart::new(0, 2).unwrap());

    let err = Visit::new(1, 1, [t20, zero_hit, Throw::NotThrown]).unwrap_err();
    assert_eq!(err, DartError::HitWithoutValue(1));

    let mut v = visit(&["S1"]);
    assert_eq!(
        v.correct_throws([zero_hit, Throw::NotThrown, Throw::NotThrown]),
        Err(DartError::HitWithoutValue(0))
    );

    let v = Visit::new(1, 1, [t20, Throw::Miss, Throw::NotThrown]).unwrap();
    assert_eq!(v.throw(1), Throw::Miss);
}
