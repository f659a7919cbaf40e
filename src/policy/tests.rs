use super::*;

fn thresholds() -> RelevanceThresholds {
    RelevanceThresholds::new(0.7, 0.98).unwrap()
}

#[test]
fn test_classify_empty_context_is_miss() {
    assert_eq!(classify(None, &thresholds()), Decision::Miss);
}

#[test]
fn test_classify_below_floor_is_miss() {
    assert_eq!(classify(Some(0.0), &thresholds()), Decision::Miss);
    assert_eq!(classify(Some(0.699), &thresholds()), Decision::Miss);
}

#[test]
fn test_classify_floor_is_inclusive() {
    assert_eq!(classify(Some(0.7), &thresholds()), Decision::Synthesize);
}

#[test]
fn test_classify_mid_band_synthesizes() {
    assert_eq!(classify(Some(0.85), &thresholds()), Decision::Synthesize);
    assert_eq!(classify(Some(0.979), &thresholds()), Decision::Synthesize);
}

#[test]
fn test_classify_direct_threshold_is_inclusive() {
    assert_eq!(classify(Some(0.98), &thresholds()), Decision::Direct);
    assert_eq!(classify(Some(1.0), &thresholds()), Decision::Direct);
}

#[test]
fn test_equal_thresholds_collapse_synthesize_band() {
    let t = RelevanceThresholds::new(0.9, 0.9).unwrap();
    assert_eq!(classify(Some(0.89), &t), Decision::Miss);
    assert_eq!(classify(Some(0.9), &t), Decision::Direct);
}

#[test]
fn test_thresholds_reject_inverted_pair() {
    assert!(RelevanceThresholds::new(0.98, 0.7).is_err());
}

#[test]
fn test_thresholds_reject_out_of_range() {
    assert!(RelevanceThresholds::new(-0.1, 0.5).is_err());
    assert!(RelevanceThresholds::new(0.5, 1.1).is_err());
}

#[test]
fn test_thresholds_accept_full_range() {
    assert!(RelevanceThresholds::new(0.0, 1.0).is_ok());
    assert!(RelevanceThresholds::new(1.0, 1.0).is_ok());
}
