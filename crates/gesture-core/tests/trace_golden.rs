use std::path::PathBuf;

use waterflow_common::config::GestureConfig;
use waterflow_gesture_core::GestureClassifier;
use waterflow_gesture_model::event::{
    parse_notifications, parse_pointer_trace, ConsumeDecision, Notification, PointerEvent,
};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("traces")
}

fn load_trace(name: &str) -> Vec<PointerEvent> {
    let content = std::fs::read_to_string(fixture_dir().join(format!("{name}.jsonl")))
        .expect("trace fixture should be readable");
    parse_pointer_trace(&content).expect("trace fixture should parse")
}

fn load_expected(name: &str) -> Vec<Notification> {
    let content = std::fs::read_to_string(fixture_dir().join(format!("{name}.expected.jsonl")))
        .expect("expected fixture should be readable");
    parse_notifications(&content).expect("expected fixture should parse")
}

fn classify(events: &[PointerEvent]) -> (Vec<ConsumeDecision>, Vec<Notification>) {
    let mut classifier = GestureClassifier::new(GestureConfig::default(), Vec::new());
    let decisions = events.iter().map(|e| classifier.feed(e)).collect();
    (decisions, classifier.into_sink())
}

#[test]
fn right_drag_trace_matches_expected() {
    let events = load_trace("right_drag");
    let (decisions, notifications) = classify(&events);
    assert_eq!(notifications, load_expected("right_drag"));

    // Sub-threshold and throttled moves pass through; the injected move too.
    let consumed: Vec<bool> = decisions.iter().map(|d| d.is_consumed()).collect();
    assert_eq!(
        consumed,
        vec![true, false, false, true, false, true, false, true, false, true]
    );
}

#[test]
fn click_trace_ignores_its_own_replay() {
    let events = load_trace("click_with_replay");
    let (decisions, notifications) = classify(&events);
    assert_eq!(notifications, load_expected("click_with_replay"));
    assert_eq!(decisions[3], ConsumeDecision::PassThrough);
    assert_eq!(decisions[4], ConsumeDecision::PassThrough);
}

#[test]
fn lapsed_hold_is_swallowed_then_next_cycle_drags() {
    let events = load_trace("lapsed_hold");
    let (decisions, notifications) = classify(&events);
    assert_eq!(notifications, load_expected("lapsed_hold"));
    // The lapsed release is still consumed so no stray click leaks out.
    assert_eq!(decisions[4], ConsumeDecision::Consume);
}
