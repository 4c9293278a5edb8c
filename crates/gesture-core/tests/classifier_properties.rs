use proptest::prelude::*;

use waterflow_common::config::GestureConfig;
use waterflow_gesture_core::GestureClassifier;
use waterflow_gesture_model::event::{
    ConsumeDecision, GestureKind, Notification, PointerEvent, PointerKind,
};

#[derive(Debug, Clone)]
struct Step {
    kind: PointerKind,
    dt_ms: u64,
    x: i32,
    y: i32,
    synthetic: bool,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        prop_oneof![
            1 => Just(PointerKind::ButtonDown),
            6 => Just(PointerKind::Move),
            1 => Just(PointerKind::ButtonUp),
        ],
        0u64..60,
        -60i32..60,
        -60i32..60,
        prop::bool::weighted(0.1),
    )
        .prop_map(|(kind, dt_ms, x, y, synthetic)| Step {
            kind,
            dt_ms,
            x,
            y,
            synthetic,
        })
}

fn to_events(steps: &[Step]) -> Vec<PointerEvent> {
    let mut t = 0;
    steps
        .iter()
        .map(|step| {
            t += step.dt_ms;
            let mut event = PointerEvent::new(step.kind, t, step.x, step.y);
            event.synthetic = step.synthetic;
            event
        })
        .collect()
}

proptest! {
    #[test]
    fn gesture_notifications_follow_a_single_start(steps in prop::collection::vec(step_strategy(), 0..200)) {
        let mut classifier = GestureClassifier::new(GestureConfig::default(), Vec::new());
        let mut started = false;
        let mut ended = false;
        let mut clicked = false;

        for event in to_events(&steps) {
            let emitted_before = classifier.sink().len();
            classifier.feed(&event);

            if event.kind == PointerKind::ButtonDown && !event.synthetic {
                started = false;
                ended = false;
                clicked = false;
            }

            for notification in &classifier.sink()[emitted_before..] {
                match notification {
                    Notification::Gesture(g) => match g.kind {
                        GestureKind::Start => {
                            prop_assert!(!started, "second Start in one cycle");
                            started = true;
                        }
                        GestureKind::Dragging => {
                            prop_assert!(started && !ended, "Dragging outside a gesture");
                        }
                        GestureKind::End => {
                            prop_assert!(started && !ended, "End without Start");
                            ended = true;
                        }
                        GestureKind::Cancel => prop_assert!(false, "Cancel is never emitted"),
                    },
                    Notification::Click(_) => {
                        prop_assert!(!started && !clicked, "click inside a gesture cycle");
                        clicked = true;
                    }
                }
            }

            let state = classifier.state();
            prop_assert!(!state.gesture_active || state.right_button_down);
        }
    }

    #[test]
    fn synthetic_events_never_change_anything(
        steps in prop::collection::vec(step_strategy(), 0..100),
        extra in step_strategy(),
    ) {
        let mut classifier = GestureClassifier::new(GestureConfig::default(), Vec::new());
        let events = to_events(&steps);
        for event in &events {
            classifier.feed(event);
        }

        let state_before = *classifier.state();
        let emitted_before = classifier.sink().len();
        let t = events.last().map_or(0, |e| e.timestamp_ms) + extra.dt_ms;
        let injected = PointerEvent::new(extra.kind, t, extra.x, extra.y).injected();

        prop_assert_eq!(classifier.feed(&injected), ConsumeDecision::PassThrough);
        prop_assert_eq!(classifier.state(), &state_before);
        prop_assert_eq!(classifier.sink().len(), emitted_before);
    }

    #[test]
    fn presses_are_always_consumed(steps in prop::collection::vec(step_strategy(), 0..100)) {
        let mut classifier = GestureClassifier::new(GestureConfig::default(), Vec::new());
        for event in to_events(&steps) {
            let decision = classifier.feed(&event);
            if event.kind == PointerKind::ButtonDown && !event.synthetic {
                prop_assert_eq!(decision, ConsumeDecision::Consume);
                prop_assert!(classifier.state().timing_valid);
                prop_assert_eq!(classifier.state().anchor, event.position);
            }
        }
    }
}
