use intake_core::state::{allowed, allowed_transitions, SessionState};
use proptest::prelude::*;

#[test]
fn test_open_transitions() {
    assert!(allowed(SessionState::Open, SessionState::Committing));
    assert!(allowed(SessionState::Open, SessionState::Closed));

    // Invalid
    assert!(!allowed(SessionState::Open, SessionState::Open));
}

#[test]
fn test_committing_transitions() {
    // Success closes, failure re-opens
    assert!(allowed(SessionState::Committing, SessionState::Closed));
    assert!(allowed(SessionState::Committing, SessionState::Open));

    assert!(!allowed(SessionState::Committing, SessionState::Committing));
}

#[test]
fn test_closed_is_terminal() {
    assert!(allowed_transitions(SessionState::Closed).is_empty());
}

proptest! {
    #[test]
    fn prop_allowed_agrees_with_table(
        from in prop_oneof![
            Just(SessionState::Open),
            Just(SessionState::Committing),
            Just(SessionState::Closed),
        ],
        to in prop_oneof![
            Just(SessionState::Open),
            Just(SessionState::Committing),
            Just(SessionState::Closed),
        ]
    ) {
        let table = allowed_transitions(from);

        if allowed(from, to) {
            prop_assert!(table.contains(&to));
        } else {
            prop_assert!(!table.contains(&to));
        }
    }
}
