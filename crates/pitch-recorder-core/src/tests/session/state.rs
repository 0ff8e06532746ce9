use crate::{IndicatorSet, Prompt, SessionState, TriggerAction};

const ALL_STATES: [SessionState; 3] = [
    SessionState::Idle,
    SessionState::Recording,
    SessionState::Paused,
];

/// WHAT: Exactly one prompt group is visible in every state
/// WHY: The presentation must never show conflicting prompts
#[test]
fn given_any_state_when_building_indicators_then_exactly_one_prompt_group_visible() {
    for state in ALL_STATES {
        // Given/When: Indicators for the state
        let set = IndicatorSet::for_state(state);

        // Then: One group visible, pause prompt tied to recording indicator
        let groups = [
            set.tap_to_record(),
            set.recording_in_progress() && set.tap_to_pause(),
            set.tap_to_resume(),
        ];
        assert_eq!(groups.iter().filter(|v| **v).count(), 1, "{:?}", state);
        assert_eq!(set.recording_in_progress(), set.tap_to_pause());
        assert!(set.trigger_enabled());
    }
}

/// WHAT: Stop is visible iff a capture is open
/// WHY: Stopping an idle session is meaningless
#[test]
fn given_any_state_when_building_indicators_then_stop_visible_iff_active() {
    for state in ALL_STATES {
        assert_eq!(IndicatorSet::for_state(state).stop_visible(), state.is_active());
    }
}

/// WHAT: Prompts map to their states
/// WHY: Tray labels are derived from the prompt
#[test]
fn given_state_when_reading_prompt_then_matches_state() {
    assert_eq!(
        IndicatorSet::for_state(SessionState::Idle).prompt(),
        Prompt::TapToRecord
    );
    assert_eq!(
        IndicatorSet::for_state(SessionState::Recording).prompt(),
        Prompt::RecordingInProgress
    );
    assert_eq!(
        IndicatorSet::for_state(SessionState::Paused).prompt(),
        Prompt::TapToResume
    );
    assert_eq!(IndicatorSet::default().prompt(), Prompt::TapToRecord);
}

/// WHAT: Trigger actions follow the transition table
/// WHY: The single trigger control is overloaded by state
#[test]
fn given_state_when_resolving_trigger_then_action_and_next_state_match() {
    let expected = [
        (SessionState::Idle, TriggerAction::Start, SessionState::Recording),
        (SessionState::Recording, TriggerAction::Pause, SessionState::Paused),
        (SessionState::Paused, TriggerAction::Resume, SessionState::Recording),
    ];

    for (state, action, next) in expected {
        assert_eq!(state.trigger_action(), action);
        assert_eq!(action.next_state(), next);
    }
}
