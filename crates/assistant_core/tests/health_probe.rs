use assistant_core::{update, AppState, BackendStatus, Effect, Msg};

#[test]
fn started_requests_health_once() {
    let (state, effects) = update(AppState::new(), Msg::Started);
    assert_eq!(effects, vec![Effect::CheckHealth]);

    let (_state, effects) = update(state, Msg::Started);
    assert!(effects.is_empty());
}

#[test]
fn health_result_updates_status() {
    let (mut state, _) = update(
        AppState::new(),
        Msg::HealthChecked {
            ready: true,
            detail: "ready".to_string(),
        },
    );
    assert_eq!(state.backend_status(), &BackendStatus::Ready);
    assert!(state.consume_dirty());

    let (state, _) = update(
        state,
        Msg::HealthChecked {
            ready: false,
            detail: "network error: connection refused".to_string(),
        },
    );
    assert_eq!(
        state.view().backend_status,
        BackendStatus::NotReady("network error: connection refused".to_string())
    );
}
