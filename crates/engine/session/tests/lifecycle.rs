//! End-to-end session lifecycle against the simulated platform

use futures::executor::block_on;
use xrdemo_session::sim::{SimBehavior, SimBinding, SimCall, SimPlatform, SimView};
use xrdemo_session::{
    Availability, ClickHandler, ReferenceSpaceType, SessionConfig, SessionController,
    SessionFeature, SessionMode, ToggleState,
};

type Controller = SessionController<SimPlatform, SimBinding>;

fn setup(config: SessionConfig, behavior: SimBehavior) -> (Controller, SimView) {
    let platform = SimPlatform::new(behavior);
    let binding = SimBinding::new(platform.log());
    let controller = SessionController::new(platform, binding, config);
    let view = SimView::default();
    controller.set_view(Box::new(view.clone()));
    (controller, view)
}

/// The control invariants that must hold between any two events
fn assert_consistent(controller: &Controller) {
    let control = controller.control().expect("control exists");
    match control.state() {
        ToggleState::Idle => {
            assert_eq!(control.handler(), ClickHandler::RequestSession);
            assert!(!controller.has_session());
        }
        ToggleState::Active => {
            assert_eq!(control.handler(), ClickHandler::EndSession);
            assert!(controller.has_session());
        }
    }
}

#[test]
fn ar_end_to_end() {
    let (controller, view) = setup(SessionConfig::ar(), SimBehavior::default());

    assert_eq!(block_on(controller.initialize()), Availability::Supported);
    assert_eq!(view.label().as_deref(), Some("Enter XR"));

    block_on(controller.click());
    assert_eq!(controller.state(), Some(ToggleState::Active));
    assert_eq!(view.label().as_deref(), Some("STOP AR"));

    let session = controller.platform().last_session().unwrap();
    assert_eq!(session.mode(), SessionMode::ImmersiveAr);
    assert_eq!(session.listener_count(), 1);

    // Platform-side termination takes the same path as a user end
    assert!(session.terminate());
    assert_eq!(controller.state(), Some(ToggleState::Idle));
    assert_eq!(view.label().as_deref(), Some("START AR"));
    assert_eq!(controller.handler(), Some(ClickHandler::RequestSession));
    assert!(!controller.has_session());

    // And the request handler is reachable again
    block_on(controller.click());
    assert_eq!(controller.state(), Some(ToggleState::Active));
    assert_eq!(controller.platform().log().session_requests(), 2);
}

#[test]
fn ar_start_pipeline_order() {
    let (controller, _) = setup(SessionConfig::ar(), SimBehavior::default());
    block_on(controller.initialize());
    controller.platform().log().clear();

    block_on(controller.click());

    let calls = controller.platform().log().calls();
    assert_eq!(
        calls,
        vec![
            SimCall::RequestSession {
                mode: SessionMode::ImmersiveAr,
                init: xrdemo_session::SessionInit::required(&[
                    SessionFeature::Viewer,
                    SessionFeature::Local,
                ]),
            },
            SimCall::PrepareSurface(1),
            SimCall::SetReferenceSpace(ReferenceSpaceType::Local),
            SimCall::SetSession(Some(1)),
        ]
    );
}

#[test]
fn vr_requests_optional_features() {
    let (controller, _) = setup(SessionConfig::vr(), SimBehavior::default());
    block_on(controller.initialize());
    block_on(controller.click());

    let request = controller
        .platform()
        .log()
        .calls()
        .into_iter()
        .find_map(|call| match call {
            SimCall::RequestSession { init, .. } => Some(init),
            _ => None,
        })
        .unwrap();
    assert!(request.required_features.is_empty());
    assert_eq!(
        request.optional_features,
        vec![SessionFeature::LocalFloor, SessionFeature::BoundedFloor]
    );
    // No surface preparation for VR
    assert_eq!(
        controller
            .platform()
            .log()
            .count(|c| matches!(c, SimCall::PrepareSurface(_))),
        0
    );
}

#[test]
fn click_sequences_keep_one_handler() {
    let (controller, view) = setup(SessionConfig::vr(), SimBehavior::default());
    block_on(controller.initialize());
    assert_consistent(&controller);

    for round in 0..5 {
        block_on(controller.click());
        assert_consistent(&controller);
        assert_eq!(controller.label().as_deref(), Some("Exit XR"));

        if round % 2 == 0 {
            block_on(controller.click());
        } else {
            controller.platform().last_session().unwrap().terminate();
        }
        assert_consistent(&controller);
        assert_eq!(controller.label().as_deref(), Some("Enter XR"));
    }

    assert_eq!(controller.platform().sessions().len(), 5);
    assert!(controller.platform().sessions().iter().all(|s| s.is_ended()));
    assert_eq!(view.history().len(), 11);
}

#[test]
fn ending_waits_for_termination_notification() {
    let (controller, _) = setup(SessionConfig::vr(), SimBehavior::default());
    block_on(controller.initialize());
    block_on(controller.click());
    let session = controller.session().unwrap();

    // Ending is a request. Until the end listener fires nothing changes.
    let pending = xrdemo_session::XrSession::end(&session);
    assert!(controller.has_session());
    assert_eq!(controller.state(), Some(ToggleState::Active));

    block_on(pending).unwrap();
    assert!(!controller.has_session());
    assert_eq!(controller.state(), Some(ToggleState::Idle));
}

#[test]
fn unsupported_mode_creates_no_control() {
    let (controller, view) = setup(SessionConfig::ar(), SimBehavior::inline_only());

    assert_eq!(block_on(controller.initialize()), Availability::Unsupported);
    assert_eq!(controller.state(), None);
    assert!(!view.is_attached());

    // Clicking has nothing to dispatch to
    block_on(controller.click());
    let log = controller.platform().log();
    assert_eq!(log.session_requests(), 0);
    // The AR fallback probe asks about inline, for diagnostics only
    assert_eq!(
        log.count(|c| matches!(c, SimCall::IsSessionSupported(SessionMode::Inline))),
        1
    );
}

#[test]
fn vr_unsupported_skips_fallback_probe() {
    let behavior = SimBehavior {
        supported_modes: vec![],
        ..SimBehavior::default()
    };
    let (controller, _) = setup(SessionConfig::vr(), behavior);
    assert_eq!(block_on(controller.initialize()), Availability::Unsupported);
    assert_eq!(
        controller
            .platform()
            .log()
            .count(|c| matches!(c, SimCall::IsSessionSupported(_))),
        1
    );
}

#[test]
fn insecure_context_is_reported() {
    let (controller, _) = setup(SessionConfig::vr(), SimBehavior::insecure());
    assert_eq!(
        block_on(controller.initialize()),
        Availability::Unavailable {
            secure_context: false
        }
    );
    assert!(controller.platform().log().calls().iter().all(|c| !matches!(
        c,
        SimCall::IsSessionSupported(_) | SimCall::RequestSession { .. }
    )));
}

#[test]
fn failed_support_query_is_logged_not_thrown() {
    let behavior = SimBehavior {
        fail_support_query: true,
        ..SimBehavior::default()
    };
    let (controller, _) = setup(SessionConfig::ar(), behavior);
    let availability = block_on(controller.initialize());
    assert!(matches!(availability, Availability::QueryFailed(_)));
    assert_eq!(controller.state(), None);
}

#[test]
fn rejected_request_leaves_control_idle_and_retryable() {
    let behavior = SimBehavior {
        reject_requests: true,
        ..SimBehavior::default()
    };
    let (controller, view) = setup(SessionConfig::ar(), behavior);
    block_on(controller.initialize());

    block_on(controller.click());
    assert_eq!(controller.state(), Some(ToggleState::Idle));
    assert!(!controller.has_session());
    assert!(!controller.is_busy());
    assert_eq!(view.history(), vec!["Enter XR"]);

    block_on(controller.click());
    assert_eq!(controller.platform().log().session_requests(), 2);

    // Permission granted on the next attempt
    controller
        .platform()
        .update_behavior(|b| b.reject_requests = false);
    block_on(controller.click());
    assert_eq!(controller.state(), Some(ToggleState::Active));
    assert_consistent(&controller);
}

#[test]
fn surface_failure_abandons_the_session() {
    let platform = SimPlatform::new(SimBehavior::default());
    let binding = SimBinding::new(platform.log()).with_surface_failure();
    let controller = SessionController::new(platform, binding, SessionConfig::ar());
    block_on(controller.initialize());

    block_on(controller.click());

    assert_eq!(controller.state(), Some(ToggleState::Idle));
    assert!(!controller.has_session());
    assert!(!controller.is_busy());
    assert_eq!(controller.label().as_deref(), Some("Enter XR"));
    let session = controller.platform().last_session().unwrap();
    assert!(session.is_ended());
    assert!(controller.with_binding(|b| b.session().is_none()));
}
