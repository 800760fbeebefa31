//! Scripted run of one demo against the simulated platform

use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;
use serde::Serialize;
use tracing::{debug, info, warn};
use xrdemo_render::{wire_demo, HeadlessRenderer, ManualScheduler};
use xrdemo_session::sim::{SimBinding, SimPlatform, SimView};
use xrdemo_session::SessionController;

use crate::config::SimConfig;

/// Frames run after the session has ended
const TRAILING_FRAMES: u32 = 3;

/// What happened during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub variant: String,
    pub availability: String,
    /// Every label the toggle control showed
    pub labels: Vec<String>,
    pub sessions_started: usize,
    pub sessions_ended: usize,
    pub frames_drawn: u64,
    pub frames_cleared: u64,
    pub platform_calls: usize,
}

struct Clock<'a> {
    scheduler: &'a ManualScheduler,
    time_ms: f64,
    interval_ms: f64,
}

impl Clock<'_> {
    fn tick(&mut self) {
        if !self.scheduler.tick(self.time_ms) {
            debug!("No frame callback at {:.1} ms", self.time_ms);
        }
        self.time_ms += self.interval_ms;
    }

    fn run(&mut self, frames: u32) {
        for _ in 0..frames {
            self.tick();
        }
    }
}

pub fn run(config: &SimConfig) -> SimReport {
    let platform = SimPlatform::new(config.behavior());
    let log = platform.log();
    let mut binding = SimBinding::new(log.clone());
    if config.fail_surface {
        binding = binding.with_surface_failure();
    }

    let controller = SessionController::new(platform, binding, config.session_config());
    let view = SimView::default();
    controller.set_view(Box::new(view.clone()));

    let driver = Rc::new(RefCell::new(
        config.variant.driver(config.display.aspect().unwrap_or(1.0)),
    ));
    let renderer = HeadlessRenderer::default();
    let scheduler = ManualScheduler::default();
    let display = config.display;
    wire_demo(
        config.variant,
        &controller,
        driver.clone(),
        renderer.clone(),
        scheduler.clone(),
        Rc::new(move || Some(display)),
    );

    let mut clock = Clock {
        scheduler: &scheduler,
        time_ms: 0.0,
        interval_ms: config.frame_interval_ms,
    };

    let availability = block_on(controller.initialize());
    info!("Availability: {:?}", availability);

    if availability.is_supported() {
        block_on(controller.click());
        if !controller.has_session() {
            warn!("Session did not start");
        }

        for frame in 0..config.frames {
            if config.end_after_frames == Some(frame) {
                if let Some(session) = controller.session() {
                    info!("Platform ends the session after {} frames", frame);
                    session.terminate();
                }
            }
            clock.tick();
        }

        if controller.has_session() {
            info!("Ending session from the control");
            block_on(controller.click());
        }
    } else {
        clock.run(config.frames);
    }
    clock.run(TRAILING_FRAMES);

    let sessions = controller.platform().sessions();
    let driver = driver.borrow();
    SimReport {
        variant: config.variant.to_string(),
        availability: format!("{:?}", availability),
        labels: view.history(),
        sessions_started: sessions.len(),
        sessions_ended: sessions.iter().filter(|s| s.is_ended()).count(),
        frames_drawn: driver.frames_drawn(),
        frames_cleared: driver.frames_cleared(),
        platform_calls: log.calls().len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrdemo_render::DemoVariant;

    fn config(variant: DemoVariant) -> SimConfig {
        SimConfig {
            variant,
            frames: 10,
            ..SimConfig::default()
        }
    }

    #[test]
    fn vr_draws_every_frame() {
        let report = run(&config(DemoVariant::Vr));
        assert_eq!(report.availability, "Supported");
        assert_eq!(report.labels, vec!["Enter XR", "Exit XR", "Enter XR"]);
        assert_eq!(report.frames_drawn, 10 + TRAILING_FRAMES as u64);
        assert_eq!(report.frames_cleared, 0);
    }

    #[test]
    fn ar_clears_after_platform_end() {
        let report = run(&SimConfig {
            end_after_frames: Some(4),
            ..config(DemoVariant::Ar)
        });
        assert_eq!(report.labels, vec!["Enter XR", "STOP AR", "START AR"]);
        assert_eq!(report.sessions_started, 1);
        assert_eq!(report.sessions_ended, 1);
        assert_eq!(report.frames_drawn, 4);
        assert_eq!(report.frames_cleared, 6 + TRAILING_FRAMES as u64);
    }

    #[test]
    fn unsupported_ar_never_renders() {
        let report = run(&SimConfig {
            supported: false,
            ..config(DemoVariant::Ar)
        });
        assert_eq!(report.availability, "Unsupported");
        assert!(report.labels.is_empty());
        assert_eq!(report.frames_drawn + report.frames_cleared, 0);
    }

    #[test]
    fn surface_failure_leaves_ar_idle() {
        let report = run(&SimConfig {
            fail_surface: true,
            ..config(DemoVariant::Ar)
        });
        assert_eq!(report.labels, vec!["Enter XR"]);
        assert_eq!(report.sessions_started, 1);
        assert_eq!(report.frames_drawn + report.frames_cleared, 0);
    }
}
