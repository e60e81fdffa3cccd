//! Control loop: poll sensors, redraw on change, tear the panel down on exit

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::panel::PanelController;
use crate::refresh::{RefreshController, RefreshError, RefreshState};
use crate::sensors::{ReadingSource, Readings};
use crate::status::StatusRenderer;

/// Granularity of the interruptible sleep between cycles
const SHUTDOWN_POLL: Duration = Duration::from_millis(100);

/// Owns the refresh controller and leaves the panel cleared and asleep when dropped
///
/// Teardown runs on every exit path, a failing step is logged and the next
/// one is still attempted.
pub struct PanelSession<P: PanelController> {
    controller: RefreshController<P>,
    clear_fill: u8,
}

impl<P: PanelController> PanelSession<P> {
    pub fn new(controller: RefreshController<P>, clear_fill: u8) -> Self {
        PanelSession {
            controller,
            clear_fill,
        }
    }

    pub fn controller(&self) -> &RefreshController<P> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RefreshController<P> {
        &mut self.controller
    }
}

impl<P: PanelController> Drop for PanelSession<P> {
    fn drop(&mut self) {
        if self.controller.state() == RefreshState::Uninitialized {
            log::info!("Panel was never initialized, skipping teardown");
            return;
        }

        log::info!("Clearing panel and entering deep sleep");
        if let Err(e) = self.controller.clear(self.clear_fill) {
            log::error!("Failed to clear panel on shutdown: {}", e);
        }
        if let Err(e) = self.controller.sleep() {
            log::error!("Failed to put panel to sleep on shutdown: {}", e);
        }
    }
}

/// The status panel application
pub struct App<P: PanelController, S> {
    session: PanelSession<P>,
    sensors: S,
    renderer: StatusRenderer,
    interval: Duration,
    last: Option<Readings>,
}

impl<P, S> App<P, S>
where
    P: PanelController,
    S: ReadingSource,
{
    pub fn new(
        session: PanelSession<P>,
        sensors: S,
        renderer: StatusRenderer,
        interval: Duration,
    ) -> Self {
        App {
            session,
            sensors,
            renderer,
            interval,
            last: None,
        }
    }

    pub fn session(&self) -> &PanelSession<P> {
        &self.session
    }

    /// Readings currently on the panel
    pub fn last_readings(&self) -> Option<&Readings> {
        self.last.as_ref()
    }

    /// Full init and first frame, which becomes the partial refresh base
    pub fn start(&mut self) -> Result<(), RefreshError<P::Error>> {
        let controller = self.session.controller_mut();
        controller.init_full()?;

        let readings = self.sensors.read();
        let image = self.renderer.render(&readings, &controller.geometry());
        controller.commit_base(image)?;

        log::info!("Base frame shown: {}", readings);
        self.last = Some(readings);
        Ok(())
    }

    /// One polling cycle. Returns whether the panel was refreshed.
    pub fn tick(&mut self) -> Result<bool, RefreshError<P::Error>> {
        let readings = self.sensors.read();

        let changed = self
            .last
            .as_ref()
            .map_or(true, |last| readings.changed_since(last));
        if !changed {
            log::debug!("No change, skipping refresh");
            return Ok(false);
        }

        let controller = self.session.controller_mut();
        let image = self.renderer.render(&readings, &controller.geometry());
        controller.display_partial(image)?;

        log::info!("Partial refresh: {}", readings);
        self.last = Some(readings);
        Ok(true)
    }

    /// Start, then poll every interval until `shutdown` is set
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<(), RefreshError<P::Error>> {
        self.start()?;

        while !shutdown.load(Ordering::SeqCst) {
            if !sleep_unless(shutdown, self.interval) {
                break;
            }
            self.tick()?;
        }

        log::info!("Shutdown requested, leaving control loop");
        Ok(())
    }
}

/// Sleep for `duration` in short slices. Returns false if `shutdown` got set.
fn sleep_unless(shutdown: &AtomicBool, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(SHUTDOWN_POLL.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;
    use crate::refresh::tests::{Call, FakePanel};
    use crate::sensors::sample;
    use crate::status::font_by_name;
    use std::collections::VecDeque;

    /// Hands out queued readings, repeating the last one when empty
    struct Scripted {
        queue: VecDeque<Readings>,
        last: Readings,
        reads: usize,
    }

    impl Scripted {
        fn new(readings: Vec<Readings>) -> Self {
            Scripted {
                queue: readings.into(),
                last: sample(),
                reads: 0,
            }
        }
    }

    impl ReadingSource for Scripted {
        fn read(&mut self) -> Readings {
            self.reads += 1;
            if let Some(next) = self.queue.pop_front() {
                self.last = next;
            }
            self.last.clone()
        }
    }

    fn app(
        panel: &mut FakePanel,
        readings: Vec<Readings>,
    ) -> App<&mut FakePanel, Scripted> {
        let controller = RefreshController::new(panel, Orientation::Portrait);
        App::new(
            PanelSession::new(controller, 0xFF),
            Scripted::new(readings),
            StatusRenderer::new(font_by_name("7x13-bold").unwrap()),
            Duration::from_millis(1),
        )
    }

    fn kinds(calls: &[Call]) -> Vec<&'static str> {
        calls
            .iter()
            .map(|c| match c {
                Call::Init => "init",
                Call::Clear(_) => "clear",
                Call::Full(_) => "full",
                Call::Base(_) => "base",
                Call::Partial(_) => "partial",
                Call::Sleep => "sleep",
            })
            .collect()
    }

    #[test]
    fn start_commits_base_and_drop_tears_down() {
        let mut panel = FakePanel::default();
        {
            let mut app = app(&mut panel, vec![sample()]);
            app.start().unwrap();
            assert_eq!(
                app.session().controller().state(),
                RefreshState::BaseEstablished
            );
            assert_eq!(app.last_readings(), Some(&sample()));
        }
        assert_eq!(kinds(&panel.calls), ["init", "base", "clear", "sleep"]);
        assert_eq!(panel.calls[2], Call::Clear(0xFF));
    }

    #[test]
    fn unchanged_readings_skip_refresh() {
        let later = Readings {
            timestamp: "2026-10-17 09:59".to_string(),
            ..sample()
        };
        let mut panel = FakePanel::default();
        {
            let mut app = app(&mut panel, vec![sample(), later]);
            app.start().unwrap();
            assert!(!app.tick().unwrap());
            // time alone does not update what we remember as shown
            assert_eq!(app.last_readings().unwrap().timestamp, "2026-10-17 09:41");
        }
        assert_eq!(kinds(&panel.calls), ["init", "base", "clear", "sleep"]);
    }

    #[test]
    fn changed_readings_refresh_partially() {
        let busier = Readings {
            cpu: 80.0,
            ..sample()
        };
        let mut panel = FakePanel::default();
        {
            let mut app = app(&mut panel, vec![sample(), busier.clone()]);
            app.start().unwrap();
            assert!(app.tick().unwrap());
            assert!(!app.tick().unwrap());
            assert_eq!(app.last_readings(), Some(&busier));
        }
        assert_eq!(
            kinds(&panel.calls),
            ["init", "base", "partial", "clear", "sleep"]
        );
        let (Call::Base(base), Call::Partial(partial)) = (&panel.calls[1], &panel.calls[2]) else {
            panic!("unexpected calls {:?}", panel.calls);
        };
        assert_eq!(base.len(), 4000);
        assert_ne!(base, partial);
    }

    #[test]
    fn failed_init_skips_teardown() {
        let mut panel = FakePanel {
            fail_init: true,
            ..FakePanel::default()
        };
        {
            let mut app = app(&mut panel, vec![]);
            assert!(matches!(app.start(), Err(RefreshError::Panel("no panel"))));
        }
        assert!(panel.calls.is_empty());
    }

    #[test]
    fn panel_failure_mid_loop_still_tears_down() {
        let busier = Readings {
            cpu: 80.0,
            ..sample()
        };
        let mut panel = FakePanel {
            fail_partial: true,
            ..FakePanel::default()
        };
        {
            let mut app = app(&mut panel, vec![sample(), busier]);
            app.start().unwrap();
            assert!(matches!(
                app.tick(),
                Err(RefreshError::Panel("busy timeout"))
            ));
            // what is shown did not change
            assert_eq!(app.last_readings(), Some(&sample()));
        }
        assert_eq!(kinds(&panel.calls), ["init", "base", "clear", "sleep"]);
        assert_eq!(panel.calls[2], Call::Clear(0xFF));
    }

    #[test]
    fn run_propagates_panel_failure_and_tears_down() {
        let shutdown = AtomicBool::new(false);
        let mut panel = FakePanel {
            fail_partial: true,
            ..FakePanel::default()
        };
        {
            let busier = Readings {
                ram: 90.0,
                ..sample()
            };
            let mut app = app(&mut panel, vec![sample(), busier]);
            assert!(app.run(&shutdown).is_err());
        }
        assert_eq!(kinds(&panel.calls), ["init", "base", "clear", "sleep"]);
    }

    #[test]
    fn run_exits_when_shutdown_already_requested() {
        let shutdown = AtomicBool::new(true);
        let mut panel = FakePanel::default();
        {
            let mut app = app(&mut panel, vec![sample()]);
            app.run(&shutdown).unwrap();
            assert_eq!(app.sensors.reads, 1);
        }
        assert_eq!(kinds(&panel.calls), ["init", "base", "clear", "sleep"]);
    }

    #[test]
    fn interruptible_sleep() {
        let shutdown = AtomicBool::new(false);
        assert!(sleep_unless(&shutdown, Duration::from_millis(5)));
        shutdown.store(true, Ordering::SeqCst);
        let started = Instant::now();
        assert!(!sleep_unless(&shutdown, Duration::from_secs(60)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
