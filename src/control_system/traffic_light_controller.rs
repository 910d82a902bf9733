use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::TimingConfig;
use crate::control_system::pedestrian::PedestrianRequestQueue;
use crate::control_system::timer::{ManualScheduler, Scheduler, TimerHandle};
use crate::data_structures::{Direction, LightColor, PedestrianSignal, Phase};
use crate::error::SinkError;
use crate::global_variables::{EMERGENCY_STATUS, STATUS_PREFIX};
use crate::monitoring::output_sink::OutputSink;
use crate::shared_data::{current_timestamp, IntersectionEvent, IntersectionSnapshot};

/// Mutable state of the intersection.
///
/// While `emergency_stopped` holds, `pending_timer` is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    /// `None` until the first start/reset.
    pub current_phase: Option<Phase>,
    pub emergency_stopped: bool,
    pub pending_timer: Option<TimerHandle>,
}

/// Phase state machine plus the emergency/reset override for one intersection.
///
/// All mutation goes through `&mut self`, so the event loop that owns the
/// controller is its only writer.
pub struct TrafficLightController<O: OutputSink, S: Scheduler> {
    state: SystemState,
    timing: TimingConfig,
    requests: PedestrianRequestQueue,
    sink: O,
    scheduler: S,
}

impl<O: OutputSink, S: Scheduler> TrafficLightController<O, S> {
    pub fn new(timing: TimingConfig, sink: O, scheduler: S) -> Self {
        Self {
            state: SystemState::default(),
            timing,
            requests: PedestrianRequestQueue::new(),
            sink,
            scheduler,
        }
    }

    /// Begins the cycle at North/South green. Same as [`reset`](Self::reset).
    pub fn start(&mut self) {
        self.restart_cycle();
        log::info!("Traffic system started");
    }

    /// Leaves any emergency state and restarts the cycle at North/South green.
    pub fn reset(&mut self) {
        self.restart_cycle();
        log::info!("Traffic system reset");
    }

    fn restart_cycle(&mut self) {
        self.state.emergency_stopped = false;
        self.scheduler.cancel(self.state.pending_timer.take());
        self.requests.clear();

        for direction in Direction::ALL {
            skip_missing(self.sink.set_emergency_indicator(direction, false));
            skip_missing(
                self.sink
                    .set_pedestrian_signal(direction, PedestrianSignal::DontWalk),
            );
        }

        self.state.current_phase = Some(Phase::NsGreen);
        self.apply_phase_outputs(Phase::NsGreen);
        self.schedule_advance(Phase::NsGreen);
    }

    /// Moves to the next phase in the cycle and schedules the one after.
    /// Does nothing while emergency-stopped or before the first start.
    pub fn advance(&mut self) {
        if self.state.emergency_stopped {
            log::debug!("Ignoring phase advance during emergency stop");
            return;
        }
        let Some(current) = self.state.current_phase else {
            log::warn!("Ignoring phase advance before the system was started");
            return;
        };

        let next = current.next();
        self.state.current_phase = Some(next);
        log::info!("Intersection switching from {} to {}", current, next);
        self.apply_phase_outputs(next);
        self.schedule_advance(next);
    }

    /// Entry point for [`IntersectionEvent::TimerFired`]. Handles that are no
    /// longer pending were cancelled after being queued and are dropped.
    pub fn on_timer_fired(&mut self, handle: TimerHandle) {
        if self.state.pending_timer != Some(handle) {
            log::warn!(
                "Dropping stale timer {:?} (pending: {:?})",
                handle,
                self.state.pending_timer
            );
            return;
        }
        self.state.pending_timer = None;
        self.advance();
    }

    fn schedule_advance(&mut self, phase: Phase) {
        self.scheduler.cancel(self.state.pending_timer.take());
        let delay = self.timing.duration_for(phase);
        let handle = self.scheduler.schedule(delay);
        log::debug!("Scheduled timer {:?} in {:?} for {}", handle, delay, phase);
        self.state.pending_timer = Some(handle);
    }

    /// Drives every light for `phase`, clears walk signals on yellow,
    /// grants any requests the phase makes safe and updates the status.
    pub fn apply_phase_outputs(&mut self, phase: Phase) {
        if self.state.emergency_stopped {
            return;
        }

        for direction in Direction::ALL {
            skip_missing(self.sink.set_light(direction, phase.light_for(direction)));
        }

        if phase.is_yellow() {
            // The walk granted during the preceding green ends here.
            for direction in Direction::ALL {
                skip_missing(
                    self.sink
                        .set_pedestrian_signal(direction, PedestrianSignal::DontWalk),
                );
            }
        }

        self.release_pedestrians(phase);

        let text = format!("{}{}", STATUS_PREFIX, phase.label());
        skip_missing(self.sink.set_status_text(&text));
    }

    fn release_pedestrians(&mut self, phase: Phase) {
        for direction in self.requests.release_if_safe(phase) {
            log::info!("Pedestrian crossing granted for {} during {}", direction, phase);
            skip_missing(
                self.sink
                    .set_pedestrian_signal(direction, PedestrianSignal::Walk),
            );
        }
    }

    /// Queues a crossing request. A request made while its safe window is
    /// already open is granted immediately.
    pub fn request(&mut self, direction: Direction) {
        if self.state.emergency_stopped {
            log::info!("Ignoring pedestrian request for {} during emergency stop", direction);
            return;
        }
        if self.requests.request(direction) {
            log::info!("Pedestrian request queued for {}", direction);
        }
        if let Some(phase) = self.state.current_phase {
            self.release_pedestrians(phase);
        }
    }

    /// Forces all-red and halts the cycle until [`reset`](Self::reset).
    /// Calling it again re-applies the same outputs.
    pub fn emergency_stop(&mut self) {
        self.state.emergency_stopped = true;
        self.scheduler.cancel(self.state.pending_timer.take());

        for direction in Direction::ALL {
            skip_missing(self.sink.set_light(direction, LightColor::Red));
            skip_missing(self.sink.set_emergency_indicator(direction, true));
        }

        self.requests.clear();
        for direction in Direction::ALL {
            skip_missing(
                self.sink
                    .set_pedestrian_signal(direction, PedestrianSignal::DontWalk),
            );
        }

        let text = format!("{}{}", STATUS_PREFIX, EMERGENCY_STATUS);
        skip_missing(self.sink.set_status_text(&text));
        log::warn!("Emergency stop activated");
    }

    /// Starts the cycle if the sink's targets exist. Returns whether it did.
    pub fn on_startup(&mut self) -> bool {
        if !self.sink.is_ready() {
            log::warn!("Output targets not ready; waiting for another startup event");
            return false;
        }
        self.start();
        true
    }

    /// Applies one event. Returns false once the loop should stop.
    pub fn handle_event(&mut self, event: IntersectionEvent) -> bool {
        match event {
            IntersectionEvent::Startup => {
                self.on_startup();
            }
            IntersectionEvent::PedestrianButtonPressed(direction) => self.request(direction),
            IntersectionEvent::EmergencyButtonPressed => self.emergency_stop(),
            IntersectionEvent::ResetButtonPressed => self.reset(),
            IntersectionEvent::TimerFired(handle) => self.on_timer_fired(handle),
            IntersectionEvent::StatusRequested => match serde_json::to_string_pretty(&self.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => log::warn!("Failed to serialize snapshot: {}", e),
            },
            IntersectionEvent::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Cancels the pending advance, leaving the lights as they are.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel(self.state.pending_timer.take());
        log::info!("Traffic system shut down");
    }

    /// Display label for the current phase or the emergency state.
    pub fn status(&self) -> &'static str {
        if self.state.emergency_stopped {
            return EMERGENCY_STATUS;
        }
        match self.state.current_phase {
            Some(phase) => phase.label(),
            None => "Not started",
        }
    }

    pub fn snapshot(&self) -> IntersectionSnapshot {
        IntersectionSnapshot {
            timestamp: current_timestamp(),
            phase: self.state.current_phase,
            emergency_stopped: self.state.emergency_stopped,
            pending_requests: self.requests.pending(),
            pending_timer: self.state.pending_timer,
            status: self.status().to_string(),
        }
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn phase(&self) -> Option<Phase> {
        self.state.current_phase
    }

    pub fn is_emergency_stopped(&self) -> bool {
        self.state.emergency_stopped
    }

    pub fn is_request_pending(&self, direction: Direction) -> bool {
        self.requests.is_pending(direction)
    }

    pub fn timing(&self) -> TimingConfig {
        self.timing
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<O: OutputSink> TrafficLightController<O, ManualScheduler> {
    /// Fires the earliest pending timer through the normal event path.
    /// Returns the delay it represented, or `None` if nothing was pending.
    pub fn fire_next_timer(&mut self) -> Option<Duration> {
        let (handle, delay) = self.scheduler.fire_next()?;
        self.on_timer_fired(handle);
        Some(delay)
    }
}

fn skip_missing(result: Result<(), SinkError>) {
    if let Err(e) = result {
        log::warn!("Skipping output command: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::output_sink::RecordingSink;

    fn controller() -> TrafficLightController<RecordingSink, ManualScheduler> {
        TrafficLightController::new(
            TimingConfig::default(),
            RecordingSink::new(),
            ManualScheduler::new(),
        )
    }

    #[test]
    fn nothing_happens_before_start() {
        let mut ctrl = controller();
        ctrl.advance();
        assert_eq!(ctrl.phase(), None);
        assert_eq!(ctrl.status(), "Not started");
        assert!(ctrl.sink().commands.is_empty());
    }

    #[test]
    fn start_shows_north_south_green() {
        let mut ctrl = controller();
        ctrl.start();
        assert_eq!(ctrl.phase(), Some(Phase::NsGreen));
        assert_eq!(ctrl.sink().light(Direction::North), Some(LightColor::Green));
        assert_eq!(ctrl.sink().light(Direction::East), Some(LightColor::Red));
        assert_eq!(
            ctrl.sink().status(),
            Some("Current Phase: North/South Green")
        );
        assert_eq!(ctrl.scheduler().pending_count(), 1);
    }

    #[test]
    fn yellow_uses_short_interval_and_green_long() {
        let mut ctrl = controller();
        ctrl.start();
        assert_eq!(ctrl.fire_next_timer(), Some(Duration::from_millis(4000)));
        assert_eq!(ctrl.phase(), Some(Phase::NsYellow));
        assert_eq!(ctrl.fire_next_timer(), Some(Duration::from_millis(2000)));
        assert_eq!(ctrl.phase(), Some(Phase::EwGreen));
        assert_eq!(ctrl.fire_next_timer(), Some(Duration::from_millis(4000)));
        assert_eq!(ctrl.phase(), Some(Phase::EwYellow));
    }

    #[test]
    fn stale_handle_is_dropped() {
        let mut ctrl = controller();
        ctrl.start();
        let first = ctrl.state().pending_timer.unwrap();
        ctrl.reset();
        ctrl.on_timer_fired(first);
        assert_eq!(ctrl.phase(), Some(Phase::NsGreen));
        assert_eq!(ctrl.scheduler().pending_count(), 1);
    }

    #[test]
    fn startup_waits_for_ready_targets() {
        let mut sink = RecordingSink::new();
        sink.set_ready(false);
        let mut ctrl = TrafficLightController::new(TimingConfig::default(), sink, ManualScheduler::new());

        assert!(!ctrl.on_startup());
        assert_eq!(ctrl.phase(), None);

        ctrl.sink_mut().set_ready(true);
        assert!(ctrl.on_startup());
        assert_eq!(ctrl.phase(), Some(Phase::NsGreen));
    }

    #[test]
    fn shutdown_event_stops_the_loop_and_cancels_timer() {
        let mut ctrl = controller();
        assert!(ctrl.handle_event(IntersectionEvent::Startup));
        assert!(!ctrl.handle_event(IntersectionEvent::Shutdown));
        assert_eq!(ctrl.scheduler().pending_count(), 0);
    }

    #[test]
    fn snapshot_reports_pending_requests() {
        let mut ctrl = controller();
        ctrl.start();
        ctrl.request(Direction::South);
        let snapshot = ctrl.snapshot();
        assert_eq!(snapshot.phase, Some(Phase::NsGreen));
        assert_eq!(snapshot.pending_requests, vec![Direction::South]);
        assert!(snapshot.pending_timer.is_some());
        assert_eq!(snapshot.status, "North/South Green");
    }
}
