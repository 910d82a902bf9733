use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::data_structures::{Direction, LightColor, PedestrianSignal};
use crate::error::SinkError;

/// Receiver of the controller's rendering commands.
///
/// Implementations report an absent target with [`SinkError::MissingTarget`];
/// the controller skips that one command and carries on with the rest.
pub trait OutputSink {
    fn set_light(&mut self, direction: Direction, color: LightColor) -> Result<(), SinkError>;

    fn set_pedestrian_signal(
        &mut self,
        direction: Direction,
        signal: PedestrianSignal,
    ) -> Result<(), SinkError>;

    fn set_status_text(&mut self, text: &str) -> Result<(), SinkError>;

    /// Blinking cue on a red light during emergency stop. Optional.
    fn set_emergency_indicator(
        &mut self,
        _direction: Direction,
        _active: bool,
    ) -> Result<(), SinkError> {
        Ok(())
    }

    /// Whether the sink's targets can be resolved yet. The controller is not
    /// started until this holds.
    fn is_ready(&self) -> bool {
        true
    }
}

/// One command as issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkCommand {
    Light(Direction, LightColor),
    PedestrianSignal(Direction, PedestrianSignal),
    StatusText(String),
    EmergencyIndicator(Direction, bool),
}

impl SinkCommand {
    pub fn target(&self) -> String {
        match self {
            SinkCommand::Light(direction, _) => format!("light-{}", direction.to_string().to_lowercase()),
            SinkCommand::PedestrianSignal(direction, _) => {
                format!("walk-{}", direction.to_string().to_lowercase())
            }
            SinkCommand::StatusText(_) => String::from("current-phase"),
            SinkCommand::EmergencyIndicator(direction, _) => {
                format!("blink-{}", direction.to_string().to_lowercase())
            }
        }
    }

    pub fn value(&self) -> String {
        match self {
            SinkCommand::Light(_, color) => color.to_string(),
            SinkCommand::PedestrianSignal(_, signal) => signal.to_string(),
            SinkCommand::StatusText(text) => text.clone(),
            SinkCommand::EmergencyIndicator(_, active) => {
                if *active { String::from("on") } else { String::from("off") }
            }
        }
    }
}

/// Test double: remembers every command and the resulting display state.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<SinkCommand>,
    lights: HashMap<Direction, LightColor>,
    signals: HashMap<Direction, PedestrianSignal>,
    indicators: HashMap<Direction, bool>,
    status: Option<String>,
    missing_lights: HashSet<Direction>,
    ready: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// Lights for these directions behave as absent targets.
    pub fn with_missing_lights(mut self, directions: &[Direction]) -> Self {
        self.missing_lights.extend(directions.iter().copied());
        self
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn light(&self, direction: Direction) -> Option<LightColor> {
        self.lights.get(&direction).copied()
    }

    /// Signals never commanded read as DONT_WALK.
    pub fn signal(&self, direction: Direction) -> PedestrianSignal {
        self.signals
            .get(&direction)
            .copied()
            .unwrap_or(PedestrianSignal::DontWalk)
    }

    pub fn indicator(&self, direction: Direction) -> bool {
        self.indicators.get(&direction).copied().unwrap_or(false)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl OutputSink for RecordingSink {
    fn set_light(&mut self, direction: Direction, color: LightColor) -> Result<(), SinkError> {
        if self.missing_lights.contains(&direction) {
            return Err(SinkError::missing_light(direction));
        }
        self.lights.insert(direction, color);
        self.commands.push(SinkCommand::Light(direction, color));
        Ok(())
    }

    fn set_pedestrian_signal(
        &mut self,
        direction: Direction,
        signal: PedestrianSignal,
    ) -> Result<(), SinkError> {
        self.signals.insert(direction, signal);
        self.commands.push(SinkCommand::PedestrianSignal(direction, signal));
        Ok(())
    }

    fn set_status_text(&mut self, text: &str) -> Result<(), SinkError> {
        self.status = Some(text.to_string());
        self.commands.push(SinkCommand::StatusText(text.to_string()));
        Ok(())
    }

    fn set_emergency_indicator(&mut self, direction: Direction, active: bool) -> Result<(), SinkError> {
        if self.missing_lights.contains(&direction) {
            return Err(SinkError::missing_light(direction));
        }
        self.indicators.insert(direction, active);
        self.commands.push(SinkCommand::EmergencyIndicator(direction, active));
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Forwards every command to each inner sink.
///
/// A failing sink does not stop the others; the first error is reported.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn OutputSink + Send>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl OutputSink + Send + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    fn each(
        &mut self,
        mut command: impl FnMut(&mut dyn OutputSink) -> Result<(), SinkError>,
    ) -> Result<(), SinkError> {
        let mut first_error = None;
        for sink in self.sinks.iter_mut() {
            let sink: &mut dyn OutputSink = sink.as_mut();
            if let Err(e) = command(sink) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl OutputSink for FanoutSink {
    fn set_light(&mut self, direction: Direction, color: LightColor) -> Result<(), SinkError> {
        self.each(|sink| sink.set_light(direction, color))
    }

    fn set_pedestrian_signal(
        &mut self,
        direction: Direction,
        signal: PedestrianSignal,
    ) -> Result<(), SinkError> {
        self.each(|sink| sink.set_pedestrian_signal(direction, signal))
    }

    fn set_status_text(&mut self, text: &str) -> Result<(), SinkError> {
        self.each(|sink| sink.set_status_text(text))
    }

    fn set_emergency_indicator(&mut self, direction: Direction, active: bool) -> Result<(), SinkError> {
        self.each(|sink| sink.set_emergency_indicator(direction, active))
    }

    fn is_ready(&self) -> bool {
        self.sinks.iter().all(|sink| sink.is_ready())
    }
}
