use std::collections::HashSet;

use crate::data_structures::{Direction, LightColor, PedestrianSignal};
use crate::error::SinkError;
use crate::monitoring::output_sink::{OutputSink, SinkCommand};

/// Renders commands as console lines, e.g. `[Light] North -> Green`.
///
/// Lights can be marked missing to mimic a display whose signal head
/// failed to load.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    missing_lights: HashSet<Direction>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_lights(mut self, directions: &[Direction]) -> Self {
        self.missing_lights.extend(directions.iter().copied());
        self
    }

    fn print(&self, command: &SinkCommand) {
        let tag = match command {
            SinkCommand::Light(..) => "Light",
            SinkCommand::PedestrianSignal(..) => "Walk",
            SinkCommand::StatusText(_) => "Status",
            SinkCommand::EmergencyIndicator(..) => "Blink",
        };
        match command {
            SinkCommand::Light(direction, _)
            | SinkCommand::PedestrianSignal(direction, _)
            | SinkCommand::EmergencyIndicator(direction, _) => {
                println!("[{}] {} -> {}", tag, direction, command.value())
            }
            SinkCommand::StatusText(text) => println!("[{}] {}", tag, text),
        }
    }
}

impl OutputSink for ConsoleSink {
    fn set_light(&mut self, direction: Direction, color: LightColor) -> Result<(), SinkError> {
        if self.missing_lights.contains(&direction) {
            return Err(SinkError::missing_light(direction));
        }
        self.print(&SinkCommand::Light(direction, color));
        Ok(())
    }

    fn set_pedestrian_signal(
        &mut self,
        direction: Direction,
        signal: PedestrianSignal,
    ) -> Result<(), SinkError> {
        self.print(&SinkCommand::PedestrianSignal(direction, signal));
        Ok(())
    }

    fn set_status_text(&mut self, text: &str) -> Result<(), SinkError> {
        self.print(&SinkCommand::StatusText(text.to_string()));
        Ok(())
    }

    fn set_emergency_indicator(&mut self, direction: Direction, active: bool) -> Result<(), SinkError> {
        if self.missing_lights.contains(&direction) {
            return Err(SinkError::missing_light(direction));
        }
        self.print(&SinkCommand::EmergencyIndicator(direction, active));
        Ok(())
    }
}
