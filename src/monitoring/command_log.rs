use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data_structures::{Direction, LightColor, PedestrianSignal};
use crate::error::SinkError;
use crate::monitoring::output_sink::{OutputSink, SinkCommand};
use crate::shared_data::current_timestamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub timestamp: u64,
    pub target: String,
    pub value: String,
}

/// Appends every command to a CSV file.
#[derive(Debug, Clone)]
pub struct CommandLogSink {
    path: PathBuf,
}

impl CommandLogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, command: SinkCommand) -> Result<(), SinkError> {
        let record = CommandRecord {
            timestamp: current_timestamp(),
            target: command.target(),
            value: command.value(),
        };
        log_to_csv(&self.path, &record)
    }
}

fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<(), SinkError> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

/// Reads back every record written by a [`CommandLogSink`].
pub fn read_command_log(path: &Path) -> Result<Vec<CommandRecord>, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: CommandRecord = result?;
        records.push(record);
    }
    Ok(records)
}

impl OutputSink for CommandLogSink {
    fn set_light(&mut self, direction: Direction, color: LightColor) -> Result<(), SinkError> {
        self.append(SinkCommand::Light(direction, color))
    }

    fn set_pedestrian_signal(
        &mut self,
        direction: Direction,
        signal: PedestrianSignal,
    ) -> Result<(), SinkError> {
        self.append(SinkCommand::PedestrianSignal(direction, signal))
    }

    fn set_status_text(&mut self, text: &str) -> Result<(), SinkError> {
        self.append(SinkCommand::StatusText(text.to_string()))
    }

    fn set_emergency_indicator(&mut self, direction: Direction, active: bool) -> Result<(), SinkError> {
        self.append(SinkCommand::EmergencyIndicator(direction, active))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_round_trip_through_the_csv_log() {
        let path = std::env::temp_dir().join(format!(
            "intersection_commands_{}_{}.csv",
            std::process::id(),
            current_timestamp()
        ));
        let mut sink = CommandLogSink::new(&path);
        sink.set_light(Direction::North, LightColor::Green).unwrap();
        sink.set_status_text("Current Phase: North/South Green").unwrap();

        let records = read_command_log(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target, "light-north");
        assert_eq!(records[0].value, "Green");
        assert_eq!(records[1].target, "current-phase");
        assert_eq!(records[1].value, "Current Phase: North/South Green");
    }
}
