use crate::data_structures::Direction;
use crate::shared_data::IntersectionEvent;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedSender;

/// Maps one console line to an event. `None` for anything unrecognised.
pub fn parse_command(line: &str) -> Option<IntersectionEvent> {
    let command = line.trim().to_ascii_lowercase();
    if let Some(direction) = Direction::from_input(&command) {
        return Some(IntersectionEvent::PedestrianButtonPressed(direction));
    }
    match command.as_str() {
        "stop" | "emergency" => Some(IntersectionEvent::EmergencyButtonPressed),
        "reset" => Some(IntersectionEvent::ResetButtonPressed),
        "status" => Some(IntersectionEvent::StatusRequested),
        "quit" | "exit" => Some(IntersectionEvent::Shutdown),
        _ => None,
    }
}

pub fn print_help() {
    println!("\nIntersection Operator Console");
    println!("n / s / e / w  Press the pedestrian button for that direction");
    println!("stop           Emergency stop (all red)");
    println!("reset          Reset the cycle to North/South green");
    println!("status         Show the controller snapshot");
    println!("quit           Exit");
}

/// Reads operator commands from stdin until `quit` or end of input.
pub async fn run_cli(events: UnboundedSender<IntersectionEvent>) {
    print_help();
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                let _ = events.send(IntersectionEvent::Shutdown);
                break;
            }
            Err(e) => {
                eprintln!("Error reading operator input: {}", e);
                let _ = events.send(IntersectionEvent::Shutdown);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(event) => {
                let quit = event == IntersectionEvent::Shutdown;
                if events.send(event).is_err() || quit {
                    break;
                }
            }
            None => {
                println!("Invalid command '{}'. Try again.", line.trim());
                print_help();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_direction_and_control_commands() {
        assert_eq!(
            parse_command("E"),
            Some(IntersectionEvent::PedestrianButtonPressed(Direction::East))
        );
        assert_eq!(parse_command(" stop "), Some(IntersectionEvent::EmergencyButtonPressed));
        assert_eq!(parse_command("reset"), Some(IntersectionEvent::ResetButtonPressed));
        assert_eq!(parse_command("quit"), Some(IntersectionEvent::Shutdown));
        assert_eq!(parse_command("status"), Some(IntersectionEvent::StatusRequested));
        assert_eq!(parse_command("honk"), None);
    }
}
