use intersection_controller::config::TimingConfig;
use intersection_controller::control_system::timer::TokioScheduler;
use intersection_controller::control_system::traffic_light_controller::TrafficLightController;
use intersection_controller::data_structures::Direction;
use intersection_controller::global_variables::COMMAND_LOG_CSV;
use intersection_controller::monitoring::command_log::CommandLogSink;
use intersection_controller::monitoring::console_sink::ConsoleSink;
use intersection_controller::monitoring::operator_console::run_cli;
use intersection_controller::monitoring::output_sink::FanoutSink;
use intersection_controller::shared_data::IntersectionEvent;
use intersection_controller::simulation_engine::event_loop::run_event_loop;
use intersection_controller::simulation_engine::stimulation::{run_stimulation, StimulationConfig};
use std::error::Error;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Debug, Default)]
struct Options {
    config_path: Option<PathBuf>,
    stimulate: bool,
    seed: Option<u64>,
    missing_lights: Vec<Direction>,
    command_log: Option<PathBuf>,
}

fn parse_args() -> Result<Options, Box<dyn Error>> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => options.config_path = args.next().map(PathBuf::from),
            "--stimulate" => options.stimulate = true,
            "--seed" => options.seed = args.next().map(|s| s.parse()).transpose()?,
            "--missing-light" => {
                let raw = args.next().unwrap_or_default();
                let direction = Direction::from_input(&raw)
                    .ok_or_else(|| format!("unknown direction '{}'", raw))?;
                options.missing_lights.push(direction);
            }
            "--log" => {
                options.command_log = Some(
                    args.next()
                        .map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from(COMMAND_LOG_CSV)),
                )
            }
            other => return Err(format!("unknown argument '{}'", other).into()),
        }
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let options = parse_args()?;

    let timing = match &options.config_path {
        Some(path) => TimingConfig::from_file(path)?,
        None => TimingConfig::from_env()?,
    };
    println!(
        "Starting intersection controller (green {} ms, yellow {} ms)...",
        timing.green_duration_ms, timing.yellow_duration_ms
    );

    let mut sink = FanoutSink::new().with(ConsoleSink::new().with_missing_lights(&options.missing_lights));
    if let Some(path) = &options.command_log {
        println!("Logging commands to {}", path.display());
        sink = sink.with(CommandLogSink::new(path));
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let mut controller = TrafficLightController::new(timing, sink, TokioScheduler::new(tx.clone()));

    if options.stimulate {
        let config = StimulationConfig {
            seed: options.seed,
            ..StimulationConfig::default()
        };
        tokio::spawn(run_stimulation(tx.clone(), config));
    }
    tokio::spawn(run_cli(tx.clone()));

    // Every sink above is constructed, so its targets exist.
    tx.send(IntersectionEvent::Startup)?;
    drop(tx);

    run_event_loop(&mut controller, rx).await;
    println!("Intersection controller stopped.");
    Ok(())
}
