// Phase timing (milliseconds)
pub const DEFAULT_GREEN_DURATION_MS: u64 = 4000;
pub const DEFAULT_YELLOW_DURATION_MS: u64 = 2000;

// Environment overrides for the timing config
pub const ENV_GREEN_DURATION_MS: &str = "INTERSECTION_GREEN_MS";
pub const ENV_YELLOW_DURATION_MS: &str = "INTERSECTION_YELLOW_MS";

// Status display
pub const STATUS_PREFIX: &str = "Current Phase: ";
pub const EMERGENCY_STATUS: &str = "EMERGENCY STOP - All Red";

// Command log written by the CSV sink
pub const COMMAND_LOG_CSV: &str = "intersection_commands.csv";
