// src/shared_data.rs

use crate::control_system::timer::TimerHandle;
use crate::data_structures::{Direction, Phase};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything that can happen to the intersection, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectionEvent {
    /// Display targets exist; start the cycle.
    Startup,
    PedestrianButtonPressed(Direction),
    EmergencyButtonPressed,
    ResetButtonPressed,
    TimerFired(TimerHandle),
    /// Print the current snapshot.
    StatusRequested,
    Shutdown,
}

/// Point-in-time view of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionSnapshot {
    pub timestamp: u64,
    pub phase: Option<Phase>,
    pub emergency_stopped: bool,
    pub pending_requests: Vec<Direction>,
    pub pending_timer: Option<TimerHandle>,
    pub status: String,
}

/// Milliseconds since the Unix epoch.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
