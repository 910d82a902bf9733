use crate::data_structures::Direction;
use crate::shared_data::IntersectionEvent;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep, Duration};

/// Tuning for the random operator/pedestrian input generator.
#[derive(Debug, Clone, Copy)]
pub struct StimulationConfig {
    /// Upper bound of the random gap between presses.
    pub max_interval_ms: u64,
    /// Chance that a stimulus is an emergency stop instead of a button press.
    pub emergency_probability: f64,
    /// How long an emergency lasts before the operator resets.
    pub emergency_hold_ms: u64,
    /// Fixed seed for reproducible runs; random otherwise.
    pub seed: Option<u64>,
}

impl Default for StimulationConfig {
    fn default() -> Self {
        Self {
            max_interval_ms: 5000,
            emergency_probability: 0.02,
            emergency_hold_ms: 8000,
            seed: None,
        }
    }
}

/// What the generator does next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stimulus {
    Press { after: Duration, direction: Direction },
    Emergency { after: Duration, hold: Duration },
}

pub fn next_stimulus(rng: &mut SmallRng, config: &StimulationConfig) -> Stimulus {
    let after = Duration::from_millis(rng.random_range(1..=config.max_interval_ms.max(1)));
    if rng.random_bool(config.emergency_probability.clamp(0.0, 1.0)) {
        return Stimulus::Emergency {
            after,
            hold: Duration::from_millis(config.emergency_hold_ms),
        };
    }
    let direction = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
    Stimulus::Press { after, direction }
}

/// Feeds random pedestrian presses (and the odd emergency followed by a
/// reset) into the event queue until the queue closes.
pub async fn run_stimulation(events: UnboundedSender<IntersectionEvent>, config: StimulationConfig) {
    let mut rng = match config.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    loop {
        let sent = match next_stimulus(&mut rng, &config) {
            Stimulus::Press { after, direction } => {
                sleep(after).await;
                println!("Pedestrian pressed the {} crossing button", direction);
                events.send(IntersectionEvent::PedestrianButtonPressed(direction))
            }
            Stimulus::Emergency { after, hold } => {
                sleep(after).await;
                println!("Operator triggered an emergency stop");
                if events.send(IntersectionEvent::EmergencyButtonPressed).is_err() {
                    break;
                }
                sleep(hold).await;
                println!("Operator reset the intersection");
                events.send(IntersectionEvent::ResetButtonPressed)
            }
        };
        if sent.is_err() {
            log::debug!("Stimulation stopped: event queue closed");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_gives_same_stimuli() {
        let config = StimulationConfig {
            seed: Some(7),
            ..StimulationConfig::default()
        };
        let mut a = SmallRng::seed_from_u64(7);
        let mut b = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(next_stimulus(&mut a, &config), next_stimulus(&mut b, &config));
        }
    }

    #[test]
    fn zero_probability_never_raises_emergency() {
        let config = StimulationConfig {
            emergency_probability: 0.0,
            max_interval_ms: 10,
            ..StimulationConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..100 {
            match next_stimulus(&mut rng, &config) {
                Stimulus::Press { after, .. } => assert!(after <= Duration::from_millis(10)),
                Stimulus::Emergency { .. } => panic!("emergency with zero probability"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stimulation_posts_presses() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let config = StimulationConfig {
            emergency_probability: 0.0,
            seed: Some(3),
            ..StimulationConfig::default()
        };
        let task = tokio::spawn(run_stimulation(tx, config));

        let event = rx.recv().await;
        assert!(matches!(
            event,
            Some(IntersectionEvent::PedestrianButtonPressed(_))
        ));
        drop(rx);
        task.await.unwrap();
    }
}
