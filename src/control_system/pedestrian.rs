use std::collections::BTreeSet;

use crate::data_structures::{Direction, Phase};

/// Outstanding crossing requests, one slot per direction.
///
/// Repeated presses before a grant collapse into one request. A direction
/// leaves the queue only when it is granted WALK or the queue is cleared.
#[derive(Debug, Clone, Default)]
pub struct PedestrianRequestQueue {
    pending: BTreeSet<Direction>,
}

impl PedestrianRequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the direction was already waiting.
    pub fn request(&mut self, direction: Direction) -> bool {
        self.pending.insert(direction)
    }

    /// Grants and removes every pending request whose safe window is `phase`.
    pub fn release_if_safe(&mut self, phase: Phase) -> Vec<Direction> {
        let Some(crossings) = phase.safe_crossings() else {
            return Vec::new();
        };
        crossings
            .into_iter()
            .filter(|direction| self.pending.remove(direction))
            .collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, direction: Direction) -> bool {
        self.pending.contains(&direction)
    }

    pub fn pending(&self) -> Vec<Direction> {
        self.pending.iter().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_requests_collapse() {
        let mut queue = PedestrianRequestQueue::new();
        assert!(queue.request(Direction::North));
        assert!(!queue.request(Direction::North));
        assert_eq!(queue.pending(), vec![Direction::North]);
    }

    #[test]
    fn north_south_release_only_on_east_west_green() {
        let mut queue = PedestrianRequestQueue::new();
        queue.request(Direction::North);
        queue.request(Direction::South);

        assert!(queue.release_if_safe(Phase::NsGreen).is_empty());
        assert!(queue.release_if_safe(Phase::NsYellow).is_empty());
        assert!(queue.release_if_safe(Phase::EwYellow).is_empty());
        assert_eq!(
            queue.release_if_safe(Phase::EwGreen),
            vec![Direction::North, Direction::South]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn release_leaves_other_axis_waiting() {
        let mut queue = PedestrianRequestQueue::new();
        queue.request(Direction::East);
        queue.request(Direction::North);

        assert_eq!(queue.release_if_safe(Phase::NsGreen), vec![Direction::East]);
        assert!(queue.is_pending(Direction::North));
        assert!(!queue.is_pending(Direction::East));
    }

    #[test]
    fn granted_request_is_not_granted_twice() {
        let mut queue = PedestrianRequestQueue::new();
        queue.request(Direction::West);
        assert_eq!(queue.release_if_safe(Phase::NsGreen), vec![Direction::West]);
        assert!(queue.release_if_safe(Phase::NsGreen).is_empty());
    }
}
