use serde::{Deserialize, Serialize};
use std::fmt;

/// One approach of the four-way intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// The axis this approach belongs to.
    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::NorthSouth,
            Direction::East | Direction::West => Axis::EastWest,
        }
    }

    /// Parses an operator shorthand such as "n" or "north".
    pub fn from_input(input: &str) -> Option<Direction> {
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::South => "South",
            Direction::East => "East",
            Direction::West => "West",
        };
        f.write_str(name)
    }
}

/// A pair of opposing approaches that always share a light color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    NorthSouth,
    EastWest,
}

impl Axis {
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::NorthSouth => [Direction::North, Direction::South],
            Axis::EastWest => [Direction::East, Direction::West],
        }
    }

    pub fn cross(self) -> Axis {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }
}

/// The possible states for a vehicle signal head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightColor {
    Green,
    Yellow,
    Red,
}

impl fmt::Display for LightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightColor::Green => "Green",
            LightColor::Yellow => "Yellow",
            LightColor::Red => "Red",
        };
        f.write_str(name)
    }
}

/// The two states of a pedestrian crossing signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PedestrianSignal {
    Walk,
    DontWalk,
}

impl fmt::Display for PedestrianSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PedestrianSignal::Walk => f.write_str("Walk"),
            PedestrianSignal::DontWalk => f.write_str("Don't Walk"),
        }
    }
}

/// One of the four recurring signal phases.
///
/// Cycle order is `NsGreen -> NsYellow -> EwGreen -> EwYellow -> NsGreen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NsGreen,
    NsYellow,
    EwGreen,
    EwYellow,
}

impl Phase {
    pub const CYCLE: [Phase; 4] = [Phase::NsGreen, Phase::NsYellow, Phase::EwGreen, Phase::EwYellow];

    pub fn next(self) -> Phase {
        match self {
            Phase::NsGreen => Phase::NsYellow,
            Phase::NsYellow => Phase::EwGreen,
            Phase::EwGreen => Phase::EwYellow,
            Phase::EwYellow => Phase::NsGreen,
        }
    }

    /// The axis that is not red during this phase.
    pub fn active_axis(self) -> Axis {
        match self {
            Phase::NsGreen | Phase::NsYellow => Axis::NorthSouth,
            Phase::EwGreen | Phase::EwYellow => Axis::EastWest,
        }
    }

    pub fn is_yellow(self) -> bool {
        matches!(self, Phase::NsYellow | Phase::EwYellow)
    }

    /// Light color shown to `direction` while this phase is active.
    pub fn light_for(self, direction: Direction) -> LightColor {
        if direction.axis() != self.active_axis() {
            return LightColor::Red;
        }
        if self.is_yellow() {
            LightColor::Yellow
        } else {
            LightColor::Green
        }
    }

    /// Directions whose pedestrians may be granted WALK on entering this phase.
    /// Only green phases open a window, and only for the cross axis.
    pub fn safe_crossings(self) -> Option<[Direction; 2]> {
        if self.is_yellow() {
            None
        } else {
            Some(self.active_axis().cross().directions())
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::NsGreen => "North/South Green",
            Phase::NsYellow => "North/South Yellow",
            Phase::EwGreen => "East/West Green",
            Phase::EwYellow => "East/West Yellow",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_axis_is_non_red_in_every_phase() {
        for phase in Phase::CYCLE {
            let ns_red = Axis::NorthSouth
                .directions()
                .iter()
                .all(|d| phase.light_for(*d) == LightColor::Red);
            let ew_red = Axis::EastWest
                .directions()
                .iter()
                .all(|d| phase.light_for(*d) == LightColor::Red);
            assert!(ns_red ^ ew_red, "phase {:?} broke mutual exclusion", phase);
        }
    }

    #[test]
    fn next_follows_cycle_order() {
        for (i, phase) in Phase::CYCLE.iter().enumerate() {
            assert_eq!(phase.next(), Phase::CYCLE[(i + 1) % 4]);
        }
    }

    #[test]
    fn axis_pairs_share_color() {
        for phase in Phase::CYCLE {
            assert_eq!(phase.light_for(Direction::North), phase.light_for(Direction::South));
            assert_eq!(phase.light_for(Direction::East), phase.light_for(Direction::West));
        }
    }

    #[test]
    fn safe_crossings_are_the_cross_axis_of_green_phases() {
        assert_eq!(
            Phase::NsGreen.safe_crossings(),
            Some([Direction::East, Direction::West])
        );
        assert_eq!(
            Phase::EwGreen.safe_crossings(),
            Some([Direction::North, Direction::South])
        );
        assert_eq!(Phase::NsYellow.safe_crossings(), None);
        assert_eq!(Phase::EwYellow.safe_crossings(), None);
    }

    #[test]
    fn direction_parses_operator_shorthand() {
        assert_eq!(Direction::from_input("n"), Some(Direction::North));
        assert_eq!(Direction::from_input(" West "), Some(Direction::West));
        assert_eq!(Direction::from_input("up"), None);
    }
}
