use strum_macros::{Display, EnumString};

/// Whether the user is getting warmer or colder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    /// First reading of a session, nothing to compare against.
    Neutral,
    Approaching,
    Receding,
}

/// Colors for the temperature cue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

const WARM: Palette = Palette {
    background: "#ff6b6b",
    border: "#ff5252",
    text: "white",
};

const COOL: Palette = Palette {
    background: "#63a4ff",
    border: "#1976d2",
    text: "white",
};

impl Direction {
    /// Compares a fresh distance with the previous one. A distance that did
    /// not change counts as receding.
    pub fn derive(previous: Option<f64>, current: f64) -> Self {
        match previous {
            None => Direction::Neutral,
            Some(previous) => {
                if current - previous < 0.0 {
                    Direction::Approaching
                } else {
                    Direction::Receding
                }
            }
        }
    }

    /// `None` means the cue is reset to the default look.
    pub fn palette(&self) -> Option<Palette> {
        match self {
            Direction::Neutral => None,
            Direction::Approaching => Some(WARM),
            Direction::Receding => Some(COOL),
        }
    }
}

/// Direction signals for a whole sequence of distance readings.
pub fn derive_all(distances: &[f64]) -> Vec<Direction> {
    let mut previous = None;
    distances
        .iter()
        .map(|distance| {
            let direction = Direction::derive(previous, *distance);
            previous = Some(*distance);
            direction
        })
        .collect()
}
