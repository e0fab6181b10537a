//! Gesture vocabulary
//!
//! `Gesture` is one of the three playable hand shapes. `GestureLabel` is the
//! wire-level detection result, which may also be `unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// A playable hand shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
}

impl Gesture {
    /// All gestures, in a fixed order.
    pub const ALL: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    /// Wire token (`rock`, `paper`, `scissors`).
    pub fn as_str(self) -> &'static str {
        match self {
            Gesture::Rock => "rock",
            Gesture::Paper => "paper",
            Gesture::Scissors => "scissors",
        }
    }

    /// The gesture this one defeats.
    pub fn beats(self) -> Gesture {
        match self {
            Gesture::Rock => Gesture::Scissors,
            Gesture::Scissors => Gesture::Paper,
            Gesture::Paper => Gesture::Rock,
        }
    }

    /// Glyph-only rendering, used where an opponent has no capture image.
    pub fn glyph(self) -> &'static str {
        match self {
            Gesture::Rock => "🪨",
            Gesture::Paper => "📄",
            Gesture::Scissors => "✂️",
        }
    }

    /// Picks a gesture uniformly from a sample in `[0, 1)`.
    ///
    /// Out-of-range samples are clamped into the valid range.
    pub fn from_uniform(sample: f64) -> Gesture {
        let index = (sample.clamp(0.0, 0.999_999) * 3.0) as usize;
        Gesture::ALL[index.min(2)]
    }

    /// Guesses the local player's gesture from a sample in `[0, 1)`.
    ///
    /// There is no on-device recognizer, so automated rooms weight the guess:
    /// scissors 50%, rock 30%, paper 20%.
    pub fn guess_from_sample(sample: f64) -> Gesture {
        if sample < 0.5 {
            Gesture::Scissors
        } else if sample < 0.8 {
            Gesture::Rock
        } else {
            Gesture::Paper
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gesture::Rock => "Rock",
            Gesture::Paper => "Paper",
            Gesture::Scissors => "Scissors",
        };
        write!(f, "{} {}", self.glyph(), label)
    }
}

impl FromStr for Gesture {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rock" => Ok(Gesture::Rock),
            "paper" => Ok(Gesture::Paper),
            "scissors" => Ok(Gesture::Scissors),
            _ => Err(DomainError::parse(format!("Unknown gesture: {}", s))),
        }
    }
}

/// Detected gesture as reported on the wire.
///
/// Parsing never fails: any token outside the vocabulary becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureLabel {
    Detected(Gesture),
    #[default]
    Unknown,
}

impl GestureLabel {
    /// Lenient parse of a case-sensitive wire token.
    pub fn parse(token: &str) -> Self {
        token
            .parse::<Gesture>()
            .map(GestureLabel::Detected)
            .unwrap_or(GestureLabel::Unknown)
    }

    pub fn gesture(self) -> Option<Gesture> {
        match self {
            GestureLabel::Detected(g) => Some(g),
            GestureLabel::Unknown => None,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            GestureLabel::Detected(g) => g.glyph(),
            GestureLabel::Unknown => "❓",
        }
    }
}

impl From<Gesture> for GestureLabel {
    fn from(g: Gesture) -> Self {
        GestureLabel::Detected(g)
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureLabel::Detected(g) => write!(f, "{}", g),
            GestureLabel::Unknown => write!(f, "❓ Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_is_case_sensitive() {
        assert_eq!(GestureLabel::parse("rock"), GestureLabel::Detected(Gesture::Rock));
        assert_eq!(GestureLabel::parse("Rock"), GestureLabel::Unknown);
        assert_eq!(GestureLabel::parse("unknown"), GestureLabel::Unknown);
        assert_eq!(GestureLabel::parse("lizard"), GestureLabel::Unknown);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(
            GestureLabel::Detected(Gesture::Scissors).to_string(),
            "✂️ Scissors"
        );
        assert_eq!(GestureLabel::parse("spock").to_string(), "❓ Unknown");
    }

    #[test]
    fn test_from_uniform_covers_all_gestures() {
        assert_eq!(Gesture::from_uniform(0.0), Gesture::Rock);
        assert_eq!(Gesture::from_uniform(0.4), Gesture::Paper);
        assert_eq!(Gesture::from_uniform(0.9), Gesture::Scissors);
        assert_eq!(Gesture::from_uniform(1.0), Gesture::Scissors);
        assert_eq!(Gesture::from_uniform(-3.0), Gesture::Rock);
    }

    #[test]
    fn test_guess_weights() {
        assert_eq!(Gesture::guess_from_sample(0.1), Gesture::Scissors);
        assert_eq!(Gesture::guess_from_sample(0.6), Gesture::Rock);
        assert_eq!(Gesture::guess_from_sample(0.85), Gesture::Paper);
    }

    #[test]
    fn test_serde_tokens() {
        let json = serde_json::to_string(&Gesture::Paper).expect("serialize");
        assert_eq!(json, "\"paper\"");
    }
}
