//! Round adjudication
//!
//! `decide` is the one implementation of the dominance rule. Which side runs
//! it is fixed per room by `DecisionAuthority`: automated rooms adjudicate on
//! the client, human rooms trust the server's verdict and never call it.

use crate::value_objects::Gesture;

/// Result of a single round, from the local player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    PlayerWins,
    OpponentWins,
    Tie,
}

/// Rock beats scissors, scissors beats paper, paper beats rock.
pub fn decide(player: Gesture, opponent: Gesture) -> RoundOutcome {
    if player == opponent {
        RoundOutcome::Tie
    } else if player.beats() == opponent {
        RoundOutcome::PlayerWins
    } else {
        RoundOutcome::OpponentWins
    }
}

impl RoundOutcome {
    /// Headline shown on the results screen.
    pub fn headline(self, opponent_name: &str) -> String {
        match self {
            RoundOutcome::PlayerWins => "🎉 You win!".to_string(),
            RoundOutcome::OpponentWins => format!("{} wins!", opponent_name),
            RoundOutcome::Tie => "🤝 Tie".to_string(),
        }
    }
}

/// Kind of room, fixed when the session is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    /// Two remote humans paired by the server
    Human,
    /// One human against a locally simulated opponent
    Automated,
}

impl RoomKind {
    pub fn authority(self) -> DecisionAuthority {
        match self {
            RoomKind::Human => DecisionAuthority::Remote,
            RoomKind::Automated => DecisionAuthority::Local,
        }
    }
}

/// Who adjudicates rounds for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAuthority {
    /// The client runs `decide` itself
    Local,
    /// The server sends the verdict; the client only renders it
    Remote,
}

impl DecisionAuthority {
    /// Adjudicate locally. Returns `None` under remote authority so callers
    /// cannot silently second-guess the server.
    pub fn adjudicate(self, player: Gesture, opponent: Gesture) -> Option<RoundOutcome> {
        match self {
            DecisionAuthority::Local => Some(decide(player, opponent)),
            DecisionAuthority::Remote => None,
        }
    }
}
