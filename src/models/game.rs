//! Logged match record, the two roles in a challenge, and court surface.

use crate::models::player::PlayerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for a match record.
pub type MatchId = uuid::Uuid;

/// Which side of a challenge won the match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Challenger,
    Opponent,
}

/// Court surface. Informational only.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Hard,
    Clay,
    Grass,
    Carpet,
    Indoor,
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Surface::Hard => "hard",
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Carpet => "carpet",
            Surface::Indoor => "indoor",
        };
        f.write_str(label)
    }
}

/// A completed, logged match.
///
/// The start positions are the participants' positions when the match was recorded.
/// They never change afterwards: reversing a ladder move must use them, not the
/// current positions, because later matches may have shifted everyone again.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub date: NaiveDate,
    pub challenger: PlayerId,
    pub opponent: PlayerId,
    pub challenger_start_position: u32,
    pub opponent_start_position: u32,
    pub winner: Role,
    /// Score text exactly as validated, winner's games first.
    pub score: String,
    pub surface: Surface,
    /// Whether this match moved the challenger up the ladder.
    pub ladder_move_applied: bool,
}

impl MatchRecord {
    /// Whether the given player took part in this match.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.challenger == player || self.opponent == player
    }
}
