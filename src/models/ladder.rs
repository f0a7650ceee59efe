//! Ladder snapshot: roster, match log, active count and season window.

use crate::logic::ScoreError;
use crate::models::game::{MatchId, MatchRecord};
use crate::models::player::{Player, PlayerId, SEASON_MONTHS};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Errors that can occur during ladder operations. `Display` is meant for end users.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LadderError {
    /// The score text failed to parse or is not a legal tennis result.
    InvalidScore(ScoreError),
    /// No slot with this id.
    PlayerNotFound(PlayerId),
    /// The slot has no name yet.
    UnnamedPlayer(PlayerId),
    /// The slot sits beyond the active player count.
    InactivePlayer(PlayerId),
    /// Challenger and opponent are the same slot.
    SamePlayer,
    /// Position played for is outside the active ladder.
    PositionOutOfRange { position: u32, active: u32 },
    /// No match with this id in the log.
    MatchNotFound(MatchId),
    /// Another slot already uses this name (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Active player count must lie within 1..=capacity.
    InvalidActiveCount { requested: u32, capacity: u32 },
}

impl std::fmt::Display for LadderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LadderError::InvalidScore(reason) => write!(f, "{}", reason),
            LadderError::PlayerNotFound(_) => write!(f, "Player not found"),
            LadderError::UnnamedPlayer(_) => write!(f, "That ladder slot has no player yet"),
            LadderError::InactivePlayer(_) => write!(f, "That player is not on the active ladder"),
            LadderError::SamePlayer => write!(f, "A player cannot challenge themselves"),
            LadderError::PositionOutOfRange { position, active } => {
                write!(f, "Position {} is not on the ladder (1-{})", position, active)
            }
            LadderError::MatchNotFound(_) => write!(f, "Match not found"),
            LadderError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            LadderError::InvalidActiveCount { requested, capacity } => {
                write!(f, "Active players must be between 1 and {} (got {})", capacity, requested)
            }
        }
    }
}

impl std::error::Error for LadderError {}

impl From<ScoreError> for LadderError {
    fn from(e: ScoreError) -> Self {
        LadderError::InvalidScore(e)
    }
}

/// Calendar window whose months each get a match-count bucket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Season {
    /// First month of the season, 1 = January.
    pub start_month: u32,
}

impl Default for Season {
    fn default() -> Self {
        Self { start_month: 5 }
    }
}

impl Season {
    /// Bucket index for a match date, or `None` outside the season. The year is ignored.
    pub fn bucket(&self, date: NaiveDate) -> Option<usize> {
        let offset = date.month().checked_sub(self.start_month)? as usize;
        (offset < SEASON_MONTHS).then_some(offset)
    }
}

/// Full ladder state: everything needed to resume computation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    /// Slots with a position above this are hidden but keep their data.
    pub active_player_count: u32,
    #[serde(default)]
    pub season: Season,
    /// Every slot ever created; the length is the ladder capacity.
    pub players: Vec<Player>,
    /// Match log in recording order.
    pub matches: Vec<MatchRecord>,
}

impl Ladder {
    /// Create a ladder of `capacity` unnamed slots at positions 1..=capacity.
    /// The active count is clamped into 1..=capacity.
    pub fn new(capacity: u32, active_player_count: u32) -> Self {
        let capacity = capacity.max(1);
        Self {
            active_player_count: active_player_count.clamp(1, capacity),
            season: Season::default(),
            players: (1..=capacity).map(Player::placeholder).collect(),
            matches: Vec::new(),
        }
    }

    /// Same as [`Ladder::new`] with a custom season window.
    pub fn with_season(capacity: u32, active_player_count: u32, season: Season) -> Self {
        Self {
            season,
            ..Self::new(capacity, active_player_count)
        }
    }

    pub fn capacity(&self) -> u32 {
        self.players.len() as u32
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn player_at_position(&self, position: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.position == position)
    }

    /// Whether the slot is within the active part of the ladder.
    pub fn is_active(&self, player: &Player) -> bool {
        player.position >= 1 && player.position <= self.active_player_count
    }

    pub fn find_match(&self, id: MatchId) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Rename a slot. An empty name turns it back into a placeholder.
    pub fn set_player_name(&mut self, id: PlayerId, name: impl Into<String>) -> Result<(), LadderError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if !name_trimmed.is_empty() {
            let is_duplicate = self
                .players
                .iter()
                .any(|p| p.id != id && p.name.trim().eq_ignore_ascii_case(name_trimmed));
            if is_duplicate {
                return Err(LadderError::DuplicatePlayerName);
            }
        }
        let p = self.player_mut(id).ok_or(LadderError::PlayerNotFound(id))?;
        log::info!("Slot {} renamed from {:?} to {:?}", p.position, p.name, name_trimmed);
        p.name = name_trimmed.to_string();
        Ok(())
    }

    /// Show or hide the higher-numbered slots. Hidden slots keep all their data.
    pub fn set_active_player_count(&mut self, count: u32) -> Result<(), LadderError> {
        let capacity = self.capacity();
        if count == 0 || count > capacity {
            return Err(LadderError::InvalidActiveCount {
                requested: count,
                capacity,
            });
        }
        log::info!("Active player count {} -> {}", self.active_player_count, count);
        self.active_player_count = count;
        Ok(())
    }
}
