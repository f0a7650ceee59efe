//! Player slot and its running statistics.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player slot (independent of its ladder position).
pub type PlayerId = Uuid;

/// Number of month buckets tracked per player (one per month of the season).
pub const SEASON_MONTHS: usize = 5;

/// One player's share of a single match, as produced by the score tally.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PlayerOutcome {
    pub won: bool,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

/// One ladder slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Ladder rank, 1 is the top of the ladder.
    pub position: u32,
    /// Empty for a placeholder slot.
    pub name: String,
    pub matches_played: u32,
    pub matches_won: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    /// Matches played in each month of the season, first month at index 0.
    pub month_matches: [u32; SEASON_MONTHS],
}

impl Player {
    /// Create an unnamed slot at the given position with all counters at zero.
    pub fn placeholder(position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            name: String::new(),
            matches_played: 0,
            matches_won: 0,
            sets_won: 0,
            sets_lost: 0,
            games_won: 0,
            games_lost: 0,
            month_matches: [0; SEASON_MONTHS],
        }
    }

    /// Whether the slot has a display name (unnamed slots cannot play or be listed).
    pub fn is_named(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn set_differential(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn game_differential(&self) -> i64 {
        i64::from(self.games_won) - i64::from(self.games_lost)
    }

    /// Matches lost, derived from played and won.
    pub fn matches_lost(&self) -> u32 {
        self.matches_played.saturating_sub(self.matches_won)
    }

    /// Add one match's contribution to the counters. Every counter stops at `u32::MAX`.
    pub fn record_result(&mut self, outcome: &PlayerOutcome, month: Option<usize>) {
        self.matches_played = self.matches_played.saturating_add(1);
        if outcome.won {
            self.matches_won = self.matches_won.saturating_add(1);
        }
        self.sets_won = self.sets_won.saturating_add(outcome.sets_won);
        self.sets_lost = self.sets_lost.saturating_add(outcome.sets_lost);
        self.games_won = self.games_won.saturating_add(outcome.games_won);
        self.games_lost = self.games_lost.saturating_add(outcome.games_lost);
        if let Some(bucket) = month.and_then(|m| self.month_matches.get_mut(m)) {
            *bucket = bucket.saturating_add(1);
        }
    }

    /// Take one match's contribution back out. Every counter stops at zero.
    pub fn revert_result(&mut self, outcome: &PlayerOutcome, month: Option<usize>) {
        self.matches_played = self.matches_played.saturating_sub(1);
        if outcome.won {
            self.matches_won = self.matches_won.saturating_sub(1);
        }
        self.sets_won = self.sets_won.saturating_sub(outcome.sets_won);
        self.sets_lost = self.sets_lost.saturating_sub(outcome.sets_lost);
        self.games_won = self.games_won.saturating_sub(outcome.games_won);
        self.games_lost = self.games_lost.saturating_sub(outcome.games_lost);
        if let Some(bucket) = month.and_then(|m| self.month_matches.get_mut(m)) {
            *bucket = bucket.saturating_sub(1);
        }
    }
}
