//! Data structures for the tennis ladder: player slots, match records, ladder snapshot.

mod game;
mod ladder;
mod player;

pub use game::{MatchId, MatchRecord, Role, Surface};
pub use ladder::{Ladder, LadderError, Season};
pub use player::{Player, PlayerId, PlayerOutcome, SEASON_MONTHS};
