//! Rebuild every player's counters from the match log and compare with what is stored.

use crate::logic::score::check_score;
use crate::logic::transactions::outcomes;
use crate::models::{Ladder, MatchId, Player, PlayerId, SEASON_MONTHS};
use serde::Serialize;
use std::collections::HashMap;

/// Something in a ladder that does not add up.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discrepancy {
    /// A logged match whose score no longer validates; it contributes nothing.
    CorruptScore { match_id: MatchId, score: String },
    /// A logged match naming a slot that does not exist.
    UnknownPlayer { match_id: MatchId, player_id: PlayerId },
    /// A stored counter that differs from the log.
    Counter {
        player_id: PlayerId,
        counter: &'static str,
        stored: u32,
        expected: u32,
    },
    /// Two slots on the same position.
    SharedPosition { position: u32 },
}

impl std::fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discrepancy::CorruptScore { match_id, score } => {
                write!(f, "match {} has unreadable score {:?}", match_id, score)
            }
            Discrepancy::UnknownPlayer { match_id, player_id } => {
                write!(f, "match {} refers to unknown player {}", match_id, player_id)
            }
            Discrepancy::Counter {
                player_id,
                counter,
                stored,
                expected,
            } => write!(
                f,
                "player {}: {} is {} but the match log gives {}",
                player_id, counter, stored, expected
            ),
            Discrepancy::SharedPosition { position } => {
                write!(f, "more than one player at position {}", position)
            }
        }
    }
}

fn counters(p: &Player) -> [(&'static str, u32); 6 + SEASON_MONTHS] {
    [
        ("matches_played", p.matches_played),
        ("matches_won", p.matches_won),
        ("sets_won", p.sets_won),
        ("sets_lost", p.sets_lost),
        ("games_won", p.games_won),
        ("games_lost", p.games_lost),
        ("month_1", p.month_matches[0]),
        ("month_2", p.month_matches[1]),
        ("month_3", p.month_matches[2]),
        ("month_4", p.month_matches[3]),
        ("month_5", p.month_matches[4]),
    ]
}

/// Check that every counter matches the sum of the match log and that no two slots share
/// a position. An empty result means the ladder is consistent.
pub fn audit(ladder: &Ladder) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    let mut expected: HashMap<PlayerId, Player> = ladder
        .players
        .iter()
        .map(|p| (p.id, Player::placeholder(p.position)))
        .collect();

    for m in &ladder.matches {
        let sets = match check_score(&m.score) {
            Ok(sets) => sets,
            Err(_) => {
                found.push(Discrepancy::CorruptScore {
                    match_id: m.id,
                    score: m.score.clone(),
                });
                continue;
            }
        };
        let month = ladder.season.bucket(m.date);
        let (challenger, opponent) = outcomes(&sets, m.winner);
        for (id, outcome) in [(m.challenger, challenger), (m.opponent, opponent)] {
            match expected.get_mut(&id) {
                Some(p) => p.record_result(&outcome, month),
                None => found.push(Discrepancy::UnknownPlayer {
                    match_id: m.id,
                    player_id: id,
                }),
            }
        }
    }

    for p in &ladder.players {
        let Some(rebuilt) = expected.get(&p.id) else {
            continue;
        };
        for ((counter, stored), (_, want)) in counters(p).into_iter().zip(counters(rebuilt)) {
            if stored != want {
                found.push(Discrepancy::Counter {
                    player_id: p.id,
                    counter,
                    stored,
                    expected: want,
                });
            }
        }
    }

    let mut positions: Vec<u32> = ladder.players.iter().map(|p| p.position).collect();
    positions.sort_unstable();
    for pair in positions.windows(2) {
        if pair[0] == pair[1] {
            found.push(Discrepancy::SharedPosition { position: pair[0] });
        }
    }
    found.dedup();
    found
}
