//! Match transactions: add, delete and edit a logged match.
//!
//! Each operation takes the current ladder by reference and returns the next one, so a
//! failed transaction leaves the caller's ladder exactly as it was. Statistics and ladder
//! moves are always applied or reversed together.

use crate::logic::positions::{apply_move, reverse_move};
use crate::logic::score::{check_score, check_winner_score, tally, SetScore, Side};
use crate::models::{
    Ladder, LadderError, MatchId, MatchRecord, PlayerId, PlayerOutcome, Role, Surface,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A new result as entered: who challenged which position, and how it went.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub date: NaiveDate,
    /// Ladder position played for; its current holder is the opponent.
    pub position: u32,
    pub challenger: PlayerId,
    pub winner: Role,
    #[serde(default)]
    pub surface: Surface,
    /// Winner's games first, e.g. `6-4 3-6 10-7`.
    pub score: String,
}

impl MatchEntry {
    fn details(&self) -> MatchEdit {
        MatchEdit {
            date: self.date,
            winner: self.winner,
            surface: self.surface,
            score: self.score.clone(),
        }
    }
}

/// Replacement fields for an existing match. Participants never change on edit.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchEdit {
    pub date: NaiveDate,
    pub winner: Role,
    #[serde(default)]
    pub surface: Surface,
    pub score: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Direction {
    Apply,
    Revert,
}

/// Record a new match. See [`add_match_with_id`].
pub fn add_match(ladder: &Ladder, entry: &MatchEntry) -> Result<Ladder, LadderError> {
    add_match_with_id(ladder, entry).map(|(next, _)| next)
}

/// Record a new match and return the next ladder along with the new match id.
///
/// 1. Resolve the opponent as the current holder of `entry.position`.
/// 2. Check both players (known, named, active, distinct) and the score, which must be
///    written winner first.
/// 3. Freeze both start positions; move the challenger up if they won from below.
/// 4. Add the result to both players' counters and append the record.
pub fn add_match_with_id(
    ladder: &Ladder,
    entry: &MatchEntry,
) -> Result<(Ladder, MatchId), LadderError> {
    let out_of_range = LadderError::PositionOutOfRange {
        position: entry.position,
        active: ladder.active_player_count,
    };
    if entry.position == 0 || entry.position > ladder.active_player_count {
        return Err(out_of_range);
    }
    let opponent = ladder
        .player_at_position(entry.position)
        .ok_or(out_of_range)?
        .id;
    check_participants(ladder, entry.challenger, opponent)?;
    let sets = check_winner_score(&entry.score)?;

    let mut next = ladder.clone();
    let id = Uuid::new_v4();
    let record = record_match(&mut next, id, entry.challenger, opponent, &entry.details(), &sets)?;
    log::debug!(
        "Match {} added: {} (pos {}) vs {} (pos {}), {:?} won {}",
        record.id,
        record.challenger,
        record.challenger_start_position,
        record.opponent,
        record.opponent_start_position,
        record.winner,
        record.score
    );
    next.matches.push(record);
    Ok((next, id))
}

/// Remove a match and take back everything it did.
///
/// If the stored score no longer validates, the statistics are left as they are (with a
/// warning) but the record is still removed and any ladder move is still reversed.
pub fn delete_match(ladder: &Ladder, match_id: MatchId) -> Result<Ladder, LadderError> {
    let idx = ladder
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(LadderError::MatchNotFound(match_id))?;
    let mut next = ladder.clone();
    let record = next.matches.remove(idx);
    reverse_effects(&mut next, &record);
    log::debug!("Match {} deleted", match_id);
    Ok(next)
}

/// Replace a match's date, winner, surface and score.
///
/// The original match is reversed first, then the edited one is recorded again under the
/// same id and log slot with start positions taken from the reversed ladder, so the
/// ladder move is decided afresh.
pub fn edit_match(ladder: &Ladder, match_id: MatchId, edit: &MatchEdit) -> Result<Ladder, LadderError> {
    let idx = ladder
        .matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(LadderError::MatchNotFound(match_id))?;
    let sets = check_winner_score(&edit.score)?;
    let original = &ladder.matches[idx];

    let mut next = ladder.clone();
    reverse_effects(&mut next, original);
    check_participants(&next, original.challenger, original.opponent)?;
    let record = record_match(
        &mut next,
        original.id,
        original.challenger,
        original.opponent,
        edit,
        &sets,
    )?;
    log::debug!(
        "Match {} edited: {:?} won {} (move {} -> {})",
        match_id,
        record.winner,
        record.score,
        original.ladder_move_applied,
        record.ladder_move_applied
    );
    next.matches[idx] = record;
    Ok(next)
}

fn check_participants(
    ladder: &Ladder,
    challenger_id: PlayerId,
    opponent_id: PlayerId,
) -> Result<(), LadderError> {
    let challenger = ladder
        .player(challenger_id)
        .ok_or(LadderError::PlayerNotFound(challenger_id))?;
    let opponent = ladder
        .player(opponent_id)
        .ok_or(LadderError::PlayerNotFound(opponent_id))?;
    if challenger.id == opponent.id {
        return Err(LadderError::SamePlayer);
    }
    for p in [challenger, opponent] {
        if !p.is_named() {
            return Err(LadderError::UnnamedPlayer(p.id));
        }
        if !ladder.is_active(p) {
            return Err(LadderError::InactivePlayer(p.id));
        }
    }
    Ok(())
}

/// Apply a checked result to `ladder` and build its record. Start positions are read
/// from `ladder` as it stands.
fn record_match(
    ladder: &mut Ladder,
    id: MatchId,
    challenger_id: PlayerId,
    opponent_id: PlayerId,
    details: &MatchEdit,
    sets: &[SetScore],
) -> Result<MatchRecord, LadderError> {
    let challenger_start_position = ladder
        .player(challenger_id)
        .ok_or(LadderError::PlayerNotFound(challenger_id))?
        .position;
    let opponent_start_position = ladder
        .player(opponent_id)
        .ok_or(LadderError::PlayerNotFound(opponent_id))?
        .position;

    let is_upset =
        details.winner == Role::Challenger && challenger_start_position > opponent_start_position;
    let ladder_move_applied = if is_upset {
        apply_move(&mut ladder.players, challenger_id, opponent_start_position)?
    } else {
        false
    };

    let record = MatchRecord {
        id,
        date: details.date,
        challenger: challenger_id,
        opponent: opponent_id,
        challenger_start_position,
        opponent_start_position,
        winner: details.winner,
        score: details.score.clone(),
        surface: details.surface,
        ladder_move_applied,
    };
    update_stats(ladder, &record, sets, Direction::Apply);
    Ok(record)
}

/// Undo a record's statistics and ladder move. The record itself is not touched.
fn reverse_effects(ladder: &mut Ladder, record: &MatchRecord) {
    match check_score(&record.score) {
        Ok(sets) => update_stats(ladder, record, &sets, Direction::Revert),
        Err(e) => log::warn!(
            "Match {} has an unreadable stored score {:?} ({}); player statistics not reversed",
            record.id,
            record.score,
            e
        ),
    }
    if record.ladder_move_applied {
        if let Err(e) = reverse_move(
            &mut ladder.players,
            record.challenger,
            record.challenger_start_position,
            record.opponent_start_position,
        ) {
            log::warn!("Match {}: ladder move not reversed: {}", record.id, e);
        }
    }
}

/// Challenger's and opponent's share of a result. Side A of the score is the winner.
pub(crate) fn outcomes(sets: &[SetScore], winner: Role) -> (PlayerOutcome, PlayerOutcome) {
    let t = tally(sets);
    let won = t.for_side(Side::A, true);
    let lost = t.for_side(Side::B, false);
    match winner {
        Role::Challenger => (won, lost),
        Role::Opponent => (lost, won),
    }
}

fn update_stats(ladder: &mut Ladder, record: &MatchRecord, sets: &[SetScore], direction: Direction) {
    let month = ladder.season.bucket(record.date);
    let (challenger, opponent) = outcomes(sets, record.winner);
    for (id, outcome) in [(record.challenger, challenger), (record.opponent, opponent)] {
        match ladder.player_mut(id) {
            Some(p) => match direction {
                Direction::Apply => p.record_result(&outcome, month),
                Direction::Revert => p.revert_result(&outcome, month),
            },
            None => log::warn!("Match {} refers to unknown player {}", record.id, id),
        }
    }
}
