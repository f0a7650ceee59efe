//! Ladder moves: a challenger who wins an upset takes the target position and everyone
//! in between drops one place.

use crate::models::{LadderError, Player, PlayerId};

/// Move the challenger up to `target_position`.
///
/// Players at positions `target_position..challenger_start` drop one place. Returns
/// `Ok(false)` without touching anything when the challenger already holds
/// `target_position` or better.
pub fn apply_move(
    players: &mut [Player],
    challenger_id: PlayerId,
    target_position: u32,
) -> Result<bool, LadderError> {
    let challenger_start = players
        .iter()
        .find(|p| p.id == challenger_id)
        .map(|p| p.position)
        .ok_or(LadderError::PlayerNotFound(challenger_id))?;
    if challenger_start <= target_position {
        return Ok(false);
    }
    for p in players.iter_mut() {
        if p.id == challenger_id {
            p.position = target_position;
        } else if p.position >= target_position && p.position < challenger_start {
            p.position += 1;
        }
    }
    log::info!(
        "Ladder move: challenger {} -> {} ({} players dropped one place)",
        challenger_start,
        target_position,
        challenger_start - target_position
    );
    Ok(true)
}

/// Undo [`apply_move`] using the positions frozen on the match record.
///
/// Players at positions `opponent_start+1..=challenger_start` climb one place and the
/// challenger returns to `challenger_start`. Must be given the recorded start positions,
/// never the current ones.
pub fn reverse_move(
    players: &mut [Player],
    challenger_id: PlayerId,
    challenger_start: u32,
    opponent_start: u32,
) -> Result<(), LadderError> {
    if !players.iter().any(|p| p.id == challenger_id) {
        return Err(LadderError::PlayerNotFound(challenger_id));
    }
    for p in players.iter_mut() {
        if p.id == challenger_id {
            p.position = challenger_start;
        } else if p.position > opponent_start && p.position <= challenger_start {
            p.position -= 1;
        }
    }
    log::info!(
        "Ladder move reversed: challenger back to {} (from {})",
        challenger_start,
        opponent_start
    );
    Ok(())
}
