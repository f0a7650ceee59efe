//! Read-only projections of the ladder: sorted standings, leaderboard, match history.

use crate::models::{Ladder, MatchId, Player, PlayerId, Role, Surface, SEASON_MONTHS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Size of the leaderboard shown above the ladder.
pub const TOP_PLAYERS: usize = 3;

/// Shown instead of a name for players no longer on the active ladder.
pub const INACTIVE_LABEL: &str = "(inactive)";

/// Standings column to sort by.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortColumn {
    #[default]
    Position,
    Name,
    MatchesPlayed,
    MatchesWon,
    SetsWon,
    SetsLost,
    SetDifferential,
    GamesWon,
    GamesLost,
    GameDifferential,
    /// Matches in one month of the season (0-based bucket).
    Month(usize),
}

impl std::str::FromStr for SortColumn {
    type Err = String;

    /// Column names as used in query strings; months are `month1`..`month5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s {
            "position" => SortColumn::Position,
            "name" => SortColumn::Name,
            "matches_played" => SortColumn::MatchesPlayed,
            "matches_won" => SortColumn::MatchesWon,
            "sets_won" => SortColumn::SetsWon,
            "sets_lost" => SortColumn::SetsLost,
            "set_differential" => SortColumn::SetDifferential,
            "games_won" => SortColumn::GamesWon,
            "games_lost" => SortColumn::GamesLost,
            "game_differential" => SortColumn::GameDifferential,
            other => {
                let month = other
                    .strip_prefix("month")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| (1..=SEASON_MONTHS).contains(n))
                    .ok_or_else(|| format!("Unknown sort column: {}", other))?;
                SortColumn::Month(month - 1)
            }
        };
        Ok(column)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

fn compare_by(column: SortColumn, a: &Player, b: &Player) -> Ordering {
    match column {
        SortColumn::Position => a.position.cmp(&b.position),
        SortColumn::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortColumn::MatchesPlayed => a.matches_played.cmp(&b.matches_played),
        SortColumn::MatchesWon => a.matches_won.cmp(&b.matches_won),
        SortColumn::SetsWon => a.sets_won.cmp(&b.sets_won),
        SortColumn::SetsLost => a.sets_lost.cmp(&b.sets_lost),
        SortColumn::SetDifferential => a.set_differential().cmp(&b.set_differential()),
        SortColumn::GamesWon => a.games_won.cmp(&b.games_won),
        SortColumn::GamesLost => a.games_lost.cmp(&b.games_lost),
        SortColumn::GameDifferential => a.game_differential().cmp(&b.game_differential()),
        SortColumn::Month(m) if m < SEASON_MONTHS => a.month_matches[m].cmp(&b.month_matches[m]),
        SortColumn::Month(_) => Ordering::Equal,
    }
}

/// Active players sorted by `column`. Ties keep ladder order regardless of direction.
pub fn sorted_standings(ladder: &Ladder, column: SortColumn, direction: SortDirection) -> Vec<&Player> {
    let mut rows: Vec<&Player> = ladder.players.iter().filter(|p| ladder.is_active(p)).collect();
    rows.sort_by(|a, b| {
        let primary = match direction {
            SortDirection::Ascending => compare_by(column, a, b),
            SortDirection::Descending => compare_by(column, b, a),
        };
        primary.then_with(|| a.position.cmp(&b.position))
    });
    rows
}

/// Best `n` active, named players: most matches won, then set differential, then game
/// differential, then higher ladder position.
pub fn leaderboard(ladder: &Ladder, n: usize) -> Vec<&Player> {
    let mut rows: Vec<&Player> = ladder
        .players
        .iter()
        .filter(|p| p.is_named() && ladder.is_active(p))
        .collect();
    rows.sort_by(|a, b| {
        b.matches_won
            .cmp(&a.matches_won)
            .then_with(|| b.set_differential().cmp(&a.set_differential()))
            .then_with(|| b.game_differential().cmp(&a.game_differential()))
            .then_with(|| a.position.cmp(&b.position))
    });
    rows.truncate(n);
    rows
}

/// Players that can take part in a new match, top of the ladder first.
pub fn challenge_candidates(ladder: &Ladder) -> Vec<&Player> {
    let mut rows: Vec<&Player> = ladder
        .players
        .iter()
        .filter(|p| p.is_named() && ladder.is_active(p))
        .collect();
    rows.sort_by_key(|p| p.position);
    rows
}

/// One match seen from one player's side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub match_id: MatchId,
    pub date: NaiveDate,
    pub role: Role,
    pub opponent_id: PlayerId,
    /// `None` when the opponent's slot is no longer on the active ladder (or unnamed).
    pub opponent_name: Option<String>,
    pub won: bool,
    pub score: String,
    pub surface: Surface,
    pub ladder_move_applied: bool,
}

impl HistoryEntry {
    /// Opponent label for display.
    pub fn opponent_label(&self) -> &str {
        self.opponent_name.as_deref().unwrap_or(INACTIVE_LABEL)
    }
}

/// Every match the player took part in, newest first.
pub fn match_history(ladder: &Ladder, player_id: PlayerId) -> Vec<HistoryEntry> {
    let mut rows: Vec<HistoryEntry> = ladder
        .matches
        .iter()
        .filter(|m| m.involves(player_id))
        .map(|m| {
            let (role, opponent_id) = if m.challenger == player_id {
                (Role::Challenger, m.opponent)
            } else {
                (Role::Opponent, m.challenger)
            };
            let opponent_name = ladder
                .player(opponent_id)
                .filter(|p| p.is_named() && ladder.is_active(p))
                .map(|p| p.name.clone());
            HistoryEntry {
                match_id: m.id,
                date: m.date,
                role,
                opponent_id,
                opponent_name,
                won: m.winner == role,
                score: m.score.clone(),
                surface: m.surface,
                ladder_move_applied: m.ladder_move_applied,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows
}
