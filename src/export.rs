//! CSV exports of the standings and the match log.

use crate::logic::{sorted_standings, SortColumn, SortDirection, INACTIVE_LABEL};
use crate::models::{Ladder, PlayerId, Role};

fn into_string(wtr: csv::Writer<Vec<u8>>) -> csv::Result<String> {
    let bytes = wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Active players in ladder order with all counters.
pub fn standings_csv(ladder: &Ladder) -> csv::Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header = vec![
        "position".to_string(),
        "name".to_string(),
        "played".to_string(),
        "won".to_string(),
        "lost".to_string(),
        "sets_won".to_string(),
        "sets_lost".to_string(),
        "set_diff".to_string(),
        "games_won".to_string(),
        "games_lost".to_string(),
        "game_diff".to_string(),
    ];
    header.extend((1..=crate::models::SEASON_MONTHS).map(|m| format!("month_{}", m)));
    wtr.write_record(&header)?;

    for p in sorted_standings(ladder, SortColumn::Position, SortDirection::Ascending) {
        let mut row = vec![
            p.position.to_string(),
            p.name.clone(),
            p.matches_played.to_string(),
            p.matches_won.to_string(),
            p.matches_lost().to_string(),
            p.sets_won.to_string(),
            p.sets_lost.to_string(),
            p.set_differential().to_string(),
            p.games_won.to_string(),
            p.games_lost.to_string(),
            p.game_differential().to_string(),
        ];
        row.extend(p.month_matches.iter().map(|n| n.to_string()));
        wtr.write_record(&row)?;
    }
    into_string(wtr)
}

/// Every logged match in recording order. Players off the active ladder show as [`INACTIVE_LABEL`].
pub fn matches_csv(ladder: &Ladder) -> csv::Result<String> {
    let name = |id: PlayerId| -> String {
        ladder
            .player(id)
            .filter(|p| p.is_named() && ladder.is_active(p))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| INACTIVE_LABEL.to_string())
    };
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "date",
        "challenger",
        "challenger_start",
        "opponent",
        "opponent_start",
        "winner",
        "score",
        "surface",
        "ladder_move",
    ])?;
    for m in &ladder.matches {
        let winner = match m.winner {
            Role::Challenger => "challenger",
            Role::Opponent => "opponent",
        };
        wtr.write_record([
            m.date.to_string(),
            name(m.challenger),
            m.challenger_start_position.to_string(),
            name(m.opponent),
            m.opponent_start_position.to_string(),
            winner.to_string(),
            m.score.clone(),
            m.surface.to_string(),
            m.ladder_move_applied.to_string(),
        ])?;
    }
    into_string(wtr)
}
