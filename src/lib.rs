//! Tennis ladder league: library with models, ranking engine, storage and export.

pub mod config;
pub mod export;
pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    add_match, add_match_with_id, apply_move, audit, challenge_candidates, check_score, check_winner_score, delete_match,
    edit_match, leaderboard, match_history, parse_score, reverse_move, sorted_standings, tally,
    validate_sets, Discrepancy, HistoryEntry, MatchEdit, MatchEntry, MatchTally, ScoreError, SetScore,
    Side, SortColumn, SortDirection, INACTIVE_LABEL, TOP_PLAYERS,
};
pub use models::{
    Ladder, LadderError, MatchId, MatchRecord, Player, PlayerId, PlayerOutcome, Role, Season, Surface,
    SEASON_MONTHS,
};
