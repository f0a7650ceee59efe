//! Ladder business logic: scores, ladder moves, match transactions, views.

mod audit;
mod positions;
mod score;
mod transactions;
mod views;

pub use audit::{audit, Discrepancy};
pub use positions::{apply_move, reverse_move};
pub use score::{check_score, check_winner_score, parse_score, tally, validate_sets, MatchTally, ScoreError, SetScore, Side};
pub use transactions::{add_match, add_match_with_id, delete_match, edit_match, MatchEdit, MatchEntry};
pub use views::{
    challenge_candidates, leaderboard, match_history, sorted_standings, HistoryEntry, SortColumn,
    SortDirection, INACTIVE_LABEL, TOP_PLAYERS,
};
