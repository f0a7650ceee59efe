//! Integration tests for adding, deleting and editing matches.

use chrono::NaiveDate;
use tennis_ladder::{
    add_match, add_match_with_id, audit, delete_match, edit_match, Ladder, LadderError, MatchEdit,
    MatchEntry, PlayerId, Role, ScoreError, Surface,
};

fn ladder_with_players(n: u32) -> Ladder {
    let mut ladder = Ladder::new(n, n);
    let ids: Vec<PlayerId> = ladder.players.iter().map(|p| p.id).collect();
    for (i, id) in ids.into_iter().enumerate() {
        ladder.set_player_name(id, format!("P{}", i + 1)).unwrap();
    }
    ladder
}

fn id_of(ladder: &Ladder, name: &str) -> PlayerId {
    ladder.players.iter().find(|p| p.name == name).unwrap().id
}

fn position_of(ladder: &Ladder, name: &str) -> u32 {
    ladder.players.iter().find(|p| p.name == name).unwrap().position
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn entry(ladder: &Ladder, challenger: &str, position: u32, winner: Role, score: &str) -> MatchEntry {
    MatchEntry {
        date: june(14),
        position,
        challenger: id_of(ladder, challenger),
        winner,
        surface: Surface::Clay,
        score: score.to_string(),
    }
}

#[test]
fn upset_moves_challenger_and_tallies_stats() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Challenger, "6-4 6-3");
    let ladder = add_match(&start, &e).unwrap();

    assert_eq!(position_of(&ladder, "P1"), 1);
    assert_eq!(position_of(&ladder, "P5"), 2);
    assert_eq!(position_of(&ladder, "P2"), 3);
    assert_eq!(position_of(&ladder, "P3"), 4);
    assert_eq!(position_of(&ladder, "P4"), 5);

    let p5 = ladder.player(id_of(&ladder, "P5")).unwrap();
    assert_eq!(p5.matches_played, 1);
    assert_eq!(p5.matches_won, 1);
    assert_eq!((p5.sets_won, p5.sets_lost), (2, 0));
    assert_eq!((p5.games_won, p5.games_lost), (12, 7));

    let p2 = ladder.player(id_of(&ladder, "P2")).unwrap();
    assert_eq!(p2.matches_played, 1);
    assert_eq!(p2.matches_won, 0);
    assert_eq!((p2.sets_won, p2.sets_lost), (0, 2));
    assert_eq!((p2.games_won, p2.games_lost), (7, 12));

    let m = &ladder.matches[0];
    assert!(m.ladder_move_applied);
    assert_eq!(m.challenger_start_position, 5);
    assert_eq!(m.opponent_start_position, 2);
    assert_eq!(m.opponent, id_of(&ladder, "P2"));
    assert_eq!(m.score, "6-4 6-3");
    assert!(audit(&ladder).is_empty());
}

#[test]
fn opponent_win_leaves_positions_alone() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Opponent, "6-4 6-3");
    let ladder = add_match(&start, &e).unwrap();

    for (i, name) in ["P1", "P2", "P3", "P4", "P5"].iter().enumerate() {
        assert_eq!(position_of(&ladder, name), i as u32 + 1);
    }
    assert!(!ladder.matches[0].ladder_move_applied);
    let p2 = ladder.player(id_of(&ladder, "P2")).unwrap();
    assert_eq!((p2.matches_won, p2.sets_won, p2.games_won), (1, 2, 12));
    let p5 = ladder.player(id_of(&ladder, "P5")).unwrap();
    assert_eq!((p5.matches_won, p5.sets_lost, p5.games_lost), (0, 2, 12));
}

#[test]
fn challenger_winning_downward_does_not_move() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P1", 4, Role::Challenger, "6-1 6-1");
    let ladder = add_match(&start, &e).unwrap();
    assert!(!ladder.matches[0].ladder_move_applied);
    assert_eq!(position_of(&ladder, "P1"), 1);
    assert_eq!(position_of(&ladder, "P4"), 4);
}

#[test]
fn deleting_an_upset_restores_the_ladder_exactly() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Challenger, "6-4 6-3");
    let (ladder, id) = add_match_with_id(&start, &e).unwrap();
    let restored = delete_match(&ladder, id).unwrap();
    assert_eq!(restored, start);
}

#[test]
fn add_then_delete_with_later_moves_uses_frozen_positions() {
    let start = ladder_with_players(5);
    let first = entry(&start, "P5", 2, Role::Challenger, "7-5 7-6");
    let (ladder, first_id) = add_match_with_id(&start, &first).unwrap();
    // P4 now sits at 5 and takes the top spot
    let second = entry(&ladder, "P4", 1, Role::Challenger, "6-3 4-6 10-6");
    let ladder = add_match(&ladder, &second).unwrap();
    assert_eq!(position_of(&ladder, "P4"), 1);

    let ladder = delete_match(&ladder, first_id).unwrap();
    assert_eq!(position_of(&ladder, "P4"), 1);
    assert_eq!(position_of(&ladder, "P1"), 2);
    assert_eq!(position_of(&ladder, "P2"), 3);
    assert_eq!(position_of(&ladder, "P3"), 4);
    assert_eq!(position_of(&ladder, "P5"), 5);
    assert_eq!(ladder.matches.len(), 1);
    assert!(audit(&ladder).is_empty());
}

#[test]
fn edit_is_equivalent_to_delete_then_add() {
    let start = ladder_with_players(6);
    let e = entry(&start, "P6", 3, Role::Challenger, "6-4 6-3");
    let (ladder, id) = add_match_with_id(&start, &e).unwrap();
    let other = entry(&ladder, "P2", 1, Role::Opponent, "6-0 6-0");
    let ladder = add_match(&ladder, &other).unwrap();

    let edit = MatchEdit {
        date: NaiveDate::from_ymd_opt(2025, 7, 2).unwrap(),
        winner: Role::Opponent,
        surface: Surface::Grass,
        score: "7-6 3-6 12-10".to_string(),
    };
    let edited = edit_match(&ladder, id, &edit).unwrap();

    let deleted = delete_match(&ladder, id).unwrap();
    let readd = MatchEntry {
        date: edit.date,
        position: position_of(&deleted, "P3"),
        challenger: id_of(&deleted, "P6"),
        winner: edit.winner,
        surface: edit.surface,
        score: edit.score.clone(),
    };
    let (replayed, new_id) = add_match_with_id(&deleted, &readd).unwrap();

    assert_eq!(edited.players, replayed.players);
    let a = edited.find_match(id).unwrap();
    let b = replayed.find_match(new_id).unwrap();
    assert_eq!(a.id, id);
    assert_eq!(a.score, b.score);
    assert_eq!(a.ladder_move_applied, b.ladder_move_applied);
    assert_eq!(a.challenger_start_position, b.challenger_start_position);
    assert_eq!(a.opponent_start_position, b.opponent_start_position);
    // edited record keeps its slot in the log
    assert_eq!(edited.matches[0].id, id);
    assert!(audit(&edited).is_empty());
}

#[test]
fn edit_can_turn_a_defence_into_an_upset() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P4", 1, Role::Opponent, "6-2 6-2");
    let (ladder, id) = add_match_with_id(&start, &e).unwrap();
    assert!(!ladder.matches[0].ladder_move_applied);

    let edit = MatchEdit {
        date: june(14),
        winner: Role::Challenger,
        surface: Surface::Clay,
        score: "6-2 6-2".to_string(),
    };
    let ladder = edit_match(&ladder, id, &edit).unwrap();
    assert!(ladder.matches[0].ladder_move_applied);
    assert_eq!(position_of(&ladder, "P4"), 1);
    assert_eq!(position_of(&ladder, "P1"), 2);
    let p1 = ladder.player(id_of(&ladder, "P1")).unwrap();
    assert_eq!((p1.matches_played, p1.matches_won), (1, 0));

    let back = delete_match(&ladder, id).unwrap();
    assert_eq!(back, start);
}

#[test]
fn edit_with_invalid_score_changes_nothing() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Challenger, "6-4 6-3");
    let (ladder, id) = add_match_with_id(&start, &e).unwrap();
    let edit = MatchEdit {
        date: june(20),
        winner: Role::Opponent,
        surface: Surface::Hard,
        score: "6-5 6-4".to_string(),
    };
    let err = edit_match(&ladder, id, &edit).unwrap_err();
    assert_eq!(
        err,
        LadderError::InvalidScore(ScoreError::IllegalSet { set: 1, a: 6, b: 5 })
    );
    assert_eq!(ladder.matches[0].score, "6-4 6-3");
}

#[test]
fn month_buckets_follow_the_season_window() {
    let start = ladder_with_players(4);
    let mut e = entry(&start, "P3", 1, Role::Opponent, "6-1 6-1");
    e.date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let ladder = add_match(&start, &e).unwrap();
    for name in ["P1", "P3"] {
        let p = ladder.player(id_of(&ladder, name)).unwrap();
        assert_eq!(p.month_matches.iter().sum::<u32>(), 0);
        assert_eq!(p.matches_played, 1);
    }

    let mut e = entry(&ladder, "P3", 1, Role::Opponent, "6-1 6-1");
    e.date = june(1);
    let ladder = add_match(&ladder, &e).unwrap();
    for name in ["P1", "P3"] {
        let p = ladder.player(id_of(&ladder, name)).unwrap();
        assert_eq!(p.month_matches, [0, 1, 0, 0, 0]);
    }
    let p2 = ladder.player(id_of(&ladder, "P2")).unwrap();
    assert_eq!(p2.month_matches, [0; 5]);
}

#[test]
fn referential_errors_are_reported() {
    let mut start = Ladder::new(6, 6);
    let ids: Vec<PlayerId> = start.players.iter().map(|p| p.id).collect();
    for (i, id) in ids.iter().take(5).enumerate() {
        start.set_player_name(*id, format!("P{}", i + 1)).unwrap();
    }
    let score = "6-4 6-4".to_string();
    let base = MatchEntry {
        date: june(3),
        position: 2,
        challenger: ids[4],
        winner: Role::Challenger,
        surface: Surface::Hard,
        score,
    };

    let unnamed = MatchEntry { challenger: ids[5], ..base.clone() };
    assert_eq!(add_match(&start, &unnamed), Err(LadderError::UnnamedPlayer(ids[5])));

    let same = MatchEntry { challenger: ids[1], ..base.clone() };
    assert_eq!(add_match(&start, &same), Err(LadderError::SamePlayer));

    let ghost = uuid::Uuid::new_v4();
    let unknown = MatchEntry { challenger: ghost, ..base.clone() };
    assert_eq!(add_match(&start, &unknown), Err(LadderError::PlayerNotFound(ghost)));

    let zero = MatchEntry { position: 0, ..base.clone() };
    assert!(matches!(add_match(&start, &zero), Err(LadderError::PositionOutOfRange { .. })));
    let past_end = MatchEntry { position: 7, ..base.clone() };
    assert!(matches!(add_match(&start, &past_end), Err(LadderError::PositionOutOfRange { .. })));

    let empty = MatchEntry { score: "  ".to_string(), ..base.clone() };
    assert_eq!(
        add_match(&start, &empty),
        Err(LadderError::InvalidScore(ScoreError::Empty))
    );

    let mut shrunk = start.clone();
    shrunk.set_active_player_count(4).unwrap();
    let inactive = MatchEntry { position: 2, ..base };
    assert_eq!(add_match(&shrunk, &inactive), Err(LadderError::InactivePlayer(ids[4])));

    let missing = uuid::Uuid::new_v4();
    assert_eq!(delete_match(&start, missing), Err(LadderError::MatchNotFound(missing)));
}

#[test]
fn corrupt_stored_score_still_deletes_and_reverses_move() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Challenger, "6-4 6-3");
    let (mut ladder, id) = add_match_with_id(&start, &e).unwrap();
    ladder.matches[0].score = "six-four".to_string();

    let ladder = delete_match(&ladder, id).unwrap();
    assert!(ladder.matches.is_empty());
    assert_eq!(position_of(&ladder, "P5"), 5);
    assert_eq!(position_of(&ladder, "P2"), 2);
    // statistics stay as they were
    let p5 = ladder.player(id_of(&ladder, "P5")).unwrap();
    assert_eq!(p5.matches_won, 1);
    assert!(!audit(&ladder).is_empty());
}

#[test]
fn reversal_never_drops_counters_below_zero() {
    let start = ladder_with_players(3);
    let e = entry(&start, "P3", 1, Role::Challenger, "6-0 6-0");
    let (mut ladder, id) = add_match_with_id(&start, &e).unwrap();
    for p in ladder.players.iter_mut() {
        p.matches_played = 0;
        p.matches_won = 0;
        // winner had 12 games; the loser had none
        p.games_won = p.games_won.min(3);
        p.month_matches = [0; 5];
    }
    let ladder = delete_match(&ladder, id).unwrap();
    for p in &ladder.players {
        assert_eq!(p.matches_played, 0);
        assert_eq!(p.matches_won, 0);
        assert_eq!(p.games_won, 0);
        assert_eq!(p.month_matches, [0; 5]);
    }
}

#[test]
fn declared_winner_must_lead_the_score() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Challenger, "0-6 0-6");
    assert_eq!(
        add_match(&start, &e),
        Err(LadderError::InvalidScore(ScoreError::WinnerNotFirst { won: 0, lost: 2 }))
    );

    let e = entry(&start, "P5", 2, Role::Challenger, "6-4 6-3");
    let (ladder, id) = add_match_with_id(&start, &e).unwrap();
    let edit = MatchEdit {
        date: june(20),
        winner: Role::Opponent,
        surface: Surface::Hard,
        score: "4-6 3-6".to_string(),
    };
    assert_eq!(
        edit_match(&ladder, id, &edit),
        Err(LadderError::InvalidScore(ScoreError::WinnerNotFirst { won: 0, lost: 2 }))
    );
    assert_eq!(position_of(&ladder, "P5"), 2);
    assert_eq!(ladder.matches[0].score, "6-4 6-3");
}

#[test]
fn huge_tiebreak_score_is_recorded_without_overflow() {
    let start = ladder_with_players(5);
    let e = entry(&start, "P5", 2, Role::Challenger, "2000000000-0 2000000000-0 2000000000-0");
    let (ladder, id) = add_match_with_id(&start, &e).unwrap();
    let p5 = ladder.player(id_of(&ladder, "P5")).unwrap();
    assert_eq!(p5.games_won, u32::MAX);
    assert_eq!((p5.sets_won, p5.sets_lost), (3, 0));

    let again = entry(&ladder, "P4", 1, Role::Opponent, "2000000000-0 2000000000-0");
    let ladder = add_match(&ladder, &again).unwrap();
    let p1 = ladder.player(id_of(&ladder, "P1")).unwrap();
    assert_eq!(p1.games_won, u32::MAX);

    let back = delete_match(&ladder, id).unwrap();
    let p5 = back.player(id_of(&back, "P5")).unwrap();
    assert_eq!(p5.games_won, 0);
    assert_eq!(p5.matches_played, 0);
}
