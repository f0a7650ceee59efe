//! Tennis score handling: parse free text into sets, check legality, tally totals.

use crate::models::PlayerOutcome;

/// Games won by each side in one set, in the order written (side A first).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SetScore {
    pub a: i32,
    pub b: i32,
}

impl SetScore {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }
}

/// Which side of the score text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    A,
    B,
}

/// Why a score was rejected. `Display` is shown to users verbatim.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoreError {
    Empty,
    /// Token without exactly one `-` or `:` separator.
    MalformedSet { token: String },
    /// Token whose fields are not whole numbers.
    NotNumeric { token: String },
    TooFewSets,
    NegativeGames { set: usize, a: i32, b: i32 },
    TiedSet { set: usize, a: i32, b: i32 },
    /// Match tie-break (10 points or more) not won by two.
    TiebreakMargin { set: usize, a: i32, b: i32 },
    IllegalSet { set: usize, a: i32, b: i32 },
    /// Both sides won the same number of sets.
    Undecided { sets: u32 },
    /// The first side of the score, which must be the declared winner, won fewer sets.
    WinnerNotFirst { won: u32, lost: u32 },
}

impl std::fmt::Display for ScoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreError::Empty => write!(f, "No score entered"),
            ScoreError::MalformedSet { token } => {
                write!(f, "Invalid set \"{}\": write each set like 6-4 or 6:4", token)
            }
            ScoreError::NotNumeric { token } => {
                write!(f, "Invalid set \"{}\": games must be whole numbers", token)
            }
            ScoreError::TooFewSets => write!(f, "A match needs at least 2 sets"),
            ScoreError::NegativeGames { set, a, b } => {
                write!(f, "Set {} ({}-{}): games cannot be negative", set, a, b)
            }
            ScoreError::TiedSet { set, a, b } => {
                write!(f, "Set {} ({}-{}): a set cannot end level", set, a, b)
            }
            ScoreError::TiebreakMargin { set, a, b } => {
                write!(f, "Set {} ({}-{}): a match tie-break must be won by 2 points", set, a, b)
            }
            ScoreError::IllegalSet { set, a, b } => write!(
                f,
                "Set {} ({}-{}): not a valid set score (6-0 to 6-4, 7-5, 7-6 or a match tie-break)",
                set, a, b
            ),
            ScoreError::Undecided { sets } => {
                write!(f, "Sets are level at {}-{}: the match has no winner", sets, sets)
            }
            ScoreError::WinnerNotFirst { won, lost } => write!(
                f,
                "The winner must be written first, but the score gives them {} set(s) to {}",
                won, lost
            ),
        }
    }
}

impl std::error::Error for ScoreError {}

/// Split score text into set pairs. Checks shape only, not tennis legality.
///
/// Whitespace of any kind separates sets; each set is `games-games` or `games:games`.
pub fn parse_score(input: &str) -> Result<Vec<SetScore>, ScoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScoreError::Empty);
    }
    trimmed.split_whitespace().map(parse_set).collect()
}

fn parse_set(token: &str) -> Result<SetScore, ScoreError> {
    let separators = token.chars().filter(|c| *c == '-' || *c == ':').count();
    if separators != 1 {
        return Err(ScoreError::MalformedSet {
            token: token.to_string(),
        });
    }
    let (a, b) = token
        .split_once(['-', ':'])
        .ok_or_else(|| ScoreError::MalformedSet {
            token: token.to_string(),
        })?;
    let games = |field: &str| -> Result<i32, ScoreError> {
        if field.is_empty() || !field.bytes().all(|c| c.is_ascii_digit()) {
            return Err(ScoreError::NotNumeric {
                token: token.to_string(),
            });
        }
        field.parse().map_err(|_| ScoreError::NotNumeric {
            token: token.to_string(),
        })
    };
    Ok(SetScore::new(games(a)?, games(b)?))
}

/// Check a set sequence against tennis rules and match completion.
///
/// A set with 10 or more points on the leading side is a match tie-break and only needs
/// a two point margin; any other set must be 6-0..6-4, 7-5 or 7-6.
pub fn validate_sets(sets: &[SetScore]) -> Result<(), ScoreError> {
    if sets.len() < 2 {
        return Err(ScoreError::TooFewSets);
    }
    for (i, s) in sets.iter().enumerate() {
        let (set, a, b) = (i + 1, s.a, s.b);
        if a < 0 || b < 0 {
            return Err(ScoreError::NegativeGames { set, a, b });
        }
        if a == b {
            return Err(ScoreError::TiedSet { set, a, b });
        }
        let (hi, lo) = (a.max(b), a.min(b));
        if hi >= 10 {
            if hi - lo < 2 {
                return Err(ScoreError::TiebreakMargin { set, a, b });
            }
        } else {
            let legal = (hi == 6 && lo <= 4) || (hi == 7 && (lo == 5 || lo == 6));
            if !legal {
                return Err(ScoreError::IllegalSet { set, a, b });
            }
        }
    }
    let tally = tally(sets);
    if tally.sets_won_a == tally.sets_won_b {
        return Err(ScoreError::Undecided {
            sets: tally.sets_won_a,
        });
    }
    Ok(())
}

/// Parse and validate in one step.
pub fn check_score(input: &str) -> Result<Vec<SetScore>, ScoreError> {
    let sets = parse_score(input)?;
    validate_sets(&sets)?;
    Ok(sets)
}

/// Like [`check_score`], and also require side A (the declared winner) to have won more
/// sets than side B.
pub fn check_winner_score(input: &str) -> Result<Vec<SetScore>, ScoreError> {
    let sets = check_score(input)?;
    let t = tally(&sets);
    if t.sets_won_a < t.sets_won_b {
        return Err(ScoreError::WinnerNotFirst {
            won: t.sets_won_a,
            lost: t.sets_won_b,
        });
    }
    Ok(sets)
}

/// Sets and games won by each side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchTally {
    pub sets_won_a: u32,
    pub sets_won_b: u32,
    pub games_won_a: u32,
    pub games_won_b: u32,
}

impl MatchTally {
    /// One side's view of the tally. `won` comes from the caller since the declared
    /// winner is authoritative.
    pub fn for_side(&self, side: Side, won: bool) -> PlayerOutcome {
        let (sets_won, sets_lost, games_won, games_lost) = match side {
            Side::A => (self.sets_won_a, self.sets_won_b, self.games_won_a, self.games_won_b),
            Side::B => (self.sets_won_b, self.sets_won_a, self.games_won_b, self.games_won_a),
        };
        PlayerOutcome {
            won,
            sets_won,
            sets_lost,
            games_won,
            games_lost,
        }
    }
}

/// Sum games and count sets per side. Negative games count as zero; totals saturate.
pub fn tally(sets: &[SetScore]) -> MatchTally {
    sets.iter().fold(MatchTally::default(), |mut t, s| {
        t.games_won_a = t.games_won_a.saturating_add(s.a.max(0).unsigned_abs());
        t.games_won_b = t.games_won_b.saturating_add(s.b.max(0).unsigned_abs());
        if s.a > s.b {
            t.sets_won_a = t.sets_won_a.saturating_add(1);
        } else if s.b > s.a {
            t.sets_won_b = t.sets_won_b.saturating_add(1);
        }
        t
    })
}
