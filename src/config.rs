//! Server settings read from environment variables.
//!
//! | Variable                | Default       |
//! |-------------------------|---------------|
//! | `HOST`                  | `0.0.0.0`     |
//! | `PORT`                  | `8080`        |
//! | `LADDER_DATA`           | `ladder.json` |
//! | `LADDER_ADMIN_SECRET`   | unset (read-only server) |
//! | `LADDER_CAPACITY`       | `30`          |
//! | `LADDER_ACTIVE_PLAYERS` | capacity      |
//! | `LADDER_SEASON_START`   | `5` (May)     |
//! | `STATIC_DIR`            | `static`      |
//!
//! Capacity, active players and season start only matter when no saved ladder exists yet.

use crate::models::{Ladder, Season, SEASON_MONTHS};
use std::path::PathBuf;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_capacity() -> u32 {
    30
}

/// Latest month a season may start in and still fit all its buckets in one year.
const LAST_SEASON_START: u32 = 13 - SEASON_MONTHS as u32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
    /// Shared secret for write access. `None` disables all write endpoints.
    pub admin_secret: Option<String>,
    pub capacity: u32,
    pub active_players: u32,
    pub season: Season,
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_path: PathBuf::from("ladder.json"),
            admin_secret: None,
            capacity: default_capacity(),
            active_players: default_capacity(),
            season: Season::default(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Unparseable values fall back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u32>().ok());

        let capacity = number("LADDER_CAPACITY").filter(|c| *c > 0).unwrap_or(defaults.capacity);
        let active_players = number("LADDER_ACTIVE_PLAYERS")
            .unwrap_or(capacity)
            .clamp(1, capacity);
        let season = number("LADDER_SEASON_START")
            .map(|m| Season {
                start_month: m.clamp(1, LAST_SEASON_START),
            })
            .unwrap_or(defaults.season);

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            data_path: lookup("LADDER_DATA").map(PathBuf::from).unwrap_or(defaults.data_path),
            admin_secret: lookup("LADDER_ADMIN_SECRET").filter(|s| !s.is_empty()),
            capacity,
            active_players,
            season,
            static_dir: lookup("STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
        }
    }

    /// A fresh, empty ladder sized by this configuration.
    pub fn new_ladder(&self) -> Ladder {
        Ladder::with_season(self.capacity, self.active_players, self.season)
    }
}

/// Compare a presented secret against the configured one without stopping at the first
/// differing byte.
pub fn secret_matches(expected: &str, candidate: &str) -> bool {
    let (a, b) = (expected.as_bytes(), candidate.as_bytes());
    let diff = a
        .iter()
        .zip(b)
        .fold(a.len() ^ b.len(), |acc, (x, y)| acc | usize::from(x ^ y));
    diff == 0
}
