pub mod client;
pub mod espn;
pub mod facts;
pub mod mlb;
pub mod nhl;
pub mod seo;
pub mod status;
pub mod time;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of upstream wire formats
// ---------------------------------------------------------------------------

/// Leagues with a schedule adapter. Team configuration that omits the sport
/// tag gets `Mlb`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    #[default]
    Mlb,
    Nhl,
    Nba,
    Nfl,
}

impl Sport {
    pub fn tag(&self) -> &'static str {
        match self {
            Sport::Mlb => "mlb",
            Sport::Nhl => "nhl",
            Sport::Nba => "nba",
            Sport::Nfl => "nfl",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Mlb => "Baseball",
            Sport::Nhl => "Hockey",
            Sport::Nba => "Basketball",
            Sport::Nfl => "Football",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Upstream team identifier. MLB numbers its teams; NHL and ESPN key them by
/// short codes ("BOS", "NE"). Untagged so config JSON can carry either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeamId {
    Num(i64),
    Code(String),
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamId::Num(n) => write!(f, "{n}"),
            TeamId::Code(c) => f.write_str(c),
        }
    }
}

/// Static team configuration. Loaded once per run; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Canonical id in the home sport's numbering (e.g. MLB's 111 for Boston).
    pub id: i64,
    /// Secondary identifier when the upstream API keys teams differently
    /// (NHL/ESPN 3-letter codes).
    #[serde(default)]
    pub api_id: Option<String>,
    /// URL-safe, unique across all teams. Subdomains and file names use it.
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub sport: Sport,
    /// Display name; also the fallback home-game matching key.
    #[serde(default)]
    pub venue: Option<String>,
    /// IANA zone id, e.g. "America/New_York".
    pub timezone: String,
    /// Ordered hex strings, first entry is the background color.
    #[serde(default)]
    pub colors: Vec<String>,
}

impl Team {
    /// The identifier upstream responses are matched against: the short code
    /// when one is configured, the canonical number otherwise.
    pub fn api_team_id(&self) -> TeamId {
        match &self.api_id {
            Some(code) => TeamId::Code(code.clone()),
            None => TeamId::Num(self.id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRef {
    pub name: String,
    pub id: Option<TeamId>,
}

/// One normalized game, sport-agnostic. Produced fresh on every adapter
/// fetch and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_id: Option<String>,
    /// Absent when the game is truly unscheduled or the upstream timestamp
    /// was unparseable.
    pub game_date: Option<DateTime<Utc>>,
    pub home_team: TeamRef,
    pub away_team: TeamRef,
    pub venue: Option<String>,
    /// True means the date/time is a placeholder and must not be shown.
    pub start_time_tbd: bool,
    /// Free-text upstream state ("Scheduled", "FUT", "STATUS_SCHEDULED", …).
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBucket {
    /// UTC calendar day of the games below, "YYYY-MM-DD".
    pub date: String,
    pub total_games: usize,
    pub games: Vec<Game>,
}

/// Normalized schedule: every dated game sits under the bucket matching the
/// UTC calendar day of its instant. Buckets keep the insertion order of the
/// sorted game list, so they read chronologically with undated games last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub total_items: usize,
    pub dates: Vec<DateBucket>,
}

impl SchedulePayload {
    /// All games across every date bucket, in bucket order.
    pub fn all_games(&self) -> impl Iterator<Item = &Game> {
        self.dates.iter().flat_map(|d| d.games.iter())
    }
}

/// Per-team summary derived from a schedule payload. A pure projection —
/// recomputed on every request, never cached.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleFacts {
    pub games: Vec<Game>,
    pub team_time_zone: String,
    /// The team-local calendar date, "YYYY-MM-DD". Authoritative "today" for
    /// user-facing decisions (adapters bucket by UTC day internally).
    pub today_key: String,
    pub games_today: Vec<Game>,
    pub home_games_today: Vec<Game>,
    pub away_games_today: Vec<Game>,
    pub next_home_game: Option<Game>,
}
