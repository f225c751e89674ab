use crate::espn::{EspnCompetitor, EspnEvent, ScoreboardResponse};
use crate::mlb::{MlbDate, MlbGame, MlbScheduleResponse};
use crate::nhl::{NhlClubScheduleResponse, NhlGame, NhlTeam, NhlWeekScheduleResponse};
use crate::time::date_key_in_zone;
use crate::{DateBucket, Game, SchedulePayload, Sport, Team, TeamId, TeamRef};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use futures_util::future::join;
use log::warn;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const MLB_BASE: &str = "https://statsapi.mlb.com";
const NHL_BASE: &str = "https://api-web.nhle.com";
const ESPN_BASE: &str = "https://site.api.espn.com";

/// Per-request bound; a timed-out request counts as a failed one.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// ESPN has no season-long schedule endpoint, so window fetches poll the
/// scoreboard day by day, capped regardless of the requested window length.
const ESPN_WINDOW_MAX_DAYS: i64 = 14;

/// League-day endpoints key "today" off the US Eastern calendar.
const LEAGUE_TODAY_ZONE: &str = "America/New_York";

#[derive(Debug)]
pub enum ApiError {
    /// Non-2xx from a required upstream endpoint.
    Http { status: u16, url: String },
    Network(reqwest::Error, String),
    /// Malformed body from a required upstream endpoint.
    Decode(reqwest::Error, String),
    Timeout(String),
    UnknownSport(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, url } => write!(f, "Upstream error {status} for {url}"),
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Decode(e, url) => write!(f, "Decode error for {url}: {e}"),
            ApiError::Timeout(url) => write!(f, "Request timed out for {url}"),
            ApiError::UnknownSport(tag) => write!(f, "Unknown sport adapter: {tag}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Resolve a sport tag to its adapter variant. An absent (or empty) tag
/// means MLB; anything unrecognized is a configuration error, caught before
/// any network I/O happens.
pub fn sport_from_tag(tag: Option<&str>) -> ApiResult<Sport> {
    match tag {
        None | Some("") | Some("mlb") => Ok(Sport::Mlb),
        Some("nhl") => Ok(Sport::Nhl),
        Some("nba") => Ok(Sport::Nba),
        Some("nfl") => Ok(Sport::Nfl),
        Some(other) => Err(ApiError::UnknownSport(other.to_owned())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    sport: Sport,
    team: TeamId,
    start: NaiveDate,
    end: NaiveDate,
}

/// Schedule client over the MLB, NHL, and ESPN public endpoints, with a
/// per-run window cache. One instance per build/script invocation; the cache
/// lives and dies with it.
#[derive(Debug)]
pub struct ScheduleApi {
    client: Client,
    timeout: Duration,
    cache: Mutex<HashMap<CacheKey, SchedulePayload>>,
    mlb_base: String,
    nhl_base: String,
    espn_base: String,
}

impl Default for ScheduleApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("homegame/0.1 (schedule fetcher)")
                .build()
                .unwrap_or_default(),
            timeout: FETCH_TIMEOUT,
            cache: Mutex::new(HashMap::new()),
            mlb_base: MLB_BASE.to_owned(),
            nhl_base: NHL_BASE.to_owned(),
            espn_base: ESPN_BASE.to_owned(),
        }
    }
}

impl ScheduleApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at alternative hosts (tests, proxies).
    pub fn with_base_urls(mlb: &str, nhl: &str, espn: &str) -> Self {
        Self {
            mlb_base: mlb.trim_end_matches('/').to_owned(),
            nhl_base: nhl.trim_end_matches('/').to_owned(),
            espn_base: espn.trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    /// Fetch a team's schedule over [start, end], normalized to the shared
    /// payload shape. Dispatches on the team's sport tag.
    pub async fn fetch_schedule_window(
        &self,
        team: &Team,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<SchedulePayload> {
        match team.sport {
            Sport::Mlb => self.fetch_mlb_window(team, start, end).await,
            Sport::Nhl => self.fetch_nhl_window(team).await,
            Sport::Nba => self.fetch_espn_window(team, "basketball", "nba", start, end).await,
            Sport::Nfl => self.fetch_espn_window(team, "football", "nfl", start, end).await,
        }
    }

    /// Cached variant: at most one underlying fetch per (sport, team id,
    /// window) for the lifetime of this client.
    pub async fn fetch_schedule_window_cached(
        &self,
        team: &Team,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<SchedulePayload> {
        let key = CacheKey { sport: team.sport, team: team.api_team_id(), start, end };
        if let Some(hit) = self.lock_cache().get(&key) {
            return Ok(hit.clone());
        }
        let data = self.fetch_schedule_window(team, start, end).await?;
        self.lock_cache().insert(key, data.clone());
        Ok(data)
    }

    /// League-wide schedule for today (off-season guards and league pages).
    pub async fn fetch_league_schedule_today(&self, sport: Sport) -> ApiResult<SchedulePayload> {
        match sport {
            Sport::Mlb => self.fetch_mlb_league_today().await,
            Sport::Nhl => self.fetch_nhl_league_today().await,
            Sport::Nba => self.fetch_espn_league_today("basketball", "nba").await,
            Sport::Nfl => self.fetch_espn_league_today("football", "nfl").await,
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<CacheKey, SchedulePayload>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // MLB
    // -----------------------------------------------------------------------

    async fn fetch_mlb_window(
        &self,
        team: &Team,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<SchedulePayload> {
        let team_id = team.api_team_id();
        let reg_url = format!(
            "{}/api/v1/schedule?sportId=1&teamId={}&startDate={}&endDate={}",
            self.mlb_base, team_id, start, end
        );
        let ps_url = format!(
            "{}/api/v1/schedule/postseason?teamId={}&startDate={}&endDate={}",
            self.mlb_base, team_id, start, end
        );

        let (reg, ps) = join(
            self.get_json::<MlbScheduleResponse>(&reg_url),
            self.get_json::<MlbScheduleResponse>(&ps_url),
        )
        .await;

        // Regular season is the required leg; the postseason leg degrades.
        let reg = reg?;
        let ps = empty_on_error(ps, "MLB postseason window");
        Ok(merge_and_group_mlb_games(reg.dates, ps.dates, ""))
    }

    async fn fetch_mlb_league_today(&self) -> ApiResult<SchedulePayload> {
        let today = date_key_in_zone(Utc::now(), LEAGUE_TODAY_ZONE);
        let reg_url = format!(
            "{}/api/v1/schedule?sportId=1&startDate={today}&endDate={today}",
            self.mlb_base
        );
        let ps_url = format!(
            "{}/api/v1/schedule/postseason?startDate={today}&endDate={today}",
            self.mlb_base
        );

        let (reg, ps) = join(
            self.get_json::<MlbScheduleResponse>(&reg_url),
            self.get_json::<MlbScheduleResponse>(&ps_url),
        )
        .await;

        // Off-season guard path: both legs are soft.
        let reg = empty_on_error(reg, "MLB league schedule");
        let ps = empty_on_error(ps, "MLB postseason league schedule");
        Ok(merge_and_group_mlb_games(reg.dates, ps.dates, &today))
    }

    // -----------------------------------------------------------------------
    // NHL
    // -----------------------------------------------------------------------

    async fn fetch_nhl_window(&self, team: &Team) -> ApiResult<SchedulePayload> {
        let Some(code) = team.api_id.as_deref() else {
            return Err(ApiError::Other(format!(
                "NHL team missing apiId (3-letter code): {}",
                team.name
            )));
        };

        let season = current_nhl_season(Utc::now());
        let url = format!("{}/v1/club-schedule-season/{code}/{season}", self.nhl_base);

        // 404 means off-season or unknown club and yields an empty schedule;
        // network/timeout/decode failures also degrade. Any other HTTP error
        // is a hard failure.
        let games = match self.get_json::<NhlClubScheduleResponse>(&url).await {
            Ok(resp) => resp.games,
            Err(ApiError::Http { status: 404, .. }) => Vec::new(),
            Err(err @ ApiError::Http { .. }) => return Err(err),
            Err(err) => {
                warn!("NHL club schedule: {err}; continuing with empty schedule");
                Vec::new()
            }
        };

        let mut normalized: Vec<Game> = games.iter().map(normalize_nhl_game).collect();
        sort_games_by_date(&mut normalized);
        Ok(group_games_by_date(normalized, ""))
    }

    async fn fetch_nhl_league_today(&self) -> ApiResult<SchedulePayload> {
        let today = date_key_in_zone(Utc::now(), LEAGUE_TODAY_ZONE);
        let url = format!("{}/v1/schedule/{today}", self.nhl_base);
        let resp = empty_on_error(
            self.get_json::<NhlWeekScheduleResponse>(&url).await,
            "NHL league schedule",
        );
        let normalized: Vec<Game> = resp
            .game_week
            .iter()
            .flat_map(|day| day.games.iter())
            .map(normalize_nhl_game)
            .collect();
        Ok(group_games_by_date(normalized, &today))
    }

    // -----------------------------------------------------------------------
    // NBA / NFL (ESPN scoreboard)
    // -----------------------------------------------------------------------

    async fn fetch_espn_window(
        &self,
        team: &Team,
        sport_path: &str,
        league: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<SchedulePayload> {
        let team_id = team.api_team_id();
        let days = (end - start).num_days().min(ESPN_WINDOW_MAX_DAYS);

        let mut all_games = Vec::new();
        for offset in 0..=days {
            let day = start + chrono::Duration::days(offset);
            let date_key = day.format("%Y%m%d").to_string();
            let day_games = self.fetch_espn_scoreboard(sport_path, league, &date_key).await;
            all_games.extend(day_games.into_iter().filter(|g| {
                g.home_team.id.as_ref() == Some(&team_id)
                    || g.away_team.id.as_ref() == Some(&team_id)
            }));
        }

        Ok(group_games_by_date(all_games, ""))
    }

    async fn fetch_espn_league_today(
        &self,
        sport_path: &str,
        league: &str,
    ) -> ApiResult<SchedulePayload> {
        let today = date_key_in_zone(Utc::now(), LEAGUE_TODAY_ZONE);
        let date_key = today.replace('-', "");
        let games = self.fetch_espn_scoreboard(sport_path, league, &date_key).await;
        Ok(group_games_by_date(games, &today))
    }

    /// One scoreboard day. Every day is optional: a failed or malformed day
    /// contributes zero games instead of aborting the window.
    async fn fetch_espn_scoreboard(
        &self,
        sport_path: &str,
        league: &str,
        date_key: &str,
    ) -> Vec<Game> {
        let url = format!(
            "{}/apis/site/v2/sports/{sport_path}/{league}/scoreboard?dates={date_key}",
            self.espn_base
        );
        let resp: ScoreboardResponse = empty_on_error(self.get_json(&url).await, "ESPN scoreboard");
        resp.events
            .unwrap_or_default()
            .iter()
            .filter_map(normalize_espn_event)
            .collect()
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .header("accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(url.to_owned())
                } else {
                    ApiError::Network(e, url.to_owned())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http { status: status.as_u16(), url: url.to_owned() });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e, url.to_owned()))
    }
}

/// Degradation policy for optional/secondary calls: log and substitute an
/// empty result. Required calls never go through here.
fn empty_on_error<T: Default>(result: ApiResult<T>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!("{context}: {err}; continuing with empty schedule");
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: upstream wire types → normalized Game shape
// ---------------------------------------------------------------------------

/// Parse an upstream timestamp. ESPN omits the seconds, so strict RFC 3339
/// gets a minutes-precision fallback.
fn parse_game_instant(iso: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(iso)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// The MLB schedule API publishes future games with a 03:33 UTC placeholder
/// clock before start times are fixed.
fn mlb_time_is_tbd(g: &MlbGame, parsed: Option<DateTime<Utc>>) -> bool {
    if g.status.as_ref().and_then(|s| s.start_time_tbd) == Some(true) {
        return true;
    }
    match parsed {
        None => true,
        Some(d) => d.hour() == 3 && d.minute() == 33,
    }
}

fn normalize_mlb_game(g: &MlbGame) -> Game {
    fn side(side: Option<&crate::mlb::MlbGameSide>, fallback: &str) -> TeamRef {
        let team = side.and_then(|s| s.team.as_ref());
        TeamRef {
            name: team
                .and_then(|t| t.name.clone())
                .unwrap_or_else(|| fallback.to_owned()),
            id: team.and_then(|t| t.id).map(TeamId::Num),
        }
    }

    let parsed = g.game_date.as_deref().and_then(parse_game_instant);
    let teams = g.teams.as_ref();
    Game {
        game_id: g.game_pk.map(|pk| pk.to_string()),
        game_date: parsed,
        home_team: side(teams.and_then(|t| t.home.as_ref()), "Home Team"),
        away_team: side(teams.and_then(|t| t.away.as_ref()), "Away Team"),
        venue: g.venue.as_ref().and_then(|v| v.name.clone()),
        start_time_tbd: mlb_time_is_tbd(g, parsed),
        status: g.status.as_ref().and_then(|s| {
            s.detailed_state
                .clone()
                .or_else(|| s.abstract_game_state.clone())
        }),
    }
}

/// Union regular-season and postseason records, de-duped by gamePk. A dated
/// copy beats an undated placeholder for the same pk; first-seen positions
/// are kept so equal-timestamp entries never reorder between runs.
fn merge_and_group_mlb_games(
    reg_dates: Vec<MlbDate>,
    ps_dates: Vec<MlbDate>,
    fallback_date_key: &str,
) -> SchedulePayload {
    let mut merged: Vec<MlbGame> = Vec::new();
    let mut index_by_pk: HashMap<i64, usize> = HashMap::new();
    for game in reg_dates.into_iter().chain(ps_dates).flat_map(|d| d.games) {
        let Some(pk) = game.game_pk else { continue };
        match index_by_pk.get(&pk) {
            None => {
                index_by_pk.insert(pk, merged.len());
                merged.push(game);
            }
            Some(&i) => {
                if merged[i].game_date.is_none() && game.game_date.is_some() {
                    merged[i] = game;
                }
            }
        }
    }

    let mut games: Vec<Game> = merged.iter().map(normalize_mlb_game).collect();
    sort_games_by_date(&mut games);
    group_games_by_date(games, fallback_date_key)
}

fn normalize_nhl_game(g: &NhlGame) -> Game {
    fn team_ref(team: Option<&NhlTeam>, fallback: &str) -> TeamRef {
        TeamRef {
            name: team
                .and_then(|t| t.common_name.as_ref())
                .and_then(|n| n.default.clone())
                .unwrap_or_else(|| fallback.to_owned()),
            id: team.and_then(|t| {
                t.abbrev
                    .clone()
                    .map(TeamId::Code)
                    .or(t.id.map(TeamId::Num))
            }),
        }
    }

    Game {
        game_id: g.id.map(|id| id.to_string()),
        game_date: g.start_time_utc.as_deref().and_then(parse_game_instant),
        home_team: team_ref(g.home_team.as_ref(), "Home Team"),
        away_team: team_ref(g.away_team.as_ref(), "Away Team"),
        venue: g.venue.as_ref().and_then(|v| v.default.clone()),
        start_time_tbd: g.game_schedule_state.as_deref() == Some("TBD")
            || g.start_time_utc.is_none(),
        status: g.game_state.clone(),
    }
}

fn normalize_espn_event(event: &EspnEvent) -> Option<Game> {
    let comp = event.competitions.as_ref()?.first()?;
    let competitors = comp.competitors.as_deref().unwrap_or_default();
    let home = competitors
        .iter()
        .find(|c| c.home_away.as_deref() == Some("home"));
    let away = competitors
        .iter()
        .find(|c| c.home_away.as_deref() == Some("away"));

    let status_name = comp
        .status
        .as_ref()
        .and_then(|s| s.status_type.as_ref())
        .and_then(|t| t.name.clone())
        .or_else(|| {
            event
                .status
                .as_ref()
                .and_then(|s| s.status_type.as_ref())
                .and_then(|t| t.name.clone())
        });
    let tbd = status_name.as_deref() == Some("STATUS_TBD") || event.date.is_none();

    fn team_ref(c: Option<&EspnCompetitor>, fallback: &str) -> TeamRef {
        let team = c.and_then(|c| c.team.as_ref());
        TeamRef {
            name: team
                .and_then(|t| t.display_name.clone().or_else(|| t.name.clone()))
                .unwrap_or_else(|| fallback.to_owned()),
            id: team
                .and_then(|t| t.abbreviation.clone().or_else(|| t.id.clone()))
                .map(TeamId::Code),
        }
    }

    Some(Game {
        game_id: event.id.clone(),
        game_date: event.date.as_deref().and_then(parse_game_instant),
        home_team: team_ref(home, "Home Team"),
        away_team: team_ref(away, "Away Team"),
        venue: comp.venue.as_ref().and_then(|v| v.full_name.clone()),
        start_time_tbd: tbd,
        status: status_name,
    })
}

/// NHL seasons span two calendar years ("20242025"). The season starts in
/// October; before then the current season is the one that began last fall.
fn current_nhl_season(now: DateTime<Utc>) -> String {
    let year = now.year();
    if now.month() < 10 {
        format!("{}{}", year - 1, year)
    } else {
        format!("{}{}", year, year + 1)
    }
}

/// Ascending by start instant; undated games sort last. Stable, so ties keep
/// their input order.
fn sort_games_by_date(games: &mut [Game]) {
    games.sort_by_key(|g| {
        g.game_date
            .map(|d| d.timestamp_millis())
            .unwrap_or(i64::MAX)
    });
}

/// Bucket games under the UTC calendar day of their start instant; undated
/// games land under the caller-supplied fallback key. Buckets keep
/// first-insertion order.
fn group_games_by_date(games: Vec<Game>, fallback_date_key: &str) -> SchedulePayload {
    let total_items = games.len();
    let mut buckets: Vec<DateBucket> = Vec::new();
    for game in games {
        let key = game
            .game_date
            .map(|d| d.date_naive().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| fallback_date_key.to_owned());
        match buckets.iter_mut().find(|b| b.date == key) {
            Some(bucket) => bucket.games.push(game),
            None => buckets.push(DateBucket { date: key, total_games: 0, games: vec![game] }),
        }
    }
    for bucket in &mut buckets {
        bucket.total_games = bucket.games.len();
    }
    SchedulePayload { total_items, dates: buckets }
}
