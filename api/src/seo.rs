//! schema.org SportsEvent JSON-LD, OG image paths, and page metadata.

use crate::status::{format_team_status_at, StatusOptions};
use crate::time::date_key_in_zone;
use crate::{Game, ScheduleFacts, SchedulePayload, Team};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{json, Value};

const SITE_NAME: &str = "homegame.today";

/// The game a team page features today: home game first, else away game.
pub fn select_game_for_team_today(facts: &ScheduleFacts) -> (Option<&Game>, bool) {
    match facts.home_games_today.first() {
        Some(game) => (Some(game), true),
        None => (facts.away_games_today.first(), false),
    }
}

/// SportsEvent JSON-LD for the selected game, or None when there is nothing
/// to feature. A game without a concrete timestamp falls back to the
/// supplied date at UTC midnight; without either there is no event.
pub fn build_sports_event_json_ld(
    team: &Team,
    selected_game: Option<&Game>,
    is_home: bool,
    fallback_date: Option<NaiveDate>,
    sport_name: &str,
) -> Option<Value> {
    let game = selected_game?;
    let opponent = if is_home { &game.away_team.name } else { &game.home_team.name };
    let start_iso = game
        .game_date
        .map(|d| d.to_rfc3339_opts(SecondsFormat::Secs, true))
        .or_else(|| fallback_date.map(|d| format!("{d}T00:00:00Z")))?;

    let name = if is_home {
        format!("{} vs {}", team.name, opponent)
    } else {
        format!("{} vs {}", opponent, team.name)
    };
    let home_name = if is_home { team.name.as_str() } else { game.home_team.name.as_str() };
    let away_name = if is_home { game.away_team.name.as_str() } else { team.name.as_str() };

    let mut json_ld = json!({
        "@context": "https://schema.org",
        "@type": "SportsEvent",
        "name": name,
        "sport": sport_name,
        "startDate": start_iso,
        "eventAttendanceMode": "https://schema.org/OfflineEventAttendanceMode",
        "homeTeam": { "@type": "SportsTeam", "name": home_name },
        "awayTeam": { "@type": "SportsTeam", "name": away_name },
    });
    if is_home && let Some(venue) = &team.venue {
        json_ld["location"] = json!({ "@type": "Place", "name": venue });
    }
    Some(json_ld)
}

/// Today's OG image path for a team, keyed by the team-local date.
pub fn og_image_path(slug: &str, time_zone: &str) -> String {
    og_image_path_at(slug, time_zone, Utc::now())
}

pub fn og_image_path_at(slug: &str, time_zone: &str, now: DateTime<Utc>) -> String {
    format!("/og/{slug}-{}.png", date_key_in_zone(now, time_zone))
}

#[derive(Debug, Clone)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

/// Page title and description for a team page. The title carries the
/// headline answer; the description is the full status sentence.
pub fn build_team_page_meta(team: &Team, payload: &SchedulePayload) -> PageMeta {
    build_team_page_meta_at(team, payload, Utc::now())
}

pub fn build_team_page_meta_at(
    team: &Team,
    payload: &SchedulePayload,
    now: DateTime<Utc>,
) -> PageMeta {
    let message = format_team_status_at(team, payload, StatusOptions::default(), now);
    let answer = if message.starts_with("Yes") { "Yes" } else { "No" };
    PageMeta {
        title: format!("{} — {} | {}", team.name, answer, SITE_NAME),
        description: message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Sport, TeamId, TeamRef};
    use chrono::TimeZone;

    fn red_sox() -> Team {
        Team {
            id: 111,
            api_id: None,
            slug: "red-sox".into(),
            name: "Boston Red Sox".into(),
            sport: Sport::Mlb,
            venue: Some("Fenway Park".into()),
            timezone: "America/New_York".into(),
            colors: vec![],
        }
    }

    fn game(date: Option<&str>) -> Game {
        Game {
            game_id: Some("1".into()),
            game_date: date.map(|d| {
                DateTime::parse_from_rfc3339(d)
                    .expect("test timestamp")
                    .with_timezone(&Utc)
            }),
            home_team: TeamRef { name: "Boston Red Sox".into(), id: Some(TeamId::Num(111)) },
            away_team: TeamRef { name: "New York Yankees".into(), id: Some(TeamId::Num(147)) },
            venue: Some("Fenway Park".into()),
            start_time_tbd: false,
            status: Some("Scheduled".into()),
        }
    }

    #[test]
    fn home_event_carries_opponent_venue_and_start() {
        let g = game(Some("2024-07-04T23:05:00Z"));
        let ld = build_sports_event_json_ld(&red_sox(), Some(&g), true, None, "Baseball").unwrap();
        assert_eq!(ld["name"], "Boston Red Sox vs New York Yankees");
        assert_eq!(ld["sport"], "Baseball");
        assert_eq!(ld["startDate"], "2024-07-04T23:05:00Z");
        assert_eq!(ld["homeTeam"]["name"], "Boston Red Sox");
        assert_eq!(ld["awayTeam"]["name"], "New York Yankees");
        assert_eq!(ld["location"]["name"], "Fenway Park");
    }

    #[test]
    fn away_event_flips_the_matchup_and_drops_location() {
        let away = Game {
            home_team: TeamRef { name: "New York Yankees".into(), id: Some(TeamId::Num(147)) },
            away_team: TeamRef { name: "Boston Red Sox".into(), id: Some(TeamId::Num(111)) },
            ..game(Some("2024-07-04T23:05:00Z"))
        };
        let ld = build_sports_event_json_ld(&red_sox(), Some(&away), false, None, "Baseball").unwrap();
        assert_eq!(ld["name"], "New York Yankees vs Boston Red Sox");
        assert_eq!(ld["homeTeam"]["name"], "New York Yankees");
        assert_eq!(ld["awayTeam"]["name"], "Boston Red Sox");
        assert!(ld.get("location").is_none());
    }

    #[test]
    fn no_selected_game_means_no_event() {
        assert!(build_sports_event_json_ld(&red_sox(), None, true, None, "Baseball").is_none());
    }

    #[test]
    fn undated_game_falls_back_to_midnight_of_the_page_date() {
        let g = game(None);
        let fallback = NaiveDate::from_ymd_opt(2024, 7, 4);
        let ld = build_sports_event_json_ld(&red_sox(), Some(&g), true, fallback, "Baseball").unwrap();
        assert_eq!(ld["startDate"], "2024-07-04T00:00:00Z");

        assert!(build_sports_event_json_ld(&red_sox(), Some(&g), true, None, "Baseball").is_none());
    }

    #[test]
    fn selects_home_game_over_away_game() {
        let facts = ScheduleFacts {
            home_games_today: vec![game(Some("2024-07-04T23:05:00Z"))],
            away_games_today: vec![game(Some("2024-07-04T17:10:00Z"))],
            ..ScheduleFacts::default()
        };
        let (selected, is_home) = select_game_for_team_today(&facts);
        assert!(is_home);
        assert_eq!(selected.unwrap().game_date, facts.home_games_today[0].game_date);

        let away_only = ScheduleFacts {
            away_games_today: vec![game(Some("2024-07-04T17:10:00Z"))],
            ..ScheduleFacts::default()
        };
        let (selected, is_home) = select_game_for_team_today(&away_only);
        assert!(!is_home);
        assert!(selected.is_some());

        let neither = ScheduleFacts::default();
        let (selected, is_home) = select_game_for_team_today(&neither);
        assert!(selected.is_none());
        assert!(!is_home);
    }

    #[test]
    fn og_path_uses_team_local_date_key() {
        let now = Utc.with_ymd_and_hms(2024, 7, 5, 2, 0, 0).unwrap();
        assert_eq!(
            og_image_path_at("red-sox", "America/New_York", now),
            "/og/red-sox-2024-07-04.png"
        );
    }

    #[test]
    fn page_meta_answers_in_the_title() {
        let p = SchedulePayload::default();
        let now = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let meta = build_team_page_meta_at(&red_sox(), &p, now);
        assert_eq!(meta.title, "Boston Red Sox — No | homegame.today");
        assert_eq!(
            meta.description,
            "No, the next game at Fenway Park is not yet scheduled."
        );
    }
}
