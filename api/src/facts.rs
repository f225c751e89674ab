//! Derives the per-team schedule summary (today's games, home/away splits,
//! next upcoming home game) from a normalized schedule payload.

use crate::time::date_key_in_zone;
use crate::{Game, ScheduleFacts, SchedulePayload, Team, TeamId};
use chrono::{DateTime, Utc};

/// A game counts as home for the team when the normalized home id matches,
/// or, failing that, when the venue name matches the configured venue.
/// Postseason neutral-site and reseeded fixtures sometimes report a
/// different nominal home id than the team being profiled.
fn is_home_for_team(game: &Game, team_api_id: &TeamId, team_venue: Option<&str>) -> bool {
    if game.home_team.id.as_ref() == Some(team_api_id) {
        return true;
    }
    let game_venue = game.venue.as_deref().map(normalize_venue).unwrap_or_default();
    let configured = team_venue.map(normalize_venue).unwrap_or_default();
    !game_venue.is_empty() && !configured.is_empty() && game_venue == configured
}

fn normalize_venue(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn derive_team_schedule_facts(team: &Team, payload: &SchedulePayload) -> ScheduleFacts {
    derive_team_schedule_facts_at(team, payload, Utc::now())
}

/// Deterministic variant; `now` anchors both "today" and the next-home-game
/// cutoff.
pub fn derive_team_schedule_facts_at(
    team: &Team,
    payload: &SchedulePayload,
    now: DateTime<Utc>,
) -> ScheduleFacts {
    let games: Vec<Game> = payload.all_games().cloned().collect();
    // Team-local calendar day, not the UTC day the adapters bucket by.
    let today_key = date_key_in_zone(now, &team.timezone);
    let team_api_id = team.api_team_id();
    let team_venue = team.venue.as_deref();

    let games_today: Vec<Game> = games
        .iter()
        .filter(|g| {
            g.game_date
                .is_some_and(|d| date_key_in_zone(d, &team.timezone) == today_key)
        })
        .cloned()
        .collect();
    let home_games_today: Vec<Game> = games_today
        .iter()
        .filter(|g| is_home_for_team(g, &team_api_id, team_venue))
        .cloned()
        .collect();
    let away_games_today: Vec<Game> = games_today
        .iter()
        .filter(|g| g.away_team.id.as_ref() == Some(&team_api_id))
        .cloned()
        .collect();

    let mut upcoming_home: Vec<&Game> = games
        .iter()
        .filter(|g| g.game_date.is_some() && is_home_for_team(g, &team_api_id, team_venue))
        .collect();
    // Stable sort: games with identical timestamps keep their input order.
    upcoming_home.sort_by_key(|g| {
        g.game_date
            .map(|d| d.timestamp_millis())
            .unwrap_or(i64::MAX)
    });
    let next_home_game = upcoming_home
        .into_iter()
        .find(|g| g.game_date.is_some_and(|d| d >= now))
        .cloned();

    ScheduleFacts {
        games,
        team_time_zone: team.timezone.clone(),
        today_key,
        games_today,
        home_games_today,
        away_games_today,
        next_home_game,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DateBucket, Sport, TeamRef};
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

    fn game(id: &str, date: Option<&str>, home_id: i64, away_id: i64, venue: &str) -> Game {
        Game {
            game_id: Some(id.into()),
            game_date: date.map(|d| {
                DateTime::parse_from_rfc3339(d)
                    .expect("test timestamp")
                    .with_timezone(&Utc)
            }),
            home_team: TeamRef { name: "Home".into(), id: Some(TeamId::Num(home_id)) },
            away_team: TeamRef { name: "Away".into(), id: Some(TeamId::Num(away_id)) },
            venue: Some(venue.into()),
            start_time_tbd: false,
            status: Some("Scheduled".into()),
        }
    }

    fn payload(games: Vec<Game>) -> SchedulePayload {
        SchedulePayload {
            total_items: games.len(),
            dates: vec![DateBucket { date: "".into(), total_games: games.len(), games }],
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn today_key_is_the_team_local_date() {
        // 02:00 UTC on July 5 is the evening of July 4 in Boston.
        let facts = derive_team_schedule_facts_at(&red_sox(), &payload(vec![]), at(2024, 7, 5, 2, 0));
        assert_eq!(facts.today_key, "2024-07-04");
        assert_eq!(facts.team_time_zone, "America/New_York");
    }

    #[test]
    fn game_near_midnight_counts_for_local_today_despite_utc_bucket() {
        // A 9 PM Boston start sits in the next UTC day's bucket but still
        // belongs to the local "today".
        let g = game("1", Some("2024-07-05T01:00:00Z"), 111, 147, "Fenway Park");
        let p = SchedulePayload {
            total_items: 1,
            dates: vec![DateBucket {
                date: "2024-07-05".into(),
                total_games: 1,
                games: vec![g],
            }],
        };
        let facts = derive_team_schedule_facts_at(&red_sox(), &p, at(2024, 7, 4, 20, 0));
        assert_eq!(facts.today_key, "2024-07-04");
        assert_eq!(facts.games_today.len(), 1);
        assert_eq!(facts.home_games_today.len(), 1);
    }

    #[test]
    fn splits_today_into_home_and_away() {
        let home = game("1", Some("2024-07-04T17:10:00Z"), 111, 147, "Fenway Park");
        let away = game("2", Some("2024-07-04T23:05:00Z"), 147, 111, "Yankee Stadium");
        let other = game("3", Some("2024-07-04T20:00:00Z"), 119, 120, "Dodger Stadium");
        let facts = derive_team_schedule_facts_at(
            &red_sox(),
            &payload(vec![home, away, other]),
            at(2024, 7, 4, 12, 0),
        );
        assert_eq!(facts.games_today.len(), 3);
        assert_eq!(facts.home_games_today.len(), 1);
        assert_eq!(facts.home_games_today[0].game_id.as_deref(), Some("1"));
        assert_eq!(facts.away_games_today.len(), 1);
        assert_eq!(facts.away_games_today[0].game_id.as_deref(), Some("2"));
    }

    #[test]
    fn venue_name_fallback_catches_neutral_home_ids() {
        // Reseeded fixture: nominal home id is not ours, but the game is at
        // our building. Matching is case- and whitespace-insensitive.
        let g = game("1", Some("2024-10-05T20:08:00Z"), 999, 147, "  FENWAY PARK ");
        let facts =
            derive_team_schedule_facts_at(&red_sox(), &payload(vec![g]), at(2024, 10, 5, 12, 0));
        assert_eq!(facts.home_games_today.len(), 1);
        assert_eq!(
            facts.next_home_game.as_ref().and_then(|g| g.game_id.as_deref()),
            Some("1")
        );
    }

    #[test]
    fn next_home_game_skips_past_and_away_games() {
        let past = game("1", Some("2024-07-01T23:05:00Z"), 111, 147, "Fenway Park");
        let away = game("2", Some("2024-07-06T23:05:00Z"), 147, 111, "Yankee Stadium");
        let future_late = game("3", Some("2024-07-09T23:05:00Z"), 111, 121, "Fenway Park");
        let future_soon = game("4", Some("2024-07-07T23:05:00Z"), 111, 121, "Fenway Park");
        let facts = derive_team_schedule_facts_at(
            &red_sox(),
            &payload(vec![past, away, future_late, future_soon]),
            at(2024, 7, 4, 12, 0),
        );
        assert_eq!(
            facts.next_home_game.as_ref().and_then(|g| g.game_id.as_deref()),
            Some("4")
        );
    }

    #[test]
    fn next_home_game_ties_keep_input_order() {
        let a = game("a", Some("2024-07-07T23:05:00Z"), 111, 121, "Fenway Park");
        let b = game("b", Some("2024-07-07T23:05:00Z"), 111, 120, "Fenway Park");
        let facts =
            derive_team_schedule_facts_at(&red_sox(), &payload(vec![a, b]), at(2024, 7, 4, 12, 0));
        assert_eq!(
            facts.next_home_game.as_ref().and_then(|g| g.game_id.as_deref()),
            Some("a")
        );
    }

    #[test]
    fn no_home_games_yields_none() {
        let away = game("1", Some("2024-07-06T23:05:00Z"), 147, 111, "Yankee Stadium");
        let facts =
            derive_team_schedule_facts_at(&red_sox(), &payload(vec![away]), at(2024, 7, 4, 12, 0));
        assert!(facts.next_home_game.is_none());
        assert!(facts.home_games_today.is_empty());
    }
}
