//! Calendar/timezone helpers shared by the adapters, the facts deriver, and
//! the status formatter.

use crate::Game;
use chrono::{DateTime, Months, NaiveDate, Utc};
use chrono_tz::Tz;

/// How far ahead a schedule window reaches by default.
pub const HORIZON_MONTHS: u32 = 9;

/// Resolve an IANA zone id, falling back to UTC for anything unsupported.
fn resolve_zone(time_zone: &str) -> Tz {
    time_zone.parse().unwrap_or(chrono_tz::UTC)
}

/// Format an instant as the calendar date it falls on in the given zone.
/// Invalid zones fall back to the UTC calendar date; never fails.
pub fn date_key_in_zone(instant: DateTime<Utc>, time_zone: &str) -> String {
    instant
        .with_timezone(&resolve_zone(time_zone))
        .format("%Y-%m-%d")
        .to_string()
}

/// Forward-looking fetch window: [UTC calendar date of `from`, same date
/// `months` later]. Month addition preserves the day-of-month, clamping at
/// the end of shorter months.
pub fn compute_window_start_end(from: DateTime<Utc>, months: u32) -> (NaiveDate, NaiveDate) {
    let start = from.date_naive();
    let end = start.checked_add_months(Months::new(months)).unwrap_or(start);
    (start, end)
}

/// Locale date verbosity for rendered status text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    Short,
    #[default]
    Medium,
    Long,
    Full,
}

impl DateStyle {
    fn pattern(self) -> &'static str {
        match self {
            DateStyle::Short => "%-m/%-d/%y",
            DateStyle::Medium => "%b %-d, %Y",
            DateStyle::Long => "%B %-d, %Y",
            DateStyle::Full => "%A, %B %-d, %Y",
        }
    }
}

/// Date and (when certain) time of a game, rendered in a target zone.
#[derive(Debug, Clone, Default)]
pub struct LocalDateTime {
    /// Empty when the game has no known date.
    pub date_part: String,
    pub time_part: Option<String>,
    pub time_certain: bool,
}

/// Whether a normalized game's start time must be withheld from users.
/// Sport-specific placeholder heuristics are resolved by the adapters and
/// stored in `start_time_tbd`; a missing date is always TBD.
pub fn is_start_time_tbd(game: &Game) -> bool {
    game.start_time_tbd || game.game_date.is_none()
}

pub fn local_date_and_optional_time(
    game: &Game,
    time_zone: &str,
    date_style: DateStyle,
) -> LocalDateTime {
    let tz = resolve_zone(time_zone);
    let local = game.game_date.map(|d| d.with_timezone(&tz));
    let date_part = local
        .map(|d| d.format(date_style.pattern()).to_string())
        .unwrap_or_default();
    let time_certain = !is_start_time_tbd(game);
    let time_part = if time_certain {
        local.map(|d| d.format("%-I:%M %p").to_string())
    } else {
        None
    };
    LocalDateTime { date_part, time_part, time_certain }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TeamRef;
    use chrono::TimeZone;

    fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn game_at(date: Option<DateTime<Utc>>, tbd: bool) -> Game {
        Game {
            game_id: Some("1".into()),
            game_date: date,
            home_team: TeamRef::default(),
            away_team: TeamRef::default(),
            venue: None,
            start_time_tbd: tbd,
            status: None,
        }
    }

    #[test]
    fn date_key_crosses_midnight_into_previous_local_day() {
        // 03:00 UTC on July 5 is still July 4 in New York.
        let key = date_key_in_zone(instant(2024, 7, 5, 3, 0), "America/New_York");
        assert_eq!(key, "2024-07-04");
    }

    #[test]
    fn date_key_invalid_zone_falls_back_to_utc() {
        let key = date_key_in_zone(instant(2024, 7, 5, 3, 0), "Not/AZone");
        assert_eq!(key, "2024-07-05");
    }

    #[test]
    fn window_spans_nine_months_by_default_constant() {
        let (start, end) = compute_window_start_end(instant(2024, 1, 15, 12, 0), HORIZON_MONTHS);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());
    }

    #[test]
    fn window_end_clamps_at_shorter_month() {
        let (_, end) = compute_window_start_end(instant(2024, 5, 31, 0, 0), 9);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn window_start_uses_utc_calendar_date() {
        // 23:30 UTC is already "tomorrow" in no zone we consult; the window
        // start is the UTC day of the instant.
        let (start, _) = compute_window_start_end(instant(2024, 7, 4, 23, 30), 1);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 7, 4).unwrap());
    }

    #[test]
    fn local_time_renders_in_team_zone() {
        let g = game_at(Some(instant(2024, 7, 4, 23, 5)), false);
        let parts = local_date_and_optional_time(&g, "America/New_York", DateStyle::Medium);
        assert_eq!(parts.date_part, "Jul 4, 2024");
        assert_eq!(parts.time_part.as_deref(), Some("7:05 PM"));
        assert!(parts.time_certain);
    }

    #[test]
    fn tbd_game_renders_date_only() {
        let g = game_at(Some(instant(2024, 7, 4, 3, 33)), true);
        let parts = local_date_and_optional_time(&g, "America/New_York", DateStyle::Medium);
        assert_eq!(parts.date_part, "Jul 3, 2024");
        assert_eq!(parts.time_part, None);
        assert!(!parts.time_certain);
    }

    #[test]
    fn undated_game_renders_neither_part() {
        let g = game_at(None, false);
        let parts = local_date_and_optional_time(&g, "America/New_York", DateStyle::Medium);
        assert_eq!(parts.date_part, "");
        assert_eq!(parts.time_part, None);
        assert!(!parts.time_certain);
        assert!(is_start_time_tbd(&g));
    }
}
