//! Renders the canonical "Yes/No, game at venue…" answer for a team. Both
//! the OG-image text and the social posts go through here so the wording
//! never drifts between surfaces.

use crate::facts::derive_team_schedule_facts_at;
use crate::time::{local_date_and_optional_time, DateStyle};
use crate::{SchedulePayload, Team};
use chrono::{DateTime, Utc};

const FALLBACK_VENUE: &str = "their stadium";

#[derive(Debug, Clone, Copy, Default)]
pub struct StatusOptions {
    /// Prefix the sentence with "{team name} — ".
    pub include_team_name: bool,
    /// Replace spaces inside rendered date/time substrings with non-breaking
    /// spaces so the text never wraps mid-value in rendered images.
    pub nbsp: bool,
    pub date_style: DateStyle,
}

pub fn format_team_status(team: &Team, payload: &SchedulePayload, opts: StatusOptions) -> String {
    format_team_status_at(team, payload, opts, Utc::now())
}

/// Deterministic variant; `now` anchors "today" and the next-game cutoff.
pub fn format_team_status_at(
    team: &Team,
    payload: &SchedulePayload,
    opts: StatusOptions,
    now: DateTime<Utc>,
) -> String {
    let venue = team.venue.as_deref().unwrap_or(FALLBACK_VENUE);
    let facts = derive_team_schedule_facts_at(team, payload, now);

    let prefix = if opts.include_team_name {
        format!("{} — ", team.name)
    } else {
        String::new()
    };
    let space = if opts.nbsp { '\u{a0}' } else { ' ' };
    let nb = |s: &str| -> String {
        if opts.nbsp {
            s.replace(' ', "\u{a0}")
        } else {
            s.to_owned()
        }
    };

    // Highest priority: a home game today, rendered with its clock time
    // unless that time is still a placeholder.
    if let Some(game) = facts.home_games_today.first() {
        let parts = local_date_and_optional_time(game, &team.timezone, opts.date_style);
        return match parts.time_part.filter(|_| parts.time_certain) {
            Some(time) => format!(
                "{prefix}Yes, today's game at {venue} is scheduled for {}.",
                nb(&time)
            ),
            None => format!("{prefix}Yes, today's game at {venue} is scheduled."),
        };
    }

    // Next upcoming home game, date-only when the time is TBD.
    if let Some(game) = &facts.next_home_game {
        let parts = local_date_and_optional_time(game, &team.timezone, opts.date_style);
        let safe_date = nb(&parts.date_part);
        return match parts.time_part.filter(|_| parts.time_certain) {
            Some(time) => format!(
                "{prefix}No, the next game at {venue} is scheduled for {safe_date} at{space}{}.",
                nb(&time)
            ),
            None => {
                format!("{prefix}No, the next game at {venue} is scheduled for {safe_date}.")
            }
        };
    }

    format!("{prefix}No, the next game at {venue} is not yet scheduled.")
}
