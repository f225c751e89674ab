/// Wire types for the NHL web API (api-web.nhle.com).
/// Endpoints: /v1/club-schedule-season/{code}/{season} and /v1/schedule/{date}
use serde::Deserialize;

/// Season-long club schedule, keyed by 3-letter team code + season string.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlClubScheduleResponse {
    #[serde(default)]
    pub games: Vec<NhlGame>,
}

/// League schedule for a week, keyed by date. Games nest under gameWeek.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlWeekScheduleResponse {
    #[serde(default)]
    pub game_week: Vec<NhlGameWeekDay>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlGameWeekDay {
    #[serde(default)]
    pub games: Vec<NhlGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlGame {
    pub id: Option<i64>,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: Option<String>,
    pub home_team: Option<NhlTeam>,
    pub away_team: Option<NhlTeam>,
    pub venue: Option<NhlLocalizedName>,
    /// "OK" for fixed start times, "TBD" for placeholders.
    pub game_schedule_state: Option<String>,
    pub game_state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlTeam {
    pub id: Option<i64>,
    pub abbrev: Option<String>,
    pub common_name: Option<NhlLocalizedName>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct NhlLocalizedName {
    pub default: Option<String>,
}
