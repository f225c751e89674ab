/// Wire types for the MLB Stats API schedule endpoints.
/// Endpoints: https://statsapi.mlb.com/api/v1/schedule{,/postseason}
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbScheduleResponse {
    #[serde(default)]
    pub dates: Vec<MlbDate>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbDate {
    pub date: Option<String>,
    #[serde(default)]
    pub games: Vec<MlbGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MlbGame {
    /// Stable upstream game identifier; the merge de-dup key.
    pub game_pk: Option<i64>,
    /// ISO-8601 instant. Postseason placeholder records may omit it.
    pub game_date: Option<String>,
    pub status: Option<MlbStatus>,
    pub teams: Option<MlbGameTeams>,
    pub venue: Option<MlbVenue>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbStatus {
    #[serde(rename = "detailedState")]
    pub detailed_state: Option<String>,
    #[serde(rename = "abstractGameState")]
    pub abstract_game_state: Option<String>,
    #[serde(rename = "startTimeTBD")]
    pub start_time_tbd: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbGameTeams {
    pub home: Option<MlbGameSide>,
    pub away: Option<MlbGameSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbGameSide {
    pub team: Option<MlbTeamInfo>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbTeamInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MlbVenue {
    pub name: Option<String>,
}
