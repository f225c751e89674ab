use anyhow::{bail, Context, Result};
use homegame_api::Team;
use std::collections::HashSet;

/// Team table embedded at build time, like the rest of the site config.
static TEAMS_JSON: &str = include_str!("../teams.json");

/// Load the static team configuration. Slugs double as subdomains and file
/// names, so a duplicate slug fails the build run outright.
pub fn load_teams() -> Result<Vec<Team>> {
    let teams: Vec<Team> =
        serde_json::from_str(TEAMS_JSON).context("teams.json is not valid team configuration")?;
    validate_slugs(&teams)?;
    Ok(teams)
}

fn validate_slugs(teams: &[Team]) -> Result<()> {
    let mut seen = HashSet::new();
    for team in teams {
        if !seen.insert(team.slug.as_str()) {
            bail!("duplicate team slug: {}", team.slug);
        }
    }
    Ok(())
}

pub fn find_team<'a>(teams: &'a [Team], slug: &str) -> Option<&'a Team> {
    teams.iter().find(|t| t.slug == slug)
}
