mod teams;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use homegame_api::client::{sport_from_tag, ScheduleApi};
use homegame_api::facts::derive_team_schedule_facts;
use homegame_api::seo::{build_sports_event_json_ld, og_image_path, select_game_for_team_today};
use homegame_api::status::{format_team_status, StatusOptions};
use homegame_api::time::{compute_window_start_end, HORIZON_MONTHS};
use homegame_api::{SchedulePayload, Team};
use log::error;

#[derive(Parser)]
#[command(name = "homegame", version, about = "Is there a home game today?")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the status line for one team, or for every team when no slug is given
    Status {
        slug: Option<String>,
        /// Prefix each line with the team name
        #[arg(long)]
        team_name: bool,
        /// Harden date/time substrings with non-breaking spaces
        #[arg(long)]
        nbsp: bool,
    },
    /// Print a team's derived schedule facts (and SportsEvent JSON-LD) as JSON
    Facts { slug: String },
    /// Count league-wide games today for a sport (mlb|nhl|nba|nfl)
    Today { sport: String },
    /// Print today's OG image path for a team
    OgPath { slug: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let all_teams = teams::load_teams()?;
    let api = ScheduleApi::new();

    match cli.command {
        Command::Status { slug, team_name, nbsp } => {
            let opts = StatusOptions { include_team_name: team_name, nbsp, ..Default::default() };
            match slug {
                Some(slug) => {
                    let team = require_team(&all_teams, &slug)?;
                    let payload = fetch_window(&api, team).await?;
                    println!("{}", format_team_status(team, &payload, opts));
                }
                None => {
                    // Build-style sweep: log a bad team and keep going.
                    for team in &all_teams {
                        match fetch_window(&api, team).await {
                            Ok(payload) => println!(
                                "{}: {}",
                                team.slug,
                                format_team_status(team, &payload, opts)
                            ),
                            Err(err) => error!("{}: {err:#}", team.slug),
                        }
                    }
                }
            }
        }
        Command::Facts { slug } => {
            let team = require_team(&all_teams, &slug)?;
            let payload = fetch_window(&api, team).await?;
            let facts = derive_team_schedule_facts(team, &payload);
            let (selected, is_home) = select_game_for_team_today(&facts);
            let json_ld = build_sports_event_json_ld(
                team,
                selected,
                is_home,
                facts.today_key.parse().ok(),
                team.sport.display_name(),
            );
            let mut doc = serde_json::to_value(&facts)?;
            if let Some(ld) = json_ld {
                doc["jsonLd"] = ld;
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Today { sport } => {
            let sport = sport_from_tag(Some(sport.as_str()))?;
            let payload = api.fetch_league_schedule_today(sport).await?;
            println!("{} {} games today", payload.total_items, sport);
        }
        Command::OgPath { slug } => {
            let team = require_team(&all_teams, &slug)?;
            println!("{}", og_image_path(&team.slug, &team.timezone));
        }
    }

    Ok(())
}

async fn fetch_window(api: &ScheduleApi, team: &Team) -> Result<SchedulePayload> {
    let (start, end) = compute_window_start_end(chrono::Utc::now(), HORIZON_MONTHS);
    api.fetch_schedule_window_cached(team, start, end)
        .await
        .with_context(|| format!("fetching schedule for {}", team.slug))
}

fn require_team<'a>(all_teams: &'a [Team], slug: &str) -> Result<&'a Team> {
    teams::find_team(all_teams, slug).with_context(|| format!("unknown team slug: {slug}"))
}
