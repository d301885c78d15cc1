//! CLI commands for velostats.
//!
//! Every command fetches the relevant pages and prints the normalized
//! records as JSON on stdout.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::client::PcsClient;
use crate::config::ScraperConfig;
use crate::listings::{races_by_year, teams_by_year, Circuit};
use crate::race::Race;
use crate::rider::Rider;
use crate::team::Team;
use crate::types::{Gender, RaceHistoryFilter, RaceType};

#[derive(Parser)]
#[command(name = "velostats")]
#[command(version, about = "Cycling statistics from procyclingstats.com", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a rider's profile and team history
    Rider {
        /// Rider name or slug (e.g. "tadej-pogacar")
        name: String,
    },

    /// List a rider's race history
    RiderHistory {
        name: String,

        /// Restrict to one season
        #[arg(short, long)]
        season: Option<u16>,

        /// Drop team time trial results
        #[arg(long)]
        exclude_ttt: bool,

        /// Race type filter (stage, prologue, tt, gc, points, youth, kom, one-day)
        #[arg(short, long, default_value = "any")]
        race_type: String,
    },

    /// Show a rider's best results per category
    RiderPalmares {
        name: String,

        /// Results to keep per category
        #[arg(short, long, default_value_t = 5)]
        top: usize,
    },

    /// Show a team's roster for a season
    Team {
        name: String,

        #[arg(short, long)]
        year: u16,
    },

    /// Show a race's general information and main result
    Race {
        name: String,

        #[arg(short, long)]
        year: u16,
    },

    /// Show the start list of a race
    Startlist {
        name: String,

        #[arg(short, long)]
        year: u16,
    },

    /// List the stages of a race
    Stages {
        name: String,

        #[arg(short, long)]
        year: u16,
    },

    /// Show the results of one stage
    StageResults {
        name: String,

        #[arg(short, long)]
        year: u16,

        /// Stage slug (e.g. "stage-4")
        #[arg(short, long)]
        stage: String,
    },

    /// List the races on a year's calendar
    Races {
        #[arg(short, long)]
        year: u16,

        /// Circuit filter (world-tour, pro-series, world-championships)
        #[arg(short, long)]
        circuit: Option<String>,

        /// Classification filter (e.g. "2.UWT")
        #[arg(long)]
        class: Option<String>,
    },

    /// List the registered teams for a year
    Teams {
        #[arg(short, long)]
        year: u16,

        /// men or women
        #[arg(short, long, default_value = "men")]
        gender: String,
    },
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = ScraperConfig::load()?;
    let client = PcsClient::new(&config)?;

    match cli.command {
        Commands::Rider { name } => {
            let rider = Rider::fetch(&client, &name)?;
            print_json(&rider.profile()?)?;
            print_json(&rider.team_history()?)
        }
        Commands::RiderHistory {
            name,
            season,
            exclude_ttt,
            race_type,
        } => {
            let filter = RaceHistoryFilter {
                season,
                exclude_ttt,
                race_type: parse_race_type(&race_type)?,
            };
            let rider = Rider::fetch(&client, &name)?;
            print_json(&rider.race_history(&filter)?)
        }
        Commands::RiderPalmares { name, top } => {
            let rider = Rider::fetch(&client, &name)?;
            print_json(&rider.palmares(top)?)
        }
        Commands::Team { name, year } => {
            let team = Team::fetch(&client, &name, year)?;
            print_json(&team.riders()?)
        }
        Commands::Race { name, year } => {
            let race = Race::fetch(&client, &name, year)?;
            print_json(&race.info()?)?;
            print_json(&race.results()?)
        }
        Commands::Startlist { name, year } => {
            let race = Race::fetch(&client, &name, year)?;
            print_json(&race.startlist()?)
        }
        Commands::Stages { name, year } => {
            let race = Race::fetch(&client, &name, year)?;
            print_json(&race.stages()?)
        }
        Commands::StageResults { name, year, stage } => {
            let race = Race::fetch(&client, &name, year)?;
            print_json(&race.stage_results(&stage)?)
        }
        Commands::Races {
            year,
            circuit,
            class,
        } => {
            let circuit = circuit.as_deref().map(parse_circuit).transpose()?;
            let races = races_by_year(&client, year, circuit, class.as_deref())?;
            print_json(&races)
        }
        Commands::Teams { year, gender } => {
            let teams = teams_by_year(&client, year, parse_gender(&gender)?)?;
            print_json(&teams)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn parse_race_type(text: &str) -> Result<RaceType> {
    let race_type = match text {
        "any" | "" => RaceType::Any,
        "stage" => RaceType::Stage,
        "prologue" => RaceType::Prologue,
        "tt" | "time-trial" => RaceType::TimeTrial,
        "gc" | "general-classification" => RaceType::GeneralClassification,
        "points" | "sprint" => RaceType::PointsClassification,
        "youth" => RaceType::YouthClassification,
        "kom" | "mountains" => RaceType::MountainsClassification,
        "one-day" => RaceType::OneDay,
        other => bail!("unknown race type {other:?}"),
    };
    Ok(race_type)
}

fn parse_circuit(text: &str) -> Result<Circuit> {
    let circuit = match text {
        "world-tour" => Circuit::WorldTour,
        "pro-series" => Circuit::ProSeries,
        "world-championships" => Circuit::WorldChampionships,
        other => bail!("unknown circuit {other:?}"),
    };
    Ok(circuit)
}

fn parse_gender(text: &str) -> Result<Gender> {
    let gender = match text {
        "men" | "m" => Gender::Men,
        "women" | "w" => Gender::Women,
        other => bail!("unknown gender {other:?}"),
    };
    Ok(gender)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_race_type() {
        assert_eq!(parse_race_type("any").unwrap(), RaceType::Any);
        assert_eq!(parse_race_type("kom").unwrap(), RaceType::MountainsClassification);
        assert_eq!(parse_race_type("one-day").unwrap(), RaceType::OneDay);
        assert!(parse_race_type("crit").is_err());
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("men").unwrap(), Gender::Men);
        assert_eq!(parse_gender("w").unwrap(), Gender::Women);
        assert!(parse_gender("x").is_err());
    }
}
