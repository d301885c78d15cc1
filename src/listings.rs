//! Year-level listings: the race calendar and the team register.

use anyhow::Result;
use scraper::Html;

use crate::client::PcsClient;
use crate::parsers::listing_pages::{
    parse_race_listing, parse_team_listing, RaceListing, TeamListing,
};
use crate::types::Gender;
use crate::urls::{races_query, teams_query};

/// The race circuits the calendar query can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Circuit {
    WorldTour,
    ProSeries,
    WorldChampionships,
}

impl Circuit {
    fn query_id(self) -> &'static str {
        match self {
            Circuit::WorldTour => "1",
            Circuit::ProSeries => "26",
            Circuit::WorldChampionships => "2",
        }
    }
}

/// Classification codes the calendar query accepts.
pub const RACE_CLASSIFICATIONS: &[&str] = &[
    "1.1", "1.2", "1.2U", "1.Ncup", "1.Pro", "1.UWT", "1.WWT", "2.1", "2.2", "2.2U", "2.Ncup",
    "2.Pro", "2.UWT", "2.WWT", "CC", "NC", "WC", "Olympics",
];

/// All races on the calendar for a year, optionally narrowed to one
/// circuit and/or classification.
pub fn races_by_year(
    client: &PcsClient,
    year: u16,
    circuit: Option<Circuit>,
    classification: Option<&str>,
) -> Result<Vec<RaceListing>> {
    let circuit_id = circuit.map(Circuit::query_id).unwrap_or("");
    let url = races_query(year, circuit_id, classification.unwrap_or(""));
    let page = Html::parse_document(&client.fetch_page(&url)?);
    Ok(parse_race_listing(&page)?)
}

/// The registered top-level teams for a year.
pub fn teams_by_year(client: &PcsClient, year: u16, gender: Gender) -> Result<Vec<TeamListing>> {
    let url = teams_query(year, gender.query_code());
    let page = Html::parse_document(&client.fetch_page(&url)?);
    Ok(parse_team_listing(&page, gender)?)
}
