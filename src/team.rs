//! Team facade: roster, calendar, and name history.

use anyhow::{Context, Result};
use scraper::Html;

use crate::client::PcsClient;
use crate::parsers::listing_pages::{parse_team_race_rows, TeamRaceRow};
use crate::parsers::team_page::{parse_name_history, parse_team_roster};
use crate::types::{RiderRef, TeamRef};
use crate::urls::{slugify, team_path, team_results_query, TeamRaceKind};

/// A team season, pinned to its team page.
pub struct Team {
    client: PcsClient,
    slug: String,
    year: u16,
    page: Html,
}

impl Team {
    pub fn fetch(client: &PcsClient, name: &str, year: u16) -> Result<Self> {
        let slug = slugify(name);
        let body = client
            .fetch_page(&team_path(name, year))
            .with_context(|| format!("failed to fetch team {slug}-{year}"))?;
        Ok(Self {
            client: client.clone(),
            slug,
            year,
            page: Html::parse_document(&body),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// The riders on this season's roster.
    pub fn riders(&self) -> Result<Vec<RiderRef>> {
        Ok(parse_team_roster(&self.page)?)
    }

    /// Races the team appeared in from this season on, one row per race
    /// with the team's best result. National championships list the
    /// riders competing for their country, not the team; pass
    /// `include_national = false` to drop them.
    pub fn race_history(&self, include_national: bool) -> Result<Vec<TeamRaceRow>> {
        let mut races = Vec::new();

        for kind in [TeamRaceKind::StageRace, TeamRaceKind::OneDay] {
            let url = team_results_query(&self.slug, self.year, kind);
            let page = Html::parse_document(&self.client.fetch_page(&url)?);
            races.extend(parse_team_race_rows(&page)?);
        }

        if !include_national {
            races.retain(|row| !row.race.name.contains("National"));
        }

        Ok(races)
    }

    /// Every season of the team, under whichever sponsor name it carried
    /// that year.
    pub fn name_history(&self) -> Result<Vec<TeamRef>> {
        Ok(parse_name_history(&self.page)?)
    }
}
