//! Rider facade: profile page plus the result query endpoints.

use anyhow::{Context, Result};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::PcsClient;
use crate::parsers::listing_pages::{
    parse_offset_options, parse_points_sum, parse_rider_history_rows,
};
use crate::parsers::rider_profile::{parse_rider_profile, parse_team_history, RiderProfile, TeamSeason};
use crate::types::{RaceHistoryFilter, RaceHistoryRow};
use crate::urls::{rider_path, rider_results_query, rider_season_points_query, slugify, SeasonRanking};

/// A rider, pinned to their profile page. Accepts either the display
/// name or the site's slug (needed for riders whose slug carries a
/// disambiguating number).
pub struct Rider {
    client: PcsClient,
    slug: String,
    page: Html,
}

impl Rider {
    pub fn fetch(client: &PcsClient, name: &str) -> Result<Self> {
        let slug = slugify(name);
        let body = client
            .fetch_page(&rider_path(name))
            .with_context(|| format!("failed to fetch rider {slug}"))?;
        Ok(Self {
            client: client.clone(),
            slug,
            page: Html::parse_document(&body),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn profile(&self) -> Result<RiderProfile> {
        Ok(parse_rider_profile(&self.page)?)
    }

    /// Season-by-season team history, future seasons included when the
    /// rider has already signed.
    pub fn team_history(&self) -> Result<Vec<TeamSeason>> {
        Ok(parse_team_history(&self.page)?)
    }

    /// The rider's race history from the paginated result query. Pages
    /// are fetched strictly in sequence, each with the same filter set.
    pub fn race_history(&self, filter: &RaceHistoryFilter) -> Result<Vec<RaceHistoryRow>> {
        let first_url = rider_results_query(&self.slug, filter, 0);
        let first = Html::parse_document(&self.client.fetch_page(&first_url)?);

        let offsets = parse_offset_options(&first);
        debug!(slug = %self.slug, pages = offsets.len().max(1), "rider result query");

        let mut rows = parse_rider_history_rows(&first)?;
        for &offset in offsets.iter().filter(|&&offset| offset != 0) {
            let url = rider_results_query(&self.slug, filter, offset);
            let page = Html::parse_document(&self.client.fetch_page(&url)?);
            rows.extend(parse_rider_history_rows(&page)?);
        }

        Ok(rows)
    }

    /// UCI points total for one season; 0 when the ranking table does
    /// not cover that year.
    pub fn season_uci_points(&self, season: u16) -> Result<u32> {
        let url = rider_season_points_query(&self.slug, season, SeasonRanking::UciWorld);
        let page = Html::parse_document(&self.client.fetch_page(&url)?);
        Ok(parse_points_sum(&page))
    }

    /// PCS points total for one season.
    pub fn season_pcs_points(&self, season: u16) -> Result<u32> {
        let url = rider_season_points_query(&self.slug, season, SeasonRanking::PcsSeason);
        let page = Html::parse_document(&self.client.fetch_page(&url)?);
        Ok(parse_points_sum(&page))
    }

    /// The rider's best career results, ranked by PCS points within each
    /// category.
    pub fn palmares(&self, top: usize) -> Result<Palmares> {
        let history = self.race_history(&RaceHistoryFilter::default())?;
        Ok(build_palmares(&history, top))
    }
}

/// Top results per category of a rider's career.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palmares {
    pub one_day: Vec<RaceHistoryRow>,
    pub stages: Vec<RaceHistoryRow>,
    pub gc: Vec<RaceHistoryRow>,
    pub kom: Vec<RaceHistoryRow>,
    pub points: Vec<RaceHistoryRow>,
}

/// Splits a race history into the five palmares categories, keeping the
/// `top` highest-PCS-point rows of each.
pub fn build_palmares(history: &[RaceHistoryRow], top: usize) -> Palmares {
    let top_by = |pred: &dyn Fn(&RaceHistoryRow) -> bool| -> Vec<RaceHistoryRow> {
        let mut rows: Vec<RaceHistoryRow> =
            history.iter().filter(|row| pred(row)).cloned().collect();
        rows.sort_by(|a, b| b.pcs_points_value().cmp(&a.pcs_points_value()));
        rows.truncate(top);
        rows
    };

    Palmares {
        one_day: top_by(&|row| row.race.href.contains("result")),
        stages: top_by(&|row| {
            row.race.name.contains("Stage") || row.race.name.contains("Prologue")
        }),
        gc: top_by(&|row| row.race.href.contains("gc")),
        kom: top_by(&|row| row.race.href.contains("kom")),
        points: top_by(&|row| row.race.href.contains("points")),
    }
}
