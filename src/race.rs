//! Race facade: overview, start list, results, stages, classifications.

use anyhow::{Context, Result};
use scraper::{Html, Selector};
use tracing::info;

use crate::client::PcsClient;
use crate::error::ScrapeError;
use crate::parsers::complementary::{
    extract_complementary, ComplementaryRow, PointsClassification,
};
use crate::parsers::race_overview::{parse_race_overview, RaceInfo};
use crate::parsers::results::{
    extract_container, result_containers, result_tab_index, Column, ResultTab, GC_COLUMNS,
    POINTS_COLUMNS, RESULT_COLUMNS,
};
use crate::parsers::stages::{parse_stage_info, parse_stages, StageInfo, StageRef};
use crate::parsers::startlist::parse_startlist;
use crate::types::{ResultRow, StartList};
use crate::urls::{race_path, slugify, RacePage};

/// A race edition, pinned to its overview page. Further pages (start
/// list, stages, results) are fetched on demand, one blocking request at
/// a time.
pub struct Race {
    client: PcsClient,
    slug: String,
    year: u16,
    overview: Html,
}

impl Race {
    pub fn fetch(client: &PcsClient, name: &str, year: u16) -> Result<Self> {
        let slug = slugify(name);
        let body = client
            .fetch_page(&race_path(name, year, &RacePage::Overview))
            .with_context(|| format!("failed to fetch race {slug}/{year}"))?;
        Ok(Self {
            client: client.clone(),
            slug,
            year,
            overview: Html::parse_document(&body),
        })
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    fn fetch_page(&self, page: &RacePage) -> Result<Html> {
        let body = self.client.fetch_page(&race_path(&self.slug, self.year, page))?;
        Ok(Html::parse_document(&body))
    }

    /// General information from the overview page.
    pub fn info(&self) -> Result<RaceInfo> {
        Ok(parse_race_overview(&self.overview)?)
    }

    /// The start list: every entered rider with their team.
    pub fn startlist(&self) -> Result<StartList> {
        let page = self.fetch_page(&RacePage::Startlist)?;
        Ok(parse_startlist(&page)?)
    }

    /// The race's main result: the single result of a one-day race, or
    /// the final GC of a stage race.
    pub fn results(&self) -> Result<Vec<ResultRow>> {
        let page = self.fetch_page(&RacePage::Results)?;
        let containers = result_containers(&page);

        // One container on a one-day race page; on a stage race page the
        // second holds the final GC.
        let container = match containers.len() {
            0 => {
                return Err(ScrapeError::PageShape(
                    "race results page without a result container".to_string(),
                )
                .into())
            }
            1 => containers[0],
            _ => containers[1],
        };

        Ok(extract_container(container, RESULT_COLUMNS)?)
    }

    /// The stage table of a stage race.
    pub fn stages(&self) -> Result<Vec<StageRef>> {
        let page = self.fetch_page(&RacePage::Stages)?;
        Ok(parse_stages(&page, self.year)?)
    }

    /// Per-stage details. `None` reads the main results page, which is
    /// where one-day races print theirs.
    pub fn stage_info(&self, stage: Option<&str>) -> Result<StageInfo> {
        let page = match stage {
            Some(stage) => self.fetch_page(&RacePage::Stage(stage.to_string()))?,
            None => self.fetch_page(&RacePage::Results)?,
        };
        Ok(parse_stage_info(&page)?)
    }

    /// The time-based result of one stage. A cancelled stage yields an
    /// empty result set.
    pub fn stage_results(&self, stage: &str) -> Result<Vec<ResultRow>> {
        let page = self.fetch_page(&RacePage::Stage(stage.to_string()))?;

        if stage_cancelled(&page) {
            info!(slug = %self.slug, stage, "stage cancelled, no results");
            return Ok(Vec::new());
        }

        let container = self.tab_container(&page, ResultTab::Stage)?;
        Ok(extract_container(container, RESULT_COLUMNS)?)
    }

    /// The GC standings after one stage.
    pub fn gc_after_stage(&self, stage: &str) -> Result<Vec<ResultRow>> {
        self.classification_after_stage(stage, ResultTab::GeneralClassification, GC_COLUMNS)
    }

    /// The points classification standings after one stage.
    pub fn points_after_stage(&self, stage: &str) -> Result<Vec<ResultRow>> {
        self.classification_after_stage(stage, ResultTab::Points, POINTS_COLUMNS)
    }

    /// The mountains classification standings after one stage.
    pub fn kom_after_stage(&self, stage: &str) -> Result<Vec<ResultRow>> {
        self.classification_after_stage(stage, ResultTab::Kom, POINTS_COLUMNS)
    }

    fn classification_after_stage(
        &self,
        stage: &str,
        tab: ResultTab,
        columns: &[Column],
    ) -> Result<Vec<ResultRow>> {
        let page = self.fetch_page(&RacePage::Stage(stage.to_string()))?;
        let container = self.tab_container(&page, tab)?;
        Ok(extract_container(container, columns)?)
    }

    fn tab_container<'a>(
        &self,
        page: &'a Html,
        tab: ResultTab,
    ) -> Result<scraper::ElementRef<'a>> {
        let index = result_tab_index(page, tab).ok_or_else(|| {
            ScrapeError::PageShape(format!("no result tab for {tab:?}"))
        })?;
        let containers = result_containers(page);
        containers.get(index).copied().ok_or_else(|| {
            ScrapeError::PageShape(format!("no result container at tab index {index}")).into()
        })
    }

    /// The intermediate sprint points awarded during one stage. The
    /// start list is an explicit input: secondary tables print team
    /// names without links and identity comes from exact-text lookup.
    pub fn stage_sprint_points(
        &self,
        stage: &str,
        start_list: &StartList,
    ) -> Result<Vec<ComplementaryRow>> {
        self.complementary_points(stage, start_list, PointsClassification::Sprint)
    }

    /// The KOM points awarded during one stage.
    pub fn stage_kom_points(
        &self,
        stage: &str,
        start_list: &StartList,
    ) -> Result<Vec<ComplementaryRow>> {
        self.complementary_points(stage, start_list, PointsClassification::Kom)
    }

    fn complementary_points(
        &self,
        stage: &str,
        start_list: &StartList,
        classification: PointsClassification,
    ) -> Result<Vec<ComplementaryRow>> {
        let page = self.fetch_page(&RacePage::ComplementaryResults(stage.to_string()))?;
        Ok(extract_complementary(
            &page,
            start_list,
            POINTS_COLUMNS,
            classification,
        )?)
    }
}

const CANCELLATION_MARKERS: &[&str] = &[
    "cancelled",
    "Cancelled",
    "Coronavirus",
    "coronavirus",
    "Corona-virus",
    "corona-virus",
];

/// A cancelled stage prints a notice where the result tables would be.
fn stage_cancelled(page: &Html) -> bool {
    let sel = Selector::parse("div.w68.left.mb_w100 div").unwrap();
    let Some(first) = page.select(&sel).next() else {
        return false;
    };
    let text = first.text().collect::<String>();
    CANCELLATION_MARKERS.iter().any(|marker| text.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_cancelled_detection() {
        let html = Html::parse_document(
            r#"<div class="w68 left mb_w100"><div>Stage cancelled due to Coronavirus measures.</div></div>"#,
        );
        assert!(stage_cancelled(&html));

        let html = Html::parse_document(
            r#"<div class="w68 left mb_w100"><div>Results</div></div>"#,
        );
        assert!(!stage_cancelled(&html));
    }
}
