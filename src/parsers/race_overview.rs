//! Race overview page: title block and key facts.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::node_text;
use crate::error::ScrapeError;

/// General information about a race edition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceInfo {
    pub name: String,
    /// Edition number without its ordinal suffix; absent the first time a
    /// race is run.
    pub edition: Option<String>,
    /// Race classification code, e.g. `2.UWT`.
    pub classification: String,
    pub start_date: String,
    pub end_date: String,
    /// One-day races count as a single stage; rest days are excluded.
    pub num_stages: u32,
}

pub fn parse_race_overview(html: &Html) -> Result<RaceInfo, ScrapeError> {
    let title_sel = Selector::parse("div.page-title div.main h1").unwrap();
    let font_sel = Selector::parse("div.page-title div.main font").unwrap();
    let info_sel = Selector::parse(
        "div.page-content.page-object.default div.w47.left.mb_w100 ul.infolist.fs13 li",
    )
    .unwrap();
    let stage_sel = Selector::parse(
        "div.page-content.page-object.default div.w47.left.mb_w100 ul.list.pad2.flex.fs14 li",
    )
    .unwrap();
    let div_sel = Selector::parse("div").unwrap();

    let name = html
        .select(&title_sel)
        .next()
        .map(node_text)
        .ok_or_else(|| ScrapeError::PageShape("race page without a title".to_string()))?
        .replace("  ", " ");

    // The title row carries the edition ordinal and the classification in
    // parentheses; a first edition has only the classification.
    let fonts: Vec<String> = html.select(&font_sel).map(node_text).collect();
    let classification = fonts
        .last()
        .map(|text| text.replace(['(', ')'], ""))
        .ok_or_else(|| {
            ScrapeError::PageShape("race title without a classification".to_string())
        })?;
    let edition = if fonts.len() > 1 {
        let ordinal = &fonts[0];
        Some(ordinal.get(..ordinal.len().saturating_sub(2)).unwrap_or("").to_string())
    } else {
        None
    };

    let info_rows: Vec<_> = html.select(&info_sel).collect();
    let info_value = |index: usize| -> String {
        info_rows
            .get(index)
            .and_then(|row| row.select(&div_sel).nth(1))
            .map(node_text)
            .unwrap_or_default()
    };
    let start_date = info_value(0);
    let end_date = info_value(1);

    let stage_rows: Vec<_> = html.select(&stage_sel).collect();
    let num_stages = if stage_rows.is_empty() {
        1
    } else {
        stage_rows
            .iter()
            .filter(|row| {
                row.select(&div_sel).nth(3).map(node_text).as_deref() != Some("Restday")
            })
            .count() as u32
    };

    Ok(RaceInfo {
        name,
        edition,
        classification,
        start_date,
        end_date,
        num_stages,
    })
}
