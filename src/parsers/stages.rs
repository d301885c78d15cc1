//! Stage list and per-stage info pages of a stage race.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::{first_link, node_text};
use crate::error::ScrapeError;
use crate::normalize::normalize_date;

/// One stage in a race's stage table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRef {
    pub date: String,
    pub name: String,
    /// Stage number within the race; a prologue is stage 0.
    pub number: i32,
    pub href: String,
    pub slug: String,
}

/// Parses the stage table. Stage numbers count from 1 in row order and
/// shift down by one when the race opens with a prologue.
pub fn parse_stages(html: &Html, year: u16) -> Result<Vec<StageRef>, ScrapeError> {
    let row_sel = Selector::parse("div.page-content.page-object.default tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let mut stages = Vec::new();

    for (index, row) in html.select(&row_sel).enumerate() {
        let cells: Vec<_> = row.select(&cell_sel).collect();

        let date_cell = cells.first().map(|&c| node_text(c)).unwrap_or_default();
        let date = format!("{}-{}", year, date_cell.replace('/', "-"));

        let name_cell = cells.get(2).ok_or_else(|| {
            ScrapeError::PageShape("stage row without a name column".to_string())
        })?;
        let (name, href) = first_link(*name_cell).ok_or_else(|| {
            ScrapeError::PageShape("stage row without a stage link".to_string())
        })?;
        let slug = href.rsplit('/').next().unwrap_or_default().to_string();

        stages.push(StageRef {
            date,
            name,
            number: index as i32 + 1,
            href,
            slug,
        });
    }

    if stages.first().is_some_and(|s| s.name.contains("Prologue")) {
        for stage in &mut stages {
            stage.number -= 1;
        }
    }

    Ok(stages)
}

/// Defining details of one stage; fields the page does not print stay
/// absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageInfo {
    pub date: Option<String>,
    pub start_time_local: Option<String>,
    pub distance_km: Option<String>,
    pub parcours_type: Option<String>,
    pub finish_type: Option<String>,
    pub profile_score: Option<String>,
    pub vertical_meters: Option<String>,
    pub startlist_score: Option<String>,
}

/// Parses the right-hand info list of a stage page. The list's row order
/// is fixed by the site; the profile icon's `p1`–`p5` class encodes
/// parcours and finish type.
pub fn parse_stage_info(html: &Html) -> Result<StageInfo, ScrapeError> {
    let row_sel = Selector::parse("div.w30.right.mb_w100 ul.infolist li").unwrap();
    let div_sel = Selector::parse("div").unwrap();
    let span_sel = Selector::parse("span").unwrap();

    let mut info = StageInfo::default();

    for (index, row) in html.select(&row_sel).enumerate() {
        let Some(value) = row.select(&div_sel).nth(1) else {
            continue;
        };
        let text = node_text(value);

        match index {
            0 => info.date = Some(normalize_date(&text)?),
            1 => {
                info.start_time_local =
                    text.split(' ').next().map(str::to_string);
            }
            4 => info.distance_km = text.split(' ').next().map(str::to_string),
            6 => {
                let profile_class = value
                    .select(&span_sel)
                    .next()
                    .and_then(|span| span.value().classes().last())
                    .unwrap_or_default();
                let (parcours, finish) = match profile_class {
                    "p1" => ("flat", "flat"),
                    "p2" => ("hilly", "flat"),
                    "p3" => ("hilly", "uphill"),
                    "p4" => ("mountain", "flat"),
                    "p5" => ("mountain", "uphill"),
                    _ => continue,
                };
                info.parcours_type = Some(parcours.to_string());
                info.finish_type = Some(finish.to_string());
            }
            7 => info.profile_score = Some(text),
            8 => info.vertical_meters = Some(text),
            12 => info.startlist_score = Some(text),
            _ => {}
        }
    }

    Ok(info)
}
