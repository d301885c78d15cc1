//! Intermediate sprint and KOM points tables.
//!
//! A stage's complementary-results page holds an unordered run of
//! heading/table pairs, one per intermediate sprint or climb. Tables are
//! picked by matching the heading against the requested classification;
//! the printed team name carries no link here, so team identity comes
//! from an exact-text lookup against the race start list.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::results::{select_columns, Column};
use super::{first_link, node_text};
use crate::error::ScrapeError;
use crate::normalize::{capitalize, reorder_printed_name};
use crate::types::{RiderRef, StartList, TeamRef};

/// The two secondary classifications awarded mid-stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsClassification {
    Sprint,
    Kom,
}

impl PointsClassification {
    fn heading_matches(self, heading: &str) -> bool {
        match self {
            PointsClassification::Sprint => ["Sprint |", "Points at finish", "Finishline points"]
                .iter()
                .any(|needle| heading.contains(needle)),
            PointsClassification::Kom => heading.contains("KOM"),
        }
    }
}

/// One rider's points at one intermediate event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplementaryRow {
    /// Heading text of the table the row came from — which sprint or
    /// climb it was.
    pub event: String,
    pub rank: String,
    pub rider: RiderRef,
    pub team: TeamRef,
    pub points: u32,
}

/// Complementary tables print the surname block in mixed case; force the
/// uppercase-surname convention (everything upper, the trailing given
/// name re-cased) before the usual reordering.
fn renormalize_rider_name(printed: &str) -> String {
    let mut tokens: Vec<String> = printed
        .split_whitespace()
        .map(|t| t.to_uppercase())
        .collect();
    if let Some(last) = tokens.last_mut() {
        *last = capitalize(last);
    }
    reorder_printed_name(&tokens.join(" "))
}

/// Extracts every qualifying heading/table pair for one classification.
pub fn extract_complementary(
    html: &Html,
    start_list: &StartList,
    wanted: &[Column],
    classification: PointsClassification,
) -> Result<Vec<ComplementaryRow>, ScrapeError> {
    let heading_sel = Selector::parse("div.page-content.page-object.default h3").unwrap();
    let table_sel =
        Selector::parse("div.page-content.page-object.default table.basic").unwrap();
    let th_sel = Selector::parse("thead th").unwrap();
    let row_sel = Selector::parse("tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let headings: Vec<_> = html.select(&heading_sel).collect();
    let tables: Vec<_> = html.select(&table_sel).collect();

    let mut rows = Vec::new();

    for (heading, table) in headings.into_iter().zip(tables) {
        let heading_text = node_text(heading);
        if !classification.heading_matches(&heading_text) {
            continue;
        }

        let header: Vec<String> = table.select(&th_sel).map(node_text).collect();
        let columns = select_columns(&header, wanted);

        for row in table.select(&row_sel) {
            let cells: Vec<_> = row.select(&cell_sel).collect();

            let mut rank = String::new();
            let mut rider = None;
            let mut team = None;
            let mut points = 0;

            for &(column, index) in &columns {
                let Some(&cell) = cells.get(index) else {
                    continue;
                };
                match column {
                    Column::Rank => rank = node_text(cell),
                    Column::Rider => {
                        let (name, href) = first_link(cell).ok_or_else(|| {
                            ScrapeError::PageShape(
                                "points row without rider link".to_string(),
                            )
                        })?;
                        rider = Some(RiderRef {
                            name: renormalize_rider_name(&name),
                            slug: href.strip_prefix("rider/").unwrap_or(&href).to_string(),
                            href,
                        });
                    }
                    Column::Team => {
                        let printed = node_text(cell);
                        // Exact text only; punctuation variants between
                        // the results table and the start list miss here.
                        let Some(found) = start_list.team_by_name(&printed) else {
                            warn!(team = %printed, "printed team name missing from start list");
                            return Err(ScrapeError::StartListMiss(printed));
                        };
                        team = Some(found.clone());
                    }
                    Column::Points => {
                        let text = node_text(cell);
                        points = text
                            .parse()
                            .map_err(|_| ScrapeError::MalformedPoints(text))?;
                    }
                    _ => {}
                }
            }

            let rider = rider.ok_or_else(|| {
                ScrapeError::PageShape("points row without rider column".to_string())
            })?;
            let team = team.ok_or_else(|| {
                ScrapeError::PageShape("points row without team column".to_string())
            })?;

            rows.push(ComplementaryRow {
                event: heading_text.clone(),
                rank,
                rider,
                team,
                points,
            });
        }
    }

    Ok(rows)
}
