//! Listing and query-result pages: the race calendar, the team register,
//! and the rider result query with its offset pagination.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::{first_link, node_text};
use crate::error::ScrapeError;
use crate::types::{Gender, RaceHistoryRow, RaceRef, TeamRef};

/// One race in the calendar listing for a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceListing {
    pub race: RaceRef,
    pub classification: String,
}

/// Parses the `races.php` calendar table.
pub fn parse_race_listing(html: &Html) -> Result<Vec<RaceListing>, ScrapeError> {
    let row_sel = Selector::parse("table.basic tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let mut races = Vec::new();

    for row in html.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();

        let race_cell = cells.get(2).ok_or_else(|| {
            ScrapeError::PageShape("race calendar row without a race column".to_string())
        })?;
        let (name, href) = first_link(*race_cell).ok_or_else(|| {
            ScrapeError::PageShape("race calendar row without a race link".to_string())
        })?;
        let classification = cells.get(4).map(|&c| node_text(c)).unwrap_or_default();

        races.push(RaceListing {
            race: RaceRef::from_link(&name, &href),
            classification,
        });
    }

    Ok(races)
}

/// One team in the register for a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamListing {
    pub team: TeamRef,
    /// Tour level: `world`, `pro`, or `continental`.
    pub tour: String,
}

/// Parses the `teams.php` register. The first `mt20` grouping lists the
/// WorldTeams; the third lists ProTeams for men and Continental teams
/// for women (the groupings in between hold jersey imagery).
pub fn parse_team_listing(html: &Html, gender: Gender) -> Result<Vec<TeamListing>, ScrapeError> {
    let group_sel =
        Selector::parse("div.page-content.page-object.default div.mt20").unwrap();
    let item_sel = Selector::parse("li").unwrap();

    let second_tour = match gender {
        Gender::Men => "pro",
        Gender::Women => "continental",
    };

    let mut teams = Vec::new();

    for (index, group) in html.select(&group_sel).enumerate() {
        let tour = match index {
            0 => "world",
            2 => second_tour,
            _ => continue,
        };

        for item in group.select(&item_sel) {
            let Some((name, href)) = first_link(item) else {
                continue;
            };
            teams.push(TeamListing {
                team: TeamRef::from_link(&name, &href),
                tour: tour.to_string(),
            });
        }
    }

    Ok(teams)
}

/// Parses one page of the rider result query. The trailing row is the
/// career sum printed under the table and is skipped. Empty cells come
/// back as the `"-"` sentinel.
pub fn parse_rider_history_rows(html: &Html) -> Result<Vec<RaceHistoryRow>, ScrapeError> {
    let row_sel = Selector::parse("tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let rows: Vec<_> = html.select(&row_sel).collect();
    let mut history = Vec::new();

    for row in rows.iter().take(rows.len().saturating_sub(1)) {
        let cells: Vec<_> = row.select(&cell_sel).collect();

        let text_at = |index: usize| -> String {
            let text = cells.get(index).map(|&c| node_text(c)).unwrap_or_default();
            if text.is_empty() {
                "-".to_string()
            } else {
                text
            }
        };

        let race_cell = cells.get(3).ok_or_else(|| {
            ScrapeError::PageShape("result query row without a race column".to_string())
        })?;
        let (race_name, race_href) = first_link(*race_cell).ok_or_else(|| {
            ScrapeError::PageShape("result query row without a race link".to_string())
        })?;

        history.push(RaceHistoryRow {
            date: text_at(1),
            result: text_at(2),
            race: RaceRef::from_link(&race_name, &race_href),
            classification: text_at(4),
            distance: text_at(5),
            pcs_points: text_at(6),
            uci_points: text_at(7),
        });
    }

    Ok(history)
}

/// Offsets of all result query pages, read from the offset dropdown of
/// the first response. A single-page result has one entry, 0.
pub fn parse_offset_options(html: &Html) -> Vec<u32> {
    let option_sel = Selector::parse("select[name=\"offset\"] option").unwrap();

    html.select(&option_sel)
        .filter_map(|option| option.value().attr("value"))
        .filter_map(|value| value.parse().ok())
        .collect()
}

/// Sum of a season ranking table: the last cell of its `sum` row. Zero
/// when the page has no such row (seasons before the ranking existed).
pub fn parse_points_sum(html: &Html) -> u32 {
    let cell_sel = Selector::parse("tr.sum td").unwrap();

    html.select(&cell_sel)
        .last()
        .and_then(|cell| node_text(cell).parse().ok())
        .unwrap_or(0)
}

/// One race from a team's best-result-per-race listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRaceRow {
    pub date: String,
    pub race: RaceRef,
}

/// Parses the team result query table.
pub fn parse_team_race_rows(html: &Html) -> Result<Vec<TeamRaceRow>, ScrapeError> {
    let row_sel = Selector::parse("table.basic tbody tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let mut races = Vec::new();

    for row in html.select(&row_sel) {
        let cells: Vec<_> = row.select(&cell_sel).collect();

        let date = cells.get(1).map(|&c| node_text(c)).unwrap_or_default();
        let race_cell = cells.get(4).ok_or_else(|| {
            ScrapeError::PageShape("team result row without a race column".to_string())
        })?;
        let (name, href) = first_link(*race_cell).ok_or_else(|| {
            ScrapeError::PageShape("team result row without a race link".to_string())
        })?;

        races.push(TeamRaceRow {
            date,
            race: RaceRef::from_link(&name, &href),
        });
    }

    Ok(races)
}
