//! Team page: roster and season dropdown.

use scraper::{Html, Selector};

use super::{first_link, node_text};
use crate::error::ScrapeError;
use crate::types::{RiderRef, TeamRef};

/// Parses the team roster, in page (alphabetical) order.
pub fn parse_team_roster(html: &Html) -> Result<Vec<RiderRef>, ScrapeError> {
    let row_sel = Selector::parse("div.ttabs.tabb ul.list.pad2 li").unwrap();

    let mut riders = Vec::new();
    for row in html.select(&row_sel) {
        let (name, href) = first_link(row).ok_or_else(|| {
            ScrapeError::PageShape("roster row without a rider link".to_string())
        })?;
        riders.push(RiderRef::from_link(&name, &href));
    }

    Ok(riders)
}

/// Parses the season dropdown into one team reference per year the team
/// existed, including seasons under earlier sponsor names.
pub fn parse_name_history(html: &Html) -> Result<Vec<TeamRef>, ScrapeError> {
    let option_sel = Selector::parse("div.pageSelectNav select option").unwrap();

    let mut history = Vec::new();
    for option in html.select(&option_sel) {
        let value = option.value().attr("value").unwrap_or_default();
        // The option value may point at a sub-page; keep only the
        // `team/<slug>-<year>` lead.
        let href = value.split('/').take(2).collect::<Vec<_>>().join("/");

        let text = node_text(option);
        let name = text
            .split('|')
            .nth(1)
            .map(str::trim)
            .ok_or_else(|| {
                ScrapeError::PageShape("season dropdown entry without a team name".to_string())
            })?;

        history.push(TeamRef::from_link(name, &href));
    }

    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_roster() {
        let html = Html::parse_document(
            r#"<div class="ttabs tabb">
<ul class="list pad2">
<li><a href="rider/joao-almeida">ALMEIDA Joao</a></li>
<li><a href="rider/tadej-pogacar">POGACAR Tadej</a></li>
</ul>
</div>"#,
        );
        let riders = parse_team_roster(&html).unwrap();

        assert_eq!(riders.len(), 2);
        assert_eq!(riders[0].name, "Joao Almeida");
        assert_eq!(riders[0].slug, "joao-almeida");
        assert_eq!(riders[1].name, "Tadej Pogacar");
    }

    #[test]
    fn test_parse_name_history() {
        let html = Html::parse_document(
            r#"<div class="pageSelectNav">
<select>
<option value="team/uae-team-emirates-2021/overview">2021 | UAE Team Emirates</option>
<option value="team/lampre-merida-2016/overview">2016 | Lampre - Merida</option>
</select>
</div>"#,
        );
        let history = parse_name_history(&html).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, "UAE Team Emirates");
        assert_eq!(history[0].slug, "uae-team-emirates");
        assert_eq!(history[0].year, "2021");
        assert_eq!(history[1].name, "Lampre - Merida");
        assert_eq!(history[1].year, "2016");
    }
}
