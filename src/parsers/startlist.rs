//! Race start list page.

use scraper::{Html, Selector};

use super::{first_link, node_text};
use crate::error::ScrapeError;
use crate::types::{RiderRef, StartList, StartListEntry, TeamRef};

/// Parses the start list into team/rider pairs, one entry per rider, in
/// page order.
pub fn parse_startlist(html: &Html) -> Result<StartList, ScrapeError> {
    let team_sel = Selector::parse("ul.startlist_v3 li.team").unwrap();
    let team_link_sel = Selector::parse("b a[href]").unwrap();
    let rider_sel = Selector::parse("ul li").unwrap();

    let mut entries = Vec::new();

    for team_node in html.select(&team_sel) {
        let link = team_node.select(&team_link_sel).next().ok_or_else(|| {
            ScrapeError::PageShape("start list team without a team link".to_string())
        })?;
        let href = link.value().attr("href").unwrap_or_default();
        let team = TeamRef::from_link(&node_text(link), href);

        for rider_node in team_node.select(&rider_sel) {
            if let Some((name, href)) = first_link(rider_node) {
                entries.push(StartListEntry {
                    team: team.clone(),
                    rider: RiderRef::from_link(&name, &href),
                });
            }
        }
    }

    Ok(StartList(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_STARTLIST: &str = r#"<ul class="startlist_v3">
<li class="team">
  <b><a href="team/team-jumbo-visma-2021">Jumbo-Visma</a></b>
  <ul>
    <li><a href="rider/primoz-roglic">ROGLIC Primoz</a></li>
    <li><a href="rider/wout-van-aert">VAN AERT Wout</a></li>
  </ul>
</li>
<li class="team">
  <b><a href="team/uae-team-emirates-2021">UAE Team Emirates</a></b>
  <ul>
    <li><a href="rider/tadej-pogacar">POGACAR Tadej</a></li>
  </ul>
</li>
</ul>"#;

    #[test]
    fn test_parse_startlist() {
        let html = Html::parse_document(SAMPLE_STARTLIST);
        let startlist = parse_startlist(&html).unwrap();

        assert_eq!(startlist.0.len(), 3);
        assert_eq!(startlist.0[0].team.slug, "team-jumbo-visma");
        assert_eq!(startlist.0[0].rider.name, "Primoz Roglic");
        assert_eq!(startlist.0[1].rider.name, "Wout Van Aert");
        assert_eq!(startlist.0[2].team.name, "UAE Team Emirates");
        assert_eq!(startlist.0[2].rider.slug, "tadej-pogacar");

        assert!(startlist.team_by_name("Jumbo-Visma").is_some());
    }

    #[test]
    fn test_team_without_link_fails() {
        let html = Html::parse_document(
            r#"<ul class="startlist_v3"><li class="team"><b>No link</b></li></ul>"#,
        );
        assert!(matches!(
            parse_startlist(&html),
            Err(ScrapeError::PageShape(_))
        ));
    }
}
