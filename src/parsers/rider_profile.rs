//! Rider profile page: personal details, rankings, team history.

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::{first_link, node_text};
use crate::error::ScrapeError;
use crate::types::TeamRef;

/// A rider's strava presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaAccount {
    pub link: String,
    /// Numeric account id, usable against the strava API.
    pub id: String,
}

/// General details from a rider's profile page. Height and weight are
/// not listed for every rider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiderProfile {
    pub name: String,
    pub team: Option<String>,
    pub age: Option<u32>,
    pub nationality: Option<String>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub strava: Option<StravaAccount>,
    pub pcs_rank: Option<u32>,
    pub uci_rank: Option<u32>,
}

pub fn parse_rider_profile(html: &Html) -> Result<RiderProfile, ScrapeError> {
    let title_sel = Selector::parse("div.page-title h1").unwrap();
    let team_sel = Selector::parse("div.page-title div.main span").unwrap();
    let info_sel = Selector::parse("div.rdr-info-cont").unwrap();
    let info_link_sel = Selector::parse("div.rdr-info-cont a").unwrap();
    let sites_sel = Selector::parse("ul.list.horizontal.sites a[href]").unwrap();
    let rank_sel = Selector::parse("ul.list.horizontal.rdr-rankings div.rnk").unwrap();

    let name = html
        .select(&title_sel)
        .next()
        .map(node_text)
        .ok_or_else(|| ScrapeError::PageShape("rider page without a title".to_string()))?
        .replace("  ", " ");

    let team = html.select(&team_sel).last().map(node_text);

    let info_text = html
        .select(&info_sel)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    // The birth date line ends with the age in parentheses.
    let age_re = Regex::new(r"\((\d+)\)").unwrap();
    let age = age_re
        .captures(&info_text)
        .and_then(|caps| caps[1].parse().ok());

    let nationality = html.select(&info_link_sel).next().map(node_text);

    let height_re = Regex::new(r"(\d+\.\d+)\s*m").unwrap();
    let height_m = height_re
        .captures(&info_text)
        .and_then(|caps| caps[1].parse().ok());

    let weight_re = Regex::new(r"(\d+)\s*kg").unwrap();
    let weight_kg = weight_re
        .captures(&info_text)
        .and_then(|caps| caps[1].parse().ok());

    let strava = html
        .select(&sites_sel)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains("strava"))
        .map(|href| StravaAccount {
            link: href.to_string(),
            id: href.rsplit('/').next().unwrap_or_default().to_string(),
        });

    // PCS rank is printed first, UCI rank second.
    let ranks: Vec<Option<u32>> = html
        .select(&rank_sel)
        .map(|el| node_text(el).parse().ok())
        .collect();
    let pcs_rank = ranks.first().copied().flatten();
    let uci_rank = ranks.get(1).copied().flatten();

    Ok(RiderProfile {
        name,
        team,
        age,
        nationality,
        height_m,
        weight_kg,
        strava,
        pcs_rank,
        uci_rank,
    })
}

/// One season of a rider's team history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSeason {
    pub season: String,
    pub team: TeamRef,
}

/// Parses the season-by-season team list on the profile page. Future
/// seasons appear too when the rider has already signed.
pub fn parse_team_history(html: &Html) -> Result<Vec<TeamSeason>, ScrapeError> {
    // Class matching covers both the pre- and post-2018 list markup.
    let row_sel = Selector::parse("ul.list.rdr-teams li.main").unwrap();
    let season_sel = Selector::parse("div.season").unwrap();

    let mut seasons = Vec::new();

    for row in html.select(&row_sel) {
        let season = row
            .select(&season_sel)
            .next()
            .map(node_text)
            .unwrap_or_default();
        let (name, href) = first_link(row).ok_or_else(|| {
            ScrapeError::PageShape("team history row without a team link".to_string())
        })?;
        seasons.push(TeamSeason {
            season,
            team: TeamRef::from_link(&name, &href),
        });
    }

    Ok(seasons)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_PROFILE: &str = r#"<div class="page-title">
  <div class="main">
    <h1>Tadej  Pogacar</h1>
    <span>UAE Team Emirates</span>
  </div>
</div>
<div class="rdr-info-cont">
  Date of birth: 21st September 1998 (22)
  Nationality: <a href="nation/slovenia">Slovenia</a>
  Weight: 66 kg
  Height: 1.76 m
</div>
<ul class="list horizontal rdr-rankings">
  <li><div class="title">PCS Ranking</div><div class="rnk">1</div></li>
  <li><div class="title">UCI World Ranking</div><div class="rnk">2</div></li>
</ul>
<ul class="list horizontal sites">
  <li><a href="https://twitter.com/TamauPogi">Twitter</a></li>
  <li><a href="https://www.strava.com/athletes/3153445">Strava</a></li>
</ul>
<ul class="list rdr-teams moblist">
  <li class="main"><div class="season">2021</div><a href="team/uae-team-emirates-2021">UAE Team Emirates</a></li>
  <li class="main"><div class="season">2020</div><a href="team/uae-team-emirates-2020">UAE Team Emirates</a></li>
</ul>"#;

    #[test]
    fn test_parse_rider_profile() {
        let html = Html::parse_document(SAMPLE_PROFILE);
        let profile = parse_rider_profile(&html).unwrap();

        assert_eq!(profile.name, "Tadej Pogacar");
        assert_eq!(profile.team.as_deref(), Some("UAE Team Emirates"));
        assert_eq!(profile.age, Some(22));
        assert_eq!(profile.nationality.as_deref(), Some("Slovenia"));
        assert_eq!(profile.height_m, Some(1.76));
        assert_eq!(profile.weight_kg, Some(66.0));
        assert_eq!(profile.pcs_rank, Some(1));
        assert_eq!(profile.uci_rank, Some(2));

        let strava = profile.strava.unwrap();
        assert_eq!(strava.id, "3153445");
        assert!(strava.link.contains("strava.com"));
    }

    #[test]
    fn test_parse_rider_profile_sparse_page() {
        let html = Html::parse_document(
            r#"<div class="page-title"><h1>Jan Tratnik</h1></div>"#,
        );
        let profile = parse_rider_profile(&html).unwrap();
        assert_eq!(profile.name, "Jan Tratnik");
        assert_eq!(profile.age, None);
        assert_eq!(profile.height_m, None);
        assert!(profile.strava.is_none());
    }

    #[test]
    fn test_parse_team_history() {
        let html = Html::parse_document(SAMPLE_PROFILE);
        let seasons = parse_team_history(&html).unwrap();

        assert_eq!(seasons.len(), 2);
        assert_eq!(seasons[0].season, "2021");
        assert_eq!(seasons[0].team.slug, "uae-team-emirates");
        assert_eq!(seasons[0].team.year, "2021");
        assert_eq!(seasons[1].team.year, "2020");
    }
}
