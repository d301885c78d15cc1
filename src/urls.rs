//! Relative URL builders for procyclingstats.com.
//!
//! Pages are addressed by lowercase dash-separated slugs. Teams and races
//! additionally carry a season year: glued for teams (`team/<slug>-<year>`),
//! a separate segment for races (`race/<slug>/<year>/<page>`).

use crate::types::RaceHistoryFilter;

/// Converts a display name into the site's slug form: lowercase, the
/// literal `" - "` sponsor separator collapsed to `"-"` first, remaining
/// spaces turned into dashes. A name already in slug form passes through
/// unchanged apart from lowercasing.
pub fn slugify(name: &str) -> String {
    let mut slug = name.to_lowercase();
    if slug.contains(" - ") {
        slug = slug.replace(" - ", "-");
    }
    slug.replace(' ', "-")
}

pub fn rider_path(name: &str) -> String {
    format!("rider/{}", slugify(name))
}

pub fn team_path(name: &str, year: u16) -> String {
    format!("team/{}-{}", slugify(name), year)
}

/// The race sub-pages this crate fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RacePage {
    /// One-day result or final GC.
    Results,
    Overview,
    Startlist,
    Stages,
    /// A stage result page, addressed by the stage slug (`stage-4`).
    Stage(String),
    /// The intermediate sprint/KOM results attached to a stage.
    ComplementaryResults(String),
}

impl RacePage {
    fn suffix(&self) -> String {
        match self {
            RacePage::Results => String::new(),
            RacePage::Overview => "overview".to_string(),
            RacePage::Startlist => "startlist".to_string(),
            RacePage::Stages => "stages".to_string(),
            RacePage::Stage(stage) => stage.clone(),
            RacePage::ComplementaryResults(stage) => {
                format!("{}/live/complementary-results", stage)
            }
        }
    }
}

pub fn race_path(name: &str, year: u16, page: &RacePage) -> String {
    format!("race/{}/{}/{}", slugify(name), year, page.suffix())
}

/// The paginated rider result query. One page holds at most 100 rows; the
/// caller reads the offset dropdown from the first response and re-issues
/// the query per offset with the same filter set.
pub fn rider_results_query(slug: &str, filter: &RaceHistoryFilter, offset: u32) -> String {
    let season = filter
        .season
        .map(|y| y.to_string())
        .unwrap_or_default();
    let exclude_tt = if filter.exclude_ttt { "1" } else { "0" };
    format!(
        "rider.php?xseason={season}&zxseason=&pxseason=equal&sort=date&race=&km1=&zkm1=&pkm1=equal\
         &limit=100&offset={offset}&topx=&ztopx=&ptopx=smallerorequal&type={race_type}\
         &znation=&continent=&pnts=&zpnts=&ppnts=equal&level=&rnk=&zrnk=&prnk=equal\
         &exclude_tt={exclude_tt}&racedate=&zracedate=&pracedate=equal&name=&pname=contains\
         &category=&profile_score=&pprofile_score=largerorequal&filter=Filter&id={slug}&p=results",
        race_type = filter.race_type.query_code(),
    )
}

/// Season ranking tables used to sum a rider's points for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonRanking {
    UciWorld,
    PcsSeason,
}

impl SeasonRanking {
    fn query_code(self) -> &'static str {
        match self {
            SeasonRanking::UciWorld => "uci-world-ranking",
            SeasonRanking::PcsSeason => "pcs-season-ranking",
        }
    }
}

pub fn rider_season_points_query(slug: &str, season: u16, ranking: SeasonRanking) -> String {
    format!(
        "rider.php?date={season}-12-31&filter=Filter&id={slug}&p=results&s={code}",
        code = ranking.query_code(),
    )
}

/// The two race kinds that together cover a team's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRaceKind {
    StageRace,
    OneDay,
}

impl TeamRaceKind {
    fn query_code(self) -> &'static str {
        match self {
            TeamRaceKind::StageRace => "4",
            TeamRaceKind::OneDay => "8",
        }
    }
}

/// Best-result-per-race listing for a team.
pub fn team_results_query(slug: &str, year: u16, kind: TeamRaceKind) -> String {
    format!(
        "team.php?racetype={code}&race_nation=&since_year={year}&psince_year=largerorequal\
         &parcours_type=&limit=250&filter=Filter&id={slug}-{year}&p=results&s=best-result-per-race",
        code = kind.query_code(),
    )
}

pub fn races_query(year: u16, circuit_id: &str, classification: &str) -> String {
    format!("races.php?year={year}&circuit={circuit_id}&class={classification}&filter=Filter")
}

pub fn teams_query(year: u16, gender_code: &str) -> String {
    format!("teams.php?year={year}&filter=Filter&s={gender_code}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RaceType;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tadej Pogacar"), "tadej-pogacar");
        assert_eq!(slugify("tadej-pogacar"), "tadej-pogacar");
        // The sponsor separator collapses before spaces become dashes.
        assert_eq!(slugify("Team DSM - Firmenich"), "team-dsm-firmenich");
    }

    #[test]
    fn test_rider_path() {
        assert_eq!(rider_path("Wout van Aert"), "rider/wout-van-aert");
    }

    #[test]
    fn test_team_path() {
        assert_eq!(
            team_path("UAE Team Emirates", 2021),
            "team/uae-team-emirates-2021"
        );
    }

    #[test]
    fn test_race_paths() {
        assert_eq!(
            race_path("Tour de France", 2021, &RacePage::Results),
            "race/tour-de-france/2021/"
        );
        assert_eq!(
            race_path("Tour de France", 2021, &RacePage::Overview),
            "race/tour-de-france/2021/overview"
        );
        assert_eq!(
            race_path("Tour de France", 2021, &RacePage::Stage("stage-4".to_string())),
            "race/tour-de-france/2021/stage-4"
        );
        assert_eq!(
            race_path(
                "Tour de France",
                2021,
                &RacePage::ComplementaryResults("stage-4".to_string())
            ),
            "race/tour-de-france/2021/stage-4/live/complementary-results"
        );
    }

    #[test]
    fn test_rider_results_query_carries_filter() {
        let filter = RaceHistoryFilter {
            season: Some(2021),
            exclude_ttt: true,
            race_type: RaceType::Stage,
        };
        let url = rider_results_query("tadej-pogacar", &filter, 100);
        assert!(url.starts_with("rider.php?xseason=2021&"));
        assert!(url.contains("&offset=100&"));
        assert!(url.contains("&type=1&"));
        assert!(url.contains("&exclude_tt=1&"));
        assert!(url.ends_with("&id=tadej-pogacar&p=results"));
    }

    #[test]
    fn test_rider_season_points_query() {
        assert_eq!(
            rider_season_points_query("tadej-pogacar", 2021, SeasonRanking::UciWorld),
            "rider.php?date=2021-12-31&filter=Filter&id=tadej-pogacar&p=results&s=uci-world-ranking"
        );
    }

    #[test]
    fn test_team_results_query() {
        let url = team_results_query("uae-team-emirates", 2021, TeamRaceKind::OneDay);
        assert!(url.starts_with("team.php?racetype=8&"));
        assert!(url.contains("&since_year=2021&"));
        assert!(url.contains("&id=uae-team-emirates-2021&"));
    }

    #[test]
    fn test_listing_queries() {
        assert_eq!(
            races_query(2021, "1", "2.UWT"),
            "races.php?year=2021&circuit=1&class=2.UWT&filter=Filter"
        );
        assert_eq!(
            teams_query(2021, "men"),
            "teams.php?year=2021&filter=Filter&s=men"
        );
    }
}
