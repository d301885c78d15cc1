//! Shared value records produced by the page parsers.
//!
//! Every record here is an immutable snapshot built from one page fetch.
//! Entity references carry the site's canonical slug, derived from the
//! link path by fixed positional rules; the site changed its path scheme
//! between eras (year glued to the name vs. a separate path segment), so
//! team and race derivation supports both.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::normalize::reorder_printed_name;

/// Sentinel used when a result row carries no team link at all, which
/// happens on smaller races and national championships.
pub const NOT_AVAILABLE: &str = "N/A";

/// A rider identified by display name and site path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiderRef {
    pub name: String,
    pub href: String,
    pub slug: String,
}

impl RiderRef {
    /// Builds a reference from a printed name and its link path. The slug
    /// is everything after the `rider/` prefix, verbatim — it may carry a
    /// disambiguating trailing number (`benjamin-thomas-2`).
    pub fn from_link(printed_name: &str, href: &str) -> Self {
        let slug = href.strip_prefix("rider/").unwrap_or(href).to_string();
        Self {
            name: reorder_printed_name(printed_name),
            href: href.to_string(),
            slug,
        }
    }
}

/// A team identified by display name, site path, and season year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub name: String,
    pub href: String,
    pub slug: String,
    pub year: String,
}

impl TeamRef {
    /// Builds a reference from a link path shaped `team/<slug>-<year>`
    /// (older pages glue the year onto the name) or
    /// `team/<slug>/<year>` (newer pages delimit it as its own segment).
    pub fn from_link(name: &str, href: &str) -> Self {
        let rest = href.strip_prefix("team/").unwrap_or(href);
        let (slug, year) = match rest.rsplit_once('/') {
            Some((head, tail)) => (head.replace('/', "-"), tail.to_string()),
            None => split_glued_year(rest),
        };
        if year.is_empty() {
            warn!(href, "team link without trailing year");
        }
        Self {
            name: name.to_string(),
            href: href.to_string(),
            slug,
            year,
        }
    }

    /// The sentinel reference substituted when a row has no team link.
    pub fn not_available() -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            href: NOT_AVAILABLE.to_string(),
            slug: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
        }
    }
}

/// A race identified by display name, site path, and edition year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRef {
    pub name: String,
    pub href: String,
    pub slug: String,
    pub year: String,
}

impl RaceRef {
    /// Builds a reference from a link path shaped
    /// `race/<slug>/<year>[/<page>]`. The year is the first all-digit
    /// 4-character segment after the slug, which also covers paths with a
    /// trailing result-page segment.
    pub fn from_link(name: &str, href: &str) -> Self {
        let rest = href.strip_prefix("race/").unwrap_or(href);
        let mut segments = rest.split('/');
        let slug = segments.next().unwrap_or_default().to_string();
        let year = segments
            .find(|s| s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or_default()
            .to_string();
        if year.is_empty() {
            warn!(href, "race link without year segment");
        }
        Self {
            name: name.to_string(),
            href: href.to_string(),
            slug,
            year,
        }
    }
}

/// Splits a `<slug>-<year>` tail into its parts; the year is the glued
/// trailing 4 digits. Returns an empty year when the tail has no such
/// suffix.
fn split_glued_year(rest: &str) -> (String, String) {
    match rest.rsplit_once('-') {
        Some((slug, year)) if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) => {
            (slug.to_string(), year.to_string())
        }
        _ => (rest.to_string(), String::new()),
    }
}

/// One row of a results table. Which fields are populated depends on the
/// columns requested from the extractor; times are absent for riders with
/// no recorded time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rider: Option<RiderRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uci_points: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcs_points: Option<String>,
    /// Elapsed time in seconds, derived from the leader's time plus the
    /// printed gap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_secs: Option<u32>,
    /// Gap behind the leader in seconds; 0 for the leader.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

/// A team/rider pairing from a race start list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartListEntry {
    pub team: TeamRef,
    pub rider: RiderRef,
}

/// The roster of teams and riders entered in a race, used as a lookup
/// table when secondary tables print a team name without a link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartList(pub Vec<StartListEntry>);

impl StartList {
    /// Exact-text lookup of a printed team name. Punctuation variants
    /// between pages make this miss; the caller treats a miss as fatal.
    pub fn team_by_name(&self, printed: &str) -> Option<&TeamRef> {
        self.0
            .iter()
            .map(|entry| &entry.team)
            .find(|team| team.name == printed)
    }
}

/// Gender selector for the team listing pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    /// The site's query code.
    pub fn query_code(self) -> &'static str {
        match self {
            Gender::Men => "men",
            Gender::Women => "women",
        }
    }
}

/// Race-type filter codes for the rider result query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RaceType {
    #[default]
    Any,
    Stage,
    Prologue,
    TimeTrial,
    GeneralClassification,
    PointsClassification,
    YouthClassification,
    MountainsClassification,
    OneDay,
}

impl RaceType {
    /// The site's numeric query code; the empty string means no filter.
    pub fn query_code(self) -> &'static str {
        match self {
            RaceType::Any => "",
            RaceType::Stage => "1",
            RaceType::Prologue => "2",
            RaceType::TimeTrial => "3",
            RaceType::GeneralClassification => "4",
            RaceType::PointsClassification => "5",
            RaceType::YouthClassification => "6",
            RaceType::MountainsClassification => "7",
            RaceType::OneDay => "8",
        }
    }
}

/// Options for a rider race-history query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RaceHistoryFilter {
    /// Restrict to one season; `None` returns the full career.
    pub season: Option<u16>,
    /// Drop team time trial results from the listing.
    pub exclude_ttt: bool,
    pub race_type: RaceType,
}

/// One row of a rider's race history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceHistoryRow {
    pub date: String,
    pub result: String,
    pub race: RaceRef,
    pub classification: String,
    pub distance: String,
    pub pcs_points: String,
    pub uci_points: String,
}

impl RaceHistoryRow {
    /// PCS points as a number; the `"-"` sentinel counts as zero.
    pub fn pcs_points_value(&self) -> u32 {
        self.pcs_points.parse().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rider_ref_from_link() {
        let rider = RiderRef::from_link("POGACAR Tadej", "rider/tadej-pogacar");
        assert_eq!(rider.name, "Tadej Pogacar");
        assert_eq!(rider.slug, "tadej-pogacar");
        assert_eq!(rider.href, "rider/tadej-pogacar");
    }

    #[test]
    fn test_rider_ref_keeps_disambiguating_number() {
        let rider = RiderRef::from_link("THOMAS Benjamin", "rider/benjamin-thomas-2");
        assert_eq!(rider.slug, "benjamin-thomas-2");
    }

    #[test]
    fn test_team_ref_from_glued_link() {
        let team = TeamRef::from_link("UAE Team Emirates", "team/uae-team-emirates-2021");
        assert_eq!(team.slug, "uae-team-emirates");
        assert_eq!(team.year, "2021");
    }

    #[test]
    fn test_team_ref_from_segmented_link() {
        let team = TeamRef::from_link("UAE Team Emirates", "team/uae-team-emirates/2021");
        assert_eq!(team.slug, "uae-team-emirates");
        assert_eq!(team.year, "2021");
    }

    #[test]
    fn test_race_ref_from_segmented_link() {
        let race = RaceRef::from_link("Tour de France", "race/tour-de-france/2021");
        assert_eq!(race.slug, "tour-de-france");
        assert_eq!(race.year, "2021");
    }

    #[test]
    fn test_race_ref_with_trailing_page_segment() {
        let race = RaceRef::from_link("Tour de France", "race/tour-de-france/2021/gc");
        assert_eq!(race.slug, "tour-de-france");
        assert_eq!(race.year, "2021");
    }

    #[test]
    fn test_start_list_lookup_is_exact() {
        let list = StartList(vec![StartListEntry {
            team: TeamRef::from_link("Jumbo-Visma", "team/team-jumbo-visma-2021"),
            rider: RiderRef::from_link("VAN AERT Wout", "rider/wout-van-aert"),
        }]);
        assert!(list.team_by_name("Jumbo-Visma").is_some());
        assert!(list.team_by_name("Jumbo Visma").is_none());
    }

    #[test]
    fn test_race_type_query_codes() {
        assert_eq!(RaceType::Any.query_code(), "");
        assert_eq!(RaceType::Stage.query_code(), "1");
        assert_eq!(RaceType::OneDay.query_code(), "8");
    }
}
