//! Error taxonomy for page normalization.
//!
//! Only one failure has a deliberate local recovery (a result row without a
//! team link, handled inside the row extractor). Everything else means the
//! page shape broke an assumed invariant and is surfaced to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Duration string length outside the supported clock formats.
    #[error("malformed duration string {0:?}")]
    MalformedDuration(String),

    /// Date string names a month that is not an English month name.
    #[error("unknown month name {0:?}")]
    UnknownMonth(String),

    /// Date string does not split into day / month / year.
    #[error("malformed date string {0:?}")]
    MalformedDate(String),

    /// Points cell did not hold an integer.
    #[error("malformed points value {0:?}")]
    MalformedPoints(String),

    /// A printed team name has no exact match in the race start list.
    #[error("no start list entry for team {0:?}")]
    StartListMiss(String),

    /// The page is missing a node the extraction relies on.
    #[error("unexpected page shape: {0}")]
    PageShape(String),
}
