//! HTML parsers for procyclingstats.com pages.
//!
//! Each submodule handles one page shape and exposes pure functions from a
//! parsed document (or a node within one) to normalized records. Fetching
//! is the caller's concern.

pub mod complementary;
pub mod listing_pages;
pub mod race_overview;
pub mod results;
pub mod rider_profile;
pub mod stages;
pub mod startlist;
pub mod team_page;

use scraper::{ElementRef, Selector};

/// Concatenated, trimmed text content of a node.
pub(crate) fn node_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text and target of the first link under a node, if any.
pub(crate) fn first_link(el: ElementRef<'_>) -> Option<(String, String)> {
    let a_sel = Selector::parse("a[href]").unwrap();
    el.select(&a_sel).next().map(|a| {
        let href = a.value().attr("href").unwrap_or_default().to_string();
        (node_text(a), href)
    })
}
