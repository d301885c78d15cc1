//! Normalizers for the textual encodings used on procyclingstats.com.
//!
//! The site prints rider names as "SURNAME Given", elapsed times as clock
//! strings that cap the hour field at display width, and dates as
//! "D Month YYYY". These routines convert all three into stable values.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::ScrapeError;

/// True for tokens the site renders as part of the surname block.
///
/// Matches the uppercase test the site's formatting implies: at least one
/// letter, no lowercase letters. Hyphens and periods do not disqualify a
/// token ("VAN-DER", "J.J."); tokens with no letters at all count as given
/// names.
fn is_family_token(token: &str) -> bool {
    token.chars().any(|c| c.is_uppercase()) && !token.chars().any(|c| c.is_lowercase())
}

pub(crate) fn capitalize(token: &str) -> String {
    let lower = token.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reorders a printed "SURNAME(S) Given" name into "Given Surname(s)".
///
/// Surname tokens are lowercased then initial-capitalized. A name with no
/// uppercase tokens comes back unchanged apart from whitespace collapse;
/// a name with no given-name tokens is just the re-cased surname.
pub fn reorder_printed_name(printed: &str) -> String {
    let mut given: Vec<&str> = Vec::new();
    let mut family: Vec<String> = Vec::new();

    for token in printed.split_whitespace() {
        if is_family_token(token) {
            family.push(capitalize(token));
        } else {
            given.push(token);
        }
    }

    let mut parts: Vec<String> = given.into_iter().map(str::to_string).collect();
    parts.extend(family);
    parts.join(" ")
}

/// Parses a printed clock string into seconds.
///
/// The site zero-pads fields and keeps fixed separators, so the stripped
/// length decides the format: up to 5 chars is `M:SS`/`MM:SS`, 7 is
/// `H:MM:SS`, 8 and 9 are `HH:MM:SS`/`HHH:MM:SS`. Hour fields above 23
/// encode a 23-hour base plus explicit overflow — race clocks the site
/// renders capped at display width — and are reconstructed as
/// `23:MM:SS + (H - 23)` hours. Any other length is a hard error.
pub fn parse_duration(printed: &str) -> Result<u32, ScrapeError> {
    let compact: String = printed.chars().filter(|c| !c.is_whitespace()).collect();

    let malformed = || ScrapeError::MalformedDuration(printed.to_string());

    let fields: Vec<&str> = compact.split(':').collect();
    let (hours_field, minutes_field, seconds_field) = match compact.len() {
        1..=5 => match fields.as_slice() {
            [m, s] => (None, *m, *s),
            _ => return Err(malformed()),
        },
        7..=9 => match fields.as_slice() {
            [h, m, s] => (Some(*h), *m, *s),
            _ => return Err(malformed()),
        },
        _ => return Err(malformed()),
    };

    let minutes: u32 = minutes_field.parse().map_err(|_| malformed())?;
    let seconds: u32 = seconds_field.parse().map_err(|_| malformed())?;
    if minutes > 59 || seconds > 59 {
        return Err(malformed());
    }

    let mut total = minutes * 60 + seconds;
    if let Some(field) = hours_field {
        let mut hours: u32 = field.parse().map_err(|_| malformed())?;
        if hours > 23 {
            // Reverse the display-width truncation: 23-hour base plus the
            // printed overflow.
            if field.len() == 3 {
                warn!(printed, "reconstructing 3-digit hour field");
            }
            total += (hours - 23) * 3600;
            hours = 23;
        }
        total += hours * 3600;
    }

    Ok(total)
}

/// Converts a printed "D Month YYYY" date into "YYYY-MM-DD".
fn month_number(name: &str) -> Result<u32, ScrapeError> {
    let number = match name {
        "January" => 1,
        "February" => 2,
        "March" => 3,
        "April" => 4,
        "May" => 5,
        "June" => 6,
        "July" => 7,
        "August" => 8,
        "September" => 9,
        "October" => 10,
        "November" => 11,
        "December" => 12,
        other => return Err(ScrapeError::UnknownMonth(other.to_string())),
    };
    Ok(number)
}

pub fn normalize_date(printed: &str) -> Result<String, ScrapeError> {
    let malformed = || ScrapeError::MalformedDate(printed.to_string());

    let mut parts = printed.split(' ');
    let (day, month, year) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(d), Some(m), Some(y), None) => (d, m, y),
        _ => return Err(malformed()),
    };

    let day: u32 = day.parse().map_err(|_| malformed())?;
    let month = month_number(month)?;
    let year: i32 = year.parse().map_err(|_| malformed())?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)?;
    Ok(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reorder_printed_name() {
        assert_eq!(reorder_printed_name("POGACAR Tadej"), "Tadej Pogacar");
        assert_eq!(
            reorder_printed_name("VAN DER POEL Mathieu"),
            "Mathieu Van Der Poel"
        );
        assert_eq!(reorder_printed_name("VAN AERT Wout"), "Wout Van Aert");
    }

    #[test]
    fn test_reorder_name_without_family_tokens() {
        assert_eq!(reorder_printed_name("Tadej Pogacar"), "Tadej Pogacar");
        // Whitespace collapses but nothing else changes.
        assert_eq!(reorder_printed_name("  Tadej   Pogacar "), "Tadej Pogacar");
    }

    #[test]
    fn test_reorder_name_without_given_tokens() {
        assert_eq!(reorder_printed_name("POGACAR"), "Pogacar");
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration("45:12").unwrap(), 2712);
        assert_eq!(parse_duration("4:12").unwrap(), 252);
        // Internal whitespace is stripped before length dispatch.
        assert_eq!(parse_duration("45: 12").unwrap(), 2712);
    }

    #[test]
    fn test_parse_duration_hours() {
        assert_eq!(parse_duration("1:02:03").unwrap(), 3723);
        assert_eq!(parse_duration("10:02:03").unwrap(), 36123);
        assert_eq!(parse_duration("23:59:59").unwrap(), 86399);
    }

    #[test]
    fn test_parse_duration_hour_overflow() {
        // 24:00:01 encodes 23:00:01 plus one overflow hour.
        assert_eq!(parse_duration("24:00:01").unwrap(), 86401);
        assert_eq!(parse_duration("99:59:59").unwrap(), 359999);
        // 3-digit hour run: 23:42:53 plus 78 overflow hours.
        assert_eq!(parse_duration("101:42:53").unwrap(), 366173);
    }

    #[test]
    fn test_parse_duration_rejects_unsupported_shapes() {
        assert!(parse_duration("1:2:34").is_err()); // length 6
        assert!(parse_duration("1234:00:00").is_err()); // length 10
        assert!(parse_duration("451234").is_err()); // no separator
        assert!(parse_duration("45:72").is_err()); // seconds field overflow
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("3 July 2021").unwrap(), "2021-07-03");
        assert_eq!(normalize_date("21 July 2021").unwrap(), "2021-07-21");
        assert_eq!(normalize_date("1 January 1999").unwrap(), "1999-01-01");
    }

    #[test]
    fn test_normalize_date_unknown_month() {
        match normalize_date("3 Juillet 2021") {
            Err(ScrapeError::UnknownMonth(name)) => assert_eq!(name, "Juillet"),
            other => panic!("expected UnknownMonth, got {:?}", other),
        }
    }

    #[test]
    fn test_normalize_date_malformed() {
        assert!(normalize_date("July 2021").is_err());
        assert!(normalize_date("3 July 2021 extra").is_err());
        assert!(normalize_date("x July 2021").is_err());
    }
}
