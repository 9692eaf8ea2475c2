use crate::error::{Result, WeeklogError};
use lazy_static::lazy_static;
use regex::Regex;

// Jira's worklog calendar: a working day is 8 hours, a working week 5 days.
const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 8 * MINUTES_PER_HOUR;
const MINUTES_PER_WEEK: u32 = 5 * MINUTES_PER_DAY;

lazy_static! {
    /// A single duration token: digits followed by one unit character
    /// Matches tokens like: 2w, 4d, 6h, 45m
    static ref DURATION_TOKEN_RE: Regex = Regex::new(r"^(\d+)([wdhm])$").unwrap();
}

/// Parse a Jira-style duration string into a minute count
///
/// Tokens are space-separated `<number><unit>` pairs with units `w`, `d`,
/// `h`, `m` under the 8-hour-day / 5-day-week calendar. Tokens may appear
/// in any order and may repeat; their values are summed. An empty string
/// and the literal `"0m"` both mean zero.
///
/// # Examples
///
/// ```
/// use weeklog::duration::parse_duration;
///
/// assert_eq!(parse_duration("2h 30m").unwrap(), 150);
/// assert_eq!(parse_duration("30m 2h").unwrap(), 150);
/// assert_eq!(parse_duration("1w").unwrap(), 2400);
/// assert_eq!(parse_duration("").unwrap(), 0);
/// assert!(parse_duration("5x").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<u32> {
    if input.is_empty() || input == "0m" {
        return Ok(0);
    }

    let mut total: u32 = 0;
    for token in input.split(' ') {
        let minutes = token_minutes(token)?;
        total = total.checked_add(minutes).ok_or_else(|| {
            WeeklogError::InvalidDuration(
                "Duration exceeds the representable range".to_string(),
            )
        })?;
    }

    Ok(total)
}

/// Convert one `<number><unit>` token to minutes
fn token_minutes(token: &str) -> Result<u32> {
    let caps = DURATION_TOKEN_RE.captures(token).ok_or_else(|| {
        WeeklogError::InvalidDuration(format!(
            "Unrecognized token '{}'. Use forms like 2w, 4d, 6h, 45m.",
            token
        ))
    })?;

    let value: u32 = caps[1].parse().map_err(|_| {
        WeeklogError::InvalidDuration(format!("Number too large in token '{}'", token))
    })?;

    let factor = match &caps[2] {
        "m" => 1,
        "h" => MINUTES_PER_HOUR,
        "d" => MINUTES_PER_DAY,
        "w" => MINUTES_PER_WEEK,
        _ => unreachable!(),
    };

    value.checked_mul(factor).ok_or_else(|| {
        WeeklogError::InvalidDuration(format!("Token '{}' overflows the minute count", token))
    })
}

/// Render a minute count in Jira's compact worklog notation
///
/// Units are emitted largest to smallest, zero-valued units are skipped,
/// and a zero total renders as `"0m"`. The output always parses back to
/// the same minute count.
///
/// # Examples
///
/// ```
/// use weeklog::duration::format_minutes;
///
/// assert_eq!(format_minutes(150), "2h 30m");
/// assert_eq!(format_minutes(7125), "2w 4d 6h 45m");
/// assert_eq!(format_minutes(0), "0m");
/// ```
pub fn format_minutes(minutes: u32) -> String {
    let weeks = minutes / MINUTES_PER_WEEK;
    let days = (minutes % MINUTES_PER_WEEK) / MINUTES_PER_DAY;
    let hours = (minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
    let mins = minutes % MINUTES_PER_HOUR;

    let mut parts = Vec::new();

    if weeks > 0 {
        parts.push(format!("{}w", weeks));
    }

    if days > 0 {
        parts.push(format!("{}d", days));
    }

    if hours > 0 {
        parts.push(format!("{}h", hours));
    }

    if mins > 0 {
        parts.push(format!("{}m", mins));
    }

    if parts.is_empty() {
        "0m".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Round-trip fidelity
    #[test]
    fn test_round_trip() {
        for minutes in [0, 1, 59, 60, 61, 479, 480, 2399, 2400, 123456] {
            assert_eq!(
                parse_duration(&format_minutes(minutes)).unwrap(),
                minutes,
                "round trip failed for {} minutes",
                minutes
            );
        }
    }

    // Canonical zero
    #[test]
    fn test_zero_forms() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(parse_duration("0m").unwrap(), 0);
        assert_eq!(parse_duration("").unwrap(), 0);
    }

    // Unit conversion literals
    #[test]
    fn test_single_unit_values() {
        assert_eq!(parse_duration("1m").unwrap(), 1);
        assert_eq!(parse_duration("1h").unwrap(), 60);
        assert_eq!(parse_duration("1d").unwrap(), 480);
        assert_eq!(parse_duration("1w").unwrap(), 2400);
    }

    #[test]
    fn test_full_mixed_duration() {
        assert_eq!(
            parse_duration("2w 4d 6h 45m").unwrap(),
            2 * 2400 + 4 * 480 + 6 * 60 + 45
        );
    }

    #[test]
    fn test_parse_order_independent() {
        assert_eq!(parse_duration("2h 30m").unwrap(), 150);
        assert_eq!(parse_duration("30m 2h").unwrap(), 150);
        assert_eq!(parse_duration("45m 2w 6h 4d").unwrap(), 7125);
    }

    #[test]
    fn test_parse_repeated_units() {
        assert_eq!(parse_duration("1h 1h").unwrap(), 120);
        assert_eq!(parse_duration("30m 30m 30m").unwrap(), 90);
    }

    // Malformed input
    #[test]
    fn test_missing_unit_rejected() {
        assert!(parse_duration("5").is_err());
    }

    #[test]
    fn test_unit_before_digits_rejected() {
        assert!(parse_duration("w5").is_err());
    }

    #[test]
    fn test_unknown_unit_rejected() {
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("5s").is_err());
    }

    #[test]
    fn test_negative_rejected() {
        assert!(parse_duration("-5m").is_err());
    }

    #[test]
    fn test_bad_token_among_good_ones_rejected() {
        assert!(parse_duration("2h bad 30m").is_err());
        assert!(parse_duration("2h 30").is_err());
    }

    #[test]
    fn test_stray_whitespace_rejected() {
        // Tokens are split on single spaces; anything else is not a token
        assert!(parse_duration(" 2h").is_err());
        assert!(parse_duration("2h ").is_err());
        assert!(parse_duration("2h  30m").is_err());
    }

    #[test]
    fn test_decimal_and_signed_numbers_rejected() {
        assert!(parse_duration("1.5h").is_err());
        assert!(parse_duration("+5m").is_err());
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(parse_duration("99999999999m").is_err());
        assert!(parse_duration("4294967295w").is_err());
        assert!(parse_duration("4294967295m 1m").is_err());
    }

    // Formatting decomposition
    #[test]
    fn test_format_unit_boundaries() {
        assert_eq!(format_minutes(59), "59m");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(61), "1h 1m");
        assert_eq!(format_minutes(479), "7h 59m");
        assert_eq!(format_minutes(480), "1d");
        assert_eq!(format_minutes(2399), "4d 7h 59m");
        assert_eq!(format_minutes(2400), "1w");
    }

    #[test]
    fn test_format_skips_zero_units() {
        // 1 week + 45 minutes, with no day or hour component
        assert_eq!(format_minutes(2445), "1w 45m");
        // 1 day + 1 minute
        assert_eq!(format_minutes(481), "1d 1m");
    }

    #[test]
    fn test_format_large_value() {
        // 123456 = 51w + 1056m = 51w 2d 1h 36m
        assert_eq!(format_minutes(123_456), "51w 2d 1h 36m");
    }
}
