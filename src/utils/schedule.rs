use std::collections::BTreeMap;

use crate::error::{Error, Result};

pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parses a `"weekday-hour"` token such as `"0-8"` (Monday 8:00).
pub fn parse_slot_token(token: &str) -> Option<(u8, u8)> {
    let (day, hour) = token.trim().split_once('-')?;
    let day: u8 = day.trim().parse().ok()?;
    let hour: u8 = hour.trim().parse().ok()?;
    if day > 6 || hour > 23 {
        return None;
    }
    Some((day, hour))
}

/// Input-side check for `apply`: at least one token, every token well formed.
pub fn validate_slot_tokens(tokens: &[String]) -> Result<()> {
    if tokens.is_empty() {
        return Err(Error::BadRequest(
            "Select at least one schedule slot".to_string(),
        ));
    }
    if let Some(bad) = tokens.iter().find(|t| parse_slot_token(t).is_none()) {
        return Err(Error::BadRequest(format!(
            "Invalid schedule slot '{}'. Expected 'weekday-hour' with weekday 0-6 and hour 0-23",
            bad
        )));
    }
    Ok(())
}

/// Renders tokens grouped by weekday, e.g. `"Monday: 8:00, 9:00 | Tuesday: 10:00"`.
///
/// Malformed tokens are skipped with a warning.
pub fn format_slot_tokens(tokens: &[String]) -> String {
    if tokens.is_empty() {
        return "No schedule specified".to_string();
    }

    let mut by_day: BTreeMap<u8, Vec<u8>> = BTreeMap::new();
    for token in tokens {
        match parse_slot_token(token) {
            Some((day, hour)) => by_day.entry(day).or_default().push(hour),
            None => tracing::warn!(token = %token, "skipping malformed schedule token"),
        }
    }

    if by_day.is_empty() {
        return "No valid schedule".to_string();
    }

    by_day
        .into_iter()
        .map(|(day, mut hours)| {
            hours.sort_unstable();
            let hours = hours
                .iter()
                .map(|h| format!("{}:00", h))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: {}", WEEKDAYS[day as usize], hours)
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn groups_by_weekday_and_sorts_hours() {
        let out = format_slot_tokens(&tokens(&["1-10", "0-9", "0-8"]));
        assert_eq!(out, "Monday: 8:00, 9:00 | Tuesday: 10:00");
    }

    #[test]
    fn skips_malformed_tokens() {
        let out = format_slot_tokens(&tokens(&["x-1", "0-8", "9-9", "3", "2-25"]));
        assert_eq!(out, "Monday: 8:00");
        assert_eq!(format_slot_tokens(&tokens(&["bad"])), "No valid schedule");
        assert_eq!(format_slot_tokens(&[]), "No schedule specified");
    }

    #[test]
    fn validation_rejects_empty_and_malformed() {
        assert!(validate_slot_tokens(&tokens(&["0-9", "6-23"])).is_ok());
        assert!(validate_slot_tokens(&[]).is_err());
        let err = validate_slot_tokens(&tokens(&["0-9", "7-1"])).unwrap_err();
        assert!(err.to_string().contains("7-1"));
    }
}
