use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use serde::Serialize;

const DATE_TIME_LABEL: &str = "Date/Time:";
const TYPE_LABEL: &str = "Type:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    Permanent,
    Temporary,
    Informational,
    Unknown,
}

impl Classification {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "PERM" => Self::Permanent,
            "TEMP" => Self::Temporary,
            "INFO" => Self::Informational,
            _ => Self::Unknown,
        }
    }
}

/// Returns the first `Date/Time:` value in the entry that parses.
pub fn extract_timestamp(entry: &str) -> Option<DateTime<Utc>> {
    labeled_values(entry, DATE_TIME_LABEL).find_map(parse_timestamp)
}

pub fn extract_classification(entry: &str) -> Classification {
    labeled_values(entry, TYPE_LABEL)
        .next()
        .map(Classification::from_code)
        .unwrap_or(Classification::Unknown)
}

fn labeled_values<'a>(entry: &'a str, label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    entry
        .lines()
        .filter_map(move |line| line.trim().strip_prefix(label))
        .map(str::trim)
}

/// Parses `Weekday Month Day HH:MM:SS Zone Year`, e.g. `Fri Oct  3 12:12:21 AST 2025`.
///
/// Padding runs between fields are collapsed first. The zone abbreviation is
/// only checked for shape and the wall time is taken as UTC; abbreviations are
/// not resolved against a timezone database.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let normalized = collapse_spaces(value.trim());
    let fields: Vec<&str> = normalized.split(' ').collect();
    let [weekday, month, day, time, zone, year] = fields.as_slice() else {
        return None;
    };

    weekday.parse::<Weekday>().ok()?;
    if !is_zone_abbreviation(zone) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(
        &format!("{month} {day} {time} {year}"),
        "%b %d %H:%M:%S %Y",
    )
    .ok()?;
    Some(naive.and_utc())
}

fn collapse_spaces(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_space = false;
    for c in value.chars() {
        let is_space = c.is_whitespace();
        if is_space && prev_space {
            continue;
        }
        out.push(if is_space { ' ' } else { c });
        prev_space = is_space;
    }
    out
}

fn is_zone_abbreviation(zone: &str) -> bool {
    (3..=5).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn classification_codes_are_case_insensitive() {
        assert_eq!(
            extract_classification("LABEL: X\n  Type:    perm  \n"),
            Classification::Permanent
        );
        assert_eq!(extract_classification("Type: TEMP"), Classification::Temporary);
        assert_eq!(extract_classification("Type:\tInfo"), Classification::Informational);
        assert_eq!(extract_classification("Type: UNKN"), Classification::Unknown);
        assert_eq!(extract_classification("Type:"), Classification::Unknown);
    }

    #[test]
    fn missing_type_label_is_unknown() {
        assert_eq!(
            extract_classification("LABEL: CORE_DUMP\nClass: S"),
            Classification::Unknown
        );
        assert_eq!(
            extract_classification("Resource Type: PERM"),
            Classification::Unknown
        );
    }

    #[test]
    fn first_type_label_wins() {
        assert_eq!(
            extract_classification("Type: INFO\nType: PERM"),
            Classification::Informational
        );
    }

    #[test]
    fn padded_single_digit_day_parses() {
        let entry = "LABEL: X\nDate/Time:       Fri Oct  3 12:12:21 AST 2025\nType: PERM";
        assert_eq!(
            extract_timestamp(entry),
            Some(Utc.with_ymd_and_hms(2025, 10, 3, 12, 12, 21).unwrap())
        );
    }

    #[test]
    fn two_digit_day_parses() {
        assert_eq!(
            parse_timestamp("Tue Sep 30 23:59:59 UTC 2025"),
            Some(Utc.with_ymd_and_hms(2025, 9, 30, 23, 59, 59).unwrap())
        );
    }

    #[test]
    fn malformed_timestamps_are_absent() {
        assert_eq!(parse_timestamp("2025-10-03 12:12:21"), None);
        assert_eq!(parse_timestamp("Fri Oct 3 12:12:21 2025"), None);
        assert_eq!(parse_timestamp("Fri Oct 3 25:12:21 AST 2025"), None);
        assert_eq!(parse_timestamp("Xyz Oct 3 12:12:21 AST 2025"), None);
        assert_eq!(parse_timestamp("Fri Oct 3 12:12:21 +0300 2025"), None);
        assert_eq!(extract_timestamp("LABEL: X\nType: PERM"), None);
    }

    #[test]
    fn later_date_line_is_tried_when_first_fails() {
        let entry = "Date/Time: garbage\nDate/Time: Mon Jan  5 08:00:00 EST 2026";
        assert_eq!(
            extract_timestamp(entry),
            Some(Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn collapse_spaces_squeezes_runs() {
        assert_eq!(collapse_spaces("Fri Oct   3  12:00"), "Fri Oct 3 12:00");
    }
}
