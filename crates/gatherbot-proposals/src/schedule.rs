//! Schedule expressions for the reminder loop.
//!
//! 5-field subset (MIN HOUR DOM MON DOW): minute and hour support `*`,
//! `*/N`, `N`, and comma lists; the calendar fields accept `*` only. That
//! covers the daily-reminder use case without pulling in a cron crate.

use chrono::{DateTime, Duration, Timelike, Utc};

/// A parsed schedule, e.g. "0 14 * * *" (every day at 14:00 UTC).
#[derive(Debug, Clone)]
pub struct Schedule {
    expression: String,
    minutes: Vec<u32>,
    hours: Vec<u32>,
}

impl Schedule {
    /// Parse a 5-field expression. Returns `None` when the expression is
    /// malformed or matches no time at all.
    pub fn parse(expression: &str) -> Option<Self> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        if fields.len() != 5 {
            tracing::warn!(
                "Invalid schedule '{}' (need 5 fields: MIN HOUR DOM MON DOW)",
                expression
            );
            return None;
        }

        let minutes = field_values(fields[0], 0, 59)?;
        let hours = field_values(fields[1], 0, 23)?;
        // Calendar fields are accepted but only honored as wildcards.

        Some(Self {
            expression: expression.to_string(),
            minutes,
            hours,
        })
    }

    /// The first matching minute strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut candidate = (after + Duration::minutes(1)).with_second(0)?;
        candidate = candidate.with_nanosecond(0)?;

        // Minute and hour fields repeat daily, so 48h always contains a match.
        for _ in 0..(48 * 60) {
            if self.minutes.contains(&candidate.minute()) && self.hours.contains(&candidate.hour())
            {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }
        None
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

/// Expand one field into its matching values within [min, max].
fn field_values(field: &str, min: u32, max: u32) -> Option<Vec<u32>> {
    let values: Vec<u32> = if field == "*" {
        (min..=max).collect()
    } else if let Some(step) = field.strip_prefix("*/") {
        let n: u32 = step.parse().ok().filter(|n| *n > 0)?;
        (min..=max).step_by(n as usize).collect()
    } else {
        let parsed: std::result::Result<Vec<u32>, _> =
            field.split(',').map(|s| s.trim().parse()).collect();
        parsed.ok()?.into_iter().filter(|v| *v >= min && *v <= max).collect()
    };

    if values.is_empty() { None } else { Some(values) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_daily_at_14_same_day() {
        let schedule = Schedule::parse("0 14 * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 13, 30, 0).unwrap();
        let next = schedule.next_after(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_daily_at_14_rolls_to_next_day() {
        let schedule = Schedule::parse("0 14 * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        let next = schedule.next_after(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 6, 2, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_exact_match_moves_forward() {
        // "strictly after": firing at 14:00 must schedule tomorrow, not now.
        let schedule = Schedule::parse("0 14 * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 14, 0, 0).unwrap();
        let next = schedule.next_after(after).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 6, 2, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_step_minutes() {
        let schedule = Schedule::parse("*/15 * * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 10, 2, 0).unwrap();
        assert_eq!(schedule.next_after(after).unwrap().minute(), 15);
    }

    #[test]
    fn test_comma_list() {
        let schedule = Schedule::parse("0 9,18 * * *").unwrap();
        let after = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        assert_eq!(schedule.next_after(after).unwrap().hour(), 18);
    }

    #[test]
    fn test_invalid_expressions() {
        assert!(Schedule::parse("bad").is_none());
        assert!(Schedule::parse("0 99 * * *").is_none());
        assert!(Schedule::parse("*/0 * * * *").is_none());
    }
}
