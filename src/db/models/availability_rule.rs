use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// A single bookable window within a day, as local times of day.
/// Half-open: a window `{start: 09:00, end: 12:00}` admits a slot ending
/// exactly at 12:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A recurring weekday rule or an explicit date override describing when a
/// provider is bookable.
///
/// Exactly one of `weekday` (0 = Monday .. 6 = Sunday) and `date_override`
/// is set. An override takes precedence over weekday rules for that date.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AvailabilityRule {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub weekday: Option<i16>,
    pub date_override: Option<NaiveDate>,
    pub windows: Json<Vec<TimeWindow>>,
    pub timezone: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewAvailabilityRule {
    pub weekday: Option<i16>,
    pub date_override: Option<NaiveDate>,
    pub windows: Vec<TimeWindow>,
    pub timezone: String,
}

impl NewAvailabilityRule {
    /// Structural validation: weekday XOR override, windows well-formed and
    /// non-overlapping, timezone resolvable.
    pub fn validate(&self) -> Result<(), String> {
        match (self.weekday, self.date_override) {
            (Some(_), Some(_)) => {
                return Err("Rule must set either weekday or date_override, not both".into())
            }
            (None, None) => {
                return Err("Rule must set either weekday or date_override".into())
            }
            (Some(day), None) if !(0..=6).contains(&day) => {
                return Err("Weekday must be between 0 (Monday) and 6 (Sunday)".into())
            }
            _ => {}
        }

        if self.windows.is_empty() {
            return Err("Rule must contain at least one time window".into());
        }
        for window in &self.windows {
            if window.start >= window.end {
                return Err(format!(
                    "Window start {} must be before end {}",
                    window.start, window.end
                ));
            }
        }

        let mut sorted = self.windows.clone();
        sorted.sort_by_key(|w| w.start);
        for pair in sorted.windows(2) {
            if pair[1].start < pair[0].end {
                return Err("Time windows within a rule must not overlap".into());
            }
        }

        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(format!("Unknown timezone: {}", self.timezone));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: &str, end: &str) -> TimeWindow {
        TimeWindow {
            start: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
        }
    }

    fn rule(windows: Vec<TimeWindow>) -> NewAvailabilityRule {
        NewAvailabilityRule {
            weekday: Some(0),
            date_override: None,
            windows,
            timezone: "Europe/Warsaw".to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_rule() {
        let r = rule(vec![window("09:00", "12:00"), window("13:00", "17:00")]);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_window() {
        let r = rule(vec![window("12:00", "09:00")]);
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_overlapping_windows() {
        let r = rule(vec![window("09:00", "12:00"), window("11:00", "14:00")]);
        assert!(r.validate().is_err());
    }

    #[test]
    fn back_to_back_windows_are_allowed() {
        let r = rule(vec![window("09:00", "12:00"), window("12:00", "14:00")]);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn rejects_weekday_and_override_together() {
        let mut r = rule(vec![window("09:00", "12:00")]);
        r.date_override = Some("2025-06-01".parse().unwrap());
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_unknown_timezone() {
        let mut r = rule(vec![window("09:00", "12:00")]);
        r.timezone = "Mars/Olympus_Mons".to_string();
        assert!(r.validate().is_err());
    }
}
