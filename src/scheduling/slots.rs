use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::db::AvailabilityRule;

/// A candidate bookable interval. Derived per query, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

/// Resolve the bookable windows for a calendar day as absolute UTC
/// intervals.
///
/// A date-override rule for the day takes precedence over weekday rules;
/// if neither applies the day has no windows. Each rule's local times are
/// resolved in that rule's own timezone. A local time that does not exist
/// on the given day (spring-forward gap) drops its window; ambiguous times
/// take the earlier offset.
pub fn resolve_windows(
    date: NaiveDate,
    rules: &[AvailabilityRule],
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let has_override = rules
        .iter()
        .any(|r| r.active && r.date_override == Some(date));

    let weekday = date.weekday().num_days_from_monday() as i16;

    let mut windows: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::new();
    for rule in rules.iter().filter(|r| r.active) {
        let applies = if has_override {
            rule.date_override == Some(date)
        } else {
            rule.date_override.is_none() && rule.weekday == Some(weekday)
        };
        if !applies {
            continue;
        }

        let tz: Tz = match rule.timezone.parse() {
            Ok(tz) => tz,
            Err(_) => continue,
        };

        for window in rule.windows.iter() {
            let start = tz
                .from_local_datetime(&date.and_time(window.start))
                .earliest();
            let end = tz.from_local_datetime(&date.and_time(window.end)).earliest();
            if let (Some(start), Some(end)) = (start, end) {
                let (start, end) = (start.with_timezone(&Utc), end.with_timezone(&Utc));
                if start < end {
                    windows.push((start, end));
                }
            }
        }
    }

    windows.sort_by_key(|w| w.0);
    windows
}

/// Generate candidate slots for a day.
///
/// Steps through each resolved window by `interval_minutes` (default: the
/// session duration), emitting `[t, t + duration)` while it fits. Pure and
/// lazy; the returned iterator is `Clone` so the sequence can be restarted.
/// A non-positive duration or a day with no windows yields an empty
/// sequence rather than an error.
pub fn generate_slots(
    date: NaiveDate,
    rules: &[AvailabilityRule],
    duration_minutes: i64,
    interval_minutes: Option<i64>,
) -> SlotIter {
    let interval = interval_minutes.unwrap_or(duration_minutes);
    let windows = if duration_minutes <= 0 || interval <= 0 {
        Vec::new()
    } else {
        resolve_windows(date, rules)
    };

    SlotIter {
        windows,
        window_idx: 0,
        cursor: None,
        duration: Duration::minutes(duration_minutes.max(0)),
        interval: Duration::minutes(interval.max(1)),
    }
}

#[derive(Debug, Clone)]
pub struct SlotIter {
    windows: Vec<(DateTime<Utc>, DateTime<Utc>)>,
    window_idx: usize,
    cursor: Option<DateTime<Utc>>,
    duration: Duration,
    interval: Duration,
}

impl Iterator for SlotIter {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<TimeSlot> {
        loop {
            let &(window_start, window_end) = self.windows.get(self.window_idx)?;
            let start = self.cursor.unwrap_or(window_start);
            let end = start + self.duration;
            if end <= window_end {
                self.cursor = Some(start + self.interval);
                return Some(TimeSlot {
                    start,
                    end,
                    available: true,
                });
            }
            self.window_idx += 1;
            self.cursor = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::TimeWindow;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn rule(
        weekday: Option<i16>,
        date_override: Option<NaiveDate>,
        windows: &[(&str, &str)],
        timezone: &str,
    ) -> AvailabilityRule {
        AvailabilityRule {
            id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            weekday,
            date_override,
            windows: Json(
                windows
                    .iter()
                    .map(|(s, e)| TimeWindow {
                        start: chrono::NaiveTime::parse_from_str(s, "%H:%M").unwrap(),
                        end: chrono::NaiveTime::parse_from_str(e, "%H:%M").unwrap(),
                    })
                    .collect(),
            ),
            timezone: timezone.to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn starts(iter: SlotIter) -> Vec<String> {
        iter.map(|s| s.start.format("%H:%M").to_string()).collect()
    }

    #[test]
    fn steps_through_window_by_duration() {
        // 2025-06-02 is a Monday
        let rules = vec![rule(Some(0), None, &[("09:00", "12:00")], "UTC")];
        let slots = generate_slots(date("2025-06-02"), &rules, 30, None);
        assert_eq!(
            starts(slots),
            vec!["09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
    }

    #[test]
    fn last_slot_must_fit_entirely() {
        let rules = vec![rule(Some(0), None, &[("09:00", "10:45")], "UTC")];
        let slots = generate_slots(date("2025-06-02"), &rules, 30, None);
        // 10:30 would end at 11:00, past the window end
        assert_eq!(starts(slots), vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn custom_interval_overrides_duration_step() {
        let rules = vec![rule(Some(0), None, &[("09:00", "10:30")], "UTC")];
        let slots = generate_slots(date("2025-06-02"), &rules, 60, Some(15));
        assert_eq!(starts(slots), vec!["09:00", "09:15", "09:30"]);
    }

    #[test]
    fn date_override_beats_weekday_rule() {
        let day = date("2025-06-02");
        let rules = vec![
            rule(Some(0), None, &[("09:00", "17:00")], "UTC"),
            rule(None, Some(day), &[("13:00", "14:00")], "UTC"),
        ];
        let slots = generate_slots(day, &rules, 30, None);
        assert_eq!(starts(slots), vec!["13:00", "13:30"]);
    }

    #[test]
    fn day_without_applicable_rule_yields_nothing() {
        // Tuesday has no rule
        let rules = vec![rule(Some(0), None, &[("09:00", "12:00")], "UTC")];
        let slots = generate_slots(date("2025-06-03"), &rules, 30, None);
        assert_eq!(slots.count(), 0);
    }

    #[test]
    fn inactive_rules_are_ignored() {
        let mut r = rule(Some(0), None, &[("09:00", "12:00")], "UTC");
        r.active = false;
        let slots = generate_slots(date("2025-06-02"), &[r], 30, None);
        assert_eq!(slots.count(), 0);
    }

    #[test]
    fn non_positive_duration_yields_empty_sequence() {
        let rules = vec![rule(Some(0), None, &[("09:00", "12:00")], "UTC")];
        assert_eq!(generate_slots(date("2025-06-02"), &rules, 0, None).count(), 0);
        assert_eq!(
            generate_slots(date("2025-06-02"), &rules, -30, None).count(),
            0
        );
    }

    #[test]
    fn local_times_resolve_in_rule_timezone() {
        // Warsaw is UTC+2 in June
        let rules = vec![rule(Some(0), None, &[("09:00", "10:00")], "Europe/Warsaw")];
        let slots: Vec<_> = generate_slots(date("2025-06-02"), &rules, 60, None).collect();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].start.format("%H:%M").to_string(), "07:00");
    }

    #[test]
    fn generation_is_deterministic_and_restartable() {
        let rules = vec![rule(Some(0), None, &[("09:00", "12:00")], "UTC")];
        let iter = generate_slots(date("2025-06-02"), &rules, 30, None);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        let again: Vec<_> = generate_slots(date("2025-06-02"), &rules, 30, None).collect();
        assert_eq!(first, again);
    }
}
