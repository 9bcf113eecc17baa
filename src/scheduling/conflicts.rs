use chrono::{DateTime, Duration, Utc};

use crate::db::{Booking, BookingStatus};
use crate::scheduling::slots::TimeSlot;

/// Half-open interval intersection: `[a0, a1)` and `[b0, b1)` intersect
/// iff `a0 < b1 && b0 < a1`. Back-to-back intervals sharing a boundary do
/// not intersect. This is the single correctness-critical predicate of the
/// booking path.
pub fn intersects(
    a0: DateTime<Utc>,
    a1: DateTime<Utc>,
    b0: DateTime<Utc>,
    b1: DateTime<Utc>,
) -> bool {
    a0 < b1 && b0 < a1
}

/// Buffer-padded overlap between a slot and a committed booking. Both
/// intervals are widened by the same buffer settings; bookings do not carry
/// their own buffers, so the event type's apply to both sides.
pub fn conflicts_with_booking(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    booking: &Booking,
    buffer_before: Duration,
    buffer_after: Duration,
) -> bool {
    if booking.status == BookingStatus::Cancelled {
        return false;
    }
    intersects(
        start - buffer_before,
        end + buffer_after,
        booking.start_time - buffer_before,
        booking.end_time + buffer_after,
    )
}

/// Mark each slot's availability against the committed booking set.
///
/// A slot is unavailable if its padded interval intersects any
/// non-cancelled booking's padded interval, or if it starts before
/// `now + minimum_notice`. Ordering is preserved; nothing is dropped or
/// deduplicated.
pub fn filter_available(
    slots: impl IntoIterator<Item = TimeSlot>,
    bookings: &[Booking],
    buffer_before_minutes: i64,
    buffer_after_minutes: i64,
    minimum_notice_minutes: i64,
    now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let buffer_before = Duration::minutes(buffer_before_minutes.max(0));
    let buffer_after = Duration::minutes(buffer_after_minutes.max(0));
    let earliest_start = now + Duration::minutes(minimum_notice_minutes.max(0));

    slots
        .into_iter()
        .map(|slot| {
            let available = slot.start >= earliest_start
                && !bookings.iter().any(|booking| {
                    conflicts_with_booking(
                        slot.start,
                        slot.end,
                        booking,
                        buffer_before,
                        buffer_after,
                    )
                });
            TimeSlot { available, ..slot }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn at(time: &str) -> DateTime<Utc> {
        format!("2025-06-02T{time}:00Z").parse().unwrap()
    }

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            start: at(start),
            end: at(end),
            available: true,
        }
    }

    fn booking(start: &str, end: &str, status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::now_v7(),
            event_type_id: Uuid::now_v7(),
            owner_id: Uuid::now_v7(),
            start_time: at(start),
            end_time: at(end),
            client_name: "Ada".to_string(),
            client_email: "ada@example.com".to_string(),
            client_phone: "+48123456789".to_string(),
            notes: None,
            timezone: None,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn intersects_is_symmetric() {
        let cases = [
            ("09:00", "10:00", "09:30", "10:30"),
            ("09:00", "10:00", "10:00", "11:00"),
            ("09:00", "12:00", "10:00", "10:30"),
            ("09:00", "09:30", "11:00", "11:30"),
        ];
        for (a0, a1, b0, b1) in cases {
            assert_eq!(
                intersects(at(a0), at(a1), at(b0), at(b1)),
                intersects(at(b0), at(b1), at(a0), at(a1)),
                "symmetry broken for [{a0},{a1}) vs [{b0},{b1})"
            );
        }
    }

    #[test]
    fn back_to_back_intervals_do_not_intersect() {
        assert!(!intersects(
            at("10:00"),
            at("10:30"),
            at("10:30"),
            at("11:00")
        ));
    }

    #[test]
    fn containment_and_partial_overlap_intersect() {
        assert!(intersects(at("09:00"), at("12:00"), at("10:00"), at("10:30")));
        assert!(intersects(at("09:00"), at("10:00"), at("09:30"), at("10:30")));
    }

    #[test]
    fn buffer_after_widens_the_booking() {
        let taken = [booking("10:00", "10:30", BookingStatus::Confirmed)];
        let slots = vec![slot("10:30", "11:00"), slot("10:45", "11:15")];
        let result = filter_available(slots, &taken, 0, 15, 0, at("06:00"));
        // bufferAfter=15m pushes the booking out to 10:45
        assert!(!result[0].available);
        assert!(result[1].available);
    }

    #[test]
    fn minimum_notice_excludes_near_slots() {
        let slots = vec![slot("10:30", "11:00"), slot("11:00", "11:30")];
        let result = filter_available(slots, &[], 0, 0, 120, at("09:00"));
        assert!(!result[0].available);
        assert!(result[1].available);
    }

    #[test]
    fn cancelled_bookings_do_not_block() {
        let taken = [booking("10:00", "10:30", BookingStatus::Cancelled)];
        let result = filter_available(vec![slot("10:00", "10:30")], &taken, 0, 0, 0, at("06:00"));
        assert!(result[0].available);
    }

    #[test]
    fn ordering_is_preserved() {
        let slots = vec![slot("11:00", "11:30"), slot("09:00", "09:30")];
        let result = filter_available(slots.clone(), &[], 0, 0, 0, at("06:00"));
        assert_eq!(result[0].start, slots[0].start);
        assert_eq!(result[1].start, slots[1].start);
    }
}
