use crate::error::Error;
use crate::store::BookingPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewSlot {
    pub id: Uuid,
    pub club_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_interviews: i32,
    pub booked_interviews: i32,
    pub location: Option<String>,
    pub is_online: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSlot {
    pub fn remaining_capacity(&self) -> i32 {
        (self.max_interviews - self.booked_interviews).max(0)
    }

    /// The single availability check every booking path goes through:
    /// the slot must be enabled, have free capacity, and (unless the
    /// policy allows it) must not have started yet.
    pub fn ensure_bookable(&self, now: DateTime<Utc>, policy: BookingPolicy) -> Result<(), Error> {
        if !self.is_active {
            return Err(Error::SlotUnavailable(
                "This interview slot has been disabled".to_string(),
            ));
        }
        if self.booked_interviews >= self.max_interviews {
            return Err(Error::SlotUnavailable(
                "This interview slot is fully booked".to_string(),
            ));
        }
        if !policy.allow_past_slots && now >= self.start_time {
            return Err(Error::SlotUnavailable(
                "This interview slot has already started".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_bookable(&self, now: DateTime<Utc>, policy: BookingPolicy) -> bool {
        self.ensure_bookable(now, policy).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn slot(booked: i32, max: i32, starts_in: Duration) -> InterviewSlot {
        let now = Utc::now();
        InterviewSlot {
            id: Uuid::new_v4(),
            club_id: Uuid::new_v4(),
            start_time: now + starts_in,
            end_time: now + starts_in + Duration::hours(1),
            max_interviews: max,
            booked_interviews: booked,
            location: Some("Room 101".into()),
            is_online: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn open_slot_is_bookable() {
        let s = slot(0, 2, Duration::hours(4));
        assert!(s.ensure_bookable(Utc::now(), BookingPolicy::default()).is_ok());
        assert_eq!(s.remaining_capacity(), 2);
    }

    #[test]
    fn full_slot_is_refused() {
        let s = slot(2, 2, Duration::hours(4));
        let err = s
            .ensure_bookable(Utc::now(), BookingPolicy::default())
            .unwrap_err();
        assert!(matches!(err, Error::SlotUnavailable(_)));
    }

    #[test]
    fn disabled_slot_is_refused() {
        let mut s = slot(0, 2, Duration::hours(4));
        s.is_active = false;
        assert!(!s.is_bookable(Utc::now(), BookingPolicy::default()));
    }

    #[test]
    fn started_slot_depends_on_policy() {
        let s = slot(0, 2, Duration::hours(-1));
        assert!(!s.is_bookable(Utc::now(), BookingPolicy::default()));
        assert!(s.is_bookable(
            Utc::now(),
            BookingPolicy {
                allow_past_slots: true
            }
        ));
    }
}
