use crate::error::{Error, Result};
use crate::models::application::{Application, ApplicationStatus};
use crate::models::club::Club;
use crate::models::interview::{Interview, InterviewStatus};
use crate::models::interview_slot::InterviewSlot;
use crate::models::notification::Notification;
use crate::store::{BookedInterview, BookingPolicy, BookingRequest, ClubStore, NewSlot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct MemoryState {
    clubs: HashMap<Uuid, Club>,
    applications: HashMap<Uuid, Application>,
    slots: HashMap<Uuid, InterviewSlot>,
    interviews: HashMap<Uuid, Interview>,
    notifications: HashMap<Uuid, Notification>,
}

/// In-memory `ClubStore` used by the test suite and for local development
/// without a database. One mutex over the whole state stands in for the
/// per-slot row lock; every booking runs its checks before touching the
/// state, so a failed booking leaves nothing behind.
#[derive(Default)]
pub struct MemoryClubStore {
    state: Mutex<MemoryState>,
}

impl MemoryClubStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClubStore for MemoryClubStore {
    async fn create_club(&self, name: &str, description: Option<&str>) -> Result<Club> {
        let now = Utc::now();
        let club = Club {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.map(str::to_string),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.clubs.insert(club.id, club.clone());
        Ok(club)
    }

    async fn get_club(&self, id: Uuid) -> Result<Club> {
        self.state
            .lock()
            .await
            .clubs
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Club not found".to_string()))
    }

    async fn list_clubs(&self) -> Result<Vec<Club>> {
        let mut clubs: Vec<Club> = self.state.lock().await.clubs.values().cloned().collect();
        clubs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clubs)
    }

    async fn set_club_active(&self, id: Uuid, active: bool) -> Result<Club> {
        let mut state = self.state.lock().await;
        let club = state
            .clubs
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Club not found".to_string()))?;
        club.is_active = active;
        club.updated_at = Utc::now();
        Ok(club.clone())
    }

    async fn insert_application(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        motivation: &str,
    ) -> Result<Application> {
        let mut state = self.state.lock().await;
        if !state.clubs.contains_key(&club_id) {
            return Err(Error::NotFound("Club not found".to_string()));
        }
        let duplicate = state
            .applications
            .values()
            .any(|a| a.user_id == user_id && a.club_id == club_id);
        if duplicate {
            return Err(Error::DuplicateApplication(
                "You have already applied to this club".to_string(),
            ));
        }

        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            user_id,
            club_id,
            motivation: motivation.to_string(),
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    async fn get_application(&self, id: Uuid) -> Result<Application> {
        self.state
            .lock()
            .await
            .applications
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))
    }

    async fn list_club_applications(&self, club_id: Uuid) -> Result<Vec<Application>> {
        let mut applications: Vec<Application> = self
            .state
            .lock()
            .await
            .applications
            .values()
            .filter(|a| a.club_id == club_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    async fn list_user_applications(&self, user_id: Uuid) -> Result<Vec<Application>> {
        let mut applications: Vec<Application> = self
            .state
            .lock()
            .await
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application> {
        let mut state = self.state.lock().await;
        let application = state
            .applications
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        if !application.status.can_transition_to(next) {
            return Err(Error::Conflict(format!(
                "Cannot move application from '{}' to '{}'",
                application.status, next
            )));
        }
        application.status = next;
        application.updated_at = Utc::now();
        Ok(application.clone())
    }

    async fn create_slot(&self, slot: NewSlot) -> Result<InterviewSlot> {
        let mut state = self.state.lock().await;
        if !state.clubs.contains_key(&slot.club_id) {
            return Err(Error::NotFound("Club not found".to_string()));
        }
        let now = Utc::now();
        let created = InterviewSlot {
            id: Uuid::new_v4(),
            club_id: slot.club_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            max_interviews: slot.max_interviews,
            booked_interviews: 0,
            location: slot.location,
            is_online: slot.is_online,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        state.slots.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_slot(&self, id: Uuid) -> Result<InterviewSlot> {
        self.state
            .lock()
            .await
            .slots
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Interview slot not found".to_string()))
    }

    async fn list_club_slots(&self, club_id: Uuid) -> Result<Vec<InterviewSlot>> {
        let mut slots: Vec<InterviewSlot> = self
            .state
            .lock()
            .await
            .slots
            .values()
            .filter(|s| s.club_id == club_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    async fn disable_slot(&self, id: Uuid) -> Result<InterviewSlot> {
        let mut state = self.state.lock().await;
        let slot = state
            .slots
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Interview slot not found".to_string()))?;
        slot.is_active = false;
        slot.updated_at = Utc::now();
        Ok(slot.clone())
    }

    async fn book_interview(
        &self,
        req: &BookingRequest,
        policy: BookingPolicy,
        now: DateTime<Utc>,
    ) -> Result<BookedInterview> {
        let mut state = self.state.lock().await;

        let application = state
            .applications
            .get(&req.application_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;

        let has_active = state
            .interviews
            .values()
            .any(|i| i.application_id == req.application_id && i.is_active());
        if has_active {
            return Err(Error::DuplicateBooking(
                "This application already has a scheduled interview".to_string(),
            ));
        }

        let slot = state
            .slots
            .get(&req.slot_id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Interview slot not found".to_string()))?;
        slot.ensure_bookable(now, policy)?;

        if !application.status.can_schedule_interview() {
            return Err(Error::Conflict(
                "This application has already been decided".to_string(),
            ));
        }

        // All checks passed; apply every mutation in one go.
        let interview = Interview {
            id: Uuid::new_v4(),
            application_id: req.application_id,
            slot_id: req.slot_id,
            scheduled_at: slot.start_time,
            status: InterviewStatus::Scheduled,
            additional_info: req.additional_info.clone(),
            phone: req.phone.clone(),
            feedback: None,
            rating: None,
            created_at: now,
            updated_at: now,
        };
        state.interviews.insert(interview.id, interview.clone());

        let slot = {
            let slot = state.slots.get_mut(&req.slot_id).expect("slot checked above");
            slot.booked_interviews += 1;
            slot.updated_at = now;
            slot.clone()
        };

        let application = {
            let application = state
                .applications
                .get_mut(&req.application_id)
                .expect("application checked above");
            application.status = ApplicationStatus::InterviewScheduled;
            application.updated_at = now;
            application.clone()
        };

        Ok(BookedInterview {
            interview,
            application,
            slot,
        })
    }

    async fn cancel_interview(&self, id: Uuid) -> Result<Interview> {
        let mut state = self.state.lock().await;
        let interview = state
            .interviews
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::Conflict(format!(
                "Cannot cancel an interview in status '{}'",
                interview.status
            )));
        }

        let now = Utc::now();
        if let Some(slot) = state.slots.get_mut(&interview.slot_id) {
            if slot.booked_interviews > 0 {
                slot.booked_interviews -= 1;
                slot.updated_at = now;
            }
        }
        let interview = state.interviews.get_mut(&id).expect("interview checked above");
        interview.status = InterviewStatus::Canceled;
        interview.updated_at = now;
        Ok(interview.clone())
    }

    async fn get_interview(&self, id: Uuid) -> Result<Interview> {
        self.state
            .lock()
            .await
            .interviews
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))
    }

    async fn list_slot_interviews(&self, slot_id: Uuid) -> Result<Vec<Interview>> {
        let mut interviews: Vec<Interview> = self
            .state
            .lock()
            .await
            .interviews
            .values()
            .filter(|i| i.slot_id == slot_id)
            .cloned()
            .collect();
        interviews.sort_by_key(|i| i.created_at);
        Ok(interviews)
    }

    async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Option<&str>,
        rating: Option<i32>,
    ) -> Result<Interview> {
        let mut state = self.state.lock().await;
        let interview = state
            .interviews
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;
        if interview.status != InterviewStatus::Scheduled {
            return Err(Error::Conflict(format!(
                "Cannot record feedback for an interview in status '{}'",
                interview.status
            )));
        }
        interview.status = InterviewStatus::Completed;
        interview.feedback = feedback.map(str::to_string);
        interview.rating = rating;
        interview.updated_at = Utc::now();
        Ok(interview.clone())
    }

    async fn insert_notification(&self, user_id: Uuid, message: &str) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id,
            message: message.to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .await
            .notifications
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut notifications: Vec<Notification> = self
            .state
            .lock()
            .await
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        let mut state = self.state.lock().await;
        let notification = state
            .notifications
            .get_mut(&id)
            .filter(|n| n.user_id == user_id)
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;
        notification.is_read = true;
        Ok(notification.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Arc;

    async fn seed(store: &MemoryClubStore, max_interviews: i32) -> (Club, InterviewSlot) {
        let club = store.create_club("Robotics Club", None).await.unwrap();
        let start = Utc::now() + Duration::days(1);
        let slot = store
            .create_slot(NewSlot {
                club_id: club.id,
                start_time: start,
                end_time: start + Duration::hours(2),
                max_interviews,
                location: Some("Lab 2".into()),
                is_online: false,
            })
            .await
            .unwrap();
        (club, slot)
    }

    async fn apply(store: &MemoryClubStore, club_id: Uuid) -> Application {
        store
            .insert_application(Uuid::new_v4(), club_id, "I love robotics")
            .await
            .unwrap()
    }

    fn booking(application_id: Uuid, slot_id: Uuid) -> BookingRequest {
        BookingRequest {
            application_id,
            slot_id,
            additional_info: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn second_submission_is_a_duplicate() {
        let store = MemoryClubStore::new();
        let (club, _) = seed(&store, 1).await;
        let user = Uuid::new_v4();

        store
            .insert_application(user, club.id, "I love robotics")
            .await
            .unwrap();
        let err = store
            .insert_application(user, club.id, "Second try")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateApplication(_)));

        let applications = store.list_club_applications(club.id).await.unwrap();
        assert_eq!(applications.len(), 1);
    }

    #[tokio::test]
    async fn booking_creates_interview_and_updates_everything() {
        let store = MemoryClubStore::new();
        let (club, slot) = seed(&store, 2).await;
        let application = apply(&store, club.id).await;

        let booked = store
            .book_interview(
                &booking(application.id, slot.id),
                BookingPolicy::default(),
                Utc::now(),
            )
            .await
            .unwrap();

        assert_eq!(booked.interview.status, InterviewStatus::Scheduled);
        assert_eq!(booked.interview.scheduled_at, slot.start_time);
        assert_eq!(booked.slot.booked_interviews, 1);
        assert_eq!(
            booked.application.status,
            ApplicationStatus::InterviewScheduled
        );
    }

    #[tokio::test]
    async fn one_application_cannot_book_twice() {
        let store = MemoryClubStore::new();
        let (club, slot) = seed(&store, 5).await;
        let application = apply(&store, club.id).await;
        let req = booking(application.id, slot.id);

        store
            .book_interview(&req, BookingPolicy::default(), Utc::now())
            .await
            .unwrap();
        let err = store
            .book_interview(&req, BookingPolicy::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateBooking(_)));
        assert_eq!(store.get_slot(slot.id).await.unwrap().booked_interviews, 1);
    }

    #[tokio::test]
    async fn one_application_racing_two_slots_books_exactly_one() {
        let store = Arc::new(MemoryClubStore::new());
        let (club, first_slot) = seed(&store, 2).await;
        let start = Utc::now() + Duration::days(2);
        let second_slot = store
            .create_slot(NewSlot {
                club_id: club.id,
                start_time: start,
                end_time: start + Duration::hours(2),
                max_interviews: 2,
                location: None,
                is_online: true,
            })
            .await
            .unwrap();
        let application = apply(&store, club.id).await;

        let mut handles = Vec::new();
        for slot_id in [first_slot.id, second_slot.id] {
            let store = store.clone();
            let req = booking(application.id, slot_id);
            handles.push(tokio::spawn(async move {
                store
                    .book_interview(&req, BookingPolicy::default(), Utc::now())
                    .await
            }));
        }

        let mut successes = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(Error::DuplicateBooking(_)) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);

        let booked_total = store
            .get_slot(first_slot.id)
            .await
            .unwrap()
            .booked_interviews
            + store
                .get_slot(second_slot.id)
                .await
                .unwrap()
                .booked_interviews;
        assert_eq!(booked_total, 1);
    }

    #[tokio::test]
    async fn capacity_one_slot_takes_exactly_one_of_two_bookers() {
        let store = Arc::new(MemoryClubStore::new());
        let (club, slot) = seed(&store, 1).await;
        let first = apply(&store, club.id).await;
        let second = apply(&store, club.id).await;

        let mut handles = Vec::new();
        for application_id in [first.id, second.id] {
            let store = store.clone();
            let req = booking(application_id, slot.id);
            handles.push(tokio::spawn(async move {
                store
                    .book_interview(&req, BookingPolicy::default(), Utc::now())
                    .await
            }));
        }

        let mut successes = 0;
        let mut unavailable = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(Error::SlotUnavailable(_)) => unavailable += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(unavailable, 1);
        assert_eq!(store.get_slot(slot.id).await.unwrap().booked_interviews, 1);
    }

    #[tokio::test]
    async fn overbooked_slot_admits_exactly_capacity() {
        let store = Arc::new(MemoryClubStore::new());
        let capacity = 3;
        let contenders = 8;
        let (club, slot) = seed(&store, capacity).await;

        let mut handles = Vec::new();
        for _ in 0..contenders {
            let application = apply(&store, club.id).await;
            let store = store.clone();
            let req = booking(application.id, slot.id);
            handles.push(tokio::spawn(async move {
                store
                    .book_interview(&req, BookingPolicy::default(), Utc::now())
                    .await
            }));
        }

        let mut successes = 0;
        let mut unavailable = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(Error::SlotUnavailable(_)) => unavailable += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, capacity);
        assert_eq!(unavailable, contenders - capacity);

        let slot = store.get_slot(slot.id).await.unwrap();
        assert_eq!(slot.booked_interviews, capacity);
        assert!(slot.booked_interviews <= slot.max_interviews);
    }

    #[tokio::test]
    async fn failed_booking_leaves_no_trace() {
        let store = MemoryClubStore::new();
        let (club, slot) = seed(&store, 2).await;
        let application = apply(&store, club.id).await;

        // Decide the application without ever booking it; the booking then
        // fails and must leave the slot and interview table untouched.
        store
            .update_application_status(application.id, ApplicationStatus::Rejected)
            .await
            .unwrap();

        let err = store
            .book_interview(
                &booking(application.id, slot.id),
                BookingPolicy::default(),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        assert_eq!(store.get_slot(slot.id).await.unwrap().booked_interviews, 0);
        assert!(store.list_slot_interviews(slot.id).await.unwrap().is_empty());
        assert_eq!(
            store.get_application(application.id).await.unwrap().status,
            ApplicationStatus::Rejected
        );
    }

    #[tokio::test]
    async fn cancellation_frees_the_seat_and_allows_rebooking() {
        let store = MemoryClubStore::new();
        let (club, slot) = seed(&store, 1).await;
        let application = apply(&store, club.id).await;
        let req = booking(application.id, slot.id);

        let booked = store
            .book_interview(&req, BookingPolicy::default(), Utc::now())
            .await
            .unwrap();
        store.cancel_interview(booked.interview.id).await.unwrap();
        assert_eq!(store.get_slot(slot.id).await.unwrap().booked_interviews, 0);

        let rebooked = store
            .book_interview(&req, BookingPolicy::default(), Utc::now())
            .await
            .unwrap();
        assert_eq!(rebooked.slot.booked_interviews, 1);
        assert_eq!(
            rebooked.application.status,
            ApplicationStatus::InterviewScheduled
        );
    }

    #[tokio::test]
    async fn disabled_slot_refuses_bookings() {
        let store = MemoryClubStore::new();
        let (club, slot) = seed(&store, 2).await;
        let application = apply(&store, club.id).await;

        store.disable_slot(slot.id).await.unwrap();
        let err = store
            .book_interview(
                &booking(application.id, slot.id),
                BookingPolicy::default(),
                Utc::now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SlotUnavailable(_)));
    }

    #[tokio::test]
    async fn past_slot_needs_the_policy_flag() {
        let store = MemoryClubStore::new();
        let (club, slot) = seed(&store, 2).await;
        let application = apply(&store, club.id).await;
        let after_start = slot.start_time + Duration::minutes(5);

        let err = store
            .book_interview(
                &booking(application.id, slot.id),
                BookingPolicy::default(),
                after_start,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SlotUnavailable(_)));

        store
            .book_interview(
                &booking(application.id, slot.id),
                BookingPolicy {
                    allow_past_slots: true,
                },
                after_start,
            )
            .await
            .unwrap();
    }
}
