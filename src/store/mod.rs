pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::club::Club;
use crate::models::interview::Interview;
use crate::models::interview_slot::InterviewSlot;
use crate::models::notification::Notification;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use memory::MemoryClubStore;
pub use postgres::PgClubStore;

/// Booking policy knobs resolved from configuration at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingPolicy {
    /// Allow booking into a slot whose start time has already passed.
    pub allow_past_slots: bool,
}

#[derive(Debug, Clone)]
pub struct NewSlot {
    pub club_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_interviews: i32,
    pub location: Option<String>,
    pub is_online: bool,
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub application_id: Uuid,
    pub slot_id: Uuid,
    pub additional_info: Option<String>,
    pub phone: Option<String>,
}

/// Everything a successful booking touched, returned in one piece so the
/// caller can notify and respond without re-reading.
#[derive(Debug, Clone)]
pub struct BookedInterview {
    pub interview: Interview,
    pub application: Application,
    pub slot: InterviewSlot,
}

/// Persistence contract for the whole club domain. `PgClubStore` is the
/// production implementation; `MemoryClubStore` backs the test suite and
/// local development. Both route their availability and status checks
/// through the same model-level functions.
#[async_trait]
pub trait ClubStore: Send + Sync {
    // Clubs
    async fn create_club(&self, name: &str, description: Option<&str>) -> Result<Club>;
    async fn get_club(&self, id: Uuid) -> Result<Club>;
    async fn list_clubs(&self) -> Result<Vec<Club>>;
    async fn set_club_active(&self, id: Uuid, active: bool) -> Result<Club>;

    // Applications
    async fn insert_application(
        &self,
        user_id: Uuid,
        club_id: Uuid,
        motivation: &str,
    ) -> Result<Application>;
    async fn get_application(&self, id: Uuid) -> Result<Application>;
    async fn list_club_applications(&self, club_id: Uuid) -> Result<Vec<Application>>;
    async fn list_user_applications(&self, user_id: Uuid) -> Result<Vec<Application>>;
    async fn update_application_status(
        &self,
        id: Uuid,
        next: ApplicationStatus,
    ) -> Result<Application>;

    // Interview slots
    async fn create_slot(&self, slot: NewSlot) -> Result<InterviewSlot>;
    async fn get_slot(&self, id: Uuid) -> Result<InterviewSlot>;
    async fn list_club_slots(&self, club_id: Uuid) -> Result<Vec<InterviewSlot>>;
    async fn disable_slot(&self, id: Uuid) -> Result<InterviewSlot>;

    // Booking core: atomic, all-or-nothing.
    async fn book_interview(
        &self,
        req: &BookingRequest,
        policy: BookingPolicy,
        now: DateTime<Utc>,
    ) -> Result<BookedInterview>;
    async fn cancel_interview(&self, id: Uuid) -> Result<Interview>;
    async fn get_interview(&self, id: Uuid) -> Result<Interview>;
    async fn list_slot_interviews(&self, slot_id: Uuid) -> Result<Vec<Interview>>;
    async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Option<&str>,
        rating: Option<i32>,
    ) -> Result<Interview>;

    // Notifications
    async fn insert_notification(&self, user_id: Uuid, message: &str) -> Result<Notification>;
    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>>;
    async fn mark_notification_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification>;
}
