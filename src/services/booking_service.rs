use crate::error::Result;
use crate::models::interview::Interview;
use crate::services::notification_service::NotificationSink;
use crate::store::{BookedInterview, BookingPolicy, BookingRequest, ClubStore};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// The transactional core: matches an application to a slot, all-or-nothing.
/// The store performs steps 1-5 of the booking atomically; this service
/// wraps them with logging and the post-commit notification.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn ClubStore>,
    sink: Arc<dyn NotificationSink>,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        store: Arc<dyn ClubStore>,
        sink: Arc<dyn NotificationSink>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            store,
            sink,
            policy,
        }
    }

    pub async fn book(&self, req: BookingRequest) -> Result<BookedInterview> {
        let booked = self
            .store
            .book_interview(&req, self.policy, Utc::now())
            .await?;

        tracing::info!(
            interview_id = %booked.interview.id,
            application_id = %booked.application.id,
            slot_id = %booked.slot.id,
            booked = booked.slot.booked_interviews,
            capacity = booked.slot.max_interviews,
            "Interview booked"
        );

        let message = format!(
            "Your interview has been scheduled for {}",
            booked.interview.scheduled_at.to_rfc3339()
        );
        // The booking is committed; a sink hiccup must not undo it.
        if let Err(err) = self
            .sink
            .notify(booked.application.user_id, &message)
            .await
        {
            tracing::warn!(
                application_id = %booked.application.id,
                error = %err,
                "Failed to notify applicant about booking"
            );
        }

        Ok(booked)
    }

    pub async fn cancel(&self, interview_id: Uuid) -> Result<Interview> {
        let interview = self.store.cancel_interview(interview_id).await?;
        tracing::info!(
            interview_id = %interview.id,
            application_id = %interview.application_id,
            "Interview canceled"
        );

        let application = self.store.get_application(interview.application_id).await?;
        let message = format!(
            "Your interview scheduled for {} has been canceled",
            interview.scheduled_at.to_rfc3339()
        );
        if let Err(err) = self.sink.notify(application.user_id, &message).await {
            tracing::warn!(
                interview_id = %interview.id,
                error = %err,
                "Failed to notify applicant about cancellation"
            );
        }

        Ok(interview)
    }

    pub async fn get_interview(&self, id: Uuid) -> Result<Interview> {
        self.store.get_interview(id).await
    }

    pub async fn list_for_slot(&self, slot_id: Uuid) -> Result<Vec<Interview>> {
        self.store.list_slot_interviews(slot_id).await
    }

    pub async fn record_feedback(
        &self,
        id: Uuid,
        feedback: Option<&str>,
        rating: Option<i32>,
    ) -> Result<Interview> {
        let interview = self.store.record_feedback(id, feedback, rating).await?;
        tracing::info!(interview_id = %interview.id, "Interview feedback recorded");
        Ok(interview)
    }
}
