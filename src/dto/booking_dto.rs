use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::Application;
use crate::models::interview::Interview;
use crate::models::interview_slot::InterviewSlot;
use crate::store::BookedInterview;

#[derive(Debug, Deserialize, Validate)]
pub struct BookInterviewRequest {
    pub application_id: Uuid,
    pub slot_id: Uuid,
    #[validate(length(max = 500))]
    pub additional_info: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct InterviewFeedbackRequest {
    #[validate(length(max = 2000))]
    pub feedback: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub interview: Interview,
    pub application: Application,
    pub slot: InterviewSlot,
}

impl From<BookedInterview> for BookingResponse {
    fn from(booked: BookedInterview) -> Self {
        Self {
            interview: booked.interview,
            application: booked.application,
            slot: booked.slot,
        }
    }
}
