use crate::models::application::ApplicationStatus;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitApplicationRequest {
    #[validate(length(
        min = 10,
        max = 2000,
        message = "Motivation must be between 10 and 2000 characters"
    ))]
    pub motivation: String,
}

#[derive(Debug, Deserialize)]
pub struct DecideApplicationRequest {
    pub status: ApplicationStatus,
}
