use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClubRequest {
    #[validate(length(min = 1, max = 120, message = "Club name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetClubActiveRequest {
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(range(min = 1, max = 100, message = "Capacity must be between 1 and 100"))]
    pub max_interviews: i32,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[serde(default)]
    pub is_online: bool,
}
