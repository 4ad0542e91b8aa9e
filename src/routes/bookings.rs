use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::booking_dto::{BookInterviewRequest, BookingResponse, InterviewFeedbackRequest};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::store::BookingRequest;
use crate::AppState;

pub async fn book_interview(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Json(payload): Json<BookInterviewRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!(
        admin_id = %admin.id,
        application_id = %payload.application_id,
        slot_id = %payload.slot_id,
        "Booking interview"
    );
    let booked = state
        .booking_service
        .book(BookingRequest {
            application_id: payload.application_id,
            slot_id: payload.slot_id,
            additional_info: payload.additional_info,
            phone: payload.phone,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booked))))
}

pub async fn get_interview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state.booking_service.get_interview(id).await?;
    Ok(Json(interview))
}

pub async fn cancel_interview(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    tracing::info!(admin_id = %admin.id, interview_id = %id, "Canceling interview");
    let interview = state.booking_service.cancel(id).await?;
    Ok(Json(interview))
}

pub async fn record_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InterviewFeedbackRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .booking_service
        .record_feedback(id, payload.feedback.as_deref(), payload.rating)
        .await?;
    Ok(Json(interview))
}
