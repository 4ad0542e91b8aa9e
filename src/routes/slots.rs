use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::CreateSlotRequest;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::store::NewSlot;
use crate::AppState;

pub async fn list_open_slots(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let slots = state.slot_service.list_open_slots(club_id).await?;
    Ok(Json(slots))
}

pub async fn get_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let slot = state.slot_service.get_slot(id).await?;
    Ok(Json(slot))
}

pub async fn create_slot(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(club_id): Path<Uuid>,
    Json(payload): Json<CreateSlotRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!(admin_id = %admin.id, club_id = %club_id, "Creating interview slot");
    let slot = state
        .slot_service
        .create_slot(NewSlot {
            club_id,
            start_time: payload.start_time,
            end_time: payload.end_time,
            max_interviews: payload.max_interviews,
            location: payload.location,
            is_online: payload.is_online,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

pub async fn disable_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let slot = state.slot_service.disable_slot(id).await?;
    Ok(Json(slot))
}

pub async fn list_slot_interviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interviews = state.booking_service.list_for_slot(id).await?;
    Ok(Json(interviews))
}
