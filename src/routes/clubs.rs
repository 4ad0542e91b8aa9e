use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::admin_dto::{CreateClubRequest, SetClubActiveRequest};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

pub async fn list_clubs(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let clubs = state.club_service.list_clubs().await?;
    Ok(Json(clubs))
}

pub async fn get_club(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let club = state.club_service.get_club(id).await?;
    Ok(Json(club))
}

pub async fn create_club(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Json(payload): Json<CreateClubRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    tracing::info!(admin_id = %admin.id, "Creating club");
    let club = state
        .club_service
        .create_club(&payload.name, payload.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(club)))
}

pub async fn set_club_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetClubActiveRequest>,
) -> Result<impl IntoResponse> {
    let club = state.club_service.set_active(id, payload.active).await?;
    Ok(Json(club))
}
