use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::application_dto::{DecideApplicationRequest, SubmitApplicationRequest};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

pub async fn submit_application(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(club_id): Path<Uuid>,
    Json(payload): Json<SubmitApplicationRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .submit(user.id, club_id, &payload.motivation)
        .await?;
    Ok((StatusCode::CREATED, Json(application)))
}

pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_user(user.id).await?;
    Ok(Json(applications))
}

pub async fn list_club_applications(
    State(state): State<AppState>,
    Path(club_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_club(club_id).await?;
    Ok(Json(applications))
}

pub async fn decide_application(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideApplicationRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(admin_id = %admin.id, application_id = %id, "Deciding application");
    let application = state.application_service.decide(id, payload.status).await?;
    Ok(Json(application))
}
