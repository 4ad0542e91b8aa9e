pub mod applications;
pub mod bookings;
pub mod clubs;
pub mod health;
pub mod notifications;
pub mod slots;

use crate::config::get_config;
use crate::middleware::{auth, rate_limit};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Full API surface. Member routes require any authenticated principal,
/// admin routes the admin role; each group gets its own rate limit.
pub fn router(state: AppState) -> Router {
    let config = get_config();

    let base = Router::new().route("/health", get(health::health));

    let member_api = Router::new()
        .route("/api/clubs", get(clubs::list_clubs))
        .route("/api/clubs/:id", get(clubs::get_club))
        .route("/api/clubs/:id/slots", get(slots::list_open_slots))
        .route("/api/clubs/:id/apply", post(applications::submit_application))
        .route("/api/me/applications", get(applications::list_my_applications))
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .layer(axum::middleware::from_fn(auth::require_bearer_auth))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.member_rps),
            rate_limit::rps_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/admin/clubs", post(clubs::create_club))
        .route("/api/admin/clubs/:id/active", post(clubs::set_club_active))
        .route("/api/admin/clubs/:id/slots", post(slots::create_slot))
        .route(
            "/api/admin/clubs/:id/applications",
            get(applications::list_club_applications),
        )
        .route(
            "/api/admin/applications/:id/status",
            post(applications::decide_application),
        )
        .route("/api/admin/slots/:id", get(slots::get_slot))
        .route("/api/admin/slots/:id/disable", post(slots::disable_slot))
        .route(
            "/api/admin/slots/:id/interviews",
            get(slots::list_slot_interviews),
        )
        .route("/api/admin/bookings", post(bookings::book_interview))
        .route("/api/admin/interviews/:id", get(bookings::get_interview))
        .route(
            "/api/admin/interviews/:id/cancel",
            post(bookings::cancel_interview),
        )
        .route(
            "/api/admin/interviews/:id/feedback",
            post(bookings::record_feedback),
        )
        .layer(axum::middleware::from_fn(auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::new_rps_state(config.admin_rps),
            rate_limit::rps_middleware,
        ));

    base.merge(member_api).merge(admin_api).with_state(state)
}
