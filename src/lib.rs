pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use crate::services::{
    application_service::ApplicationService,
    booking_service::BookingService,
    club_service::ClubService,
    notification_service::{NotificationService, StoreNotificationSink},
    slot_service::SlotService,
};
use crate::store::{BookingPolicy, ClubStore, PgClubStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub club_service: ClubService,
    pub slot_service: SlotService,
    pub application_service: ApplicationService,
    pub booking_service: BookingService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let policy = BookingPolicy {
            allow_past_slots: config.allow_past_slot_booking,
        };
        Self::with_store(Arc::new(PgClubStore::new(pool)), policy)
    }

    /// Wire the services over any store; the test suite passes the
    /// in-memory one.
    pub fn with_store(store: Arc<dyn ClubStore>, policy: BookingPolicy) -> Self {
        let sink = Arc::new(StoreNotificationSink::new(store.clone()));

        Self {
            club_service: ClubService::new(store.clone()),
            slot_service: SlotService::new(store.clone(), policy),
            application_service: ApplicationService::new(store.clone()),
            booking_service: BookingService::new(store.clone(), sink, policy),
            notification_service: NotificationService::new(store),
        }
    }
}
