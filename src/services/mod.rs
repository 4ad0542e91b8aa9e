pub mod application_service;
pub mod booking_service;
pub mod club_service;
pub mod notification_service;
pub mod slot_service;
