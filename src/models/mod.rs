pub mod application;
pub mod club;
pub mod interview;
pub mod interview_slot;
pub mod notification;
