pub mod api;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod messages;
pub mod notifications;
pub mod reviews;
pub mod storage;
pub mod users;
