pub mod booking;
pub mod common;
pub mod message;
pub mod notification;
pub mod review;
pub mod service;
pub mod user;
