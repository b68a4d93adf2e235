//! HTTP request handlers.

pub mod auth;
pub mod brands;
pub mod health;
pub mod users;
pub mod vehicles;
