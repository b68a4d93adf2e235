//! Business logic services.

pub mod auth_service;
pub mod bootstrap_service;
pub mod catalog_service;
pub mod queue_consumer;
pub mod user_service;
