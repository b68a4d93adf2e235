//! Database models (SQLx).

pub mod brand;
pub mod user;
pub mod vehicle;
