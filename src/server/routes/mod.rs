//! HTTP route handlers

pub mod detection;
pub mod health;
pub mod languages;
pub mod synthesis;
