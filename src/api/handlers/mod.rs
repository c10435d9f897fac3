//! HTTP request handlers for API endpoints.
//!
//! Handlers are grouped by audience: public board and registration, the
//! software-house owner area, and the admin area.

pub mod admin;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod me;
pub mod software_houses;
