//! Admin dashboard HTTP API.

pub mod notifications;
pub mod registrations;
pub mod users;
