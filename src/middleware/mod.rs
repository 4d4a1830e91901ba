//! Request extractors for authentication and event permissions.

pub mod auth;
pub mod permission;
