//! Application layer containing use cases

pub mod auth;
