//! Adapters layer exposing the application over external interfaces

pub mod http;
