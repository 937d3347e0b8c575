//! HTTP handlers.

pub mod auth;

pub use auth::{health, login, logout, me};
