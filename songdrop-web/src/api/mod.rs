//! HTTP API handlers for songdrop-web

pub mod admin;
pub mod auth;
pub mod error;
pub mod health;
pub mod public;
pub mod ui;

pub use error::ApiError;
