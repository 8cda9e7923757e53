//! # Songdrop Common Library
//!
//! Shared code for the Songdrop request-queue service including:
//! - Database models, initialization and migrations
//! - Error taxonomy
//! - Configuration loading and root folder resolution
//! - Admin session primitives

pub mod config;
pub mod db;
pub mod error;
pub mod session;

pub use db::models::{RequestStatus, SongRequest};
pub use error::{Error, Result};
