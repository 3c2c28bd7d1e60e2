//! # Filedrop Common Library
//!
//! Shared code for the filedrop services:
//! - Error types
//! - Configuration loading and base folder resolution
//! - Database pool initialization and table bootstrap

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
