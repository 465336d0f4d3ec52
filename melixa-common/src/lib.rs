//! # MELIXA Common Library
//!
//! Shared code for the MELIXA gateway:
//! - API request/response types
//! - Configuration loading
//! - Common error types

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
