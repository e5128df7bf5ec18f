//! # gameforge-core
//!
//! Core crate for GameForge. Contains the unified error system,
//! configuration schemas, typed identifiers, and pagination types shared
//! by the store crates.
//!
//! This crate has **no** internal dependencies on other GameForge crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
