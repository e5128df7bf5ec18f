//! Core type definitions used across the GameForge workspace.

pub mod clock;
pub mod id;
pub mod pagination;

pub use clock::now;
pub use id::*;
pub use pagination::{PageRequest, PageResponse};
