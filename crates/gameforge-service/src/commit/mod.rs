//! Commit engine.

pub mod service;

pub use service::{CommitFileInput, CommitService, CreateCommitRequest};
