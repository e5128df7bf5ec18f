//! Commit domain entities.

pub mod model;

pub use model::{Commit, CommitDetail, CommitFile, CommitMember};
