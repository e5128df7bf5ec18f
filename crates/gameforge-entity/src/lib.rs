//! # gameforge-entity
//!
//! Entity models for the GameForge versioned file store. Every struct in
//! this crate is either a database table row or a composite read model
//! assembled from a join. Row entities derive `sqlx::FromRow`.

pub mod commit;
pub mod file;
pub mod game;

pub use commit::{Commit, CommitDetail, CommitFile, CommitMember};
pub use file::{FileVersion, FileWithContent, GameFile};
pub use game::Game;
