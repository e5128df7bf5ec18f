//! # gameforge-service
//!
//! Transactional services of the GameForge versioned file store.
//!
//! - [`GameService`] and [`FileService`] form the directory over games and
//!   the per-game path namespace.
//! - [`VersionService`] is the only writer of file versions and the sole
//!   authority for version numbers.
//! - [`CommitService`] binds several version writes and one commit record
//!   into a single transaction.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod commit;
pub mod file;
pub mod game;
pub mod retry;
pub mod validation;

pub use commit::{CommitFileInput, CommitService, CreateCommitRequest};
pub use file::{CreateFileRequest, FileService, UpdateFileRequest, VersionService};
pub use game::{CreateGameRequest, GameService, UpdateGameRequest};
pub use retry::RetryPolicy;
