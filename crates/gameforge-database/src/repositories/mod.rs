//! Repository implementations for all store entities.

pub mod commit;
pub mod file;
pub mod game;
pub mod version;

pub use commit::CommitRepository;
pub use file::FileRepository;
pub use game::GameRepository;
pub use version::VersionRepository;
