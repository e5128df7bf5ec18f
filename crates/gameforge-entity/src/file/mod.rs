//! File domain entities.

pub mod model;
pub mod version;

pub use model::{FileWithContent, GameFile};
pub use version::FileVersion;
