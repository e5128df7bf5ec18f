//! File directory and versioning services.

pub mod service;
pub mod version;

pub use service::{CreateFileRequest, FileService};
pub use version::{UpdateFileRequest, VersionDraft, VersionService};
