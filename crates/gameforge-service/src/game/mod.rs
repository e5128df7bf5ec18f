//! Game directory service.

pub mod service;

pub use service::{CreateGameRequest, GameService, UpdateGameRequest};
