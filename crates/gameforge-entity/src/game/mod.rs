//! Game entities.

pub mod model;

pub use model::Game;
