//! Warpclock library.
//!
//! Variable-rate timelines for fixed-step 2D games: simulation that runs
//! faster, slower, frozen or backward while the host loop keeps its frame
//! rate, plus sprite animation that follows the timeline in either
//! direction. The ECS layer is exposed for integration tests and reuse.

pub mod animation;
pub mod components;
pub mod error;
pub mod game;
pub mod resources;
pub mod systems;
pub mod timing;
