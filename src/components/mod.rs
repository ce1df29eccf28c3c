//! ECS components for entities.
//!
//! Submodules overview:
//! - [`animated`] – an animation clock bound to an entity
//! - [`drawable`] – what the renderer draws for an entity
//! - [`ontimeline`] – which timeline simulates an entity
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`rigidbody`] – simple kinematic body storing velocity
//! - [`rotation`] – rotation angle in degrees
//! - [`scale`] – 2D scale factor for sprites
//! - [`tween`] – animated interpolation of position, rotation, and scale
//! - [`zindex`] – rendering order hint for 2D drawing

pub mod animated;
pub mod drawable;
pub mod mapposition;
pub mod ontimeline;
pub mod rigidbody;
pub mod rotation;
pub mod scale;
pub mod tween;
pub mod zindex;
