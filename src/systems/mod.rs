//! Engine systems.
//!
//! The per-sub-step systems below run inside every timeline's schedule, in
//! this order: [`animation`], [`movement`], then the [`tween`] systems. The
//! remaining two run once per host frame.
//!
//! Submodules overview
//! - [`animation`] – advance animation clocks and sync sprite frames
//! - [`deferred`] – run end-of-tick actions queued by frame actions
//! - [`movement`] – integrate positions from rigid body velocities
//! - [`render`] – dispatch drawables to a host-provided renderer
//! - [`tween`] – animate position, rotation, and scale over time

pub mod animation;
pub mod deferred;
pub mod movement;
pub mod render;
pub mod tween;
