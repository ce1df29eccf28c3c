//! ECS resources made available to systems.
//!
//! Overview
//! - `deferred` – world changes queued for the end of the host frame
//! - `gameconfig` – timing and seed settings loaded from INI
//! - `gamerng` – seedable random number generator
//! - `timecontrol` – timeline rate change requests
//! - `worldtime` – snapshot of the sub-step being simulated
pub mod deferred;
pub mod gameconfig;
pub mod gamerng;
pub mod timecontrol;
pub mod worldtime;
