//! Frame-based sprite animation.
//!
//! - [`framesequence`] – atlas layout, frame duration and per-frame actions
//! - [`animationclock`] – playback over a table of named sequences
//! - [`definition`] – serde descriptors for loading sequences from JSON

pub mod animationclock;
pub mod definition;
pub mod framesequence;

pub use animationclock::AnimationClock;
pub use definition::SequenceDef;
pub use framesequence::{
    FrameAction, FrameDirection, FrameEntry, FrameRegion, FrameSequence, LayoutDirection,
};
