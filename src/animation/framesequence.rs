//! Frame sequences (sprite sheet strips).
//!
//! A [`FrameSequence`] is an ordered run of frames laid out on a texture
//! atlas, all shown for the same duration. Each frame index carries two
//! callback lists: one fired when playback enters the frame moving forward,
//! one fired when it enters moving backward.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::AnimationError;
use crate::timing::{Ticks, millis_to_ticks};

/// How frames are ordered on the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Row-major: fill a row left to right, then move down.
    #[default]
    LeftToRight,
    /// Column-major: fill a column top to bottom, then move right.
    TopToBottom,
}

/// Which callback list a frame action belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameDirection {
    Forward,
    Reverse,
}

/// Passed to frame actions when they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEntry {
    pub frame: usize,
    pub direction: FrameDirection,
}

/// Pixel rectangle of one frame on the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Side effect run on a frame-entry event.
pub type FrameAction<Ctx> = Box<dyn FnMut(&mut Ctx, FrameEntry) + Send + Sync>;

type ActionList<Ctx> = SmallVec<[FrameAction<Ctx>; 1]>;

/// An animation strip with per-frame enter callbacks.
pub struct FrameSequence<Ctx = ()> {
    frame_count: usize,
    columns: u32,
    rows: u32,
    layout: LayoutDirection,
    frame_duration: Ticks,
    looped: bool,
    frame_width: u32,
    frame_height: u32,
    texture: Option<String>,
    on_enter: Vec<ActionList<Ctx>>,
    on_enter_reverse: Vec<ActionList<Ctx>>,
}

impl<Ctx> FrameSequence<Ctx> {
    /// Create a sequence of `frame_count` frames on a `columns` x `rows` grid.
    pub fn new(
        frame_count: usize,
        columns: u32,
        rows: u32,
        layout: LayoutDirection,
        frame_duration_millis: i64,
        looped: bool,
    ) -> Result<Self, AnimationError> {
        if frame_count == 0 {
            return Err(AnimationError::InvalidSequence(
                "a sequence needs at least one frame".into(),
            ));
        }
        if frame_duration_millis <= 0 {
            return Err(AnimationError::InvalidSequence(format!(
                "frame duration must be positive, got {frame_duration_millis} ms"
            )));
        }
        if (columns as u64) * (rows as u64) < frame_count as u64 {
            return Err(AnimationError::InvalidSequence(format!(
                "a {columns}x{rows} grid cannot hold {frame_count} frames"
            )));
        }
        Ok(FrameSequence {
            frame_count,
            columns,
            rows,
            layout,
            frame_duration: millis_to_ticks(frame_duration_millis),
            looped,
            frame_width: 0,
            frame_height: 0,
            texture: None,
            on_enter: (0..frame_count).map(|_| SmallVec::new()).collect(),
            on_enter_reverse: (0..frame_count).map(|_| SmallVec::new()).collect(),
        })
    }

    /// A single-row strip.
    pub fn strip(frame_count: usize, frame_duration_millis: i64, looped: bool) -> Result<Self, AnimationError> {
        let columns = u32::try_from(frame_count).map_err(|_| {
            AnimationError::InvalidSequence(format!("{frame_count} frames do not fit in one row"))
        })?;
        Self::new(
            frame_count,
            columns,
            1,
            LayoutDirection::LeftToRight,
            frame_duration_millis,
            looped,
        )
    }

    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    pub fn with_texture(mut self, key: impl Into<String>) -> Self {
        self.texture = Some(key.into());
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn layout(&self) -> LayoutDirection {
        self.layout
    }

    pub fn frame_duration_ticks(&self) -> Ticks {
        self.frame_duration
    }

    pub fn frame_duration_millis(&self) -> i64 {
        self.frame_duration / crate::timing::TICKS_PER_MILLISECOND
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
    }

    pub fn texture(&self) -> Option<&str> {
        self.texture.as_deref()
    }

    /// Source rectangle of `frame` on the atlas.
    ///
    /// Indices past the end are clamped to the last frame. Offsets past
    /// `u32::MAX` saturate.
    pub fn region(&self, frame: usize) -> FrameRegion {
        let i = u32::try_from(frame.min(self.frame_count - 1)).unwrap_or(u32::MAX);
        let (col, row) = match self.layout {
            LayoutDirection::LeftToRight => (i % self.columns, i / self.columns),
            LayoutDirection::TopToBottom => (i / self.rows, i % self.rows),
        };
        FrameRegion {
            x: col.saturating_mul(self.frame_width),
            y: row.saturating_mul(self.frame_height),
            width: self.frame_width,
            height: self.frame_height,
        }
    }

    /// Register a callback for entering `frame` in the given direction.
    ///
    /// Callbacks for the same frame and direction run in registration order.
    pub fn register_frame_action(
        &mut self,
        frame: usize,
        direction: FrameDirection,
        action: impl FnMut(&mut Ctx, FrameEntry) + Send + Sync + 'static,
    ) -> Result<(), AnimationError> {
        let frame_count = self.frame_count;
        let list = match direction {
            FrameDirection::Forward => self.on_enter.get_mut(frame),
            FrameDirection::Reverse => self.on_enter_reverse.get_mut(frame),
        }
        .ok_or(AnimationError::InvalidFrameIndex { frame, frame_count })?;
        list.push(Box::new(action));
        Ok(())
    }

    /// Number of callbacks registered for a frame and direction.
    pub fn action_count(&self, frame: usize, direction: FrameDirection) -> usize {
        let lists = match direction {
            FrameDirection::Forward => &self.on_enter,
            FrameDirection::Reverse => &self.on_enter_reverse,
        };
        lists.get(frame).map_or(0, |l| l.len())
    }

    /// Run the callbacks for entering `frame`.
    pub(crate) fn fire(&mut self, frame: usize, direction: FrameDirection, ctx: &mut Ctx) {
        let lists = match direction {
            FrameDirection::Forward => &mut self.on_enter,
            FrameDirection::Reverse => &mut self.on_enter_reverse,
        };
        if let Some(actions) = lists.get_mut(frame) {
            let entry = FrameEntry { frame, direction };
            for action in actions.iter_mut() {
                action(ctx, entry);
            }
        }
    }
}

impl<Ctx> std::fmt::Debug for FrameSequence<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSequence")
            .field("frame_count", &self.frame_count)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("layout", &self.layout)
            .field("frame_duration", &self.frame_duration)
            .field("looped", &self.looped)
            .field("texture", &self.texture)
            .finish_non_exhaustive()
    }
}
