//! Per-entity animation playback.
//!
//! [`AnimationClock`] owns a table of named [`FrameSequence`]s, tracks which
//! one is playing and advances its current frame from the signed sub-step
//! deltas of a [`ScaledClock`](crate::timing::ScaledClock). Forward playback
//! fires each frame's forward actions, backward playback fires the reverse
//! actions, both synchronously and in frame order.

use rustc_hash::FxHashMap;

use super::framesequence::{FrameDirection, FrameEntry, FrameRegion, FrameSequence};
use crate::error::AnimationError;
use crate::timing::{ClockSnapshot, RateSign, Ticks};

/// Playback state over a table of named sequences.
pub struct AnimationClock<Ctx = ()> {
    sequences: FxHashMap<String, FrameSequence<Ctx>>,
    current: Option<String>,
    current_frame: usize,
    elapsed_into_frame: Ticks,
    active: bool,
    play_one_frame_only: bool,
    rate_sign: RateSign,
}

impl<Ctx> AnimationClock<Ctx> {
    /// Create a clock with no sequence selected.
    ///
    /// `rate_sign` decides which end of a sequence playback starts from when
    /// one is selected.
    pub fn new(sequences: FxHashMap<String, FrameSequence<Ctx>>, rate_sign: RateSign) -> Self {
        AnimationClock {
            sequences,
            current: None,
            current_frame: 0,
            elapsed_into_frame: 0,
            active: false,
            play_one_frame_only: false,
            rate_sign,
        }
    }

    /// Select `name` right away.
    pub fn with_active(mut self, name: &str) -> Result<Self, AnimationError> {
        self.set_active_sequence(name)?;
        Ok(self)
    }

    /// Add or replace a sequence.
    ///
    /// Replacing the playing sequence restarts it.
    pub fn insert_sequence(&mut self, name: impl Into<String>, sequence: FrameSequence<Ctx>) {
        let name = name.into();
        let restart = self.current.as_deref() == Some(name.as_str());
        self.sequences.insert(name.clone(), sequence);
        if restart {
            self.reset_playback();
        }
    }

    pub fn sequence(&self, name: &str) -> Option<&FrameSequence<Ctx>> {
        self.sequences.get(name)
    }

    pub fn sequence_mut(&mut self, name: &str) -> Option<&mut FrameSequence<Ctx>> {
        self.sequences.get_mut(name)
    }

    /// Register a frame action on a named sequence.
    pub fn register_frame_action(
        &mut self,
        name: &str,
        frame: usize,
        direction: FrameDirection,
        action: impl FnMut(&mut Ctx, FrameEntry) + Send + Sync + 'static,
    ) -> Result<(), AnimationError> {
        self.sequences
            .get_mut(name)
            .ok_or_else(|| AnimationError::UnknownSequence(name.to_string()))?
            .register_frame_action(frame, direction, action)
    }

    /// Switch playback to `name` and restart it.
    ///
    /// Playback restarts at the last frame when the owning clock runs
    /// backward (see [`set_rate_sign`](Self::set_rate_sign)), otherwise at
    /// the first. Unknown names leave the state untouched.
    pub fn set_active_sequence(&mut self, name: &str) -> Result<(), AnimationError> {
        if !self.sequences.contains_key(name) {
            return Err(AnimationError::UnknownSequence(name.to_string()));
        }
        log::debug!("animation sequence -> {name}");
        self.current = Some(name.to_string());
        self.reset_playback();
        Ok(())
    }

    /// Stop playback and deselect the current sequence.
    pub fn clear_active_sequence(&mut self) {
        self.current = None;
        self.active = false;
        self.play_one_frame_only = false;
        self.current_frame = 0;
        self.elapsed_into_frame = 0;
    }

    fn reset_playback(&mut self) {
        self.active = true;
        self.play_one_frame_only = false;
        self.elapsed_into_frame = 0;
        let frame_count = self.current_sequence().map_or(1, |s| s.frame_count());
        self.current_frame = if self.rate_sign.is_backward() {
            frame_count - 1
        } else {
            0
        };
    }

    /// Resume playback until the next frame-entry event, then stop.
    ///
    /// Exactly one frame is entered even when a single delta spans several
    /// frame durations. The rest of that delta stays in
    /// [`elapsed_into_frame`](Self::elapsed_into_frame).
    pub fn play_one_frame(&mut self) {
        self.active = true;
        self.play_one_frame_only = true;
    }

    /// Pause or resume playback without touching the current frame.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn current_sequence_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_sequence(&self) -> Option<&FrameSequence<Ctx>> {
        self.current.as_deref().and_then(|n| self.sequences.get(n))
    }

    /// Atlas rectangle of the frame being shown.
    pub fn current_region(&self) -> Option<FrameRegion> {
        self.current_sequence().map(|s| s.region(self.current_frame))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Signed ticks accumulated toward the next frame change.
    pub fn elapsed_into_frame(&self) -> Ticks {
        self.elapsed_into_frame
    }

    pub fn rate_sign(&self) -> RateSign {
        self.rate_sign
    }

    /// Record the sign of the owning clock's configured rate.
    ///
    /// Drivers call this whenever that rate changes, including to zero, so
    /// the next sequence switch starts from the right end.
    pub fn set_rate_sign(&mut self, sign: RateSign) {
        self.rate_sign = sign;
    }

    /// Advance by one sub-step of a scaled clock.
    ///
    /// The direction comes from the snapshot's configured rate and is
    /// remembered for the next sequence switch.
    pub fn advance_snapshot(&mut self, snapshot: &ClockSnapshot, ctx: &mut Ctx) {
        let sign = snapshot.rate.sign();
        self.rate_sign = sign;
        self.advance(snapshot.delta, sign, ctx);
    }

    /// Advance playback by `delta` ticks, negative when running backward.
    ///
    /// Each whole frame duration crossed is one frame-entry event. A
    /// non-looping sequence that runs off its end stops, rewinds and ignores
    /// the rest of this call.
    pub fn advance(&mut self, delta: Ticks, sign: RateSign, ctx: &mut Ctx) {
        if !self.active || sign == RateSign::Frozen {
            return;
        }
        let Some(name) = self.current.as_deref() else {
            return;
        };
        let Some(seq) = self.sequences.get_mut(name) else {
            return;
        };

        let duration = seq.frame_duration_ticks();
        let frame_count = seq.frame_count();
        self.elapsed_into_frame = self.elapsed_into_frame.saturating_add(delta);
        let frames_moved = self.elapsed_into_frame / duration;
        self.elapsed_into_frame %= duration;

        let (direction, wrap_to) = if sign.is_backward() {
            (FrameDirection::Reverse, frame_count - 1)
        } else {
            (FrameDirection::Forward, 0)
        };

        for _ in 0..frames_moved.unsigned_abs() {
            let one_shot = self.play_one_frame_only;
            if one_shot {
                self.play_one_frame_only = false;
                self.active = false;
            }

            let ran_off_end = match direction {
                FrameDirection::Forward => {
                    self.current_frame += 1;
                    self.current_frame >= frame_count
                }
                FrameDirection::Reverse => match self.current_frame.checked_sub(1) {
                    Some(prev) => {
                        self.current_frame = prev;
                        false
                    }
                    None => true,
                },
            };
            if ran_off_end {
                self.current_frame = wrap_to;
                if !seq.is_looped() {
                    self.active = false;
                    self.elapsed_into_frame = 0;
                    log::debug!("animation {name} finished");
                    break;
                }
            }

            seq.fire(self.current_frame, direction, ctx);
            if one_shot {
                break;
            }
        }
    }
}

impl<Ctx> std::fmt::Debug for AnimationClock<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationClock")
            .field("current", &self.current)
            .field("current_frame", &self.current_frame)
            .field("elapsed_into_frame", &self.elapsed_into_frame)
            .field("active", &self.active)
            .field("play_one_frame_only", &self.play_one_frame_only)
            .field("rate_sign", &self.rate_sign)
            .finish_non_exhaustive()
    }
}
