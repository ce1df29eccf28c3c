//! Timelines and the per-host-frame tick.
//!
//! A [`Game`] owns the ECS [`World`] and an ordered list of [`Timeline`]s.
//! Each timeline is a [`ScaledClock`] whose update callback publishes the
//! sub-step snapshot as [`WorldTime`] and runs the timeline's schedule, so
//! the `world` timeline can run in slow motion or backward while the `ui`
//! timeline keeps normal speed.
//!
//! One host frame, in [`Game::tick_frame`]:
//! 1. every timeline advances, in insertion order
//! 2. [`DeferredActions`] queued during those sub-steps run
//! 3. [`TimeControl`] requests are applied, taking effect next frame
//! 4. change trackers are cleared
//!
//! Whenever a timeline's rate may have changed, the sign of its configured
//! rate is copied into every [`Animated`] on it, so sequence switches made
//! outside a sub-step start from the right end.

use std::ops::{Deref, DerefMut};

use bevy_ecs::prelude::*;

use crate::components::animated::Animated;
use crate::components::ontimeline::{OnTimeline, belongs_to};
use crate::resources::deferred::DeferredActions;
use crate::resources::gameconfig::GameConfig;
use crate::resources::gamerng::GameRng;
use crate::resources::timecontrol::{TimeControl, TimeRequest};
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::animation;
use crate::systems::deferred::drain_deferred_actions;
use crate::systems::movement::movement;
use crate::systems::tween::{tween_mapposition_system, tween_rotation_system, tween_scale_system};
use crate::timing::{ClockSnapshot, HostFrame, Rate, RateSign, ScaledClock, Ticks};

pub const WORLD_TIMELINE: &str = "world";
pub const UI_TIMELINE: &str = "ui";

/// The systems every timeline runs per sub-step: animation, then movement,
/// then tweens.
pub fn standard_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            animation,
            movement,
            (tween_mapposition_system, tween_rotation_system, tween_scale_system),
        )
            .chain(),
    );
    schedule
}

/// A named [`ScaledClock`] driving a schedule over the world.
pub struct Timeline {
    name: String,
    clock: ScaledClock<World>,
    saved_rate: Option<Rate>,
}

impl Timeline {
    pub fn new(name: impl Into<String>, host_step: Ticks, rate: f64, mut schedule: Schedule) -> Self {
        let name = name.into();
        let label = name.clone();
        let clock = ScaledClock::new(host_step, rate, move |world: &mut World, snapshot: &ClockSnapshot| {
            world.insert_resource(WorldTime::new(label.clone(), *snapshot));
            schedule.run(world);
        });
        Timeline {
            name,
            clock,
            saved_rate: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clock(&self) -> &ScaledClock<World> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut ScaledClock<World> {
        &mut self.clock
    }

    /// Rate the timeline runs at once resumed.
    pub fn rate(&self) -> Rate {
        self.saved_rate.unwrap_or_else(|| self.clock.rate())
    }

    pub fn is_paused(&self) -> bool {
        self.saved_rate.is_some()
    }

    /// Change the rate from a decimal ratio. A paused timeline stays paused
    /// and resumes at the new rate.
    pub fn set_rate(&mut self, ratio: f64) {
        self.set_rate_exact(Rate::from_ratio(self.clock.host_step(), ratio));
    }

    /// [`set_rate`](Self::set_rate) with an exact rate.
    pub fn set_rate_exact(&mut self, rate: Rate) {
        match self.saved_rate.as_mut() {
            Some(saved) => *saved = rate,
            None => self.clock.set_rate_exact(rate),
        }
        log::debug!("timeline {} rate -> {}", self.name, self.rate());
    }

    /// Freeze, remembering the current rate. Pausing twice keeps the first
    /// saved rate.
    pub fn pause(&mut self) {
        if self.saved_rate.is_none() {
            self.saved_rate = Some(self.clock.rate());
            self.clock.set_rate_exact(Rate::frozen(self.clock.host_step()));
        }
    }

    /// Restore the rate saved by [`pause`](Self::pause).
    pub fn resume(&mut self) {
        if let Some(rate) = self.saved_rate.take() {
            self.clock.set_rate_exact(rate);
        }
    }

    pub fn elapsed_total(&self) -> Ticks {
        self.clock.elapsed_total()
    }

    /// Run this timeline for one host frame. Returns the sub-steps run.
    pub fn advance(&mut self, world: &mut World, frame: HostFrame) -> u64 {
        self.clock.advance_frame(world, frame)
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("name", &self.name)
            .field("rate", &self.clock.rate())
            .field("elapsed_total", &self.clock.elapsed_total())
            .field("saved_rate", &self.saved_rate)
            .finish()
    }
}

/// Mutable access to one timeline.
///
/// Dropping it publishes the timeline's rate sign to the animated entities
/// on it.
pub struct TimelineMut<'a> {
    timeline: &'a mut Timeline,
    world: &'a mut World,
}

impl Deref for TimelineMut<'_> {
    type Target = Timeline;

    fn deref(&self) -> &Timeline {
        &*self.timeline
    }
}

impl DerefMut for TimelineMut<'_> {
    fn deref_mut(&mut self) -> &mut Timeline {
        &mut *self.timeline
    }
}

impl Drop for TimelineMut<'_> {
    fn drop(&mut self) {
        publish_rate_sign(&mut *self.world, &*self.timeline);
    }
}

/// Set the rate sign of every [`Animated`] on `timeline` to the sign of the
/// rate its clock is running at (frozen while paused).
fn publish_rate_sign(world: &mut World, timeline: &Timeline) {
    let sign = timeline.clock.rate().sign();
    let mut query = world.query::<(&mut Animated, Option<&OnTimeline>)>();
    for (mut animated, member) in query.iter_mut(world) {
        if belongs_to(member, &timeline.name) && animated.clock.rate_sign() != sign {
            animated.clock.set_rate_sign(sign);
        }
    }
}

/// The world plus its timelines.
pub struct Game {
    world: World,
    timelines: Vec<Timeline>,
    host_step: Ticks,
    frame_count: u64,
}

impl Game {
    /// A game with no timelines and the core resources inserted.
    pub fn new(config: &GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(config.clone());
        world.insert_resource(WorldTime::default());
        world.insert_resource(DeferredActions::default());
        world.insert_resource(TimeControl::default());
        world.insert_resource(GameRng::new(config.seed));
        Game {
            world,
            timelines: Vec::new(),
            host_step: config.host_step_ticks,
            frame_count: 0,
        }
    }

    /// A game with the `world` and `ui` timelines, both on
    /// [`standard_schedule`], at the configured rates.
    pub fn with_standard_timelines(config: &GameConfig) -> Self {
        let mut game = Self::new(config);
        game.add_timeline(WORLD_TIMELINE, config.world_rate, standard_schedule());
        game.add_timeline(UI_TIMELINE, config.ui_rate, standard_schedule());
        game
    }

    /// Append a timeline. A timeline with the same name is replaced in place.
    pub fn add_timeline(&mut self, name: &str, rate: f64, schedule: Schedule) -> TimelineMut<'_> {
        let timeline = Timeline::new(name, self.host_step, rate, schedule);
        let index = match self.timelines.iter().position(|t| t.name == name) {
            Some(i) => {
                log::warn!("replacing timeline {name}");
                self.timelines[i] = timeline;
                i
            }
            None => {
                self.timelines.push(timeline);
                self.timelines.len() - 1
            }
        };
        TimelineMut {
            timeline: &mut self.timelines[index],
            world: &mut self.world,
        }
    }

    pub fn timeline(&self, name: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.name == name)
    }

    pub fn timeline_mut(&mut self, name: &str) -> Option<TimelineMut<'_>> {
        let world = &mut self.world;
        self.timelines
            .iter_mut()
            .find(|t| t.name == name)
            .map(|timeline| TimelineMut { timeline, world })
    }

    pub fn timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.iter()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn host_step(&self) -> Ticks {
        self.host_step
    }

    /// Host frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Freeze every timeline, remembering its rate.
    pub fn pause_all(&mut self) {
        for timeline in &mut self.timelines {
            timeline.pause();
        }
        self.sync_rate_signs();
        log::debug!("all timelines paused");
    }

    /// Restore the rates saved by [`pause_all`](Self::pause_all).
    pub fn resume_all(&mut self) {
        for timeline in &mut self.timelines {
            timeline.resume();
        }
        self.sync_rate_signs();
        log::debug!("all timelines resumed");
    }

    /// Publish every timeline's rate sign, covering entities spawned since
    /// the last change.
    pub fn sync_rate_signs(&mut self) {
        for timeline in &self.timelines {
            publish_rate_sign(&mut self.world, timeline);
        }
    }

    /// Rate sign of `name`'s clock, frozen while paused.
    pub fn rate_sign(&self, name: &str) -> Option<RateSign> {
        self.timeline(name).map(|t| t.clock.rate().sign())
    }

    /// Process one on-schedule host frame of exactly one host step.
    pub fn tick(&mut self, host_is_lagging: bool) -> u64 {
        self.tick_frame(HostFrame::fixed(self.host_step).lagging(host_is_lagging))
    }

    /// Process one host frame. Returns the sub-steps run over all timelines.
    pub fn tick_frame(&mut self, frame: HostFrame) -> u64 {
        self.sync_rate_signs();
        let mut substeps = 0;
        for timeline in &mut self.timelines {
            substeps += timeline.advance(&mut self.world, frame);
        }
        drain_deferred_actions(&mut self.world);
        self.apply_time_requests();
        self.sync_rate_signs();
        self.world.clear_trackers();
        self.frame_count += 1;
        substeps
    }

    fn apply_time_requests(&mut self) {
        let requests = match self.world.get_resource_mut::<TimeControl>() {
            Some(mut control) if !control.is_empty() => control.take(),
            _ => return,
        };
        for request in requests {
            match request {
                TimeRequest::SetRate { timeline, ratio } => match self.timeline_mut(&timeline) {
                    Some(mut t) => t.set_rate(ratio),
                    None => log::warn!("rate request for unknown timeline {timeline}"),
                },
                TimeRequest::PauseAll => self.pause_all(),
                TimeRequest::ResumeAll => self.resume_all(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: Ticks = 100;

    #[derive(Resource, Default)]
    struct Seen(Vec<(String, Ticks)>);

    fn record(time: Res<WorldTime>, mut seen: ResMut<Seen>) {
        seen.0.push((time.timeline.clone(), time.delta()));
    }

    fn game() -> Game {
        let mut config = GameConfig::new();
        config.host_step_ticks = HOST;
        config.seed = Some(1);
        let mut game = Game::new(&config);
        game.world_mut().init_resource::<Seen>();
        game
    }

    fn recording_schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.add_systems(record);
        schedule
    }

    #[test]
    fn test_timelines_advance_in_order() {
        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, 1.5, recording_schedule());
        game.add_timeline(UI_TIMELINE, 1.0, recording_schedule());

        assert_eq!(game.tick(false), 3);
        let seen = &game.world().resource::<Seen>().0;
        assert_eq!(
            seen,
            &vec![
                ("world".to_string(), 100),
                ("world".to_string(), 50),
                ("ui".to_string(), 100),
            ]
        );
        assert_eq!(game.frame_count(), 1);
    }

    #[test]
    fn test_pause_twice_keeps_saved_rate() {
        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, -2.0, recording_schedule());
        game.pause_all();
        game.pause_all();
        assert!(game.timeline(WORLD_TIMELINE).unwrap().clock().rate().is_frozen());
        assert_eq!(game.tick(false), 0);

        game.resume_all();
        let timeline = game.timeline(WORLD_TIMELINE).unwrap();
        assert_eq!(timeline.clock().rate().numerator(), -200);
        assert!(!timeline.is_paused());
    }

    #[test]
    fn test_set_rate_while_paused_applies_on_resume() {
        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, 1.0, recording_schedule());
        game.pause_all();
        game.timeline_mut(WORLD_TIMELINE).unwrap().set_rate(0.5);
        assert!(game.timeline(WORLD_TIMELINE).unwrap().clock().rate().is_frozen());
        assert_eq!(game.timeline(WORLD_TIMELINE).unwrap().rate().numerator(), 50);
        game.resume_all();
        assert_eq!(game.timeline(WORLD_TIMELINE).unwrap().clock().rate().numerator(), 50);
    }

    #[test]
    fn test_rate_requests_apply_after_the_frame() {
        fn slow_down(mut control: ResMut<TimeControl>) {
            control.set_rate(WORLD_TIMELINE, 0.25);
        }
        let mut schedule = recording_schedule();
        schedule.add_systems(slow_down);

        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, 2.0, schedule);
        game.tick(false);
        // both sub-steps of the first frame ran at the old rate
        assert_eq!(game.world().resource::<Seen>().0.len(), 2);
        assert_eq!(game.timeline(WORLD_TIMELINE).unwrap().clock().rate().numerator(), 25);

        game.tick(false);
        assert_eq!(game.world().resource::<Seen>().0[2].1, 25);
    }

    #[test]
    fn test_rate_request_for_unknown_timeline_is_ignored() {
        fn bad_request(mut control: ResMut<TimeControl>) {
            control.set_rate("nope", 2.0);
        }
        let mut schedule = recording_schedule();
        schedule.add_systems(bad_request);

        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, 1.0, schedule);
        game.add_timeline(UI_TIMELINE, 0.5, recording_schedule());
        game.tick(false);

        assert!(game.world().resource::<TimeControl>().is_empty());
        assert!(game.timeline("nope").is_none());
        assert_eq!(game.timeline(WORLD_TIMELINE).unwrap().rate().numerator(), 100);
        assert_eq!(game.timeline(UI_TIMELINE).unwrap().rate().numerator(), 50);
        assert_eq!(game.timelines().count(), 2);
    }

    #[test]
    fn test_pause_and_resume_requests_restore_saved_rates() {
        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, -1.5, recording_schedule());
        game.add_timeline(UI_TIMELINE, 0.5, recording_schedule());

        game.world_mut().resource_mut::<TimeControl>().pause_all();
        assert_eq!(game.tick(false), 3);
        assert!(game.timeline(WORLD_TIMELINE).unwrap().is_paused());
        assert!(game.timeline(UI_TIMELINE).unwrap().clock().rate().is_frozen());

        game.world_mut().resource_mut::<TimeControl>().resume_all();
        assert_eq!(game.tick(false), 0);
        let world = game.timeline(WORLD_TIMELINE).unwrap();
        assert!(!world.is_paused());
        assert_eq!(world.clock().rate().numerator(), -150);
        assert_eq!(game.timeline(UI_TIMELINE).unwrap().clock().rate().numerator(), 50);
        assert_eq!(game.tick(false), 3);
    }

    fn two_sequence_walker() -> Animated {
        use crate::animation::FrameSequence;
        let mut table = rustc_hash::FxHashMap::default();
        table.insert("walk".to_string(), FrameSequence::strip(4, 1, true).unwrap());
        table.insert("idle".to_string(), FrameSequence::strip(4, 1, true).unwrap());
        Animated::new(table, "walk", RateSign::Forward).unwrap()
    }

    #[test]
    fn test_rate_sign_follows_set_rate_and_pause() {
        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, -1.0, standard_schedule());
        let e = game.world_mut().spawn(two_sequence_walker()).id();
        let ui = game
            .world_mut()
            .spawn((two_sequence_walker(), OnTimeline::new(UI_TIMELINE)))
            .id();

        game.tick(false);
        let sign = |game: &Game, e: Entity| game.world().get::<Animated>(e).unwrap().clock.rate_sign();
        assert_eq!(sign(&game, e), RateSign::Backward);
        // no ui timeline exists, so its walker keeps its own sign
        assert_eq!(sign(&game, ui), RateSign::Forward);

        game.timeline_mut(WORLD_TIMELINE).unwrap().set_rate(1.0);
        assert_eq!(sign(&game, e), RateSign::Forward);

        game.timeline_mut(WORLD_TIMELINE).unwrap().set_rate(-1.0);
        game.pause_all();
        assert_eq!(sign(&game, e), RateSign::Frozen);
        assert_eq!(game.rate_sign(WORLD_TIMELINE), Some(RateSign::Frozen));

        game.resume_all();
        assert_eq!(sign(&game, e), RateSign::Backward);
    }

    #[test]
    fn test_replacing_a_timeline_keeps_its_slot() {
        let mut game = game();
        game.add_timeline(WORLD_TIMELINE, 1.0, recording_schedule());
        game.add_timeline(UI_TIMELINE, 1.0, recording_schedule());
        game.add_timeline(WORLD_TIMELINE, 3.0, recording_schedule());
        let names: Vec<&str> = game.timelines().map(|t| t.name()).collect();
        assert_eq!(names, vec!["world", "ui"]);
        assert_eq!(game.timeline(WORLD_TIMELINE).unwrap().rate().numerator(), 300);
    }
}
