//! Headless warpclock driver.
//!
//! Builds a game with a `world` and a `ui` timeline, spawns a few animated
//! walkers, runs a number of host frames and logs where everything ended
//! up. Useful for watching rate changes and rewinds in the log.

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use rustc_hash::FxHashMap;

use warpclock::animation::{FrameDirection, FrameSequence, SequenceDef};
use warpclock::components::animated::{Animated, EntitySequence};
use warpclock::components::drawable::Drawable;
use warpclock::components::mapposition::MapPosition;
use warpclock::components::ontimeline::OnTimeline;
use warpclock::components::rigidbody::RigidBody;
use warpclock::components::tween::{Easing, LoopMode, TweenPosition};
use warpclock::components::zindex::ZIndex;
use warpclock::game::{Game, UI_TIMELINE, WORLD_TIMELINE};
use warpclock::resources::gameconfig::GameConfig;
use warpclock::resources::gamerng::GameRng;
use warpclock::timing::{RateSign, ticks_to_seconds};

const WALKERS: usize = 4;

#[derive(Parser)]
#[command(version, about = "Run a headless variable-rate timeline simulation")]
struct Cli {
    /// INI file with [time] and [random] settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Rate of the world timeline (overrides the config).
    #[arg(long, allow_negative_numbers = true)]
    rate: Option<f64>,

    /// Host frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// JSON map of sequence definitions.
    #[arg(long, value_name = "PATH")]
    sequences: Option<PathBuf>,

    /// Seed for the game RNG (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Reverse the world timeline halfway through.
    #[arg(long)]
    rewind: bool,
}

/// Frame-entry events observed by the walkers' actions.
#[derive(Resource, Debug, Default)]
struct StepCounter {
    forward: u64,
    reverse: u64,
}

fn load_config(cli: &Cli) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = GameConfig::with_path(path);
            config.load_from_file()?;
            config
        }
        None => {
            let mut config = GameConfig::new();
            if let Err(e) = config.load_from_file() {
                log::debug!("using default config: {e}");
            }
            config
        }
    };
    if let Some(rate) = cli.rate {
        config.world_rate = rate;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn default_sequences() -> Result<FxHashMap<String, EntitySequence>, Box<dyn std::error::Error>> {
    let mut table = FxHashMap::default();
    table.insert(
        "walk".to_string(),
        FrameSequence::strip(6, 100, true)?.with_frame_size(32, 32).with_texture("walker"),
    );
    Ok(table)
}

fn load_sequences(cli: &Cli) -> Result<FxHashMap<String, EntitySequence>, Box<dyn std::error::Error>> {
    let mut table = match &cli.sequences {
        Some(path) => SequenceDef::load_map(&std::fs::read_to_string(path)?)?,
        None => default_sequences()?,
    };
    for seq in table.values_mut() {
        let last = seq.frame_count() - 1;
        seq.register_frame_action(0, FrameDirection::Forward, |deferred, _| {
            deferred.defer(|world| world.resource_mut::<StepCounter>().forward += 1);
        })?;
        seq.register_frame_action(last, FrameDirection::Reverse, |deferred, _| {
            deferred.defer(|world| world.resource_mut::<StepCounter>().reverse += 1);
        })?;
    }
    Ok(table)
}

fn spawn_walkers(game: &mut Game, cli: &Cli) -> Result<Vec<Entity>, Box<dyn std::error::Error>> {
    let mut entities = Vec::with_capacity(WALKERS);
    for i in 0..WALKERS {
        let sequences = load_sequences(cli)?;
        let mut names: Vec<&String> = sequences.keys().collect();
        names.sort();
        let Some(initial) = names.first().map(|n| n.to_string()) else {
            return Err("no animation sequences defined".into());
        };
        let animated = Animated::new(sequences, &initial, RateSign::Forward)?;
        let (tex_key, region) = match animated.clock.current_sequence() {
            Some(seq) => (seq.texture().unwrap_or("walker").to_string(), seq.region(0)),
            None => ("walker".to_string(), Default::default()),
        };

        let world = game.world_mut();
        let (velocity, start) = {
            let mut rng = world.resource_mut::<GameRng>();
            (
                Vec2::new(rng.range_f32(-2.0, 2.0), rng.range_f32(-2.0, 2.0)),
                Vec2::new(rng.range_f32(0.0, 320.0), rng.range_f32(0.0, 240.0)),
            )
        };
        let entity = world
            .spawn((
                animated,
                Drawable::animated(tex_key, region),
                MapPosition { pos: start },
                RigidBody::with_velocity(velocity),
                ZIndex(i as i32),
            ))
            .id();
        entities.push(entity);
    }
    Ok(entities)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    let mut game = Game::with_standard_timelines(&config);
    game.world_mut().init_resource::<StepCounter>();

    let walkers = spawn_walkers(&mut game, &cli)?;
    let banner = game
        .world_mut()
        .spawn((
            Drawable::text("warpclock", 16.0),
            MapPosition::new(0.0, -40.0),
            OnTimeline::new(UI_TIMELINE),
            TweenPosition::new(Vec2::new(0.0, -40.0), Vec2::new(0.0, 8.0), 1.0)
                .with_easing(Easing::QuadOut)
                .with_loop_mode(LoopMode::PingPong),
        ))
        .id();
    // the banner sits on the ui timeline and ignores world rate changes
    if let Some(ui) = game.timeline(UI_TIMELINE) {
        log::info!("ui timeline at {}", ui.rate());
    }

    let rewind_at = cli.rewind.then_some(cli.frames / 2);
    let mut substeps = 0;
    for frame in 0..cli.frames {
        if rewind_at == Some(frame) {
            if let Some(mut timeline) = game.timeline_mut(WORLD_TIMELINE) {
                let reversed = timeline.rate().reversed();
                timeline.set_rate_exact(reversed);
                log::info!("frame {frame}: world timeline reversed to {}", timeline.rate());
            }
        }
        substeps += game.tick(false);
    }

    for timeline in game.timelines() {
        log::info!(
            "timeline {}: rate {}, elapsed {:.3}s",
            timeline.name(),
            timeline.rate(),
            ticks_to_seconds(timeline.elapsed_total())
        );
    }
    let world = game.world();
    for entity in walkers {
        if let (Some(animated), Some(pos)) = (world.get::<Animated>(entity), world.get::<MapPosition>(entity)) {
            log::info!(
                "walker {entity:?}: {} frame {} at ({:.1}, {:.1})",
                animated.clock.current_sequence_name().unwrap_or("-"),
                animated.clock.current_frame(),
                pos.pos.x,
                pos.pos.y
            );
        }
    }
    if let Some(pos) = world.get::<MapPosition>(banner) {
        log::info!("banner at y = {:.1}", pos.pos.y);
    }
    let counter = world.resource::<StepCounter>();
    log::info!(
        "{} host frames, {substeps} sub-steps, {} forward loops, {} reverse loops",
        game.frame_count(),
        counter.forward,
        counter.reverse
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
