//! Node Arena headless host
//!
//! Stands in for the network layer: builds an arena, joins scripted bot
//! sessions, drives the fixed-timestep loop and prints JSON snapshots.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::Vec2;

use node_arena::sim::{ActorId, Controls, Team, TickInput, World, advance, generate_world};
use node_arena::{ArenaSettings, Ruleset, SettingsError};

#[derive(Parser, Debug)]
#[command(name = "node-arena", about = "Run a headless territory-capture arena")]
struct Args {
    /// JSON settings file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rule preset to apply on top of the settings (capture | chase)
    #[arg(long)]
    ruleset: Option<String>,
    /// Layout seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Number of bot sessions to join
    #[arg(long, default_value_t = 4)]
    players: u32,
    /// Ticks to simulate
    #[arg(long, default_value_t = 3000)]
    ticks: u64,
    /// Print a snapshot every N ticks (0 disables)
    #[arg(long, default_value_t = 500)]
    snapshot_every: u64,
    /// Pace ticks to wall-clock time instead of running flat out
    #[arg(long)]
    realtime: bool,
}

fn load_settings(args: &Args) -> Result<ArenaSettings, SettingsError> {
    let mut settings = match &args.config {
        Some(path) => ArenaSettings::load(path)?,
        None => ArenaSettings::default(),
    };
    if let Some(name) = &args.ruleset {
        settings.apply_ruleset(Ruleset::parse(name)?);
    }
    settings.validate()?;
    Ok(settings)
}

/// Steer each bot toward the nearest node its team does not hold
fn bot_controls(world: &World) -> TickInput {
    let mut input = TickInput::new();
    let leaving = world.pending_removals();
    for player in world.players.iter().filter(|p| !leaving.contains(&p.id)) {
        let goal = world
            .nodes
            .iter()
            .filter(|n| n.team != player.team)
            .map(|n| n.pos)
            .min_by(|a, b| {
                a.distance(player.pos)
                    .partial_cmp(&b.distance(player.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Vec2::ZERO);

        let delta = goal - player.pos;
        input.insert(
            player.id,
            Controls {
                up: delta.y < -1.0,
                down: delta.y > 1.0,
                left: delta.x < -1.0,
                right: delta.x > 1.0,
                select: player.is_charged(),
            },
        );
    }
    input
}

fn emit_snapshot(world: &World) {
    match serde_json::to_string(world) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Snapshot serialization failed: {e}"),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!(
        "Node Arena starting: {} rules, seed {}, {} players",
        settings.ruleset.as_str(),
        args.seed,
        args.players
    );

    let mut world = generate_world(args.seed, &settings);
    for id in 0..args.players {
        world.connect(ActorId(id), &settings);
    }

    let step = Duration::from_secs_f32(settings.dt);
    let mut next_tick = Instant::now();
    let mut events = 0usize;

    for tick in 1..=args.ticks {
        // One bot leaves halfway through; removal lands at the next tick start
        if tick == args.ticks / 2 && args.players > 1 {
            world.disconnect(ActorId(args.players - 1));
        }

        let input = bot_controls(&world);
        let report = advance(&mut world, &input, &settings);
        if report.any() {
            events += report.events.len();
            for event in &report.events {
                log::debug!("tick {}: {:?}", world.tick, event);
            }
        }

        if args.snapshot_every > 0 && tick % args.snapshot_every == 0 {
            emit_snapshot(&world);
        }

        if args.realtime {
            next_tick += step;
            if let Some(wait) = next_tick.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
        }
    }

    log::info!(
        "Finished {} ticks with {} events; team A holds {} nodes, team B holds {}",
        world.tick,
        events,
        world.nodes_owned_by(Team::A),
        world.nodes_owned_by(Team::B)
    );
    ExitCode::SUCCESS
}
