//! Circle Arena entry point
//!
//! Headless driver: builds a world from settings and runs it through the
//! fixed timestep clock, logging stats as it goes. Rendering and device input
//! live elsewhere; the optional autopilot stands in for a player.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use circle_arena::Settings;
use circle_arena::consts::SIM_DT;
use circle_arena::sim::{FixedStep, TickInput, World, WorldStats, tick};

#[derive(Parser, Debug)]
#[command(version, about = "Bouncing circles in a bounded arena")]
struct Args {
    /// JSON settings file (defaults are used when omitted)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the run seed
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Simulated wall-clock time per frame (seconds)
    #[arg(long, default_value_t = SIM_DT)]
    frame_time: f32,

    /// Log stats every N frames (0 disables periodic reports)
    #[arg(long, default_value_t = 60)]
    report_every: u32,

    /// Steer the selected circle and spawn a few circles during the run
    #[arg(long)]
    autopilot: bool,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = Settings::load_or_default(args.settings.as_deref())
        .context("failed to load settings")?;
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    if args.print_settings {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    log::info!("Circle Arena starting (seed {})", settings.seed);
    let mut world = World::new(settings).context("failed to build world")?;
    let mut clock = FixedStep::default();

    for frame in 0..args.frames {
        let input = if args.autopilot {
            autopilot_input(&world, frame)
        } else {
            TickInput::default()
        };

        let ticks = clock.advance(args.frame_time);
        for i in 0..ticks {
            // One-shot inputs apply to the first tick of the frame only
            let input = if i == 0 {
                input.clone()
            } else {
                TickInput {
                    click: None,
                    ..input.clone()
                }
            };
            tick(&mut world, &input, clock.dt);
        }

        if args.report_every > 0 && (frame + 1) % args.report_every == 0 {
            log_stats(&world.stats());
        }
    }

    let summary = world.stats();
    log::info!("Finished {} frames", args.frames);
    log_stats(&summary);
    Ok(())
}

/// Scripted stand-in for a player: pick a circle, push it around, spawn a burst
fn autopilot_input(world: &World, frame: u32) -> TickInput {
    let center = world.bounds.center();
    match frame % 240 {
        0 => TickInput {
            click: world.circles.first().map(|c| c.body.pos),
            ..Default::default()
        },
        1..=60 => TickInput {
            thrust: 1.0,
            ..Default::default()
        },
        61..=120 => TickInput {
            turn: 1.0,
            thrust: 1.0,
            ..Default::default()
        },
        121..=150 => TickInput {
            spawn_at: Some(center + Vec2::new(0.0, world.bounds.height() * 0.25)),
            ..Default::default()
        },
        _ => TickInput::default(),
    }
}

fn log_stats(s: &WorldStats) {
    log::info!(
        "tick {}: {} circles, {} food, selected {:?} (r {:.1}, speed {:.1}), energy {:.1}",
        s.time_ticks,
        s.circles,
        s.food,
        s.selected,
        s.selected_radius,
        s.selected_speed,
        s.kinetic_energy
    );
}
