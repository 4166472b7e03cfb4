//! Orbital Defender headless runner
//!
//! Drives the simulation at its fixed 60 Hz rate without a window: either
//! flat out or paced against the wall clock, optionally with the demo
//! autopilot at the controls. Prints the final snapshot on exit.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::Parser;

use orbital_defender::consts::SIM_DT;
use orbital_defender::sim::GamePhase;
use orbital_defender::{Autopilot, Engine, Intent, RenderSnapshot, Settings};

#[derive(Parser, Debug)]
#[command(name = "orbital-defender", about = "Run an Orbital Defender session headless")]
struct Args {
    /// JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// RNG seed (overrides settings)
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks to simulate (overrides settings)
    #[arg(long)]
    ticks: Option<u64>,
    /// Force the autopilot on
    #[arg(long)]
    autopilot: bool,
    /// Force the autopilot off (the ship idles and the planet falls)
    #[arg(long, conflicts_with = "autopilot")]
    idle: bool,
    /// Pace ticks in real time
    #[arg(long)]
    realtime: bool,
    /// Keep playing new sessions after GameOver
    #[arg(long)]
    retry: bool,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.seed = Some(seed);
    }
    if let Some(ticks) = args.ticks {
        settings.max_ticks = ticks;
    }
    if args.autopilot {
        settings.autopilot = true;
    }
    if args.idle {
        settings.autopilot = false;
    }
    settings.realtime |= args.realtime;
    settings.auto_retry |= args.retry;

    if settings.max_ticks == 0 {
        bail!("max_ticks must be > 0");
    }
    Ok(settings)
}

fn run(settings: &Settings) -> RenderSnapshot {
    let seed = settings.resolve_seed();
    log::info!("Orbital Defender (headless) starting with seed {}", seed);

    let mut engine = Engine::new(seed);
    let mut pilot = Autopilot::new(settings.autopilot_fire_cooldown);
    engine.apply(Intent::StartSession);

    let mut ticks_run = 0u64;
    let mut sessions = 1u32;
    let mut last_frame = Instant::now();
    let frame = Duration::from_secs_f32(SIM_DT);

    while ticks_run < settings.max_ticks {
        let snap = engine.snapshot();
        if snap.phase == GamePhase::GameOver {
            if !settings.auto_retry {
                return snap;
            }
            engine.apply(Intent::RetrySession);
            sessions += 1;
            continue;
        }

        if settings.autopilot {
            for intent in pilot.next_intents(&snap) {
                engine.apply(intent);
            }
        }

        let steps = if settings.realtime {
            std::thread::sleep(frame.saturating_sub(last_frame.elapsed()));
            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32();
            last_frame = now;
            engine.update(dt) as u64
        } else {
            u64::from(engine.step().advanced)
        };

        for _ in 0..steps {
            ticks_run += 1;
            if settings.report_interval > 0 && ticks_run % settings.report_interval == 0 {
                let state = engine.state();
                log::info!(
                    "[session {}] tick {}: score {}, ship {}, planet {}, {} asteroids, interval {}",
                    sessions,
                    state.time_ticks,
                    state.score,
                    state.ship.health,
                    state.planet_health,
                    state.asteroids.len(),
                    state.spawn_interval
                );
            }
        }
    }

    engine.snapshot()
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let snap = run(&settings);

    if args.json {
        let json = serde_json::to_string_pretty(&snap).context("serializing snapshot")?;
        println!("{json}");
    } else {
        let score = snap.final_score.unwrap_or(snap.score);
        println!(
            "{:?} after {} ticks: score {}, ship {}, planet {}, {} kills / {} shots",
            snap.phase,
            snap.tick,
            score,
            snap.ship.health,
            snap.planet_health,
            snap.stats.asteroids_destroyed,
            snap.stats.shots_fired
        );
    }
    Ok(())
}
