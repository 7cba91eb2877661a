//! # Collider Event Display
//!
//! Headless run of one collision: beams, staged decay products, detector hits
//! and a narrated timeline written to the log.
//!
//! ## Usage
//!
//! ```bash
//! # Default experiment (Higgs → γγ)
//! cargo run --release
//!
//! # Reproducible, twice as fast, paced in real time
//! cargo run --release -- --preset higgs_4lepton --seed 7 --speed 2 --realtime
//!
//! # Per-particle output
//! RUST_LOG=debug cargo run -- --preset top_pair
//! ```

mod event_log;
mod narration;

use clap::Parser;
use event_log::EventLog;
use narration::Timeline;
use particle_physics::{ExperimentPreset, ParticleCatalog, PresetCatalog};
use particle_simulation::{ParticleSimulation, SharedSink};
use std::time::{Duration, Instant};

/// Collider event display
#[derive(Parser, Debug)]
#[command(name = "collider")]
#[command(about = "Simulate a particle collision and narrate what the detector sees")]
struct Args {
    /// Experiment to run (see --list)
    #[arg(long, short = 'p', default_value = "higgs_diphoton")]
    preset: String,

    /// Simulation speed multiplier (0 freezes the clock)
    #[arg(long, short = 's', default_value = "1.0")]
    speed: f32,

    /// Seed for a reproducible event
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many wall seconds instead of when the event completes
    #[arg(long, short = 'd')]
    duration: Option<f32>,

    /// Frame rate of the update loop
    #[arg(long, default_value = "60")]
    fps: u32,

    /// Pace frames in real time instead of running as fast as possible
    #[arg(long)]
    realtime: bool,

    /// List the available experiments and exit
    #[arg(long)]
    list: bool,
}

impl Args {
    /// Reject values the update loop cannot make progress with
    fn check(&self) -> Result<(), String> {
        if self.fps == 0 {
            return Err("--fps must be at least 1".to_owned());
        }
        if !self.speed.is_finite() {
            return Err(format!("--speed must be a finite number, got {}", self.speed));
        }
        if let Some(seconds) = self.duration {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(format!("--duration must be a positive number of seconds, got {}", seconds));
            }
        }
        Ok(())
    }
}

/// One experiment run: the simulation plus everything narrating it
struct Session {
    sim: ParticleSimulation,
    log: SharedSink<EventLog>,
    preset: ExperimentPreset,
    /// Injection and countdown, played before the simulation runs
    pre_roll: Timeline,
    /// Pre-roll clock, scaled by the simulation speed
    pre_roll_ms: f32,
    /// Commentary of the running event; `None` until the pre-roll ends
    timeline: Option<Timeline>,
    /// Unpaused wall milliseconds since the run started
    wall_ms: f32,
}

impl Session {
    fn start(mut sim: ParticleSimulation, preset: &ExperimentPreset) -> Self {
        let log = SharedSink::new(EventLog::new());
        sim.subscribe(log.clone());

        let mut pre_roll = Timeline::pre_roll(preset, &beam_label(&sim), sim.params().beam_energy);
        pre_roll.narrate(0.0, &mut log.borrow_mut());
        Self {
            sim,
            log,
            preset: preset.clone(),
            pre_roll,
            pre_roll_ms: 0.0,
            timeline: None,
            wall_ms: 0.0,
        }
    }

    /// Put the beams in and schedule the event commentary
    fn launch(&mut self) {
        let collision_ms = self.sim.run(&self.preset);
        if let Some(wall_ms) = self.sim.wall_ms(collision_ms) {
            log::debug!("Collision expected after {:.0}ms wall time", wall_ms);
        }

        let timeline = Timeline::for_preset(&self.preset, self.sim.catalog(), collision_ms);
        log::debug!("Narration ends at {:.0}ms simulation time", timeline.end_ms());
        self.timeline = Some(timeline);
    }

    /// Advance one frame of `frame_dt` wall seconds
    fn step(&mut self, frame_dt: f32) {
        let dt = self.sim.clamp_frame_delta(frame_dt);
        if self.sim.is_paused() {
            return;
        }
        self.wall_ms += dt * 1000.0;
        self.log.borrow_mut().set_clock(self.wall_ms);

        if self.timeline.is_none() {
            self.pre_roll_ms += dt * 1000.0 * self.sim.speed();
            self.pre_roll.narrate(self.pre_roll_ms, &mut self.log.borrow_mut());
            if self.pre_roll.is_finished() {
                self.launch();
            }
            return;
        }

        self.sim.tick(dt);
        let now = self.sim.elapsed_ms();
        if let Some(timeline) = self.timeline.as_mut() {
            timeline.narrate(now, &mut self.log.borrow_mut());
        }
    }

    fn is_complete(&self) -> bool {
        self.timeline.as_ref().is_some_and(Timeline::is_finished)
    }

    fn summarize(&self) {
        let log = self.log.borrow();
        log::info!(
            "Run finished: {:.2}s wall, {:.2}s simulated",
            self.wall_ms / 1000.0,
            self.sim.elapsed()
        );
        for (_, def, count) in log.tally().iter() {
            log::info!("  x{:<3} {}", count, def.detail());
        }
        log::info!(
            "{} particles produced, {} detector hits, {} still in flight",
            log.tally().total(),
            log.hits(),
            self.sim.alive_count()
        );
        log::debug!(
            "{} log entries; render resources: {} allocated, {} released",
            log.entries().len(),
            self.sim.resources().allocated(),
            self.sim.resources().released()
        );
    }
}

/// Beam particle as written in the injection lines, e.g. "p⁺"
fn beam_label(sim: &ParticleSimulation) -> String {
    let beam_type = &sim.params().beam_type;
    match sim.catalog().get(beam_type) {
        Some(def) if def.charge > 0.0 && !def.symbol.ends_with('⁺') => format!("{}⁺", def.symbol),
        Some(def) => def.symbol.clone(),
        None => beam_type.clone(),
    }
}

fn list_presets(presets: &PresetCatalog) {
    println!("Available experiments:\n");
    for preset in presets.iter() {
        println!("  {:<16} {} ({}, {})", preset.id, preset.name, preset.energy, preset.rarity);
        println!("  {:<16} {}", "", preset.description);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let catalog = ParticleCatalog::standard();
    let presets = PresetCatalog::standard();

    if args.list {
        list_presets(&presets);
        return Ok(());
    }
    args.check()?;

    let preset = presets.find(&args.preset)?;
    if let Err(err) = preset.validate(&catalog) {
        log::warn!("{}; those particles will be skipped", err);
    }

    let mut sim = match args.seed {
        Some(seed) => ParticleSimulation::with_seed(catalog, seed),
        None => ParticleSimulation::new(catalog),
    };
    sim.set_speed(args.speed);
    if sim.speed() == 0.0 && args.duration.is_none() {
        return Err("a frozen clock never completes the event; pass --duration".into());
    }

    log::info!("{} ({}, {})", preset.name, preset.energy, preset.rarity);
    let mut session = Session::start(sim, preset);

    let frame_dt = 1.0 / args.fps as f32;
    let limit_ms = args.duration.map(|seconds| seconds * 1000.0);
    let mut last_frame_time = Instant::now();

    loop {
        let done = match limit_ms {
            Some(limit) => session.wall_ms >= limit,
            None => session.is_complete(),
        };
        if done {
            break;
        }

        let dt = if args.realtime {
            let spent = last_frame_time.elapsed().as_secs_f32();
            if spent < frame_dt {
                std::thread::sleep(Duration::from_secs_f32(frame_dt - spent));
            }
            let now = Instant::now();
            let dt = (now - last_frame_time).as_secs_f32();
            last_frame_time = now;
            dt
        } else {
            frame_dt
        };
        session.step(dt);
    }

    session.summarize();
    Ok(())
}
