//! main.rs - Desktop simulator for the café stain scene
//! Handles the window, timing, input and audio device

mod config;
mod error;
mod panel;
mod perlin;
mod render;
mod synth;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

use morii::{Cafe, PlaybackMode, Settings, Silent, DAYS};

use crate::config::SimulatorConfig;
use crate::panel::CounterPanel;
use crate::perlin::PerlinField;
use crate::synth::KiraSynth;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeArg {
    Interactive,
    Cinematic,
}

impl From<ModeArg> for PlaybackMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Interactive => PlaybackMode::Interactive,
            ModeArg::Cinematic => PlaybackMode::Cinematic,
        }
    }
}

/// Café visitors drawn as drifting coffee stains that chime when they meet
#[derive(Parser, Debug)]
#[command(name = "morii", version, about)]
struct Cli {
    /// TOML file with [window], [playback], [audio] and [simulation] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Playback mode
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Day to open on (0-based, wraps)
    #[arg(short, long)]
    day: Option<usize>,

    /// Seed for spawning, shapes and note choice
    #[arg(long)]
    seed: Option<u32>,

    /// Start with audio locked; press M to unlock
    #[arg(long)]
    mute: bool,

    /// Run without a window and print a summary
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulatorConfig::default(),
    };

    let mut settings = config.settings();
    if let Some(seed) = cli.seed {
        settings.rng_seed = seed;
    }
    let mode = cli.mode.map(PlaybackMode::from).unwrap_or(config.playback.mode);
    let day = cli.day.unwrap_or(config.playback.day);

    if cli.headless {
        run_headless(settings, mode, day, cli.frames);
        return Ok(());
    }

    let audio_on = config.audio.enabled && !cli.mute;
    run_window(&config, settings, mode, day, audio_on);
    Ok(())
}

fn run_headless(settings: Settings, mode: PlaybackMode, day: usize, frames: u32) {
    let mut cafe: Cafe<Silent, PerlinField> =
        Cafe::new(settings, &DAYS, Silent, PerlinField::new(settings.rng_seed));
    cafe.set_mode(mode);
    cafe.set_day_index(day);
    cafe.unlock_audio();

    let mut panel = CounterPanel::default();
    let mut day_changes = 0;
    for _ in 0..frames {
        let report = cafe.step(&mut panel);
        if report.day_changed {
            day_changes += 1;
        }
    }

    let (played, dropped) = cafe.audio().counters();
    println!("=== morii headless run ===");
    println!("Mode:        {:?}", cafe.mode());
    println!("Frames:      {}", cafe.frame());
    if let Some(day) = cafe.current_day() {
        println!("Day:         {} ({})", day.day, day.time_range);
    }
    println!("Day changes: {}", day_changes);
    println!("Stains:      {}", panel.entities);
    println!("Connections: {} (peak {})", panel.connections, panel.peak_connections);
    println!("Tones:       {} played, {} dropped", played, dropped);
    cafe.shutdown();
}

fn run_window(config: &SimulatorConfig, settings: Settings, mode: PlaybackMode, day: usize, audio_on: bool) {
    let size = Size::new(config.window.width, config.window.height);
    let mut display = SimulatorDisplay::<Rgb888>::new(size);
    let output_settings = OutputSettingsBuilder::new()
        .scale(config.window.scale.max(1))
        .build();
    let mut window = Window::new("Morii - Coffee Stains", &output_settings);

    let mut cafe: Cafe<KiraSynth, PerlinField> = Cafe::new(
        settings,
        &DAYS,
        KiraSynth::new(config.audio.master_db),
        PerlinField::new(settings.rng_seed),
    );
    cafe.set_mode(mode);
    cafe.set_day_index(day);
    if audio_on {
        cafe.unlock_audio();
    }
    let mut panel = CounterPanel::default();

    let frame_duration = Duration::from_secs_f32(1.0 / config.window.fps.max(1) as f32);

    println!("=== Morii - Coffee Stains ===");
    println!("Controls:");
    println!("  Space: Toggle interactive / cinematic");
    println!("  Left/Right: Previous / next day");
    println!("  M: Unlock audio");
    println!("  Q/Escape: Quit");
    if !audio_on {
        println!("\nAudio is locked; press M to start it.");
    }

    'main_loop: loop {
        let started = Instant::now();

        let report = cafe.step(&mut panel);
        if report.day_changed {
            println!("Day {}", report.day_index + 1);
        }

        if let Err(e) = render::render_frame(&mut display, &cafe, &panel) {
            match e {}
        }
        window.update(&display);

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'main_loop,
                SimulatorEvent::KeyDown { keycode, .. } => {
                    let key = format!("{:?}", keycode).to_lowercase();
                    match key.as_str() {
                        "space" => {
                            let next = match cafe.mode() {
                                PlaybackMode::Interactive => PlaybackMode::Cinematic,
                                PlaybackMode::Cinematic => PlaybackMode::Interactive,
                            };
                            cafe.set_mode(next);
                            println!("Mode: {:?}", next);
                        }
                        "left" => {
                            let count = cafe.days().len().max(1);
                            cafe.set_day_index(cafe.day_index() + count - 1);
                            println!("Day {}", cafe.day_index() + 1);
                        }
                        "right" => {
                            cafe.set_day_index(cafe.day_index() + 1);
                            println!("Day {}", cafe.day_index() + 1);
                        }
                        "m" => {
                            cafe.unlock_audio();
                            let audible = cafe.audio().synth().is_audible();
                            println!("Audio: {:?} (device open: {})", cafe.audio().state(), audible);
                        }
                        "q" | "escape" => break 'main_loop,
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let elapsed = started.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
    }

    cafe.shutdown();
    let (played, dropped) = cafe.audio().counters();
    log::info!("bye: {} tones played, {} dropped", played, dropped);
}
