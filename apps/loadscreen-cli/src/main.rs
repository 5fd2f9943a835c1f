use anyhow::Context;
use clap::{Parser, Subcommand};
use loadscreen_common::{Clock, ManualClock, RuntimeEnvironment};
use loadscreen_config::LoadingScreenSettings;
use loadscreen_core::LoadingScreenSubsystem;
use loadscreen_host::{HeadlessViewport, MapLoadNotifier, SimulatedGame};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Subsystem = LoadingScreenSubsystem<SimulatedGame, HeadlessViewport>;

#[derive(Parser)]
#[command(name = "loadscreen-cli", about = "CLI tool for the loading screen subsystem")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default settings
    Info,
    /// Validate a settings file and print the resolved values
    Settings {
        /// Path to a .yaml, .yml or .json settings file
        path: PathBuf,
        /// Write the default settings to `path` instead of reading it
        #[arg(long)]
        write_default: bool,
    },
    /// Simulate a map load on a headless host and print every transition
    Simulate {
        /// Settings file; defaults are used when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Override the hold time in seconds
        #[arg(long)]
        hold: Option<f32>,
        /// Seconds until the new world begins play
        #[arg(long, default_value = "1.5")]
        load_secs: f64,
        /// Total simulated seconds
        #[arg(long, default_value = "5.0")]
        duration: f64,
        /// Simulated frames per second
        #[arg(long, default_value = "10")]
        fps: u32,
        /// Game logic requests the screen at this time (seconds)
        #[arg(long)]
        cutscene_at: Option<f64>,
        /// How long the game logic request lasts (seconds)
        #[arg(long, default_value = "1.0")]
        cutscene_secs: f64,
        /// Run as if inside the editor
        #[arg(long)]
        editor: bool,
        /// Make the configured widget class fail to load
        #[arg(long)]
        missing_widget: bool,
    },
}

struct Scenario {
    settings: LoadingScreenSettings,
    env: RuntimeEnvironment,
    load_secs: f64,
    duration: f64,
    fps: u32,
    cutscene: Option<(f64, f64)>,
    missing_widget: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("loadscreen-cli v{}", env!("CARGO_PKG_VERSION"));
            print!(
                "default settings:\n{}",
                serde_yaml::to_string(&LoadingScreenSettings::default())?
            );
        }
        Commands::Settings {
            path,
            write_default,
        } => {
            if write_default {
                LoadingScreenSettings::default()
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote default settings to {}", path.display());
            } else {
                let settings = LoadingScreenSettings::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?;
                print!("{}", serde_yaml::to_string(&settings)?);
            }
        }
        Commands::Simulate {
            settings,
            hold,
            load_secs,
            duration,
            fps,
            cutscene_at,
            cutscene_secs,
            editor,
            missing_widget,
        } => {
            let mut settings = match settings {
                Some(path) => LoadingScreenSettings::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => LoadingScreenSettings::default(),
            };
            if let Some(hold) = hold {
                settings.hold_seconds = hold;
            }
            settings.validate()?;
            anyhow::ensure!(fps > 0, "fps must be positive");

            let env = if editor {
                RuntimeEnvironment::editor()
            } else {
                RuntimeEnvironment::game()
            };
            simulate(Scenario {
                settings,
                env,
                load_secs,
                duration,
                fps,
                cutscene: cutscene_at.map(|at| (at, at + cutscene_secs)),
                missing_widget,
            });
        }
    }

    Ok(())
}

fn simulate(scenario: Scenario) {
    let clock = ManualClock::new();
    let mut viewport = HeadlessViewport::new();
    if scenario.missing_widget {
        viewport.mark_class_missing(scenario.settings.widget.clone());
    }

    let subsystem = Rc::new(RefCell::new(Subsystem::initialize(
        scenario.settings,
        scenario.env,
        clock.clone(),
        Some(SimulatedGame::playing("MainMenu")),
        viewport,
    )));
    let mut notifier = MapLoadNotifier::new();
    Subsystem::register_map_load(&subsystem, &mut notifier);

    {
        let mut s = subsystem.borrow_mut();
        let c = clock.clone();
        s.on_hold_time_triggered().add(move |secs| {
            println!("[{:6.2}s] hold window opened ({secs:.2}s)", c.now().as_secs_f64());
        });
        let c = clock.clone();
        s.on_visibility_changed().add(move |shown| {
            let state = if shown { "SHOWN" } else { "HIDDEN" };
            println!("[{:6.2}s] loading screen {state}", c.now().as_secs_f64());
        });
    }

    println!(
        "Simulating map load: load={}s duration={}s fps={}",
        scenario.load_secs, scenario.duration, scenario.fps
    );

    // The main menu is already playing; the map change starts at t=0.
    if let Some(game) = subsystem.borrow_mut().game_mut() {
        game.unload_world();
    }
    notifier.broadcast_pre_load_map("Arena");
    if let Some(game) = subsystem.borrow_mut().game_mut() {
        game.load_world("Arena");
    }

    let dt = Duration::from_secs_f64(1.0 / f64::from(scenario.fps));
    let frames = (scenario.duration * f64::from(scenario.fps)).ceil() as u64;
    let mut began_play = false;
    let mut cutscene_active = false;

    for _ in 0..frames {
        clock.advance(dt);
        let t = clock.now().as_secs_f64();

        if !began_play && t >= scenario.load_secs {
            let world = subsystem.borrow_mut().game_mut().and_then(|game| {
                game.begin_play();
                game.world().cloned()
            });
            notifier.broadcast_post_load_map(world.as_ref());
            began_play = true;
        }

        let mut s = subsystem.borrow_mut();

        if let Some((start, end)) = scenario.cutscene {
            let wanted = t >= start && t < end;
            if wanted != cutscene_active {
                s.set_game_logic_override(wanted, "cutscene");
                cutscene_active = wanted;
            }
        }

        s.tick(dt);
        tracing::debug!(
            t,
            displayed = s.is_displayed(),
            reason = %s.last_reason(),
            "frame"
        );
    }

    let mut s = subsystem.borrow_mut();
    println!(
        "Final: displayed={} reason=\"{}\"",
        s.is_displayed(),
        s.last_reason()
    );
    println!("Viewport: {}", s.viewport().describe());
    s.deinitialize(&mut notifier);
}
