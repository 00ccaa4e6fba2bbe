//! screenflash - Multi-monitor pointer transition flashes
//!
//! Flashes the screen where the pointer crosses from one display to another.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use screenflash::config::{self, Config};
use screenflash::flash::{FlashCoordinator, FlashMode, LogRenderer};
use screenflash::platform::{self, simulated, Desktop, DisplaySource};
use screenflash::screen::{DisplayRegion, DisplayTopology, Point, TopologyBuilder};
use screenflash::settings::{FileStore, Settings, StyleKey};
use screenflash::transition::{MonitorEvent, TransitionMonitor};

/// screenflash - Flash the pointer when it changes display
#[derive(Parser)]
#[command(name = "screenflash")]
#[command(version = "0.1.0")]
#[command(about = "Highlight pointer transitions between monitors", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the real pointer until Ctrl+C
    Run {
        /// Override the configured flash mode
        #[arg(short, long, value_enum)]
        mode: Option<FlashMode>,

        /// Print transitions as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Drive a simulated desktop along a pointer path
    Simulate {
        /// Number of 1920x1080 displays laid out left to right
        #[arg(short, long, default_value_t = 2)]
        displays: usize,

        /// Pointer path as "x,y x,y ..." (defaults to a sweep across every display)
        #[arg(short, long)]
        path: Option<String>,

        /// Time spent at each point, in milliseconds
        #[arg(long, default_value_t = 100)]
        step_ms: u64,

        /// Override the configured flash mode
        #[arg(short, long, value_enum)]
        mode: Option<FlashMode>,

        /// Print transitions as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// List the connected displays
    Displays {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change the flash style
    Style {
        #[command(subcommand)]
        action: StyleCommand,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show system information
    Info,
}

#[derive(Subcommand)]
enum StyleCommand {
    /// Print every style setting
    Show,

    /// Change one setting
    Set {
        /// Setting name (e.g. animation_duration)
        key: String,
        value: String,
    },

    /// Restore the default style
    Reset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Initialize logging
    let filter = if cli.verbose || config.general.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run { mode, json } => {
            let desktop = platform::native()?;
            let mode = mode.unwrap_or(config.monitor.flash_mode);
            run_monitor(&config, desktop, mode, json, tokio::signal::ctrl_c()).await?;
        }
        Commands::Simulate {
            displays,
            path,
            step_ms,
            mode,
            json,
        } => {
            run_simulation(&config, displays, path, step_ms, mode, json).await?;
        }
        Commands::Displays { json } => {
            let mut desktop = platform::native()?;
            print_displays(desktop.displays()?, json)?;
        }
        Commands::Style { action } => {
            let mut settings = open_settings(&config);
            match action {
                StyleCommand::Show => {}
                StyleCommand::Set { key, value } => settings.set_named(&key, &value)?,
                StyleCommand::Reset => settings.reset()?,
            }
            print_style(&settings);
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Info => {
            print_system_info(&config);
        }
    }

    Ok(())
}

/// Style settings from the configured file, or in memory if there is none
fn open_settings(config: &Config) -> Settings {
    match config.style_store_path() {
        Some(path) => {
            tracing::debug!("Style settings at {}", path.display());
            Settings::load(Box::new(FileStore::open(path)))
        }
        None => {
            tracing::warn!("No config directory, style changes will not persist");
            Settings::in_memory()
        }
    }
}

/// Monitor `desktop` until `until` resolves
async fn run_monitor(
    config: &Config,
    desktop: Box<dyn Desktop>,
    mode: FlashMode,
    json: bool,
    until: impl std::future::Future,
) -> anyhow::Result<()> {
    let settings = open_settings(config);
    let renderer = Arc::new(LogRenderer::new(config.frame_interval()));
    let coordinator = FlashCoordinator::new(renderer, config.flash_options());

    let mut monitor = TransitionMonitor::new(
        desktop,
        config.monitor_options(),
        coordinator,
        settings.subscribe(),
    );
    monitor.set_flash_mode(mode);

    let mut event_rx = monitor
        .take_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("monitor event receiver already taken"))?;

    monitor.start().await?;

    if !json {
        println!("\n========================================");
        println!("  screenflash running");
        println!("========================================");
        println!("  Pointer on: {}", monitor.current_display_name());
        println!("  Flash mode: {}", mode);
        println!("========================================");
        println!("\nPress Ctrl+C to stop.\n");
    }

    tokio::pin!(until);
    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                match event {
                    MonitorEvent::Transition(transition) => {
                        if json {
                            println!("{}", serde_json::to_string(&transition)?);
                        } else {
                            println!(
                                "-> {} ({}, #{})",
                                monitor.current_display_name(),
                                transition.direction,
                                transition.sequence
                            );
                        }
                    }
                    MonitorEvent::TopologyChanged { displays } => {
                        tracing::info!("Now {} display(s)", displays);
                    }
                    MonitorEvent::Started { .. } | MonitorEvent::Stopped { .. } => {}
                }
            }
            _ = &mut until => {
                break;
            }
        }
    }

    monitor.stop().await?;
    if !json {
        println!("\n{} transition(s)", monitor.transition_count());
    }

    Ok(())
}

/// Sweep or replay a path over simulated displays
async fn run_simulation(
    config: &Config,
    displays: usize,
    path: Option<String>,
    step_ms: u64,
    mode: Option<FlashMode>,
    json: bool,
) -> anyhow::Result<()> {
    anyhow::ensure!(displays > 0, "at least one display is required");

    let topology = side_by_side(displays);
    let points = match path {
        Some(path) => simulated::parse_points(&path)?,
        None => sweep(&topology),
    };
    let start = points.first().copied().unwrap_or_default();

    let (desktop, handle) = simulated::simulated(topology.regions().to_vec(), start);
    let mode = mode.unwrap_or(config.monitor.flash_mode);

    // Let the last flash fade before stopping
    let style = open_settings(config).snapshot();
    let settle = style.duration() + config.flash_options().stagger;
    let step = Duration::from_millis(step_ms);

    let script = async move {
        handle.play(&points, step).await;
        tokio::time::sleep(settle).await;
    };

    run_monitor(config, Box::new(desktop), mode, json, script).await
}

/// `count` 1920x1080 displays in a row, the first one primary
fn side_by_side(count: usize) -> DisplayTopology {
    let mut builder = TopologyBuilder::new().display("1", 0.0, 0.0, 1920.0, 1080.0);
    for n in 2..=count {
        builder = builder.right_of(&(n - 1).to_string(), &n.to_string(), 1920.0, 1080.0);
    }
    builder.build()
}

/// Left-to-right pass through the middle of every display
fn sweep(topology: &DisplayTopology) -> Vec<Point> {
    let width: f64 = topology.regions().iter().map(|r| r.frame.width).sum();
    let mut points = Vec::new();
    let mut x = 100.0;
    while x < width {
        points.push(Point::new(x, 540.0));
        x += 200.0;
    }
    points
}

fn print_displays(regions: Vec<DisplayRegion>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&regions)?);
        return Ok(());
    }

    let topology = DisplayTopology::from_regions(regions);
    println!("{} display(s)\n", topology.len());
    for region in topology.regions() {
        println!(
            "  {:<16} {:<12} {:>6} x {:<6} at ({}, {})",
            topology.display_name(region),
            region.label,
            region.frame.width,
            region.frame.height,
            region.frame.x,
            region.frame.y
        );
    }
    Ok(())
}

fn print_style(settings: &Settings) {
    let style = settings.snapshot();
    for key in StyleKey::ALL {
        println!("{:<18} = {}", key, style.get(key));
    }
}

/// Print system information
fn print_system_info(config: &Config) {
    println!("screenflash System Information");
    println!("==============================\n");

    println!("Platform: {}", platform::platform_name());
    match platform::native().and_then(|mut desktop| desktop.displays()) {
        Ok(displays) => println!("Displays: {}", displays.len()),
        Err(e) => println!("Displays: unavailable ({})", e),
    }
    match config.style_store_path() {
        Some(path) => println!("Style settings: {}", path.display()),
        None => println!("Style settings: in memory"),
    }

    #[cfg(target_os = "linux")]
    {
        println!("\nLinux Requirements:");
        println!("  - An X11 session (or XWayland) reachable through $DISPLAY");
        println!("  - RandR 1.5 for per-monitor layout");
    }

    #[cfg(target_os = "macos")]
    {
        println!("\nmacOS Requirements:");
        println!("  - No special permissions for pointer polling");
    }

    #[cfg(target_os = "windows")]
    {
        println!("\nWindows Requirements:");
        println!("  - Per-monitor DPI awareness for exact monitor bounds");
    }
}
