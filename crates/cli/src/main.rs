//! open-xkeys CLI: command-line tool for the X-keys XK-24 panel.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::time::MissedTickBehavior;

use open_xkeys_core::backlight::{BacklightCommand, Color};
use open_xkeys_core::device::{self, HidPanelProvider};
use open_xkeys_core::layout;
use open_xkeys_core::poller::{Poller, OPEN_RETRY_INTERVAL, READ_INTERVAL};
use open_xkeys_core::report::KeyStates;
use open_xkeys_core::scene::{self, Scene};
use open_xkeys_core::transport;

#[derive(Parser)]
#[command(
    name = "open-xkeys",
    version,
    about = "Open-source X-keys XK-24 panel control"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List connected XK-24 panels.
    ListDevices,
    /// Report whether a panel is currently connected.
    Status,
    /// Poll the panel and print key press/release events.
    Watch,
    /// Set the backlight color of one key.
    Backlight {
        /// Key index (0-23).
        key: usize,
        /// Color: red, blue, or off.
        color: String,
    },
    /// Write a template scene file for hand editing.
    SaveScene {
        /// Destination path for the JSON scene.
        file: PathBuf,
    },
    /// Load a scene file and send it to the panel.
    ApplyScene {
        /// Path of the JSON scene to apply.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListDevices => {
            let api = hid_api()?;
            let devices = device::discover_devices(&api);
            if devices.is_empty() {
                println!("No XK-24 panel found.");
                println!("Ensure the panel is plugged in and raw HID access is permitted.");
            } else {
                for dev in &devices {
                    println!(
                        "XK-24 (VID: 0x{:04X}, PID: 0x{:04X}, serial: {}, path: {})",
                        dev.vid,
                        dev.pid,
                        dev.serial.as_deref().unwrap_or("n/a"),
                        dev.path
                    );
                }
            }
        }
        Commands::Status => {
            let api = hid_api()?;
            if device::is_present(&api) {
                println!("Connected: XK-24 panel is enumerable.");
            } else {
                println!("Disconnected: no XK-24 panel found.");
            }
        }
        Commands::Watch => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .enable_io()
                .build()?;
            runtime.block_on(watch())?;
        }
        Commands::Backlight { key, color } => {
            layout::validate_key_index(key)?;
            let parsed = Color::from_name(&color).ok_or_else(|| {
                anyhow::anyhow!("Unknown color '{}'. Valid colors: red, blue, off", color)
            })?;

            let api = hid_api()?;
            if !device::is_present(&api) {
                println!("No XK-24 panel connected; command dropped.");
                return Ok(());
            }
            let panel = device::open_panel(&api).ok_or_else(|| {
                anyhow::anyhow!("panel is enumerable but could not be opened (permissions?)")
            })?;
            transport::send_backlight(&panel, &BacklightCommand::new(parsed, key))?;
            println!("Set key {key} to {}", parsed.label());
        }
        Commands::SaveScene { file } => {
            scene::save_scene(&file, &Scene::default())?;
            println!("Template scene written to {}", file.display());
            println!("Edit the per-key colors (Red, Blue, Off), then run 'apply-scene'.");
        }
        Commands::ApplyScene { file } => {
            let loaded = scene::load_scene(&file)?;

            let api = hid_api()?;
            if !device::is_present(&api) {
                println!("No XK-24 panel connected; scene not applied.");
                return Ok(());
            }
            let panel = device::open_panel(&api).ok_or_else(|| {
                anyhow::anyhow!("panel is enumerable but could not be opened (permissions?)")
            })?;
            scene::apply_scene(&panel, &loaded)?;
            println!("Applied scene '{}' ({} keys)", loaded.name, loaded.keys.len());
        }
    }

    Ok(())
}

fn hid_api() -> Result<hidapi::HidApi> {
    hidapi::HidApi::new().map_err(|e| anyhow::anyhow!("hidapi init: {e}"))
}

/// The live poll loop: a slow open-retry timer while disconnected, a fast
/// read timer while connected, ctrl-c for teardown. Everything runs on the
/// current thread.
async fn watch() -> Result<()> {
    let provider = HidPanelProvider::new()?;
    let mut poller = Poller::new(provider);

    let mut open_timer = tokio::time::interval(OPEN_RETRY_INTERVAL);
    open_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut read_timer = tokio::time::interval(READ_INTERVAL);
    read_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    println!("Watching for XK-24 key events (ctrl-c to quit)...");
    let mut previous = KeyStates::released();

    loop {
        tokio::select! {
            _ = open_timer.tick(), if !poller.is_connected() => {
                if poller.try_open() {
                    println!("Panel connected.");
                    previous = KeyStates::released();
                }
            }
            _ = read_timer.tick(), if poller.is_connected() => {
                if let Some(keys) = poller.poll_keys() {
                    report_edges(&previous, &keys);
                    previous = keys;
                } else if !poller.is_connected() {
                    println!(
                        "Panel connection lost; retrying every {}s.",
                        OPEN_RETRY_INTERVAL.as_secs()
                    );
                }
            }
            _ = &mut ctrl_c => {
                break;
            }
        }
    }

    poller.close();
    println!("Closed.");
    Ok(())
}

/// Print press/release edges between two consecutive key snapshots.
fn report_edges(previous: &KeyStates, current: &KeyStates) {
    for index in 0..layout::KEY_COUNT {
        let before = previous.pressed(index);
        let now = current.pressed(index);
        if now && !before {
            println!("key {index:2} pressed");
        } else if before && !now {
            println!("key {index:2} released");
        }
    }
}
