//! inputlink sender entry point.
//!
//! Wires together configuration, transport bring-up, device acquisition, and
//! the forwarding session, then supervises the session from the Tokio
//! runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load config, init tracing
//!  └─ transport bring-up (once)
//!  └─ loop: one ForwardingSession per peer
//!       ├─ open + grab input devices
//!       ├─ session.start()        -- orchestrator + capture/monitor threads
//!       └─ poll status            -- until peer loss or Ctrl-C
//! ```
//!
//! The session itself is single-use; serving the next peer after a
//! disconnect means reopening the devices and building a fresh session.

use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inputlink_sender::application::session::{ForwardingSession, SessionOptions, SessionState};
use inputlink_sender::infrastructure::device::EventSource;
use inputlink_sender::infrastructure::storage::config::{self, AppConfig};
use inputlink_sender::infrastructure::transport::{CommandBringup, NoopBringup, TransportBringup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional explicit config path as the single CLI argument.
    let config = match std::env::args().nth(1) {
        Some(path) => config::load_config_from(&PathBuf::from(path))?,
        None => config::load_config()?,
    };

    // Structured logging; level comes from the config and is overridden by
    // `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.sender.log_level.clone())),
        )
        .init();

    info!("inputlink sender starting");

    // Transport bring-up runs exactly once, before anything listens.
    let bringup: Box<dyn TransportBringup> = match &config.network.bringup_command {
        Some(command) => Box::new(CommandBringup::new(command.clone())),
        None => Box::new(NoopBringup),
    };
    bringup.bring_up().context("transport bring-up failed")?;

    // Ctrl-C flips the shared shutdown flag; the supervision loop notices.
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_signal = Arc::clone(&shutdown);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown_signal.store(true, Ordering::Relaxed);
        }
    });

    while !shutdown.load(Ordering::Relaxed) {
        let (keyboard, pointer) = open_input_sources(&config)?;
        let listener = TcpListener::bind((
            config.network.bind_address.as_str(),
            config.network.listen_port,
        ))
        .with_context(|| {
            format!(
                "cannot listen on {}:{}",
                config.network.bind_address, config.network.listen_port
            )
        })?;
        info!(addr = %listener.local_addr()?, "awaiting peer");

        let options = SessionOptions {
            identity: config.sender.identity.clone(),
            ping_interval: Duration::from_millis(config.session.ping_interval_ms),
        };
        let mut session = ForwardingSession::new(listener, keyboard, pointer, options)?;
        session.start()?;

        loop {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if shutdown.load(Ordering::Relaxed) {
                session.stop();
                break;
            }
            if session.status().state == SessionState::Closed {
                info!("session ended, awaiting next peer");
                break;
            }
        }
    }

    info!("inputlink sender stopped");
    Ok(())
}

/// Opens and grabs the configured (or autodetected) input devices.
///
/// A missing or busy device degrades to forwarding the other stream alone;
/// a permission failure is fatal, since retrying cannot fix it. With no
/// device at all there is nothing to forward, so startup aborts.
#[cfg(target_os = "linux")]
fn open_input_sources(
    config: &AppConfig,
) -> anyhow::Result<(Option<Box<dyn EventSource>>, Option<Box<dyn EventSource>>)> {
    use inputlink_sender::infrastructure::device::{find_keyboard, find_pointer, list_input_sources};

    let keyboard_path = config
        .devices
        .keyboard
        .clone()
        .map(PathBuf::from)
        .or_else(find_keyboard);
    let pointer_path = config
        .devices
        .pointer
        .clone()
        .map(PathBuf::from)
        .or_else(find_pointer);

    let keyboard = open_grabbed(keyboard_path, "keyboard")?;
    let pointer = open_grabbed(pointer_path, "pointer")?;

    if keyboard.is_none() && pointer.is_none() {
        for source in list_input_sources() {
            info!(path = %source.path.display(), name = %source.name, "available input source");
        }
        anyhow::bail!("no usable input devices found (check /dev/input access)");
    }
    Ok((keyboard, pointer))
}

#[cfg(target_os = "linux")]
fn open_grabbed(
    path: Option<PathBuf>,
    label: &str,
) -> anyhow::Result<Option<Box<dyn EventSource>>> {
    use inputlink_sender::infrastructure::device::{DeviceError, DeviceHandle};

    let Some(path) = path else {
        warn!("no {label} device found");
        return Ok(None);
    };
    let mut handle = match DeviceHandle::open(&path) {
        Ok(handle) => handle,
        Err(e) => {
            warn!("cannot open {label}: {e}");
            return Ok(None);
        }
    };
    match handle.grab() {
        Ok(()) => {
            info!(device = %handle.description(), "capturing {label}");
            Ok(Some(Box::new(handle)))
        }
        Err(e @ DeviceError::PermissionDenied { .. }) => Err(e.into()),
        Err(e) => {
            warn!("cannot grab {label}: {e}");
            Ok(None)
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn open_input_sources(
    _config: &AppConfig,
) -> anyhow::Result<(Option<Box<dyn EventSource>>, Option<Box<dyn EventSource>>)> {
    anyhow::bail!("input capture is only implemented for Linux evdev")
}
