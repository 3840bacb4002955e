//! Input capture infrastructure for the sender application.
//!
//! On Linux, devices are opened through evdev and grabbed exclusively: while
//! a grab is held, events reach this process and nothing else. That
//! exclusivity is the point, since forwarded input must not also land on the
//! local desktop. Raw events are pulled by the capture loops with a bounded
//! wait so the shared stop flag stays responsive.
//!
//! # Testability
//!
//! The [`EventSource`] trait allows unit and integration tests to inject
//! synthetic events without any real device or elevated privileges.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod evdev_source;

#[cfg(target_os = "linux")]
pub use evdev_source::{find_keyboard, find_pointer, list_input_sources, DeviceHandle};

/// Kind of a raw input event as produced by the device layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEventKind {
    /// A key or button transition; `value` 1 = press, 0 = release,
    /// 2 = autorepeat.
    Key,
    /// A relative motion step; `value` is the signed delta.
    RelativeAxis,
}

/// A raw input event, one per device transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: RawEventKind,
    /// Raw platform code (evdev `KEY_*`/`BTN_*`/`REL_*`).
    pub code: u32,
    pub value: i32,
}

impl RawEvent {
    /// Shorthand constructor for a key/button transition.
    pub fn key(code: u32, value: i32) -> Self {
        Self { kind: RawEventKind::Key, code, value }
    }

    /// Shorthand constructor for a relative motion step.
    pub fn rel(code: u32, value: i32) -> Self {
        Self { kind: RawEventKind::RelativeAxis, code, value }
    }
}

/// Name and device-node path of an available input source.
#[derive(Debug, Clone)]
pub struct InputSourceInfo {
    pub name: String,
    pub path: PathBuf,
}

/// Error type for device operations.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The device node could not be opened.
    #[error("input device unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another process already holds an exclusive grab on the device.
    #[error("input device at {path} is already grabbed")]
    AlreadyGrabbed { path: PathBuf },

    /// Insufficient privilege to grab the device. Fatal at startup; not
    /// retried.
    #[error("permission denied grabbing input device at {path}")]
    PermissionDenied { path: PathBuf },

    /// Reading from the device failed (e.g. it was unplugged). Terminal for
    /// the handle; the event sequence cannot be restarted.
    #[error("input device read failed: {source}")]
    Read {
        #[source]
        source: io::Error,
    },
}

/// Trait abstracting a grabbed input source.
///
/// The production implementation is [`DeviceHandle`] over evdev; tests use
/// [`mock::MockEventSource`]. An implementation is owned by exactly one
/// capture loop for its lifetime.
pub trait EventSource: Send {
    /// Waits up to `timeout` for the next raw event.
    ///
    /// Returns `Ok(None)` when the device was quiet for the whole window,
    /// the caller's chance to observe its stop flag. An `Err` is terminal:
    /// the source will never produce events again.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>, DeviceError>;

    /// Releases the underlying exclusivity. Idempotent; also invoked on drop,
    /// so local input is restored on every exit path.
    fn release(&mut self);

    /// Human-readable identification for logs.
    fn description(&self) -> String;
}
