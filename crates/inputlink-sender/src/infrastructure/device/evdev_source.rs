//! evdev-backed input source for Linux.
//!
//! A [`DeviceHandle`] owns one `/dev/input/event*` node, grabbed exclusively
//! (`EVIOCGRAB`) so events stop reaching the local desktop session while the
//! forwarder runs. The file descriptor is switched to non-blocking mode and
//! [`DeviceHandle::poll_event`] polls it with short sleeps; that keeps every
//! blocking point bounded so cooperative shutdown stays responsive.

use std::collections::VecDeque;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use evdev::{Device, InputEventKind, Key, RelativeAxisType};
use tracing::{debug, warn};

use super::{DeviceError, EventSource, InputSourceInfo, RawEvent, RawEventKind};

/// Sleep between empty non-blocking reads.
const POLL_SLEEP: Duration = Duration::from_millis(5);

/// One exclusively-grabbed local input source.
///
/// The grab is released by [`DeviceHandle::release`] and, as a guarantee, on
/// drop, so a handle can never outlive its exclusivity.
pub struct DeviceHandle {
    device: Device,
    path: PathBuf,
    name: String,
    grabbed: bool,
    pending: VecDeque<RawEvent>,
    /// Set after a terminal read error; the sequence is not restartable.
    failed: bool,
}

impl DeviceHandle {
    /// Opens the device node at `path` in non-blocking mode.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Unavailable`] if the node cannot be opened or
    /// switched to non-blocking mode.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DeviceError> {
        let path = path.as_ref().to_path_buf();
        let device = Device::open(&path).map_err(|source| DeviceError::Unavailable {
            path: path.clone(),
            source,
        })?;
        set_nonblocking(&device).map_err(|source| DeviceError::Unavailable {
            path: path.clone(),
            source,
        })?;
        let name = device.name().unwrap_or("unnamed device").to_string();
        Ok(Self {
            device,
            path,
            name,
            grabbed: false,
            pending: VecDeque::new(),
            failed: false,
        })
    }

    /// Takes the exclusive grab. While grabbed, events from this device reach
    /// only this process.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::AlreadyGrabbed`] if another process holds the
    /// grab (EBUSY) and [`DeviceError::PermissionDenied`] for EACCES/EPERM.
    pub fn grab(&mut self) -> Result<(), DeviceError> {
        if self.grabbed {
            return Ok(());
        }
        match self.device.grab() {
            Ok(()) => {
                debug!(path = %self.path.display(), name = %self.name, "grabbed input device");
                self.grabbed = true;
                Ok(())
            }
            Err(e) => match e.raw_os_error() {
                Some(libc::EBUSY) => Err(DeviceError::AlreadyGrabbed { path: self.path.clone() }),
                Some(libc::EACCES) | Some(libc::EPERM) => {
                    Err(DeviceError::PermissionDenied { path: self.path.clone() })
                }
                _ => Err(DeviceError::Unavailable { path: self.path.clone(), source: e }),
            },
        }
    }

    /// Returns the device node path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the infinite blocking event sequence for this handle.
    ///
    /// The iterator yields events until the device fails (unplug), after
    /// which it yields the terminal error once and then ends; it cannot be
    /// restarted. Capture loops that need to observe a stop flag use
    /// [`DeviceHandle::poll_event`] directly; this iterator is the unbounded
    /// form of the same sequence.
    pub fn events(&mut self) -> Events<'_> {
        Events { handle: self, done: false }
    }

    /// Pulls one batch of events from the kernel into the pending queue.
    fn fill_pending(&mut self) -> Result<(), DeviceError> {
        match self.device.fetch_events() {
            Ok(events) => {
                for ev in events {
                    match ev.kind() {
                        InputEventKind::Key(key) => {
                            self.pending.push_back(RawEvent {
                                kind: RawEventKind::Key,
                                code: u32::from(key.code()),
                                value: ev.value(),
                            });
                        }
                        InputEventKind::RelAxis(axis) => {
                            self.pending.push_back(RawEvent {
                                kind: RawEventKind::RelativeAxis,
                                code: u32::from(axis.0),
                                value: ev.value(),
                            });
                        }
                        // Synchronization markers and other event types carry
                        // nothing the forwarder translates.
                        _ => {}
                    }
                }
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(()),
            Err(e) => {
                self.failed = true;
                Err(DeviceError::Read { source: e })
            }
        }
    }
}

impl EventSource for DeviceHandle {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>, DeviceError> {
        if self.failed {
            return Err(DeviceError::Read {
                source: std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "device sequence already terminated",
                ),
            });
        }
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(ev) = self.pending.pop_front() {
                return Ok(Some(ev));
            }
            self.fill_pending()?;
            if !self.pending.is_empty() {
                continue;
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            std::thread::sleep(POLL_SLEEP.min(deadline - now));
        }
    }

    fn release(&mut self) {
        if self.grabbed {
            // Best-effort ungrab; dropping the fd would release it anyway.
            if let Err(e) = self.device.ungrab() {
                warn!(path = %self.path.display(), "ungrab failed: {e}");
            }
            debug!(path = %self.path.display(), "released input device");
            self.grabbed = false;
        }
    }

    fn description(&self) -> String {
        format!("{} ({})", self.name, self.path.display())
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Infinite blocking event sequence over a [`DeviceHandle`].
pub struct Events<'a> {
    handle: &'a mut DeviceHandle,
    done: bool,
}

impl Iterator for Events<'_> {
    type Item = Result<RawEvent, DeviceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.handle.poll_event(Duration::from_secs(1)) {
                Ok(Some(ev)) => return Some(Ok(ev)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

// ── Enumeration and selection ─────────────────────────────────────────────────

/// Lists all input device nodes visible to this process.
pub fn list_input_sources() -> Vec<InputSourceInfo> {
    evdev::enumerate()
        .map(|(path, dev)| InputSourceInfo {
            name: dev.name().unwrap_or("unnamed device").to_string(),
            path,
        })
        .collect()
}

/// Picks the first device that looks like a real keyboard: letter keys plus
/// a space bar, and no pointer buttons.
pub fn find_keyboard() -> Option<PathBuf> {
    for (path, dev) in evdev::enumerate() {
        let Some(keys) = dev.supported_keys() else { continue };
        let has_letters = keys.contains(Key::KEY_A) && keys.contains(Key::KEY_SPACE);
        let has_buttons = keys.contains(Key::BTN_LEFT);
        if has_letters && !has_buttons {
            debug!(path = %path.display(), name = dev.name().unwrap_or("?"), "selected keyboard");
            return Some(path);
        }
    }
    None
}

/// Picks the first device that looks like a pointer: relative X/Y motion and
/// a left button.
pub fn find_pointer() -> Option<PathBuf> {
    for (path, dev) in evdev::enumerate() {
        let has_rel = dev
            .supported_relative_axes()
            .map(|axes| axes.contains(RelativeAxisType::REL_X) && axes.contains(RelativeAxisType::REL_Y))
            .unwrap_or(false);
        let has_button = dev
            .supported_keys()
            .map(|keys| keys.contains(Key::BTN_LEFT))
            .unwrap_or(false);
        if has_rel && has_button {
            debug!(path = %path.display(), name = dev.name().unwrap_or("?"), "selected pointer");
            return Some(path);
        }
    }
    None
}

/// Switches the device fd to non-blocking mode, preserving existing flags.
fn set_nonblocking(dev: &Device) -> std::io::Result<()> {
    let fd = dev.as_raw_fd();
    let current = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if current < 0 {
        return Err(std::io::Error::last_os_error());
    }
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, current | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_nonexistent_node_reports_unavailable() {
        let result = DeviceHandle::open("/dev/input/event-does-not-exist");
        assert!(matches!(result, Err(DeviceError::Unavailable { .. })));
    }

    #[test]
    fn test_list_input_sources_does_not_panic_without_devices() {
        // In a container without /dev/input this is simply empty.
        let _ = list_input_sources();
    }
}
