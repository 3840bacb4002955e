//! Mock event source for testing.
//!
//! Allows tests to inject synthetic [`RawEvent`]s through the
//! [`EventSource`] seam without a real device node, an exclusive grab, or
//! elevated privileges.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{DeviceError, EventSource, RawEvent};

enum MockItem {
    Event(RawEvent),
    /// Simulates a terminal device failure (e.g. unplug).
    Fail,
}

struct MockInner {
    queue: Mutex<VecDeque<MockItem>>,
    released: Mutex<bool>,
    release_calls: Mutex<u32>,
}

/// A mock [`EventSource`] fed from a paired [`MockDeviceHandleControl`].
pub struct MockEventSource {
    name: String,
    inner: Arc<MockInner>,
}

/// Test-side control for a [`MockEventSource`]: injects events and observes
/// release behavior after the source has been moved into a capture loop.
#[derive(Clone)]
pub struct MockDeviceHandleControl {
    inner: Arc<MockInner>,
}

impl MockEventSource {
    /// Creates a mock source and its paired control handle.
    pub fn new(name: &str) -> (Self, MockDeviceHandleControl) {
        let inner = Arc::new(MockInner {
            queue: Mutex::new(VecDeque::new()),
            released: Mutex::new(false),
            release_calls: Mutex::new(0),
        });
        (
            Self { name: name.to_string(), inner: Arc::clone(&inner) },
            MockDeviceHandleControl { inner },
        )
    }
}

impl MockDeviceHandleControl {
    /// Injects a synthetic event, as if read from hardware.
    pub fn inject(&self, event: RawEvent) {
        self.inner
            .queue
            .lock()
            .expect("lock poisoned")
            .push_back(MockItem::Event(event));
    }

    /// Makes the next poll fail terminally, simulating a device unplug.
    pub fn fail_next(&self) {
        self.inner
            .queue
            .lock()
            .expect("lock poisoned")
            .push_back(MockItem::Fail);
    }

    /// Returns `true` once the source has been released.
    pub fn is_released(&self) -> bool {
        *self.inner.released.lock().expect("lock poisoned")
    }

    /// Returns how many times `release()` has been called.
    pub fn release_calls(&self) -> u32 {
        *self.inner.release_calls.lock().expect("lock poisoned")
    }
}

impl EventSource for MockEventSource {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<RawEvent>, DeviceError> {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut queue = self.inner.queue.lock().expect("lock poisoned");
                match queue.pop_front() {
                    Some(MockItem::Event(ev)) => return Ok(Some(ev)),
                    Some(MockItem::Fail) => {
                        return Err(DeviceError::Read {
                            source: std::io::Error::new(
                                std::io::ErrorKind::BrokenPipe,
                                "injected device failure",
                            ),
                        });
                    }
                    None => {}
                }
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn release(&mut self) {
        *self.inner.release_calls.lock().expect("lock poisoned") += 1;
        *self.inner.released.lock().expect("lock poisoned") = true;
    }

    fn description(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::device::RawEventKind;

    #[test]
    fn test_mock_source_yields_injected_events_in_order() {
        // Arrange
        let (mut source, control) = MockEventSource::new("mock-kbd");
        control.inject(RawEvent::key(30, 1));
        control.inject(RawEvent::rel(0, 5));

        // Act / Assert
        let first = source.poll_event(Duration::from_millis(10)).unwrap().unwrap();
        assert_eq!(first.kind, RawEventKind::Key);
        assert_eq!(first.code, 30);

        let second = source.poll_event(Duration::from_millis(10)).unwrap().unwrap();
        assert_eq!(second.kind, RawEventKind::RelativeAxis);
        assert_eq!(second.value, 5);
    }

    #[test]
    fn test_mock_source_times_out_when_quiet() {
        let (mut source, _control) = MockEventSource::new("mock-kbd");
        let result = source.poll_event(Duration::from_millis(5)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_mock_source_injected_failure_is_terminal_error() {
        let (mut source, control) = MockEventSource::new("mock-kbd");
        control.fail_next();
        let result = source.poll_event(Duration::from_millis(5));
        assert!(matches!(result, Err(DeviceError::Read { .. })));
    }

    #[test]
    fn test_release_twice_has_same_observable_effect_as_once() {
        // Arrange
        let (mut source, control) = MockEventSource::new("mock-kbd");

        // Act
        source.release();
        source.release();

        // Assert – no panic, still simply "released"
        assert!(control.is_released());
        assert_eq!(control.release_calls(), 2);
    }
}
