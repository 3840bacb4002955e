//! ForwardingSession: the session lifecycle and its concurrent loops.
//!
//! A session owns one listener, up to two grabbed input sources, and (once a
//! peer has connected) one [`FramedChannel`]. Three loops run on dedicated
//! threads while the session is `Active`:
//!
//! - the keyboard capture loop,
//! - the pointer capture loop,
//! - the connection monitor.
//!
//! Each capture loop owns its event source and its own translator; the only
//! shared mutable state is the channel (internally synchronized send) and the
//! session flag. Cancellation is cooperative: every blocking point is bounded,
//! and each loop checks the flag when its wait returns. Device and transport
//! errors are caught at the owning loop's boundary and become the `Closing`
//! transition; they never unwind across threads.
//!
//! `stop()` joins everything, so when it returns all devices have been
//! released and local input is restored. A session is single-use: forwarding
//! to the next peer means building a new session.

use std::net::{SocketAddr, TcpListener};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use inputlink_core::WireMessage;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::translate::EventTranslator;
use crate::infrastructure::device::EventSource;
use crate::infrastructure::transport::{FramedChannel, Liveness};

/// How long a capture loop waits for a device event before re-checking the
/// stop flag.
const CAPTURE_POLL: Duration = Duration::from_millis(10);

/// How often the orchestrator polls the listener while awaiting or
/// supervising a peer.
const ACCEPT_POLL: Duration = Duration::from_millis(25);

/// Granularity at which the monitor's interval sleep observes the stop flag.
const STOP_POLL: Duration = Duration::from_millis(25);

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingPeer,
    Active,
    Closing,
    Closed,
}

impl SessionState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Idle,
            1 => SessionState::AwaitingPeer,
            2 => SessionState::Active,
            3 => SessionState::Closing,
            _ => SessionState::Closed,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::AwaitingPeer => 1,
            SessionState::Active => 2,
            SessionState::Closing => 3,
            SessionState::Closed => 4,
        }
    }
}

/// Snapshot of the session for a supervising process.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub state: SessionState,
    pub peer: Option<SocketAddr>,
}

/// Session timing and identification options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Identification string sent in the `connected` preamble.
    pub identity: String,
    /// Interval between monitor pings/probes.
    pub ping_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            identity: "inputlink sender".to_string(),
            ping_interval: Duration::from_secs(1),
        }
    }
}

/// Error type for session lifecycle operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start()` was called on a session that already ran; sessions are
    /// single-use.
    #[error("session already started")]
    AlreadyStarted,

    /// Neither a keyboard nor a pointer source was supplied.
    #[error("no input sources available")]
    NoInputSources,
}

/// State shared between the session facade and its loops.
struct Shared {
    state: AtomicU8,
    stop: AtomicBool,
    peer: Mutex<Option<SocketAddr>>,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: AtomicU8::new(SessionState::Idle.as_u8()),
            stop: AtomicBool::new(false),
            peer: Mutex::new(None),
        }
    }

    fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Relaxed))
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state.as_u8(), Ordering::Relaxed);
    }

    fn stopping(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Requests shutdown. Safe from any loop and from the facade; the first
    /// caller moves a live session to `Closing`.
    fn begin_close(&self) {
        self.stop.store(true, Ordering::Relaxed);
        if matches!(self.state(), SessionState::AwaitingPeer | SessionState::Active) {
            self.set_state(SessionState::Closing);
        }
    }

    fn set_peer(&self, peer: Option<SocketAddr>) {
        *self.peer.lock().expect("peer lock poisoned") = peer;
    }

    fn peer(&self) -> Option<SocketAddr> {
        *self.peer.lock().expect("peer lock poisoned")
    }
}

/// Everything the orchestrator takes ownership of when the session starts.
struct SessionRuntime {
    listener: TcpListener,
    keyboard: Option<Box<dyn EventSource>>,
    pointer: Option<Box<dyn EventSource>>,
    options: SessionOptions,
}

/// One forwarding session: `Idle → AwaitingPeer → Active → Closing → Closed`.
pub struct ForwardingSession {
    shared: Arc<Shared>,
    runtime: Option<SessionRuntime>,
    orchestrator: Mutex<Option<JoinHandle<()>>>,
}

impl ForwardingSession {
    /// Creates an idle session owning the listener and the grabbed sources.
    ///
    /// Either source may be absent (degraded startup with a single device),
    /// but not both.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoInputSources`] when no source is supplied.
    pub fn new(
        listener: TcpListener,
        keyboard: Option<Box<dyn EventSource>>,
        pointer: Option<Box<dyn EventSource>>,
        options: SessionOptions,
    ) -> Result<Self, SessionError> {
        if keyboard.is_none() && pointer.is_none() {
            return Err(SessionError::NoInputSources);
        }
        Ok(Self {
            shared: Arc::new(Shared::new()),
            runtime: Some(SessionRuntime {
                listener,
                keyboard,
                pointer,
                options,
            }),
            orchestrator: Mutex::new(None),
        })
    }

    /// Starts the session: transitions to `AwaitingPeer` and spawns the
    /// orchestrator thread.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyStarted`] on a second call; a session
    /// is not re-enterable.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let runtime = self.runtime.take().ok_or(SessionError::AlreadyStarted)?;
        self.shared.set_state(SessionState::AwaitingPeer);
        let shared = Arc::clone(&self.shared);
        let handle = thread::spawn(move || run_session(shared, runtime));
        *self.orchestrator.lock().expect("orchestrator lock poisoned") = Some(handle);
        Ok(())
    }

    /// Requests shutdown and blocks until every loop has exited and every
    /// owned handle has been released.
    pub fn stop(&self) {
        self.shared.begin_close();
        let handle = self
            .orchestrator
            .lock()
            .expect("orchestrator lock poisoned")
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    /// Returns the current state and connected peer, if any.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.shared.state(),
            peer: self.shared.peer(),
        }
    }
}

impl Drop for ForwardingSession {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

fn run_session(shared: Arc<Shared>, runtime: SessionRuntime) {
    let SessionRuntime {
        listener,
        mut keyboard,
        mut pointer,
        options,
    } = runtime;

    if let Err(e) = listener.set_nonblocking(true) {
        error!("cannot poll listener: {e}");
        finish(&shared, keyboard, pointer, None);
        return;
    }

    // ── Await the single peer ─────────────────────────────────────────────────
    let channel = loop {
        if shared.stopping() {
            finish(&shared, keyboard, pointer, None);
            return;
        }
        match FramedChannel::try_accept(&listener) {
            Ok(Some(channel)) => break Arc::new(channel),
            Ok(None) => thread::sleep(ACCEPT_POLL),
            Err(e) => {
                error!("accept failed: {e}");
                shared.begin_close();
                finish(&shared, keyboard, pointer, None);
                return;
            }
        }
    };

    info!(peer = %channel.peer_addr(), "peer connected");
    shared.set_peer(Some(channel.peer_addr()));

    // Stream preamble: the one message the peer may rely on before any
    // capture traffic.
    let preamble = WireMessage::Connected {
        message: options.identity.clone(),
    };
    if channel.send(&preamble).is_err() {
        warn!("peer vanished before preamble");
        shared.begin_close();
        finish(&shared, keyboard, pointer, Some(&channel));
        return;
    }

    shared.set_state(SessionState::Active);

    // ── Spawn the three loops ─────────────────────────────────────────────────
    let mut workers: Vec<JoinHandle<()>> = Vec::new();
    if let Some(source) = keyboard.take() {
        workers.push(spawn_capture("keyboard", source, Arc::clone(&channel), Arc::clone(&shared)));
    }
    if let Some(source) = pointer.take() {
        workers.push(spawn_capture("pointer", source, Arc::clone(&channel), Arc::clone(&shared)));
    }
    workers.push(spawn_monitor(
        Arc::clone(&channel),
        Arc::clone(&shared),
        options.ping_interval,
    ));

    // ── Supervise ─────────────────────────────────────────────────────────────
    // One peer at a time: further connection attempts are accepted and
    // immediately dropped, never queued behind the active one.
    while !shared.stopping() {
        match FramedChannel::try_accept(&listener) {
            Ok(Some(extra)) => {
                warn!(peer = %extra.peer_addr(), "rejecting connection while a peer is active");
                extra.close();
            }
            Ok(None) => {}
            Err(e) => debug!("accept error while active: {e}"),
        }
        thread::sleep(ACCEPT_POLL);
    }

    for worker in workers {
        let _ = worker.join();
    }
    // Both sources were handed to their loops above; `finish` only has the
    // channel left to close.
    finish(&shared, keyboard, pointer, Some(&channel));
}

/// Final teardown: release any sources still owned here, close the channel,
/// and mark the session `Closed`.
fn finish(
    shared: &Shared,
    keyboard: Option<Box<dyn EventSource>>,
    pointer: Option<Box<dyn EventSource>>,
    channel: Option<&FramedChannel>,
) {
    for mut source in [keyboard, pointer].into_iter().flatten() {
        source.release();
    }
    if let Some(channel) = channel {
        channel.close();
    }
    shared.set_peer(None);
    shared.set_state(SessionState::Closed);
    info!("session closed, local devices released");
}

// ── Capture loops ─────────────────────────────────────────────────────────────

fn spawn_capture(
    label: &'static str,
    mut source: Box<dyn EventSource>,
    channel: Arc<FramedChannel>,
    shared: Arc<Shared>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!(source = %source.description(), "{label} capture loop started");
        let mut translator = EventTranslator::new();
        while !shared.stopping() {
            match source.poll_event(CAPTURE_POLL) {
                Ok(Some(raw)) => {
                    if let Some(msg) = translator.feed(&raw) {
                        if channel.send(&msg).is_err() {
                            debug!("{label} send failed, closing session");
                            shared.begin_close();
                            break;
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("{label} device failed: {e}");
                    shared.begin_close();
                    break;
                }
            }
        }
        // Release before the thread ends so a wedged sibling loop cannot
        // delay restoring this device to the local desktop.
        source.release();
        debug!("{label} capture loop exited");
    })
}

// ── Monitor loop ──────────────────────────────────────────────────────────────

fn spawn_monitor(channel: Arc<FramedChannel>, shared: Arc<Shared>, interval: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        while !shared.stopping() {
            if !sleep_observing_stop(&shared, interval) {
                break;
            }
            let time = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or_default();
            if channel.send(&WireMessage::Ping { time }).is_err() {
                info!("peer lost (ping send failed)");
                shared.begin_close();
                break;
            }
            // The transport gives no push notification of peer loss; this
            // probe is the sole detector of a silently vanished peer.
            channel.drain_inbound();
            if channel.probe() == Liveness::Dead {
                info!("peer lost (liveness probe)");
                shared.begin_close();
                break;
            }
        }
        debug!("monitor loop exited");
    })
}

/// Sleeps for `total`, waking early if the stop flag is raised. Returns
/// `false` when the sleep was interrupted by shutdown.
fn sleep_observing_stop(shared: &Shared, total: Duration) -> bool {
    let deadline = Instant::now() + total;
    loop {
        if shared.stopping() {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(STOP_POLL.min(deadline - now));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::device::mock::MockEventSource;

    fn test_listener() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").expect("bind")
    }

    #[test]
    fn test_new_without_any_source_is_rejected() {
        let result = ForwardingSession::new(test_listener(), None, None, SessionOptions::default());
        assert!(matches!(result, Err(SessionError::NoInputSources)));
    }

    #[test]
    fn test_new_session_is_idle_with_no_peer() {
        let (kb, _control) = MockEventSource::new("kb");
        let session = ForwardingSession::new(
            test_listener(),
            Some(Box::new(kb)),
            None,
            SessionOptions::default(),
        )
        .unwrap();
        let status = session.status();
        assert_eq!(status.state, SessionState::Idle);
        assert!(status.peer.is_none());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let (kb, _control) = MockEventSource::new("kb");
        let mut session = ForwardingSession::new(
            test_listener(),
            Some(Box::new(kb)),
            None,
            SessionOptions::default(),
        )
        .unwrap();
        session.start().unwrap();
        assert!(matches!(session.start(), Err(SessionError::AlreadyStarted)));
        session.stop();
    }

    #[test]
    fn test_stop_while_awaiting_peer_releases_sources_and_closes() {
        // Arrange
        let (kb, kb_control) = MockEventSource::new("kb");
        let (ptr, ptr_control) = MockEventSource::new("ptr");
        let mut session = ForwardingSession::new(
            test_listener(),
            Some(Box::new(kb)),
            Some(Box::new(ptr)),
            SessionOptions::default(),
        )
        .unwrap();
        session.start().unwrap();
        assert_eq!(session.status().state, SessionState::AwaitingPeer);

        // Act
        session.stop();

        // Assert
        assert_eq!(session.status().state, SessionState::Closed);
        assert!(kb_control.is_released());
        assert!(ptr_control.is_released());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (kb, _control) = MockEventSource::new("kb");
        let mut session = ForwardingSession::new(
            test_listener(),
            Some(Box::new(kb)),
            None,
            SessionOptions::default(),
        )
        .unwrap();
        session.start().unwrap();
        session.stop();
        session.stop();
        assert_eq!(session.status().state, SessionState::Closed);
    }
}
