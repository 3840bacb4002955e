//! FramedChannel: one active peer connection carrying framed messages.
//!
//! The channel owns both halves of a connected TCP stream. Sends are
//! whole-message atomic: a single internal writer lock covers the complete
//! frame write, so messages from the keyboard loop, pointer loop, and monitor
//! never interleave at the byte level. Sends are best-effort: a failure
//! marks the channel dead and surfaces [`TransportError::PeerDisconnected`];
//! the channel itself never retries.

use std::io::Read;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use inputlink_core::{read_frame, write_frame, WireMessage};
use thiserror::Error;
use tracing::debug;

/// Result of a non-blocking liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

/// Error type for the channel layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding the listening socket failed.
    #[error("listen failed on {addr}: {source}")]
    Listen {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting or preparing an incoming connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The peer is gone. Every send/receive failure folds into this; a
    /// malformed or truncated frame is indistinguishable from a vanished
    /// peer as far as the session is concerned.
    #[error("peer disconnected")]
    PeerDisconnected,
}

/// One active peer connection with framed send/receive.
pub struct FramedChannel {
    /// Write half; the lock is the serialization point for whole frames.
    writer: Mutex<TcpStream>,
    /// Independent read half so probing/receiving never contends with sends.
    reader: Mutex<TcpStream>,
    peer: SocketAddr,
    dead: AtomicBool,
}

impl FramedChannel {
    /// Blocks on `listener` until a peer connects.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Accept`] if the accept or socket setup fails.
    pub fn accept(listener: &TcpListener) -> Result<Self, TransportError> {
        let (stream, peer) = listener.accept().map_err(TransportError::Accept)?;
        Self::from_stream(stream, peer)
    }

    /// Non-blocking accept for stop-aware loops. Requires the listener to be
    /// in non-blocking mode; returns `Ok(None)` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Accept`] for failures other than would-block.
    pub fn try_accept(listener: &TcpListener) -> Result<Option<Self>, TransportError> {
        match listener.accept() {
            Ok((stream, peer)) => Self::from_stream(stream, peer).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(TransportError::Accept(e)),
        }
    }

    fn from_stream(stream: TcpStream, peer: SocketAddr) -> Result<Self, TransportError> {
        // The accepted socket may inherit the listener's non-blocking flag.
        stream.set_nonblocking(false).map_err(TransportError::Accept)?;
        // Input events are tiny and latency-sensitive.
        stream.set_nodelay(true).map_err(TransportError::Accept)?;
        let reader = stream.try_clone().map_err(TransportError::Accept)?;
        Ok(Self {
            writer: Mutex::new(stream),
            reader: Mutex::new(reader),
            peer,
            dead: AtomicBool::new(false),
        })
    }

    /// Returns the connected peer's address.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Returns `true` once the channel has been marked dead.
    pub fn is_dead(&self) -> bool {
        self.dead.load(Ordering::Relaxed)
    }

    /// Sends one message as a whole frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::PeerDisconnected`] if the channel is already
    /// dead or the write fails; the failure also marks the channel dead.
    pub fn send(&self, msg: &WireMessage) -> Result<(), TransportError> {
        if self.is_dead() {
            return Err(TransportError::PeerDisconnected);
        }
        let mut writer = self.writer.lock().expect("writer lock poisoned");
        if let Err(e) = write_frame(&mut *writer, msg) {
            debug!("send failed, marking channel dead: {e}");
            self.dead.store(true, Ordering::Relaxed);
            return Err(TransportError::PeerDisconnected);
        }
        Ok(())
    }

    /// Receives one whole frame, blocking until it is complete.
    ///
    /// Used by the peer role and by tests; the forwarding pipeline itself is
    /// send-only.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::PeerDisconnected`] for EOF, short reads, and
    /// malformed frames alike. There is no partial recovery.
    pub fn recv(&self) -> Result<WireMessage, TransportError> {
        if self.is_dead() {
            return Err(TransportError::PeerDisconnected);
        }
        let mut reader = self.reader.lock().expect("reader lock poisoned");
        match read_frame(&mut *reader) {
            Ok(msg) => Ok(msg),
            Err(e) => {
                debug!("recv failed, marking channel dead: {e}");
                self.dead.store(true, Ordering::Relaxed);
                Err(TransportError::PeerDisconnected)
            }
        }
    }

    /// Non-blocking liveness probe.
    ///
    /// Peeks one byte without consuming it: a clean EOF means the peer closed
    /// its side; pending data or an empty socket means the connection is
    /// still up.
    pub fn probe(&self) -> Liveness {
        if self.is_dead() {
            return Liveness::Dead;
        }
        let reader = self.reader.lock().expect("reader lock poisoned");
        let mut byte = [0u8; 1];
        let result = match reader.set_nonblocking(true) {
            Ok(()) => {
                let peeked = reader.peek(&mut byte);
                let _ = reader.set_nonblocking(false);
                peeked
            }
            Err(e) => Err(e),
        };
        match result {
            Ok(0) => {
                self.dead.store(true, Ordering::Relaxed);
                Liveness::Dead
            }
            Ok(_) => Liveness::Alive,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Liveness::Alive,
            Err(e) => {
                debug!("probe failed, marking channel dead: {e}");
                self.dead.store(true, Ordering::Relaxed);
                Liveness::Dead
            }
        }
    }

    /// Marks the channel dead and shuts the socket down. Idempotent.
    pub fn close(&self) {
        self.dead.store(true, Ordering::Relaxed);
        if let Ok(writer) = self.writer.lock() {
            let _ = writer.shutdown(Shutdown::Both);
        }
    }

    /// Drains and discards any bytes the peer has sent. The forwarding
    /// protocol is one-directional, so inbound bytes are only ever probe
    /// fodder; draining keeps the probe's peek window clean.
    pub fn drain_inbound(&self) {
        let reader = self.reader.lock().expect("reader lock poisoned");
        if reader.set_nonblocking(true).is_err() {
            return;
        }
        let mut sink = [0u8; 512];
        loop {
            match (&*reader).read(&mut sink) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
        }
        let _ = reader.set_nonblocking(false);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use inputlink_core::{Axis, PointerButton};
    use std::io::Write;
    use std::time::Duration;

    fn listener_pair() -> (TcpListener, TcpStream, FramedChannel) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let peer = TcpStream::connect(addr).expect("connect");
        peer.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let channel = FramedChannel::accept(&listener).expect("accept");
        (listener, peer, channel)
    }

    #[test]
    fn test_send_delivers_decodable_frame_to_peer() {
        // Arrange
        let (_listener, mut peer, channel) = listener_pair();
        let msg = WireMessage::Keyboard {
            code: 0x04,
            pressed: true,
            key_name: "KeyA".to_string(),
        };

        // Act
        channel.send(&msg).expect("send");

        // Assert
        let received = read_frame(&mut peer).expect("read frame");
        assert_eq!(received, msg);
    }

    #[test]
    fn test_sends_arrive_in_call_order() {
        let (_listener, mut peer, channel) = listener_pair();
        let first = WireMessage::MouseMove { axis: Axis::X, value: 5 };
        let second = WireMessage::MouseMove { axis: Axis::X, value: -3 };

        channel.send(&first).unwrap();
        channel.send(&second).unwrap();

        assert_eq!(read_frame(&mut peer).unwrap(), first);
        assert_eq!(read_frame(&mut peer).unwrap(), second);
    }

    #[test]
    fn test_recv_returns_peer_message() {
        let (_listener, mut peer, channel) = listener_pair();
        let msg = WireMessage::MouseButton { button: PointerButton::Left, pressed: true };
        let frame = inputlink_core::encode_frame(&msg).unwrap();
        peer.write_all(&frame).unwrap();

        assert_eq!(channel.recv().unwrap(), msg);
    }

    #[test]
    fn test_truncated_frame_surfaces_as_peer_disconnected() {
        // Arrange: length prefix declares 10 bytes, peer sends 4 then closes.
        let (_listener, mut peer, channel) = listener_pair();
        peer.write_all(&10u32.to_le_bytes()).unwrap();
        peer.write_all(b"{\"ty").unwrap();
        drop(peer);

        // Act
        let result = channel.recv();

        // Assert – disconnection, not a decode error
        assert!(matches!(result, Err(TransportError::PeerDisconnected)));
        assert!(channel.is_dead());
    }

    #[test]
    fn test_probe_reports_alive_on_idle_connection() {
        let (_listener, _peer, channel) = listener_pair();
        assert_eq!(channel.probe(), Liveness::Alive);
    }

    #[test]
    fn test_probe_reports_dead_after_peer_closes() {
        let (_listener, peer, channel) = listener_pair();
        drop(peer);
        // Give the loopback a moment to deliver the FIN.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(channel.probe(), Liveness::Dead);
        assert!(channel.is_dead());
    }

    #[test]
    fn test_send_after_death_fails_without_touching_socket() {
        let (_listener, peer, channel) = listener_pair();
        drop(peer);
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(channel.probe(), Liveness::Dead);

        let result = channel.send(&WireMessage::Ping { time: 0.0 });
        assert!(matches!(result, Err(TransportError::PeerDisconnected)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_listener, _peer, channel) = listener_pair();
        channel.close();
        channel.close();
        assert!(channel.is_dead());
    }

    #[test]
    fn test_try_accept_returns_none_when_nothing_pending() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let result = FramedChannel::try_accept(&listener).unwrap();
        assert!(result.is_none());
    }
}
