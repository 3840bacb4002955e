//! Frame codec for encoding and decoding inputlink wire messages.
//!
//! Wire format:
//! ```text
//! [payload_len:4 little-endian][payload: UTF-8 JSON, payload_len bytes]
//! ```
//! The length prefix counts payload bytes only. A frame is the atomic unit of
//! send and receive: the receiver must obtain exactly `payload_len` bytes
//! before decoding, and a short read is peer disconnection, never an empty or
//! partial message. There is no zero-length frame.

use std::io::{Read, Write};

use crate::protocol::messages::WireMessage;
use thiserror::Error;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Upper bound on the payload length of a single frame.
///
/// Every real message is well under 200 bytes; a declared length beyond this
/// can only come from a desynchronized or hostile stream and is rejected
/// before any allocation.
pub const MAX_PAYLOAD_LEN: u32 = 64 * 1024;

/// Errors that can occur while encoding or decoding frames.
///
/// On the receive path, every variant is terminal for the stream: partial
/// recovery from a bad frame is never attempted.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The stream ended before a complete frame was available.
    #[error("truncated frame: expected {expected} payload bytes, stream ended after {got}")]
    TruncatedFrame { expected: usize, got: usize },

    /// The length prefix declared a zero-length payload.
    #[error("zero-length frame")]
    EmptyFrame,

    /// The length prefix declared a payload larger than [`MAX_PAYLOAD_LEN`].
    #[error("oversized frame: declared payload of {0} bytes")]
    OversizedFrame(u32),

    /// The payload was not valid JSON for any known message shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// An I/O error occurred on the underlying stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`WireMessage`] into a byte vector including the length prefix.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if JSON serialization fails
/// (which cannot happen for any constructible message, but the codec does not
/// assume that).
pub fn encode_frame(msg: &WireMessage) -> Result<Vec<u8>, ProtocolError> {
    let payload = serde_json::to_vec(msg)?;
    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + payload.len());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Decodes one [`WireMessage`] from the beginning of `bytes`.
///
/// Returns the decoded message and the total number of bytes consumed
/// (prefix + payload), so the caller can advance its read cursor.
///
/// # Errors
///
/// Returns [`ProtocolError`] if the slice holds less than one whole frame or
/// the payload is malformed.
pub fn decode_frame(bytes: &[u8]) -> Result<(WireMessage, usize), ProtocolError> {
    if bytes.len() < LENGTH_PREFIX_SIZE {
        return Err(ProtocolError::TruncatedFrame {
            expected: LENGTH_PREFIX_SIZE,
            got: bytes.len(),
        });
    }

    let payload_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    check_payload_len(payload_len)?;
    let payload_len = payload_len as usize;

    let available = bytes.len() - LENGTH_PREFIX_SIZE;
    if available < payload_len {
        return Err(ProtocolError::TruncatedFrame {
            expected: payload_len,
            got: available,
        });
    }

    let payload = &bytes[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + payload_len];
    let msg = serde_json::from_slice(payload)?;
    Ok((msg, LENGTH_PREFIX_SIZE + payload_len))
}

/// Writes one framed message to `writer`.
///
/// The whole frame is produced with a single `write_all`, so a frame is never
/// interleaved with another writer's bytes as long as callers serialize their
/// access to the stream.
///
/// # Errors
///
/// Returns [`ProtocolError::Io`] if the write fails.
pub fn write_frame<W: Write>(writer: &mut W, msg: &WireMessage) -> Result<(), ProtocolError> {
    let frame = encode_frame(msg)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Reads exactly one framed message from `reader`, blocking as needed.
///
/// # Errors
///
/// Returns [`ProtocolError::TruncatedFrame`] if the stream ends mid-frame
/// (including immediately, i.e. a clean EOF before the prefix; the caller
/// decides whether that is an orderly close), and the other variants for
/// malformed frames.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<WireMessage, ProtocolError> {
    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    read_exact_or_truncated(reader, &mut prefix, LENGTH_PREFIX_SIZE)?;

    let payload_len = u32::from_le_bytes(prefix);
    check_payload_len(payload_len)?;

    let mut payload = vec![0u8; payload_len as usize];
    read_exact_or_truncated(reader, &mut payload, payload_len as usize)?;

    Ok(serde_json::from_slice(&payload)?)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_payload_len(payload_len: u32) -> Result<(), ProtocolError> {
    if payload_len == 0 {
        return Err(ProtocolError::EmptyFrame);
    }
    if payload_len > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::OversizedFrame(payload_len));
    }
    Ok(())
}

/// `read_exact` that reports early EOF as [`ProtocolError::TruncatedFrame`]
/// instead of a bare I/O error, preserving how many bytes were expected.
fn read_exact_or_truncated<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    expected: usize,
) -> Result<(), ProtocolError> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
            Err(ProtocolError::TruncatedFrame { expected, got: 0 })
        }
        Err(e) => Err(ProtocolError::Io(e)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
