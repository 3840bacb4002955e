//! # inputlink-core
//!
//! Shared library for inputlink containing the wire protocol, the HID report
//! state, and the scan-code translation tables.
//!
//! This crate is used by the capturing sender and by anything that wants to
//! speak the protocol (test harnesses, a future receiver). It has zero
//! dependencies on OS APIs or network sockets.
//!
//! The three top-level modules:
//!
//! - **`protocol`** – how bytes travel over the link. Messages are JSON
//!   payloads behind a 4-byte little-endian length prefix; one frame is the
//!   atomic unit of send and receive.
//!
//! - **`domain`** – pure state with no OS dependencies: the HID-style
//!   keyboard report (modifier mask + six key slots) and pointer button mask.
//!
//! - **`keymap`** – fixed translation tables from raw evdev scan codes to the
//!   portable representation used on the wire: USB HID usage IDs for keys,
//!   report bits for modifiers, named identifiers for buttons and axes.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `inputlink_core::WireMessage` instead of the full module path.
pub use domain::report::{KeyboardState, ModifierFlags, PointerState, MAX_PRESSED_KEYS};
pub use keymap::{HidKey, ScanCodeTable};
pub use protocol::codec::{decode_frame, encode_frame, read_frame, write_frame, ProtocolError};
pub use protocol::messages::{Axis, PointerButton, WireMessage};
