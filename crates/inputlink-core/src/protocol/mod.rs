//! The inputlink wire protocol: typed messages and the frame codec.
//!
//! One frame on the wire is one [`messages::WireMessage`], the atomic unit of
//! send and receive. See [`codec`] for the byte-level layout.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_frame, read_frame, write_frame, ProtocolError};
pub use messages::{Axis, PointerButton, WireMessage};
