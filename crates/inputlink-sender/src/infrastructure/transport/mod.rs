//! Network transport infrastructure: the framed peer channel and the
//! one-shot bring-up step that precedes listening.

pub mod bringup;
pub mod channel;

pub use bringup::{BringupError, CommandBringup, NoopBringup, TransportBringup};
pub use channel::{FramedChannel, Liveness, TransportError};
