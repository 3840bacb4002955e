//! Infrastructure services: device capture, network transport, and
//! configuration storage. Everything that touches the OS lives here, behind
//! seams the application layer can mock.

pub mod device;
pub mod storage;
pub mod transport;
