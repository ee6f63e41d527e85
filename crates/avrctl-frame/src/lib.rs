//! Line framing for the A/V receiver control protocol.
//!
//! The appliance speaks ASCII lines terminated by a carriage return. This
//! layer turns an arbitrarily chunked byte stream into complete lines and
//! turns outbound lines into terminated wire bytes. It is the only layer
//! that touches raw bytes.

pub mod codec;
pub mod error;
pub mod framer;

pub use codec::{encode_line, LineCodec};
pub use error::{FrameError, Result};
pub use framer::{LineFramer, SEPARATOR};
