//! Control networked A/V receivers over their line-based telnet protocol.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP connection to the appliance
//! - [`frame`]: Carriage-return line framing
//! - [`codec`]: Command tags and per-tag value encoding
//! - [`session`]: Pipelined commands, response correlation and events
//!   (behind the `session` feature)

/// Re-export transport types.
pub mod transport {
    pub use avrctl_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use avrctl_frame::*;
}

/// Re-export codec types.
pub mod codec {
    pub use avrctl_codec::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use avrctl_session::*;
}
