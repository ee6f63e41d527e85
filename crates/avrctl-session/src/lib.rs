//! Control sessions for networked A/V receivers.
//!
//! A [`Session`] owns one connection to the appliance. Outbound lines go
//! through a single-in-flight pipeline so wire order always matches call
//! order; inbound lines are framed, decoded, and matched against pending
//! queries per tag, oldest first. Anything nobody asked for is published as
//! an [`Event`].
//!
//! ```no_run
//! # async fn demo() -> avrctl_session::Result<()> {
//! let (session, mut events) = avrctl_session::connect("192.168.1.20", 23).await?;
//! session.set_power(true).await?;
//! let volume = session.volume().await?;
//! println!("volume: {volume} dB");
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod correlator;
mod driver;
pub mod error;
pub mod event;
pub mod facade;
pub mod pipeline;
pub mod session;

pub use config::{SessionConfig, DEFAULT_REQUEST_TIMEOUT};
pub use connector::{connect, connect_with_config};
pub use correlator::{Correlator, RequestId};
pub use error::{Result, SessionError};
pub use event::{Event, Events};
pub use facade::{StateChange, StateChanges};
pub use pipeline::{Finished, Pipeline};
pub use session::{PendingQuery, PendingWrite, Session};
