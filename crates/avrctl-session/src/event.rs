use avrctl_codec::{CodecError, Tag, Value};
use tokio::sync::broadcast;
use tracing::warn;

/// Notifications raised by a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The session is attached to a connected transport.
    Connected,
    /// Every line received, before any parsing.
    RawLine(String),
    /// Every line with an extractable tag, undecoded.
    RawTagged { tag: Tag, body: String },
    /// A known tag decoded to a meaningful value.
    Changed { tag: Tag, value: Value },
    /// A value that answered no pending query. Unknown tags report their body
    /// as [`Value::Raw`].
    Unsolicited { tag: Tag, value: Value },
    /// A response that could not be decoded and answered no pending query.
    Error(CodecError),
    /// The appliance closed the connection or the read side failed.
    Disconnected,
    /// The session was closed locally. Always the last notification.
    Closed,
}

/// A subscription to session notifications.
///
/// Each subscriber has its own bounded backlog; a subscriber that falls
/// behind loses the oldest notifications rather than stalling the session.
#[derive(Debug)]
pub struct Events {
    inner: broadcast::Receiver<Event>,
}

impl Events {
    pub(crate) fn new(inner: broadcast::Receiver<Event>) -> Self {
        Self { inner }
    }

    /// Wait for the next notification. Returns `None` once the driver has
    /// stopped and every queued notification has been taken.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.inner.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagging; notifications dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next notification if one is already queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        loop {
            match self.inner.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "event subscriber lagging; notifications dropped");
                }
                Err(_) => return None,
            }
        }
    }
}
