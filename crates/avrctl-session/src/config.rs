use std::time::Duration;

/// Default upper bound on waiting for a query response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Session behavior configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long `get` waits for a correlated response, measured from the
    /// moment the query is issued. `None` or zero waits forever.
    pub request_timeout: Option<Duration>,
    /// Capacity of the notification channel per subscriber.
    pub event_capacity: usize,
    /// Initial capacity of the read buffer.
    pub read_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            event_capacity: 256,
            read_buffer_size: 4 * 1024,
        }
    }
}

impl SessionConfig {
    /// Override the query timeout. `None` or zero disables it.
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the per-subscriber notification capacity.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub(crate) fn effective_timeout(&self) -> Option<Duration> {
        self.request_timeout.filter(|timeout| !timeout.is_zero())
    }
}
