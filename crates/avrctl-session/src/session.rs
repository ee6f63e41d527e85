use std::sync::Arc;
use std::time::Duration;

use avrctl_codec::{Setting, Tag, Value};
use avrctl_frame::{FrameError, SEPARATOR};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::debug;

use crate::config::SessionConfig;
use crate::driver::{Command, Driver};
use crate::error::{Result, SessionError};
use crate::event::{Event, Events};

/// Handle to a running control session.
///
/// Cloning is cheap; every clone talks to the same driver task. The session
/// ends when [`close`](Session::close) is called, when the appliance hangs
/// up, or when the last handle is dropped.
#[derive(Debug, Clone)]
pub struct Session {
    commands: mpsc::UnboundedSender<Command>,
    /// Template for new subscriptions. The driver holds the only sender, so
    /// every subscription ends when the driver stops.
    events: Arc<broadcast::Receiver<Event>>,
    config: SessionConfig,
}

impl Session {
    /// Start a session over an already-connected stream.
    ///
    /// Must be called from within a tokio runtime. The returned [`Events`]
    /// receives [`Event::Connected`] first.
    pub fn with_stream<S>(stream: S, config: SessionConfig) -> (Session, Events)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, event_rx) = broadcast::channel(config.event_capacity.max(1));

        let _ = events.send(Event::Connected);

        let template = event_rx.resubscribe();
        let driver = Driver::new(stream, command_rx, events, config.read_buffer_size);
        tokio::spawn(driver.run());

        let session = Session {
            commands,
            events: Arc::new(template),
            config,
        };
        (session, Events::new(event_rx))
    }

    /// Subscribe to notifications raised from now on.
    pub fn subscribe(&self) -> Events {
        Events::new(self.events.resubscribe())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the driver task has stopped.
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Issue a query for `tag` now and return a handle to its response.
    ///
    /// The timeout clock starts here, not when the line reaches the wire.
    pub fn query(&self, tag: Tag) -> Result<PendingQuery> {
        let timeout = self.config.effective_timeout();
        let deadline = timeout.map(|timeout| (Instant::now() + timeout, timeout));
        let (reply, response) = oneshot::channel();
        self.dispatch(Command::Query { tag, reply })?;
        debug!(%tag, "query issued");
        Ok(PendingQuery {
            tag,
            response,
            deadline,
        })
    }

    /// Encode `setting` for `tag` and queue the resulting command line.
    ///
    /// Encoding errors are returned before anything is queued.
    pub fn command(&self, tag: Tag, setting: impl Into<Setting>) -> Result<PendingWrite> {
        let body = avrctl_codec::encode(tag, &setting.into())?;
        self.send_line(tag.command(&body))
    }

    /// Queue an arbitrary line for writing.
    pub fn send_line(&self, line: impl Into<String>) -> Result<PendingWrite> {
        let line = line.into();
        if line.as_bytes().contains(&SEPARATOR) {
            return Err(FrameError::EmbeddedSeparator(line).into());
        }
        let (reply, written) = oneshot::channel();
        self.dispatch(Command::Send { line, reply })?;
        Ok(PendingWrite { written })
    }

    /// Query `tag` and wait for the correlated response.
    pub async fn get(&self, tag: Tag) -> Result<Value> {
        self.query(tag)?.wait().await
    }

    /// Encode and send `setting` for `tag`, resolving once the line is
    /// written. No response is awaited.
    pub async fn set(&self, tag: Tag, setting: impl Into<Setting>) -> Result<()> {
        self.command(tag, setting)?.wait().await
    }

    /// Send `TAG<body>` without encoding.
    pub async fn set_raw(&self, tag: Tag, body: &str) -> Result<()> {
        self.send_line(tag.command(body))?.wait().await
    }

    /// Send one line verbatim.
    pub async fn send_raw(&self, line: &str) -> Result<()> {
        self.send_line(line)?.wait().await
    }

    /// Let queued writes finish, then shut the connection down. Queries still
    /// waiting for a response fail with [`SessionError::Closed`], and
    /// subscribers receive [`Event::Closed`] before their streams end.
    pub async fn close(&self) {
        let (reply, done) = oneshot::channel();
        if self.dispatch(Command::Close { reply }).is_ok() {
            let _ = done.await;
        }
    }

    fn dispatch(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed)
    }
}

/// A query that has been issued but not yet answered.
#[derive(Debug)]
pub struct PendingQuery {
    tag: Tag,
    response: oneshot::Receiver<Result<Value>>,
    deadline: Option<(Instant, Duration)>,
}

impl PendingQuery {
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Wait for the response. Dropping the handle instead abandons the query;
    /// a response that arrives afterwards is reported as unsolicited.
    pub async fn wait(self) -> Result<Value> {
        let outcome = match self.deadline {
            Some((deadline, timeout)) => time::timeout_at(deadline, self.response)
                .await
                .map_err(|_| SessionError::Timeout(timeout))?,
            None => self.response.await,
        };
        outcome.map_err(|_| SessionError::Closed)?
    }
}

/// A queued write.
#[derive(Debug)]
pub struct PendingWrite {
    written: oneshot::Receiver<Result<()>>,
}

impl PendingWrite {
    /// Wait until the line has been written, or its write failed.
    pub async fn wait(self) -> Result<()> {
        self.written.await.map_err(|_| SessionError::Closed)?
    }
}
