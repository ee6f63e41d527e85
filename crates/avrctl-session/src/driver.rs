//! The task that owns a session's transport and protocol state.

use std::future::Future;
use std::pin::Pin;

use avrctl_codec::{Tag, Value};
use avrctl_frame::{FrameError, LineCodec, LineFramer};
use bytes::BytesMut;
use futures_util::SinkExt;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::codec::FramedWrite;
use tracing::{debug, info, warn};

use crate::correlator::{Correlator, RequestId};
use crate::error::{Result, SessionError};
use crate::event::Event;
use crate::pipeline::Pipeline;

/// Requests from session handles to the driver.
pub(crate) enum Command {
    Send {
        line: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Query {
        tag: Tag,
        reply: oneshot::Sender<Result<Value>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

impl Command {
    fn reject(self, error: SessionError) {
        match self {
            Command::Send { reply, .. } => {
                let _ = reply.send(Err(error));
            }
            Command::Query { reply, .. } => {
                let _ = reply.send(Err(error));
            }
            Command::Close { reply } => {
                let _ = reply.send(());
            }
        }
    }
}

/// What to do once a queued line has been written.
enum Completion {
    Send(oneshot::Sender<Result<()>>),
    /// The query's pending entry lives in the correlator; only a failed
    /// write needs to reach it.
    Query {
        tag: Tag,
        id: RequestId,
    },
}

type Writer<S> = FramedWrite<WriteHalf<S>, LineCodec>;
type WriteResult = std::result::Result<(), FrameError>;
type WriteFuture<S> = Pin<Box<dyn Future<Output = (Writer<S>, WriteResult)> + Send>>;

pub(crate) struct Driver<S> {
    reader: ReadHalf<S>,
    /// Present whenever no write is in flight.
    writer: Option<Writer<S>>,
    in_flight: Option<WriteFuture<S>>,
    read_buf: BytesMut,
    read_buffer_size: usize,
    framer: LineFramer,
    correlator: Correlator,
    pipeline: Pipeline<Completion>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<Event>,
    closers: Vec<oneshot::Sender<()>>,
    closing: bool,
}

impl<S> Driver<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub(crate) fn new(
        stream: S,
        commands: mpsc::UnboundedReceiver<Command>,
        events: broadcast::Sender<Event>,
        read_buffer_size: usize,
    ) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Self {
            reader,
            writer: Some(FramedWrite::new(writer, LineCodec::new())),
            in_flight: None,
            read_buf: BytesMut::with_capacity(read_buffer_size),
            read_buffer_size: read_buffer_size.max(1),
            framer: LineFramer::new(),
            correlator: Correlator::new(),
            pipeline: Pipeline::new(),
            commands,
            events,
            closers: Vec::new(),
            closing: false,
        }
    }

    pub(crate) async fn run(mut self) {
        loop {
            if self.closing && self.pipeline.is_idle() {
                self.shutdown().await;
                return;
            }

            self.read_buf.reserve(self.read_buffer_size);

            tokio::select! {
                command = self.commands.recv(), if !self.closing => match command {
                    Some(command) => self.handle_command(command),
                    // Every handle is gone; finish what was queued.
                    None => self.closing = true,
                },
                read = self.reader.read_buf(&mut self.read_buf) => match read {
                    Ok(0) => {
                        self.disconnect("connection closed by appliance".to_string());
                        return;
                    }
                    Ok(_) => self.handle_input(),
                    Err(err) => {
                        self.disconnect(err.to_string());
                        return;
                    }
                },
                (writer, result) = next_write(&mut self.in_flight) => {
                    self.writer = Some(writer);
                    self.complete_write(result);
                }
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Send { line, reply } => self.submit(line, Completion::Send(reply)),
            Command::Query { tag, reply } => {
                // Registered before the query line is written.
                let id = self.correlator.register(tag, reply);
                self.submit(tag.query(), Completion::Query { tag, id });
            }
            Command::Close { reply } => {
                debug!(queued = self.pipeline.len(), "close requested");
                self.closers.push(reply);
                self.closing = true;
            }
        }
    }

    fn submit(&mut self, line: String, completion: Completion) {
        if let Some(line) = self.pipeline.enqueue(line, completion) {
            self.start_write(line);
        }
    }

    fn start_write(&mut self, line: String) {
        let Some(mut writer) = self.writer.take() else {
            warn!(line, "writer unavailable; failing write");
            self.complete_write(Err(FrameError::Io(std::io::Error::other(
                "writer unavailable",
            ))));
            return;
        };

        debug!(line, "tx");
        self.in_flight = Some(Box::pin(async move {
            let result = writer.send(line).await;
            if result.is_err() {
                // Leave nothing of the failed line behind for the next write.
                writer.write_buffer_mut().clear();
            }
            (writer, result)
        }));
    }

    fn complete_write(&mut self, result: WriteResult) {
        let finished = self.pipeline.complete();
        if let Some(completion) = finished.completion {
            let result = result.map_err(|err| {
                warn!(error = %err, "write failed");
                SessionError::Frame(err)
            });
            self.settle_write(completion, result);
        }
        if let Some(next) = finished.next {
            self.start_write(next);
        }
    }

    fn settle_write(&mut self, completion: Completion, result: Result<()>) {
        match (completion, result) {
            (Completion::Send(reply), result) => {
                let _ = reply.send(result);
            }
            (Completion::Query { .. }, Ok(())) => {}
            (Completion::Query { tag, id }, Err(err)) => self.correlator.reject(tag, id, err),
        }
    }

    fn handle_input(&mut self) {
        let chunk = self.read_buf.split();
        for line in self.framer.feed(&chunk) {
            debug!(line, "rx");
            for event in self.correlator.on_line(&line) {
                self.emit(event);
            }
        }
    }

    fn emit(&self, event: Event) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    async fn shutdown(mut self) {
        self.in_flight = None;
        if let Some(writer) = self.writer.take() {
            if let Err(err) = writer.into_inner().shutdown().await {
                debug!(error = %err, "error shutting down write half");
            }
        }
        self.correlator.drain(|| SessionError::Closed);
        self.reject_queued(|| SessionError::Closed);
        info!("session closed");
        self.emit(Event::Closed);
        for closer in self.closers.drain(..) {
            let _ = closer.send(());
        }
    }

    fn disconnect(&mut self, reason: String) {
        info!(reason, "appliance disconnected");
        self.in_flight = None;
        for completion in self.pipeline.drain() {
            self.settle_write(completion, Err(SessionError::Disconnected(reason.clone())));
        }
        self.correlator
            .drain(|| SessionError::Disconnected(reason.clone()));
        self.reject_queued(|| SessionError::Disconnected(reason.clone()));
        for closer in self.closers.drain(..) {
            let _ = closer.send(());
        }
        self.emit(Event::Disconnected);
    }

    /// Refuse commands still sitting in the channel once the driver stops.
    fn reject_queued(&mut self, error: impl Fn() -> SessionError) {
        self.commands.close();
        while let Ok(command) = self.commands.try_recv() {
            command.reject(error());
        }
    }
}

async fn next_write<S>(in_flight: &mut Option<WriteFuture<S>>) -> (Writer<S>, WriteResult) {
    match in_flight.as_mut() {
        Some(write) => {
            let output = write.await;
            *in_flight = None;
            output
        }
        None => std::future::pending().await,
    }
}
