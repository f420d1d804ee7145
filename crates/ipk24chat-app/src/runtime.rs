//! Async event loop
//!
//! Multiplexes local input, the server stream and the interrupt bridge with
//! `tokio::select!`, feeds each wakeup into the [`Session`] and executes the
//! returned actions. On every wakeup each ready source gives up exactly one
//! unit of work, in priority order: one interrupt token, one input line, one
//! network read (dispatched line by line). A source that stays ready, such as
//! pasted input, cannot starve the others.
//!
//! The loop owns the stream for its whole life and shuts it down once on exit.

use std::{future, io, process::ExitCode};

use bytes::BytesMut;
use ipk24chat_client::{Message, Session, SessionAction, SessionEvent, SessionState, command};
use ipk24chat_proto::{LineBuffer, encode};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Split,
};

use crate::{Console, InterruptBridge, RuntimeError};

/// Initial capacity of the network read buffer.
const READ_BUFFER_SIZE: usize = 4096;

/// How the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Local `BYE`, end of input, interrupt, server `BYE` or protocol
    /// violation by the server.
    Clean,
    /// Transport failure, with its diagnostic.
    Failed(String),
}

impl Outcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Failed(_) => ExitCode::FAILURE,
        }
    }
}

/// Readiness sources, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Interrupt,
    Input,
    Network,
}

const SOURCES: [Source; 3] = [Source::Interrupt, Source::Input, Source::Network];

/// One unit of work taken from a ready source.
enum Wakeup {
    Interrupt,
    Input(io::Result<Option<Vec<u8>>>),
    Network(io::Result<usize>),
}

impl Wakeup {
    fn source(&self) -> Source {
        match self {
            Self::Interrupt => Source::Interrupt,
            Self::Input(_) => Source::Input,
            Self::Network(_) => Source::Network,
        }
    }
}

/// Event loop over one connected stream.
///
/// # Type Parameters
///
/// - `I`: local input, read line by line and decoded lossily
/// - `S`: connected byte stream to the server
/// - `O`, `E`: console writers for stdout and stderr
pub struct EventLoop<I, S, O, E> {
    session: Session,
    input: Split<I>,
    stream: S,
    interrupts: InterruptBridge,
    console: Console<O, E>,
    lines: LineBuffer,
    read_buf: BytesMut,
}

impl<I, S, O, E> EventLoop<I, S, O, E>
where
    I: AsyncBufRead + Unpin,
    S: AsyncRead + AsyncWrite + Unpin,
    O: io::Write,
    E: io::Write,
{
    /// Create a loop with a fresh session in `Start`.
    pub fn new(input: I, stream: S, interrupts: InterruptBridge, console: Console<O, E>) -> Self {
        Self {
            session: Session::new(),
            input: input.split(b'\n'),
            stream,
            interrupts,
            console,
            lines: LineBuffer::new(),
            read_buf: BytesMut::with_capacity(READ_BUFFER_SIZE),
        }
    }

    /// Run until the session reaches a terminal state.
    ///
    /// Transport failures end the loop with [`Outcome::Failed`]; only console
    /// failures and unencodable frames are returned as errors.
    pub async fn run(mut self) -> Result<Outcome, RuntimeError> {
        while !self.session.is_finished() {
            self.poll_once().await?;
        }

        if let Err(err) = self.stream.shutdown().await {
            tracing::debug!(%err, "stream shutdown failed");
        }

        let outcome = match self.session.last_error() {
            Some(reason) => Outcome::Failed(reason.to_string()),
            None => Outcome::Clean,
        };
        tracing::debug!(state = ?self.session.state(), ?outcome, "event loop finished");
        Ok(outcome)
    }

    /// Wait until at least one source is ready, then take one unit of work
    /// from every source that is ready.
    async fn poll_once(&mut self) -> Result<(), RuntimeError> {
        let first = tokio::select! {
            biased;

            () = self.interrupts.recv() => Wakeup::Interrupt,

            line = self.input.next_segment() => Wakeup::Input(line),

            read = self.stream.read_buf(&mut self.read_buf) => Wakeup::Network(read),
        };

        let woken = first.source();
        self.process(first).await?;

        for source in SOURCES {
            if source == woken || self.session.is_finished() {
                continue;
            }
            if let Some(wakeup) = self.poll_ready(source).await {
                self.process(wakeup).await?;
            }
        }
        Ok(())
    }

    /// Take one unit of work from `source` if it is ready right now.
    async fn poll_ready(&mut self, source: Source) -> Option<Wakeup> {
        match source {
            Source::Interrupt => tokio::select! {
                biased;
                () = self.interrupts.recv() => Some(Wakeup::Interrupt),
                () = future::ready(()) => None,
            },
            Source::Input => tokio::select! {
                biased;
                line = self.input.next_segment() => Some(Wakeup::Input(line)),
                () = future::ready(()) => None,
            },
            Source::Network => tokio::select! {
                biased;
                read = self.stream.read_buf(&mut self.read_buf) => Some(Wakeup::Network(read)),
                () = future::ready(()) => None,
            },
        }
    }

    async fn process(&mut self, wakeup: Wakeup) -> Result<(), RuntimeError> {
        match wakeup {
            Wakeup::Interrupt => self.dispatch(SessionEvent::Interrupt).await,

            Wakeup::Input(Ok(Some(line))) => {
                let line = String::from_utf8_lossy(&line);
                self.dispatch(SessionEvent::Command(command::parse(&line))).await
            },
            Wakeup::Input(Ok(None)) => self.dispatch(SessionEvent::InputClosed).await,
            Wakeup::Input(Err(err)) => {
                tracing::warn!(%err, "failed to read local input");
                self.dispatch(SessionEvent::InputClosed).await
            },

            Wakeup::Network(Ok(0)) => {
                if self.lines.pending() > 0 {
                    tracing::debug!(bytes = self.lines.pending(), "discarding partial line");
                    self.lines.clear();
                }
                self.dispatch(SessionEvent::PeerClosed).await
            },
            Wakeup::Network(Ok(n)) => {
                tracing::debug!(bytes = n, "received");
                self.lines.extend(&self.read_buf);
                self.read_buf.clear();
                self.dispatch_lines().await
            },
            Wakeup::Network(Err(err)) => {
                self.dispatch(SessionEvent::ReceiveFailed { reason: err.to_string() }).await
            },
        }
    }

    /// Hand every complete buffered line to the session, in order, until it
    /// reaches a terminal state.
    async fn dispatch_lines(&mut self) -> Result<(), RuntimeError> {
        while !self.session.is_finished() {
            let Some(line) = self.lines.next_line() else {
                break;
            };
            let message = match line {
                Ok(line) => Message::parse(&line),
                Err(err) => {
                    tracing::warn!(%err, "over-long line from server");
                    Message::Unknown { words: Vec::new() }
                },
            };
            tracing::debug!(kind = %message.kind(), "frame received");
            self.dispatch(SessionEvent::FrameReceived(message)).await?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, event: SessionEvent) -> Result<(), RuntimeError> {
        let actions = self.session.handle(event);
        self.execute(actions).await
    }

    /// Execute actions in order. A failed send is reported back to the
    /// session; if that fails the session, remaining sends are skipped but
    /// prints still happen.
    async fn execute(&mut self, actions: Vec<SessionAction>) -> Result<(), RuntimeError> {
        let mut sends_stopped = false;
        for action in actions {
            match action {
                SessionAction::Print(output) => {
                    self.console.print(&output).map_err(RuntimeError::Console)?;
                },
                SessionAction::Send(message) if sends_stopped => {
                    tracing::debug!(kind = %message.kind(), "skipping send after failure");
                },
                SessionAction::Send(message) => {
                    let mut frame = BytesMut::new();
                    encode(&message, &mut frame)?;
                    tracing::debug!(kind = %message.kind(), "sending frame");

                    if let Err(err) = write_frame(&mut self.stream, &frame).await {
                        self.report_send_failure(&err)?;
                        sends_stopped = self.session.state() == SessionState::Failed;
                    }
                },
            }
        }
        Ok(())
    }

    fn report_send_failure(&mut self, err: &io::Error) -> Result<(), RuntimeError> {
        let follow_up = self.session.handle(SessionEvent::SendFailed { reason: err.to_string() });
        for action in follow_up {
            match action {
                SessionAction::Print(output) => {
                    self.console.print(&output).map_err(RuntimeError::Console)?;
                },
                SessionAction::Send(message) => {
                    tracing::debug!(kind = %message.kind(), "dropping send after send failure");
                },
            }
        }
        Ok(())
    }
}

async fn write_frame<S: AsyncWrite + Unpin>(stream: &mut S, frame: &[u8]) -> io::Result<()> {
    stream.write_all(frame).await?;
    stream.flush().await
}
