//! Session state machine.
//!
//! Owns the authentication identity and the protocol state. Every method takes
//! an event and returns actions for the caller to execute; nothing here blocks
//! or touches I/O.
//!
//! # State Machine
//!
//! ```text
//! ┌───────┐  /auth   ┌────────────────┐  REPLY OK   ┌──────┐
//! │ Start │─────────>│ Authenticating │────────────>│ Open │
//! └───────┘          └────────────────┘             └──────┘
//!     │               │  ^ REPLY NOK / /auth retry     │
//!     │               └──┘                             │
//!     │  BYE / EOF / interrupt / ERR / malformed frame │
//!     ↓                                                ↓
//! ┌─────────────┐                                 ┌─────────────┐
//! │ Terminating │<────────────────────────────────│ Terminating │
//! └─────────────┘                                 └─────────────┘
//!
//!   any non-terminal state ── I/O failure ──> Failed
//! ```

use std::fmt;

use ipk24chat_proto::Message;

use crate::{Command, CommandError, Output, SessionAction, SessionEvent};

/// Text shown locally and sent to the server when it sends a malformed frame.
pub const INVALID_PEER_MESSAGE: &str = "Invalid message from server!";

/// Diagnostic recorded when the server closes the connection.
pub const PEER_CLOSED_MESSAGE: &str = "Server closed the connection.";

/// Sender used for the error frame when no display name was chosen yet.
const FALLBACK_DISPLAY_NAME: &str = "anonymous";

/// Protocol state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connected, no `/auth` sent yet.
    Start,
    /// `AUTH` sent, waiting for a positive `REPLY`.
    Authenticating,
    /// Authenticated; chat and channel commands allowed.
    Open,
    /// `BYE` sent (or attempted); the session is winding down.
    Terminating,
    /// Transport failure. Nothing is sent after the failing dispatch.
    Failed,
}

impl SessionState {
    /// `true` for [`SessionState::Terminating`] and [`SessionState::Failed`].
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminating | Self::Failed)
    }
}

/// Credentials and display name chosen by `/auth`.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account name.
    pub username: String,
    /// Shared secret.
    pub secret: String,
    /// Name shown to other users. Changed by `/rename`.
    pub display_name: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Protocol state machine for one connection.
///
/// # Invariants
///
/// - `identity` is only replaced while in `Start` or `Authenticating`.
/// - `display_name` only changes while `Open`.
/// - `last_error` is `Some` exactly when `state == Failed`.
/// - Once `Terminating` or `Failed`, no event changes the state again.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    identity: Option<Identity>,
    last_error: Option<String>,
}

impl Session {
    /// Create a session in [`SessionState::Start`].
    pub fn new() -> Self {
        Self { state: SessionState::Start, identity: None, last_error: None }
    }

    /// Current protocol state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identity from the last accepted `/auth`. `None` before that.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Current display name. `None` before the first `/auth`.
    pub fn display_name(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.display_name.as_str())
    }

    /// Diagnostic of the failure that ended the session. `None` unless
    /// [`SessionState::Failed`].
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the event loop should stop after the current dispatch.
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Process an event and return the actions to execute, in order.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        if let SessionEvent::SendFailed { reason } = event {
            return self.handle_send_failed(reason);
        }

        if self.is_finished() {
            tracing::debug!(state = ?self.state, "session ended, ignoring event");
            return Vec::new();
        }

        match event {
            SessionEvent::Command(command) => self.handle_command(command),
            SessionEvent::FrameReceived(message) => self.handle_frame(message),
            SessionEvent::Interrupt => {
                tracing::debug!("interrupt received");
                self.terminate()
            },
            SessionEvent::InputClosed => {
                tracing::debug!("local input closed");
                self.terminate()
            },
            SessionEvent::PeerClosed => {
                // The stream may still accept a write, so BYE is attempted.
                let mut actions = self.fail(PEER_CLOSED_MESSAGE.to_string());
                actions.push(SessionAction::Send(Message::Bye));
                actions
            },
            SessionEvent::ReceiveFailed { reason } => self.fail(reason),
            SessionEvent::SendFailed { .. } => Vec::new(),
        }
    }

    fn handle_command(&mut self, command: Command) -> Vec<SessionAction> {
        match command {
            Command::Empty => Vec::new(),
            Command::Help => vec![SessionAction::Print(Output::Help)],
            Command::Bye => self.terminate(),
            Command::InvalidArgs(err) => reject(err),

            Command::Auth { username, secret, display_name } => match self.state {
                SessionState::Start | SessionState::Authenticating => {
                    let auth = Message::Auth {
                        username: username.clone(),
                        display_name: display_name.clone(),
                        secret: secret.clone(),
                    };
                    self.identity = Some(Identity { username, secret, display_name });
                    self.transition(SessionState::Authenticating);
                    vec![SessionAction::Send(auth)]
                },
                SessionState::Open | SessionState::Terminating | SessionState::Failed => {
                    reject(CommandError::AlreadyAuthenticated)
                },
            },

            Command::Join { channel } => match self.open_display_name() {
                Some(display_name) => {
                    vec![SessionAction::Send(Message::Join { channel, display_name })]
                },
                None => reject(CommandError::NotAuthenticated),
            },

            Command::Rename { display_name } => match (self.state, self.identity.as_mut()) {
                (SessionState::Open, Some(identity)) => {
                    tracing::debug!(from = %identity.display_name, to = %display_name, "rename");
                    identity.display_name = display_name;
                    Vec::new()
                },
                _ => reject(CommandError::NotAuthenticated),
            },

            Command::Message { content } => match self.open_display_name() {
                Some(display_name) => {
                    vec![SessionAction::Send(Message::Chat { display_name, content })]
                },
                None => reject(CommandError::NotAuthenticated),
            },
        }
    }

    fn handle_frame(&mut self, message: Message) -> Vec<SessionAction> {
        match (self.state, message) {
            (_, Message::Unknown { words }) => self.reject_peer(&words),

            (SessionState::Authenticating, Message::Reply { ok, content }) => {
                if ok {
                    self.transition(SessionState::Open);
                }
                vec![SessionAction::Print(Output::Reply { ok, content })]
            },

            (SessionState::Open, Message::Reply { ok, content }) => {
                vec![SessionAction::Print(Output::Reply { ok, content })]
            },

            (SessionState::Open, Message::Chat { display_name, content }) => {
                vec![SessionAction::Print(Output::Chat { sender: display_name, content })]
            },

            (
                SessionState::Authenticating | SessionState::Open,
                Message::Error { display_name, content },
            ) => {
                self.transition(SessionState::Terminating);
                vec![
                    SessionAction::Print(Output::PeerError { sender: display_name, content }),
                    SessionAction::Send(Message::Bye),
                ]
            },

            (_, Message::Bye) => {
                tracing::debug!("server ended the session");
                self.transition(SessionState::Terminating);
                Vec::new()
            },

            (state, message) => {
                tracing::warn!(?state, kind = %message.kind(), "ignoring unexpected frame");
                Vec::new()
            },
        }
    }

    fn handle_send_failed(&mut self, reason: String) -> Vec<SessionAction> {
        match self.state {
            SessionState::Terminating => {
                tracing::warn!(%reason, "best-effort send failed");
                Vec::new()
            },
            SessionState::Failed => {
                tracing::debug!(%reason, "send failed after session failure");
                Vec::new()
            },
            SessionState::Start | SessionState::Authenticating | SessionState::Open => {
                self.fail(reason)
            },
        }
    }

    /// Malformed frame from the server: report it locally, tell the server,
    /// then say goodbye. Both sends are best-effort.
    fn reject_peer(&mut self, words: &[String]) -> Vec<SessionAction> {
        tracing::warn!(line = %words.join(" "), "malformed frame from server");
        self.transition(SessionState::Terminating);

        let display_name = self.display_name().unwrap_or(FALLBACK_DISPLAY_NAME).to_string();
        vec![
            SessionAction::Print(Output::LocalError(INVALID_PEER_MESSAGE.to_string())),
            SessionAction::Send(Message::Error {
                display_name,
                content: INVALID_PEER_MESSAGE.to_string(),
            }),
            SessionAction::Send(Message::Bye),
        ]
    }

    fn terminate(&mut self) -> Vec<SessionAction> {
        self.transition(SessionState::Terminating);
        vec![SessionAction::Send(Message::Bye)]
    }

    fn fail(&mut self, reason: String) -> Vec<SessionAction> {
        self.transition(SessionState::Failed);
        self.last_error = Some(reason.clone());
        vec![SessionAction::Print(Output::LocalError(reason))]
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            tracing::debug!(from = ?self.state, ?to, "session state transition");
            self.state = to;
        }
    }

    fn open_display_name(&self) -> Option<String> {
        if self.state == SessionState::Open { self.display_name().map(str::to_string) } else { None }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn reject(err: CommandError) -> Vec<SessionAction> {
    vec![SessionAction::Print(Output::LocalError(err.to_string()))]
}
