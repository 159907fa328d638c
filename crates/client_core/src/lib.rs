use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::{Action, GameSnapshot};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod error;
pub mod transport;

pub use error::SessionError;
pub use transport::HttpTransport;

#[async_trait]
pub trait GameTransport: Send + Sync {
    async fn start_session(
        &self,
        name: &str,
        credit_hours: u32,
    ) -> Result<GameSnapshot, SessionError>;

    async fn submit_action(
        &self,
        player_name: &str,
        action: Action,
    ) -> Result<GameSnapshot, SessionError>;

    async fn fetch_status(&self, player_name: &str) -> Result<GameSnapshot, SessionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub snapshot: GameSnapshot,
    pub request_in_flight: bool,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Activated(GameSnapshot),
    SnapshotReplaced(GameSnapshot),
    RequestFailed(String),
}

struct ControllerState {
    /// Write-once on the first successful start; every in-session call is
    /// correlated by this name.
    player: Option<String>,
    snapshot: GameSnapshot,
    request_in_flight: bool,
    last_error: Option<String>,
}

impl ControllerState {
    fn view(&self) -> SessionState {
        SessionState {
            phase: if self.player.is_some() {
                SessionPhase::Active
            } else {
                SessionPhase::NotStarted
            },
            snapshot: self.snapshot.clone(),
            request_in_flight: self.request_in_flight,
            last_error: self.last_error.clone(),
        }
    }
}

/// Owns the session state machine. The transport is only ever called from
/// here, so at most one exchange is outstanding at any instant.
pub struct SessionController {
    transport: Arc<dyn GameTransport>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(transport: Arc<dyn GameTransport>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            transport,
            inner: Mutex::new(ControllerState {
                player: None,
                snapshot: GameSnapshot::default(),
                request_in_flight: false,
                last_error: None,
            }),
            events,
        })
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.view()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// `Err` only for local precondition failures; once the exchange is
    /// dispatched the outcome lands in the state and the event stream, not
    /// in the return value.
    pub async fn request_start(&self, name: &str, credit_hours: u32) -> Result<(), SessionError> {
        {
            let mut state = self.inner.lock().await;
            if state.player.is_some() {
                return Err(SessionError::Validation(
                    "session already started".to_string(),
                ));
            }
            if name.trim().is_empty() {
                return Err(SessionError::Validation("name required".to_string()));
            }
            if state.request_in_flight {
                return Err(SessionError::Busy);
            }
            state.request_in_flight = true;
            state.last_error = None;
        }

        let result = self.transport.start_session(name, credit_hours).await;

        let event = {
            let mut state = self.inner.lock().await;
            state.request_in_flight = false;
            match result {
                Ok(snapshot) => {
                    info!(player = %name, credit_hours, "session: started");
                    state.player = Some(name.to_string());
                    state.snapshot = snapshot.clone();
                    SessionEvent::Activated(snapshot)
                }
                Err(err) => {
                    let message = format!("failed to start session: {err}");
                    warn!("session: {message}");
                    state.last_error = Some(message.clone());
                    SessionEvent::RequestFailed(message)
                }
            }
        };

        let _ = self.events.send(event);
        Ok(())
    }

    pub async fn request_action(&self, action: Action) -> Result<(), SessionError> {
        let Some(player) = self.begin_active_exchange().await? else {
            debug!(action = %action, "session: action trigger dropped, request in flight");
            return Ok(());
        };

        let result = self.transport.submit_action(&player, action).await;
        self.finish_active_exchange(result, &format!("failed to perform action '{action}'"))
            .await;
        Ok(())
    }

    /// Refreshes the snapshot mirror without advancing the turn.
    pub async fn request_status(&self) -> Result<(), SessionError> {
        let Some(player) = self.begin_active_exchange().await? else {
            debug!("session: status trigger dropped, request in flight");
            return Ok(());
        };

        let result = self.transport.fetch_status(&player).await;
        self.finish_active_exchange(result, "failed to fetch status")
            .await;
        Ok(())
    }

    /// `Ok(None)` means the trigger was dropped because a request is in
    /// flight; `Ok(Some(..))` claims the slot and yields the player name.
    async fn begin_active_exchange(&self) -> Result<Option<String>, SessionError> {
        let mut state = self.inner.lock().await;
        let Some(player) = state.player.clone() else {
            return Err(SessionError::Validation("session not started".to_string()));
        };
        if state.request_in_flight {
            return Ok(None);
        }
        state.request_in_flight = true;
        state.last_error = None;
        Ok(Some(player))
    }

    async fn finish_active_exchange(
        &self,
        result: Result<GameSnapshot, SessionError>,
        context: &str,
    ) {
        let event = {
            let mut state = self.inner.lock().await;
            state.request_in_flight = false;
            match result {
                Ok(snapshot) => {
                    state.snapshot = snapshot.clone();
                    SessionEvent::SnapshotReplaced(snapshot)
                }
                Err(err) => {
                    let message = format!("{context}: {err}");
                    warn!("session: {message}");
                    state.last_error = Some(message.clone());
                    SessionEvent::RequestFailed(message)
                }
            }
        };

        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
