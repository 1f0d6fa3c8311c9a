//! # Sessões do Dashboard
//!
//! Cada aba do navegador ganha uma sessão: uma task tokio que possui um
//! [`DashboardController`] e é o **único** lugar onde ele é mutado.
//!
//! ## Loop da Sessão
//!
//! ```text
//! spawn_session()
//!   ├── subscribe() no bus        (antes do histórico, ver crate::bus)
//!   ├── render_all() + Connected
//!   ├── replay(history)           (load_history)
//!   └── loop select! {
//!         comando do usuário   → Clear / OpenDetail / CloseDetail
//!         evento ao vivo       → on_event (seq ≤ last_seq descartado)
//!         canal atrasado       → reaplica bus.since(last_seq)
//!         prazo de ociosidade  → on_idle_tick
//!       }
//! ```
//!
//! A sessão termina quando seu remetente de comandos sai do
//! [`SessionRegistry`] (stream SSE encerrado) ou quando o bus fecha.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::controller::DashboardController;
use super::render::RenderPort;
use super::view::ConnectionState;
use crate::bus::EventBus;
use crate::core::StageId;

/// Comandos por sessão enfileirados antes de recusar novos.
const COMMAND_BUFFER: usize = 32;

/// Ação do usuário encaminhada para a sessão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Clear,
    OpenDetail(StageId),
    CloseDetail,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("dashboard session {0} not found")]
    NotFound(Uuid),
    #[error("dashboard session {0} is not keeping up with commands")]
    Busy(Uuid),
}

/// Parâmetros de uma sessão.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    pub idle_timeout: Duration,
    /// Quantos eventos do histórico são reaplicados ao abrir.
    pub history_limit: usize,
}

/// Mapa de sessões abertas → canal de comandos.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, mpsc::Sender<Command>>>>,
}

impl SessionRegistry {
    fn register(&self) -> (Uuid, mpsc::Receiver<Command>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let id = Uuid::new_v4();
        self.inner.write().insert(id, tx);
        (id, rx)
    }

    /// Remove a sessão; o loop dela termina ao ver o canal fechado.
    pub fn remove(&self, id: Uuid) {
        if self.inner.write().remove(&id).is_some() {
            tracing::info!(session = %id, "Dashboard session closed");
        }
    }

    pub fn send(&self, id: Uuid, command: Command) -> Result<(), SessionError> {
        let sessions = self.inner.read();
        let tx = sessions.get(&id).ok_or(SessionError::NotFound(id))?;
        tx.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SessionError::Busy(id),
            mpsc::error::TrySendError::Closed(_) => SessionError::NotFound(id),
        })
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Registra uma sessão nova e inicia sua task.
pub fn spawn_session<R>(
    bus: Arc<EventBus>,
    registry: &SessionRegistry,
    renderer: R,
    config: SessionConfig,
) -> (Uuid, JoinHandle<()>)
where
    R: RenderPort + Send + 'static,
{
    let (id, commands) = registry.register();
    let controller = DashboardController::new(renderer, config.idle_timeout);
    tracing::info!(session = %id, "Dashboard session opened");
    let handle = tokio::spawn(run_session(id, bus, controller, commands, config.history_limit));
    (id, handle)
}

async fn run_session<R: RenderPort>(
    id: Uuid,
    bus: Arc<EventBus>,
    mut controller: DashboardController<R>,
    mut commands: mpsc::Receiver<Command>,
    history_limit: usize,
) {
    let mut live = bus.subscribe();
    controller.render_all();
    controller.on_connection(ConnectionState::Connected);

    let history = bus.history(history_limit);
    tracing::debug!(session = %id, events = history.events.len(), "Replaying history");
    controller.replay(&history.events, Instant::now());
    let mut last_seq = history.last_seq;

    loop {
        let deadline = controller.idle_deadline();
        let idle_sleep = tokio::time::sleep_until(tokio::time::Instant::from_std(
            deadline.unwrap_or_else(Instant::now),
        ));

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Clear => match bus.clear() {
                        Ok(()) => controller.reset_view(),
                        Err(e) => {
                            tracing::error!(session = %id, error = %e, "Clear failed");
                            controller.surface_failure(format!("Clear failed: {e}"));
                        }
                    },
                    Command::OpenDetail(stage) => controller.open_detail(stage),
                    Command::CloseDetail => controller.close_detail(),
                }
            }
            received = live.recv() => match received {
                Ok(stored) => {
                    if stored.seq <= last_seq {
                        continue;
                    }
                    last_seq = stored.seq;
                    controller.on_event(&stored.event, Instant::now());
                }
                Err(RecvError::Lagged(skipped)) => {
                    let missed = bus.since(last_seq);
                    tracing::warn!(
                        session = %id,
                        skipped,
                        replayed = missed.len(),
                        "Session lagged behind event bus, resyncing from history"
                    );
                    let now = Instant::now();
                    for stored in missed {
                        last_seq = stored.seq;
                        controller.on_event(&stored.event, now);
                    }
                }
                Err(RecvError::Closed) => {
                    controller.on_connection(ConnectionState::Disconnected);
                    break;
                }
            },
            _ = idle_sleep, if deadline.is_some() => {
                controller.on_idle_tick(Instant::now());
            }
        }
    }
    tracing::debug!(session = %id, "Session loop finished");
}
