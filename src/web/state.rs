//! # Estado da Aplicação Web
//!
//! Estado compartilhado entre todos os handlers Axum.
//!
//! ```text
//! AppState
//!  ├── bus       Arc<EventBus>       histórico + broadcast
//!  ├── sessions  SessionRegistry     uma entrada por aba aberta
//!  └── session   SessionConfig       timeout de ociosidade, limite de replay
//! ```

use std::sync::Arc;

use crate::bus::EventBus;
use crate::dashboard::{SessionConfig, SessionRegistry};

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    /// Bus de eventos do pipeline.
    pub bus: Arc<EventBus>,
    /// Sessões do dashboard abertas.
    pub sessions: SessionRegistry,
    /// Parâmetros aplicados a cada sessão nova.
    pub session: SessionConfig,
}
