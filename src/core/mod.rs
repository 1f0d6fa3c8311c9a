//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Tipos compartilhados entre o bus de eventos e o dashboard:
//!
//! - [`StageId`] — Uma das seis fases do pipeline (idea → evaluation)
//! - [`EventKind`] — Tipo de evento (started, completed, error, input, output)
//! - [`AgentEvent`] — Notificação emitida por um agente
//! - [`StoredEvent`] — Evento com número de sequência atribuído pelo bus
//! - [`preview`] — Formatação de previews, notas e horários
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use crate::core::{AgentEvent, StageId};
//!
//! let event = AgentEvent::new("IdeaGenerator", "idea", "started", serde_json::Value::Null);
//! assert_eq!(event.stage_id(), Some(StageId::Idea));
//! ```

/// Sub-módulo com [`StageId`] e [`EventKind`].
pub mod stage;

/// Sub-módulo com [`AgentEvent`], [`IncomingEvent`] e [`StoredEvent`].
pub mod event;

/// Sub-módulo com as funções de formatação para exibição.
pub mod preview;

// Re-exports para conveniência — permite usar `crate::core::StageId` diretamente.
pub use event::{AgentEvent, IncomingEvent, StoredEvent};
pub use stage::{EventKind, StageId};
