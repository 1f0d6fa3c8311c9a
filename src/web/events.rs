//! # Mensagens SSE do Dashboard
//!
//! O stream `/dashboard/stream` envia dois tipos de evento SSE:
//!
//! ```text
//! event: session   data: {"session":"<uuid>"}          (uma vez, ao abrir)
//! event: patch     data: {"target":"stat-events","html":"<div ...>"}
//! ```
//!
//! O frontend guarda o id da sessão para as ações do usuário e, para
//! cada `patch`, substitui o `outerHTML` do elemento `target`.

use axum::response::sse::Event as SseEvent;
use serde::Serialize;
use uuid::Uuid;

/// Substituição de um elemento do DOM pelo HTML renderizado.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct DomPatch {
    /// `id` do elemento a substituir.
    pub target: String,
    /// Novo `outerHTML` do elemento.
    pub html: String,
}

impl DomPatch {
    pub fn new(target: impl Into<String>, markup: maud::Markup) -> Self {
        Self {
            target: target.into(),
            html: markup.into_string(),
        }
    }

    pub fn to_sse(&self) -> SseEvent {
        let data = serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({ "target": self.target, "error": e.to_string() }).to_string()
        });
        SseEvent::default().event("patch").data(data)
    }
}

/// Primeiro evento do stream: identifica a sessão.
#[derive(Serialize)]
pub struct SessionHello {
    pub session: Uuid,
}

impl SessionHello {
    pub fn to_sse(&self) -> SseEvent {
        let data = serde_json::to_string(self).unwrap_or_default();
        SseEvent::default().event("session").data(data)
    }
}
