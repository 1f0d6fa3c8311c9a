//! # Eventos de Agente
//!
//! [`AgentEvent`] é a unidade que trafega por todo o sistema: chega via
//! `POST /api/event`, é guardada no [`crate::bus::EventBus`], volta em
//! `GET /api/events` e alimenta o controlador do dashboard.
//!
//! ## Formato no Fio
//!
//! ```json
//! {
//!   "agent_name": "IdeaGenerator",
//!   "stage": "idea",
//!   "event_type": "output",
//!   "data": { "title": "..." },
//!   "timestamp": "2025-03-14T10:21:07.512345"
//! }
//! ```
//!
//! `stage` e `event_type` ficam como strings: um valor desconhecido não
//! impede o evento de ser contado e logado.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::stage::{EventKind, StageId};

/// Evento emitido por um agente do pipeline. Imutável depois de recebido.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentEvent {
    pub agent_name: String,
    pub stage: String,
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
    pub timestamp: String,
}

impl AgentEvent {
    /// Cria um evento com timestamp local no formato ISO-8601.
    #[cfg(test)]
    pub fn new(
        agent_name: impl Into<String>,
        stage: impl Into<String>,
        event_type: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            stage: stage.into(),
            event_type: event_type.into(),
            data,
            timestamp: now_timestamp(),
        }
    }

    /// Estágio conhecido, ou `None` se o id não pertence ao pipeline.
    pub fn stage_id(&self) -> Option<StageId> {
        StageId::parse(&self.stage)
    }

    pub fn kind(&self) -> Option<EventKind> {
        EventKind::parse(&self.event_type)
    }
}

/// Corpo aceito por `POST /api/event`.
///
/// `data` e `timestamp` são opcionais: sem `data` o evento carrega `{}`,
/// sem `timestamp` recebe o horário de chegada.
#[derive(Debug, Deserialize)]
pub struct IncomingEvent {
    pub agent_name: String,
    pub stage: String,
    pub event_type: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl From<IncomingEvent> for AgentEvent {
    fn from(incoming: IncomingEvent) -> Self {
        Self {
            agent_name: incoming.agent_name,
            stage: incoming.stage,
            event_type: incoming.event_type,
            data: incoming
                .data
                .unwrap_or_else(|| Value::Object(Default::default())),
            timestamp: incoming.timestamp.unwrap_or_else(now_timestamp),
        }
    }
}

/// Evento guardado no bus, com número de sequência monotônico.
///
/// A sequência permite que uma sessão que leu o histórico descarte
/// as cópias do mesmo evento que chegarem pelo canal ao vivo.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredEvent {
    pub seq: u64,
    pub event: AgentEvent,
}

fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wire_format() {
        let raw = json!({
            "agent_name": "IdeaGenerator",
            "stage": "idea",
            "event_type": "started",
            "data": {"task": "t1"},
            "timestamp": "2025-03-14T10:21:07.512345"
        });
        let event: AgentEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.stage_id(), Some(StageId::Idea));
        assert_eq!(event.kind(), Some(EventKind::Started));
        assert_eq!(event.data["task"], "t1");
    }

    #[test]
    fn unknown_stage_still_deserializes() {
        let raw = json!({
            "agent_name": "Deployer",
            "stage": "deploy",
            "event_type": "started",
            "timestamp": "2025-03-14T10:21:07"
        });
        let event: AgentEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.stage_id(), None);
        assert!(event.data.is_null());
    }

    #[test]
    fn incoming_defaults_data_and_timestamp() {
        let incoming: IncomingEvent = serde_json::from_value(json!({
            "agent_name": "Judge",
            "stage": "evaluation",
            "event_type": "completed"
        }))
        .unwrap();
        let event = AgentEvent::from(incoming);
        assert_eq!(event.data, json!({}));
        assert!(!event.timestamp.is_empty());
    }
}
