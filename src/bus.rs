//! # Event Bus — Histórico e Difusão de Eventos do Pipeline
//!
//! O [`EventBus`] é o ponto central por onde passam todos os eventos
//! dos agentes. Ele cumpre dois papéis:
//!
//! 1. **Histórico**: guarda cada evento com um número de sequência e
//!    o persiste em disco (ver [`crate::persistence`])
//! 2. **Difusão**: repassa cada evento a todas as sessões abertas do
//!    dashboard via `tokio::sync::broadcast`
//!
//! ## Replay sem Duplicatas
//!
//! ```text
//! sessão:  subscribe() ──→ history() ──→ recv() ao vivo
//!                             │               │
//!                         last_seq = 41     seq ≤ 41 → descartado
//!                                           seq ≥ 42 → aplicado
//! ```
//!
//! A sessão assina o canal **antes** de ler o histórico. Eventos que
//! chegarem entre as duas chamadas aparecem nos dois lados e são
//! filtrados pela sequência.
//!
//! ## Retenção
//!
//! Só os últimos `capacity` eventos ficam em memória e em disco; os mais
//! antigos são descartados na chegada de novos. A sequência continua
//! crescendo.

use std::collections::VecDeque;
use std::path::PathBuf;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::core::{AgentEvent, StoredEvent};
use crate::persistence;

/// Capacidade do canal broadcast; assinantes lentos perdem as mensagens mais antigas.
const CHANNEL_CAPACITY: usize = 256;

/// Eventos retidos por padrão.
pub const DEFAULT_HISTORY_CAP: usize = 5000;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to persist event history to {path}: {reason}")]
    Persist { path: PathBuf, reason: String },
}

/// Recorte do histórico entregue a uma sessão recém-aberta.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    /// Eventos em ordem de chegada.
    pub events: Vec<AgentEvent>,
    /// Maior sequência já atribuída no momento da leitura.
    pub last_seq: u64,
}

struct BusInner {
    events: VecDeque<StoredEvent>,
    last_seq: u64,
    capacity: usize,
}

impl BusInner {
    fn push(&mut self, stored: StoredEvent) {
        self.events.push_back(stored);
        while self.events.len() > self.capacity {
            self.events.pop_front();
        }
    }
}

pub struct EventBus {
    inner: RwLock<BusInner>,
    tx: broadcast::Sender<StoredEvent>,
    /// `None` desliga a persistência (usado nos testes).
    store_path: Option<PathBuf>,
    /// Serializa escritas em disco para que a última escrita seja sempre o snapshot mais novo.
    persist_lock: Mutex<()>,
}

impl EventBus {
    /// Cria um bus em memória, sem persistência.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::with_events(Vec::new(), None, DEFAULT_HISTORY_CAP)
    }

    /// Cria um bus persistido em `path`, carregando o histórico existente.
    ///
    /// Um arquivo corrompido não impede o start: o bus inicia vazio.
    pub fn open(path: PathBuf, capacity: usize) -> Self {
        let events = match persistence::load_events(&path) {
            Ok(events) => {
                tracing::info!(events = events.len(), path = %path.display(), "Histórico carregado do disco");
                events
            }
            Err(e) => {
                tracing::warn!(error = %e, "Falha ao carregar histórico, iniciando vazio");
                Vec::new()
            }
        };
        Self::with_events(events, Some(path), capacity)
    }

    fn with_events(events: Vec<StoredEvent>, store_path: Option<PathBuf>, capacity: usize) -> Self {
        let last_seq = events.last().map_or(0, |e| e.seq);
        let mut inner = BusInner {
            events: VecDeque::with_capacity(events.len()),
            last_seq,
            capacity: capacity.max(1),
        };
        for stored in events {
            inner.push(stored);
        }
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(inner),
            tx,
            store_path,
            persist_lock: Mutex::new(()),
        }
    }

    /// Guarda um evento, difunde para as sessões abertas e persiste.
    ///
    /// Falha de persistência é apenas logada: o evento já está em memória
    /// e já foi entregue.
    pub fn emit(&self, event: AgentEvent) -> StoredEvent {
        let stored = {
            let mut inner = self.inner.write();
            inner.last_seq += 1;
            let stored = StoredEvent {
                seq: inner.last_seq,
                event,
            };
            inner.push(stored.clone());
            // Envio sob o lock mantém a ordem de sequência no canal.
            // Err aqui só significa que não há sessões abertas.
            let _ = self.tx.send(stored.clone());
            stored
        };
        tracing::debug!(
            seq = stored.seq,
            agent = %stored.event.agent_name,
            event_type = %stored.event.event_type,
            "Event emitted"
        );

        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "Falha ao salvar histórico após evento");
        }
        stored
    }

    /// Assina o canal de eventos ao vivo.
    pub fn subscribe(&self) -> broadcast::Receiver<StoredEvent> {
        self.tx.subscribe()
    }

    /// Retorna os últimos `limit` eventos e a sequência mais alta vista.
    pub fn history(&self, limit: usize) -> HistorySnapshot {
        let inner = self.inner.read();
        let start = inner.events.len().saturating_sub(limit);
        HistorySnapshot {
            events: inner
                .events
                .iter()
                .skip(start)
                .map(|stored| stored.event.clone())
                .collect(),
            last_seq: inner.last_seq,
        }
    }

    /// Eventos retidos com sequência maior que `seq`, em ordem.
    ///
    /// Usado por sessões que ficaram para trás no canal ao vivo.
    pub fn since(&self, seq: u64) -> Vec<StoredEvent> {
        self.inner
            .read()
            .events
            .iter()
            .filter(|stored| stored.seq > seq)
            .cloned()
            .collect()
    }

    /// Persiste a lista vazia e só então esvazia o histórico.
    ///
    /// Se a escrita falhar, memória e disco continuam com os eventos.
    /// A sequência não volta a zero: sessões abertas continuam
    /// descartando corretamente eventos antigos.
    pub fn clear(&self) -> Result<(), BusError> {
        let _guard = self.persist_lock.lock();
        let mut inner = self.inner.write();
        if let Some(path) = &self.store_path {
            persistence::save_events(path, &[]).map_err(|e| persist_error(path, e))?;
        }
        inner.events.clear();
        tracing::info!("Event bus cleared");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().events.len()
    }

    fn persist(&self) -> Result<(), BusError> {
        let Some(path) = &self.store_path else {
            return Ok(());
        };
        let _guard = self.persist_lock.lock();
        let snapshot: Vec<StoredEvent> = self.inner.read().events.iter().cloned().collect();
        persistence::save_events(path, &snapshot).map_err(|e| persist_error(path, e))
    }
}

fn persist_error(path: &std::path::Path, error: anyhow::Error) -> BusError {
    BusError::Persist {
        path: path.to_path_buf(),
        reason: format!("{error:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn event(stage: &str, kind: &str) -> AgentEvent {
        AgentEvent::new("agent", stage, kind, Value::Null)
    }

    #[test]
    fn emit_assigns_increasing_sequence() {
        let bus = EventBus::in_memory();
        let a = bus.emit(event("idea", "started"));
        let b = bus.emit(event("idea", "completed"));
        assert_eq!(a.seq, 1);
        assert_eq!(b.seq, 2);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn history_returns_most_recent_in_order() {
        let bus = EventBus::in_memory();
        for stage in ["idea", "literature", "proposal"] {
            bus.emit(event(stage, "started"));
        }
        let snapshot = bus.history(2);
        let stages: Vec<_> = snapshot.events.iter().map(|e| e.stage.as_str()).collect();
        assert_eq!(stages, ["literature", "proposal"]);
        assert_eq!(snapshot.last_seq, 3);
    }

    #[test]
    fn clear_empties_history_but_keeps_sequence() {
        let bus = EventBus::in_memory();
        bus.emit(event("idea", "started"));
        bus.clear().unwrap();
        assert!(bus.history(100).events.is_empty());
        assert_eq!(bus.history(100).last_seq, 1);
        assert_eq!(bus.emit(event("idea", "started")).seq, 2);
    }

    #[tokio::test]
    async fn subscribers_receive_live_events() {
        let bus = EventBus::in_memory();
        let mut rx = bus.subscribe();
        bus.emit(event("paper", "output"));
        let received = rx.recv().await.unwrap();
        assert_eq!(received.seq, 1);
        assert_eq!(received.event.stage, "paper");
    }

    #[test]
    fn history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        {
            let bus = EventBus::open(path.clone(), DEFAULT_HISTORY_CAP);
            bus.emit(event("idea", "started"));
            bus.emit(event("idea", "completed"));
        }
        let reopened = EventBus::open(path, DEFAULT_HISTORY_CAP);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.emit(event("literature", "started")).seq, 3);
    }

    #[test]
    fn clear_reports_persist_failure() {
        let dir = tempfile::tempdir().unwrap();
        // Um diretório no lugar do arquivo faz a escrita falhar.
        let path = dir.path().join("events.json");
        std::fs::create_dir(&path).unwrap();
        let bus = EventBus::with_events(Vec::new(), Some(path), DEFAULT_HISTORY_CAP);
        bus.emit(event("idea", "started"));
        bus.emit(event("idea", "completed"));

        assert!(matches!(bus.clear(), Err(BusError::Persist { .. })));
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.history(100).events.len(), 2);
    }

    #[test]
    fn oldest_events_are_evicted_past_capacity() {
        let bus = EventBus::with_events(Vec::new(), None, 3);
        for _ in 0..5 {
            bus.emit(event("idea", "started"));
        }
        assert_eq!(bus.len(), 3);
        let seqs: Vec<_> = bus.since(0).iter().map(|s| s.seq).collect();
        assert_eq!(seqs, [3, 4, 5]);
        assert_eq!(bus.emit(event("idea", "completed")).seq, 6);
        assert_eq!(bus.len(), 3);
    }

    #[test]
    fn reopen_trims_to_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        {
            let bus = EventBus::open(path.clone(), 10);
            for _ in 0..4 {
                bus.emit(event("paper", "output"));
            }
        }
        let reopened = EventBus::open(path, 2);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.emit(event("paper", "completed")).seq, 5);
    }

    #[test]
    fn since_returns_events_after_sequence() {
        let bus = EventBus::in_memory();
        for stage in ["idea", "literature", "proposal"] {
            bus.emit(event(stage, "started"));
        }
        let missed = bus.since(1);
        let stages: Vec<_> = missed.iter().map(|s| s.event.stage.as_str()).collect();
        assert_eq!(stages, ["literature", "proposal"]);
        assert!(bus.since(3).is_empty());
    }
}
