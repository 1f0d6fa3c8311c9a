//! # Estado de Visualização do Dashboard
//!
//! Tudo que o controlador sabe sobre a tela vive em [`ViewState`]:
//! contadores, estado visual de cada estágio, painel de notas, log,
//! cache do modal e estado da conexão. Os tipos aqui são *view models*
//! — já contêm as strings exatas que o renderer escreve no DOM.
//!
//! ## Estados Visuais de um Estágio
//!
//! ```text
//!            started           completed
//!   Idle ───────────→ Active ───────────→ Completed
//!    │                  │
//!    │      error       │ error
//!    └──────────────→ Error ←┘
//!
//!   input/output: não mudam o estado, só o painel de dados
//! ```
//!
//! As transições são last-writer-wins: qualquer estado aceita qualquer
//! `started`/`completed`/`error`.

use std::collections::VecDeque;

use serde_json::Value;

use crate::core::preview::format_score;
use crate::core::StageId;

/// Limite de linhas do log de eventos.
pub const LOG_CAPACITY: usize = 50;

/// Texto do estágio ocioso / do estágio atual antes de qualquer `started`.
pub const WAITING_LABEL: &str = "Waiting…";
pub const NO_STAGE: &str = "None";

pub const NO_SYSTEM_PROMPT: &str = "No system prompt available";
pub const NO_INPUT: &str = "No input data yet";
pub const NO_OUTPUT: &str = "No output data yet";

/// Estado visual mutuamente exclusivo de um card de estágio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageVisual {
    #[default]
    Idle,
    Active,
    Completed,
    Error,
}

impl StageVisual {
    /// Classe CSS aplicada ao card (`None` para ocioso).
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            StageVisual::Idle => None,
            StageVisual::Active => Some("active"),
            StageVisual::Completed => Some("completed"),
            StageVisual::Error => Some("error"),
        }
    }
}

/// Cor do rótulo de status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Neutral,
    Success,
    Failure,
}

impl Tone {
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Neutral => "#666",
            Tone::Success => "#4CAF50",
            Tone::Failure => "#f44336",
        }
    }
}

/// Qual dado o painel do card está mostrando.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataKind {
    Input,
    Output,
}

impl DataKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            DataKind::Input => "Input:",
            DataKind::Output => "Output:",
        }
    }
}

/// Painel de dados do card: prefixo + preview truncado.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPanel {
    pub kind: DataKind,
    pub preview: String,
}

/// View model de um card de estágio (`stage-<id>`, `status-<id>`, `data-<id>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageView {
    pub visual: StageVisual,
    pub label: &'static str,
    pub tone: Tone,
    pub data: Option<DataPanel>,
}

impl Default for StageView {
    fn default() -> Self {
        Self {
            visual: StageVisual::Idle,
            label: WAITING_LABEL,
            tone: Tone::Neutral,
            data: None,
        }
    }
}

/// Painel de notas da avaliação.
///
/// Cada campo guarda o último valor formatado recebido; campos ausentes
/// em uma atualização mantêm o valor anterior.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub visible: bool,
    pub idea_score: Option<String>,
    pub paper_score: Option<String>,
    pub average: Option<String>,
}

impl ScoreBoard {
    /// Aplica um objeto `scores` e torna o painel visível.
    ///
    /// Valores não numéricos são tratados como ausentes.
    pub fn merge(&mut self, scores: &Value) {
        self.visible = true;
        let field = |name: &str| scores.get(name).and_then(Value::as_f64).map(format_score);
        if let Some(v) = field("idea_score") {
            self.idea_score = Some(v);
        }
        if let Some(v) = field("paper_score") {
            self.paper_score = Some(v);
        }
        if let Some(v) = field("average") {
            self.average = Some(v);
        }
    }
}

/// Uma linha do log de eventos.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    /// Horário `HH:MM:SS` (ou o timestamp cru).
    pub time: String,
    pub agent_name: String,
    pub stage: String,
    pub event_type: String,
}

/// Log FIFO limitado: o mais novo fica na frente, o mais antigo é
/// descartado quando a capacidade é excedida.
#[derive(Clone, Debug)]
pub struct EventLog {
    lines: VecDeque<LogLine>,
    capacity: usize,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insere no topo e remove da cauda até respeitar a capacidade.
    pub fn push(&mut self, line: LogLine) {
        self.lines.push_front(line);
        while self.lines.len() > self.capacity {
            self.lines.pop_back();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Linhas do mais novo para o mais antigo.
    pub fn iter(&self) -> impl Iterator<Item = &LogLine> {
        self.lines.iter()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }
}

/// Conteúdo cacheado para o modal de um estágio (last-write-wins por campo).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageCache {
    pub system_prompt: String,
    pub input: String,
    pub output: String,
}

/// Estado da conexão com o canal de eventos.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    /// Texto de `stat-status`.
    pub fn status_text(&self) -> &'static str {
        match self {
            ConnectionState::Connected => "Connected",
            ConnectionState::Disconnected => "Disconnected",
        }
    }

    /// Texto e cor do indicador `stat-server`.
    pub fn indicator(&self) -> (&'static str, &'static str) {
        match self {
            ConnectionState::Connected => ("🟢 Connected", "#10b981"),
            ConnectionState::Disconnected => ("🔴 Disconnected", "#ef4444"),
        }
    }
}

/// Leituras da barra de estatísticas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsView {
    pub event_count: u64,
    pub current_stage: Option<StageId>,
    pub connection: ConnectionState,
    pub client_active: bool,
}

impl StatsView {
    pub fn current_stage_text(&self) -> &'static str {
        self.current_stage.map_or(NO_STAGE, |s| s.as_str())
    }

    /// Texto e cor de `stat-client`.
    pub fn client_indicator(&self) -> (&'static str, &'static str) {
        if self.client_active {
            ("🟢 Running", "#10b981")
        } else {
            ("⚪ Idle", "#666")
        }
    }
}

/// Conteúdo do modal aberto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub stage: StageId,
    pub title: &'static str,
    pub system_prompt: String,
    pub input: String,
    pub output: String,
}

impl DetailView {
    /// Monta o modal a partir do cache, com placeholders para campos vazios.
    pub fn from_cache(stage: StageId, cache: &StageCache) -> Self {
        let or = |value: &str, placeholder: &str| {
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        };
        Self {
            stage,
            title: stage.display_name(),
            system_prompt: or(&cache.system_prompt, NO_SYSTEM_PROMPT),
            input: or(&cache.input, NO_INPUT),
            output: or(&cache.output, NO_OUTPUT),
        }
    }
}

/// Estado completo de uma sessão do dashboard.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub event_count: u64,
    pub current_stage: Option<StageId>,
    pub stages: [StageView; StageId::COUNT],
    pub cache: [StageCache; StageId::COUNT],
    pub scores: ScoreBoard,
    pub log: EventLog,
    pub client_active: bool,
    pub connection: ConnectionState,
    pub detail: Option<StageId>,
    pub banner: Option<String>,
}

impl ViewState {
    pub fn stage(&self, stage: StageId) -> &StageView {
        &self.stages[stage.index()]
    }

    pub fn stage_mut(&mut self, stage: StageId) -> &mut StageView {
        &mut self.stages[stage.index()]
    }

    pub fn cache(&self, stage: StageId) -> &StageCache {
        &self.cache[stage.index()]
    }

    pub fn cache_mut(&mut self, stage: StageId) -> &mut StageCache {
        &mut self.cache[stage.index()]
    }

    pub fn stats(&self) -> StatsView {
        StatsView {
            event_count: self.event_count,
            current_stage: self.current_stage,
            connection: self.connection,
            client_active: self.client_active,
        }
    }

    pub fn detail_view(&self) -> Option<DetailView> {
        self.detail
            .map(|stage| DetailView::from_cache(stage, self.cache(stage)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line(n: usize) -> LogLine {
        LogLine {
            time: "00:00:00".into(),
            agent_name: format!("agent-{n}"),
            stage: "idea".into(),
            event_type: "started".into(),
        }
    }

    #[test]
    fn log_evicts_oldest_past_capacity() {
        let mut log = EventLog::default();
        for n in 0..51 {
            log.push(line(n));
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        assert_eq!(log.iter().next().unwrap().agent_name, "agent-50");
        assert_eq!(log.iter().last().unwrap().agent_name, "agent-1");
    }

    #[test]
    fn scoreboard_merges_only_present_fields() {
        let mut board = ScoreBoard::default();
        board.merge(&json!({"idea_score": 7.25, "paper_score": 8, "average": 7.625}));
        assert_eq!(board.idea_score.as_deref(), Some("7.3"));
        assert_eq!(board.paper_score.as_deref(), Some("8.0"));
        assert_eq!(board.average.as_deref(), Some("7.6"));

        board.merge(&json!({"average": 5}));
        assert_eq!(board.idea_score.as_deref(), Some("7.3"));
        assert_eq!(board.paper_score.as_deref(), Some("8.0"));
        assert_eq!(board.average.as_deref(), Some("5.0"));
        assert!(board.visible);
    }

    #[test]
    fn detail_view_uses_placeholders() {
        let view = DetailView::from_cache(StageId::Paper, &StageCache::default());
        assert_eq!(view.title, "Paper Writer");
        assert_eq!(view.system_prompt, NO_SYSTEM_PROMPT);
        assert_eq!(view.input, NO_INPUT);
        assert_eq!(view.output, NO_OUTPUT);
    }

    #[test]
    fn default_state_is_idle_everywhere() {
        let state = ViewState::default();
        assert!(state.stages.iter().all(|s| *s == StageView::default()));
        assert_eq!(state.stats().current_stage_text(), NO_STAGE);
        assert!(state.log.is_empty());
    }
}
