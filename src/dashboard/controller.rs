//! # Controlador do Dashboard de Estágios
//!
//! Traduz o fluxo de eventos do pipeline e as ações do usuário
//! (limpar, abrir/fechar detalhes) em um [`ViewState`] consistente,
//! repassando cada mudança ao [`RenderPort`].
//!
//! ## Fluxo de um Evento
//!
//! ```text
//! on_event(event)
//!   ├── event_count += 1
//!   ├── cliente ativo + re-arma timer de ociosidade
//!   ├── cache do modal (system prompt / input / output)
//!   ├── estágio conhecido? → render_stage_status()
//!   ├── log: insere no topo, corta em 50
//!   └── started? → current_stage = stage
//! ```
//!
//! O controlador é síncrono e não conhece relógio: quem chama passa o
//! `Instant` atual. O loop da sessão ([`super::session`]) é quem dorme
//! até o prazo de ociosidade e chama [`DashboardController::on_idle_tick`].

use std::time::{Duration, Instant};

use serde_json::Value;

use super::idle::IdleTimer;
use super::render::RenderPort;
use super::view::{
    ConnectionState, DataKind, DataPanel, LogLine, ScoreBoard, StageView, StageVisual, Tone,
    ViewState,
};
use crate::core::preview::{format_log_time, format_preview, pretty_text};
use crate::core::{AgentEvent, EventKind, StageId};

pub struct DashboardController<R: RenderPort> {
    state: ViewState,
    idle: IdleTimer,
    renderer: R,
}

impl<R: RenderPort> DashboardController<R> {
    pub fn new(renderer: R, idle_timeout: Duration) -> Self {
        Self {
            state: ViewState::default(),
            idle: IdleTimer::new(idle_timeout),
            renderer,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Prazo de ociosidade pendente, se houver.
    pub fn idle_deadline(&self) -> Option<Instant> {
        self.idle.deadline()
    }

    /// Renderiza todo o estado atual (usado ao abrir a sessão).
    pub fn render_all(&mut self) {
        for stage in StageId::ALL {
            self.renderer.render_stage(stage, self.state.stage(stage));
        }
        self.renderer.render_scores(&self.state.scores);
        self.renderer.render_log(&self.state.log);
        self.renderer.render_stats(&self.state.stats());
        let detail = self.state.detail_view();
        self.renderer.render_detail(detail.as_ref());
        self.renderer.render_banner(self.state.banner.as_deref());
    }

    /// Aplica um evento do pipeline ao estado da tela.
    pub fn on_event(&mut self, event: &AgentEvent, now: Instant) {
        self.state.event_count += 1;
        self.state.client_active = true;
        self.idle.arm(now);

        let stage = event.stage_id();
        let kind = event.kind();

        match stage {
            Some(stage) => {
                self.cache_event(stage, kind, &event.data);
                if let Some(kind) = kind {
                    self.render_stage_status(stage, kind, &event.data);
                }
            }
            None => {
                tracing::trace!(stage = %event.stage, "Ignoring event for unknown stage");
            }
        }

        self.state.log.push(LogLine {
            time: format_log_time(&event.timestamp),
            agent_name: event.agent_name.clone(),
            stage: event.stage.clone(),
            event_type: event.event_type.clone(),
        });
        self.renderer.render_log(&self.state.log);

        if kind == Some(EventKind::Started) {
            if let Some(stage) = stage {
                self.state.current_stage = Some(stage);
            }
        }
        self.renderer.render_stats(&self.state.stats());

        // Modal aberto no estágio do evento acompanha o cache.
        if stage.is_some() && self.state.detail == stage {
            let detail = self.state.detail_view();
            self.renderer.render_detail(detail.as_ref());
        }
    }

    /// Reaplica o histórico, em ordem, exatamente como eventos ao vivo.
    pub fn replay(&mut self, events: &[AgentEvent], now: Instant) {
        for event in events {
            self.on_event(event, now);
        }
    }

    /// Máquina de estados visual de um estágio.
    pub fn render_stage_status(&mut self, stage: StageId, kind: EventKind, data: &Value) {
        let view = self.state.stage_mut(stage);
        match kind {
            EventKind::Started => set_visual(view, StageVisual::Active, "Running…", Tone::Success),
            EventKind::Completed => {
                set_visual(view, StageVisual::Completed, "Completed", Tone::Success)
            }
            EventKind::Error => set_visual(view, StageVisual::Error, "Error", Tone::Failure),
            EventKind::Input => {
                view.data = Some(DataPanel {
                    kind: DataKind::Input,
                    preview: format_preview(data),
                })
            }
            EventKind::Output => {
                view.data = Some(DataPanel {
                    kind: DataKind::Output,
                    preview: format_preview(data),
                })
            }
        }
        self.renderer.render_stage(stage, self.state.stage(stage));

        let carries_scores = matches!(kind, EventKind::Completed | EventKind::Output);
        if stage == StageId::Evaluation && carries_scores {
            if let Some(scores) = data.get("scores").filter(|s| !s.is_null()) {
                self.render_scores(scores);
            }
        }
    }

    /// Revela o painel de notas e atualiza os campos presentes em `scores`.
    pub fn render_scores(&mut self, scores: &Value) {
        self.state.scores.merge(scores);
        self.renderer.render_scores(&self.state.scores);
    }

    /// Chamado quando o prazo de ociosidade pode ter vencido.
    pub fn on_idle_tick(&mut self, now: Instant) {
        if self.idle.fire_if_due(now) {
            self.state.client_active = false;
            self.renderer.render_stats(&self.state.stats());
        }
    }

    /// Reflete conexão/desconexão do canal de eventos.
    pub fn on_connection(&mut self, connection: ConnectionState) {
        self.state.connection = connection;
        self.renderer.render_stats(&self.state.stats());
    }

    /// Volta a tela ao estado inicial após um clear bem-sucedido no bus.
    ///
    /// O cache do modal é mantido.
    pub fn reset_view(&mut self) {
        self.state.log.clear();
        self.state.event_count = 0;
        self.state.current_stage = None;
        self.state.scores = ScoreBoard::default();
        self.state.banner = None;
        for stage in StageId::ALL {
            *self.state.stage_mut(stage) = StageView::default();
            self.renderer.render_stage(stage, self.state.stage(stage));
        }
        self.renderer.render_scores(&self.state.scores);
        self.renderer.render_log(&self.state.log);
        self.renderer.render_stats(&self.state.stats());
        self.renderer.render_banner(None);
    }

    /// Exibe a faixa de erro de uma operação que falhou.
    pub fn surface_failure(&mut self, message: impl Into<String>) {
        self.state.banner = Some(message.into());
        self.renderer.render_banner(self.state.banner.as_deref());
    }

    pub fn open_detail(&mut self, stage: StageId) {
        self.state.detail = Some(stage);
        let detail = self.state.detail_view();
        self.renderer.render_detail(detail.as_ref());
    }

    pub fn close_detail(&mut self) {
        self.state.detail = None;
        self.renderer.render_detail(None);
    }

    fn cache_event(&mut self, stage: StageId, kind: Option<EventKind>, data: &Value) {
        let cache = self.state.cache_mut(stage);
        cache.system_prompt = stage.system_prompt().to_string();
        match kind {
            Some(EventKind::Input) => cache.input = pretty_text(data),
            Some(EventKind::Output) => cache.output = pretty_text(data),
            _ => {}
        }
    }
}

/// Entrar em active/completed/error substitui o estado visual anterior.
fn set_visual(view: &mut StageView, visual: StageVisual, label: &'static str, tone: Tone) {
    view.visual = visual;
    view.label = label;
    view.tone = tone;
}
