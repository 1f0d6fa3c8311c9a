//! # Renderer HTML via Patches
//!
//! Implementação de produção do [`RenderPort`]: cada chamada vira um
//! [`DomPatch`] (template Maud do elemento) enviado ao stream SSE da
//! sessão.
//!
//! Se o navegador fechou o stream, os envios falham silenciosamente; a
//! sessão é encerrada pelo guard do stream (ver `handlers::dashboard_stream`).

use tokio::sync::mpsc::UnboundedSender;

use super::events::DomPatch;
use super::templates;
use crate::core::StageId;
use crate::dashboard::view::{DetailView, EventLog, ScoreBoard, StageView, StatsView};
use crate::dashboard::RenderPort;

pub struct HtmlPatchRenderer {
    tx: UnboundedSender<DomPatch>,
}

impl HtmlPatchRenderer {
    pub fn new(tx: UnboundedSender<DomPatch>) -> Self {
        Self { tx }
    }

    fn push(&self, patch: DomPatch) {
        // Err = stream SSE já encerrado.
        let _ = self.tx.send(patch);
    }
}

impl RenderPort for HtmlPatchRenderer {
    fn render_stage(&mut self, stage: StageId, view: &StageView) {
        self.push(DomPatch::new(
            format!("stage-{stage}"),
            templates::stage_card(stage, view),
        ));
    }

    fn render_scores(&mut self, scores: &ScoreBoard) {
        self.push(DomPatch::new("scores-evaluation", templates::score_panel(scores)));
    }

    fn render_log(&mut self, log: &EventLog) {
        self.push(DomPatch::new("event-log", templates::event_log(log)));
    }

    fn render_stats(&mut self, stats: &StatsView) {
        self.push(DomPatch::new("stats", templates::stats_bar(stats)));
    }

    fn render_detail(&mut self, detail: Option<&DetailView>) {
        self.push(DomPatch::new("agent-modal", templates::detail_modal(detail)));
    }

    fn render_banner(&mut self, banner: Option<&str>) {
        self.push(DomPatch::new("error-banner", templates::error_banner(banner)));
    }
}
