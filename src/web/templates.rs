//! # Templates Maud — HTML do Dashboard
//!
//! Cada elemento dinâmico do dashboard tem **uma** função de template.
//! A mesma função é usada para montar a página inicial e para gerar os
//! patches enviados via SSE, então o HTML inicial e o HTML atualizado
//! nunca divergem.
//!
//! ## Contrato de IDs do DOM
//!
//! | Função | Elemento raiz | IDs internos |
//! |--------|---------------|--------------|
//! | [`stage_card()`] | `stage-<id>` | `status-<id>`, `data-<id>` |
//! | [`score_panel()`] | `scores-evaluation` | `score-idea-judge`, `score-paper-judge`, `score-average` |
//! | [`event_log()`] | `event-log` | — |
//! | [`stats_bar()`] | `stats` | `stat-events`, `stat-stage`, `stat-status`, `stat-server`, `stat-client` |
//! | [`detail_modal()`] | `agent-modal` | `modal-title`, `modal-system-prompt`, `modal-input`, `modal-output` |
//! | [`error_banner()`] | `error-banner` | — |
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────── header + stats ─────────────────┐
//! │ MLR-Bench │ Events │ Stage │ Status │ Srv │ Cli │
//! ├─────────────────────────────────────────────────┤
//! │ [idea] → [literature] → [proposal] → ...        │
//! │ Evaluation scores                               │
//! ├─────────────────────────────────────────────────┤
//! │ Event log (50)                   [🗑 Clear]     │
//! └─────────────────────────────────────────────────┘
//! ```

use maud::{html, Markup, DOCTYPE};

use crate::core::StageId;
use crate::dashboard::view::{
    DetailView, EventLog, ScoreBoard, StageView, StatsView, ViewState,
};

/// Página completa, renderizada a partir do estado inicial.
///
/// O script `dashboard.js` abre o stream SSE e aplica os patches.
pub fn dashboard_page() -> Markup {
    let state = ViewState::default();
    let detail = state.detail_view();
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "MLR-Bench — Agent Pipeline" }
                link rel="stylesheet" href="/assets/dashboard.css";
            }
            body {
                header class="header" {
                    h1 { "MLR-Bench Agent Pipeline" }
                    (stats_bar(&state.stats()))
                }

                (error_banner(state.banner.as_deref()))

                section class="pipeline" {
                    @for (i, stage) in StageId::ALL.iter().enumerate() {
                        @if i > 0 {
                            div class="pipeline-arrow" { "→" }
                        }
                        (stage_card(*stage, state.stage(*stage)))
                    }
                }

                (score_panel(&state.scores))

                section class="log" {
                    div class="log-header" {
                        h2 { "Event Log" }
                        button class="clear-btn" onclick="clearEvents()" { "🗑 Clear" }
                    }
                    (event_log(&state.log))
                }

                (detail_modal(detail.as_ref()))

                script src="/assets/dashboard.js" {}
            }
        }
    }
}

/// Card de um estágio; clicar abre o modal de detalhes.
pub fn stage_card(stage: StageId, view: &StageView) -> Markup {
    let class = match view.visual.css_class() {
        Some(state) => format!("stage {state}"),
        None => "stage".to_string(),
    };
    html! {
        div id=(format!("stage-{stage}")) class=(class)
            onclick=(format!("openAgentModal('{stage}')")) {
            div class="stage-title" { (stage.card_title()) }
            div id=(format!("status-{stage}")) class="stage-status"
                style=(format!("color: {}", view.tone.color())) {
                (view.label)
            }
            div id=(format!("data-{stage}")) class="stage-data" {
                @if let Some(panel) = &view.data {
                    strong { (panel.kind.prefix()) } " " (panel.preview)
                }
            }
        }
    }
}

/// Painel de notas do juiz; oculto até a primeira nota chegar.
pub fn score_panel(scores: &ScoreBoard) -> Markup {
    let display = if scores.visible { "display: block" } else { "display: none" };
    let value = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    html! {
        section id="scores-evaluation" class="scores" style=(display) {
            h2 { "Evaluation Scores" }
            div class="score-grid" {
                div class="score" {
                    span class="score-label" { "Idea (judge)" }
                    span id="score-idea-judge" class="score-value" { (value(&scores.idea_score)) }
                }
                div class="score" {
                    span class="score-label" { "Paper (judge)" }
                    span id="score-paper-judge" class="score-value" { (value(&scores.paper_score)) }
                }
                div class="score" {
                    span class="score-label" { "Average" }
                    span id="score-average" class="score-value" { (value(&scores.average)) }
                }
            }
        }
    }
}

/// Log de eventos, mais novo primeiro.
pub fn event_log(log: &EventLog) -> Markup {
    html! {
        div id="event-log" class="log-content" {
            @for line in log.iter() {
                div class=(format!("log-entry {}", line.event_type)) {
                    span class="log-timestamp" { "[" (line.time) "]" }
                    " "
                    strong { (line.agent_name) }
                    " - " (line.stage) " - " (line.event_type)
                }
            }
        }
    }
}

/// Barra de estatísticas e indicadores.
pub fn stats_bar(stats: &StatsView) -> Markup {
    let (server_text, server_color) = stats.connection.indicator();
    let (client_text, client_color) = stats.client_indicator();
    html! {
        div id="stats" class="stats" {
            div class="stat" {
                span class="stat-label" { "Events" }
                span id="stat-events" class="stat-value" { (stats.event_count) }
            }
            div class="stat" {
                span class="stat-label" { "Current Stage" }
                span id="stat-stage" class="stat-value" { (stats.current_stage_text()) }
            }
            div class="stat" {
                span class="stat-label" { "Status" }
                span id="stat-status" class="stat-value" { (stats.connection.status_text()) }
            }
            div class="stat" {
                span class="stat-label" { "Server" }
                span id="stat-server" class="stat-value"
                    style=(format!("color: {server_color}")) { (server_text) }
            }
            div class="stat" {
                span class="stat-label" { "Client" }
                span id="stat-client" class="stat-value"
                    style=(format!("color: {client_color}")) { (client_text) }
            }
        }
    }
}

/// Modal de detalhes do agente. `None` renderiza o modal oculto.
pub fn detail_modal(detail: Option<&DetailView>) -> Markup {
    let display = if detail.is_some() { "display: block" } else { "display: none" };
    html! {
        div id="agent-modal" class="modal" style=(display) {
            div class="modal-content" {
                span class="modal-close" onclick="closeAgentModal()" { "×" }
                @if let Some(detail) = detail {
                    h2 id="modal-title" { (detail.title) }
                    h3 { "System Prompt" }
                    pre id="modal-system-prompt" { (detail.system_prompt) }
                    h3 { "Input" }
                    pre id="modal-input" { (detail.input) }
                    h3 { "Output" }
                    pre id="modal-output" { (detail.output) }
                } @else {
                    h2 id="modal-title" { "Agent Details" }
                    pre id="modal-system-prompt" {}
                    pre id="modal-input" {}
                    pre id="modal-output" {}
                }
            }
        }
    }
}

/// Faixa de erro de operações do usuário.
pub fn error_banner(message: Option<&str>) -> Markup {
    html! {
        @match message {
            Some(message) => {
                div id="error-banner" class="banner error" style="display: block" { "⚠️ " (message) }
            }
            None => {
                div id="error-banner" class="banner error" style="display: none" {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::view::{DataKind, DataPanel, StageVisual, Tone};

    #[test]
    fn page_contains_dom_contract_ids() {
        let page = dashboard_page().into_string();
        for stage in StageId::ALL {
            assert!(page.contains(&format!("id=\"stage-{stage}\"")));
            assert!(page.contains(&format!("id=\"status-{stage}\"")));
            assert!(page.contains(&format!("id=\"data-{stage}\"")));
        }
        for id in [
            "event-log",
            "stat-events",
            "stat-stage",
            "stat-status",
            "stat-server",
            "stat-client",
            "scores-evaluation",
            "score-idea-judge",
            "score-paper-judge",
            "score-average",
            "agent-modal",
            "modal-title",
            "modal-system-prompt",
            "modal-input",
            "modal-output",
        ] {
            assert!(page.contains(&format!("id=\"{id}\"")), "missing #{id}");
        }
        assert!(page.contains("Waiting…"));
    }

    #[test]
    fn stage_card_escapes_preview() {
        let view = StageView {
            visual: StageVisual::Active,
            label: "Running…",
            tone: Tone::Success,
            data: Some(DataPanel {
                kind: DataKind::Output,
                preview: "<script>alert(1)</script>".into(),
            }),
        };
        let html = stage_card(StageId::Paper, &view).into_string();
        assert!(html.contains("class=\"stage active\""));
        assert!(html.contains("<strong>Output:</strong>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn hidden_score_panel_shows_placeholders() {
        let html = score_panel(&ScoreBoard::default()).into_string();
        assert!(html.contains("display: none"));
        assert!(html.contains("id=\"score-average\" class=\"score-value\">-<"));
    }
}
