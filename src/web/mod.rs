//! # Módulo Web — Servidor do Dashboard
//!
//! Camada web construída com **Axum** + **Maud** + **SSE**.
//!
//! ## Arquitetura Web
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Browser (dashboard.js: aplica patches, envia ações)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                                   │
//! │  ├── GET  /                                → dashboard      │
//! │  ├── GET  /dashboard/stream                → SSE (patches)  │
//! │  ├── POST /dashboard/{session}/clear       → limpar         │
//! │  ├── POST /dashboard/{session}/detail/{id} → abrir modal    │
//! │  ├── POST /dashboard/{session}/detail/close→ fechar modal   │
//! │  ├── GET  /api/events                      → JSON histórico │
//! │  ├── GET  /api/clear                       → JSON reset     │
//! │  └── POST /api/event                       → ingestão       │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Static Assets (tower_http::ServeDir → /assets/)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`events`] | Mensagens SSE (`DomPatch`, `SessionHello`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`render`] | `HtmlPatchRenderer` — `RenderPort` de produção |
//! | [`templates`] | Templates Maud (HTML server-side) |

pub mod events;
pub mod handlers;
pub mod render;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
///
/// A API `/api/*` aceita qualquer origem: o pipeline roda em outro
/// processo e posta eventos direto em `/api/event`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // ── Página ────────────────────────────────────────────
        .route("/", get(handlers::index))
        // ── Sessões do dashboard ──────────────────────────────
        .route("/dashboard/stream", get(handlers::dashboard_stream))
        .route("/dashboard/{session}/clear", post(handlers::session_clear))
        .route(
            "/dashboard/{session}/detail/close",
            post(handlers::session_close_detail),
        )
        .route(
            "/dashboard/{session}/detail/{stage}",
            post(handlers::session_open_detail),
        )
        // ── API JSON ──────────────────────────────────────────
        .route("/api/events", get(handlers::list_events))
        .route("/api/clear", get(handlers::clear_events))
        .route("/api/event", post(handlers::receive_event))
        // ── Arquivos estáticos ────────────────────────────────
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::bus::EventBus;
    use crate::dashboard::{Command, SessionConfig, SessionRegistry};

    fn app() -> (Router, AppState) {
        let state = AppState {
            bus: Arc::new(EventBus::in_memory()),
            sessions: SessionRegistry::default(),
            session: SessionConfig {
                idle_timeout: Duration::from_secs(10),
                history_limit: 100,
            },
        };
        (create_router(state.clone()), state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_serves_dashboard() {
        let (app, _) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("id=\"stage-evaluation\""));
    }

    #[tokio::test]
    async fn posted_event_shows_up_in_history() {
        let (app, state) = app();
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/event",
                json!({"agent_name": "IdeaGenerator", "stage": "idea", "event_type": "started"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "success"}));
        assert_eq!(state.bus.len(), 1);

        let response = app
            .oneshot(Request::get("/api/events").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let events = body_json(response).await;
        assert_eq!(events[0]["agent_name"], "IdeaGenerator");
        assert_eq!(events[0]["data"], json!({}));
    }

    #[tokio::test]
    async fn malformed_event_is_rejected() {
        let (app, state) = app();
        let response = app
            .oneshot(post_json("/api/event", json!({"stage": "idea"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["status"], "error");
        assert_eq!(state.bus.len(), 0);
    }

    #[tokio::test]
    async fn api_clear_empties_history() {
        let (app, state) = app();
        state.bus.emit(crate::core::AgentEvent::new(
            "agent",
            "paper",
            "started",
            Value::Null,
        ));
        let response = app
            .oneshot(Request::get("/api/clear").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.bus.len(), 0);
    }

    #[tokio::test]
    async fn history_limit_is_respected() {
        let (app, state) = app();
        for stage in ["idea", "literature", "proposal"] {
            state
                .bus
                .emit(crate::core::AgentEvent::new("a", stage, "started", Value::Null));
        }
        let response = app
            .oneshot(
                Request::get("/api/events?limit=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let events = body_json(response).await;
        assert_eq!(events.as_array().unwrap().len(), 1);
        assert_eq!(events[0]["stage"], "proposal");
    }

    #[tokio::test]
    async fn actions_on_unknown_session_are_404() {
        let (app, _) = app();
        let uri = format!("/dashboard/{}/clear", uuid::Uuid::new_v4());
        let response = app
            .oneshot(Request::post(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn detail_routes_reach_registered_session() {
        let (app, state) = app();
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let (id, _) = crate::dashboard::spawn_session(
            state.bus.clone(),
            &state.sessions,
            render::HtmlPatchRenderer::new(tx),
            state.session,
        );

        let open = app
            .clone()
            .oneshot(
                Request::post(format!("/dashboard/{id}/detail/paper"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(open.status(), StatusCode::ACCEPTED);

        let close = app
            .clone()
            .oneshot(
                Request::post(format!("/dashboard/{id}/detail/close"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(close.status(), StatusCode::ACCEPTED);

        let unknown = app
            .oneshot(
                Request::post(format!("/dashboard/{id}/detail/deploy"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert!(state.sessions.send(id, Command::CloseDetail).is_ok());
    }
}
