//! # Handlers HTTP — Os Endpoints da Aplicação
//!
//! Cada função pública neste módulo é um handler Axum, mapeado a uma
//! rota em [`super::create_router()`].
//!
//! ## Padrão de Resposta
//!
//! | Handler | Método | Retorno | Uso |
//! |---------|--------|---------|-----|
//! | `index` | GET | HTML completo | Página do dashboard (Maud) |
//! | `dashboard_stream` | GET | SSE stream | Sessão + patches do DOM |
//! | `session_clear` | POST | 202 | Botão "Clear" |
//! | `session_open_detail` | POST | 202 | Clique num estágio |
//! | `session_close_detail` | POST | 202 | Fechar modal |
//! | `list_events` | GET | JSON | Histórico (`/api/events`) |
//! | `clear_events` | GET | JSON | Reset do histórico (`/api/clear`) |
//! | `receive_event` | POST | JSON | Ingestão de evento (`/api/event`) |
//!
//! ## Erros
//!
//! Falhas viram [`ApiError`], serializado como
//! `{"status": "error", "message": "..."}` com o status HTTP adequado.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use futures_util::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use super::events::SessionHello;
use super::render::HtmlPatchRenderer;
use super::state::AppState;
use super::templates;
use crate::core::{AgentEvent, IncomingEvent, StageId};
use crate::dashboard::{spawn_session, Command, SessionError, SessionRegistry};

/// Limite máximo aceito em `?limit=` de `/api/events`.
const MAX_HISTORY_LIMIT: usize = 5000;

/// Erro HTTP com corpo JSON.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(error: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: error.to_string(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::NotFound(_) => ApiError::not_found(error.to_string()),
            SessionError::Busy(_) => Self {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: error.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "status": "error", "message": self.message }));
        (self.status, body).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

/// GET `/` — Página do dashboard.
pub async fn index() -> Html<String> {
    Html(templates::dashboard_page().into_string())
}

/// Remove a sessão do registro quando o stream SSE é descartado.
struct SessionGuard {
    id: Uuid,
    sessions: SessionRegistry,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(self.id);
    }
}

/// GET `/dashboard/stream` — Abre uma sessão do dashboard.
///
/// ## Fluxo
///
/// ```text
/// 1. Cria canal de patches + HtmlPatchRenderer
/// 2. spawn_session() → task com o controlador (replay do histórico)
/// 3. Envia `event: session` com o id
/// 4. Repassa cada DomPatch como `event: patch`
/// ```
///
/// Quando o navegador fecha a conexão o stream é descartado, o
/// [`SessionGuard`] remove a sessão e a task termina.
pub async fn dashboard_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    let (id, _) = spawn_session(
        state.bus.clone(),
        &state.sessions,
        HtmlPatchRenderer::new(tx),
        state.session,
    );
    tracing::debug!(session = %id, open_sessions = state.sessions.len(), "SSE stream opened");

    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };
    let hello = SessionHello { session: id }.to_sse();
    let patches = UnboundedReceiverStream::new(rx).map(move |patch| {
        let _guard = &guard;
        Ok(patch.to_sse())
    });
    let stream = stream::once(async move { Ok(hello) }).chain(patches);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn parse_session_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| ApiError::bad_request(format!("invalid session id: {e}")))
}

/// POST `/dashboard/{session}/clear` — Limpa o histórico e reseta a tela.
///
/// O resultado (reset ou faixa de erro) chega pelo stream da sessão.
pub async fn session_clear(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_session_id(&session)?;
    state.sessions.send(id, Command::Clear)?;
    Ok(StatusCode::ACCEPTED)
}

/// POST `/dashboard/{session}/detail/{stage}` — Abre o modal de um estágio.
pub async fn session_open_detail(
    State(state): State<AppState>,
    Path((session, stage)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let id = parse_session_id(&session)?;
    let stage = StageId::parse(&stage)
        .ok_or_else(|| ApiError::not_found(format!("unknown stage: {stage}")))?;
    state.sessions.send(id, Command::OpenDetail(stage))?;
    Ok(StatusCode::ACCEPTED)
}

/// POST `/dashboard/{session}/detail/close` — Fecha o modal.
pub async fn session_close_detail(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_session_id(&session)?;
    state.sessions.send(id, Command::CloseDetail)?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// GET `/api/events` — Últimos eventos do histórico (padrão: 100).
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<AgentEvent>> {
    let limit = query
        .limit
        .unwrap_or(state.session.history_limit)
        .clamp(1, MAX_HISTORY_LIMIT);
    Json(state.bus.history(limit).events)
}

/// GET `/api/clear` — Esvazia o histórico do bus.
pub async fn clear_events(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state.bus.clear().map_err(ApiError::internal)?;
    Ok(success())
}

/// POST `/api/event` — Recebe um evento do pipeline e difunde às sessões.
pub async fn receive_event(
    State(state): State<AppState>,
    payload: Result<Json<IncomingEvent>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(incoming) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected malformed event");
        ApiError::bad_request(rejection.body_text())
    })?;
    state.bus.emit(AgentEvent::from(incoming));
    Ok(success())
}
