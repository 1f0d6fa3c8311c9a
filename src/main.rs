//! # MLR-Bench Dashboard
//!
//! **Ponto de entrada** do servidor de visualização do pipeline de pesquisa
//! (idea → literature → proposal → experiment → paper → evaluation).
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Lê Config (flags + env)
//!   ├── Abre EventBus (carrega data/events.json)
//!   ├── Monta AppState e Router
//!   └── Inicia servidor TCP (porta 5000)
//!         ├── POST /api/event  ← pipeline publica eventos
//!         └── GET  /           → dashboard (uma sessão por aba)
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Executar com logs detalhados
//! RUST_LOG=debug cargo run -- --port 5001
//!
//! # Publicar um evento
//! curl -X POST localhost:5000/api/event -H 'content-type: application/json' \
//!   -d '{"agent_name":"IdeaGenerator","stage":"idea","event_type":"started"}'
//! ```

/// Módulo `bus` — histórico de eventos + broadcast para as sessões.
mod bus;

/// Módulo `config` — flags de linha de comando e variáveis de ambiente.
mod config;

/// Módulo `core` — tipos do domínio: StageId, EventKind, AgentEvent.
mod core;

/// Módulo `dashboard` — controlador de estado da tela e sessões.
mod dashboard;

/// Módulo `persistence` — serialização do histórico em JSON.
mod persistence;

/// Módulo `web` — servidor axum, handlers, templates e SSE.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::bus::EventBus;
use crate::config::Config;
use crate::dashboard::SessionRegistry;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Aceita RUST_LOG para configurar o nível. Exemplo: RUST_LOG=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    tracing::info!("MLR-Bench Visualization Server — Starting...");

    let bus = Arc::new(EventBus::open(config.data.clone(), config.history_cap));
    tracing::info!(events = bus.len(), path = %config.data.display(), "Event bus ready");

    let state = AppState {
        bus,
        sessions: SessionRegistry::default(),
        session: config.session(),
    };
    let app = web::create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Falha ao fazer bind em {addr}"))?;
    tracing::info!("🚀 Dashboard running at http://localhost:{}", config.port);

    // Bloqueia até que o processo seja encerrado.
    axum::serve(listener, app).await?;

    Ok(())
}
