//! # Persistência — Salvamento e Carregamento do Histórico em Disco
//!
//! Serializa o histórico do [`crate::bus::EventBus`] como JSON em
//! `data/events.json` (caminho configurável via `--data`).
//!
//! ## Quando o Histórico é Salvo?
//!
//! - Após cada evento recebido em `POST /api/event`
//! - Após `GET /api/clear` (salva a lista vazia)
//!
//! ## ⚠️ Atomicidade
//!
//! A escrita **não é atômica** — crash durante escrita pode corromper
//! o arquivo. Nesse caso o próximo start inicia com histórico vazio.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::StoredEvent;

/// Salva o histórico em disco como JSON pretty-printed.
///
/// Cria o diretório pai se não existir.
///
/// # Erros
///
/// Retorna erro se não conseguir criar o diretório, serializar,
/// ou escrever no arquivo.
pub fn save_events(path: &Path, events: &[StoredEvent]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Falha ao criar diretório {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(events).context("Falha ao serializar histórico")?;
    std::fs::write(path, json)
        .with_context(|| format!("Falha ao escrever {}", path.display()))?;
    Ok(())
}

/// Carrega o histórico do disco, ou uma lista vazia se o arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas estiver corrompido.
pub fn load_events(path: &Path) -> Result<Vec<StoredEvent>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Nenhum histórico encontrado, iniciando vazio");
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let events: Vec<StoredEvent> = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    Ok(events)
}
