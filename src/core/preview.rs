//! # Formatação de Textos de Exibição
//!
//! Funções puras que transformam dados de eventos em strings prontas
//! para o DOM: preview truncado, notas de avaliação e horário do log.

use chrono::{DateTime, Local, NaiveDateTime};
use serde_json::Value;

/// Limite de caracteres do preview de input/output.
pub const PREVIEW_LIMIT: usize = 100;

/// Marcador anexado quando o preview é truncado.
pub const ELLIPSIS: &str = "...";

/// Placeholder para dados ausentes.
pub const NOT_AVAILABLE: &str = "N/A";

/// Produz o preview exibido no card do estágio.
///
/// - ausente (`null` ou string vazia) → `"N/A"`
/// - texto → truncado em [`PREVIEW_LIMIT`] caracteres
/// - objeto/array → JSON indentado, depois a mesma truncagem
/// - número/booleano → convertido para texto
pub fn format_preview(data: &Value) -> String {
    match data {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::String(s) if s.is_empty() => NOT_AVAILABLE.to_string(),
        Value::String(s) => truncate(s),
        Value::Object(_) | Value::Array(_) => truncate(&pretty_text(data)),
        other => other.to_string(),
    }
}

/// Texto completo para o cache do modal: strings como estão,
/// qualquer outro valor como JSON indentado.
pub fn pretty_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Formata uma nota com uma casa decimal, arredondando metades para longe de zero.
///
/// `format!("{:.1}")` arredonda empates para o par (7.25 → "7.2"); as notas
/// do juiz são exibidas com arredondamento comercial (7.25 → "7.3").
///
/// Empates que não são exatos em binário sobem: 1.45 vira "1.5", enquanto
/// `Number.toFixed(1)` do JavaScript devolve "1.4".
pub fn format_score(score: f64) -> String {
    format!("{:.1}", (score * 10.0).round() / 10.0)
}

/// Horário `HH:MM:SS` de um timestamp ISO-8601, com ou sem fuso.
///
/// Timestamps que não parseiam são exibidos como vieram.
pub fn format_log_time(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.with_timezone(&Local).format("%H:%M:%S").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, pattern) {
            return naive.format("%H:%M:%S").to_string();
        }
    }
    timestamp.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ─── format_preview ────────────────────────────────────────

    #[test]
    fn absent_data_is_not_available() {
        assert_eq!(format_preview(&Value::Null), "N/A");
        assert_eq!(format_preview(&json!("")), "N/A");
    }

    #[test]
    fn short_text_is_unchanged() {
        let text = "a".repeat(100);
        assert_eq!(format_preview(&json!(text)), text);
        assert_eq!(format_preview(&json!("hello")), "hello");
    }

    #[test]
    fn long_text_cut_at_exactly_100_chars() {
        let text = "b".repeat(101);
        let preview = format_preview(&json!(text));
        assert_eq!(preview, format!("{}...", "b".repeat(100)));
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let text = "é".repeat(150);
        let preview = format_preview(&json!(text));
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn structured_data_is_pretty_printed_then_truncated() {
        assert_eq!(format_preview(&json!({"a": 1})), "{\n  \"a\": 1\n}");

        let big = json!({ "abstract": "x".repeat(200) });
        let preview = format_preview(&big);
        assert!(preview.starts_with("{\n  \"abstract\""));
        assert_eq!(preview.chars().count(), 103);
    }

    #[test]
    fn scalars_coerced_to_text() {
        assert_eq!(format_preview(&json!(42)), "42");
        assert_eq!(format_preview(&json!(true)), "true");
    }

    // ─── format_score ──────────────────────────────────────────

    #[test]
    fn scores_round_to_one_decimal() {
        assert_eq!(format_score(7.25), "7.3");
        assert_eq!(format_score(8.0), "8.0");
        assert_eq!(format_score(7.625), "7.6");
        assert_eq!(format_score(5.0), "5.0");
    }

    // ─── format_log_time ───────────────────────────────────────

    #[test]
    fn naive_iso_timestamp() {
        assert_eq!(format_log_time("2025-03-14T10:21:07.512345"), "10:21:07");
        assert_eq!(format_log_time("2025-03-14T10:21:07"), "10:21:07");
    }

    #[test]
    fn garbage_timestamp_is_kept() {
        assert_eq!(format_log_time("yesterday"), "yesterday");
    }
}
