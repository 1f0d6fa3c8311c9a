//! # Configuração — Argumentos de Linha de Comando
//!
//! Cada opção aceita também uma variável de ambiente, útil quando o
//! dashboard roda em container.
//!
//! ```bash
//! mlr-dashboard --port 5000 --data data/events.json
//! MLR_DASHBOARD_IDLE_SECS=30 mlr-dashboard
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::bus::DEFAULT_HISTORY_CAP;
use crate::dashboard::SessionConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "mlr-dashboard", about = "MLR-Bench visualization server")]
pub struct Config {
    /// Endereço de bind do servidor.
    #[arg(long, env = "MLR_DASHBOARD_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "MLR_DASHBOARD_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Arquivo JSON onde o histórico de eventos é persistido.
    #[arg(long, env = "MLR_DASHBOARD_DATA", default_value = "data/events.json")]
    pub data: PathBuf,

    /// Segundos sem eventos até o cliente do pipeline aparecer como ocioso.
    #[arg(long, env = "MLR_DASHBOARD_IDLE_SECS", default_value_t = 10)]
    pub idle_secs: u64,

    /// Eventos do histórico reaplicados ao abrir o dashboard.
    #[arg(long, env = "MLR_DASHBOARD_HISTORY_LIMIT", default_value_t = 100)]
    pub history_limit: usize,

    /// Máximo de eventos retidos no histórico (memória e disco).
    #[arg(long, env = "MLR_DASHBOARD_HISTORY_CAP", default_value_t = DEFAULT_HISTORY_CAP)]
    pub history_cap: usize,
}

impl Config {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            idle_timeout: Duration::from_secs(self.idle_secs),
            history_limit: self.history_limit.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::try_parse_from(["mlr-dashboard"]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.session().idle_timeout, Duration::from_secs(10));
        assert_eq!(config.session().history_limit, 100);
        assert_eq!(config.history_cap, DEFAULT_HISTORY_CAP);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "mlr-dashboard",
            "--port",
            "8080",
            "--idle-secs",
            "3",
            "--history-limit",
            "0",
            "--history-cap",
            "200",
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.session().idle_timeout, Duration::from_secs(3));
        assert_eq!(config.session().history_limit, 1);
        assert_eq!(config.history_cap, 200);
    }
}
