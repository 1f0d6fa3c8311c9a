//! # Timer de Ociosidade
//!
//! Marca o cliente do pipeline como ocioso depois de um período sem
//! eventos. A semântica é de *debounce*: cada evento cancela o prazo
//! pendente e arma um novo.
//!
//! ```text
//! t=0   evento → prazo = 10s
//! t=5   evento → prazo = 15s   (o prazo de 10s deixa de existir)
//! t=15  sem eventos → ocioso
//! ```
//!
//! O timer é só um prazo (`Option<Instant>`). Quem espera é o loop da
//! sessão, via `tokio::time::sleep_until(deadline)`; assim existe no
//! máximo um disparo pendente por sessão.

use std::time::{Duration, Instant};

/// Período padrão sem eventos até o cliente ser considerado ocioso.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct IdleTimer {
    timeout: Duration,
    deadline: Option<Instant>,
}

impl IdleTimer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            deadline: None,
        }
    }

    /// Cancela o prazo pendente (se houver) e arma um novo a partir de `now`.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Retorna `true` uma única vez, quando `now` alcança o prazo armado.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for IdleTimer {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn fires_once_after_timeout() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::default();
        timer.arm(t0);
        assert!(!timer.fire_if_due(t0 + 9 * SEC));
        assert!(timer.fire_if_due(t0 + 10 * SEC));
        assert!(!timer.fire_if_due(t0 + 11 * SEC));
    }

    #[test]
    fn rearm_pushes_deadline() {
        let t0 = Instant::now();
        let mut timer = IdleTimer::default();
        timer.arm(t0);
        timer.arm(t0 + 5 * SEC);
        assert!(!timer.fire_if_due(t0 + 10 * SEC));
        assert_eq!(timer.deadline(), Some(t0 + 15 * SEC));
        assert!(timer.fire_if_due(t0 + 15 * SEC));
    }
}
