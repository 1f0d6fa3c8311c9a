//! # Porta de Renderização
//!
//! O controlador nunca fala com o DOM diretamente: ele decide o novo
//! estado e chama um [`RenderPort`]. Em produção a porta é o
//! [`crate::web::render::HtmlPatchRenderer`], que transforma cada chamada
//! em um patch HTML enviado via SSE; nos testes é um gravador em memória.

use super::view::{DetailView, EventLog, ScoreBoard, StageView, StatsView};
use crate::core::StageId;

/// Destino das atualizações de tela do controlador.
///
/// Cada método recebe o estado **completo** do elemento que mudou,
/// não um delta: o renderer pode reescrever o elemento inteiro.
pub trait RenderPort {
    /// Card do estágio: classe visual, rótulo de status e painel de dados.
    fn render_stage(&mut self, stage: StageId, view: &StageView);

    /// Painel de notas da avaliação.
    fn render_scores(&mut self, scores: &ScoreBoard);

    /// Log de eventos, do mais novo para o mais antigo.
    fn render_log(&mut self, log: &EventLog);

    /// Barra de estatísticas e indicadores de conexão/cliente.
    fn render_stats(&mut self, stats: &StatsView);

    /// Modal de detalhes; `None` fecha o modal.
    fn render_detail(&mut self, detail: Option<&DetailView>);

    /// Faixa de erro para falhas de operações do usuário; `None` remove.
    fn render_banner(&mut self, banner: Option<&str>);
}
