//! # Estágios do Pipeline de Pesquisa
//!
//! Define [`StageId`] (as seis fases fixas do pipeline) e [`EventKind`]
//! (os cinco tipos de evento que um agente emite).
//!
//! ## Ordem do Pipeline
//!
//! ```text
//! idea → literature → proposal → experiment → paper → evaluation
//! ```
//!
//! Ambos chegam pelo fio como strings livres (`"stage": "idea"`). O parsing é
//! feito por [`StageId::parse`] / [`EventKind::parse`], que retornam `None` para
//! valores desconhecidos: o dashboard ignora silenciosamente estágios que não
//! conhece em vez de rejeitar o evento inteiro.

use std::fmt;

/// Identificador de um estágio do pipeline de pesquisa.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageId {
    Idea,
    Literature,
    Proposal,
    Experiment,
    Paper,
    Evaluation,
}

impl StageId {
    /// Número de estágios conhecidos.
    pub const COUNT: usize = 6;

    /// Todos os estágios, na ordem do pipeline.
    pub const ALL: [StageId; Self::COUNT] = [
        StageId::Idea,
        StageId::Literature,
        StageId::Proposal,
        StageId::Experiment,
        StageId::Paper,
        StageId::Evaluation,
    ];

    /// Converte o identificador do fio (`"idea"`, `"paper"`, ...) em estágio.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "idea" => Some(StageId::Idea),
            "literature" => Some(StageId::Literature),
            "proposal" => Some(StageId::Proposal),
            "experiment" => Some(StageId::Experiment),
            "paper" => Some(StageId::Paper),
            "evaluation" => Some(StageId::Evaluation),
            _ => None,
        }
    }

    /// Identificador usado no fio e nos ids do DOM (`stage-<id>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            StageId::Idea => "idea",
            StageId::Literature => "literature",
            StageId::Proposal => "proposal",
            StageId::Experiment => "experiment",
            StageId::Paper => "paper",
            StageId::Evaluation => "evaluation",
        }
    }

    /// Posição do estágio em [`StageId::ALL`], usada para indexar arrays.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Nome do agente responsável, exibido no título do modal de detalhes.
    pub fn display_name(&self) -> &'static str {
        match self {
            StageId::Idea => "Idea Generator",
            StageId::Literature => "Literature Reviewer",
            StageId::Proposal => "Proposal Writer",
            StageId::Experiment => "Experimenter",
            StageId::Paper => "Paper Writer",
            StageId::Evaluation => "Evaluator (Judge)",
        }
    }

    /// Rótulo curto exibido no card do estágio.
    pub fn card_title(&self) -> &'static str {
        match self {
            StageId::Idea => "Idea",
            StageId::Literature => "Literature",
            StageId::Proposal => "Proposal",
            StageId::Experiment => "Experiment",
            StageId::Paper => "Paper",
            StageId::Evaluation => "Evaluation",
        }
    }

    /// System prompt do agente do estágio, mostrado no modal.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            StageId::Idea => IDEA_PROMPT,
            StageId::Literature => LITERATURE_PROMPT,
            StageId::Proposal => PROPOSAL_PROMPT,
            StageId::Experiment => EXPERIMENT_PROMPT,
            StageId::Paper => PAPER_PROMPT,
            StageId::Evaluation => EVALUATION_PROMPT,
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de evento emitido por um agente.
///
/// `Started`, `Completed` e `Error` mudam o estado visual do estágio;
/// `Input` e `Output` apenas anotam dados no card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Started,
    Completed,
    Error,
    Input,
    Output,
}

impl EventKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "started" => Some(EventKind::Started),
            "completed" => Some(EventKind::Completed),
            "error" => Some(EventKind::Error),
            "input" => Some(EventKind::Input),
            "output" => Some(EventKind::Output),
            _ => None,
        }
    }
}

// ─── System prompts por agente ───────────────────────────────────

const IDEA_PROMPT: &str = "You are a creative AI research scientist. Generate a novel research idea.

Generate a research idea that includes:
1. A clear and concise title
2. Motivation: Why is this research important?
3. Main idea: What is the core concept?
4. Methodology: How would you approach this?
5. Expected outcomes: What results do you anticipate?

Be creative, novel, and feasible.";

const LITERATURE_PROMPT: &str = "You are an expert research assistant conducting a literature review.

Conduct a literature review that includes:
1. Key findings from related work
2. Identification of the research gap
3. Summary of how existing work relates to this idea

Provide a comprehensive review that situates this research idea in the current state of the field.";

const PROPOSAL_PROMPT: &str = "You are an experienced research scientist writing a detailed research proposal.

Write a complete research proposal with the following sections:
1. Abstract (150-200 words)
2. Introduction (explaining the problem and motivation)
3. Related Work (building on the literature review)
4. Methodology (detailed approach and techniques)
5. Expected Results (anticipated outcomes)
6. Experimental Plan (how to validate the approach)

Write in a clear, academic style suitable for a top-tier ML conference.";

const EXPERIMENT_PROMPT: &str = "You are an expert ML engineer implementing research experiments.

Generate Python code to implement the proposed experiments. Include:
1. Data loading and preprocessing
2. Model implementation
3. Training loop
4. Evaluation metrics
5. Result logging

Use PyTorch or TensorFlow. Keep code modular and well-documented.";

const PAPER_PROMPT: &str = "You are an accomplished research scientist writing a conference paper.

Write a complete research paper with these sections:
1. Abstract
2. Introduction
3. Related Work
4. Methodology
5. Experiments
6. Results
7. Discussion
8. Conclusion
9. References

Write in the style of a top-tier ML conference paper (ICLR, NeurIPS, ICML).";

const EVALUATION_PROMPT: &str = "You are an expert reviewer evaluating research work.

Evaluate the research on multiple criteria:
1. Novelty and originality
2. Technical soundness
3. Clarity and presentation
4. Experimental validation
5. Significance and impact

Provide scores (1-10) and detailed feedback for each criterion.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_known_stage() {
        for stage in StageId::ALL {
            assert_eq!(StageId::parse(stage.as_str()), Some(stage));
        }
    }

    #[test]
    fn unknown_stage_is_none() {
        assert_eq!(StageId::parse("deployment"), None);
        assert_eq!(StageId::parse("Idea"), None);
    }

    #[test]
    fn index_matches_pipeline_order() {
        for (i, stage) in StageId::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn unknown_event_kind_is_none() {
        assert_eq!(EventKind::parse("progress"), None);
        assert_eq!(EventKind::parse("output"), Some(EventKind::Output));
    }
}
