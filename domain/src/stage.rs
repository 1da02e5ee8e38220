//! Discussion stage machinery
//!
//! The roundtable runs a fixed, ordered stage sequence. Each stage has a
//! designated leader persona; the closing stage is a synthesis step rather
//! than a peer round.

use crate::persona::AgentRole;
use serde::{Deserialize, Serialize};

/// One phase of the fixed discussion sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ProblemPresentation,
    LiteratureReview,
    StudyDesign,
    StatisticalPlan,
    ExecutionPlan,
    Consensus,
}

impl Stage {
    /// The full stage sequence in execution order
    pub const SEQUENCE: [Stage; 6] = [
        Stage::ProblemPresentation,
        Stage::LiteratureReview,
        Stage::StudyDesign,
        Stage::StatisticalPlan,
        Stage::ExecutionPlan,
        Stage::Consensus,
    ];

    /// Stage to run for a given zero-based position in the sequence
    pub fn at(index: usize) -> Option<Stage> {
        Stage::SEQUENCE.get(index).copied()
    }

    /// The persona that opens this stage
    pub fn leader(&self) -> AgentRole {
        match self {
            Stage::ProblemPresentation => AgentRole::ClinicalDirector,
            Stage::LiteratureReview => AgentRole::PhdStudent,
            Stage::StudyDesign => AgentRole::Epidemiologist,
            Stage::StatisticalPlan => AgentRole::Statistician,
            Stage::ExecutionPlan => AgentRole::ResearchNurse,
            Stage::Consensus => AgentRole::ClinicalDirector,
        }
    }

    /// Whether this stage is the closing synthesis step
    pub fn is_synthesis(&self) -> bool {
        matches!(self, Stage::Consensus)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ProblemPresentation => "problem_presentation",
            Stage::LiteratureReview => "literature_review",
            Stage::StudyDesign => "study_design",
            Stage::StatisticalPlan => "statistical_plan",
            Stage::ExecutionPlan => "execution_plan",
            Stage::Consensus => "consensus",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::ProblemPresentation => "问题提出",
            Stage::LiteratureReview => "文献回顾",
            Stage::StudyDesign => "研究设计",
            Stage::StatisticalPlan => "统计计划",
            Stage::ExecutionPlan => "执行计划",
            Stage::Consensus => "共识总结",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Label attached to a generated turn
///
/// Either a pipeline stage or one of the out-of-band turn kinds: a free-form
/// reply, a reply to a user intervention, or the closing summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStage {
    ProblemPresentation,
    LiteratureReview,
    StudyDesign,
    StatisticalPlan,
    ExecutionPlan,
    General,
    UserIntervention,
    Summary,
}

impl TurnStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStage::ProblemPresentation => "problem_presentation",
            TurnStage::LiteratureReview => "literature_review",
            TurnStage::StudyDesign => "study_design",
            TurnStage::StatisticalPlan => "statistical_plan",
            TurnStage::ExecutionPlan => "execution_plan",
            TurnStage::General => "general",
            TurnStage::UserIntervention => "user_intervention",
            TurnStage::Summary => "summary",
        }
    }
}

impl From<Stage> for TurnStage {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::ProblemPresentation => TurnStage::ProblemPresentation,
            Stage::LiteratureReview => TurnStage::LiteratureReview,
            Stage::StudyDesign => TurnStage::StudyDesign,
            Stage::StatisticalPlan => TurnStage::StatisticalPlan,
            Stage::ExecutionPlan => TurnStage::ExecutionPlan,
            Stage::Consensus => TurnStage::Summary,
        }
    }
}

impl std::fmt::Display for TurnStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed context for one generated turn
///
/// Carries the session identity a persona needs to stay on topic, passed
/// explicitly into the responder instead of being smuggled through message
/// metadata.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub stage: TurnStage,
    pub round: u32,
    pub title: String,
    pub clinical_question: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_covers_all_leaders() {
        assert_eq!(Stage::SEQUENCE.len(), 6);
        assert_eq!(Stage::SEQUENCE[0].leader(), AgentRole::ClinicalDirector);
        assert_eq!(Stage::SEQUENCE[5].leader(), AgentRole::ClinicalDirector);
        assert!(Stage::SEQUENCE[5].is_synthesis());
        assert!(!Stage::SEQUENCE[4].is_synthesis());
    }

    #[test]
    fn test_at_past_end_is_none() {
        assert_eq!(Stage::at(6), None);
        assert_eq!(Stage::at(0), Some(Stage::ProblemPresentation));
    }

    #[test]
    fn test_consensus_maps_to_summary_label() {
        assert_eq!(TurnStage::from(Stage::Consensus), TurnStage::Summary);
        assert_eq!(TurnStage::from(Stage::StudyDesign).as_str(), "study_design");
    }
}
