//! Persona domain model
//!
//! Fixed simulated participants of the roundtable. Every persona has an
//! identity, a behavior prompt and a keyword affinity set used to route
//! user interventions.

mod registry;

pub use registry::PersonaRegistry;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role of a roundtable participant (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    ClinicalDirector,
    PhdStudent,
    Epidemiologist,
    Statistician,
    ResearchNurse,
}

impl AgentRole {
    /// All roles in fixed registry order
    pub const ALL: [AgentRole; 5] = [
        AgentRole::ClinicalDirector,
        AgentRole::PhdStudent,
        AgentRole::Epidemiologist,
        AgentRole::Statistician,
        AgentRole::ResearchNurse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::ClinicalDirector => "clinical_director",
            AgentRole::PhdStudent => "phd_student",
            AgentRole::Epidemiologist => "epidemiologist",
            AgentRole::Statistician => "statistician",
            AgentRole::ResearchNurse => "research_nurse",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clinical_director" => Ok(AgentRole::ClinicalDirector),
            "phd_student" => Ok(AgentRole::PhdStudent),
            "epidemiologist" => Ok(AgentRole::Epidemiologist),
            "statistician" => Ok(AgentRole::Statistician),
            "research_nurse" => Ok(AgentRole::ResearchNurse),
            other => Err(format!("unknown persona role: {}", other)),
        }
    }
}

/// A fixed roundtable participant
///
/// Built once at process start from the static registry table and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct Persona {
    /// Role identifier
    pub role: AgentRole,
    /// Display name
    pub name: &'static str,
    /// Avatar token shown by presentation layers
    pub avatar: &'static str,
    /// Behavior prompt used as the system instruction for generation
    pub system_prompt: &'static str,
    /// Expertise tags
    pub expertise: &'static [&'static str],
    /// Keyword affinities for routing user interventions.
    /// Matched case-insensitively as substrings.
    pub keywords: &'static [&'static str],
}

impl Persona {
    /// Count keyword occurrences in the given content.
    ///
    /// Every occurrence counts, so a message that repeats a keyword scores
    /// higher than one that mentions it once.
    pub fn affinity_score(&self, content: &str) -> usize {
        let content = content.to_lowercase();
        self.keywords
            .iter()
            .map(|kw| content.matches(&kw.to_lowercase()).count())
            .sum()
    }

    /// Summary view for listing endpoints
    pub fn summary(&self) -> PersonaSummary {
        PersonaSummary {
            role: self.role,
            name: self.name.to_string(),
            avatar: self.avatar.to_string(),
            expertise: self.expertise.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Owned persona summary exposed to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub role: AgentRole,
    pub name: String,
    pub avatar: String,
    pub expertise: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in AgentRole::ALL {
            assert_eq!(role.as_str().parse::<AgentRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_fails() {
        assert!("imaging_specialist".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_affinity_counts_every_occurrence() {
        let persona = PersonaRegistry::get(AgentRole::Statistician);
        let once = persona.affinity_score("样本量怎么定");
        let twice = persona.affinity_score("样本量：每组的样本量如何计算");
        assert!(once >= 1);
        assert!(twice > once);
    }
}
