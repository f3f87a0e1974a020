use serde::{Deserialize, Serialize};

use crate::quest::QuestGroup;
use crate::roadmap::Roadmap;

/// A single Likert-scale statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Shown under the statement while answering
    #[serde(default)]
    pub help_text: String,
}

/// A general-mode category with its own questions and report notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryDef {
    pub id: String,
    pub label: String,
    /// Report sentence when the category is a strength
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength_note: Option<String>,
    /// Report sentence when the category is a weakness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weakness_note: Option<String>,
    pub questions: Vec<Question>,
}

/// Adaptation strategy shown for a job or industry result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Strategy {
    pub title: String,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub outlook: Vec<String>,
}

/// A job- or industry-specific question list, scored as one aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecializedDef {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    pub questions: Vec<Question>,
}

/// Everything the assessment needs that is content rather than logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionCatalog {
    pub general: Vec<CategoryDef>,
    #[serde(default)]
    pub jobs: Vec<SpecializedDef>,
    #[serde(default)]
    pub industries: Vec<SpecializedDef>,
    #[serde(default)]
    pub roadmaps: Vec<Roadmap>,
    #[serde(default)]
    pub quests: Vec<QuestGroup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_catalog_parses() {
        let yaml = r#"
general:
  - id: general
    label: "General"
    questions:
      - id: g1
        text: "I use AI tools"
"#;
        let catalog: QuestionCatalog = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(catalog.general.len(), 1);
        assert_eq!(catalog.general[0].questions[0].help_text, "");
        assert!(catalog.general[0].strength_note.is_none());
        assert!(catalog.jobs.is_empty());
        assert!(catalog.roadmaps.is_empty());
        assert!(catalog.quests.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
general:
  - id: general
    label: "General"
    weight: 2
    questions: []
"#;
        let result: Result<QuestionCatalog, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_quest_group_parses() {
        let yaml = r#"
general: []
quests:
  - id: insight
    title: "Insight"
    quests:
      - id: insight-1
        title: "Weekly news"
        difficulty: "중간"
        time: "1시간"
        reward: "+10"
        steps: ["Summarize", "Reflect"]
"#;
        let catalog: QuestionCatalog = serde_saphyr::from_str(yaml).unwrap();
        let quest = &catalog.quests[0].quests[0];
        assert_eq!(quest.steps, vec!["Summarize".to_string(), "Reflect".to_string()]);
        assert_eq!(quest.description, "");
    }

    #[test]
    fn test_specialized_strategy_parses() {
        let yaml = r#"
general: []
jobs:
  - id: developer
    title: "Developer"
    strategy:
      title: "Strategy"
      insights: ["a", "b"]
    questions:
      - { id: dev1, text: "Question" }
"#;
        let catalog: QuestionCatalog = serde_saphyr::from_str(yaml).unwrap();
        let strategy = catalog.jobs[0].strategy.as_ref().unwrap();
        assert_eq!(strategy.insights.len(), 2);
        assert!(strategy.outlook.is_empty());
    }
}
