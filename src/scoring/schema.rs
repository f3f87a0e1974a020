use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::{CategoryDef, Question, SpecializedDef};

/// Which question set an assessment uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every category of the general schema
    #[default]
    #[serde(alias = "basic")]
    #[value(alias = "basic")]
    General,
    /// A single job-specific question list
    Job,
    /// A single industry-specific question list
    Industry,
}

impl Mode {
    /// What the selector names in this mode, used in error messages.
    pub fn selector_kind(&self) -> &'static str {
        match self {
            Mode::General => "category",
            Mode::Job => "job type",
            Mode::Industry => "industry type",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::General => "general",
            Mode::Job => "job",
            Mode::Industry => "industry",
        };
        f.write_str(s)
    }
}

/// Active mode plus, for the specialized modes, the job or industry key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

impl Selection {
    pub fn general() -> Self {
        Self {
            mode: Mode::General,
            selector: None,
        }
    }

    pub fn job(key: impl Into<String>) -> Self {
        Self {
            mode: Mode::Job,
            selector: Some(key.into()),
        }
    }

    pub fn industry(key: impl Into<String>) -> Self {
        Self {
            mode: Mode::Industry,
            selector: Some(key.into()),
        }
    }
}

/// Category key, only constructed from a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub(crate) fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The question schema active for one assessment.
///
/// General mode scores per category; specialized modes are a single aggregate.
#[derive(Debug, Clone, Copy)]
pub enum Schema<'a> {
    General(&'a [CategoryDef]),
    Specialized(&'a SpecializedDef),
}

/// An ordered run of questions shown together: a general category, or the
/// whole specialized list.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub id: &'a str,
    pub label: &'a str,
    pub questions: &'a [Question],
}

impl<'a> Schema<'a> {
    pub fn sections(&self) -> Vec<Section<'a>> {
        match *self {
            Schema::General(categories) => categories
                .iter()
                .map(|c| Section {
                    id: &c.id,
                    label: &c.label,
                    questions: &c.questions,
                })
                .collect(),
            Schema::Specialized(def) => vec![Section {
                id: &def.id,
                label: &def.title,
                questions: &def.questions,
            }],
        }
    }

    /// Every question in presentation order.
    pub fn questions(&self) -> Vec<&'a Question> {
        match *self {
            Schema::General(categories) => {
                categories.iter().flat_map(|c| c.questions.iter()).collect()
            }
            Schema::Specialized(def) => def.questions.iter().collect(),
        }
    }

    pub fn question_count(&self) -> usize {
        match *self {
            Schema::General(categories) => categories.iter().map(|c| c.questions.len()).sum(),
            Schema::Specialized(def) => def.questions.len(),
        }
    }

    pub fn contains_question(&self, id: &str) -> bool {
        self.questions().iter().any(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Question;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            help_text: String::new(),
        }
    }

    fn category(id: &str, ids: &[&str]) -> CategoryDef {
        CategoryDef {
            id: id.to_string(),
            label: id.to_uppercase(),
            strength_note: None,
            weakness_note: None,
            questions: ids.iter().map(|q| question(q)).collect(),
        }
    }

    #[test]
    fn test_general_schema_flattens_in_order() {
        let categories = vec![category("a", &["a1", "a2"]), category("b", &["b1"])];
        let schema = Schema::General(&categories);
        let ids: Vec<_> = schema.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
        assert_eq!(schema.question_count(), 3);
        assert_eq!(schema.sections().len(), 2);
        assert!(schema.contains_question("b1"));
        assert!(!schema.contains_question("c1"));
    }

    #[test]
    fn test_specialized_schema_is_single_section() {
        let def = SpecializedDef {
            id: "developer".to_string(),
            title: "Developer".to_string(),
            strategy: None,
            questions: vec![question("dev1"), question("dev2")],
        };
        let schema = Schema::Specialized(&def);
        let sections = schema.sections();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "developer");
        assert_eq!(schema.question_count(), 2);
    }

    #[test]
    fn test_mode_accepts_basic_alias() {
        let mode: Mode = serde_json::from_str("\"basic\"").unwrap();
        assert_eq!(mode, Mode::General);
        assert_eq!(Mode::Industry.to_string(), "industry");
    }
}
