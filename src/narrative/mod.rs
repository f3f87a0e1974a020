//! Coaching narratives produced by an external text generator.
//!
//! Generated text is presentation only; nothing here feeds back into scoring.

mod command;
mod prompts;

pub use command::CommandGenerator;
pub use prompts::{
    feedback_prompt, insight_prompt, progress_prompt, recommendations_prompt, Skill,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::history::History;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NarrativeError {
    /// The generator could not be started or fed
    #[error("narrative generator unavailable: {0}")]
    Unavailable(String),

    #[error("narrative generator failed (exit {status:?}): {message}")]
    Failed {
        status: Option<i32>,
        message: String,
    },

    /// Output did not match the expected shape; `raw` keeps the text for display
    #[error("could not parse generator output: {reason}")]
    Malformed { reason: String, raw: String },

    #[error("no assessments recorded yet")]
    NoHistory,
}

/// Turns a prompt into text. Implementations may block.
pub trait NarrativeGenerator {
    fn generate(&self, prompt: &str) -> Result<String, NarrativeError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub resource: String,
}

/// Remove a surrounding ``` or ```json fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let rest = &trimmed[start + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    match rest.find("```") {
        Some(end) => rest[..end].trim(),
        None => trimmed,
    }
}

/// Decode the JSON recommendation list a generator returns.
pub fn parse_recommendations(raw: &str) -> Result<Vec<Recommendation>, NarrativeError> {
    let json = strip_code_fence(raw);
    serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, "failed to parse recommendations");
        NarrativeError::Malformed {
            reason: e.to_string(),
            raw: raw.to_string(),
        }
    })
}

pub fn recommend(
    generator: &dyn NarrativeGenerator,
    skills: &[Skill],
    completed_quests: &[String],
) -> Result<Vec<Recommendation>, NarrativeError> {
    let raw = generator.generate(&recommendations_prompt(skills, completed_quests))?;
    parse_recommendations(&raw)
}

/// Narrative comparing the latest assessment with the one before it.
///
/// With a single record the latest score stands in for the previous one.
pub fn analyze_progress(
    generator: &dyn NarrativeGenerator,
    history: &History,
) -> Result<String, NarrativeError> {
    let latest = history.latest().ok_or(NarrativeError::NoHistory)?;
    let previous = history.previous().unwrap_or(latest);
    let prompt = progress_prompt(
        previous.score,
        latest.score,
        &latest.strengths,
        &latest.weaknesses,
    );
    generator.generate(&prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{
        AnswerSet, CategoryId, CategoryScore, CategoryScores, ClassificationResult, Selection, Tier,
    };
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;

    /// Records prompts and replies with a fixed text.
    struct Canned {
        reply: String,
        prompts: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl NarrativeGenerator for Canned {
        fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    fn result(score: u8) -> ClassificationResult {
        let tier = Tier::from_percentage(score as f64);
        let category = CategoryScore {
            category: CategoryId::new("technical"),
            label: "기술적 이해와 활용".to_string(),
            score,
        };
        ClassificationResult {
            score,
            percentage: score as f64,
            tier,
            category_scores: CategoryScores::from_iter([category.clone()]),
            risk_factors: vec![],
            opportunities: vec![],
            strengths: vec![category.clone()],
            weaknesses: vec![category],
        }
    }

    #[test]
    fn test_parse_plain_json() {
        let raw = r#"[{"title": "A", "description": "B", "resource": "C"}]"#;
        let recs = parse_recommendations(raw).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].resource, "C");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n[{\"title\": \"A\", \"description\": \"B\", \"resource\": \"C\"}]\n```";
        assert_eq!(parse_recommendations(raw).unwrap()[0].title, "A");

        let raw = "Here you go:\n```\n[]\n```\n";
        assert!(parse_recommendations(raw).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_keeps_raw() {
        let raw = "I cannot help with that";
        match parse_recommendations(raw) {
            Err(NarrativeError::Malformed { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_analyze_progress_requires_history() {
        let generator = Canned::new("text");
        assert_eq!(
            analyze_progress(&generator, &History::new()),
            Err(NarrativeError::NoHistory)
        );
        assert!(generator.prompts.borrow().is_empty());
    }

    #[test]
    fn test_analyze_progress_single_record_uses_same_score() {
        let mut history = History::new();
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        history.record(&result(58), &AnswerSet::new(), &Selection::general(), now);

        let generator = Canned::new("잘하고 있습니다");
        let text = analyze_progress(&generator, &history).unwrap();
        assert_eq!(text, "잘하고 있습니다");
        let prompts = generator.prompts.borrow();
        assert!(prompts[0].contains("이전 평가 점수: 58/100"));
        assert!(prompts[0].contains("현재 평가 점수: 58/100"));
    }

    #[test]
    fn test_analyze_progress_compares_latest_two() {
        let mut history = History::new();
        let day = |d| Utc.with_ymd_and_hms(2026, 1, d, 9, 0, 0).unwrap();
        history.record(&result(40), &AnswerSet::new(), &Selection::general(), day(1));
        history.record(&result(66), &AnswerSet::new(), &Selection::general(), day(8));

        let generator = Canned::new("ok");
        analyze_progress(&generator, &history).unwrap();
        let prompts = generator.prompts.borrow();
        assert!(prompts[0].contains("이전 평가 점수: 40/100"));
        assert!(prompts[0].contains("현재 평가 점수: 66/100"));
        assert!(prompts[0].contains("강점: 기술적 이해와 활용"));
    }

    #[test]
    fn test_recommend_parses_generator_output() {
        let generator = Canned::new(
            r#"[{"title": "프롬프트 연습", "description": "d", "resource": "r"}]"#,
        );
        let skills = vec![Skill {
            name: "기술".to_string(),
            score: 50,
        }];
        let recs = recommend(&generator, &skills, &[]).unwrap();
        assert_eq!(recs[0].title, "프롬프트 연습");
    }
}
