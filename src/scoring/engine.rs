use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::answers::{AnswerSet, LIKERT_MAX};
use super::error::ScoringError;
use super::schema::{CategoryId, Schema, Selection};
use super::tier::Tier;
use crate::catalog::{CategoryDef, QuestionCatalog};

/// Category scores at or above this are strengths.
pub const STRENGTH_MIN: u8 = 70;
/// Category scores at or below this are weaknesses. (50, 70) is neither.
pub const WEAKNESS_MAX: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    /// `percentage` rounded to the nearest integer
    pub score: u8,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: CategoryId,
    pub label: String,
    pub score: u8,
}

/// Per-category percentages in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryScores(Vec<CategoryScore>);

impl CategoryScores {
    pub fn get(&self, category: &str) -> Option<u8> {
        self.0
            .iter()
            .find(|c| c.category.as_str() == category)
            .map(|c| c.score)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryScore> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Category id to score, the shape stored with history records.
    pub fn to_map(&self) -> BTreeMap<String, u8> {
        self.0
            .iter()
            .map(|c| (c.category.to_string(), c.score))
            .collect()
    }
}

impl FromIterator<CategoryScore> for CategoryScores {
    fn from_iter<I: IntoIterator<Item = CategoryScore>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of a completed assessment. Recomputing produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub score: u8,
    pub percentage: f64,
    pub tier: Tier,
    pub category_scores: CategoryScores,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    pub strengths: Vec<CategoryScore>,
    pub weaknesses: Vec<CategoryScore>,
}

/// Answered count and running score for a partially completed session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub score: u8,
}

fn percent(sum: u32, questions: usize) -> f64 {
    (sum as f64 * 100.0) / (questions as f64 * LIKERT_MAX as f64)
}

/// Overall percentage across the schema.
///
/// Unanswered questions add nothing but still count toward the maximum, so the
/// same formula serves live progress and the final score.
pub fn compute_overall_score(
    answers: &AnswerSet,
    schema: &Schema,
) -> Result<OverallScore, ScoringError> {
    let questions = schema.questions();
    if questions.is_empty() {
        return Err(ScoringError::Configuration(
            "active schema has no questions".to_string(),
        ));
    }

    let mut sum = 0u32;
    for question in &questions {
        if let Some(value) = answers.checked(&question.id)? {
            sum += value as u32;
        }
    }

    let percentage = percent(sum, questions.len());
    debug!(sum, questions = questions.len(), percentage, "overall score");
    Ok(OverallScore {
        score: percentage.round() as u8,
        percentage,
    })
}

/// Per-category percentages over answered questions only.
///
/// A partially answered category is scored over what was answered; a category
/// with no answers scores 0.
pub fn compute_category_scores(
    answers: &AnswerSet,
    categories: &[CategoryDef],
) -> Result<CategoryScores, ScoringError> {
    let mut scores = Vec::with_capacity(categories.len());
    for category in categories {
        let mut total = 0u32;
        let mut answered = 0usize;
        for question in &category.questions {
            if let Some(value) = answers.checked(&question.id)? {
                total += value as u32;
                answered += 1;
            }
        }

        let score = if answered > 0 {
            percent(total, answered).round() as u8
        } else {
            0
        };
        scores.push(CategoryScore {
            category: CategoryId::new(&category.id),
            label: category.label.clone(),
            score,
        });
    }
    Ok(CategoryScores(scores))
}

/// Map a percentage onto the tier ladder.
pub fn classify(percentage: f64) -> Tier {
    Tier::from_percentage(percentage)
}

/// Tier for a specialized (job or industry) aggregate; same ladder as general mode.
pub fn classify_specialized(percentage: f64) -> Tier {
    Tier::from_percentage(percentage)
}

/// Split categories into strengths (>= 70) and weaknesses (<= 50).
///
/// An empty list falls back to the single highest (strengths) or lowest
/// (weaknesses) category. Among equal scores the first in schema order wins.
pub fn derive_strengths_and_weaknesses(
    scores: &CategoryScores,
) -> (Vec<CategoryScore>, Vec<CategoryScore>) {
    let mut strengths: Vec<CategoryScore> = scores
        .iter()
        .filter(|c| c.score >= STRENGTH_MIN)
        .cloned()
        .collect();
    let mut weaknesses: Vec<CategoryScore> = scores
        .iter()
        .filter(|c| c.score <= WEAKNESS_MAX)
        .cloned()
        .collect();

    if strengths.is_empty() {
        let highest = scores
            .iter()
            .reduce(|best, c| if c.score > best.score { c } else { best });
        if let Some(highest) = highest {
            debug!(category = %highest.category, "no strengths above threshold, using highest");
            strengths.push(highest.clone());
        }
    }

    if weaknesses.is_empty() {
        let lowest = scores
            .iter()
            .reduce(|worst, c| if c.score < worst.score { c } else { worst });
        if let Some(lowest) = lowest {
            debug!(category = %lowest.category, "no weaknesses below threshold, using lowest");
            weaknesses.push(lowest.clone());
        }
    }

    (strengths, weaknesses)
}

/// Every schema question must carry a valid answer before classification.
fn ensure_complete(answers: &AnswerSet, schema: &Schema) -> Result<(), ScoringError> {
    for question in schema.questions() {
        if answers.checked(&question.id)?.is_none() {
            return Err(ScoringError::missing(&question.id));
        }
    }
    Ok(())
}

/// Answered count and running score; tolerates incomplete answer sets.
pub fn progress(answers: &AnswerSet, schema: &Schema) -> Result<Progress, ScoringError> {
    let overall = compute_overall_score(answers, schema)?;
    let answered = schema
        .questions()
        .iter()
        .filter(|q| answers.contains(&q.id))
        .count();
    Ok(Progress {
        answered,
        total: schema.question_count(),
        score: overall.score,
    })
}

/// Classify a complete answer set against an already resolved schema.
pub fn evaluate_schema(
    answers: &AnswerSet,
    schema: &Schema,
) -> Result<ClassificationResult, ScoringError> {
    if schema.question_count() == 0 {
        return Err(ScoringError::Configuration(
            "active schema has no questions".to_string(),
        ));
    }
    ensure_complete(answers, schema)?;

    let foreign = answers
        .iter()
        .filter(|(id, _)| !schema.contains_question(id))
        .count();
    if foreign > 0 {
        warn!(count = foreign, "ignoring answers to questions outside the active schema");
    }

    let overall = compute_overall_score(answers, schema)?;

    let (tier, category_scores) = match *schema {
        Schema::General(categories) => (
            classify(overall.percentage),
            compute_category_scores(answers, categories)?,
        ),
        Schema::Specialized(def) => (
            classify_specialized(overall.percentage),
            CategoryScores(vec![CategoryScore {
                category: CategoryId::new(&def.id),
                label: def.title.clone(),
                score: overall.score,
            }]),
        ),
    };

    let (strengths, weaknesses) = derive_strengths_and_weaknesses(&category_scores);
    debug!(score = overall.score, tier = ?tier, "classified");

    Ok(ClassificationResult {
        score: overall.score,
        percentage: overall.percentage,
        tier,
        category_scores,
        risk_factors: tier.risk_factors().iter().map(|s| s.to_string()).collect(),
        opportunities: tier.opportunities().iter().map(|s| s.to_string()).collect(),
        strengths,
        weaknesses,
    })
}

/// Resolve the selection against the catalog and classify.
pub fn evaluate(
    answers: &AnswerSet,
    catalog: &QuestionCatalog,
    selection: &Selection,
) -> Result<ClassificationResult, ScoringError> {
    let schema = catalog.resolve(selection)?;
    evaluate_schema(answers, &schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Question, SpecializedDef};
    use crate::scoring::AnswerProblem;

    const CATEGORY_IDS: [&str; 5] = ["general", "technical", "creative", "career", "mindset"];

    fn sample_categories() -> Vec<CategoryDef> {
        CATEGORY_IDS
            .iter()
            .map(|cat| CategoryDef {
                id: cat.to_string(),
                label: cat.to_uppercase(),
                strength_note: None,
                weakness_note: None,
                questions: (1..=5)
                    .map(|n| Question {
                        id: format!("{}{}", cat, n),
                        text: format!("{} question {}", cat, n),
                        help_text: String::new(),
                    })
                    .collect(),
            })
            .collect()
    }

    fn uniform_answers(categories: &[CategoryDef], value: i64) -> AnswerSet {
        categories
            .iter()
            .flat_map(|c| c.questions.iter())
            .map(|q| (q.id.clone(), value))
            .collect()
    }

    fn sample_job() -> SpecializedDef {
        SpecializedDef {
            id: "developer".to_string(),
            title: "Developer".to_string(),
            strategy: None,
            questions: (1..=5)
                .map(|n| Question {
                    id: format!("dev{}", n),
                    text: format!("dev question {}", n),
                    help_text: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_all_fives_is_leader() {
        let categories = sample_categories();
        let answers = uniform_answers(&categories, 5);
        let result = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();

        assert_eq!(result.score, 100);
        assert_eq!(result.tier, Tier::Leader);
        assert!(result.category_scores.iter().all(|c| c.score == 100));
        assert_eq!(result.strengths.len(), 5);
        // No category <= 50, so the fallback picks the first of the tied minimum
        assert_eq!(result.weaknesses.len(), 1);
        assert_eq!(result.weaknesses[0].category.as_str(), "general");
        assert_eq!(result.weaknesses[0].score, 100);
    }

    #[test]
    fn test_all_twos_is_explorer_boundary() {
        let categories = sample_categories();
        let answers = uniform_answers(&categories, 2);
        let result = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();

        assert_eq!(result.percentage, 40.0);
        assert_eq!(result.score, 40);
        assert_eq!(result.tier, Tier::Explorer);
    }

    #[test]
    fn test_all_threes_hits_dead_zone_fallback() {
        let categories = sample_categories();
        let answers = uniform_answers(&categories, 3);
        let result = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();

        assert_eq!(result.tier, Tier::Adapter);
        assert_eq!(result.strengths.len(), 1);
        assert_eq!(result.weaknesses.len(), 1);
        assert_eq!(result.strengths[0].score, 60);
        assert_eq!(result.weaknesses[0].score, 60);
    }

    #[test]
    fn test_risk_and_opportunity_lists_follow_tier() {
        let categories = sample_categories();
        let answers = uniform_answers(&categories, 1);
        let result = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();

        assert_eq!(result.tier, Tier::Beginner);
        assert_eq!(result.risk_factors.len(), 4);
        assert_eq!(result.opportunities.len(), 4);
        assert_eq!(result.risk_factors[0], Tier::Beginner.risk_factors()[0]);
    }

    #[test]
    fn test_partial_category_scored_over_answered_only() {
        let categories = sample_categories();
        let mut answers = AnswerSet::new();
        answers.record("technical1", 5).unwrap();

        let scores = compute_category_scores(&answers, &categories).unwrap();
        assert_eq!(scores.get("technical"), Some(100));
        assert_eq!(scores.get("general"), Some(0));
    }

    #[test]
    fn test_unanswered_category_is_weakness() {
        let categories = sample_categories();
        let mut answers = uniform_answers(&categories, 5);
        // Rebuild without the mindset answers
        answers = answers
            .iter()
            .filter(|(id, _)| !id.starts_with("mindset"))
            .map(|(id, v)| (id.to_string(), v))
            .collect();

        let scores = compute_category_scores(&answers, &categories).unwrap();
        let (_, weaknesses) = derive_strengths_and_weaknesses(&scores);
        assert_eq!(weaknesses.len(), 1);
        assert_eq!(weaknesses[0].category.as_str(), "mindset");
        assert_eq!(weaknesses[0].score, 0);
    }

    #[test]
    fn test_overall_score_tolerates_incomplete_answers() {
        let categories = sample_categories();
        let mut answers = AnswerSet::new();
        for n in 1..=5 {
            answers.record(format!("general{}", n), 5).unwrap();
        }
        // 25 of 125 possible points
        let overall = compute_overall_score(&answers, &Schema::General(&categories)).unwrap();
        assert_eq!(overall.score, 20);

        let progress = progress(&answers, &Schema::General(&categories)).unwrap();
        assert_eq!(progress.answered, 5);
        assert_eq!(progress.total, 25);
        assert_eq!(progress.score, 20);
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        let categories = sample_categories();
        let mut answers = uniform_answers(&categories, 3);
        // 76 of 125 = 60.8%
        answers.record("general1", 4).unwrap();
        let overall = compute_overall_score(&answers, &Schema::General(&categories)).unwrap();
        assert_eq!(overall.score, 61);
    }

    #[test]
    fn test_classification_requires_completeness() {
        let categories = sample_categories();
        let mut answers = uniform_answers(&categories, 4);
        answers = answers
            .iter()
            .filter(|(id, _)| *id != "career3")
            .map(|(id, v)| (id.to_string(), v))
            .collect();

        let err = evaluate_schema(&answers, &Schema::General(&categories)).unwrap_err();
        assert_eq!(
            err,
            ScoringError::InvalidAnswer {
                question: "career3".to_string(),
                problem: AnswerProblem::Missing,
            }
        );
    }

    #[test]
    fn test_out_of_range_value_fails_before_aggregation() {
        let categories = sample_categories();
        let mut values: Vec<(String, i64)> = uniform_answers(&categories, 4)
            .iter()
            .map(|(id, v)| (id.to_string(), v))
            .collect();
        values.push(("creative2".to_string(), 9));
        let answers: AnswerSet = values.into_iter().collect();

        let err = compute_overall_score(&answers, &Schema::General(&categories)).unwrap_err();
        assert!(matches!(
            err,
            ScoringError::InvalidAnswer {
                problem: AnswerProblem::OutOfRange(9),
                ..
            }
        ));
    }

    #[test]
    fn test_empty_schema_is_configuration_error() {
        let categories: Vec<CategoryDef> = vec![];
        let err =
            compute_overall_score(&AnswerSet::new(), &Schema::General(&categories)).unwrap_err();
        assert!(matches!(err, ScoringError::Configuration(_)));
        assert!(evaluate_schema(&AnswerSet::new(), &Schema::General(&categories)).is_err());
    }

    #[test]
    fn test_foreign_answers_are_ignored() {
        let categories = sample_categories();
        let mut answers = uniform_answers(&categories, 5);
        answers.record("dev1", 1).unwrap();
        let result = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_specialized_single_aggregate() {
        let job = sample_job();
        let answers: AnswerSet = [("dev1", 5), ("dev2", 4), ("dev3", 4), ("dev4", 3), ("dev5", 4)]
            .into_iter()
            .map(|(id, v)| (id.to_string(), v))
            .collect();

        let result = evaluate_schema(&answers, &Schema::Specialized(&job)).unwrap();
        assert_eq!(result.score, 80);
        assert_eq!(result.tier, Tier::Leader);
        assert_eq!(result.category_scores.len(), 1);
        assert_eq!(result.category_scores.get("developer"), Some(80));
        assert_eq!(result.strengths.len(), 1);
        assert_eq!(result.weaknesses.len(), 1);
    }

    #[test]
    fn test_fallback_prefers_first_in_schema_order() {
        let scores: CategoryScores = [("a", 60), ("b", 65), ("c", 65), ("d", 55), ("e", 55)]
            .into_iter()
            .map(|(id, score)| CategoryScore {
                category: CategoryId::new(id),
                label: id.to_string(),
                score,
            })
            .collect();

        let (strengths, weaknesses) = derive_strengths_and_weaknesses(&scores);
        assert_eq!(strengths.len(), 1);
        assert_eq!(strengths[0].category.as_str(), "b");
        assert_eq!(weaknesses.len(), 1);
        assert_eq!(weaknesses[0].category.as_str(), "d");
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let scores: CategoryScores = [("a", 70), ("b", 50), ("c", 69), ("d", 51)]
            .into_iter()
            .map(|(id, score)| CategoryScore {
                category: CategoryId::new(id),
                label: id.to_string(),
                score,
            })
            .collect();

        let (strengths, weaknesses) = derive_strengths_and_weaknesses(&scores);
        let strong: Vec<_> = strengths.iter().map(|c| c.category.as_str()).collect();
        let weak: Vec<_> = weaknesses.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(strong, vec!["a"]);
        assert_eq!(weak, vec!["b"]);
    }

    #[test]
    fn test_non_empty_for_every_uniform_answer() {
        let categories = sample_categories();
        for value in 1..=5 {
            let answers = uniform_answers(&categories, value);
            let result = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();
            assert!(!result.strengths.is_empty());
            assert!(!result.weaknesses.is_empty());
            assert!(result.score <= 100);
            assert!(result.category_scores.iter().all(|c| c.score <= 100));
        }
    }

    #[test]
    fn test_deterministic() {
        let categories = sample_categories();
        let mut answers = uniform_answers(&categories, 2);
        answers.record("creative4", 5).unwrap();
        answers.record("career1", 1).unwrap();
        let first = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();
        let second = evaluate_schema(&answers, &Schema::General(&categories)).unwrap();
        assert_eq!(first, second);
    }
}
