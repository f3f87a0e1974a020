pub mod answers;
pub mod engine;
pub mod error;
pub mod schema;
pub mod tier;

pub use answers::{likert, load_answers, save_answers, AnswerSet, LIKERT_MAX, LIKERT_MIN};
pub use engine::{
    classify, classify_specialized, compute_category_scores, compute_overall_score,
    derive_strengths_and_weaknesses, evaluate, evaluate_schema, progress, CategoryScore,
    CategoryScores, ClassificationResult, OverallScore, Progress, STRENGTH_MIN, WEAKNESS_MAX,
};
pub use error::{AnswerProblem, ScoringError};
pub use schema::{CategoryId, Mode, Schema, Section, Selection};
pub use tier::Tier;
