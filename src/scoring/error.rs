use thiserror::Error;

/// Failures raised by the scoring engine.
///
/// The engine performs no I/O, so none of these are retryable; callers decide
/// what to show the user (e.g. keep the results view locked until every
/// question is answered).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The active schema has no questions, so there is no denominator.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A category, job type or industry type key is absent from the catalog.
    #[error("unknown {kind}: '{key}'")]
    UnknownCategory { kind: &'static str, key: String },

    /// An answer is missing where completeness is required, or is not a 1-5 integer.
    #[error("invalid answer for question '{question}': {problem}")]
    InvalidAnswer {
        question: String,
        problem: AnswerProblem,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AnswerProblem {
    #[error("no answer recorded")]
    Missing,
    #[error("value {0} is outside the 1-5 scale")]
    OutOfRange(i64),
}

impl ScoringError {
    pub(crate) fn missing(question: &str) -> Self {
        ScoringError::InvalidAnswer {
            question: question.to_string(),
            problem: AnswerProblem::Missing,
        }
    }

    pub(crate) fn out_of_range(question: &str, value: i64) -> Self {
        ScoringError::InvalidAnswer {
            question: question.to_string(),
            problem: AnswerProblem::OutOfRange(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_category_names_key() {
        let err = ScoringError::UnknownCategory {
            kind: "job type",
            key: "astronaut".to_string(),
        };
        assert_eq!(err.to_string(), "unknown job type: 'astronaut'");
    }

    #[test]
    fn test_invalid_answer_message() {
        let err = ScoringError::out_of_range("g1", 7);
        assert_eq!(
            err.to_string(),
            "invalid answer for question 'g1': value 7 is outside the 1-5 scale"
        );
        assert_eq!(
            ScoringError::missing("t3").to_string(),
            "invalid answer for question 't3': no answer recorded"
        );
    }
}
