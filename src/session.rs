use tracing::debug;

use crate::catalog::Question;
use crate::scoring::{engine, AnswerSet, Progress, Schema, ScoringError, Section};

/// Result of moving the cursor forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// The cursor was on the last question; nothing left to ask
    Finished,
}

/// Walks the questions of one schema in order, building an [`AnswerSet`].
///
/// General mode moves across category boundaries as if the categories were one
/// list; specialized modes have a single section.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    schema: Schema<'a>,
    questions: Vec<&'a Question>,
    cursor: usize,
    answers: AnswerSet,
}

impl<'a> Session<'a> {
    pub fn new(schema: Schema<'a>) -> Result<Self, ScoringError> {
        Self::resume(schema, AnswerSet::new())
    }

    /// Continue with answers collected earlier. The cursor starts on the first
    /// unanswered question.
    pub fn resume(schema: Schema<'a>, answers: AnswerSet) -> Result<Self, ScoringError> {
        let questions = schema.questions();
        if questions.is_empty() {
            return Err(ScoringError::Configuration(
                "active schema has no questions".to_string(),
            ));
        }
        let cursor = questions
            .iter()
            .position(|q| !answers.contains(&q.id))
            .unwrap_or(questions.len() - 1);
        Ok(Self {
            schema,
            questions,
            cursor,
            answers,
        })
    }

    pub fn schema(&self) -> Schema<'a> {
        self.schema
    }

    pub fn current(&self) -> &'a Question {
        self.questions[self.cursor]
    }

    /// Stored answer for the current question, if any.
    pub fn current_answer(&self) -> Option<i64> {
        self.answers.get(&self.current().id)
    }

    /// The category (or specialized list) holding the current question.
    pub fn current_section(&self) -> Section<'a> {
        let sections = self.schema.sections();
        let mut offset = 0;
        for section in &sections {
            offset += section.questions.len();
            if self.cursor < offset {
                return *section;
            }
        }
        // cursor is always within the flattened list
        sections[sections.len() - 1]
    }

    pub fn answer(&mut self, value: i64) -> Result<(), ScoringError> {
        let id = self.current().id.clone();
        self.answers.record(id, value)
    }

    pub fn advance(&mut self) -> Result<Step, ScoringError> {
        let question = self.current();
        if !self.answers.contains(&question.id) {
            return Err(ScoringError::missing(&question.id));
        }
        if self.cursor + 1 >= self.questions.len() {
            return Ok(Step::Finished);
        }
        self.cursor += 1;
        Ok(Step::Moved)
    }

    /// Step back one question. Returns false when already on the first.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move to the first question of a general-mode category.
    pub fn jump_to_category(&mut self, id: &str) -> Result<(), ScoringError> {
        let Schema::General(categories) = self.schema else {
            return Err(ScoringError::UnknownCategory {
                kind: "category",
                key: id.to_string(),
            });
        };

        let mut offset = 0;
        for category in categories {
            if category.id == id {
                debug!(category = id, question = offset, "jump to category");
                self.cursor = offset;
                return Ok(());
            }
            offset += category.questions.len();
        }
        Err(ScoringError::UnknownCategory {
            kind: "category",
            key: id.to_string(),
        })
    }

    /// 1-based index of the current question and the total count.
    pub fn position(&self) -> (usize, usize) {
        (self.cursor + 1, self.questions.len())
    }

    pub fn progress(&self) -> Result<Progress, ScoringError> {
        engine::progress(&self.answers, &self.schema)
    }

    pub fn is_complete(&self) -> bool {
        self.questions.iter().all(|q| self.answers.contains(&q.id))
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn into_answers(self) -> AnswerSet {
        self.answers
    }
}
