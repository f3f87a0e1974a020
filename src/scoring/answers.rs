use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;

use super::error::ScoringError;

/// Lowest point on the Likert scale ("strongly disagree").
pub const LIKERT_MIN: i64 = 1;
/// Highest point on the Likert scale ("strongly agree").
pub const LIKERT_MAX: i64 = 5;

/// Check that `value` is a point on the 1-5 scale.
pub fn likert(question: &str, value: i64) -> Result<u8, ScoringError> {
    if (LIKERT_MIN..=LIKERT_MAX).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ScoringError::out_of_range(question, value))
    }
}

/// Answers keyed by question id.
///
/// Values are kept as raw integers so that a corrupted answer file still loads;
/// the engine validates every value it aggregates. Keys are only ever added or
/// overwritten during a session, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<String, i64>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, replacing any earlier answer to the same question.
    pub fn record(&mut self, question: impl Into<String>, value: i64) -> Result<(), ScoringError> {
        let question = question.into();
        likert(&question, value)?;
        self.values.insert(question, value);
        Ok(())
    }

    /// Raw stored value, unvalidated.
    pub fn get(&self, question: &str) -> Option<i64> {
        self.values.get(question).copied()
    }

    /// Validated value for a question, `None` when unanswered.
    pub fn checked(&self, question: &str) -> Result<Option<u8>, ScoringError> {
        match self.values.get(question) {
            Some(&value) => likert(question, value).map(Some),
            None => Ok(None),
        }
    }

    pub fn contains(&self, question: &str) -> bool {
        self.values.contains_key(question)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, i64)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Load an answer file: a JSON object mapping question ids to integers.
///
/// Range checking is left to the engine so the error names the offending question.
pub fn load_answers(path: &Path) -> Result<AnswerSet> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open answers file at {}", path.display()))?;
    let answers: AnswerSet = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse answers: invalid JSON in {}", path.display()))?;
    Ok(answers)
}

/// Write an answer file atomically so an interrupted save keeps the previous copy.
pub fn save_answers(path: &Path, answers: &AnswerSet) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, answers).context("Failed to serialize answers")?;

    file.commit()
        .with_context(|| format!("Failed to write answers to {}", path.display()))?;
    Ok(())
}
