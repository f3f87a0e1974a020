use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::quest::Quest;
use crate::roadmap::RoadmapTask;
use crate::scoring::{AnswerSet, ClassificationResult, Mode, Selection, Tier};

pub const HISTORY_VERSION: u32 = 1;

/// One completed assessment as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub created_at: DateTime<Utc>,
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub score: u8,
    pub tier: Tier,
    pub tier_label: String,
    pub answers: AnswerSet,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub category_scores: BTreeMap<String, u8>,
    /// Category labels, not ids
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl AssessmentRecord {
    pub fn from_result(
        result: &ClassificationResult,
        answers: &AnswerSet,
        selection: &Selection,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            created_at,
            mode: selection.mode,
            selector: selection.selector.clone(),
            score: result.score,
            tier: result.tier,
            tier_label: result.tier.label().to_string(),
            answers: answers.clone(),
            risk_factors: result.risk_factors.clone(),
            opportunities: result.opportunities.clone(),
            category_scores: result.category_scores.to_map(),
            strengths: result.strengths.iter().map(|c| c.label.clone()).collect(),
            weaknesses: result.weaknesses.iter().map(|c| c.label.clone()).collect(),
        }
    }

    pub fn selection(&self) -> Selection {
        Selection {
            mode: self.mode,
            selector: self.selector.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Change between the two most recent assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub score_change: i16,
    pub direction: Direction,
    /// (from, to) when the tier changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_change: Option<(Tier, Tier)>,
}

/// A roadmap task marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub task_id: String,
    pub title: String,
    /// Roadmap the task was taken from
    pub tier: Tier,
    pub completed_at: DateTime<Utc>,
}

/// A quest marked done, with the reflection written afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedQuest {
    pub quest_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
    /// Coaching feedback on the reflection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    pub version: u32,
    #[serde(default)]
    pub records: Vec<AssessmentRecord>,
    #[serde(default)]
    pub completed_tasks: Vec<CompletedTask>,
    #[serde(default)]
    pub completed_quests: Vec<CompletedQuest>,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            records: Vec::new(),
            completed_tasks: Vec::new(),
            completed_quests: Vec::new(),
        }
    }

    /// Append a completed assessment and return the stored record.
    pub fn record(
        &mut self,
        result: &ClassificationResult,
        answers: &AnswerSet,
        selection: &Selection,
        now: DateTime<Utc>,
    ) -> &AssessmentRecord {
        self.records
            .push(AssessmentRecord::from_result(result, answers, selection, now));
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by creation time, newest first. Ties keep insertion order
    /// reversed, so the later append comes first.
    pub fn newest_first(&self) -> Vec<&AssessmentRecord> {
        let mut records: Vec<_> = self.records.iter().rev().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub fn latest(&self) -> Option<&AssessmentRecord> {
        self.newest_first().into_iter().next()
    }

    pub fn previous(&self) -> Option<&AssessmentRecord> {
        self.newest_first().into_iter().nth(1)
    }

    /// Records created at or after `cutoff`, newest first.
    pub fn since(&self, cutoff: DateTime<Utc>) -> Vec<&AssessmentRecord> {
        self.newest_first()
            .into_iter()
            .filter(|r| r.created_at >= cutoff)
            .collect()
    }

    /// Mark a roadmap task done. Returns false if it already was.
    pub fn complete_task(&mut self, task: &RoadmapTask, tier: Tier, now: DateTime<Utc>) -> bool {
        if self.completed_tasks.iter().any(|t| t.task_id == task.id) {
            return false;
        }
        self.completed_tasks.push(CompletedTask {
            task_id: task.id.clone(),
            title: task.title.clone(),
            tier,
            completed_at: now,
        });
        true
    }

    /// Mark a quest done. Completing it again replaces the reflection and
    /// feedback but keeps the original completion time.
    pub fn complete_quest(
        &mut self,
        quest: &Quest,
        reflection: Option<String>,
        feedback: Option<String>,
        now: DateTime<Utc>,
    ) -> bool {
        if let Some(existing) = self
            .completed_quests
            .iter_mut()
            .find(|q| q.quest_id == quest.id)
        {
            if reflection.is_some() {
                existing.reflection = reflection;
            }
            if feedback.is_some() {
                existing.feedback = feedback;
            }
            return false;
        }
        self.completed_quests.push(CompletedQuest {
            quest_id: quest.id.clone(),
            title: quest.title.clone(),
            reflection,
            feedback,
            completed_at: now,
        });
        true
    }

    pub fn completed_task_ids(&self) -> BTreeSet<&str> {
        self.completed_tasks.iter().map(|t| t.task_id.as_str()).collect()
    }

    pub fn completed_quest_ids(&self) -> BTreeSet<&str> {
        self.completed_quests.iter().map(|q| q.quest_id.as_str()).collect()
    }

    /// Titles of completed quests in completion order.
    pub fn completed_quest_titles(&self) -> Vec<String> {
        let mut quests: Vec<_> = self.completed_quests.iter().collect();
        quests.sort_by_key(|q| q.completed_at);
        quests.into_iter().map(|q| q.title.clone()).collect()
    }

    /// Compare the two most recent records. `None` with fewer than two.
    pub fn trend(&self) -> Option<Trend> {
        let latest = self.latest()?;
        let previous = self.previous()?;
        let score_change = latest.score as i16 - previous.score as i16;
        let direction = match score_change {
            c if c > 0 => Direction::Up,
            c if c < 0 => Direction::Down,
            _ => Direction::Flat,
        };
        let tier_change = (latest.tier != previous.tier).then_some((previous.tier, latest.tier));
        Some(Trend {
            score_change,
            direction,
            tier_change,
        })
    }
}

/// Parse a `--since` window such as `30d` or `2weeks` and subtract it from `now`.
///
/// Windows reaching before the earliest representable time are an error.
pub fn since_cutoff(now: DateTime<Utc>, window: &str) -> Result<DateTime<Utc>> {
    let parsed = humantime::parse_duration(window)?;
    let delta = chrono::Duration::from_std(parsed)
        .map_err(|_| anyhow!("window {} is too large", window))?;
    now.checked_sub_signed(delta)
        .ok_or_else(|| anyhow!("window {} reaches before the earliest supported date", window))
}
