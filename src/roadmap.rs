use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;
use crate::scoring::Tier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadmapTask {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    /// Rough effort, free-form ("30분", "2시간")
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadmapStep {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<RoadmapTask>,
}

/// Pre-authored learning plan for one tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roadmap {
    pub tier: Tier,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
}

impl Roadmap {
    pub fn task_count(&self) -> usize {
        self.steps.iter().map(|s| s.tasks.len()).sum()
    }
}

pub fn select_roadmap(catalog: &QuestionCatalog, tier: Tier) -> Option<&Roadmap> {
    catalog.roadmaps.iter().find(|r| r.tier == tier)
}

/// Look a task up by id, along with the roadmap it belongs to.
pub fn find_task<'a>(
    catalog: &'a QuestionCatalog,
    id: &str,
) -> Option<(&'a Roadmap, &'a RoadmapTask)> {
    catalog.roadmaps.iter().find_map(|roadmap| {
        roadmap
            .steps
            .iter()
            .flat_map(|s| s.tasks.iter())
            .find(|t| t.id == id)
            .map(|task| (roadmap, task))
    })
}
