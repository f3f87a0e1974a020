use serde::{Deserialize, Serialize};

use crate::catalog::QuestionCatalog;

/// A practice exercise with ordered steps, completed once and then reflected on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: String,
    pub time: String,
    /// Free-form reward text ("인사이트 포인트 +10")
    pub reward: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Quests sharing a theme (insight, collaboration, creativity, reflection).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestGroup {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

pub fn select_quest_group<'a>(catalog: &'a QuestionCatalog, id: &str) -> Option<&'a QuestGroup> {
    catalog.quests.iter().find(|g| g.id == id)
}

/// Look a quest up by id across every group.
pub fn find_quest<'a>(catalog: &'a QuestionCatalog, id: &str) -> Option<&'a Quest> {
    catalog
        .quests
        .iter()
        .flat_map(|g| g.quests.iter())
        .find(|q| q.id == id)
}
