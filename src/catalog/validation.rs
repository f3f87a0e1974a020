use std::collections::HashSet;

use super::schema::{Question, QuestionCatalog};

fn check_questions(
    path: &str,
    questions: &[Question],
    seen: &mut HashSet<String>,
    errors: &mut Vec<String>,
) {
    if questions.is_empty() {
        errors.push(format!("{}.questions: must not be empty", path));
    }
    for (i, question) in questions.iter().enumerate() {
        if question.id.trim().is_empty() {
            errors.push(format!("{}.questions[{}].id: must not be blank", path, i));
        } else if !seen.insert(question.id.clone()) {
            errors.push(format!(
                "{}.questions[{}].id: duplicate question id '{}'",
                path, i, question.id
            ));
        }
        if question.text.trim().is_empty() {
            errors.push(format!("{}.questions[{}].text: must not be blank", path, i));
        }
    }
}

fn check_id(path: &str, id: &str, seen: &mut HashSet<String>, errors: &mut Vec<String>) {
    if id.trim().is_empty() {
        errors.push(format!("{}.id: must not be blank", path));
    } else if !seen.insert(id.to_string()) {
        errors.push(format!("{}.id: duplicate id '{}'", path, id));
    }
}

/// Validate a catalog at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &QuestionCatalog) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    // Question ids share one namespace across all schemas, since answer files
    // may carry answers from more than one mode.
    let mut question_ids = HashSet::new();

    if catalog.general.is_empty() {
        errors.push("general: must define at least one category".to_string());
    }

    let mut category_ids = HashSet::new();
    for (i, category) in catalog.general.iter().enumerate() {
        let path = format!("general[{}]", i);
        check_id(&path, &category.id, &mut category_ids, &mut errors);
        if category.label.trim().is_empty() {
            errors.push(format!("{}.label: must not be blank", path));
        }
        check_questions(&path, &category.questions, &mut question_ids, &mut errors);
    }

    for (section, defs) in [("jobs", &catalog.jobs), ("industries", &catalog.industries)] {
        let mut ids = HashSet::new();
        for (i, def) in defs.iter().enumerate() {
            let path = format!("{}[{}]", section, i);
            check_id(&path, &def.id, &mut ids, &mut errors);
            if def.title.trim().is_empty() {
                errors.push(format!("{}.title: must not be blank", path));
            }
            check_questions(&path, &def.questions, &mut question_ids, &mut errors);
        }
    }

    let mut tiers = HashSet::new();
    for (i, roadmap) in catalog.roadmaps.iter().enumerate() {
        if !tiers.insert(roadmap.tier) {
            errors.push(format!(
                "roadmaps[{}].tier: duplicate roadmap for '{}'",
                i, roadmap.tier
            ));
        }
    }

    // Task ids are what completions are stored under
    let mut task_ids = HashSet::new();
    for (i, roadmap) in catalog.roadmaps.iter().enumerate() {
        for (j, step) in roadmap.steps.iter().enumerate() {
            for (k, task) in step.tasks.iter().enumerate() {
                let path = format!("roadmaps[{}].steps[{}].tasks[{}]", i, j, k);
                check_id(&path, &task.id, &mut task_ids, &mut errors);
            }
        }
    }

    let mut group_ids = HashSet::new();
    let mut quest_ids = HashSet::new();
    for (i, group) in catalog.quests.iter().enumerate() {
        let path = format!("quests[{}]", i);
        check_id(&path, &group.id, &mut group_ids, &mut errors);
        if group.quests.is_empty() {
            errors.push(format!("{}.quests: must not be empty", path));
        }
        for (j, quest) in group.quests.iter().enumerate() {
            let path = format!("{}.quests[{}]", path, j);
            check_id(&path, &quest.id, &mut quest_ids, &mut errors);
            if quest.title.trim().is_empty() {
                errors.push(format!("{}.title: must not be blank", path));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryDef, SpecializedDef};
    use crate::quest::{Quest, QuestGroup};
    use crate::roadmap::{Roadmap, RoadmapStep, RoadmapTask};
    use crate::scoring::Tier;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {}", id),
            help_text: String::new(),
        }
    }

    fn category(id: &str, questions: Vec<Question>) -> CategoryDef {
        CategoryDef {
            id: id.to_string(),
            label: id.to_uppercase(),
            strength_note: None,
            weakness_note: None,
            questions,
        }
    }

    fn roadmap(tier: Tier) -> Roadmap {
        Roadmap {
            tier,
            title: "Roadmap".to_string(),
            description: String::new(),
            steps: vec![],
        }
    }

    #[test]
    fn test_valid_catalog() {
        let catalog = QuestionCatalog {
            general: vec![
                category("a", vec![question("a1"), question("a2")]),
                category("b", vec![question("b1")]),
            ],
            ..Default::default()
        };
        assert!(validate_catalog(&catalog).is_ok());
    }

    #[test]
    fn test_empty_general_rejected() {
        let errors = validate_catalog(&QuestionCatalog::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("general"));
    }

    #[test]
    fn test_duplicate_question_across_schemas() {
        let catalog = QuestionCatalog {
            general: vec![category("a", vec![question("q1")])],
            jobs: vec![SpecializedDef {
                id: "developer".to_string(),
                title: "Developer".to_string(),
                strategy: None,
                questions: vec![question("q1")],
            }],
            ..Default::default()
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("jobs[0].questions[0].id"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut blank = question("b1");
        blank.text = " ".to_string();
        let catalog = QuestionCatalog {
            general: vec![
                category("a", vec![]),
                category("a", vec![blank]),
                category("", vec![question("c1")]),
            ],
            roadmaps: vec![roadmap(Tier::Leader), roadmap(Tier::Leader)],
            ..Default::default()
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(errors.contains(&"general[0].questions: must not be empty".to_string()));
        assert!(errors.contains(&"general[1].id: duplicate id 'a'".to_string()));
        assert!(errors.contains(&"general[1].questions[0].text: must not be blank".to_string()));
        assert!(errors.contains(&"general[2].id: must not be blank".to_string()));
        assert!(errors.contains(&"general[2].label: must not be blank".to_string()));
        assert!(errors.iter().any(|e| e.starts_with("roadmaps[1].tier")));
    }

    fn quest(id: &str) -> Quest {
        Quest {
            id: id.to_string(),
            title: format!("Quest {}", id),
            description: String::new(),
            difficulty: "쉬움".to_string(),
            time: "1시간".to_string(),
            reward: "+10".to_string(),
            steps: vec![],
        }
    }

    #[test]
    fn test_duplicate_quest_ids_across_groups() {
        let catalog = QuestionCatalog {
            general: vec![category("a", vec![question("a1")])],
            quests: vec![
                QuestGroup {
                    id: "insight".to_string(),
                    title: "Insight".to_string(),
                    description: String::new(),
                    quests: vec![quest("q-1")],
                },
                QuestGroup {
                    id: "creativity".to_string(),
                    title: "Creativity".to_string(),
                    description: String::new(),
                    quests: vec![quest("q-1")],
                },
                QuestGroup {
                    id: "insight".to_string(),
                    title: "Again".to_string(),
                    description: String::new(),
                    quests: vec![],
                },
            ],
            ..Default::default()
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "quests[1].quests[0].id: duplicate id 'q-1'".to_string(),
                "quests[2].id: duplicate id 'insight'".to_string(),
                "quests[2].quests: must not be empty".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_task_ids_across_roadmaps() {
        let task = RoadmapTask {
            id: "t-1".to_string(),
            title: "Task".to_string(),
            difficulty: "쉬움".to_string(),
            time: "1시간".to_string(),
        };
        let with_task = |tier| Roadmap {
            steps: vec![RoadmapStep {
                title: "Step".to_string(),
                description: String::new(),
                tasks: vec![task.clone()],
            }],
            ..roadmap(tier)
        };
        let catalog = QuestionCatalog {
            general: vec![category("a", vec![question("a1")])],
            roadmaps: vec![with_task(Tier::Beginner), with_task(Tier::Explorer)],
            ..Default::default()
        };
        let errors = validate_catalog(&catalog).unwrap_err();
        assert_eq!(
            errors,
            vec!["roadmaps[1].steps[0].tasks[0].id: duplicate id 't-1'".to_string()]
        );
    }
}
