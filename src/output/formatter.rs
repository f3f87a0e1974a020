use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::collections::BTreeSet;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::Question;
use crate::history::{AssessmentRecord, Direction, Trend};
use crate::insights::AnalysisReport;
use crate::quest::QuestGroup;
use crate::roadmap::Roadmap;
use crate::scoring::{ClassificationResult, Progress, Schema, Section, Tier};

const MAX_BAR_WIDTH: usize = 40;
const MIN_BAR_WIDTH: usize = 10;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

fn bar_width(label_width: usize) -> usize {
    match get_terminal_width() {
        Some(w) => w
            .saturating_sub(label_width + 8)
            .clamp(MIN_BAR_WIDTH, MAX_BAR_WIDTH),
        None => MAX_BAR_WIDTH / 2,
    }
}

/// Horizontal bar for a 0-100 score.
pub fn score_bar(score: u8, width: usize) -> String {
    let filled = (score.min(100) as usize * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn tier_colored(tier: Tier, use_colors: bool) -> String {
    if !use_colors {
        return tier.label().to_string();
    }
    match tier {
        Tier::Leader => tier.label().green().bold().to_string(),
        Tier::Adapter => tier.label().cyan().bold().to_string(),
        Tier::Explorer => tier.label().yellow().bold().to_string(),
        Tier::Beginner => tier.label().red().bold().to_string(),
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

fn bullets(lines: &mut Vec<String>, items: &[String]) {
    lines.extend(items.iter().map(|item| format!("  - {}", item)));
}

/// Progress line shown while answering: "질문 i / n (k 답변됨)"
pub fn format_progress_line(position: usize, progress: &Progress) -> String {
    format!(
        "질문 {} / {} ({} 답변됨)",
        position, progress.total, progress.answered
    )
}

/// A question as shown during `take`, with its section and help text.
pub fn format_question(
    section: &Section,
    question: &Question,
    current: Option<i64>,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();
    if use_colors {
        lines.push(section.label.cyan().to_string());
        lines.push(question.text.bold().to_string());
    } else {
        lines.push(section.label.to_string());
        lines.push(question.text.clone());
    }
    if !question.help_text.is_empty() {
        if use_colors {
            lines.push(question.help_text.dimmed().to_string());
        } else {
            lines.push(question.help_text.clone());
        }
    }
    let scale = match current {
        Some(v) => format!("1 전혀 아니다 .. 5 매우 그렇다 [현재: {}]", v),
        None => "1 전혀 아니다 .. 5 매우 그렇다".to_string(),
    };
    lines.push(scale);
    lines.join("\n")
}

/// Every question in the schema, grouped by section.
pub fn format_questions(schema: &Schema, use_colors: bool) -> String {
    let mut lines = Vec::new();
    for section in schema.sections() {
        lines.push(heading(&format!("{} ({})", section.label, section.id), use_colors));
        for question in section.questions {
            if use_colors {
                lines.push(format!("  {:>5}  {}", question.id.dimmed(), question.text));
            } else {
                lines.push(format!("  {:>5}  {}", question.id, question.text));
            }
        }
        lines.push(String::new());
    }
    lines.join("\n").trim_end().to_string()
}

pub fn format_result(result: &ClassificationResult, use_colors: bool) -> String {
    let mut lines = Vec::new();
    let score = if use_colors {
        format!("{}", result.score.bold())
    } else {
        result.score.to_string()
    };
    lines.push(format!(
        "{} {}% 준비 완료",
        tier_colored(result.tier, use_colors),
        score
    ));
    lines.push(String::new());

    let label_width = result
        .category_scores
        .iter()
        .map(|c| c.label.chars().count())
        .max()
        .unwrap_or(0);
    let width = bar_width(label_width);
    lines.push(heading("카테고리별 점수", use_colors));
    for category in result.category_scores.iter() {
        let pad = label_width - category.label.chars().count();
        lines.push(format!(
            "  {}{}  {} {:>3}",
            category.label,
            " ".repeat(pad),
            score_bar(category.score, width),
            category.score
        ));
    }
    lines.push(String::new());

    let names = |scores: &[crate::scoring::CategoryScore]| -> Vec<String> {
        scores
            .iter()
            .map(|c| format!("{} ({})", c.label, c.score))
            .collect()
    };
    lines.push(heading("강점", use_colors));
    bullets(&mut lines, &names(&result.strengths));
    lines.push(heading("개선 필요 영역", use_colors));
    bullets(&mut lines, &names(&result.weaknesses));
    lines.push(String::new());
    lines.push(heading("위험 요소", use_colors));
    bullets(&mut lines, &result.risk_factors);
    lines.push(heading("기회 요소", use_colors));
    bullets(&mut lines, &result.opportunities);

    lines.join("\n")
}

pub fn format_report(report: &AnalysisReport, use_colors: bool) -> String {
    let mut lines = vec![
        format!(
            "{} {}% 준비 완료",
            tier_colored(report.tier, use_colors),
            report.score
        ),
        String::new(),
        heading("특징", use_colors),
    ];
    bullets(&mut lines, &report.characteristics);
    lines.push(heading("추천 사항", use_colors));
    bullets(&mut lines, &report.recommendations);
    lines.push(String::new());

    lines.push(heading("강점", use_colors));
    for note in &report.strengths {
        lines.push(format!("  - {} ({}): {}", note.label, note.score, note.note));
    }
    lines.push(heading("개선 필요 영역", use_colors));
    for note in &report.weaknesses {
        lines.push(format!("  - {} ({}): {}", note.label, note.score, note.note));
    }

    if let Some(strategy) = &report.strategy {
        lines.push(String::new());
        lines.push(heading(&strategy.title, use_colors));
        bullets(&mut lines, &strategy.insights);
        if !strategy.outlook.is_empty() {
            lines.push(heading("전망", use_colors));
            bullets(&mut lines, &strategy.outlook);
        }
    }

    lines.join("\n")
}

fn check_mark(done: bool, use_colors: bool) -> String {
    match (done, use_colors) {
        (true, true) => "✓".green().to_string(),
        (true, false) => "✓".to_string(),
        (false, _) => " ".to_string(),
    }
}

/// Roadmap steps and tasks, with completed tasks checked off.
pub fn format_roadmap(roadmap: &Roadmap, completed: &BTreeSet<&str>, use_colors: bool) -> String {
    let done = roadmap
        .steps
        .iter()
        .flat_map(|s| s.tasks.iter())
        .filter(|t| completed.contains(t.id.as_str()))
        .count();
    let mut lines = vec![heading(&roadmap.title, use_colors)];
    if !roadmap.description.is_empty() {
        lines.push(roadmap.description.clone());
    }
    lines.push(format!("완료 {} / {} 과제", done, roadmap.task_count()));
    for (i, step) in roadmap.steps.iter().enumerate() {
        lines.push(String::new());
        let title = format!("{}. {}", i + 1, step.title);
        lines.push(if use_colors { title.bold().to_string() } else { title });
        if !step.description.is_empty() {
            lines.push(format!("   {}", step.description));
        }
        for task in &step.tasks {
            let meta = format!("[{}, {}, {}]", task.id, task.difficulty, task.time);
            let meta = if use_colors { meta.dimmed().to_string() } else { meta };
            let mark = check_mark(completed.contains(task.id.as_str()), use_colors);
            lines.push(format!("   {} {} {}", mark, task.title, meta));
        }
    }
    lines.join("\n")
}

/// Quest groups with each quest's effort and reward. `detailed` adds
/// descriptions and steps.
pub fn format_quests(
    groups: &[QuestGroup],
    completed: &BTreeSet<&str>,
    detailed: bool,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();
    for group in groups {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(heading(&format!("{} ({})", group.title, group.id), use_colors));
        if detailed && !group.description.is_empty() {
            lines.push(group.description.clone());
        }
        for quest in &group.quests {
            let mark = check_mark(completed.contains(quest.id.as_str()), use_colors);
            let meta = format!("[{}, {}, {}]", quest.difficulty, quest.time, quest.reward);
            let meta = if use_colors { meta.dimmed().to_string() } else { meta };
            lines.push(format!(" {} {:<12} {} {}", mark, quest.id, quest.title, meta));
            if detailed {
                if !quest.description.is_empty() {
                    lines.push(format!("     {}", quest.description));
                }
                for (i, step) in quest.steps.iter().enumerate() {
                    lines.push(format!("     {}. {}", i + 1, step));
                }
            }
        }
    }
    lines.join("\n")
}

fn format_trend(trend: &Trend, use_colors: bool) -> String {
    let arrow = match trend.direction {
        Direction::Up => "▲",
        Direction::Down => "▼",
        Direction::Flat => "=",
    };
    let change = format!("{} {:+}", arrow, trend.score_change);
    let change = match (use_colors, trend.direction) {
        (true, Direction::Up) => change.green().to_string(),
        (true, Direction::Down) => change.red().to_string(),
        _ => change,
    };
    match trend.tier_change {
        Some((from, to)) => format!("{} ({} → {})", change, from.label(), to.label()),
        None => change,
    }
}

/// History table, newest first, with the trend between the last two entries.
pub fn format_history(
    records: &[&AssessmentRecord],
    trend: Option<&Trend>,
    now: DateTime<Utc>,
    use_colors: bool,
) -> String {
    if records.is_empty() {
        return "No assessments recorded.".to_string();
    }

    let mut lines: Vec<String> = records
        .iter()
        .map(|record| {
            let mode = match &record.selector {
                Some(selector) => format!("{}:{}", record.mode, selector),
                None => record.mode.to_string(),
            };
            let when = format!(
                "{} ({} ago)",
                record.created_at.format("%Y-%m-%d %H:%M"),
                format_age(now - record.created_at)
            );
            let score = format!("{:>3}", record.score);
            let score = if use_colors { score.bold().to_string() } else { score };
            format!(
                "{}  {:<20}  {}  {}",
                when,
                mode,
                score,
                tier_colored(record.tier, use_colors)
            )
        })
        .collect();

    if let Some(trend) = trend {
        lines.push(String::new());
        lines.push(format!("추이: {}", format_trend(trend, use_colors)));
    }
    lines.join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
