pub mod formatter;

pub use formatter::{
    format_age, format_history, format_progress_line, format_question, format_questions,
    format_quests, format_report, format_result, format_roadmap, score_bar, should_use_colors,
};
