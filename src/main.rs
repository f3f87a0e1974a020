use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use reality_check::catalog::{self, QuestionCatalog};
use reality_check::config::{self, Config};
use reality_check::history::{self, History};
use reality_check::insights::build_report;
use reality_check::interactive::{run_session, Outcome, PromptStream};
use reality_check::narrative::{
    self, feedback_prompt, insight_prompt, CommandGenerator, NarrativeGenerator, Skill,
};
use reality_check::output;
use reality_check::quest::{find_quest, select_quest_group, Quest};
use reality_check::roadmap::{find_task, select_roadmap};
use reality_check::scoring::{self, AnswerSet, Mode, Selection, Tier};
use reality_check::session::Session;

const EXIT_SUCCESS: i32 = 0;
/// Scoring or narrative generation failed
const EXIT_FAILURE: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;

#[derive(clap::Args, Debug, Clone)]
struct SelectionArgs {
    /// Question set: general (alias basic), job or industry
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// Job or industry key for the specialized modes (e.g. developer, finance)
    #[arg(short, long)]
    selector: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CoachCommand {
    /// Comment on the change between the last two assessments
    Progress,
    /// Suggest next steps from the latest category scores
    Recommend {
        /// Quests already completed (repeatable)
        #[arg(long = "completed")]
        completed: Vec<String>,
    },
    /// Feedback on a reflection written after finishing a quest
    Feedback {
        /// Quest id (see `reality-check quests`)
        #[arg(long)]
        quest: String,
        reflection: String,
        /// Also mark the quest completed, storing the reflection and feedback
        #[arg(long)]
        complete: bool,
    },
    /// Short insight on a topic
    Insight { topic: String },
}

#[derive(Subcommand, Debug)]
enum CompleteCommand {
    /// Mark a roadmap task done
    Task { id: String },
    /// Mark a quest done
    Quest {
        id: String,
        /// What you did and learned
        #[arg(long)]
        reflection: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the questions of a question set
    Questions {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Answer the questionnaire interactively
    Take {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Resume from an answers file
        #[arg(long)]
        resume: Option<PathBuf>,
        /// Write answers here (also on quit, for resuming later)
        #[arg(long)]
        save_answers: Option<PathBuf>,
        /// Do not add the result to history
        #[arg(long)]
        no_record: bool,
    },
    /// Score a JSON answers file
    Score {
        answers: PathBuf,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Show the full analysis report
        #[arg(long)]
        report: bool,
        /// Add the result to history
        #[arg(long)]
        record: bool,
    },
    /// Show past assessments and the latest trend
    History {
        /// Only assessments newer than this (e.g. 30d, 2weeks)
        #[arg(long)]
        since: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show the learning roadmap for a tier (defaults to the latest result)
    Roadmap {
        #[arg(long, value_enum)]
        tier: Option<Tier>,
    },
    /// List quests; with --group, show their steps
    Quests {
        #[arg(long)]
        group: Option<String>,
    },
    /// Record a completed roadmap task or quest
    Complete {
        #[command(subcommand)]
        command: CompleteCommand,
    },
    /// Coaching narratives from the configured narrative command
    Coach {
        #[command(subcommand)]
        command: CoachCommand,
    },
    /// Validate a question catalog (defaults to the configured one)
    Validate { catalog: Option<PathBuf> },
}

#[derive(Parser, Debug)]
#[command(name = "reality-check")]
#[command(about = "AI-readiness self-assessment scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/reality-check/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Print an error to stderr and exit with `code`.
fn fail(code: i32, context: &str, err: impl Display) -> ! {
    eprintln!("{}: {:#}", context, err);
    std::process::exit(code);
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(EXIT_FAILURE, "Failed to serialize output", e),
    }
}

fn load_checked_catalog(path: Option<&Path>) -> QuestionCatalog {
    let catalog =
        catalog::load_catalog(path).unwrap_or_else(|e| fail(EXIT_CONFIG, "Catalog error", e));
    if let Err(errors) = catalog::validate_catalog(&catalog) {
        eprintln!("Catalog errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    catalog
}

fn history_path(config: &Config) -> PathBuf {
    match &config.history {
        Some(path) => path.clone(),
        None => {
            history::get_history_path().unwrap_or_else(|e| fail(EXIT_CONFIG, "Config error", e))
        }
    }
}

fn load_history(config: &Config) -> History {
    history::load_history(&history_path(config))
        .unwrap_or_else(|e| fail(EXIT_STORAGE, "History error", e))
}

fn save_history(config: &Config, history: &History) {
    if let Err(e) = history::save_history(&history_path(config), history) {
        fail(EXIT_STORAGE, "History error", e);
    }
}

fn checked_quest<'a>(catalog: &'a QuestionCatalog, id: &str) -> &'a Quest {
    find_quest(catalog, id).unwrap_or_else(|| {
        eprintln!("Unknown quest: {}", id);
        eprintln!("Run `reality-check quests` to list quest ids.");
        std::process::exit(EXIT_FAILURE);
    })
}

fn generator(config: &Config) -> CommandGenerator {
    CommandGenerator::from_argv(&config.narrative_command).unwrap_or_else(|| {
        eprintln!("No narrative command configured.");
        eprintln!("Add one to ~/.config/reality-check/config.yaml:");
        eprintln!("  narrative_command: [\"llm\", \"-m\", \"my-model\"]");
        std::process::exit(EXIT_CONFIG);
    })
}

/// Classify, print, and optionally record to history.
fn finish(
    answers: &AnswerSet,
    catalog: &QuestionCatalog,
    selection: &Selection,
    config: &Config,
    show_report: bool,
    record: bool,
    json: bool,
) {
    let result = scoring::evaluate(answers, catalog, selection)
        .unwrap_or_else(|e| fail(EXIT_FAILURE, "Scoring error", e));
    let use_colors = output::should_use_colors();

    if json {
        if show_report {
            print_json(&build_report(&result, catalog, selection));
        } else {
            print_json(&result);
        }
    } else {
        println!("{}", output::format_result(&result, use_colors));
        if show_report {
            println!();
            println!(
                "{}",
                output::format_report(&build_report(&result, catalog, selection), use_colors)
            );
        }
    }

    if record {
        let mut history = load_history(config);
        history.record(&result, answers, selection, Utc::now());
        save_history(config, &history);
        if let Some(trend) = history.trend() {
            tracing::info!(change = trend.score_change, "recorded assessment");
        }
    }
}

fn run_coach(command: CoachCommand, config: &Config, json: bool) {
    let generator = generator(config);
    match command {
        CoachCommand::Progress => {
            let history = load_history(config);
            let text = narrative::analyze_progress(&generator, &history)
                .unwrap_or_else(|e| fail(EXIT_FAILURE, "Coach error", e));
            println!("{}", text);
        }
        CoachCommand::Recommend { completed: extra } => {
            let history = load_history(config);
            let Some(latest) = history.latest() else {
                fail(EXIT_FAILURE, "Coach error", narrative::NarrativeError::NoHistory);
            };
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let skills: Vec<Skill> = latest
                .category_scores
                .iter()
                .map(|(id, score)| Skill {
                    name: catalog
                        .category(id)
                        .map(|c| c.label.clone())
                        .or_else(|| {
                            catalog
                                .specialized(&latest.selection())
                                .map(|d| d.title.clone())
                        })
                        .unwrap_or_else(|| id.clone()),
                    score: *score,
                })
                .collect();
            let mut completed = history.completed_quest_titles();
            completed.extend(extra);
            let recommendations = narrative::recommend(&generator, &skills, &completed)
                .unwrap_or_else(|e| {
                    if let narrative::NarrativeError::Malformed { raw, .. } = &e {
                        eprintln!("{}", raw);
                    }
                    fail(EXIT_FAILURE, "Coach error", e)
                });
            if json {
                print_json(&recommendations);
            } else {
                for (i, rec) in recommendations.iter().enumerate() {
                    println!("{}. {}", i + 1, rec.title);
                    println!("   {}", rec.description);
                    println!("   {}", rec.resource);
                }
            }
        }
        CoachCommand::Feedback {
            quest,
            reflection,
            complete,
        } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let quest = checked_quest(&catalog, &quest);
            let text = generator
                .generate(&feedback_prompt(&quest.title, &reflection))
                .unwrap_or_else(|e| fail(EXIT_FAILURE, "Coach error", e));
            println!("{}", text);
            if complete {
                let mut history = load_history(config);
                history.complete_quest(quest, Some(reflection), Some(text), Utc::now());
                save_history(config, &history);
            }
        }
        CoachCommand::Insight { topic } => {
            let text = generator
                .generate(&insight_prompt(&topic))
                .unwrap_or_else(|e| fail(EXIT_FAILURE, "Coach error", e));
            println!("{}", text);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = config::load_config(cli.config.as_deref())
        .unwrap_or_else(|e| fail(EXIT_CONFIG, "Config error", e));
    let json = cli.json;

    match cli.command {
        Commands::Questions { selection } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let selection = config.selection(selection.mode, selection.selector);
            let schema = catalog
                .resolve(&selection)
                .unwrap_or_else(|e| fail(EXIT_FAILURE, "Scoring error", e));
            if json {
                print_json(&schema.questions());
            } else {
                println!(
                    "{}",
                    output::format_questions(&schema, output::should_use_colors())
                );
            }
        }
        Commands::Take {
            selection,
            resume,
            save_answers: save_path,
            no_record,
        } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let selection = config.selection(selection.mode, selection.selector);
            let schema = catalog
                .resolve(&selection)
                .unwrap_or_else(|e| fail(EXIT_FAILURE, "Scoring error", e));
            let answers = match resume {
                Some(path) => scoring::load_answers(&path)
                    .unwrap_or_else(|e| fail(EXIT_STORAGE, "Answers error", e)),
                None => AnswerSet::new(),
            };
            let mut session = Session::resume(schema, answers)
                .unwrap_or_else(|e| fail(EXIT_FAILURE, "Scoring error", e));

            let stdin = std::io::stdin();
            let mut prompts = PromptStream::for_output(json).writer();
            let outcome = run_session(
                &mut session,
                &mut stdin.lock(),
                &mut prompts,
                output::should_use_colors(),
            )
            .unwrap_or_else(|e| fail(EXIT_FAILURE, "Session error", e));

            let answers = session.into_answers();
            if let Some(path) = &save_path {
                if let Err(e) = scoring::save_answers(path, &answers) {
                    fail(EXIT_STORAGE, "Answers error", e);
                }
            }
            match outcome {
                Outcome::Quit => {
                    eprintln!("Assessment not finished; no result recorded.");
                }
                Outcome::Completed => {
                    println!();
                    finish(&answers, &catalog, &selection, &config, true, !no_record, json);
                }
            }
        }
        Commands::Score {
            answers,
            selection,
            report,
            record,
        } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let selection = config.selection(selection.mode, selection.selector);
            let answers = scoring::load_answers(&answers)
                .unwrap_or_else(|e| fail(EXIT_STORAGE, "Answers error", e));
            finish(&answers, &catalog, &selection, &config, report, record, json);
        }
        Commands::History { since, limit } => {
            let history = load_history(&config);
            let mut records = match since {
                Some(window) => {
                    let cutoff = history::since_cutoff(Utc::now(), &window)
                        .unwrap_or_else(|e| fail(EXIT_CONFIG, "Invalid --since", e));
                    history.since(cutoff)
                }
                None => history.newest_first(),
            };
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            let trend = history.trend();
            if json {
                print_json(&serde_json::json!({ "records": records, "trend": trend }));
            } else {
                println!(
                    "{}",
                    output::format_history(
                        &records,
                        trend.as_ref(),
                        Utc::now(),
                        output::should_use_colors()
                    )
                );
            }
        }
        Commands::Roadmap { tier } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let history = load_history(&config);
            let tier = match tier {
                Some(tier) => tier,
                None => match history.latest() {
                    Some(record) => record.tier,
                    None => {
                        eprintln!(
                            "No assessments recorded yet. Pass --tier or take the assessment first."
                        );
                        std::process::exit(EXIT_FAILURE);
                    }
                },
            };
            let Some(roadmap) = select_roadmap(&catalog, tier) else {
                eprintln!("The catalog has no roadmap for {}.", tier);
                std::process::exit(EXIT_CONFIG);
            };
            if json {
                print_json(roadmap);
            } else {
                println!(
                    "{}",
                    output::format_roadmap(
                        roadmap,
                        &history.completed_task_ids(),
                        output::should_use_colors()
                    )
                );
            }
        }
        Commands::Quests { group } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let groups = match &group {
                Some(id) => match select_quest_group(&catalog, id) {
                    Some(group) => std::slice::from_ref(group),
                    None => {
                        eprintln!("Unknown quest group: {}", id);
                        std::process::exit(EXIT_FAILURE);
                    }
                },
                None => catalog.quests.as_slice(),
            };
            if json {
                print_json(&groups);
            } else {
                let history = load_history(&config);
                println!(
                    "{}",
                    output::format_quests(
                        groups,
                        &history.completed_quest_ids(),
                        group.is_some(),
                        output::should_use_colors()
                    )
                );
            }
        }
        Commands::Complete { command } => {
            let catalog = load_checked_catalog(config.catalog.as_deref());
            let mut history = load_history(&config);
            let (added, title) = match command {
                CompleteCommand::Task { id } => {
                    let Some((roadmap, task)) = find_task(&catalog, &id) else {
                        eprintln!("Unknown roadmap task: {}", id);
                        eprintln!("Run `reality-check roadmap --tier <tier>` to list task ids.");
                        std::process::exit(EXIT_FAILURE);
                    };
                    (
                        history.complete_task(task, roadmap.tier, Utc::now()),
                        task.title.clone(),
                    )
                }
                CompleteCommand::Quest { id, reflection } => {
                    let quest = checked_quest(&catalog, &id);
                    (
                        history.complete_quest(quest, reflection, None, Utc::now()),
                        quest.title.clone(),
                    )
                }
            };
            save_history(&config, &history);
            if added {
                println!("Completed: {}", title);
            } else {
                println!("Already completed: {}", title);
            }
        }
        Commands::Coach { command } => run_coach(command, &config, json),
        Commands::Validate { catalog: path } => {
            let path = path.or_else(|| config.catalog.clone());
            let catalog = load_checked_catalog(path.as_deref());
            let questions: usize = catalog
                .general
                .iter()
                .map(|c| c.questions.len())
                .chain(catalog.jobs.iter().map(|j| j.questions.len()))
                .chain(catalog.industries.iter().map(|i| i.questions.len()))
                .sum();
            let quests: usize = catalog.quests.iter().map(|g| g.quests.len()).sum();
            println!(
                "Catalog OK: {} categories, {} jobs, {} industries, {} questions, {} roadmaps, {} quests",
                catalog.general.len(),
                catalog.jobs.len(),
                catalog.industries.len(),
                questions,
                catalog.roadmaps.len(),
                quests
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
