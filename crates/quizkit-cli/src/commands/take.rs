//! The `quizkit take` command.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use quizkit_core::bank::load_bank;
use quizkit_core::builder::QuizCriteria;
use quizkit_core::codec::{self, RawInput};
use quizkit_core::config::load_config_from;
use quizkit_core::export::QuizReport;
use quizkit_core::model::{Question, QuestionType};
use quizkit_core::summary::{format_duration, format_seconds, format_user_answer, QuizSummary};
use quizkit_core::timer::format_clock;
use quizkit_core::QuizController;
use quizkit_report::{build_report, write_pdf_report};

use super::answer::parse_answer;

/// Command-line overrides for a quiz run.
pub struct TakeOptions {
    pub bank: Option<PathBuf>,
    pub count: Option<usize>,
    pub modules: Vec<String>,
    pub types: Vec<QuestionType>,
    pub include_generated: bool,
    pub no_shuffle: bool,
    pub hide_modules: bool,
    pub output: Option<PathBuf>,
    pub format: String,
    pub title: Option<String>,
    pub no_timer: bool,
}

const HELP: &str = "Type an answer, or :n next, :p previous, :f finish, :q quit, :h help";

pub async fn execute(options: TakeOptions, config_path: Option<PathBuf>) -> Result<()> {
    let formats = parse_formats(&options.format)?;
    let config = load_config_from(config_path.as_deref())?;

    let bank_path = options.bank.unwrap_or(config.bank_path);
    let bank = load_bank(&bank_path);
    eprintln!(
        "Loaded {} question(s) from {}",
        bank.len(),
        bank_path.display()
    );

    let criteria = QuizCriteria {
        requested_count: options.count.unwrap_or(config.default_count),
        modules: options.modules.into_iter().collect(),
        types: options.types.into_iter().collect(),
        include_generated: options.include_generated || config.include_generated,
        shuffle: config.shuffle && !options.no_shuffle,
        hide_module_info: options.hide_modules || config.hide_module_info,
    };
    tracing::debug!(?criteria, "quiz criteria");

    let mut controller = QuizController::new(bank);
    controller.start(&criteria)?;
    println!("{HELP}");

    let show_timer = !options.no_timer && std::io::stdin().is_terminal();
    let tick_ms = config.tick_interval_ms.max(50);
    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = current_input(&controller);
    render_question(&controller, &draft);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // End of input finishes the quiz with whatever is entered.
                    break;
                };
                if show_timer {
                    eprintln!();
                }
                match line.trim() {
                    ":n" | ":next" => {
                        if controller.advance(&draft) {
                            draft = current_input(&controller);
                            render_question(&controller, &draft);
                        } else {
                            println!("Already at the last question. Use :f to finish.");
                        }
                    }
                    ":p" | ":prev" => {
                        if controller.retreat(&draft) {
                            draft = current_input(&controller);
                            render_question(&controller, &draft);
                        } else {
                            println!("Already at the first question.");
                        }
                    }
                    ":f" | ":finish" => break,
                    ":q" | ":quit" => {
                        controller.reset();
                        println!("Quiz discarded.");
                        return Ok(());
                    }
                    ":h" | ":help" => println!("{HELP}"),
                    _ => {
                        let Some(session) = controller.session() else {
                            break;
                        };
                        let question = session.current_question();
                        match parse_answer(question, &line) {
                            Ok(input) => {
                                println!("Recorded: {}", answer_text(question, &input));
                                draft = input;
                            }
                            Err(reason) => println!("Not recorded: {reason}"),
                        }
                    }
                }
            }
            _ = ticker.tick(), if show_timer => {
                if let Some(ms) = controller.display_elapsed_ms() {
                    eprint!("\r  [{}] ", format_clock(ms));
                    std::io::stderr().flush().ok();
                }
            }
        }
    }

    let summary = controller.finish(&draft)?;
    print_summary(summary);
    let output = options.output.unwrap_or(config.output_dir);
    let title = options.title.unwrap_or(config.report_title);
    write_reports(summary, &formats, &output, &title)
}

fn parse_formats(format: &str) -> Result<Vec<&'static str>> {
    let mut formats = Vec::new();
    for part in format.split(',').map(str::trim) {
        let expanded: &[&'static str] = match part {
            "pdf" => &["pdf"],
            "json" => &["json"],
            "all" => &["pdf", "json"],
            "none" => &[],
            other => {
                anyhow::bail!("unknown report format '{other}' (expected pdf, json, all, none)")
            }
        };
        for format in expanded {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
    }
    Ok(formats)
}

fn current_input(controller: &QuizController) -> RawInput {
    controller
        .display_input()
        .unwrap_or(RawInput::Text(String::new()))
}

fn answer_text(question: &Question, input: &RawInput) -> String {
    format_user_answer(question, codec::decode(question, input).as_ref())
}

fn render_question(controller: &QuizController, draft: &RawInput) {
    let Some(session) = controller.session() else {
        return;
    };
    let question = session.current_question();

    println!();
    println!("{}  ({})", session.title(), session.progress_text());
    println!("{}", question.meta_line(session.hide_module_info()));
    println!();
    println!("{}", question.prompt);
    if let Some(code) = question.code.as_deref().filter(|c| !c.is_empty()) {
        println!();
        for line in code.lines() {
            println!("    {line}");
        }
    }
    println!();
    for (idx, option) in question.display_options().iter().enumerate() {
        println!("  {}. {}", idx + 1, option.label);
    }
    println!("Current answer: {}", answer_text(question, draft));
    println!("{}", navigation_hint(session.is_first(), session.is_last()));
}

fn navigation_hint(first: bool, last: bool) -> &'static str {
    match (first, last) {
        (true, true) => "(:f finish)",
        (true, false) => "(:n next, :f finish)",
        (false, true) => "(:p previous, :f finish)",
        (false, false) => "(:n next, :p previous, :f finish)",
    }
}

fn print_summary(summary: &QuizSummary) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Module", "Answer", "Correct", "Time", "Result"]);
    for entry in summary.entries() {
        let question = entry.question();
        table.add_row(vec![
            Cell::new(entry.ordinal()),
            Cell::new(truncate(&question.prompt, 48)),
            Cell::new(&question.module),
            Cell::new(entry.user_answer_text()),
            Cell::new(entry.correct_answer_text()),
            Cell::new(format!("{}s", format_seconds(entry.time_spent_ms()))),
            Cell::new(entry.result_label()),
        ]);
    }
    println!("\n{table}");

    let mut modules = Table::new();
    modules.set_header(vec!["Module", "Correct", "Total", "Time"]);
    for tally in summary.module_breakdown() {
        modules.add_row(vec![
            Cell::new(&tally.module),
            Cell::new(tally.correct),
            Cell::new(tally.total),
            Cell::new(format_duration(tally.time_ms)),
        ]);
    }
    println!("{modules}");
    println!(
        "Score: {}/{} ({:.0}%) · {}",
        summary.correct_count(),
        summary.total(),
        summary.score_ratio() * 100.0,
        summary.meta_line()
    );
}

fn truncate(text: &str, max: usize) -> String {
    let single_line = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

fn write_reports(
    summary: &QuizSummary,
    formats: &[&str],
    output: &Path,
    title: &str,
) -> Result<()> {
    let generated_at = chrono::Utc::now();
    for format in formats {
        match *format {
            "pdf" => {
                let document = build_report(summary, title, generated_at);
                let path = write_pdf_report(&document, output)?;
                eprintln!("PDF report: {}", path.display());
            }
            "json" => {
                let report = QuizReport::from_summary(summary, generated_at);
                let path = output.join(format!(
                    "quiz-summary-{}.json",
                    generated_at.timestamp_millis()
                ));
                report.save_json(&path)?;
                eprintln!("JSON report: {}", path.display());
            }
            _ => {}
        }
    }
    Ok(())
}
