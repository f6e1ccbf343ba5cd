//! quizkit CLI: timed self-study quizzes in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizkit_core::model::QuestionType;

mod commands;

#[derive(Parser)]
#[command(
    name = "quizkit",
    version,
    about = "Timed self-study quizzes with PDF summaries"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz interactively
    Take {
        /// Question bank JSON file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Number of questions
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Only include these modules (repeatable)
        #[arg(long = "module")]
        modules: Vec<String>,

        /// Only include these question types (repeatable)
        #[arg(long = "type")]
        types: Vec<QuestionType>,

        /// Include generated questions
        #[arg(long)]
        include_generated: bool,

        /// Keep bank order instead of shuffling
        #[arg(long)]
        no_shuffle: bool,

        /// Hide module names while answering
        #[arg(long)]
        hide_modules: bool,

        /// Output directory for reports
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format: pdf, json, all, none
        #[arg(long, default_value = "pdf")]
        format: String,

        /// Title printed at the top of the PDF report
        #[arg(long)]
        title: Option<String>,

        /// Do not show the live question timer
        #[arg(long)]
        no_timer: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a question bank
    Validate {
        /// Question bank JSON file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Append a question to a bank
    Add {
        /// Question bank JSON file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// JSON file holding a single question object
        #[arg(long)]
        question: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show per-module question counts
    Modules {
        /// Question bank JSON file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and sample question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizkit=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            count,
            modules,
            types,
            include_generated,
            no_shuffle,
            hide_modules,
            output,
            format,
            title,
            no_timer,
            config,
        } => {
            let options = commands::take::TakeOptions {
                bank,
                count,
                modules,
                types,
                include_generated,
                no_shuffle,
                hide_modules,
                output,
                format,
                title,
                no_timer,
            };
            commands::take::execute(options, config).await
        }
        Commands::Validate { bank, config } => commands::validate::execute(bank, config),
        Commands::Add {
            bank,
            question,
            config,
        } => commands::add::execute(bank, question, config),
        Commands::Modules { bank, config } => commands::modules::execute(bank, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
