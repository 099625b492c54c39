//! hafalan CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use hafalan_core::model::{ItemKind, Language, LanguageFilter};

mod commands;

#[derive(Parser)]
#[command(
    name = "hafalan",
    version,
    about = "Vocabulary and notes quiz with mastery tracking"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Practice vocabulary by typing translations
    Quiz {
        /// Source language (indonesian, english, mandarin, japanese or "any")
        #[arg(long, default_value = "any")]
        from: LanguageFilter,

        /// Target language (indonesian, english, mandarin, japanese or "any")
        #[arg(long, default_value = "any")]
        to: LanguageFilter,

        /// Maximum number of questions (default from config)
        #[arg(long)]
        max: Option<usize>,

        /// Also ask about concepts already mastered
        #[arg(long, overrides_with = "no_include_mastered")]
        include_mastered: bool,

        /// Leave mastered concepts out even if the config includes them
        #[arg(long, overrides_with = "include_mastered")]
        no_include_mastered: bool,

        /// Seed for question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Practice notes by recalling their content
    NotesQuiz {
        /// Maximum number of notes (default from config)
        #[arg(long)]
        max: Option<usize>,

        /// Also ask about notes already mastered
        #[arg(long, overrides_with = "no_include_mastered")]
        include_mastered: bool,

        /// Leave mastered notes out even if the config includes them
        #[arg(long, overrides_with = "include_mastered")]
        no_include_mastered: bool,

        /// Seed for question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Mark a concept or note as mastered (or unmastered with --unset)
    Master {
        /// Item kind: concept or note
        kind: ItemKind,

        /// Item id
        id: i64,

        /// Clear the mastered flag instead of setting it
        #[arg(long)]
        unset: bool,
    },

    /// Add or update the translation of a concept in one language
    Translate {
        /// Concept id
        concept_id: i64,

        /// Language of the translation
        language: Language,

        /// The term in that language
        term: String,

        /// Pronunciation hint
        #[arg(long, default_value = "")]
        pronunciation: String,

        /// Meaning or usage gloss
        #[arg(long, default_value = "")]
        gloss: String,
    },

    /// Show collection statistics
    Stats {
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Create a starter config file
    Init,
}

/// `--flag` / `--no-flag` to an override; `None` defers to the config.
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hafalan=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Quiz {
            from,
            to,
            max,
            include_mastered,
            no_include_mastered,
            seed,
        } => {
            let include_mastered = flag_pair(include_mastered, no_include_mastered);
            commands::quiz::execute(config, from, to, max, include_mastered, seed).await
        }
        Commands::NotesQuiz {
            max,
            include_mastered,
            no_include_mastered,
            seed,
        } => {
            let include_mastered = flag_pair(include_mastered, no_include_mastered);
            commands::notes_quiz::execute(config, max, include_mastered, seed).await
        }
        Commands::Master { kind, id, unset } => {
            commands::master::execute(config, kind, id, unset).await
        }
        Commands::Translate {
            concept_id,
            language,
            term,
            pronunciation,
            gloss,
        } => {
            commands::translate::execute(config, concept_id, language, term, pronunciation, gloss)
                .await
        }
        Commands::Stats { json } => commands::stats::execute(config, json).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
