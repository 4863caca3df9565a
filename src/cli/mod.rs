//! CLI command definitions and handlers

mod rate;
mod watch;

use crate::config::UserConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// critiq - real-time code quality companion
///
/// 100% LOCAL by default - scoring runs on your machine; the remote scorer
/// is opt-in (BYOK).
#[derive(Parser, Debug)]
#[command(name = "critiq")]
#[command(
    version,
    about = "Watches your code, scores its complexity, and delivers persona-flavored verdicts",
    long_about = "critiq watches a directory tree and rates every saved source file. \
Each save is parsed with tree-sitter, scored by cyclomatic complexity, judged in the \
voice of your chosen persona, and appended to a local SQLite history.\n\n\
Scoring is 100% local by default. Configure an API key to let a remote model rate \
your code first; any failure on that path silently falls back to local scoring.\n\n\
Run without a subcommand to watch the current directory:\n  \
critiq .\n\n\
Supported languages: Python, TypeScript, JavaScript, Rust, Go, Java",
    after_help = "\
Examples:
  critiq .                             Watch current directory
  critiq watch src --persona savage    Watch src/ and get roasted
  critiq rate src/main.rs              Rate a single file once
  critiq init                          Write an example config file

Config: ~/.config/critiq/config.toml   History: ~/.local/share/critiq/history.db"
)]
pub struct Cli {
    /// Directory to watch (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize ~/.config/critiq/config.toml with example settings
    Init,

    /// Watch a directory and rate every save (default when omitted)
    #[command(after_help = "\
Examples:
  critiq watch .                       Watch current directory
  critiq watch . --persona gentle      Encouragement instead of roasts
  critiq watch . --debounce-ms 2000    Calm down noisy editors
  critiq watch . --quiet               Only verdicts, no banner")]
    Watch {
        /// Feedback persona: savage, professional, gentle
        #[arg(long, env = "CRITIQ_PERSONA")]
        persona: Option<String>,

        /// Debounce window for repeated saves of the same file, milliseconds
        #[arg(long)]
        debounce_ms: Option<u64>,

        /// Disable emoji in output (cleaner for CI logs)
        #[arg(long)]
        no_emoji: bool,

        /// Suppress the banner and per-save chatter
        #[arg(long)]
        quiet: bool,
    },

    /// Rate a single file once and exit
    Rate {
        /// File to rate
        file: PathBuf,

        /// Feedback persona: savage, professional, gentle
        #[arg(long, env = "CRITIQ_PERSONA")]
        persona: Option<String>,

        /// Disable emoji in output
        #[arg(long)]
        no_emoji: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Init) => {
            let path = UserConfig::init_user_config()?;
            println!("Wrote example config to {}", path.display());
            Ok(())
        }

        Some(Commands::Watch {
            persona,
            debounce_ms,
            no_emoji,
            quiet,
        }) => watch::run(&cli.path, persona, debounce_ms, no_emoji, quiet),

        Some(Commands::Rate {
            file,
            persona,
            no_emoji,
        }) => rate::run(&file, persona, no_emoji),

        // Bare `critiq [path]` watches with config defaults.
        None => watch::run(&cli.path, None, None, false, false),
    }
}
