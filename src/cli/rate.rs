//! `critiq rate` — one-shot rating for a single file

use anyhow::{anyhow, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::analysis::{AnalysisPipeline, AnalyzeError};
use crate::config::UserConfig;
use crate::history::HistoryWriter;
use crate::models::Tier;

pub fn run(file: &Path, persona: Option<String>, no_emoji: bool) -> Result<()> {
    let config = UserConfig::load();
    let persona = persona.unwrap_or_else(|| config.persona().to_string());
    let db_path = UserConfig::history_db_path()
        .ok_or_else(|| anyhow!("could not determine data directory"))?;

    let writer = HistoryWriter::spawn(db_path);
    let pipeline = AnalysisPipeline::new(persona, config.remote_scorer(), writer.channel());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    spinner.set_message("Analyzing code...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = pipeline.analyze(file);
    spinner.finish_and_clear();

    match result {
        Ok(outcome) => {
            let icon = match (outcome.verdict.tier, no_emoji) {
                (Tier::Clean, true) => "OK ",
                (Tier::Clean, false) => "🟢",
                (Tier::Passable, true) => "MEH",
                (Tier::Passable, false) => "🟡",
                (Tier::Rough, true) => "BAD",
                (Tier::Rough, false) => "🔴",
            };
            let score = format!("{}/100", outcome.score);
            let score_styled = match outcome.verdict.tier {
                Tier::Clean => style(score).green().bold(),
                Tier::Passable => style(score).yellow().bold(),
                Tier::Rough => style(score).red().bold(),
            };

            println!(
                "\n{} {} {}",
                icon,
                style(&outcome.filename).cyan().bold(),
                score_styled
            );
            if let Some(cc) = outcome.complexity {
                println!(
                    "  {} cyclomatic complexity {}",
                    style("→").dim(),
                    style(cc.to_string()).magenta()
                );
            } else {
                println!("  {} scored by remote model", style("→").dim());
            }
            println!("  {}\n", style(&outcome.verdict.text).italic());
        }
        Err(AnalyzeError::EmptySource) => {
            println!("{}", style("Nothing to rate: file is empty.").dim());
        }
        Err(AnalyzeError::UnparseableInput(_)) => {
            println!(
                "{}",
                style(format!(
                    "Syntax error in {} — fix it and try again.",
                    file.display()
                ))
                .red()
            );
        }
        Err(e) => {
            writer.shutdown(Duration::from_secs(5));
            return Err(e.into());
        }
    }

    writer.shutdown(Duration::from_secs(5));
    Ok(())
}
