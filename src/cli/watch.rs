//! `critiq watch` — live verdicts on file changes
//!
//! Runs the real-time pipeline: filesystem events come in from notify, the
//! dispatcher debounces and filters them, and each accepted event spawns an
//! independent analysis task. One writer thread owns the history database.
//! Ctrl+C stops the watcher, then drains the history queue with a bounded
//! wait.

use anyhow::{anyhow, Result};
use console::style;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::analysis::{AnalysisOutcome, AnalysisPipeline, AnalyzeError};
use crate::config::UserConfig;
use crate::history::HistoryWriter;
use crate::models::Tier;
use crate::watch::ChangeDispatcher;

/// Bounded wait for the history queue to drain on shutdown
const SHUTDOWN_FLUSH: Duration = Duration::from_secs(5);

pub fn run(
    path: &Path,
    persona: Option<String>,
    debounce_ms: Option<u64>,
    no_emoji: bool,
    quiet: bool,
) -> Result<()> {
    let root = std::fs::canonicalize(path)?;

    let config = UserConfig::load();
    let persona = persona.unwrap_or_else(|| config.persona().to_string());
    let debounce = debounce_ms.map(Duration::from_millis).unwrap_or_else(|| config.debounce());
    let extensions = config.extensions();
    let db_path = UserConfig::history_db_path()
        .ok_or_else(|| anyhow!("could not determine data directory"))?;

    if !quiet {
        let icon = if no_emoji { "" } else { "👁  " };
        println!(
            "\n{}Watching {} as {}...\n",
            style(icon).bold(),
            style(root.display()).cyan(),
            style(&persona).magenta()
        );
        println!(
            "  {} Extensions: {}",
            style("→").dim(),
            style(extensions.join(", ")).dim()
        );
        println!(
            "  {} Save a file to get rated{}",
            style("→").dim(),
            if config.has_remote_key() {
                " (remote scorer enabled)"
            } else {
                ""
            }
        );
        println!("  {} Press Ctrl+C to stop\n", style("→").dim());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(watch_loop(
        root, config, persona, debounce, extensions, db_path, no_emoji, quiet,
    ))
}

#[allow(clippy::too_many_arguments)]
async fn watch_loop(
    root: PathBuf,
    config: UserConfig,
    persona: String,
    debounce: Duration,
    extensions: Vec<String>,
    db_path: PathBuf,
    no_emoji: bool,
    quiet: bool,
) -> Result<()> {
    // Writer first: its channel outlives every analysis task.
    let writer = HistoryWriter::spawn(db_path);
    let pipeline = Arc::new(AnalysisPipeline::new(
        persona,
        config.remote_scorer(),
        writer.channel(),
    ));

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Event>();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;
    watcher.watch(&root, RecursiveMode::Recursive)?;

    let token = CancellationToken::new();
    let mut dispatcher = ChangeDispatcher::new(extensions, debounce);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else { break };
                if !matches!(event.kind, EventKind::Modify(_)) {
                    continue;
                }
                for path in event.paths {
                    if path.is_dir() {
                        continue;
                    }
                    if !dispatcher.accept(&path) {
                        continue;
                    }
                    spawn_analysis(pipeline.clone(), path, token.child_token(), no_emoji, quiet);
                }
            }
        }
    }

    // Stop issuing work, stop observing, then flush what was enqueued.
    token.cancel();
    drop(watcher);

    if !quiet {
        println!(
            "\n{} Flushing history...",
            if no_emoji { "" } else { "💾" }
        );
    }
    writer.shutdown(SHUTDOWN_FLUSH);
    Ok(())
}

/// One accepted event becomes one independent unit of work. A slow analysis
/// of file A must never delay detection of a change to file B.
fn spawn_analysis(
    pipeline: Arc<AnalysisPipeline>,
    path: PathBuf,
    cancel: CancellationToken,
    no_emoji: bool,
    quiet: bool,
) {
    tokio::spawn(async move {
        let display_path = path.clone();
        let work = tokio::task::spawn_blocking(move || pipeline.analyze(&path));
        tokio::select! {
            _ = cancel.cancelled() => {}
            joined = work => {
                match joined {
                    Ok(Ok(outcome)) => display_outcome(&outcome, no_emoji),
                    Ok(Err(e)) => note_skip(&display_path, &e, quiet),
                    Err(e) => warn!("analysis task for {} panicked: {e}", display_path.display()),
                }
            }
        }
    });
}

/// Render one verdict line pair in the terminal
fn display_outcome(outcome: &AnalysisOutcome, no_emoji: bool) {
    let time = chrono::Local::now().format("%H:%M:%S");
    let tier_icon = match (outcome.verdict.tier, no_emoji) {
        (Tier::Clean, true) => "OK  ",
        (Tier::Clean, false) => "🟢",
        (Tier::Passable, true) => "MEH ",
        (Tier::Passable, false) => "🟡",
        (Tier::Rough, true) => "BAD ",
        (Tier::Rough, false) => "🔴",
    };

    let score = format!("{}/100", outcome.score);
    let score_styled = match outcome.verdict.tier {
        Tier::Clean => style(score).green().bold(),
        Tier::Passable => style(score).yellow().bold(),
        Tier::Rough => style(score).red().bold(),
    };

    let detail = match outcome.complexity {
        Some(cc) => format!("complexity {cc}"),
        None => "remote".to_string(),
    };

    println!(
        "{} {} {} {} {}",
        style(format!("[{}]", time)).dim(),
        tier_icon,
        style(&outcome.filename).cyan().bold(),
        score_styled,
        style(format!("({detail})")).dim(),
    );
    println!("  {}", style(&outcome.verdict.text).italic());
}

/// A failed analysis is a local notice, never a stopped watch loop
fn note_skip(path: &Path, err: &AnalyzeError, quiet: bool) {
    match err {
        AnalyzeError::UnreadableFile { .. } => warn!("{err}"),
        AnalyzeError::EmptySource | AnalyzeError::UnsupportedLanguage(_) => debug!(
            "skipping {}: {err}",
            path.display()
        ),
        AnalyzeError::UnparseableInput(_) => {
            if !quiet {
                let time = chrono::Local::now().format("%H:%M:%S");
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                println!(
                    "{} {} {}",
                    style(format!("[{}]", time)).dim(),
                    style(name).dim(),
                    style("skipped: not syntactically valid yet").dim().italic(),
                );
            }
        }
    }
}
