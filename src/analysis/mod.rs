//! Per-file analysis orchestration
//!
//! One [`AnalysisPipeline::analyze`] call per accepted change event: read
//! the file, score it (remote first when configured, structural otherwise),
//! select a persona verdict, and enqueue exactly one history record.
//!
//! Every failure here is local to one file. Nothing escapes to the watch
//! loop except a typed error the caller logs.

use crate::ai::RemoteScorer;
use crate::feedback;
use crate::history::HistoryChannel;
use crate::models::{quality_score, HistoryRecord, ScoreSource, Verdict};
use crate::parsers::{self, Language, ParseError};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Reasons an analysis produced no report
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("failed to read {path}: {source}")]
    UnreadableFile {
        path: String,
        source: std::io::Error,
    },

    /// Empty or whitespace-only files are skipped, not scored as zero
    #[error("file is empty")]
    EmptySource,

    #[error("no grammar registered for extension '{0}'")]
    UnsupportedLanguage(String),

    /// Broken intermediate save states are not worth reporting
    #[error(transparent)]
    UnparseableInput(#[from] ParseError),
}

/// The user-facing result of one successful analysis
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub filename: String,
    /// Cyclomatic complexity; only present on the structural path
    pub complexity: Option<u32>,
    /// Quality score, 0-100
    pub score: u8,
    pub verdict: Verdict,
    pub source: ScoreSource,
}

/// Orchestrates scoring, feedback, and persistence for one file at a time
pub struct AnalysisPipeline {
    persona: String,
    remote: Option<RemoteScorer>,
    history: HistoryChannel,
}

impl AnalysisPipeline {
    pub fn new(persona: impl Into<String>, remote: Option<RemoteScorer>, history: HistoryChannel) -> Self {
        Self {
            persona: persona.into(),
            remote,
            history,
        }
    }

    /// Analyze one file and record the result.
    ///
    /// The remote path is tried first when configured; any failure there
    /// falls back silently to the structural scorer.
    pub fn analyze(&self, path: &Path) -> Result<AnalysisOutcome, AnalyzeError> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let source = std::fs::read_to_string(path).map_err(|e| AnalyzeError::UnreadableFile {
            path: path.display().to_string(),
            source: e,
        })?;
        if source.trim().is_empty() {
            return Err(AnalyzeError::EmptySource);
        }

        if let Some(remote) = &self.remote {
            match remote.score(&source, &self.persona) {
                Ok(remote_verdict) => {
                    let score = remote_verdict.clamped_score();
                    let outcome = AnalysisOutcome {
                        filename: filename.clone(),
                        complexity: None,
                        score,
                        verdict: Verdict {
                            text: remote_verdict.verdict,
                            tier: feedback::tier_for(score),
                        },
                        source: ScoreSource::Remote,
                    };
                    self.record(&outcome);
                    return Ok(outcome);
                }
                Err(e) => {
                    debug!("remote scorer unavailable for {filename}, falling back: {e}");
                }
            }
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let lang = Language::from_extension(ext)
            .ok_or_else(|| AnalyzeError::UnsupportedLanguage(ext.to_string()))?;

        let report = parsers::measure(&source, lang)?;
        let score = quality_score(report.score);
        let outcome = AnalysisOutcome {
            filename,
            complexity: Some(report.score),
            score,
            verdict: feedback::verdict_for(score, &self.persona),
            source: report.source,
        };
        self.record(&outcome);
        Ok(outcome)
    }

    fn record(&self, outcome: &AnalysisOutcome) {
        self.history.enqueue(HistoryRecord::new(
            outcome.filename.clone(),
            outcome.score,
            self.persona.clone(),
            outcome.source,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RemoteConfig;
    use crate::history::HistoryWriter;
    use crate::models::Tier;
    use std::time::Duration;

    struct Harness {
        dir: tempfile::TempDir,
        writer: HistoryWriter,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let writer = HistoryWriter::spawn(dir.path().join("history.db"));
            Self { dir, writer }
        }

        fn pipeline(&self, remote: Option<RemoteScorer>) -> AnalysisPipeline {
            AnalysisPipeline::new("professional", remote, self.writer.channel())
        }

        fn write_file(&self, name: &str, content: &str) -> std::path::PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }

        fn recorded_rows(self) -> Vec<(String, u8, String)> {
            let db_path = self.dir.path().join("history.db");
            assert!(self.writer.shutdown(Duration::from_secs(5)));
            let conn = rusqlite::Connection::open(db_path).unwrap();
            let rows = conn
                .prepare("SELECT filename, score, method FROM history ORDER BY id")
                .unwrap()
                .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
                .unwrap()
                .collect::<rusqlite::Result<_>>()
                .unwrap();
            rows
        }
    }

    #[test]
    fn structural_analysis_scores_and_records() {
        let harness = Harness::new();
        let path = harness.write_file("f.py", "def f():\n    for i in r:\n        if c:\n            pass\n");

        let outcome = harness.pipeline(None).analyze(&path).unwrap();
        assert_eq!(outcome.complexity, Some(3));
        assert_eq!(outcome.score, 85);
        assert_eq!(outcome.verdict.tier, Tier::Passable);
        assert_eq!(outcome.source, ScoreSource::Structural);

        let rows = harness.recorded_rows();
        assert_eq!(rows, vec![("f.py".to_string(), 85, "structural".to_string())]);
    }

    #[test]
    fn unreadable_file_aborts_without_side_effects() {
        let harness = Harness::new();
        let missing = harness.dir.path().join("gone.py");

        let err = harness.pipeline(None).analyze(&missing).unwrap_err();
        assert!(matches!(err, AnalyzeError::UnreadableFile { .. }));
        assert!(harness.recorded_rows().is_empty());
    }

    #[test]
    fn empty_file_is_skipped() {
        let harness = Harness::new();
        let path = harness.write_file("empty.py", "   \n\n");

        let err = harness.pipeline(None).analyze(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::EmptySource));
        assert!(harness.recorded_rows().is_empty());
    }

    #[test]
    fn unparseable_input_persists_nothing() {
        let harness = Harness::new();
        let path = harness.write_file("broken.py", "def broken(:\n    pass\n");

        let err = harness.pipeline(None).analyze(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::UnparseableInput(_)));
        assert!(harness.recorded_rows().is_empty());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let harness = Harness::new();
        let path = harness.write_file("notes.txt", "just text\n");

        let err = harness.pipeline(None).analyze(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::UnsupportedLanguage(_)));
    }

    #[test]
    fn remote_failure_falls_back_to_structural() {
        let harness = Harness::new();
        let path = harness.write_file("g.py", "x = 1\n");

        // Nothing listens on the discard port, so the remote path fails and
        // the structural scorer must still produce exactly one record.
        let remote = RemoteScorer::new(
            RemoteConfig {
                api_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
                timeout: Duration::from_secs(2),
                ..Default::default()
            },
            "test-key",
        );

        let outcome = harness.pipeline(Some(remote)).analyze(&path).unwrap();
        assert_eq!(outcome.source, ScoreSource::Structural);
        assert_eq!(outcome.complexity, Some(1));

        let rows = harness.recorded_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].2, "structural");
    }
}
