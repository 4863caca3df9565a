//! Core data models for critiq
//!
//! These models flow between the dispatcher, the analysis pipeline, the
//! feedback selector, and the history writer.

use serde::{Deserialize, Serialize};

/// Where a complexity score came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    /// Local tree-sitter traversal
    Structural,
    /// Remote LLM scorer
    Remote,
}

impl ScoreSource {
    /// Tag stored in the history `method` column
    pub fn method(&self) -> &'static str {
        match self {
            ScoreSource::Structural => "structural",
            ScoreSource::Remote => "remote",
        }
    }
}

/// Result of one complexity measurement over a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityReport {
    /// Cyclomatic complexity, always >= 1
    pub score: u32,
    pub source: ScoreSource,
}

/// Convert a cyclomatic complexity into a 0-100 quality score.
///
/// Fixed, persona-independent law: start at 100 and deduct 5 points per
/// branch path. CC above 10 is conventionally considered bad, which lands
/// at 50 here.
pub fn quality_score(complexity: u32) -> u8 {
    100u32.saturating_sub(complexity.saturating_mul(5)).min(100) as u8
}

/// One durable analysis result, owned by the history writer once enqueued.
///
/// The writer assigns the timestamp and the row id at append time; producers
/// only supply what they observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub filename: String,
    pub score: u8,
    pub persona: String,
    pub method: String,
}

impl HistoryRecord {
    pub fn new(
        filename: impl Into<String>,
        score: u8,
        persona: impl Into<String>,
        source: ScoreSource,
    ) -> Self {
        Self {
            filename: filename.into(),
            score,
            persona: persona.into(),
            method: source.method().to_string(),
        }
    }
}

/// Severity tier attached to a verdict
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Score >= 90
    Clean,
    /// Score >= 70
    #[default]
    Passable,
    /// Everything below
    Rough,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Clean => write!(f, "clean"),
            Tier::Passable => write!(f, "passable"),
            Tier::Rough => write!(f, "rough"),
        }
    }
}

/// A persona-flavored verdict for one analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub text: String,
    pub tier: Tier,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_score_deducts_five_per_branch() {
        assert_eq!(quality_score(1), 95);
        assert_eq!(quality_score(3), 85);
        assert_eq!(quality_score(10), 50);
    }

    #[test]
    fn quality_score_clamps_at_zero() {
        assert_eq!(quality_score(20), 0);
        assert_eq!(quality_score(1000), 0);
    }

    #[test]
    fn method_tags_match_history_column_values() {
        assert_eq!(ScoreSource::Structural.method(), "structural");
        assert_eq!(ScoreSource::Remote.method(), "remote");
    }
}
