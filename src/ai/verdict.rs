//! Structured-verdict extraction from raw model output
//!
//! Models ignore "raw JSON only" instructions often enough that the
//! response must be treated as prose with a JSON object buried inside.
//! Extraction strategy: take the first balanced `{...}` substring, with
//! string literals and escapes respected, and deserialize that.

use crate::ai::{RemoteError, RemoteResult};
use serde::Deserialize;

/// The structure the remote scorer must produce
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteVerdict {
    pub score: i64,
    pub verdict: String,
}

impl RemoteVerdict {
    /// Score clamped to the 0-100 contract
    pub fn clamped_score(&self) -> u8 {
        self.score.clamp(0, 100) as u8
    }
}

/// Parse a `{score, verdict}` object out of arbitrary model output.
pub fn parse_structured_verdict(raw: &str) -> RemoteResult<RemoteVerdict> {
    let object = first_balanced_object(raw)
        .ok_or_else(|| RemoteError::Malformed("no JSON object in response".to_string()))?;

    serde_json::from_str(object).map_err(|e| RemoteError::Malformed(e.to_string()))
}

/// Find the first balanced top-level `{...}` substring
fn first_balanced_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let v = parse_structured_verdict(r#"{"score": 85, "verdict": "Good code."}"#).unwrap();
        assert_eq!(v.score, 85);
        assert_eq!(v.verdict, "Good code.");
    }

    #[test]
    fn parses_json_inside_markdown_fences() {
        let raw = "```json\n{\"score\": 42, \"verdict\": \"Needs work.\"}\n```";
        let v = parse_structured_verdict(raw).unwrap();
        assert_eq!(v.score, 42);
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let raw = "Here is my assessment: {\"score\": 70, \"verdict\": \"Passable.\"} Hope that helps!";
        let v = parse_structured_verdict(raw).unwrap();
        assert_eq!(v.verdict, "Passable.");
    }

    #[test]
    fn braces_inside_strings_do_not_truncate() {
        let raw = r#"{"score": 55, "verdict": "Too many {curly} braces in here."}"#;
        let v = parse_structured_verdict(raw).unwrap();
        assert_eq!(v.verdict, "Too many {curly} braces in here.");
    }

    #[test]
    fn escaped_quotes_inside_strings() {
        let raw = r#"{"score": 60, "verdict": "He said \"fine\"."}"#;
        let v = parse_structured_verdict(raw).unwrap();
        assert_eq!(v.score, 60);
    }

    #[test]
    fn takes_the_first_object_when_several_exist() {
        let raw = r#"{"score": 10, "verdict": "first"} {"score": 90, "verdict": "second"}"#;
        let v = parse_structured_verdict(raw).unwrap();
        assert_eq!(v.verdict, "first");
    }

    #[test]
    fn non_json_text_is_malformed() {
        let err = parse_structured_verdict("I cannot rate this code.").unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn unbalanced_object_is_malformed() {
        let err = parse_structured_verdict(r#"{"score": 10, "verdict": "oops"#).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = parse_structured_verdict(r#"{"rating": 10}"#).unwrap_err();
        assert!(matches!(err, RemoteError::Malformed(_)));
    }

    #[test]
    fn out_of_range_scores_clamp() {
        let v = parse_structured_verdict(r#"{"score": 250, "verdict": "suspicious"}"#).unwrap();
        assert_eq!(v.clamped_score(), 100);
        let v = parse_structured_verdict(r#"{"score": -5, "verdict": "hostile"}"#).unwrap();
        assert_eq!(v.clamped_score(), 0);
    }
}
