//! Persona feedback selection
//!
//! Pure mapping from (quality score, persona label) to a verdict. Personas
//! are a closed set; anything unrecognized falls back to the professional
//! voice rather than erroring, so a typo in config never breaks the watch
//! loop.

use crate::models::{Tier, Verdict};

/// Persona labels critiq ships with
pub const PERSONAS: &[&str] = &["savage", "professional", "gentle"];

pub const DEFAULT_PERSONA: &str = "professional";

/// Tier a quality score lands in, independent of persona
pub fn tier_for(score: u8) -> Tier {
    if score >= 90 {
        Tier::Clean
    } else if score >= 70 {
        Tier::Passable
    } else {
        Tier::Rough
    }
}

/// Select the verdict text and tier for a quality score
pub fn verdict_for(score: u8, persona: &str) -> Verdict {
    let persona = if PERSONAS.contains(&persona) {
        persona
    } else {
        DEFAULT_PERSONA
    };

    let tier = tier_for(score);
    let text = match (tier, persona) {
        (Tier::Clean, "savage") => "Shockingly adequate. I'm disappointed I can't roast this.",
        (Tier::Clean, "gentle") => "Wonderful! Your code is a shining example.",
        (Tier::Clean, _) => "Excellent work. Adheres to high standards.",
        (Tier::Passable, "savage") => "It runs, but it smells like mediocrity.",
        (Tier::Passable, "gentle") => "Good job! A few tweaks and it will be perfect.",
        (Tier::Passable, _) => "Acceptable, but room for optimization.",
        (Tier::Rough, "savage") => "My CPU hurts just looking at this nested garbage.",
        (Tier::Rough, "gentle") => {
            "Don't worry, we all write nested loops sometimes. Let's try to flatten it."
        }
        (Tier::Rough, _) => "Code complexity exceeds recommended limits. Refactor immediately.",
    };

    Verdict {
        text: text.to_string(),
        tier,
    }
}
