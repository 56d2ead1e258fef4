//! Memory importance scoring.
//!
//! Importance starts at [`BASE_IMPORTANCE`], gains the bonus of every rule
//! in [`IMPORTANCE_RULES`] whose keyword family appears in its source text,
//! and is capped at [`MAX_IMPORTANCE`]. Matching is case-insensitive
//! substring search, so `"trusting"` satisfies the `trust` family.

/// Importance of a memory no rule fired for.
pub const BASE_IMPORTANCE: u8 = 1;

/// Ceiling for any memory.
pub const MAX_IMPORTANCE: u8 = 10;

/// Which text an importance rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportanceSource {
    /// The comma-joined emotion tags of the turn.
    EmotionalContext,
    /// The extracted snippet itself.
    Content,
}

/// One row of the importance table.
#[derive(Debug, Clone, Copy)]
pub struct ImportanceRule {
    /// Text the rule looks at.
    pub source: ImportanceSource,
    /// Any of these substrings triggers the bonus.
    pub any_of: &'static [&'static str],
    /// Added once when triggered.
    pub bonus: u8,
}

/// The importance table.
pub const IMPORTANCE_RULES: &[ImportanceRule] = &[
    ImportanceRule { source: ImportanceSource::EmotionalContext, any_of: &["angry", "furious"], bonus: 3 },
    ImportanceRule { source: ImportanceSource::EmotionalContext, any_of: &["happy", "excited"], bonus: 2 },
    ImportanceRule { source: ImportanceSource::EmotionalContext, any_of: &["sad", "hurt"], bonus: 2 },
    ImportanceRule { source: ImportanceSource::EmotionalContext, any_of: &["trust", "betrayal"], bonus: 4 },
    ImportanceRule { source: ImportanceSource::Content, any_of: &["promise", "deal", "agreement"], bonus: 3 },
    ImportanceRule { source: ImportanceSource::Content, any_of: &["secret", "confidential"], bonus: 3 },
    ImportanceRule { source: ImportanceSource::Content, any_of: &["quest", "mission"], bonus: 2 },
    ImportanceRule { source: ImportanceSource::Content, any_of: &["crypto", "money", "payment"], bonus: 2 },
    ImportanceRule { source: ImportanceSource::Content, any_of: &["relationship", "romantic", "intimate"], bonus: 3 },
    ImportanceRule { source: ImportanceSource::Content, any_of: &["family", "home", "background"], bonus: 2 },
];

/// Score a snippet given the emotion tags of the turn it came from.
#[must_use]
pub fn score(snippet: &str, emotional_context: Option<&str>) -> u8 {
    let content = snippet.to_lowercase();
    let emotions = emotional_context.map(str::to_lowercase);

    let total = IMPORTANCE_RULES
        .iter()
        .filter(|rule| {
            let haystack = match rule.source {
                ImportanceSource::Content => Some(content.as_str()),
                ImportanceSource::EmotionalContext => emotions.as_deref(),
            };
            haystack.is_some_and(|text| rule.any_of.iter().any(|kw| text.contains(kw)))
        })
        .fold(u32::from(BASE_IMPORTANCE), |acc, rule| acc + u32::from(rule.bonus));

    u8::try_from(total.min(u32::from(MAX_IMPORTANCE))).unwrap_or(MAX_IMPORTANCE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_snippet_scores_base() {
        assert_eq!(score("I went outside today", None), BASE_IMPORTANCE);
    }

    #[test]
    fn promise_adds_three() {
        assert_eq!(score("I promise to bring you", None), 4);
    }

    #[test]
    fn each_family_counts_once() {
        // "promise" and "deal" share a family.
        assert_eq!(score("A promise is a deal", None), 4);
    }

    #[test]
    fn emotion_tags_add_bonuses() {
        // "trusting" hits the trust family, "angry" the anger family.
        assert_eq!(score("Something happened", Some("angry, trusting")), 1 + 3 + 4);
        // npc_angry carries the same substring.
        assert_eq!(score("Something happened", Some("npc_angry")), 4);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(score("My FAMILY lives far away", None), 3);
    }

    #[test]
    fn score_is_capped() {
        let loaded = "promise secret quest crypto romantic family";
        assert_eq!(score(loaded, Some("angry, happy, sad, trust")), MAX_IMPORTANCE);
    }
}
