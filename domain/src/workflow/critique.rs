//! Critique classification: deciding whether a review asks for changes and
//! whether a Planner reply defends rather than revises.

use crate::util::lowercase_prefix;

/// Phrases in a HeavyLifter critique that signal the solution needs work.
pub const REFINEMENT_KEYWORDS: [&str; 9] = [
    "issue",
    "problem",
    "error",
    "vulnerability",
    "bug",
    "incorrect",
    "missing",
    "needs revision",
    "major concerns",
];

/// Words that can open a clearance phrase ("no issues found").
pub const NEGATIONS: [&str; 4] = ["no", "not", "without", "zero"];

/// Words that close a clearance phrase after the keyword.
pub const CLEARANCE_WORDS: [&str; 8] = [
    "found",
    "detected",
    "identified",
    "spotted",
    "observed",
    "present",
    "remain",
    "remaining",
];

/// Auxiliaries allowed between the keyword and a clearance word
/// ("no bugs were found").
const LINKING_WORDS: [&str; 7] = ["were", "was", "are", "is", "have", "has", "been"];

/// Number of leading characters inspected for a defense marker.
pub const DEFENSE_WINDOW_CHARS: usize = 200;

/// Strategy for interpreting model replies during verification.
pub trait CritiqueClassifier: Send + Sync {
    /// Whether a critique asks for the solution to be refined.
    fn needs_refinement(&self, critique: &str) -> bool;

    /// Whether a Planner reply to a critique defends the current solution.
    fn is_defending(&self, reply: &str) -> bool;
}

/// Case-insensitive keyword matching.
///
/// Keywords match as substrings ("bugs" trips "bug"). A match is cancelled
/// only inside a clearance phrase: one of [`NEGATIONS`] right before it, and
/// after it either the end of the clause or one of [`CLEARANCE_WORDS`].
/// "No issues found." clears; "no error handling" still trips.
#[derive(Debug, Clone, Default)]
pub struct KeywordCritiqueClassifier;

impl CritiqueClassifier for KeywordCritiqueClassifier {
    fn needs_refinement(&self, critique: &str) -> bool {
        let lowered = critique.to_lowercase();
        REFINEMENT_KEYWORDS.iter().any(|kw| {
            lowered.match_indices(kw).any(|(idx, matched)| {
                let (before, after) = (&lowered[..idx], &lowered[idx + matched.len()..]);
                !(is_negated(before) && closes_clearance(after))
            })
        })
    }

    fn is_defending(&self, reply: &str) -> bool {
        lowercase_prefix(reply, DEFENSE_WINDOW_CHARS).contains("defend")
    }
}

/// Whether the text preceding a match ends in a negating word.
fn is_negated(before: &str) -> bool {
    if !before.ends_with(char::is_whitespace) {
        return false;
    }
    before
        .split_whitespace()
        .next_back()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .is_some_and(|word| NEGATIONS.contains(&word))
}

/// Whether the text following a match ends the clause or states a clearance.
///
/// The rest of the keyword's word ("s" in "issues") is skipped first.
fn closes_clearance(after: &str) -> bool {
    let rest = after.trim_start_matches(|c: char| c.is_alphanumeric());
    let rest = rest.trim_start();
    match rest.chars().next() {
        None => return true,
        Some(c) if ".,;:!?)".contains(c) => return true,
        _ => {}
    }

    for word in rest.split_whitespace() {
        let bare = word.trim_end_matches(|c: char| !c.is_alphanumeric());
        if LINKING_WORDS.contains(&bare) {
            continue;
        }
        return CLEARANCE_WORDS.contains(&bare);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_critique_passes() {
        let classifier = KeywordCritiqueClassifier;
        assert!(!classifier.needs_refinement("Looks correct and complete."));
        assert!(!classifier.needs_refinement(""));
    }

    #[test]
    fn test_each_keyword_triggers_refinement() {
        let classifier = KeywordCritiqueClassifier;
        for kw in REFINEMENT_KEYWORDS {
            let critique = format!("Reviewer notes: {}", kw.to_uppercase());
            assert!(classifier.needs_refinement(&critique), "{kw}");
        }
    }

    #[test]
    fn test_keywords_match_inside_words() {
        let classifier = KeywordCritiqueClassifier;
        assert!(classifier.needs_refinement("Several bugs remain"));
        assert!(classifier.needs_refinement("Handles errors poorly"));
    }

    #[test]
    fn test_negated_keywords_are_ignored() {
        let classifier = KeywordCritiqueClassifier;
        assert!(!classifier.needs_refinement("No issues found, solution looks complete"));
        assert!(!classifier.needs_refinement("There are no major concerns."));
        assert!(!classifier.needs_refinement("Runs without errors"));
    }

    #[test]
    fn test_negation_only_covers_the_next_word() {
        let classifier = KeywordCritiqueClassifier;
        assert!(classifier.needs_refinement("No tests, and there is a bug in parse()"));
        assert!(classifier.needs_refinement("not bad, but a vulnerability remains"));
        assert!(classifier.needs_refinement("There is a security vulnerability"));
    }

    #[test]
    fn test_negated_defect_descriptions_still_trip() {
        let classifier = KeywordCritiqueClassifier;
        assert!(classifier.needs_refinement("There is no error handling in parse()."));
        assert!(
            classifier.needs_refinement("The function has no bug checks and zero error recovery.")
        );
        assert!(classifier.needs_refinement("Does not issue a retry on timeout."));
        assert!(classifier.needs_refinement("Without error propagation the caller panics"));
    }

    #[test]
    fn test_clearance_phrases_with_auxiliaries() {
        let classifier = KeywordCritiqueClassifier;
        assert!(!classifier.needs_refinement("No bugs were found in the parser"));
        assert!(!classifier.needs_refinement("Zero errors detected; ship it"));
        assert!(!classifier.needs_refinement("No problems have been identified"));
        assert!(classifier.needs_refinement("No bugs were fixed upstream"));
    }

    #[test]
    fn test_negation_must_be_a_separate_word() {
        let classifier = KeywordCritiqueClassifier;
        assert!(classifier.needs_refinement("casino-bug"));
        assert!(classifier.needs_refinement("nobug"));
    }

    #[test]
    fn test_defense_detected_in_window() {
        let classifier = KeywordCritiqueClassifier;
        assert!(classifier.is_defending("I DEFEND my approach because..."));
        assert!(classifier.is_defending("I will defend this design."));
    }

    #[test]
    fn test_defense_outside_window_ignored() {
        let classifier = KeywordCritiqueClassifier;
        let reply = format!("{}defend", "x".repeat(DEFENSE_WINDOW_CHARS));
        assert!(!classifier.is_defending(&reply));

        let inside = format!("{}defend", "x".repeat(DEFENSE_WINDOW_CHARS - 6));
        assert!(classifier.is_defending(&inside));
    }

    #[test]
    fn test_defense_window_counts_chars_not_bytes() {
        let classifier = KeywordCritiqueClassifier;
        let reply = format!("{}defend", "é".repeat(150));
        assert!(classifier.is_defending(&reply));
    }
}
