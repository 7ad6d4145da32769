//! Match classification and relevance scoring
//!
//! Each candidate name is classified against the typed prefix into exactly one
//! match class. Classes are checked in priority order and the first hit wins:
//!
//! 1. Exact (case-insensitive equality) - always 1.0, no bonuses
//! 2. Empty prefix - flat bonuses for callable/class kinds and recency
//! 3. Prefix - name starts with the prefix
//! 4. Substring - prefix occurs later in the name
//! 5. Fuzzy - prefix characters appear in order
//!
//! Classes 3-5 add the kind bonus table and the recency bonus on top of their
//! base score. All scores are clamped to `[0, 1]`.

use super::symbol::SymbolKind;
use super::usage::UsageTracker;
use serde::Serialize;
use thiserror::Error;

const BASE_SCORE: f64 = 0.5;

const EMPTY_PREFIX_KIND_BONUS: f64 = 0.2;
const EMPTY_PREFIX_RECENT_BONUS: f64 = 0.3;

const PREFIX_MATCH_BONUS: f64 = 0.4;
const PREFIX_CASE_BONUS: f64 = 0.1;
const PREFIX_LENGTH_BONUS: f64 = 0.05;
const PREFIX_LENGTH_THRESHOLD: usize = 3;

const SUBSTRING_MATCH_BONUS: f64 = 0.2;
const WORD_BOUNDARY_BONUS: f64 = 0.1;

const FUZZY_MATCH_BONUS: f64 = 0.15;

const RECENT_BONUS: f64 = 0.2;

/// Characters that start a new word inside an identifier
const WORD_SEPARATORS: [char; 3] = [' ', '_', '-'];

/// Which rule produced a candidate's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKind {
    Exact,
    EmptyPrefix,
    Prefix,
    Substring,
    Fuzzy,
    None,
}

/// Score assigned to one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub value: f64,
    pub match_kind: MatchKind,
}

impl Score {
    fn clamped(value: f64, match_kind: MatchKind) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            match_kind,
        }
    }
}

/// Reasons a single candidate can't be scored
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("candidate has an empty name")]
    EmptyName,

    #[error("candidate name {name:?} contains control characters")]
    ControlCharacter { name: String },
}

/// Kind bonus applied in the prefix, substring and fuzzy classes
pub fn kind_bonus(kind: SymbolKind) -> f64 {
    match kind {
        SymbolKind::Function => 0.10,
        SymbolKind::Method => 0.08,
        SymbolKind::Constant => 0.05,
        SymbolKind::Class => 0.05,
        SymbolKind::Type => 0.03,
        SymbolKind::Property => 0.02,
        SymbolKind::Module => 0.02,
        SymbolKind::Interface => 0.02,
        _ => 0.0,
    }
}

/// Per-request scoring state
///
/// Built once per completion request so the lowercased prefix is computed a
/// single time rather than per candidate.
#[derive(Debug)]
pub struct ScoringContext<'a> {
    prefix: &'a str,
    prefix_lower: String,
    prefix_len: usize,
    language: &'a str,
    usage: &'a UsageTracker,
}

impl<'a> ScoringContext<'a> {
    pub fn new(prefix: &'a str, language: &'a str, usage: &'a UsageTracker) -> Self {
        Self {
            prefix,
            prefix_lower: prefix.to_lowercase(),
            prefix_len: prefix.chars().count(),
            language,
            usage,
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix
    }

    pub fn language(&self) -> &str {
        self.language
    }

    /// Score a single candidate
    pub fn score(&self, name: &str, kind: SymbolKind) -> Result<Score, ScoreError> {
        if name.trim().is_empty() {
            return Err(ScoreError::EmptyName);
        }
        if name.chars().any(char::is_control) {
            return Err(ScoreError::ControlCharacter {
                name: name.to_string(),
            });
        }

        let name_lower = name.to_lowercase();

        if name_lower == self.prefix_lower {
            return Ok(Score {
                value: 1.0,
                match_kind: MatchKind::Exact,
            });
        }

        let recent = self.usage.is_recently_used(name);

        if self.prefix.is_empty() {
            let mut score = BASE_SCORE;
            if matches!(kind, SymbolKind::Function | SymbolKind::Class) {
                score += EMPTY_PREFIX_KIND_BONUS;
            }
            if recent {
                score += EMPTY_PREFIX_RECENT_BONUS;
            }
            return Ok(Score::clamped(score, MatchKind::EmptyPrefix));
        }

        let (base, match_kind) = if name_lower.starts_with(&self.prefix_lower) {
            let mut score = BASE_SCORE + PREFIX_MATCH_BONUS;
            if name.starts_with(self.prefix) {
                score += PREFIX_CASE_BONUS;
            }
            if self.prefix_len >= PREFIX_LENGTH_THRESHOLD {
                score += PREFIX_LENGTH_BONUS;
            }
            (score, MatchKind::Prefix)
        } else if let Some(index) = name_lower.find(&self.prefix_lower) {
            let mut score = BASE_SCORE + SUBSTRING_MATCH_BONUS;
            if starts_word(&name_lower, index) {
                score += WORD_BOUNDARY_BONUS;
            }
            (score, MatchKind::Substring)
        } else if is_subsequence(&self.prefix_lower, &name_lower) {
            (BASE_SCORE + FUZZY_MATCH_BONUS, MatchKind::Fuzzy)
        } else {
            return Ok(Score {
                value: 0.0,
                match_kind: MatchKind::None,
            });
        };

        let mut score = base + kind_bonus(kind);
        if recent {
            score += RECENT_BONUS;
        }

        Ok(Score::clamped(score, match_kind))
    }
}

/// True if the match at byte offset `index` begins the string or follows a separator
fn starts_word(haystack: &str, index: usize) -> bool {
    match haystack[..index].chars().next_back() {
        None => true,
        Some(c) => WORD_SEPARATORS.contains(&c),
    }
}

/// True if every char of `needle` appears in `haystack` in order
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut remaining = haystack.chars();
    needle.chars().all(|wanted| remaining.any(|c| c == wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn score(name: &str, prefix: &str, kind: SymbolKind) -> Score {
        let usage = UsageTracker::new();
        ScoringContext::new(prefix, "javascript", &usage)
            .score(name, kind)
            .unwrap()
    }

    fn score_with(usage: &UsageTracker, name: &str, prefix: &str, kind: SymbolKind) -> Score {
        ScoringContext::new(prefix, "javascript", usage)
            .score(name, kind)
            .unwrap()
    }

    #[test]
    fn test_exact_match_scores_one() {
        let s = score("console", "console", SymbolKind::Variable);
        assert_eq!(s.value, 1.0);
        assert_eq!(s.match_kind, MatchKind::Exact);

        let s = score("Console", "cONSOLE", SymbolKind::Function);
        assert_eq!(s.value, 1.0);
        assert_eq!(s.match_kind, MatchKind::Exact);
    }

    #[test]
    fn test_empty_prefix_flat_bonuses() {
        let s = score("myVar", "", SymbolKind::Variable);
        assert!((s.value - 0.5).abs() < EPSILON);
        assert_eq!(s.match_kind, MatchKind::EmptyPrefix);

        let s = score("myFunc", "", SymbolKind::Function);
        assert!((s.value - 0.7).abs() < EPSILON);

        // Method gets no bonus here; only Function and Class do
        let s = score("myMethod", "", SymbolKind::Method);
        assert!((s.value - 0.5).abs() < EPSILON);

        let mut usage = UsageTracker::new();
        usage.record_usage("MyClass");
        let s = score_with(&usage, "MyClass", "", SymbolKind::Class);
        assert!((s.value - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_prefix_match_bonuses() {
        // 0.9 + 0.1 (case) + 0.0 (short prefix)
        let s = score("console", "co", SymbolKind::Variable);
        assert_eq!(s.match_kind, MatchKind::Prefix);
        assert!((s.value - 1.0).abs() < EPSILON);

        // 0.9 (case differs) + 0.05 (length) + 0.0
        let s = score("console", "CON", SymbolKind::Variable);
        assert!((s.value - 0.95).abs() < EPSILON);

        // 0.9 only
        let s = score("console", "Co", SymbolKind::Variable);
        assert!((s.value - 0.9).abs() < EPSILON);

        // 0.9 + 0.02 (property)
        let s = score("classList", "CL", SymbolKind::Property);
        assert!((s.value - 0.92).abs() < EPSILON);
    }

    #[test]
    fn test_prefix_match_clamped() {
        let mut usage = UsageTracker::new();
        usage.record_usage("consoleLog");
        let s = score_with(&usage, "consoleLog", "con", SymbolKind::Function);
        assert_eq!(s.value, 1.0);
    }

    #[test]
    fn test_substring_match() {
        let s = score("dconsole", "con", SymbolKind::Variable);
        assert_eq!(s.match_kind, MatchKind::Substring);
        assert!((s.value - 0.7).abs() < EPSILON);

        let s = score("get_value", "val", SymbolKind::Variable);
        assert_eq!(s.match_kind, MatchKind::Substring);
        assert!((s.value - 0.8).abs() < EPSILON);

        let s = score("my-value", "val", SymbolKind::Function);
        assert!((s.value - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_substring_space_boundary() {
        let s = score("my value", "val", SymbolKind::Variable);
        assert_eq!(s.match_kind, MatchKind::Substring);
        assert!((s.value - 0.8).abs() < EPSILON);
    }

    #[test]
    fn test_substring_boundary_uses_first_occurrence() {
        // First "val" is mid-word, so no boundary bonus
        let s = score("intervals_value", "val", SymbolKind::Variable);
        assert_eq!(s.match_kind, MatchKind::Substring);
        assert!((s.value - 0.7).abs() < EPSILON);
    }

    #[test]
    fn test_fuzzy_match() {
        let s = score("getElementById", "gebi", SymbolKind::Method);
        assert_eq!(s.match_kind, MatchKind::Fuzzy);
        assert!((s.value - 0.73).abs() < EPSILON);
    }

    #[test]
    fn test_no_match() {
        let s = score("console", "xyz", SymbolKind::Function);
        assert_eq!(s.match_kind, MatchKind::None);
        assert_eq!(s.value, 0.0);
    }

    #[test]
    fn test_recency_bonus_in_match_classes() {
        let mut usage = UsageTracker::new();
        usage.record_usage("dconsole");
        let s = score_with(&usage, "dconsole", "con", SymbolKind::Variable);
        assert!((s.value - 0.9).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_kind_gets_no_bonus() {
        let s = score("dconsole", "con", SymbolKind::Unknown);
        assert!((s.value - 0.7).abs() < EPSILON);
        assert_eq!(kind_bonus(SymbolKind::Keyword), 0.0);
        assert_eq!(kind_bonus(SymbolKind::Variable), 0.0);
    }

    #[test]
    fn test_class_ordering() {
        let prefix = score("valueOf", "val", SymbolKind::Variable);
        let substring = score("intervalue", "val", SymbolKind::Variable);
        let fuzzy = score("vertical", "val", SymbolKind::Variable);

        assert_eq!(fuzzy.match_kind, MatchKind::Fuzzy);
        assert!(prefix.value > substring.value);
        assert!(substring.value > fuzzy.value);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let usage = UsageTracker::new();
        let ctx = ScoringContext::new("a", "rust", &usage);

        assert_eq!(ctx.score("", SymbolKind::Variable), Err(ScoreError::EmptyName));
        assert_eq!(ctx.score("  ", SymbolKind::Variable), Err(ScoreError::EmptyName));
        assert!(matches!(
            ctx.score("bad\nname", SymbolKind::Variable),
            Err(ScoreError::ControlCharacter { .. })
        ));
    }

    #[test]
    fn test_subsequence_helper() {
        assert!(is_subsequence("cl", "classlist"));
        assert!(is_subsequence("", "anything"));
        assert!(!is_subsequence("lc", "cl"));
    }
}
