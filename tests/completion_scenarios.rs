/// Integration tests for the completion pipeline
///
/// Tests verify:
/// - Ranking of the canonical prefix/substring/fuzzy scenarios
/// - Usage-based personalization
/// - JSON request handling, including malformed input and null fields
/// - Result limits and deduplication across providers

use indoc::indoc;
use std::sync::Arc;
use symbol_completion_ranker::completion::{
    CandidateSymbol, CompletionEngine, RankedCompletion, SymbolKind,
};
use symbol_completion_ranker::metrics::Metrics;

fn engine() -> CompletionEngine {
    CompletionEngine::new().with_metrics(Arc::new(Metrics::new()))
}

fn find<'a>(completions: &'a [RankedCompletion], label: &str) -> &'a RankedCompletion {
    completions
        .iter()
        .find(|c| c.label == label)
        .unwrap_or_else(|| panic!("{} missing from {:?}", label, completions))
}

#[test]
fn test_exact_match_scores_one() {
    let completions = engine().generate_completions(
        vec![CandidateSymbol::new("console", SymbolKind::Variable)],
        "console",
        "javascript",
    );

    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].score, 1.0);
    assert_eq!(completions[0].insert_text, "console");
}

#[test]
fn test_prefix_ranks_before_substring() {
    let completions = engine().generate_completions(
        vec![
            CandidateSymbol::new("dconsole", SymbolKind::Unknown),
            CandidateSymbol::new("console", SymbolKind::Unknown),
        ],
        "con",
        "javascript",
    );

    let labels: Vec<_> = completions.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["console", "dconsole"]);
}

#[test]
fn test_empty_prefix_prefers_functions() {
    let completions = engine().generate_completions(
        vec![
            CandidateSymbol::new("myVar", SymbolKind::Variable),
            CandidateSymbol::new("myFunc", SymbolKind::Function),
        ],
        "",
        "javascript",
    );

    let func = find(&completions, "myFunc");
    let var = find(&completions, "myVar");
    assert!(func.score >= var.score);
    assert_eq!(completions[0].label, "myFunc");
}

#[test]
fn test_short_prefix_includes_property() {
    let completions = engine().generate_completions(
        vec![CandidateSymbol::new("classList", SymbolKind::Property)],
        "cl",
        "javascript",
    );

    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].label, "classList");
    assert_eq!(completions[0].insert_text, "classList");
}

#[test]
fn test_output_capped_at_fifty() {
    let candidates = (0..100)
        .map(|i| CandidateSymbol::new(format!("var_{}", i), SymbolKind::Variable))
        .collect();

    let completions = engine().generate_completions(candidates, "var", "javascript");

    assert_eq!(completions.len(), 50);
    // All tie on score and frequency, so provider order is kept
    assert_eq!(completions[0].label, "var_0");
    assert_eq!(completions[49].label, "var_49");
}

#[test]
fn test_recorded_usage_boosts_score() {
    let mut engine = engine();
    engine.record_usage("console");

    let completions = engine.generate_completions(
        vec![
            CandidateSymbol::new("document", SymbolKind::Variable),
            CandidateSymbol::new("console", SymbolKind::Variable),
        ],
        "",
        "javascript",
    );

    assert!(find(&completions, "console").score > find(&completions, "document").score);
    assert_eq!(completions[0].label, "console");
}

#[test]
fn test_frequency_breaks_score_ties() {
    let mut engine = engine();
    engine.reset();
    engine.record_usage("alpha");
    engine.record_usage("beta");
    engine.record_usage("beta");

    let completions = engine.generate_completions(
        vec![
            CandidateSymbol::new("alpha", SymbolKind::Variable),
            CandidateSymbol::new("beta", SymbolKind::Variable),
        ],
        "",
        "python",
    );

    // Both recently used with equal scores; beta has the higher count
    assert_eq!(completions[0].score, completions[1].score);
    assert_eq!(completions[0].label, "beta");
}

#[test]
fn test_duplicates_across_providers_collapse() {
    let request = indoc! {r#"
        {
          "prefix": "get",
          "language": "typescript",
          "candidates": [
            { "name": "getItem", "kind": "Method", "detail": "local analyzer" },
            { "name": "getItem", "kind": "Function", "detail": "remote service" },
            { "name": "getAll", "kind": "Function", "documentation": "Fetch everything" }
          ]
        }
    "#};

    let completions = engine().complete_json(request);

    assert_eq!(completions.len(), 2);
    let item = find(&completions, "getItem");
    assert_eq!(item.detail, "local analyzer");
    assert_eq!(item.insert_text, "getItem()");
    assert_eq!(
        find(&completions, "getAll").documentation.as_deref(),
        Some("Fetch everything")
    );
}

#[test]
fn test_unknown_kind_tolerated() {
    let request = indoc! {r#"
        {
          "prefix": "tp",
          "candidates": [
            { "name": "tparam", "kind": "TypeParameter" }
          ]
        }
    "#};

    let completions = engine().complete_json(request);

    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].kind, SymbolKind::Unknown);
    assert!((completions[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn test_null_kind_and_detail_tolerated() {
    let engine = engine();

    let null_kind = indoc! {r#"
        {
          "prefix": "con",
          "language": "javascript",
          "candidates": [
            { "name": "console", "kind": null },
            { "name": "constant", "kind": "Constant" }
          ]
        }
    "#};
    let completions = engine.complete_json(null_kind);
    assert_eq!(completions.len(), 2);
    assert_eq!(find(&completions, "console").kind, SymbolKind::Unknown);
    assert_eq!(find(&completions, "constant").kind, SymbolKind::Constant);

    let null_detail = indoc! {r#"
        {
          "prefix": "con",
          "language": null,
          "candidates": [
            { "name": "connect", "kind": "Function", "detail": null },
            { "name": "constant", "kind": "Constant", "detail": "const constant: number" }
          ]
        }
    "#};
    let completions = engine.complete_json(null_detail);
    assert_eq!(completions.len(), 2);
    assert_eq!(find(&completions, "connect").detail, "");
    assert_eq!(find(&completions, "connect").insert_text, "connect()");
    assert_eq!(find(&completions, "constant").detail, "const constant: number");
}

#[test]
fn test_malformed_request_is_empty() {
    let engine = engine();
    assert!(engine.complete_json("").is_empty());
    assert!(engine.complete_json(r#"{"candidates": [{"kind": "Function"}]}"#).is_empty());
}

#[test]
fn test_no_match_excluded() {
    let completions = engine().generate_completions(
        vec![
            CandidateSymbol::new("window", SymbolKind::Variable),
            CandidateSymbol::new("alert", SymbolKind::Function),
        ],
        "zq",
        "javascript",
    );
    assert!(completions.is_empty());
}

#[test]
fn test_output_serializes_for_hosts() {
    let completions = engine().generate_completions(
        vec![CandidateSymbol::new("push", SymbolKind::Method).with_detail("(item) => number")],
        "pu",
        "javascript",
    );

    let json = serde_json::to_value(&completions).unwrap();
    assert_eq!(json[0]["label"], "push");
    assert_eq!(json[0]["kind"], "Method");
    assert_eq!(json[0]["insertText"], "push()");
    assert_eq!(json[0]["sortText"], "push");
    assert_eq!(json[0]["filterText"], "push");
}
