//! Conversion of ranked candidates into host-agnostic completion records
//!
//! Mapping these records onto a particular editor's kind codes or text edit
//! ranges is left to a per-host adapter.

use super::ranking::ScoredCandidate;
use super::symbol::SymbolKind;
use serde::Serialize;

/// One entry of the completion list handed back to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCompletion {
    pub label: String,
    pub kind: SymbolKind,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub insert_text: String,
    /// Equal to the label so hosts that re-sort fall back to alphabetical order
    pub sort_text: String,
    /// Equal to the label so host-side filtering matches what is shown
    pub filter_text: String,
    pub score: f64,
}

/// Text inserted when the completion is accepted
pub fn insert_text(name: &str, kind: SymbolKind) -> String {
    if kind.is_callable() {
        format!("{}()", name)
    } else {
        name.to_string()
    }
}

impl From<ScoredCandidate> for RankedCompletion {
    fn from(candidate: ScoredCandidate) -> Self {
        let ScoredCandidate { symbol, score, .. } = candidate;
        Self {
            insert_text: insert_text(&symbol.name, symbol.kind),
            sort_text: symbol.name.clone(),
            filter_text: symbol.name.clone(),
            label: symbol.name,
            kind: symbol.kind,
            detail: symbol.detail,
            documentation: symbol.documentation,
            score,
        }
    }
}

/// Format an already ranked list, preserving its order
pub fn format_completions(ranked: Vec<ScoredCandidate>) -> Vec<RankedCompletion> {
    ranked.into_iter().map(RankedCompletion::from).collect()
}
