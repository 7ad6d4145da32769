//! Candidate symbol and request types
//!
//! Candidates arrive already merged from one or more symbol providers (a local
//! analyzer, a remote language service, ...). The engine never looks at where
//! a candidate came from, only at its name, kind and descriptive text.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Kind of a candidate symbol
///
/// Providers report kinds as free-form strings; anything this enum doesn't
/// know about parses to `Unknown` and simply earns no kind bonus. A `null`
/// kind is `Unknown` as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum SymbolKind {
    Function,
    Method,
    Class,
    Variable,
    Property,
    Module,
    Type,
    Interface,
    Constant,
    Keyword,
    Enum,
    Field,
    Snippet,
    #[default]
    Unknown,
}

impl SymbolKind {
    /// Parse a provider kind string (case-insensitive)
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "function" => SymbolKind::Function,
            "method" => SymbolKind::Method,
            "class" => SymbolKind::Class,
            "variable" => SymbolKind::Variable,
            "property" => SymbolKind::Property,
            "module" => SymbolKind::Module,
            "type" => SymbolKind::Type,
            "interface" => SymbolKind::Interface,
            "constant" => SymbolKind::Constant,
            "keyword" => SymbolKind::Keyword,
            "enum" => SymbolKind::Enum,
            "field" => SymbolKind::Field,
            "snippet" => SymbolKind::Snippet,
            _ => SymbolKind::Unknown,
        }
    }

    /// Name used when the kind is rendered back out
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "Function",
            SymbolKind::Method => "Method",
            SymbolKind::Class => "Class",
            SymbolKind::Variable => "Variable",
            SymbolKind::Property => "Property",
            SymbolKind::Module => "Module",
            SymbolKind::Type => "Type",
            SymbolKind::Interface => "Interface",
            SymbolKind::Constant => "Constant",
            SymbolKind::Keyword => "Keyword",
            SymbolKind::Enum => "Enum",
            SymbolKind::Field => "Field",
            SymbolKind::Snippet => "Snippet",
            SymbolKind::Unknown => "Unknown",
        }
    }

    /// Whether accepting this completion should insert a call
    pub fn is_callable(&self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::Method)
    }
}

impl From<String> for SymbolKind {
    fn from(kind: String) -> Self {
        SymbolKind::parse(&kind)
    }
}

impl From<Option<String>> for SymbolKind {
    fn from(kind: Option<String>) -> Self {
        kind.map(SymbolKind::from).unwrap_or_default()
    }
}

impl From<&str> for SymbolKind {
    fn from(kind: &str) -> Self {
        SymbolKind::parse(kind)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Providers send `null` for text they don't have; treat it like a missing field
fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A named code entity eligible for suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSymbol {
    /// A `null` name decodes as empty and is skipped at scoring time
    #[serde(deserialize_with = "default_if_null")]
    pub name: String,
    #[serde(default)]
    pub kind: SymbolKind,
    /// Short type/signature text shown next to the label
    #[serde(default, deserialize_with = "default_if_null")]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl CandidateSymbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            detail: String::new(),
            documentation: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// One completion invocation: the merged candidate list plus what the user typed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(default, deserialize_with = "default_if_null")]
    pub candidates: Vec<CandidateSymbol>,
    #[serde(default, deserialize_with = "default_if_null")]
    pub prefix: String,
    #[serde(default, deserialize_with = "default_if_null")]
    pub language: String,
}
