//! Random completion inputs for property-based testing.
//!
//! Candidates are produced as plain JSON values so this crate stays
//! independent of the crate under test; tests decode them into the real
//! request types.
//!
//! Names are drawn from a small vocabulary joined with the separators the
//! scorer treats as word boundaries, which keeps duplicate names and the
//! prefix, substring and fuzzy match classes all reasonably likely.

use quickcheck::{Arbitrary, Gen};
use serde_json::{Value, json};

/// Word fragments used to build identifiers
const FRAGMENTS: &[&str] = &[
    "get", "set", "value", "con", "console", "log", "doc", "list", "class", "item", "Var", "X",
];

const SEPARATORS: &[&str] = &["", "_", "-", " "];

const LANGUAGES: &[&str] = &["javascript", "typescript", "python", ""];

/// Kind strings as a provider would send them, including one no kind table knows
pub const KINDS: &[&str] = &[
    "Function", "Method", "Class", "Variable", "Property", "Module", "Type", "Interface",
    "Constant", "Keyword", "method", "TypeParameter",
];

/// One generated candidate symbol
#[derive(Clone, Debug)]
pub struct GeneratedCandidate {
    pub name: String,
    pub kind: &'static str,
    pub detail: String,
    pub documentation: Option<String>,
}

impl GeneratedCandidate {
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "name": self.name,
            "kind": self.kind,
            "detail": self.detail,
        });
        if let Some(doc) = &self.documentation {
            value["documentation"] = json!(doc);
        }
        value
    }
}

fn gen_name(g: &mut Gen) -> String {
    let parts = 1 + usize::arbitrary(g) % 3;
    let mut name = String::new();
    for i in 0..parts {
        if i > 0 {
            name.push_str(g.choose(SEPARATORS).copied().unwrap_or(""));
        }
        name.push_str(g.choose(FRAGMENTS).copied().unwrap_or("x"));
    }
    name
}

impl Arbitrary for GeneratedCandidate {
    fn arbitrary(g: &mut Gen) -> Self {
        let name = gen_name(g);
        GeneratedCandidate {
            detail: format!("detail of {}", name),
            documentation: if bool::arbitrary(g) {
                Some(format!("Docs for {}", name))
            } else {
                None
            },
            kind: g.choose(KINDS).copied().unwrap_or("Variable"),
            name,
        }
    }
}

/// A whole completion request
#[derive(Clone, Debug)]
pub struct GeneratedRequest {
    pub candidates: Vec<GeneratedCandidate>,
    pub prefix: String,
    pub language: String,
}

impl GeneratedRequest {
    pub fn to_json(&self) -> Value {
        json!({
            "candidates": self.candidates.iter().map(GeneratedCandidate::to_json).collect::<Vec<_>>(),
            "prefix": self.prefix,
            "language": self.language,
        })
    }
}

impl Arbitrary for GeneratedRequest {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 120;
        let candidates: Vec<GeneratedCandidate> =
            (0..count).map(|_| GeneratedCandidate::arbitrary(g)).collect();

        // Prefixes are mostly fragments, sometimes a slice of a real candidate, sometimes empty
        let prefix = match u8::arbitrary(g) % 4 {
            0 => String::new(),
            1 => match g.choose(candidates.as_slice()) {
                Some(c) => c.name.chars().take(1 + usize::arbitrary(g) % 4).collect(),
                None => String::new(),
            },
            _ => g.choose(FRAGMENTS).copied().unwrap_or("").to_string(),
        };

        GeneratedRequest {
            candidates,
            prefix,
            language: g
                .choose(LANGUAGES)
                .copied()
                .unwrap_or("")
                .to_string(),
        }
    }
}

/// Names `base_0 .. base_{count-1}`, all of the given kind
pub fn numbered_candidates(base: &str, kind: &str, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| json!({ "name": format!("{}_{}", base, i), "kind": kind }))
        .collect()
}
