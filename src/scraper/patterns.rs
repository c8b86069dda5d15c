// src/scraper/patterns.rs
//! Ordered extraction rules. The first rule that yields a non-empty value wins;
//! list order is the priority, never match length or selector specificity.

use super::sanitize::non_empty;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Company,
    Position,
    Location,
    Description,
}

#[derive(Debug)]
pub enum PatternKind {
    /// Regex over the raw markup; capture group 1 is the value.
    Markup(Regex),
    /// A `"key":"value"` pair anywhere in the page, e.g. inline state blobs.
    JsonField { key: &'static str, regex: Regex },
    /// A key path into the page's `application/ld+json` blocks.
    JsonLd(&'static [&'static str]),
}

#[derive(Debug)]
pub struct ExtractionPattern {
    pub field: Field,
    pub kind: PatternKind,
}

impl ExtractionPattern {
    /// Panics on an invalid regex; rules are built from literals.
    pub fn markup(field: Field, pattern: &str) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid markup pattern {pattern:?}: {e}"));
        Self {
            field,
            kind: PatternKind::Markup(regex),
        }
    }

    pub fn json_field(field: Field, key: &'static str) -> Self {
        let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(key));
        let regex = Regex::new(&pattern)
            .unwrap_or_else(|e| panic!("invalid json field pattern {pattern:?}: {e}"));
        Self {
            field,
            kind: PatternKind::JsonField { key, regex },
        }
    }

    pub fn json_ld(field: Field, path: &'static [&'static str]) -> Self {
        Self {
            field,
            kind: PatternKind::JsonLd(path),
        }
    }

    /// Never fails: a rule that does not apply simply yields nothing.
    pub fn apply(&self, document: &PageDocument) -> Option<String> {
        match &self.kind {
            PatternKind::Markup(regex) => regex
                .captures(document.html())
                .and_then(|caps| caps.get(1))
                .and_then(|m| non_empty(m.as_str())),
            PatternKind::JsonField { regex, .. } => regex
                .captures(document.html())
                .and_then(|caps| caps.get(1))
                .and_then(|m| non_empty(unescape_json(m.as_str()))),
            PatternKind::JsonLd(path) => document
                .structured()
                .iter()
                .find_map(|block| lookup(block, path))
                .and_then(scalar_text)
                .and_then(non_empty),
        }
    }

    fn describe(&self) -> String {
        match &self.kind {
            PatternKind::Markup(regex) => format!("markup {}", regex.as_str()),
            PatternKind::JsonField { key, .. } => format!("json field {key}"),
            PatternKind::JsonLd(path) => format!("json-ld {}", path.join(".")),
        }
    }
}

/// A fetched page plus its decoded structured-data blocks.
#[derive(Debug, Clone)]
pub struct PageDocument {
    html: String,
    structured: Vec<Value>,
}

impl PageDocument {
    pub fn parse(html: impl Into<String>) -> Self {
        let html = html.into();
        let structured = json_ld_blocks(&html);
        Self { html, structured }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn structured(&self) -> &[Value] {
        &self.structured
    }
}

/// Returns the first non-empty, trimmed value produced by `patterns`, in order.
pub fn first_match(document: &PageDocument, patterns: &[ExtractionPattern]) -> Option<String> {
    for (index, pattern) in patterns.iter().enumerate() {
        match pattern.apply(document) {
            Some(value) => {
                debug!(
                    "{:?} rule {} matched ({})",
                    pattern.field,
                    index + 1,
                    pattern.describe()
                );
                return Some(value);
            }
            None => debug!(
                "{:?} rule {} missed ({})",
                pattern.field,
                index + 1,
                pattern.describe()
            ),
        }
    }
    None
}

fn json_ld_blocks(html: &str) -> Vec<Value> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut blocks = Vec::new();

    for element in document.select(&selector) {
        let text = element.text().collect::<String>();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::Array(items)) => blocks.extend(items),
            Ok(value) => {
                if let Some(Value::Array(graph)) = value.get("@graph") {
                    blocks.extend(graph.iter().cloned());
                }
                blocks.push(value);
            }
            Err(e) => debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }

    blocks
}

fn lookup<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    let Some((head, rest)) = path.split_first() else {
        return Some(value);
    };

    match value {
        Value::Object(map) => lookup(map.get(*head)?, rest),
        Value::Array(items) => items.iter().find_map(|item| lookup(item, path)),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn unescape_json(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
