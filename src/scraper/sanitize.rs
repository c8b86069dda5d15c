// src/scraper/sanitize.rs
//! Markup-to-text cleanup shared by every extraction rule.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(nbsp|amp|lt|gt|quot|apos);").expect("valid entity regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip tags, decode the common named entities and collapse whitespace.
///
/// Entities outside `&nbsp; &amp; &lt; &gt; &quot; &apos;` are left as-is.
/// Decoding is single-pass, so `&amp;lt;` becomes `&lt;` rather than `<`.
pub fn clean(fragment: &str) -> String {
    let without_tags = TAG.replace_all(fragment, "");
    let decoded = ENTITY.replace_all(&without_tags, |caps: &Captures| {
        match &caps[1] {
            "nbsp" => " ",
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        }
        .to_string()
    });

    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Returns `None` for blank input, the trimmed text otherwise.
pub fn non_empty(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
