// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Inline script/style scanner
//!
//! Lexical pattern scan over raw HTML, not a DOM parse. Static-site output
//! is well-formed enough that tag-pair matching is reliable, and a missed
//! element fails closed: content without a hash in the policy is blocked by
//! the browser, never silently permitted.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Any paired script element, attributes and body captured separately
    static ref SCRIPT_RE: Regex =
        Regex::new(r"(?is)<script(\s[^>]*)?>(.*?)</script>").unwrap();
    /// Any script opening tag; external `src` refs are collected from these
    /// alone so an unclosed tag still contributes its origin
    static ref SCRIPT_OPEN_RE: Regex = Regex::new(r"(?i)<script(\s[^>]*)?>").unwrap();
    /// Any style element
    static ref STYLE_RE: Regex =
        Regex::new(r"(?is)<style(\s[^>]*)?>(.*?)</style>").unwrap();
    /// Any link tag (rel/href checked attribute-by-attribute, order-independent)
    static ref LINK_RE: Regex = Regex::new(r"(?i)<link\s[^>]*>").unwrap();

    static ref SRC_ATTR_RE: Regex =
        Regex::new(r#"(?i)(?:^|\s)src\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref SRC_PRESENT_RE: Regex = Regex::new(r"(?i)(?:^|\s)src\s*=").unwrap();
    static ref REL_ATTR_RE: Regex =
        Regex::new(r#"(?i)(?:^|\s)rel\s*=\s*["']([^"']*)["']"#).unwrap();
    static ref HREF_ATTR_RE: Regex =
        Regex::new(r#"(?i)(?:^|\s)href\s*=\s*["']([^"']*)["']"#).unwrap();
}

/// One inline script or style body located in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineElement {
    /// Exact body text between the opening tag's `>` and the closing tag
    pub content: String,
    /// Offset of the body within the document (`start == end` for an empty body)
    pub start: usize,
    /// Offset one past the last body byte
    pub end: usize,
}

/// Everything the scanner found in one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Inline scripts, in document order
    pub scripts: Vec<InlineElement>,
    /// Inline styles, in document order
    pub styles: Vec<InlineElement>,
    /// `src` URLs of external scripts (https only)
    pub external_scripts: Vec<String>,
    /// `href` URLs of external stylesheets (https only)
    pub external_styles: Vec<String>,
}

impl ScanResult {
    /// True if the document contained nothing CSP-relevant
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
            && self.styles.is_empty()
            && self.external_scripts.is_empty()
            && self.external_styles.is_empty()
    }
}

/// Check whether a script opening tag's attribute text carries a `src`
pub(crate) fn has_src_attr(attrs: &str) -> bool {
    SRC_PRESENT_RE.is_match(attrs)
}

/// Scan one HTML document for inline bodies and external references.
///
/// Case-insensitive on tag and attribute names, whole-document, each element
/// recorded at most once in document order. A `<script src=...>` is never
/// inline regardless of fallback body text, and the `type` attribute is
/// irrelevant: `application/ld+json` blocks are inline content like any
/// other. Only `https://` external URLs are retained; relative, scheme-
/// relative and `http://` references cannot be expressed as a safe CSP
/// origin token and are dropped.
pub fn scan(html: &str) -> ScanResult {
    let mut result = ScanResult::default();

    for m in SCRIPT_OPEN_RE.captures_iter(html) {
        let attrs = m.get(1).map(|g| g.as_str()).unwrap_or("");
        if !has_src_attr(attrs) {
            continue;
        }
        if let Some(src) = SRC_ATTR_RE.captures(attrs).map(|c| c[1].to_string()) {
            if src.starts_with("https://") {
                result.external_scripts.push(src);
            }
        }
    }

    for m in SCRIPT_RE.captures_iter(html) {
        let attrs = m.get(1).map(|g| g.as_str()).unwrap_or("");

        // Fetched by the browser, validated by its own origin/SRI;
        // fallback bodies are intentionally not hashed.
        if has_src_attr(attrs) {
            continue;
        }

        let body = m.get(2).expect("script body group");
        result.scripts.push(InlineElement {
            content: body.as_str().to_string(),
            start: body.start(),
            end: body.end(),
        });
    }

    for m in STYLE_RE.captures_iter(html) {
        let body = m.get(2).expect("style body group");
        result.styles.push(InlineElement {
            content: body.as_str().to_string(),
            start: body.start(),
            end: body.end(),
        });
    }

    for m in LINK_RE.find_iter(html) {
        let tag = m.as_str();
        let rel = REL_ATTR_RE.captures(tag).map(|c| c[1].to_lowercase());
        if rel.as_deref() != Some("stylesheet") {
            continue;
        }
        if let Some(href) = HREF_ATTR_RE.captures(tag).map(|c| c[1].to_string()) {
            if href.starts_with("https://") {
                result.external_styles.push(href);
            }
        }
    }

    result
}
