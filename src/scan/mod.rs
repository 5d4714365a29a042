// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document scanning, hashing, and rewriting
//!
//! The per-document pipeline: scan raw HTML for inline scripts/styles and
//! external references, digest the inline bodies, and rewrite the document
//! so each inline element carries its integrity attribute.

mod digest;
mod rewrite;
mod scanner;

pub use digest::{digest, digest_elements, DigestRecord, ElementKind};
pub use rewrite::rewrite;
pub use scanner::{scan, InlineElement, ScanResult};

/// Outcome of processing one document
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Rewritten HTML with integrity attributes embedded
    pub html: String,
    /// Digest records for every inline element, scripts first
    pub records: Vec<DigestRecord>,
    /// External script URLs found in the document
    pub external_scripts: Vec<String>,
    /// External stylesheet URLs found in the document
    pub external_styles: Vec<String>,
}

/// Scan, digest, and rewrite one document.
pub fn process_html(html: &str) -> ProcessResult {
    let scanned = scan(html);

    let mut records = digest_elements(&scanned.scripts, ElementKind::Script);
    records.extend(digest_elements(&scanned.styles, ElementKind::Style));

    let rewritten = rewrite(html, &records);

    ProcessResult {
        html: rewritten,
        records,
        external_scripts: scanned.external_scripts,
        external_styles: scanned.external_styles,
    }
}
