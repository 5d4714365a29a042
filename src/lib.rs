// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # gila-csp - CSP Hardening for Static Sites
//!
//! Post-processes statically generated HTML to enforce a strict
//! Content-Security-Policy: hashes inline `<script>`/`<style>` content,
//! embeds `integrity` attributes, collects external script/stylesheet
//! origins, and generates a policy whitelisting exactly what was found.
//!
//! ## Features
//!
//! - Inline hashing: sha256 tokens for every inline script and style
//! - Integrity rewriting: attributes embedded without disturbing markup
//! - Origin collection: https-only external script/stylesheet origins
//! - Presets: google-analytics, cloudflare-insights, google-fonts
//! - Artifacts: nginx `add_header` snippet and JSON hash report
//!
//! ## Example
//!
//! ```rust,no_run
//! use gila_csp::{process_directory, CspConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CspConfig::new().preset("google-fonts");
//!     let result = process_directory(std::path::Path::new("./dist"), &config)?;
//!
//!     println!("CSP header: {}", result.directives.header_value());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod policy;
pub mod scan;

// Re-exports for convenience

// Batch orchestration
pub use batch::{collect_directory, process_directory, BatchResult};

// Configuration
pub use config::{CspConfig, JsonOptions, NginxOptions};

// Errors
pub use error::{Error, Result};

// Artifact writers
pub use output::{render_nginx, write_nginx, write_report, CspReport};

// Policy synthesis
pub use policy::{
    apply_presets, extract_origin, get_preset, preset_names, synthesize, CollectedResources,
    DirectiveMap, Preset, PresetResources,
};

// Scanning and rewriting
pub use scan::{
    digest, digest_elements, process_html, rewrite, scan, DigestRecord, ElementKind,
    InlineElement, ProcessResult, ScanResult,
};

/// gila-csp version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
