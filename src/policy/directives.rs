// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSP directive synthesis
//!
//! Merges the baseline policy, collected hashes, discovered origins,
//! presets, and user overrides into one deduplicated directive map.
//! The merge is deterministic: identical inputs always produce an
//! identical map, which keeps snapshot tests of serialized output stable.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use url::Url;

use crate::config::CspConfig;
use crate::error::Result;
use crate::policy::presets::apply_presets;

/// Digests and origins aggregated across a batch of documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedResources {
    /// Script digest tokens (`sha256-...`), first-discovery order
    pub script_digests: Vec<String>,
    /// Style digest tokens, first-discovery order
    pub style_digests: Vec<String>,
    /// External script URLs
    pub external_scripts: Vec<String>,
    /// External stylesheet URLs
    pub external_styles: Vec<String>,
}

/// Insertion-ordered mapping of directive name to policy tokens.
///
/// Within one directive no token appears twice; the first occurrence wins
/// and later duplicates are dropped regardless of which merge stage
/// introduced them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveMap {
    entries: Vec<(String, Vec<String>)>,
}

impl DirectiveMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token to a directive unless already present.
    /// Creates the directive entry on first use.
    pub fn push(&mut self, directive: &str, token: impl Into<String>) {
        let token = token.into();
        match self.entries.iter_mut().find(|(name, _)| name == directive) {
            Some((_, tokens)) => {
                if !tokens.contains(&token) {
                    tokens.push(token);
                }
            }
            None => self.entries.push((directive.to_string(), vec![token])),
        }
    }

    /// Tokens for a directive, if present
    pub fn get(&self, directive: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == directive)
            .map(|(_, tokens)| tokens.as_slice())
    }

    /// Iterate directives in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    /// Number of directives
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no directives are present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a `Content-Security-Policy` header value
    pub fn header_value(&self) -> String {
        self.entries
            .iter()
            .map(|(name, tokens)| format!("{} {}", name, tokens.join(" ")))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Serialize for DirectiveMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, tokens) in &self.entries {
            map.serialize_entry(name, tokens)?;
        }
        map.end()
    }
}

/// Reduce a URL to its CSP origin token (`scheme://host[:port]`).
///
/// A URL that does not parse degrades to the raw string: a best-effort
/// policy beats aborting the build.
pub fn extract_origin(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => {
            let origin = url.origin();
            if origin.is_tuple() {
                origin.ascii_serialization()
            } else {
                raw.to_string()
            }
        }
        Err(_) => raw.to_string(),
    }
}

/// Build the complete directive map for a batch.
///
/// Merge order (first-seen wins for dedup): baseline, script/style digest
/// tokens, external-reference origins, preset origins, explicit overrides.
/// Unrecognized override names become additional map entries rather than
/// errors.
pub fn synthesize(collected: &CollectedResources, config: &CspConfig) -> Result<DirectiveMap> {
    // Resolve presets up front so an unknown name fails before any merging.
    let presets = apply_presets(&config.presets)?;

    let mut map = DirectiveMap::new();

    map.push("default-src", "'self'");
    map.push("script-src", "'self'");
    map.push("style-src", "'self'");
    map.push("img-src", "'self'");
    map.push("img-src", "data:");
    map.push("font-src", "'self'");
    map.push("connect-src", "'self'");
    map.push("frame-ancestors", "'none'");
    map.push("form-action", "'self'");
    map.push("base-uri", "'self'");

    for digest in &collected.script_digests {
        map.push("script-src", format!("'{}'", digest));
    }
    for digest in &collected.style_digests {
        map.push("style-src", format!("'{}'", digest));
    }

    for url in &collected.external_scripts {
        map.push("script-src", extract_origin(url));
    }
    for url in &collected.external_styles {
        map.push("style-src", extract_origin(url));
    }

    for origin in &presets.scripts {
        map.push("script-src", origin.clone());
    }
    for origin in &presets.styles {
        map.push("style-src", origin.clone());
    }
    for origin in &presets.fonts {
        map.push("font-src", origin.clone());
    }
    for origin in &presets.connect {
        map.push("connect-src", origin.clone());
    }

    for (directive, tokens) in &config.directives {
        for token in tokens {
            map.push(directive, token.clone());
        }
    }

    Ok(map)
}
