// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! JSON hash/policy report
//!
//! Machine-readable record of everything the run discovered, for CI diffing
//! or feeding a non-nginx deployment.

use std::fs;

use serde::Serialize;

use crate::config::JsonOptions;
use crate::error::{Error, Result};
use crate::policy::{CollectedResources, DirectiveMap};

/// The JSON report body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CspReport<'a> {
    /// Script digest tokens
    pub scripts: &'a [String],
    /// Style digest tokens
    pub styles: &'a [String],
    /// External script URLs (verbatim, not reduced to origins)
    pub external_scripts: &'a [String],
    /// External stylesheet URLs
    pub external_styles: &'a [String],
    /// The synthesized policy
    pub directives: &'a DirectiveMap,
}

impl<'a> CspReport<'a> {
    /// Assemble a report from the batch aggregate and the final policy
    pub fn new(collected: &'a CollectedResources, directives: &'a DirectiveMap) -> Self {
        Self {
            scripts: &collected.script_digests,
            styles: &collected.style_digests,
            external_scripts: &collected.external_scripts,
            external_styles: &collected.external_styles,
            directives,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Write the JSON report, creating parent directories as needed.
pub fn write_report(
    collected: &CollectedResources,
    directives: &DirectiveMap,
    options: &JsonOptions,
) -> Result<()> {
    if let Some(parent) = options.output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
    }
    let report = CspReport::new(collected, directives);
    fs::write(&options.output_path, report.to_json(options.pretty)?)
        .map_err(|e| Error::io_at(options.output_path.clone(), e))?;

    tracing::info!(path = %options.output_path.display(), "wrote CSP hash report");
    Ok(())
}
