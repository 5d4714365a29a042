// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Run configuration
//!
//! Controls which presets and extra origins feed the policy, directive
//! overrides, and where the generated artifacts land.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::get_preset;

/// Configuration for a CSP hardening run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CspConfig {
    /// Preset names to merge into the policy (e.g. `google-analytics`)
    pub presets: Vec<String>,
    /// Extra external script URLs, treated like discovered references
    pub external_scripts: Vec<String>,
    /// Extra external stylesheet URLs, treated like discovered references
    pub external_styles: Vec<String>,
    /// Additive directive overrides, applied after everything else.
    /// Unrecognized directive names are passed through to the policy.
    pub directives: BTreeMap<String, Vec<String>>,
    /// nginx config output, `None` to disable
    pub nginx: Option<NginxOptions>,
    /// JSON report output, `None` to disable
    pub json: Option<JsonOptions>,
}

/// nginx output options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NginxOptions {
    /// Where to write the generated config
    pub output_path: PathBuf,
    /// Include explanatory comments in the output
    pub include_comments: bool,
}

impl Default for NginxOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./dist/_csp/nginx.conf"),
            include_comments: true,
        }
    }
}

/// JSON report output options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonOptions {
    /// Where to write the report
    pub output_path: PathBuf,
    /// Pretty-print the JSON
    pub pretty: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./dist/_csp/hashes.json"),
            pretty: true,
        }
    }
}

impl CspConfig {
    /// Create a new config with default outputs enabled
    pub fn new() -> Self {
        Self {
            nginx: Some(NginxOptions::default()),
            json: Some(JsonOptions::default()),
            ..Default::default()
        }
    }

    /// Add a preset by name
    pub fn preset(mut self, name: impl Into<String>) -> Self {
        self.presets.push(name.into());
        self
    }

    /// Add an external script URL
    pub fn external_script(mut self, url: impl Into<String>) -> Self {
        self.external_scripts.push(url.into());
        self
    }

    /// Add an external stylesheet URL
    pub fn external_style(mut self, url: impl Into<String>) -> Self {
        self.external_styles.push(url.into());
        self
    }

    /// Append tokens to a directive
    pub fn directive(mut self, name: impl Into<String>, tokens: Vec<String>) -> Self {
        self.directives.entry(name.into()).or_default().extend(tokens);
        self
    }

    /// Disable nginx output
    pub fn without_nginx(mut self) -> Self {
        self.nginx = None;
        self
    }

    /// Disable JSON output
    pub fn without_json(mut self) -> Self {
        self.json = None;
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| crate::error::Error::io_at(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config before any file is touched.
    ///
    /// Unknown preset names are fatal here, not halfway through a batch.
    pub fn validate(&self) -> Result<()> {
        for name in &self.presets {
            get_preset(name)?;
        }
        Ok(())
    }
}
