// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Preset registry
//!
//! Named bundles of third-party origins for common external services, so a
//! site can whitelist an analytics vendor by name instead of hand-listing
//! its hosts.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{Error, Result};

/// A named bundle of origins grouped by target directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Registry key
    pub name: &'static str,
    /// Origins for `script-src`
    pub scripts: &'static [&'static str],
    /// Origins for `style-src`
    pub styles: &'static [&'static str],
    /// Origins for `font-src`
    pub fonts: &'static [&'static str],
    /// Origins for `connect-src`
    pub connect: &'static [&'static str],
}

lazy_static! {
    static ref REGISTRY: HashMap<&'static str, Preset> = {
        let presets = [
            Preset {
                name: "google-analytics",
                scripts: &[
                    "https://www.googletagmanager.com",
                    "https://www.google-analytics.com",
                ],
                styles: &[],
                fonts: &[],
                connect: &[
                    "https://www.google-analytics.com",
                    "https://analytics.google.com",
                    "https://stats.g.doubleclick.net",
                ],
            },
            Preset {
                name: "cloudflare-insights",
                scripts: &["https://static.cloudflareinsights.com"],
                styles: &[],
                fonts: &[],
                connect: &["https://cloudflareinsights.com"],
            },
            Preset {
                name: "google-fonts",
                scripts: &[],
                styles: &["https://fonts.googleapis.com"],
                fonts: &["https://fonts.gstatic.com"],
                connect: &[],
            },
        ];

        presets.iter().map(|p| (p.name, *p)).collect()
    };
}

/// Look up a preset by name.
pub fn get_preset(name: &str) -> Result<&'static Preset> {
    REGISTRY
        .get(name)
        .ok_or_else(|| Error::UnknownPreset(name.to_string()))
}

/// Names of all registered presets, sorted.
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<_> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Origins collected from a list of presets, grouped by directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetResources {
    pub scripts: Vec<String>,
    pub styles: Vec<String>,
    pub fonts: Vec<String>,
    pub connect: Vec<String>,
}

/// Resolve and merge a list of presets, deduplicating origins in
/// first-seen order. Any unknown name fails the whole resolution.
pub fn apply_presets(names: &[String]) -> Result<PresetResources> {
    let mut resources = PresetResources::default();

    for name in names {
        let preset = get_preset(name)?;
        append_unique(&mut resources.scripts, preset.scripts);
        append_unique(&mut resources.styles, preset.styles);
        append_unique(&mut resources.fonts, preset.fonts);
        append_unique(&mut resources.connect, preset.connect);
    }

    Ok(resources)
}

fn append_unique(target: &mut Vec<String>, origins: &[&str]) {
    for origin in origins {
        if !target.iter().any(|o| o == origin) {
            target.push(origin.to_string());
        }
    }
}
