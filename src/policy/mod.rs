// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSP policy synthesis
//!
//! - Directive map construction and merging
//! - Static preset registry for common third-party services

mod directives;
mod presets;

pub use directives::{extract_origin, synthesize, CollectedResources, DirectiveMap};
pub use presets::{apply_presets, get_preset, preset_names, Preset, PresetResources};
