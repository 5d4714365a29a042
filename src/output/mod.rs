// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Policy artifact writers
//!
//! - nginx `add_header` snippet
//! - JSON hash/policy report

mod nginx;
mod report;

pub use nginx::{render_nginx, write_nginx};
pub use report::{write_report, CspReport};
