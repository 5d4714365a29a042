// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! nginx config generation
//!
//! Renders the directive map as an `add_header` snippet meant to be
//! `include`d from a server or location block.

use std::fs;

use crate::config::NginxOptions;
use crate::error::{Error, Result};
use crate::policy::DirectiveMap;

/// Render the directive map as an nginx snippet.
pub fn render_nginx(directives: &DirectiveMap, include_comments: bool) -> String {
    let mut out = String::new();

    if include_comments {
        out.push_str("# Content-Security-Policy generated by gila-csp\n");
        out.push_str("# Include from a server or location block:\n");
        out.push_str("#   include /etc/nginx/snippets/csp.conf;\n");
        out.push('\n');
        for (name, tokens) in directives.iter() {
            out.push_str(&format!("# {}: {} source(s)\n", name, tokens.len()));
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "add_header Content-Security-Policy \"{}\" always;\n",
        escape_nginx(&directives.header_value())
    ));

    out
}

/// Write the nginx snippet, creating parent directories as needed.
pub fn write_nginx(directives: &DirectiveMap, options: &NginxOptions) -> Result<()> {
    if let Some(parent) = options.output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
    }
    let config = render_nginx(directives, options.include_comments);
    fs::write(&options.output_path, config)
        .map_err(|e| Error::io_at(options.output_path.clone(), e))?;

    tracing::info!(path = %options.output_path.display(), "wrote nginx CSP config");
    Ok(())
}

/// Escape characters meaningful inside an nginx double-quoted string
fn escape_nginx(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
