// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! gila-csp CLI - CSP hardening for static sites

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gila_csp::{collect_directory, process_directory, process_html, preset_names, CspConfig};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gila_csp=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "process" => {
            if args.len() < 3 {
                eprintln!("Usage: gila-csp process <dir> [--config <file>] [--preset <name>]...");
                return ExitCode::from(1);
            }
            process_command(&args[2], &args[3..])
        }
        "policy" => {
            if args.len() < 3 {
                eprintln!("Usage: gila-csp policy <dir> [--config <file>] [--preset <name>]...");
                return ExitCode::from(1);
            }
            policy_command(&args[2], &args[3..])
        }
        "scan" => {
            if args.len() < 3 {
                eprintln!("Usage: gila-csp scan <file>");
                return ExitCode::from(1);
            }
            scan_command(&args[2])
        }
        "presets" => {
            for name in preset_names() {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("gila-csp {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"gila-csp - CSP Hardening for Static Sites

USAGE:
    gila-csp <COMMAND> [OPTIONS]

COMMANDS:
    process <dir>   Hash inline content, rewrite HTML, write policy artifacts
    policy <dir>    Print the CSP header value without writing anything
    scan <file>     Show what one HTML file contributes to the policy
    presets         List available presets
    help            Show this help message
    version         Show version information

OPTIONS:
    --config <file>   Load options from a JSON config file
    --preset <name>   Merge a preset into the policy (repeatable)

EXAMPLES:
    gila-csp process ./dist
    gila-csp process ./dist --preset google-fonts --preset google-analytics
    gila-csp policy ./dist --config csp.json
    gila-csp scan ./dist/index.html

For more information, see: https://github.com/bountyyfi/gila-csp
"#
    );
}

/// Parse `--config`/`--preset` flags into a run config.
///
/// The config file is applied first and flag presets appended after it,
/// so flag order never changes the resulting policy.
fn build_config(args: &[String], with_outputs: bool) -> Result<CspConfig, String> {
    let mut file_config: Option<CspConfig> = None;
    let mut flag_presets: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a file path".to_string())?;
                file_config = Some(
                    CspConfig::from_file(&PathBuf::from(path))
                        .map_err(|e| format!("failed to load config: {}", e))?,
                );
                i += 2;
            }
            "--preset" => {
                let name = args
                    .get(i + 1)
                    .ok_or_else(|| "--preset requires a name".to_string())?;
                flag_presets.push(name.clone());
                i += 2;
            }
            flag => return Err(format!("unknown option: {}", flag)),
        }
    }

    let mut config = match file_config {
        Some(c) => c,
        None if with_outputs => CspConfig::new(),
        None => CspConfig::default(),
    };
    config.presets.extend(flag_presets);

    Ok(config)
}

fn process_command(dir: &str, flags: &[String]) -> ExitCode {
    let config = match build_config(flags, true) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    match process_directory(Path::new(dir), &config) {
        Ok(result) => {
            println!("Processed {} HTML files", result.processed_files);
            println!(
                "Found {} script hashes, {} style hashes",
                result.collected.script_digests.len(),
                result.collected.style_digests.len()
            );
            if !result.collected.external_scripts.is_empty()
                || !result.collected.external_styles.is_empty()
            {
                println!(
                    "External: {} scripts, {} stylesheets",
                    result.collected.external_scripts.len(),
                    result.collected.external_styles.len()
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Processing failed: {}", e);
            ExitCode::from(1)
        }
    }
}

fn policy_command(dir: &str, flags: &[String]) -> ExitCode {
    let config = match build_config(flags, false) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    match collect_directory(Path::new(dir), &config) {
        Ok(result) => {
            println!("{}", result.directives.header_value());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Policy synthesis failed: {}", e);
            ExitCode::from(1)
        }
    }
}

fn scan_command(file: &str) -> ExitCode {
    let html = match std::fs::read_to_string(file) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Failed to read {}: {}", file, e);
            return ExitCode::from(1);
        }
    };

    let result = process_html(&html);

    if result.records.is_empty()
        && result.external_scripts.is_empty()
        && result.external_styles.is_empty()
    {
        println!("Nothing CSP-relevant found");
        return ExitCode::SUCCESS;
    }

    if !result.records.is_empty() {
        println!("=== Inline hashes ({}) ===", result.records.len());
        for record in &result.records {
            let preview: String = record.content.chars().take(50).collect();
            println!("  [{:?}] {} <- {:?}", record.kind, record.digest, preview);
        }
    }

    if !result.external_scripts.is_empty() {
        println!("=== External scripts ({}) ===", result.external_scripts.len());
        for url in &result.external_scripts {
            println!("  - {}", url);
        }
    }

    if !result.external_styles.is_empty() {
        println!("=== External stylesheets ({}) ===", result.external_styles.len());
        for url in &result.external_styles {
            println!("  - {}", url);
        }
    }

    ExitCode::SUCCESS
}
