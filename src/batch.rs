// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Batch orchestration
//!
//! Walks a build-output tree, pushes every HTML file through the
//! scan/digest/rewrite pipeline, aggregates hashes and origins across
//! documents, and persists the synthesized policy artifacts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::CspConfig;
use crate::error::{Error, Result};
use crate::output::{write_nginx, write_report};
use crate::policy::{synthesize, CollectedResources, DirectiveMap};
use crate::scan::{process_html, ElementKind};

/// Outcome of a batch run
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Number of HTML files rewritten
    pub processed_files: usize,
    /// Deduplicated digests and origins across all documents
    pub collected: CollectedResources,
    /// The synthesized policy
    pub directives: DirectiveMap,
}

/// Cross-document aggregate with structural dedup.
///
/// Digest tokens are content-addressed, so token equality is content
/// equality; first discovery in batch order wins, and batch order is the
/// sorted file list, keeping the final policy deterministic.
#[derive(Debug, Default)]
struct Aggregate {
    seen: HashSet<(ElementKind, String)>,
    seen_script_urls: HashSet<String>,
    seen_style_urls: HashSet<String>,
    collected: CollectedResources,
}

impl Aggregate {
    fn add_digest(&mut self, kind: ElementKind, digest: &str) {
        if self.seen.insert((kind, digest.to_string())) {
            match kind {
                ElementKind::Script => self.collected.script_digests.push(digest.to_string()),
                ElementKind::Style => self.collected.style_digests.push(digest.to_string()),
            }
        }
    }

    fn add_script_url(&mut self, url: &str) {
        if self.seen_script_urls.insert(url.to_string()) {
            self.collected.external_scripts.push(url.to_string());
        }
    }

    fn add_style_url(&mut self, url: &str) {
        if self.seen_style_urls.insert(url.to_string()) {
            self.collected.external_styles.push(url.to_string());
        }
    }
}

/// Process every HTML file under `dir` and write the configured artifacts.
///
/// The config is validated first: an unknown preset aborts the run before
/// any file is touched. Files are rewritten in place; the nginx snippet and
/// JSON report are written wherever the config points.
pub fn process_directory(dir: &Path, config: &CspConfig) -> Result<BatchResult> {
    let result = run_batch(dir, config, true)?;

    if let Some(ref nginx) = config.nginx {
        write_nginx(&result.directives, nginx)?;
    }
    if let Some(ref json) = config.json {
        write_report(&result.collected, &result.directives, json)?;
    }

    Ok(result)
}

/// Scan and aggregate like [`process_directory`], writing nothing.
///
/// No HTML file is rewritten and no artifact is emitted; the returned
/// policy is identical to what a full run would produce, since rewriting
/// only embeds attributes and never changes what gets hashed.
pub fn collect_directory(dir: &Path, config: &CspConfig) -> Result<BatchResult> {
    run_batch(dir, config, false)
}

fn run_batch(dir: &Path, config: &CspConfig, rewrite_files: bool) -> Result<BatchResult> {
    config.validate()?;

    let files = find_html_files(dir)?;
    info!(dir = %dir.display(), files = files.len(), "processing HTML output");

    let mut aggregate = Aggregate::default();
    let mut processed_files = 0;

    for path in &files {
        let html = fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
        let result = process_html(&html);

        if rewrite_files && result.html != html {
            fs::write(path, &result.html).map_err(|e| Error::io_at(path, e))?;
        }
        processed_files += 1;

        debug!(
            path = %path.display(),
            inline = result.records.len(),
            external = result.external_scripts.len() + result.external_styles.len(),
            "processed"
        );

        for record in &result.records {
            aggregate.add_digest(record.kind, &record.digest);
        }
        for url in &result.external_scripts {
            aggregate.add_script_url(url);
        }
        for url in &result.external_styles {
            aggregate.add_style_url(url);
        }
    }

    // Config-supplied URLs count as discovered references
    for url in &config.external_scripts {
        aggregate.add_script_url(url);
    }
    for url in &config.external_styles {
        aggregate.add_style_url(url);
    }

    let collected = aggregate.collected;
    let directives = synthesize(&collected, config)?;

    info!(
        files = processed_files,
        script_hashes = collected.script_digests.len(),
        style_hashes = collected.style_digests.len(),
        "batch complete"
    );

    Ok(BatchResult {
        processed_files,
        collected,
        directives,
    })
}

/// All `.html` files under `dir`, sorted by path for deterministic
/// aggregation order.
fn find_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| Error::other(format!("walk {}: {}", dir.display(), e)))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        let is_html = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("html"))
            .unwrap_or(false);
        if is_html {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_without_outputs() -> CspConfig {
        CspConfig::default()
    }

    #[test]
    fn test_processes_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<script>a</script>").unwrap();
        fs::create_dir(dir.path().join("blog")).unwrap();
        fs::write(dir.path().join("blog/post.html"), "<script>b</script>").unwrap();
        fs::write(dir.path().join("style.css"), "body {}").unwrap();

        let result = process_directory(dir.path(), &config_without_outputs()).unwrap();

        assert_eq!(result.processed_files, 2);
        assert_eq!(result.collected.script_digests.len(), 2);
    }

    #[test]
    fn test_rewrites_files_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, r#"<html><head><script>console.log("test")</script></head></html>"#)
            .unwrap();

        process_directory(dir.path(), &config_without_outputs()).unwrap();

        let updated = fs::read_to_string(&path).unwrap();
        assert!(updated.contains(r#"integrity="sha256-"#));
    }

    #[test]
    fn test_collect_leaves_files_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        let original = r#"<html><head><script>console.log("test")</script></head></html>"#;
        fs::write(&path, original).unwrap();

        let result = collect_directory(dir.path(), &config_without_outputs()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        // The policy is still the full one
        assert_eq!(result.collected.script_digests.len(), 1);
        assert!(result
            .directives
            .get("script-src")
            .unwrap()
            .contains(&format!("'{}'", result.collected.script_digests[0])));
    }

    #[test]
    fn test_collect_emits_no_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<script>x</script>").unwrap();

        let mut config = CspConfig::new();
        config.nginx.as_mut().unwrap().output_path = dir.path().join("_csp/nginx.conf");
        config.json.as_mut().unwrap().output_path = dir.path().join("_csp/hashes.json");

        collect_directory(dir.path(), &config).unwrap();

        assert!(!dir.path().join("_csp").exists());
    }

    #[test]
    fn test_identical_content_across_documents_dedups() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.html"), "<script>code1</script>").unwrap();
        fs::write(
            dir.path().join("b.html"),
            "<script>code1</script><script>code2</script>",
        )
        .unwrap();

        let result = process_directory(dir.path(), &config_without_outputs()).unwrap();

        assert_eq!(result.collected.script_digests.len(), 2);
    }

    #[test]
    fn test_aggregation_order_is_sorted_path_order() {
        let dir = tempfile::tempdir().unwrap();
        // Written out of order; must be visited a.html then b.html
        fs::write(dir.path().join("b.html"), "<script>second</script>").unwrap();
        fs::write(dir.path().join("a.html"), "<script>first</script>").unwrap();

        let result = process_directory(dir.path(), &config_without_outputs()).unwrap();

        assert_eq!(result.collected.script_digests[0], crate::scan::digest("first"));
        assert_eq!(result.collected.script_digests[1], crate::scan::digest("second"));
    }

    #[test]
    fn test_unknown_preset_aborts_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        let original = "<script>untouched</script>";
        fs::write(&path, original).unwrap();

        let config = CspConfig::default().preset("bogus");
        let err = process_directory(dir.path(), &config).unwrap_err();

        assert!(err.is_config());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_config_external_urls_join_aggregate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<p>static</p>").unwrap();

        let config = CspConfig::default()
            .external_script("https://cdn.example.com/extra.js");
        let result = process_directory(dir.path(), &config).unwrap();

        assert!(result
            .directives
            .get("script-src")
            .unwrap()
            .contains(&"https://cdn.example.com".to_string()));
    }

    #[test]
    fn test_writes_configured_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "<script>x</script>").unwrap();

        let mut config = CspConfig::new();
        config.nginx.as_mut().unwrap().output_path = dir.path().join("_csp/nginx.conf");
        config.json.as_mut().unwrap().output_path = dir.path().join("_csp/hashes.json");

        let result = process_directory(dir.path(), &config).unwrap();

        let nginx = fs::read_to_string(dir.path().join("_csp/nginx.conf")).unwrap();
        assert!(nginx.contains("add_header Content-Security-Policy"));
        assert!(nginx.contains(&result.collected.script_digests[0]));

        let report = fs::read_to_string(dir.path().join("_csp/hashes.json")).unwrap();
        assert!(report.contains(&result.collected.script_digests[0]));
    }

    #[test]
    fn test_round_trip_digest_matches_policy_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "<script>console.log(1)</script>").unwrap();

        let result = process_directory(dir.path(), &config_without_outputs()).unwrap();

        let token = &result.collected.script_digests[0];
        assert!(result
            .directives
            .get("script-src")
            .unwrap()
            .contains(&format!("'{}'", token)));
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(&format!(r#"integrity="{}""#, token)));
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();

        let result = process_directory(dir.path(), &config_without_outputs()).unwrap();

        assert_eq!(result.processed_files, 0);
        assert!(result.collected.script_digests.is_empty());
        // Baseline policy still present
        assert!(result.directives.get("default-src").is_some());
    }
}
