// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Integrity attribute rewriter
//!
//! Embeds `integrity="sha256-..."` into the opening tags of inline elements,
//! matched by kind + exact body content. Content-addressed: every element
//! sharing the same body receives the attribute.

use std::collections::HashSet;

use regex::Regex;

use super::scanner::has_src_attr;
use super::{DigestRecord, ElementKind};

/// Rewrite a document so matching inline elements carry integrity attributes.
///
/// The attribute is inserted immediately before the closing `>` of the
/// opening tag; existing attributes, their order, and all whitespace are
/// untouched. Element bodies are matched as literal text, so content full of
/// regex metacharacters is safe. With no records the input is returned
/// byte-identical. Records are deduplicated by (kind, content) so a repeated
/// record cannot insert the attribute twice.
pub fn rewrite(html: &str, records: &[DigestRecord]) -> String {
    if records.is_empty() {
        return html.to_string();
    }

    let mut seen: HashSet<(ElementKind, &str)> = HashSet::new();
    let mut result = html.to_string();

    for record in records {
        if !seen.insert((record.kind, record.content.as_str())) {
            continue;
        }
        result = apply_record(&result, record);
    }

    result
}

fn apply_record(html: &str, record: &DigestRecord) -> String {
    let tag = match record.kind {
        ElementKind::Script => "script",
        ElementKind::Style => "style",
    };

    // Case-insensitivity is scoped to the tag markup; the body must match
    // the hashed content exactly.
    let pattern = format!(
        r"(?i:<{tag})((?:\s[^>]*)?)>{body}(?i:</{tag}>)",
        tag = tag,
        body = regex::escape(&record.content)
    );
    let Ok(re) = Regex::new(&pattern) else {
        // Oversized content can exceed the compiled-pattern limit; the
        // element is simply left without an attribute (fails closed).
        return html.to_string();
    };

    let mut out = String::with_capacity(html.len() + 64);
    let mut last = 0;

    for caps in re.captures_iter(html) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let attrs = match caps.get(1) {
            Some(m) => m,
            None => continue,
        };

        // A src-bearing script is validated by its own fetch, never by a
        // content hash, even if its fallback body happens to match.
        if record.kind == ElementKind::Script && has_src_attr(attrs.as_str()) {
            out.push_str(&html[last..whole.end()]);
            last = whole.end();
            continue;
        }

        out.push_str(&html[last..attrs.end()]);
        out.push_str(" integrity=\"");
        out.push_str(&record.digest);
        out.push('"');
        out.push_str(&html[attrs.end()..whole.end()]);
        last = whole.end();
    }

    out.push_str(&html[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::digest;

    fn record(content: &str, kind: ElementKind) -> DigestRecord {
        DigestRecord {
            digest: digest(content),
            content: content.to_string(),
            kind,
        }
    }

    #[test]
    fn test_empty_records_is_byte_identical() {
        let html = "<script>code</script>\n<style>css</style>";
        assert_eq!(rewrite(html, &[]), html);
    }

    #[test]
    fn test_adds_integrity_to_script() {
        let html = r#"<script>console.log("hello")</script>"#;
        let rec = record(r#"console.log("hello")"#, ElementKind::Script);

        let result = rewrite(html, &[rec.clone()]);

        assert_eq!(
            result,
            format!(r#"<script integrity="{}">console.log("hello")</script>"#, rec.digest)
        );
    }

    #[test]
    fn test_adds_integrity_to_style() {
        let html = "<style>body { color: red; }</style>";
        let rec = record("body { color: red; }", ElementKind::Style);

        let result = rewrite(html, &[rec.clone()]);

        assert!(result.contains(&format!(r#"integrity="{}""#, rec.digest)));
    }

    #[test]
    fn test_preserves_existing_attributes_and_order() {
        let html = r#"<script type="module" defer>code</script>"#;
        let rec = record("code", ElementKind::Script);

        let result = rewrite(html, &[rec.clone()]);

        assert_eq!(
            result,
            format!(r#"<script type="module" defer integrity="{}">code</script>"#, rec.digest)
        );
    }

    #[test]
    fn test_multiple_records() {
        let html = "<script>const a = 1;</script><style>css</style>";
        let records = vec![
            record("const a = 1;", ElementKind::Script),
            record("css", ElementKind::Style),
        ];

        let result = rewrite(html, &records);

        assert!(result.contains(&format!(r#"integrity="{}""#, records[0].digest)));
        assert!(result.contains(&format!(r#"integrity="{}""#, records[1].digest)));
    }

    #[test]
    fn test_identical_content_gets_attribute_everywhere() {
        let html = "<script>shared()</script><div></div><script>shared()</script>";
        let rec = record("shared()", ElementKind::Script);

        let result = rewrite(html, &[rec.clone()]);

        assert_eq!(result.matches(&rec.digest).count(), 2);
    }

    #[test]
    fn test_duplicate_records_insert_once() {
        let html = "<script>once()</script>";
        let rec = record("once()", ElementKind::Script);

        let result = rewrite(html, &[rec.clone(), rec.clone()]);

        assert_eq!(result.matches("integrity=").count(), 1);
    }

    #[test]
    fn test_src_script_with_matching_fallback_is_skipped() {
        let html = r#"<script src="/app.js">fallback</script><script>fallback</script>"#;
        let rec = record("fallback", ElementKind::Script);

        let result = rewrite(html, &[rec.clone()]);

        assert!(result.starts_with(r#"<script src="/app.js">fallback</script>"#));
        assert!(result.ends_with(&format!(
            r#"<script integrity="{}">fallback</script>"#,
            rec.digest
        )));
    }

    #[test]
    fn test_kind_mismatch_leaves_element_untouched() {
        let html = "<style>shared</style>";
        let rec = record("shared", ElementKind::Script);

        assert_eq!(rewrite(html, &[rec]), html);
    }

    #[test]
    fn test_regex_metacharacters_in_content() {
        let content = r"if (a*b) { x = [1].map(v => v+?); } /* $^ */";
        let html = format!("<script>{}</script>", content);
        let rec = record(content, ElementKind::Script);

        let result = rewrite(&html, &[rec.clone()]);

        assert!(result.contains(&format!(r#"integrity="{}""#, rec.digest)));
        assert!(result.contains(content));
    }

    #[test]
    fn test_unmatched_record_is_noop() {
        let html = "<script>real</script>";
        let rec = record("not present", ElementKind::Script);

        assert_eq!(rewrite(html, &[rec]), html);
    }

    #[test]
    fn test_empty_body_element() {
        let html = "<script></script>";
        let rec = record("", ElementKind::Script);

        let result = rewrite(html, &[rec.clone()]);

        assert_eq!(
            result,
            format!(r#"<script integrity="{}"></script>"#, rec.digest)
        );
    }
}
