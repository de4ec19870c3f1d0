//! Offline audit of a built page
//!
//! Runs without a browser, straight on the HTML, and reports through the
//! same outcome model as a QA run under the viewport label `static`.

use std::path::Path;

use lander_common::{find_placeholders, unique_placeholders, Outcome};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::QaResult;
use crate::recorder::Recorder;

pub const STATIC_VIEWPORT: &str = "static";

/// Pages smaller than this are most likely an unfilled template
pub const MIN_PAGE_BYTES: usize = 50_000;

const MAX_LISTED_PLACEHOLDERS: usize = 10;

static HEADLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>.*?</h1>").expect("valid headline pattern"));
static HERO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)class="hero""#).expect("valid hero pattern"));
static ANY_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src="[^"]+""#).expect("valid image pattern"));
static LOCAL_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"src="(images/[^"]+)""#).expect("valid image path pattern"));

/// Audit the page at `page`. Image paths resolve against the page's
/// directory.
pub fn audit_build(page: &Path) -> QaResult<Vec<Outcome>> {
    let mut recorder = Recorder::new(STATIC_VIEWPORT);

    if !page.is_file() {
        recorder.fail(
            "index-exists",
            format!("{} does not exist", page.display()),
            "Run `lander build` to generate the page",
        );
        return Ok(recorder.into_outcomes());
    }
    recorder.pass("index-exists", format!("{} found", page.display()));

    let content = std::fs::read_to_string(page)?;
    let base = page.parent().map(Path::to_path_buf).unwrap_or_default();
    audit_content(&mut recorder, &content, &base);

    Ok(recorder.into_outcomes())
}

fn audit_content(recorder: &mut Recorder, content: &str, base: &Path) {
    let found = find_placeholders(content);
    if found.is_empty() {
        recorder.pass("no-placeholders", "Zero unresolved placeholders");
    } else {
        let unique = unique_placeholders(&found);
        let shown: Vec<&str> = unique
            .iter()
            .take(MAX_LISTED_PLACEHOLDERS)
            .map(String::as_str)
            .collect();
        recorder.fail(
            "no-placeholders",
            format!("{} unresolved placeholders found: {}", unique.len(), shown.join(", ")),
            "Fill in missing values in product.config and rebuild with `lander build`",
        );
    }

    presence(recorder, "has-headline", &HEADLINE, content, "<h1> headline present", "No <h1> headline found");
    presence(recorder, "has-hero", &HERO, content, "Hero section present", "No hero section found");
    presence(recorder, "has-images", &ANY_IMAGE, content, "Images present", "No images found");

    let missing: Vec<String> = local_images(content)
        .into_iter()
        .filter(|src| {
            let exists = base.join(src).exists();
            debug!("Image {} exists: {}", src, exists);
            !exists
        })
        .collect();
    if missing.is_empty() {
        recorder.pass("images-exist", "All referenced images exist");
    } else {
        recorder.fail(
            "images-exist",
            format!("Missing image(s): {}", missing.join(", ")),
            "Add the missing files to images/ or fix the paths in sections/*.html",
        );
    }

    let size = content.len();
    if size < MIN_PAGE_BYTES {
        recorder.warn(
            "page-size",
            format!(
                "Page seems too small ({} bytes). Expected {}KB+",
                size,
                MIN_PAGE_BYTES / 1000
            ),
        );
    } else {
        recorder.pass("page-size", format!("{} bytes", size));
    }
}

fn presence(recorder: &mut Recorder, name: &str, pattern: &Regex, content: &str, found: &str, absent: &str) {
    if pattern.is_match(content) {
        recorder.pass(name, found);
    } else {
        recorder.warn(name, absent);
    }
}

/// `images/...` sources in document order, deduplicated
fn local_images(content: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for capture in LOCAL_IMAGE.captures_iter(content) {
        let path = capture[1].to_string();
        if !paths.contains(&path) {
            paths.push(path);
        }
    }
    paths
}
