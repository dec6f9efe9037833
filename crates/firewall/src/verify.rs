//! Post-filter verification and failure diagnostics.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::config::DiagnosticsConfig;

/// Scans filtered output for opening tags that must never survive.
#[derive(Clone, Debug)]
pub(crate) struct Verifier {
    /// `None` when there is nothing to scan for.
    pattern: Option<Regex>,
}

impl Verifier {
    pub(crate) fn new(suspect_tags: &BTreeSet<String>) -> Self {
        if suspect_tags.is_empty() {
            return Self { pattern: None };
        }
        let alternation = suspect_tags
            .iter()
            .map(|tag| regex::escape(tag))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)<\s*({alternation})"))
            .expect("suspect tag pattern is valid");
        Self {
            pattern: Some(pattern),
        }
    }

    /// Distinct suspect tags found in `output`, lowercase and sorted.
    pub(crate) fn scan(&self, output: &str) -> Vec<String> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        let found: BTreeSet<String> = pattern
            .captures_iter(output)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
            .collect();
        found.into_iter().collect()
    }
}

fn opening_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n*\s*<\s*([^/])").expect("opening tag pattern is valid"))
}

/// Put every opening tag on its own line so the files diff well.
pub(crate) fn break_before_tags(html: &str) -> String {
    opening_tag().replace_all(html, "\n<${1}").into_owned()
}

fn write_one(path: &Path, contents: &str) -> Option<PathBuf> {
    match fs::write(path, break_before_tags(contents)) {
        Ok(()) => Some(path.to_path_buf()),
        Err(err) => {
            log::error!(
                target: "firewall.verify",
                "could not write {}: {err}",
                path.display()
            );
            None
        }
    }
}

/// Write the input and the filtered output next to each other for
/// inspection. Returns the paths actually written.
pub(crate) fn write_diagnostics(
    config: &DiagnosticsConfig,
    before: &str,
    after: &str,
) -> Vec<PathBuf> {
    if !config.enabled {
        return Vec::new();
    }
    [
        write_one(&config.before_path(), before),
        write_one(&config.after_path(), after),
    ]
    .into_iter()
    .flatten()
    .collect()
}
