//! Fixture loading and reporting helpers for firewall tests.
//!
//! Corpus files are TOML:
//!
//! ```toml
//! format = "firewall-corpus-v1"
//!
//! [[cases]]
//! name = "event handler stripped"
//! input = '<p onclick="x()">t</p>'
//! expected = "<p>\nt</p>\n</html>"
//! absent = ["onclick"]
//! ```

use serde::Deserialize;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

pub const CORPUS_FORMAT_V1: &str = "firewall-corpus-v1";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Ok,
    VerificationFailed,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub name: String,
    pub input: String,
    /// Exact sanitized output, `</html>` included.
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub contains: Vec<String>,
    /// Substrings that must not appear, compared case-insensitively.
    #[serde(default)]
    pub absent: Vec<String>,
    #[serde(default)]
    pub outcome: Outcome,
    /// Firewall settings TOML layered over the defaults.
    #[serde(default)]
    pub settings: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CorpusFile {
    format: String,
    cases: Vec<Case>,
}

#[derive(Clone, Debug)]
pub struct CorpusCase {
    pub path: PathBuf,
    pub case: Case,
}

impl CorpusCase {
    pub fn id(&self) -> String {
        let file = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{file}::{}", self.case.name)
    }
}

/// Load every `*.toml` corpus file under `dir`, sorted by path.
///
/// Panics on unreadable or malformed files; a broken fixture is a test bug.
pub fn load_corpus_dir(dir: &Path) -> Vec<CorpusCase> {
    let entries = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read corpus dir {dir:?}: {err}"));
    let mut paths: Vec<PathBuf> = entries
        .map(|entry| {
            entry
                .unwrap_or_else(|err| panic!("failed to read entry in {dir:?}: {err}"))
                .path()
        })
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut cases = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read corpus file {path:?}: {err}"));
        let file: CorpusFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse corpus file {path:?}: {err}"));
        assert_eq!(
            file.format, CORPUS_FORMAT_V1,
            "unsupported corpus format in {path:?}"
        );
        assert!(!file.cases.is_empty(), "corpus file {path:?} has no cases");
        cases.extend(file.cases.into_iter().map(|case| CorpusCase {
            path: path.clone(),
            case,
        }));
    }
    cases
}

/// Escape control characters so multi-line HTML prints on one line.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' => {
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Report the first differing line between two outputs, with context.
pub fn diff_lines(expected: &str, actual: &str) -> String {
    let expected: Vec<&str> = expected.split('\n').collect();
    let actual: Vec<&str> = actual.split('\n').collect();
    let missing = "<missing>";
    let max = expected.len().max(actual.len());
    let mut out = String::new();

    let mismatch = (0..max).find(|&i| expected.get(i) != actual.get(i));
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(&mut out, "first mismatch at line {}:", i + 1);
        for line in start..end {
            let left = expected.get(line).copied().unwrap_or(missing);
            let right = actual.get(line).copied().unwrap_or(missing);
            let marker = if line == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", line + 1, escape_text(left));
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", line + 1, escape_text(right));
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}
