//! Splitting input at `</html>`.
//!
//! Concatenated documents (multi-frame captures, tampered responses) carry
//! more than one `</html>`. Each segment is filtered on its own and the
//! firewall appends a single `</html>` afterwards.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::EndTagMatching;

pub(crate) const HTML_END_TAG: &str = "</html>";

fn tolerant_end_tag() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)</\s*html\s*>").expect("end tag pattern is valid"))
}

/// Split `html` at every `</html>`; the end tags themselves are dropped.
///
/// Always returns at least one segment.
pub(crate) fn split_segments(html: &str, matching: EndTagMatching) -> Vec<&str> {
    let segments: Vec<&str> = match matching {
        EndTagMatching::Tolerant => tolerant_end_tag().split(html).collect(),
        EndTagMatching::Exact => html.split(HTML_END_TAG).collect(),
    };
    if segments.len() > 2 {
        log::debug!(
            target: "firewall.segment",
            "{} html end tags",
            segments.len() - 1
        );
    }
    segments
}
