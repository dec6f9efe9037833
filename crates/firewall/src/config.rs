//! Firewall configuration.
//!
//! `FirewallConfig` is what callers build; `Whitelist` is the resolved,
//! immutable form a `Firewall` filters with. Resolution applies the
//! style-sheet toggle, so two configs that differ only in the toggle never
//! share mutable tables.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use serde::Deserialize;

use crate::tables;

/// What to do when the verification pass finds a suspect tag in the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationPolicy {
    /// Return `FirewallError::VerificationFailed`; the output is not handed out.
    #[default]
    Raise,
    /// Log the failure and return the output anyway.
    LogOnly,
}

/// How `</html>` segment boundaries are recognized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndTagMatching {
    /// `</\s*html\s*>`, any case.
    #[default]
    Tolerant,
    /// The literal `</html>` only.
    Exact,
}

/// Character set attribute text is rendered in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputCharset {
    #[default]
    Utf8,
    /// Non-ASCII characters are dropped from attribute names and values.
    Ascii,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    /// File name prefix, `<component>.firewall_html.failed.before`.
    pub component: String,
}

impl DiagnosticsConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn before_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}.firewall_html.failed.before", self.component))
    }

    pub fn after_path(&self) -> PathBuf {
        self.dir
            .join(format!("{}.firewall_html.failed.after", self.component))
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: std::env::temp_dir(),
            component: "firewall".to_string(),
        }
    }
}

fn name_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

fn extend_lowercase<I>(set: &mut BTreeSet<String>, names: I)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    set.extend(
        names
            .into_iter()
            .map(|name| name.as_ref().trim().to_ascii_lowercase())
            .filter(|name| !name.is_empty()),
    );
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FirewallConfig {
    good_tags: BTreeSet<String>,
    skipped_tags: BTreeSet<String>,
    bad_attributes: BTreeSet<String>,
    suspect_tags: BTreeSet<String>,
    allow_style_sheets: bool,
    verification_policy: VerificationPolicy,
    end_tag_matching: EndTagMatching,
    output_charset: OutputCharset,
    diagnostics: DiagnosticsConfig,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            good_tags: name_set(tables::GOOD_TAGS),
            skipped_tags: name_set(tables::SKIPPED_TAGS),
            bad_attributes: name_set(tables::BAD_ATTRIBUTES),
            suspect_tags: name_set(tables::SUSPECT_TAGS),
            allow_style_sheets: false,
            verification_policy: VerificationPolicy::Raise,
            end_tag_matching: EndTagMatching::Tolerant,
            output_charset: OutputCharset::Utf8,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl FirewallConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// The older, tolerant variant: exact `</html>` matching, a shorter
    /// suspect list, and verification failures that are only logged.
    pub fn legacy() -> Self {
        Self {
            suspect_tags: name_set(tables::LEGACY_SUSPECT_TAGS),
            verification_policy: VerificationPolicy::LogOnly,
            end_tag_matching: EndTagMatching::Exact,
            ..Self::default()
        }
    }

    pub fn with_style_sheets(mut self, allow: bool) -> Self {
        self.allow_style_sheets = allow;
        self
    }

    pub fn with_verification_policy(mut self, policy: VerificationPolicy) -> Self {
        self.verification_policy = policy;
        self
    }

    pub fn with_end_tag_matching(mut self, matching: EndTagMatching) -> Self {
        self.end_tag_matching = matching;
        self
    }

    pub fn with_output_charset(mut self, charset: OutputCharset) -> Self {
        self.output_charset = charset;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn allow_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        extend_lowercase(&mut self.good_tags, tags);
        self
    }

    pub fn disallow_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut removed = BTreeSet::new();
        extend_lowercase(&mut removed, tags);
        self.good_tags.retain(|tag| !removed.contains(tag));
        self
    }

    pub fn skip_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        extend_lowercase(&mut self.skipped_tags, tags);
        self
    }

    pub fn block_attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        extend_lowercase(&mut self.bad_attributes, attributes);
        self
    }

    pub fn suspect_tags<I>(mut self, tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        extend_lowercase(&mut self.suspect_tags, tags);
        self
    }

    pub fn allows_style_sheets(&self) -> bool {
        self.allow_style_sheets
    }

    pub fn verification_policy(&self) -> VerificationPolicy {
        self.verification_policy
    }

    pub fn end_tag_matching(&self) -> EndTagMatching {
        self.end_tag_matching
    }

    pub fn output_charset(&self) -> OutputCharset {
        self.output_charset
    }

    pub fn diagnostics(&self) -> &DiagnosticsConfig {
        &self.diagnostics
    }

    /// Resolve the tag and attribute tables.
    pub fn whitelist(&self) -> Whitelist {
        let mut good_tags = self.good_tags.clone();
        let mut skipped_tags = self.skipped_tags.clone();
        let mut bad_attributes = self.bad_attributes.clone();

        if self.allow_style_sheets {
            good_tags.insert(tables::STYLE.to_string());
            good_tags.insert(tables::LINK.to_string());
            skipped_tags.remove(tables::STYLE);
        } else {
            // No CSS parser to vet style sheets with, so no CSS at all.
            good_tags.remove(tables::STYLE);
            good_tags.remove(tables::LINK);
            skipped_tags.insert(tables::STYLE.to_string());
            bad_attributes.insert(tables::STYLE.to_string());
        }
        // A skipped tag is never also emitted.
        good_tags.retain(|tag| !skipped_tags.contains(tag));

        // Tags this configuration emits on purpose cannot count as leaks.
        let suspect_tags = self
            .suspect_tags
            .iter()
            .filter(|tag| !good_tags.contains(*tag))
            .cloned()
            .collect();

        Whitelist {
            good_tags: good_tags.into_iter().collect(),
            skipped_tags: skipped_tags.into_iter().collect(),
            bad_attributes: bad_attributes.into_iter().collect(),
            suspect_tags,
        }
    }
}

/// Resolved tag and attribute tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Whitelist {
    good_tags: HashSet<String>,
    skipped_tags: HashSet<String>,
    bad_attributes: HashSet<String>,
    suspect_tags: BTreeSet<String>,
}

impl Whitelist {
    pub fn is_good_tag(&self, name: &str) -> bool {
        self.good_tags.contains(name)
    }

    pub fn is_skipped_tag(&self, name: &str) -> bool {
        self.skipped_tags.contains(name)
    }

    pub fn is_bad_attribute(&self, name: &str) -> bool {
        self.bad_attributes.contains(name)
    }

    pub fn suspect_tags(&self) -> &BTreeSet<String> {
        &self.suspect_tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_skips_style_and_blocks_style_attribute() {
        let whitelist = FirewallConfig::default().whitelist();
        assert!(whitelist.is_skipped_tag("style"));
        assert!(whitelist.is_skipped_tag("script"));
        assert!(whitelist.is_bad_attribute("style"));
        assert!(!whitelist.is_good_tag("style"));
        assert!(!whitelist.is_good_tag("link"));
        assert!(!whitelist.is_good_tag("img"));
        assert!(whitelist.is_good_tag("p"));
    }

    #[test]
    fn style_sheet_toggle_moves_style_and_link_to_good_tags() {
        let whitelist = FirewallConfig::default().with_style_sheets(true).whitelist();
        assert!(whitelist.is_good_tag("style"));
        assert!(whitelist.is_good_tag("link"));
        assert!(!whitelist.is_skipped_tag("style"));
        assert!(!whitelist.is_bad_attribute("style"));
        assert!(!whitelist.suspect_tags().contains("style"));
        assert!(whitelist.suspect_tags().contains("script"));
    }

    #[test]
    fn configs_do_not_share_tables() {
        let with_css = FirewallConfig::default().with_style_sheets(true).whitelist();
        let without_css = FirewallConfig::default().whitelist();
        assert!(with_css.is_good_tag("style"));
        assert!(!without_css.is_good_tag("style"));
    }

    #[test]
    fn overrides_are_lowercased_and_resolved() {
        let whitelist = FirewallConfig::default()
            .allow_tags(["FIGURE", " img "])
            .disallow_tags(["Form"])
            .skip_tags(["object"])
            .block_attributes(["FormAction"])
            .whitelist();
        assert!(whitelist.is_good_tag("figure"));
        assert!(whitelist.is_good_tag("img"));
        assert!(!whitelist.is_good_tag("form"));
        assert!(whitelist.is_skipped_tag("object"));
        assert!(whitelist.is_bad_attribute("formaction"));
        // Explicitly allowed tags drop out of the verification scan.
        assert!(!whitelist.suspect_tags().contains("img"));
    }

    #[test]
    fn skipped_tags_win_over_good_tags() {
        let whitelist = FirewallConfig::default()
            .allow_tags(["script"])
            .whitelist();
        assert!(!whitelist.is_good_tag("script"));
        assert!(whitelist.is_skipped_tag("script"));
        assert!(whitelist.suspect_tags().contains("script"));
    }

    #[test]
    fn legacy_preset() {
        let config = FirewallConfig::legacy();
        assert_eq!(config.verification_policy(), VerificationPolicy::LogOnly);
        assert_eq!(config.end_tag_matching(), EndTagMatching::Exact);
        let suspects: Vec<_> = config.whitelist().suspect_tags().iter().cloned().collect();
        assert_eq!(suspects, vec!["img", "script", "style"]);
    }

    #[test]
    fn diagnostic_paths_use_component_prefix() {
        let diagnostics = DiagnosticsConfig {
            enabled: true,
            dir: PathBuf::from("/var/tmp"),
            component: "webbox".to_string(),
        };
        assert_eq!(
            diagnostics.before_path(),
            PathBuf::from("/var/tmp/webbox.firewall_html.failed.before")
        );
        assert_eq!(
            diagnostics.after_path(),
            PathBuf::from("/var/tmp/webbox.firewall_html.failed.after")
        );
    }
}
