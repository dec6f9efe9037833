//! TOML settings layered over `FirewallConfig`.
//!
//! ```toml
//! allow_style_sheets = false
//! verification_policy = "raise"   # or "log_only"
//! end_tag_matching = "tolerant"   # or "exact"
//! output_charset = "utf8"         # or "ascii"
//!
//! [tags]
//! good = ["figure"]
//! remove_good = ["form"]
//! skipped = ["object"]
//! bad_attributes = ["formaction"]
//! suspect = ["iframe"]
//!
//! [diagnostics]
//! enabled = true
//! dir = "/var/tmp"
//! component = "webbox"
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::{EndTagMatching, FirewallConfig, OutputCharset, VerificationPolicy};
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirewallSettings {
    pub allow_style_sheets: Option<bool>,
    pub verification_policy: Option<VerificationPolicy>,
    pub end_tag_matching: Option<EndTagMatching>,
    pub output_charset: Option<OutputCharset>,
    pub tags: TagSettings,
    pub diagnostics: DiagnosticsSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagSettings {
    pub good: Vec<String>,
    pub remove_good: Vec<String>,
    pub skipped: Vec<String>,
    pub bad_attributes: Vec<String>,
    pub suspect: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsSettings {
    pub enabled: Option<bool>,
    pub dir: Option<PathBuf>,
    pub component: Option<String>,
}

impl FirewallSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Layer these settings over `base`.
    pub fn apply(self, base: FirewallConfig) -> FirewallConfig {
        let mut config = base
            .allow_tags(self.tags.good)
            .disallow_tags(self.tags.remove_good)
            .skip_tags(self.tags.skipped)
            .block_attributes(self.tags.bad_attributes)
            .suspect_tags(self.tags.suspect);

        if let Some(allow) = self.allow_style_sheets {
            config = config.with_style_sheets(allow);
        }
        if let Some(policy) = self.verification_policy {
            config = config.with_verification_policy(policy);
        }
        if let Some(matching) = self.end_tag_matching {
            config = config.with_end_tag_matching(matching);
        }
        if let Some(charset) = self.output_charset {
            config = config.with_output_charset(charset);
        }

        let mut diagnostics = config.diagnostics().clone();
        if let Some(enabled) = self.diagnostics.enabled {
            diagnostics.enabled = enabled;
        }
        if let Some(dir) = self.diagnostics.dir {
            diagnostics.dir = dir;
        }
        if let Some(component) = self.diagnostics.component {
            diagnostics.component = component;
        }
        config.with_diagnostics(diagnostics)
    }

    pub fn into_config(self) -> FirewallConfig {
        self.apply(FirewallConfig::default())
    }
}
