use html::tokenize_into;
use tools::utf8::decode_with_placeholder;

use crate::config::{FirewallConfig, VerificationPolicy, Whitelist};
use crate::error::FirewallError;
use crate::filter::FilterSession;
use crate::segment::{HTML_END_TAG, split_segments};
use crate::verify::{Verifier, write_diagnostics};

const REPLACEMENT: char = '?';

/// A configured HTML firewall.
///
/// Construction resolves the configuration once; `sanitize` can then be
/// called from any number of threads, each call with its own filter session.
#[derive(Clone, Debug)]
pub struct Firewall {
    config: FirewallConfig,
    whitelist: Whitelist,
    verifier: Verifier,
}

impl Default for Firewall {
    fn default() -> Self {
        Self::new(FirewallConfig::default())
    }
}

impl Firewall {
    pub fn new(config: FirewallConfig) -> Self {
        let whitelist = config.whitelist();
        let verifier = Verifier::new(whitelist.suspect_tags());
        Self {
            config,
            whitelist,
            verifier,
        }
    }

    pub fn config(&self) -> &FirewallConfig {
        &self.config
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.whitelist
    }

    /// Filter `html` down to whitelisted markup.
    ///
    /// The result always ends with exactly one `</html>`. Fails only when
    /// the verification pass finds a suspect tag and the policy is
    /// `VerificationPolicy::Raise`.
    pub fn sanitize(&self, html: &str) -> Result<String, FirewallError> {
        let mut session = FilterSession::new(&self.whitelist, self.config.output_charset());
        for segment in split_segments(html, self.config.end_tag_matching()) {
            session.begin_segment();
            tokenize_into(segment, &mut session);
        }
        let mut output = session.finish();
        output.push_str(HTML_END_TAG);

        let tags = self.verifier.scan(&output);
        if tags.is_empty() {
            return Ok(output);
        }

        log::error!(
            target: "firewall.verify",
            "html firewall failed: tags passed the filter: {}",
            tags.join(",")
        );
        let diagnostics = write_diagnostics(self.config.diagnostics(), html, &output);
        match self.config.verification_policy() {
            VerificationPolicy::Raise => Err(FirewallError::VerificationFailed { tags, diagnostics }),
            VerificationPolicy::LogOnly => Ok(output),
        }
    }

    /// Like [`Firewall::sanitize`], for undecoded input. Bytes that are not
    /// valid UTF-8 become `?`.
    pub fn sanitize_bytes(&self, html: &[u8]) -> Result<String, FirewallError> {
        let decoded = decode_with_placeholder(html, REPLACEMENT);
        if !decoded.is_lossless() {
            log::debug!(
                target: "firewall.bytes",
                "{} undecodable byte sequences replaced",
                decoded.replaced.len()
            );
            for offset in &decoded.replaced {
                log::debug!(target: "firewall.bytes", "undecodable byte at offset {offset}");
            }
        }
        self.sanitize(&decoded.text)
    }
}
