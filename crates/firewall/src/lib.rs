//! HTML firewall.
//!
//! Untrusted HTML goes in; what comes out carries only whitelisted tags,
//! no event-handler or script attributes, no attribute values that smuggle
//! script URIs or markup, and exactly one trailing `</html>`. A final
//! regex pass re-checks the output for suspect tags and refuses to hand it
//! out if any slipped through.
//!
//! ```
//! let clean = firewall::firewall_html(r#"<p onclick="x()">hi<script>evil()</script></p>"#)
//!     .expect("nothing suspect left");
//! assert_eq!(clean, "<p>\nhi</p>\n</html>");
//! ```
//!
//! The filter does not balance or repair markup. Callers that need a
//! different policy build a [`Firewall`] from a [`FirewallConfig`], directly
//! or through TOML [`FirewallSettings`].

mod config;
mod error;
mod filter;
mod firewall;
mod segment;
mod settings;
pub mod tables;
mod verify;

use std::sync::OnceLock;

pub use config::{
    DiagnosticsConfig, EndTagMatching, FirewallConfig, OutputCharset, VerificationPolicy,
    Whitelist,
};
pub use error::{ConfigError, FirewallError};
pub use filter::is_bypass_value;
pub use firewall::Firewall;
pub use html::extract_text;
pub use settings::{DiagnosticsSettings, FirewallSettings, TagSettings};

fn default_firewall() -> &'static Firewall {
    static FIREWALL: OnceLock<Firewall> = OnceLock::new();
    FIREWALL.get_or_init(Firewall::default)
}

/// Sanitize `html` with the default configuration.
pub fn firewall_html(html: &str) -> Result<String, FirewallError> {
    default_firewall().sanitize(html)
}

/// Sanitize undecoded `html` with the default configuration.
pub fn firewall_html_bytes(html: &[u8]) -> Result<String, FirewallError> {
    default_firewall().sanitize_bytes(html)
}
