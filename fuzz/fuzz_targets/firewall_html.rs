#![no_main]

use std::sync::OnceLock;

use firewall::{DiagnosticsConfig, Firewall, FirewallConfig, FirewallError};
use libfuzzer_sys::fuzz_target;

fn firewall() -> &'static Firewall {
    static FIREWALL: OnceLock<Firewall> = OnceLock::new();
    FIREWALL.get_or_init(|| {
        Firewall::new(FirewallConfig::default().with_diagnostics(DiagnosticsConfig::disabled()))
    })
}

fuzz_target!(|data: &[u8]| {
    match firewall().sanitize_bytes(data) {
        Ok(output) => {
            assert!(output.ends_with("</html>"));
            assert_eq!(output.matches("</html>").count(), 1);
            // Clean output is a fixed point.
            let again = firewall()
                .sanitize(&output)
                .expect("clean output passes verification again");
            assert_eq!(again, output);
        }
        Err(FirewallError::VerificationFailed { tags, diagnostics }) => {
            assert!(!tags.is_empty());
            assert!(diagnostics.is_empty());
        }
    }
});
