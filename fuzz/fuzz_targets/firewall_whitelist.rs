#![no_main]

use std::sync::OnceLock;

use firewall::{DiagnosticsConfig, Firewall, FirewallConfig, is_bypass_value};
use html::{Token, tokenize};
use libfuzzer_sys::fuzz_target;

fn firewalls() -> &'static [Firewall; 2] {
    static FIREWALLS: OnceLock<[Firewall; 2]> = OnceLock::new();
    FIREWALLS.get_or_init(|| {
        let quiet = |config: FirewallConfig| {
            Firewall::new(config.with_diagnostics(DiagnosticsConfig::disabled()))
        };
        [
            quiet(FirewallConfig::default()),
            quiet(FirewallConfig::default().with_style_sheets(true)),
        ]
    })
}

fuzz_target!(|data: &[u8]| {
    for firewall in firewalls() {
        let Ok(output) = firewall.sanitize_bytes(data) else {
            continue;
        };
        let whitelist = firewall.whitelist();
        for token in tokenize(&output) {
            match token {
                Token::StartTag {
                    name, attributes, ..
                } => {
                    assert!(whitelist.is_good_tag(&name), "<{name}> in {output:?}");
                    for attribute in attributes {
                        assert!(!whitelist.is_bad_attribute(&attribute.name));
                        if let Some(value) = &attribute.value {
                            assert!(!is_bypass_value(value));
                        }
                    }
                }
                Token::EndTag(name) => assert!(whitelist.is_good_tag(&name)),
                _ => {}
            }
        }
    }
});
