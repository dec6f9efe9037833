#![no_main]

use html::{Token, tokenize};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    for token in tokenize(input) {
        match token {
            Token::StartTag { name, attributes, .. } => {
                assert!(!name.is_empty());
                assert_eq!(name, name.to_ascii_lowercase());
                for attribute in attributes {
                    assert_eq!(attribute.name, attribute.name.to_ascii_lowercase());
                }
            }
            Token::EndTag(name) => assert_eq!(name, name.to_ascii_lowercase()),
            _ => {}
        }
    }
    let _ = html::extract_text(input);
});
