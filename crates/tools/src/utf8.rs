//! UTF-8 decoding that never fails.
//!
//! Each undecodable byte sequence is replaced by a caller-chosen placeholder
//! and its byte offset is recorded, so callers can report what was replaced.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decoded {
    pub text: String,
    /// Byte offsets in the input where a placeholder was substituted.
    pub replaced: Vec<usize>,
}

impl Decoded {
    pub fn is_lossless(&self) -> bool {
        self.replaced.is_empty()
    }
}

/// Decode `bytes`, substituting `placeholder` for every invalid sequence.
///
/// A truncated multi-byte sequence at the end of input counts as one invalid
/// sequence.
pub fn decode_with_placeholder(bytes: &[u8], placeholder: char) -> Decoded {
    let mut out = Decoded {
        text: String::with_capacity(bytes.len()),
        replaced: Vec::new(),
    };
    let mut offset = 0usize;
    let mut rest = bytes;

    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                out.text.push_str(s);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                let (valid, invalid) = rest.split_at(valid_up_to);
                out.text
                    .push_str(std::str::from_utf8(valid).expect("valid UTF-8 prefix"));
                out.text.push(placeholder);
                out.replaced.push(offset + valid_up_to);

                let skip = e.error_len().unwrap_or(invalid.len());
                offset += valid_up_to + skip;
                rest = &invalid[skip..];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_input_is_lossless() {
        let decoded = decode_with_placeholder("caf\u{e9} ×".as_bytes(), '?');
        assert_eq!(decoded.text, "café ×");
        assert!(decoded.is_lossless());
    }

    #[test]
    fn invalid_start_byte_is_replaced() {
        let decoded = decode_with_placeholder(b"<p>\xa1hola</p>", '?');
        assert_eq!(decoded.text, "<p>?hola</p>");
        assert_eq!(decoded.replaced, vec![3]);
    }

    #[test]
    fn each_invalid_sequence_gets_one_placeholder() {
        let decoded = decode_with_placeholder(b"a\xff\xfeb\xc3", '?');
        assert_eq!(decoded.text, "a??b?");
        assert_eq!(decoded.replaced, vec![1, 2, 4]);
    }

    #[test]
    fn truncated_sequence_in_middle_is_replaced_and_decoding_resumes() {
        // First two bytes of "€" (E2 82 AC) followed by ASCII.
        let decoded = decode_with_placeholder(b"x\xe2\x82y", '\u{FFFD}');
        assert_eq!(decoded.text, "x\u{FFFD}y");
        assert_eq!(decoded.replaced, vec![1]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_with_placeholder(b"", '?'), Decoded::default());
    }
}
