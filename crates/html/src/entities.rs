//! Character reference scanning and decoding.
//!
//! Contract:
//! - Named references are recognized only when `;`-terminated and at most
//!   `MAX_NAME_LEN` ASCII alphanumerics long. Decoding knows a short table
//!   (see `named_reference`); unknown names pass through unchanged.
//! - Numeric references (`&#58;`, `&#x3A;`) may omit the `;`, the way browsers
//!   read them inside attribute values. Leading zeros do not count toward the
//!   digit limit.
//! - Only valid, non-NUL Unicode scalar values decode; anything else passes
//!   through unchanged.
use std::ops::Range;

const MAX_NAME_LEN: usize = 32;
const MAX_HEX_DIGITS: usize = 6; // 0x10FFFF
const MAX_DEC_DIGITS: usize = 7; // 1114111

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReferenceKind {
    Named,
    Numeric { hex: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Reference {
    pub kind: ReferenceKind,
    /// Name for named references; `58` or `x3A` for numeric ones.
    pub body: Range<usize>,
    /// First byte after the reference, `;` included.
    pub end: usize,
    pub terminated: bool,
}

/// Scan a reference starting at the `&` at `start`.
pub(crate) fn scan_reference(bytes: &[u8], start: usize) -> Option<Reference> {
    debug_assert_eq!(bytes.get(start), Some(&b'&'));
    match bytes.get(start + 1)? {
        b'#' => scan_numeric(bytes, start),
        b if b.is_ascii_alphabetic() => scan_named(bytes, start),
        _ => None,
    }
}

fn scan_named(bytes: &[u8], start: usize) -> Option<Reference> {
    let name_start = start + 1;
    let mut j = name_start;
    while j < bytes.len() && bytes[j].is_ascii_alphanumeric() {
        if j - name_start == MAX_NAME_LEN {
            return None;
        }
        j += 1;
    }
    (bytes.get(j) == Some(&b';')).then(|| Reference {
        kind: ReferenceKind::Named,
        body: name_start..j,
        end: j + 1,
        terminated: true,
    })
}

fn scan_numeric(bytes: &[u8], start: usize) -> Option<Reference> {
    let body_start = start + 2;
    let hex = matches!(bytes.get(body_start), Some(b'x' | b'X'));
    let digits_start = if hex { body_start + 1 } else { body_start };
    let (is_digit, max_digits): (fn(&u8) -> bool, usize) = if hex {
        (u8::is_ascii_hexdigit, MAX_HEX_DIGITS)
    } else {
        (u8::is_ascii_digit, MAX_DEC_DIGITS)
    };

    let mut j = digits_start;
    while j < bytes.len() && bytes[j] == b'0' {
        j += 1;
    }
    let mut significant = 0usize;
    while j < bytes.len() && is_digit(&bytes[j]) {
        if significant == max_digits {
            return None;
        }
        significant += 1;
        j += 1;
    }
    if j == digits_start {
        return None;
    }
    let terminated = bytes.get(j) == Some(&b';');
    Some(Reference {
        kind: ReferenceKind::Numeric { hex },
        body: body_start..j,
        end: if terminated { j + 1 } else { j },
        terminated,
    })
}

fn named_reference(name: &str) -> Option<char> {
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "colon" => ':',
        "semi" => ';',
        "sol" => '/',
        "lpar" => '(',
        "rpar" => ')',
        "Tab" => '\t',
        "NewLine" => '\n',
        _ => return None,
    };
    Some(ch)
}

fn numeric_reference(body: &str, hex: bool) -> Option<char> {
    let digits = if hex { &body[1..] } else { body };
    let value = u32::from_str_radix(digits, if hex { 16 } else { 10 }).ok()?;
    char::from_u32(value).filter(|ch| *ch != '\0')
}

/// Decode character references in `s` (attribute values, extracted text).
pub fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut copy_start = 0;
    let mut i = 0;

    while let Some(rel) = memchr::memchr(b'&', &bytes[i..]) {
        let amp = i + rel;
        let Some(reference) = scan_reference(bytes, amp) else {
            i = amp + 1;
            continue;
        };
        let body = &s[reference.body.clone()];
        let decoded = match reference.kind {
            ReferenceKind::Named => named_reference(body),
            ReferenceKind::Numeric { hex } => numeric_reference(body, hex),
        };
        if let Some(ch) = decoded {
            out.push_str(&s[copy_start..amp]);
            out.push(ch);
            copy_start = reference.end;
        }
        i = reference.end;
    }

    out.push_str(&s[copy_start..]);
    out
}
