//! Forgiving HTML tokenizer with a constrained, practical name character set.
//!
//! Supported tag-name characters (ASCII only): `[A-Za-z0-9:_-]`.
//! Attribute names use the same ASCII character class; other bytes inside a
//! start tag are skipped.
//!
//! The tokenizer never fails. Markup it cannot complete is either reported as
//! text (a `<` that opens nothing) or dropped (a start tag still open at end
//! of input). Callers that filter markup rely on that: anything reported as a
//! tag really is a tag, and anything reported as text has no tag in it.
//!
//! Known limitations (intentional):
//! - Not an HTML5 state machine: no tree construction, no foreign content.
//! - Raw text elements are limited to `script` and `style`. Their body ends at
//!   the close tag name followed by whitespace, `/`, `>` or end of input; the
//!   rest of the close tag runs to the next `>` (see `find_rawtext_close_tag`).
use crate::entities::{ReferenceKind, scan_reference};
use crate::sink::TokenSink;
use crate::types::{Attribute, Token};
use memchr::memchr;

const HTML_COMMENT_START: &str = "<!--";
const HTML_COMMENT_END: &str = "-->";

// it only attempts matches starting at ASCII <
// < cannot appear in UTF-8 continuation bytes
const SCRIPT_CLOSE_TAG: &[u8] = b"</script";
const STYLE_CLOSE_TAG: &[u8] = b"</style";

macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "html.tokenizer", $($arg)*);
    };
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack.len() >= start + needle.len()
        && haystack[start..start + needle.len()].eq_ignore_ascii_case(needle)
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

fn rawtext_close_tag(name: &str) -> Option<&'static [u8]> {
    match name {
        "script" => Some(SCRIPT_CLOSE_TAG),
        "style" => Some(STYLE_CLOSE_TAG),
        _ => None,
    }
}

fn find_rawtext_close_tag(haystack: &str, close_tag: &[u8]) -> Option<(usize, usize)> {
    let hay_bytes = haystack.as_bytes();
    let len = hay_bytes.len();
    let n = close_tag.len();
    debug_assert!(close_tag.starts_with(b"</") && close_tag.is_ascii());
    let mut i = 0;
    while i + n <= len {
        let rel = memchr(b'<', &hay_bytes[i..])?;
        i += rel;
        if i + n > len {
            return None;
        }
        if starts_with_ignore_ascii_case_at(hay_bytes, i, close_tag) {
            let after = i + n;
            match hay_bytes.get(after) {
                None => return Some((i, len)),
                Some(&b) if b.is_ascii_whitespace() || b == b'/' || b == b'>' => {
                    // Attributes and junk on a close tag are ignored up to `>`.
                    let end = memchr(b'>', &hay_bytes[after..]).map_or(len, |rel| after + rel + 1);
                    return Some((i, end));
                }
                Some(_) => {}
            }
        }
        i += 1;
    }
    None
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Tokenize `input`, reporting every event to `sink`.
pub fn tokenize_into<S: TokenSink + ?Sized>(input: &str, sink: &mut S) {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    // Invariant: slice endpoints are only taken at ASCII structural bytes or
    // after ASCII-only runs, so they stay on UTF-8 char boundaries.
    while i < len {
        if bytes[i] != b'<' {
            let start = i;
            i = memchr(b'<', &bytes[i..]).map_or(len, |rel| i + rel);
            emit_text(&input[start..i], sink);
            continue;
        }
        i = match bytes.get(i + 1) {
            Some(b'!') => scan_markup_declaration(input, i, sink),
            Some(b'?') => scan_processing_instruction(input, i, sink),
            Some(b'/') => scan_end_tag(input, i, sink),
            Some(b) if b.is_ascii_alphabetic() => scan_start_tag(input, i, sink),
            _ => {
                sink.text("<");
                i + 1
            }
        };
    }
}

/// Tokenize `input` into owned tokens.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    tokenize_into(input, &mut tokens);
    tokens
}

/// Report `text`, splitting out `;`-terminated character references.
fn emit_text<S: TokenSink + ?Sized>(text: &str, sink: &mut S) {
    let bytes = text.as_bytes();
    let mut copy_start = 0;
    let mut i = 0;
    while let Some(rel) = memchr(b'&', &bytes[i..]) {
        let amp = i + rel;
        let Some(reference) = scan_reference(bytes, amp).filter(|r| r.terminated) else {
            i = amp + 1;
            continue;
        };
        if copy_start < amp {
            sink.text(&text[copy_start..amp]);
        }
        let body = &text[reference.body.clone()];
        match reference.kind {
            ReferenceKind::Named => sink.entity_ref(body),
            ReferenceKind::Numeric { .. } => sink.char_ref(body),
        }
        i = reference.end;
        copy_start = i;
    }
    if copy_start < bytes.len() {
        sink.text(&text[copy_start..]);
    }
}

/// `<!--comment-->`, `<!DOCTYPE ...>` or a bogus `<!...>` comment.
fn scan_markup_declaration<S: TokenSink + ?Sized>(input: &str, i: usize, sink: &mut S) -> usize {
    let bytes = input.as_bytes();
    if input[i..].starts_with(HTML_COMMENT_START) {
        let body_start = i + HTML_COMMENT_START.len();
        // Scan for the terminator once per comment (linear in comment length).
        return match input[body_start..].find(HTML_COMMENT_END) {
            Some(rel) => {
                trace_event!("comment at {i}");
                sink.comment(&input[body_start..body_start + rel]);
                body_start + rel + HTML_COMMENT_END.len()
            }
            None => {
                sink.comment(&input[body_start..]);
                input.len()
            }
        };
    }
    let body_start = i + 2;
    let end = memchr(b'>', &bytes[body_start..]).map(|rel| body_start + rel);
    if bytes.get(body_start).is_some_and(u8::is_ascii_alphabetic) {
        // An unterminated declaration cannot be completed; drop it.
        let Some(end) = end else {
            return input.len();
        };
        trace_event!("declaration at {i}");
        sink.declaration(&input[body_start..end]);
        return end + 1;
    }
    bogus_comment(input, body_start, end, sink)
}

fn bogus_comment<S: TokenSink + ?Sized>(
    input: &str,
    body_start: usize,
    end: Option<usize>,
    sink: &mut S,
) -> usize {
    match end {
        Some(end) => {
            sink.comment(&input[body_start..end]);
            end + 1
        }
        None => {
            sink.comment(&input[body_start..]);
            input.len()
        }
    }
}

fn scan_processing_instruction<S: TokenSink + ?Sized>(
    input: &str,
    i: usize,
    sink: &mut S,
) -> usize {
    let body_start = i + 2;
    match memchr(b'>', &input.as_bytes()[body_start..]) {
        Some(rel) => {
            sink.processing_instruction(&input[body_start..body_start + rel]);
            body_start + rel + 1
        }
        None => input.len(),
    }
}

fn scan_end_tag<S: TokenSink + ?Sized>(input: &str, i: usize, sink: &mut S) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let start = i + 2;
    let end = memchr(b'>', &bytes[start..]).map(|rel| start + rel);
    match bytes.get(start) {
        None => {
            sink.text("</");
            len
        }
        Some(b'>') => start + 1,
        Some(b) if b.is_ascii_alphabetic() => {
            let mut j = start;
            while j < len && is_name_char(bytes[j]) {
                j += 1;
            }
            let Some(end) = end else {
                return len;
            };
            let name = input[start..j].to_ascii_lowercase();
            trace_event!("end tag {name} at {i}");
            sink.end_tag(&name);
            end + 1
        }
        Some(_) => bogus_comment(input, start, end, sink),
    }
}

fn scan_start_tag<S: TokenSink + ?Sized>(input: &str, i: usize, sink: &mut S) -> usize {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let start = i + 1;
    let mut j = start;
    while j < len && is_name_char(bytes[j]) {
        j += 1;
    }
    let name = input[start..j].to_ascii_lowercase();

    let mut k = j;
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut self_closing = false;
    let mut closed = false;

    let skip_whitespace = |k: &mut usize| {
        while *k < len && bytes[*k].is_ascii_whitespace() {
            *k += 1;
        }
    };

    while k < len {
        skip_whitespace(&mut k);
        if k >= len {
            break;
        }
        if bytes[k] == b'>' {
            k += 1;
            closed = true;
            break;
        }
        if bytes[k] == b'/' {
            if k + 1 < len && bytes[k + 1] == b'>' {
                self_closing = true;
                closed = true;
                k += 2;
                break;
            }
            k += 1;
            continue;
        }
        let name_start = k;
        while k < len && is_name_char(bytes[k]) {
            k += 1;
        }
        if name_start == k {
            // Junk byte; step over the whole char to stay on a boundary.
            k += input[k..].chars().next().map_or(1, char::len_utf8);
            continue;
        }
        let attribute_name = input[name_start..k].to_ascii_lowercase();

        skip_whitespace(&mut k);
        let value = if k < len && bytes[k] == b'=' {
            k += 1;
            skip_whitespace(&mut k);
            if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                let quote = bytes[k];
                k += 1;
                let vstart = k;
                k = memchr(quote, &bytes[k..]).map_or(len, |rel| k + rel);
                let raw = &input[vstart..k];
                if k < len {
                    k += 1;
                }
                Some(crate::decode_entities(raw))
            } else {
                let vstart = k;
                while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                    if bytes[k] == b'/' && k + 1 < len && bytes[k + 1] == b'>' {
                        break;
                    }
                    k += 1;
                }
                Some(crate::decode_entities(&input[vstart..k]))
            }
        } else {
            None
        };
        attributes.push(Attribute {
            name: attribute_name,
            value,
        });
    }

    if !closed {
        // End of input inside the tag: nothing after `<` was ever markup a
        // browser would act on, so the whole tag is dropped.
        trace_event!("unterminated start tag {name} at {i} dropped");
        return len;
    }

    let close_tag = rawtext_close_tag(&name);
    if close_tag.is_some() {
        // Raw text elements ignore the self-closing flag.
        self_closing = false;
    } else if is_void_element(&name) {
        self_closing = true;
    }
    trace_event!("start tag {name} at {i}");
    sink.start_tag(&name, &attributes, self_closing);

    let Some(close_tag) = close_tag else {
        return k;
    };
    match find_rawtext_close_tag(&input[k..], close_tag) {
        Some((rel_start, rel_end)) => {
            let raw = &input[k..k + rel_start];
            if !raw.is_empty() {
                sink.text(raw);
            }
            sink.end_tag(&name);
            k + rel_end
        }
        None => {
            // A missing close tag implicitly closes at end of input and the
            // remainder is raw text.
            let raw = &input[k..];
            if !raw.is_empty() {
                sink.text(raw);
            }
            sink.end_tag(&name);
            len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(feature = "perf-tests")]
    use std::time::{Duration, Instant};

    fn start(name: &str, attributes: &[(&str, Option<&str>)]) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| Attribute::new(*k, *v))
                .collect(),
            self_closing: false,
        }
    }

    fn end(name: &str) -> Token {
        Token::EndTag(name.to_string())
    }

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn tokenize_preserves_utf8_text() {
        let tokens = tokenize("<p>120×32</p>");
        assert_eq!(tokens, vec![start("p", &[]), text("120×32"), end("p")]);
    }

    #[test]
    fn tokenize_lowercases_tag_and_attribute_names() {
        let tokens = tokenize("<DiV ID=one>x</DIV>");
        assert_eq!(
            tokens,
            vec![start("div", &[("id", Some("one"))]), text("x"), end("div")]
        );
    }

    #[test]
    fn tokenize_reports_doctype_as_declaration() {
        let tokens = tokenize("<!DoCtYpE html>");
        assert_eq!(tokens, vec![Token::Declaration("DoCtYpE html".to_string())]);
    }

    #[test]
    fn tokenize_splits_references_out_of_text() {
        let tokens = tokenize("a &amp; b &#60; c &#x3c; AT&T");
        assert_eq!(
            tokens,
            vec![
                text("a "),
                Token::EntityRef("amp".to_string()),
                text(" b "),
                Token::CharRef("60".to_string()),
                text(" c "),
                Token::CharRef("x3c".to_string()),
                text(" AT&T"),
            ]
        );
    }

    #[test]
    fn tokenize_decodes_attribute_values() {
        let tokens = tokenize(r#"<a href="java&#115;cript&colon;x" title='a &amp; b'>"#);
        assert_eq!(
            tokens,
            vec![start(
                "a",
                &[("href", Some("javascript:x")), ("title", Some("a & b"))]
            )]
        );
    }

    #[test]
    fn tokenize_keeps_bare_and_empty_attributes_apart() {
        let tokens = tokenize(r#"<input disabled value="">"#);
        assert!(matches!(
            tokens.as_slice(),
            [Token::StartTag { name, attributes, self_closing: true }]
                if name == "input"
                    && attributes == &vec![
                        Attribute::new("disabled", None),
                        Attribute::new("value", Some("")),
                    ]
        ));
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let tokens = tokenize("1 < 2 <= 3 <");
        assert_eq!(tokens, vec![text("1 < 2 <= 3 <")]);
    }

    #[test]
    fn script_body_is_raw_text() {
        let tokens = tokenize("<script>if (a<b) { x = '<p>'; }</ScRiPt >after");
        assert_eq!(
            tokens,
            vec![
                start("script", &[]),
                text("if (a<b) { x = '<p>'; }"),
                end("script"),
                text("after"),
            ]
        );
    }

    #[test]
    fn self_closing_script_still_opens_raw_text() {
        let tokens = tokenize("<script/>alert(1)</script>");
        assert_eq!(
            tokens,
            vec![start("script", &[]), text("alert(1)"), end("script")]
        );
    }

    #[test]
    fn rawtext_without_close_tag_runs_to_end() {
        let tokens = tokenize("<style>body{}<p>x");
        assert_eq!(
            tokens,
            vec![start("style", &[]), text("body{}<p>x"), end("style")]
        );
    }

    #[test]
    fn rawtext_close_tag_does_not_accept_near_matches() {
        let tokens = tokenize("<script>ok</scriptx >no</script >");
        assert_eq!(
            tokens,
            vec![start("script", &[]), text("ok</scriptx >no"), end("script")]
        );
    }

    #[test]
    fn rawtext_close_tag_ignores_trailing_junk() {
        let tokens = tokenize("<style>p{}</style x><b>after</b>");
        assert_eq!(
            tokens,
            vec![
                start("style", &[]),
                text("p{}"),
                end("style"),
                start("b", &[]),
                text("after"),
                end("b"),
            ]
        );

        let tokens = tokenize("<style>p{}</style/><svg onload=alert(1)>");
        assert_eq!(
            tokens,
            vec![
                start("style", &[]),
                text("p{}"),
                end("style"),
                start("svg", &[("onload", Some("alert(1)"))]),
            ]
        );

        let tokens = tokenize("<script>x</SCRIPT\tfoo=\"a\">y");
        assert_eq!(tokens, vec![start("script", &[]), text("x"), end("script"), text("y")]);
    }

    #[test]
    fn rawtext_close_tag_at_end_of_input() {
        let tokens = tokenize("<style>p{}</style");
        assert_eq!(tokens, vec![start("style", &[]), text("p{}"), end("style")]);

        let tokens = tokenize("<style>p{}</style x");
        assert_eq!(tokens, vec![start("style", &[]), text("p{}"), end("style")]);
    }

    #[test]
    fn unterminated_start_tag_is_dropped() {
        let tokens = tokenize("before<img src=x onerror=alert(1)");
        assert_eq!(tokens, vec![text("before")]);
    }

    #[test]
    fn comments_and_bogus_comments() {
        let tokens = tokenize("<!--[if IE]><script>x</script><![endif]--><![CDATA[y]]></ 3>");
        assert_eq!(
            tokens,
            vec![
                Token::Comment("[if IE]><script>x</script><![endif]".to_string()),
                Token::Comment("[CDATA[y]]".to_string()),
                Token::Comment(" 3".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_comment_swallows_rest() {
        let tokens = tokenize("a<!-- <script>");
        assert_eq!(
            tokens,
            vec![text("a"), Token::Comment(" <script>".to_string())]
        );
    }

    #[test]
    fn processing_instruction_is_reported() {
        let tokens = tokenize("<?xml version=\"1.0\"?>x");
        assert_eq!(
            tokens,
            vec![
                Token::ProcessingInstruction("xml version=\"1.0\"?".to_string()),
                text("x"),
            ]
        );
    }

    #[test]
    fn junk_inside_start_tag_is_skipped_on_char_boundaries() {
        let tokens = tokenize("<p é=1 \"x\">ok</p>");
        assert!(matches!(
            tokens.first(),
            Some(Token::StartTag { name, .. }) if name == "p"
        ));
        assert!(tokens.contains(&text("ok")));
    }

    #[test]
    fn tokenize_allows_custom_element_and_namespaced_tags() {
        let tokens = tokenize("<my-component></my-component><svg:rect></svg:rect>");
        assert_eq!(
            tokens,
            vec![
                start("my-component", &[]),
                end("my-component"),
                start("svg:rect", &[]),
                end("svg:rect"),
            ]
        );
    }

    #[test]
    fn tokenize_handles_many_simple_tags_linearly() {
        let input = "<a></a>".repeat(20_000);
        assert_eq!(tokenize(&input).len(), 40_000);
    }

    #[test]
    fn tokenize_handles_dense_near_match_rawtext_body() {
        let body = "</scripX>".repeat(50_000);
        let input = format!("<script>{body}</ScRiPt>");
        let tokens = tokenize(&input);
        assert!(matches!(
            tokens.as_slice(),
            [Token::StartTag { .. }, Token::Text(t), Token::EndTag(_)] if *t == body
        ));
    }

    #[test]
    fn tokenize_handles_tons_of_angle_brackets() {
        let input = "<".repeat(200_000);
        let tokens = tokenize(&input);
        assert_eq!(tokens, vec![Token::Text(input)]);
    }

    #[cfg(feature = "perf-tests")]
    #[test]
    fn tokenize_scales_roughly_linearly_on_repeated_tags() {
        fn measure_total(input: &str) -> Duration {
            let _ = tokenize(input);
            let mut total = Duration::ZERO;
            for _ in 0..5 {
                let start = Instant::now();
                let _ = tokenize(input);
                total += start.elapsed();
            }
            total
        }

        let small = "<a href=x>t</a>".repeat(5_000);
        let large = "<a href=x>t</a>".repeat(20_000);

        let t_small = measure_total(&small);
        let t_large = measure_total(&large);
        assert!(!t_small.is_zero(), "timer resolution too coarse for test");
        // Generous slack; this only catches quadratic regressions.
        assert!(
            t_large <= t_small.saturating_mul(12),
            "expected near-linear scaling; t_small={t_small:?} t_large={t_large:?}"
        );
    }
}
