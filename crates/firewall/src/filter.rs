//! The per-call filter session.
//!
//! A `FilterSession` is a [`TokenSink`]: the tokenizer reports markup events
//! and the session appends the permitted part of each one to its output.
//! Nothing is ever balanced or re-nested; malformed input stays malformed,
//! but only whitelisted markup is written.

use std::borrow::Cow;
use std::collections::HashSet;

use html::{Attribute, TokenSink};

use crate::config::{OutputCharset, Whitelist};

const PRE: &str = "pre";
const HTML: &str = "html";

macro_rules! trace_filter {
    ($($arg:tt)*) => {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "firewall.filter", $($arg)*);
    };
}

/// Elements whose body the tokenizer reports as raw text.
fn is_rawtext_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

/// Markers that make an attribute value unsafe once whitespace is removed
/// and case folded. `script&#58;` is a colon hidden behind a reference.
const BYPASS_MARKERS: &[&str] = &["script:", "script&#58;", "<", "&lt;"];

/// Whether an attribute value tries to smuggle a script URI or markup past
/// the tag whitelist.
///
/// ```
/// use firewall::is_bypass_value;
///
/// assert!(is_bypass_value("javascript:alert(1)"));
/// assert!(is_bypass_value("java script : void(0)"));
/// assert!(is_bypass_value("x&lt;script&gt;"));
/// assert!(!is_bypass_value("https://example.com/"));
/// ```
pub fn is_bypass_value(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    BYPASS_MARKERS.iter().any(|marker| compact.contains(marker))
}

fn escape_attribute_value(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn ascii_only(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(char::is_ascii).collect())
    }
}

pub(crate) struct FilterSession<'w> {
    whitelist: &'w Whitelist,
    charset: OutputCharset,
    /// Open skipped tag. One level only: the first matching end tag ends it.
    skipping: Option<String>,
    preformatted: bool,
    output: String,
    last_start_tag: String,
    /// Cosmetic newline owed after the last tag, written before the next
    /// emission unless that emission already starts with one.
    pending_newline: bool,
    /// A stray `<` from text, held until the next emission shows whether
    /// it would start markup once the content between them was dropped.
    pending_lt: bool,
    /// Inside a permitted raw text element such as `style`.
    rawtext: bool,
    blocked_attributes: HashSet<String>,
    blocked_attribute_values: HashSet<String>,
}

impl<'w> FilterSession<'w> {
    pub(crate) fn new(whitelist: &'w Whitelist, charset: OutputCharset) -> Self {
        Self {
            whitelist,
            charset,
            skipping: None,
            preformatted: false,
            output: String::new(),
            last_start_tag: String::new(),
            pending_newline: false,
            pending_lt: false,
            rawtext: false,
            blocked_attributes: HashSet::new(),
            blocked_attribute_values: HashSet::new(),
        }
    }

    /// Start a new `</html>` segment. Skipping never carries across.
    pub(crate) fn begin_segment(&mut self) {
        self.rawtext = false;
        if let Some(tag) = self.skipping.take() {
            log::debug!(target: "firewall.filter", "skipped tag {tag} left open at segment end");
        }
    }

    pub(crate) fn finish(mut self) -> String {
        if self.pending_lt {
            self.output.push('<');
        }
        if self.pending_newline {
            self.output.push('\n');
        }
        self.output
    }

    fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.pending_lt {
            let starts_markup = text
                .bytes()
                .next()
                .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'));
            self.output.push_str(if starts_markup { "&lt;" } else { "<" });
            self.pending_lt = false;
        }
        if self.pending_newline {
            if !text.starts_with('\n') {
                self.output.push('\n');
            }
            self.pending_newline = false;
        }
        self.output.push_str(text);
    }

    fn hold_lt(&mut self) {
        // `<<` cannot start markup; the earlier one is plain text.
        if self.pending_lt {
            self.output.push('<');
        } else if self.pending_newline {
            self.output.push('\n');
            self.pending_newline = false;
        }
        self.pending_lt = true;
    }

    fn render_attribute(&mut self, attribute: &Attribute, out: &mut String) {
        let name = attribute.name.as_str();
        if self.whitelist.is_bad_attribute(name) {
            if self.blocked_attributes.insert(name.to_string()) {
                log::warn!(target: "firewall.filter", "blocked attribute {name}");
            }
            return;
        }
        if let Some(value) = attribute.value.as_deref()
            && is_bypass_value(value)
        {
            if self.blocked_attribute_values.insert(value.to_string()) {
                log::warn!(target: "firewall.filter", "blocked attribute value {value:?}");
            }
            return;
        }

        let (name, value) = match self.charset {
            OutputCharset::Utf8 => (
                Cow::Borrowed(name),
                attribute.value.as_deref().map(Cow::Borrowed),
            ),
            OutputCharset::Ascii => {
                let name = ascii_only(name);
                let value = attribute.value.as_deref().map(ascii_only);
                if matches!(name, Cow::Owned(_)) || matches!(value, Some(Cow::Owned(_))) {
                    log::debug!(
                        target: "firewall.filter",
                        "dropped non-ASCII characters from attribute {}",
                        attribute.name
                    );
                }
                (name, value)
            }
        };
        out.push(' ');
        out.push_str(&name);
        if let Some(value) = value {
            out.push_str("=\"");
            escape_attribute_value(&value, out);
            out.push('"');
        }
    }
}

impl TokenSink for FilterSession<'_> {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], self_closing: bool) {
        if self.skipping.is_some() {
            return;
        }
        if self.whitelist.is_skipped_tag(name) {
            // `<tag/>` opens and closes at once.
            if !self_closing {
                trace_filter!("start skipping {name}");
                self.skipping = Some(name.to_string());
            }
            return;
        }
        if !self.whitelist.is_good_tag(name) {
            trace_filter!("dropped tag {name}");
            return;
        }

        let mut tag = String::with_capacity(name.len() + 2);
        tag.push('<');
        tag.push_str(name);
        for attribute in attributes {
            self.render_attribute(attribute, &mut tag);
        }
        tag.push('>');
        self.emit(&tag);

        if name == PRE {
            self.preformatted = true;
        }
        if is_rawtext_element(name) && !self_closing {
            self.rawtext = true;
        }
        if self.last_start_tag != name && !self.preformatted {
            self.pending_newline = true;
        }
        self.last_start_tag.clear();
        self.last_start_tag.push_str(name);
    }

    fn end_tag(&mut self, name: &str) {
        if let Some(skipped) = &self.skipping {
            if skipped == name {
                trace_filter!("end skipping {name}");
                self.skipping = None;
            }
            return;
        }
        // The firewall appends the one `</html>` the output may carry.
        if name == HTML || !self.whitelist.is_good_tag(name) {
            return;
        }

        self.emit(&format!("</{name}>"));
        if name == PRE {
            self.preformatted = false;
        }
        if is_rawtext_element(name) {
            self.rawtext = false;
        }
        if !self.preformatted {
            self.pending_newline = true;
        }
    }

    fn text(&mut self, text: &str) {
        if self.skipping.is_some() {
            return;
        }
        if self.rawtext {
            // A body the tokenizer read as raw text must stay text for
            // whatever reads the output, whichever close tag it honors.
            self.emit(&text.replace('<', "&lt;"));
            return;
        }
        match text {
            "<" => self.hold_lt(),
            // Only left at the end of a segment; the next one must not
            // complete it into an end tag.
            "</" => {
                self.hold_lt();
                self.emit("/");
            }
            _ => self.emit(text),
        }
    }

    fn entity_ref(&mut self, name: &str) {
        if self.skipping.is_none() {
            self.emit(&format!("&{name};"));
        }
    }

    fn char_ref(&mut self, reference: &str) {
        if self.skipping.is_none() {
            self.emit(&format!("&#{reference};"));
        }
    }

    // Comments can hide conditional markup (`<!--[if IE]><script ...`) and
    // nothing here parses their contents, so every comment goes.
    fn comment(&mut self, _text: &str) {}

    fn declaration(&mut self, text: &str) {
        if self.skipping.is_some() {
            return;
        }
        if text.contains('<') {
            log::debug!(target: "firewall.filter", "dropped declaration containing markup");
            return;
        }
        self.emit(&format!("<!{text}>"));
    }
}
