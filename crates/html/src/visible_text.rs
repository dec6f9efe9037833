use crate::decode_entities;
use crate::sink::TokenSink;
use crate::tokenizer::tokenize_into;
use crate::types::Attribute;

fn is_hidden_container(name: &str) -> bool {
    matches!(name, "script" | "style" | "head" | "title")
}

#[derive(Default)]
struct VisibleText {
    hidden: Vec<String>,
    piece: String,
    pieces: Vec<String>,
}

impl VisibleText {
    fn flush(&mut self) {
        let trimmed = self.piece.trim();
        if !trimmed.is_empty() {
            self.pieces.push(trimmed.to_string());
        }
        self.piece.clear();
    }
}

impl TokenSink for VisibleText {
    fn start_tag(&mut self, name: &str, _attributes: &[Attribute], self_closing: bool) {
        self.flush();
        if name == "body" {
            // `<body>` implies the head is over, closed or not.
            self.hidden.clear();
        } else if is_hidden_container(name) && !self_closing {
            self.hidden.push(name.to_string());
        }
    }

    fn end_tag(&mut self, name: &str) {
        self.flush();
        if let Some(pos) = self.hidden.iter().rposition(|open| open == name) {
            self.hidden.truncate(pos);
        }
    }

    fn text(&mut self, text: &str) {
        if self.hidden.is_empty() {
            self.piece.push_str(&decode_entities(text));
        }
    }

    fn entity_ref(&mut self, name: &str) {
        if self.hidden.is_empty() {
            self.piece.push_str(&decode_entities(&format!("&{name};")));
        }
    }

    fn char_ref(&mut self, reference: &str) {
        if self.hidden.is_empty() {
            self.piece.push_str(&decode_entities(&format!("&#{reference};")));
        }
    }

    fn comment(&mut self, _text: &str) {
        self.flush();
    }

    fn declaration(&mut self, _text: &str) {}
}

/// Extracts the text a reader would see.
///
/// - Skips text inside `script`, `style`, `head` and `title`, and comments.
/// - Each run of text between two tags is decoded and trimmed; non-empty runs
///   are joined with `\n`.
pub fn extract_text(html: &str) -> String {
    let mut sink = VisibleText::default();
    tokenize_into(html, &mut sink);
    sink.flush();
    sink.pieces.join("\n")
}
