//! Callback surface of the tokenizer.
//!
//! The tokenizer never fails: every byte of input ends up in exactly one
//! callback, or is discarded when it belongs to markup that cannot be
//! completed (an unterminated start tag at end of input, for example).

use crate::types::{Attribute, Token};

pub trait TokenSink {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], self_closing: bool);

    fn end_tag(&mut self, name: &str);

    /// Raw character data. References are split out into `entity_ref` and
    /// `char_ref`; everything else is passed through undecoded.
    fn text(&mut self, text: &str);

    /// `&name;`, called with `name`.
    fn entity_ref(&mut self, name: &str);

    /// `&#123;` or `&#x7B;`, called with `123` or `x7B`.
    fn char_ref(&mut self, reference: &str);

    fn comment(&mut self, _text: &str) {}

    /// `<!DOCTYPE html>`, called with `DOCTYPE html`.
    fn declaration(&mut self, text: &str);

    fn processing_instruction(&mut self, _text: &str) {}
}

impl TokenSink for Vec<Token> {
    fn start_tag(&mut self, name: &str, attributes: &[Attribute], self_closing: bool) {
        self.push(Token::StartTag {
            name: name.to_string(),
            attributes: attributes.to_vec(),
            self_closing,
        });
    }

    fn end_tag(&mut self, name: &str) {
        self.push(Token::EndTag(name.to_string()));
    }

    fn text(&mut self, text: &str) {
        // Adjacent text callbacks collapse into one token.
        if let Some(Token::Text(last)) = self.last_mut() {
            last.push_str(text);
        } else {
            self.push(Token::Text(text.to_string()));
        }
    }

    fn entity_ref(&mut self, name: &str) {
        self.push(Token::EntityRef(name.to_string()));
    }

    fn char_ref(&mut self, reference: &str) {
        self.push(Token::CharRef(reference.to_string()));
    }

    fn comment(&mut self, text: &str) {
        self.push(Token::Comment(text.to_string()));
    }

    fn declaration(&mut self, text: &str) {
        self.push(Token::Declaration(text.to_string()));
    }

    fn processing_instruction(&mut self, text: &str) {
        self.push(Token::ProcessingInstruction(text.to_string()));
    }
}
