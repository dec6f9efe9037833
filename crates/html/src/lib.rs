//! HTML tokenization for filters that need to see markup as events.
//!
//! [`tokenize_into`] drives a [`TokenSink`] with start tags, end tags, text,
//! character references, comments, declarations and processing
//! instructions. It accepts any input and never fails.

mod entities;
mod sink;
mod tokenizer;
mod types;
mod visible_text;

pub use crate::entities::decode_entities;
pub use crate::sink::TokenSink;
pub use crate::tokenizer::{tokenize, tokenize_into};
pub use crate::types::{Attribute, Token};
pub use crate::visible_text::extract_text;
