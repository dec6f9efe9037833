#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Entity-decoded value; `None` for a bare attribute such as `disabled`.
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

/// Owned form of the events a [`crate::TokenSink`] receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Declaration(String),
    StartTag {
        name: String,
        attributes: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag(String),
    Text(String),
    EntityRef(String),
    CharRef(String),
    Comment(String),
    ProcessingInstruction(String),
}

impl Token {
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            Token::StartTag { .. } | Token::EndTag(_) | Token::Declaration(_)
        )
    }
}
