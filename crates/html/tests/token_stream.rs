use html::{Attribute, Token, extract_text, tokenize};

fn start(name: &str, attributes: Vec<Attribute>, self_closing: bool) -> Token {
    Token::StartTag {
        name: name.to_string(),
        attributes,
        self_closing,
    }
}

#[test]
fn page_tokenizes_into_expected_events() {
    let tokens = tokenize(
        "<!DOCTYPE html><HTML><body class=main>\
         <a HREF='/x?a=1&amp;b=2'>T&amp;C</a><br/><?xml v?><!-- c --></body></HTML>",
    );
    assert_eq!(
        tokens,
        vec![
            Token::Declaration("DOCTYPE html".to_string()),
            start("html", vec![], false),
            start("body", vec![Attribute::new("class", Some("main"))], false),
            start("a", vec![Attribute::new("href", Some("/x?a=1&b=2"))], false),
            Token::Text("T".to_string()),
            Token::EntityRef("amp".to_string()),
            Token::Text("C".to_string()),
            Token::EndTag("a".to_string()),
            start("br", vec![], true),
            Token::ProcessingInstruction("xml v?".to_string()),
            Token::Comment(" c ".to_string()),
            Token::EndTag("body".to_string()),
            Token::EndTag("html".to_string()),
        ]
    );
}

#[test]
fn markup_tokens_are_only_tags_and_declarations() {
    let tokens = tokenize("a<b>c</b><!--d--><!e>");
    let markup: Vec<_> = tokens.iter().filter(|t| t.is_markup()).collect();
    assert_eq!(markup.len(), 3);
}

#[test]
fn visible_text_of_a_page() {
    let page = "<html><head><title>Title</title><script>var x = '<p>';</script></head>\
                <body><h1>Heading</h1><p>First &amp; second</p>\
                <style>.a { color: red }</style><p>Last</p></body></html>";
    assert_eq!(extract_text(page), "Heading\nFirst & second\nLast");
}
