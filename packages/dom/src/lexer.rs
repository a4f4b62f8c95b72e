//! Markup tokenizer using logos
//!
//! Tokens are whole constructs (an opening tag with all its attributes, a
//! closing tag, a run of text). Raw-text elements such as `<script>` are
//! handled by the parser, which drives the lexer directly.

use logos::{Lexer, Logos};

/// Top-level markup tokens
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    #[token("<!--", lex_comment)]
    Comment(&'src str),

    #[regex(r"<![a-zA-Z\[][^>]*>", |lex| lex.slice())]
    Declaration(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:_-]*[ \t\r\n]*>", |lex| lex.slice())]
    CloseTag(&'src str),

    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:_-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    OpenTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A `<` that does not start a tag, kept as text
    #[token("<")]
    Lt,
}

/// Consume up to and including the next `-->`, or to end of input
fn lex_comment<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let rest = lex.remainder();
    match rest.find("-->") {
        Some(end) => lex.bump(end + 3),
        None => lex.bump(rest.len()),
    }
    lex.slice()
}

/// Tokens inside an opening tag, after the tag name
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum AttrToken<'src> {
    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    DoubleQuoted(&'src str),

    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    SingleQuoted(&'src str),

    #[regex(r#"[^ \t\r\n="'>]+"#, |lex| lex.slice())]
    Bare(&'src str),
}

/// Split an opening tag slice (`<div class="a">`) into name, attribute text
/// and the self-closing flag
pub(crate) fn split_open_tag(slice: &str) -> (&str, &str, bool) {
    let inner = &slice[1..slice.len() - 1];
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (inner, false),
    };
    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(inner.len());
    (&inner[..name_end], &inner[name_end..], self_closing)
}

/// Name of a closing tag slice (`</div >` → `div`)
pub(crate) fn close_tag_name(slice: &str) -> &str {
    slice[2..slice.len() - 1].trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        Token::lexer(source).filter_map(Result::ok).collect()
    }

    #[test]
    fn test_lex_tags_and_text() {
        assert_eq!(
            tokens("<p class=\"a\">Hi</p>"),
            vec![
                Token::OpenTag("<p class=\"a\">"),
                Token::Text("Hi"),
                Token::CloseTag("</p>"),
            ]
        );
    }

    #[test]
    fn test_lex_comment_with_angle_brackets() {
        assert_eq!(
            tokens("<!-- a > b -->x"),
            vec![Token::Comment("<!-- a > b -->"), Token::Text("x")]
        );
    }

    #[test]
    fn test_lex_quoted_angle_bracket_in_attribute() {
        assert_eq!(
            tokens("<a title='1 > 0'>"),
            vec![Token::OpenTag("<a title='1 > 0'>")]
        );
    }

    #[test]
    fn test_lex_stray_less_than() {
        assert_eq!(
            tokens("a < b"),
            vec![Token::Text("a "), Token::Lt, Token::Text(" b")]
        );
    }

    #[test]
    fn test_lex_doctype() {
        assert_eq!(
            tokens("<!DOCTYPE html><html>"),
            vec![
                Token::Declaration("<!DOCTYPE html>"),
                Token::OpenTag("<html>"),
            ]
        );
    }

    #[test]
    fn test_split_open_tag() {
        assert_eq!(split_open_tag("<br/>"), ("br", "", true));
        assert_eq!(
            split_open_tag("<img src=\"x.png\" />"),
            ("img", " src=\"x.png\" ", true)
        );
        assert_eq!(split_open_tag("<div>"), ("div", "", false));
    }

    #[test]
    fn test_attr_tokens() {
        let toks: Vec<_> = AttrToken::lexer(" id=main data-x='1' hidden")
            .filter_map(Result::ok)
            .collect();
        assert_eq!(
            toks,
            vec![
                AttrToken::Bare("id"),
                AttrToken::Equals,
                AttrToken::Bare("main"),
                AttrToken::Bare("data-x"),
                AttrToken::Equals,
                AttrToken::SingleQuoted("1"),
                AttrToken::Bare("hidden"),
            ]
        );
    }
}
