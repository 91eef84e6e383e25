//! Hand-written scanning loop over raw source bytes.
//!
//! Lexical errors (unexpected characters, a lone `&`/`|` that was probably
//! meant to be `&&`/`||`) are recoverable: the lexer reports and keeps
//! scanning so the rest of the pipeline can still surface other diagnostics
//! in the same run (spec §7 propagation policy).

use std::rc::Rc;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use lync_common::{DiagnosticSink, LineMap, Span, Stage};

use crate::token::{Token, TokenKind};

static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    let mut m = FxHashMap::default();
    m.insert("def", Def);
    m.insert("return", Return);
    m.insert("if", If);
    m.insert("else", Else);
    m.insert("while", While);
    m.insert("do", Do);
    m.insert("for", For);
    m.insert("match", Match);
    m.insert("some", Some);
    m.insert("free", Free);
    m.insert("alloc", Alloc);
    m.insert("using", Using);
    m.insert("const", Const);
    m.insert("own", Own);
    m.insert("ref", Ref);
    m.insert("true", True);
    m.insert("false", False);
    m.insert("null", Null);
    m.insert("int", KwInt);
    m.insert("bool", KwBool);
    m.insert("str", KwStr);
    m.insert("char", KwChar);
    m.insert("void", KwVoid);
    m
});

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    file: Rc<str>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(file: Rc<str>, src: &'a str) -> Self {
        Lexer { src: src.as_bytes(), pos: 0, file }
    }

    #[must_use]
    pub fn line_map(source: &str, file: Rc<str>) -> LineMap {
        LineMap::build(file, source)
    }

    pub fn tokenize(mut self, diags: &mut DiagnosticSink, line_map: &LineMap) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.pos as u32;
            let Some(c) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, Span::at(start)));
                break;
            };
            let kind = match c {
                b'(' => { self.bump(); TokenKind::LParen }
                b')' => { self.bump(); TokenKind::RParen }
                b'{' => { self.bump(); TokenKind::LBrace }
                b'}' => { self.bump(); TokenKind::RBrace }
                b'[' => { self.bump(); TokenKind::LBracket }
                b']' => { self.bump(); TokenKind::RBracket }
                b',' => { self.bump(); TokenKind::Comma }
                b';' => { self.bump(); TokenKind::Semicolon }
                b':' => { self.bump(); TokenKind::Colon }
                b'?' => { self.bump(); TokenKind::Question }
                b'+' => { self.bump(); TokenKind::Plus }
                b'-' => {
                    self.bump();
                    if self.peek() == Some(b'>') {
                        self.bump();
                        TokenKind::Arrow
                    } else {
                        TokenKind::Minus
                    }
                }
                b'*' => { self.bump(); TokenKind::Star }
                b'/' => { self.bump(); TokenKind::Slash }
                b'.' => {
                    self.bump();
                    if self.peek() == Some(b'.') {
                        self.bump();
                        if self.peek() == Some(b'=') {
                            self.bump();
                            TokenKind::DotDotEq
                        } else {
                            self.error(diags, line_map, start, "unexpected '..' (expected '..=')");
                            TokenKind::DotDotEq
                        }
                    } else {
                        TokenKind::Dot
                    }
                }
                b'!' => {
                    self.bump();
                    if self.peek() == Some(b'=') {
                        self.bump();
                        TokenKind::BangEq
                    } else {
                        TokenKind::Bang
                    }
                }
                b'=' => {
                    self.bump();
                    if self.peek() == Some(b'=') {
                        self.bump();
                        TokenKind::EqEq
                    } else {
                        TokenKind::Eq
                    }
                }
                b'<' => {
                    self.bump();
                    if self.peek() == Some(b'=') {
                        self.bump();
                        TokenKind::LtEq
                    } else {
                        TokenKind::Lt
                    }
                }
                b'>' => {
                    self.bump();
                    if self.peek() == Some(b'=') {
                        self.bump();
                        TokenKind::GtEq
                    } else {
                        TokenKind::Gt
                    }
                }
                b'&' => {
                    self.bump();
                    if self.peek() == Some(b'&') {
                        self.bump();
                        TokenKind::AmpAmp
                    } else {
                        self.error(
                            diags,
                            line_map,
                            start,
                            "single '&' is not an operator; did you mean '&&'?",
                        );
                        continue;
                    }
                }
                b'|' => {
                    self.bump();
                    if self.peek() == Some(b'|') {
                        self.bump();
                        TokenKind::PipePipe
                    } else {
                        self.error(
                            diags,
                            line_map,
                            start,
                            "single '|' is not an operator; did you mean '||'?",
                        );
                        continue;
                    }
                }
                b'"' => self.scan_string(diags, line_map, start),
                b'\'' => self.scan_char(diags, line_map, start),
                b'_' if !self.is_ident_cont_at(self.pos + 1) => {
                    self.bump();
                    TokenKind::Underscore
                }
                c if c.is_ascii_digit() => self.scan_number(),
                c if c.is_ascii_alphabetic() || c == b'_' => self.scan_ident(),
                _ => {
                    self.bump();
                    self.error(diags, line_map, start, format!("unexpected character '{}'", c as char));
                    continue;
                }
            };
            let end = self.pos as u32;
            tokens.push(Token::new(kind, Span::new(start, end)));
        }
        tokens
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn is_ident_cont_at(&self, idx: usize) -> bool {
        matches!(self.src.get(idx), Some(c) if c.is_ascii_alphanumeric() || *c == b'_')
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_ident(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == b'_') {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        KEYWORDS.get(text).cloned().unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap();
        TokenKind::IntLiteral(text.parse().unwrap_or(0))
    }

    fn scan_string(&mut self, diags: &mut DiagnosticSink, line_map: &LineMap, start: u32) -> TokenKind {
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            match self.bump() {
                None | Some(b'\n') => {
                    self.error(diags, line_map, start, "unterminated string literal");
                    break;
                }
                Some(b'"') => break,
                Some(b'\\') => match self.bump() {
                    Some(b'n') => s.push('\n'),
                    Some(b't') => s.push('\t'),
                    Some(b'"') => s.push('"'),
                    Some(b'\\') => s.push('\\'),
                    Some(other) => s.push(other as char),
                    None => break,
                },
                Some(c) => s.push(c as char),
            }
        }
        TokenKind::StringLiteral(s)
    }

    fn scan_char(&mut self, diags: &mut DiagnosticSink, line_map: &LineMap, start: u32) -> TokenKind {
        self.bump(); // opening quote
        let c = match self.bump() {
            Some(b'\\') => match self.bump() {
                Some(b'n') => '\n',
                Some(b't') => '\t',
                Some(b'\'') => '\'',
                Some(b'\\') => '\\',
                Some(other) => other as char,
                None => '\0',
            },
            Some(c) => c as char,
            None => '\0',
        };
        if self.peek() == Some(b'\'') {
            self.bump();
        } else {
            self.error(diags, line_map, start, "unterminated char literal");
        }
        TokenKind::CharLiteral(c)
    }

    fn error(&self, diags: &mut DiagnosticSink, line_map: &LineMap, start: u32, msg: impl Into<String>) {
        let loc = line_map.location(start);
        diags.error(Stage::Lexer, loc, msg.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> (Vec<Token>, DiagnosticSink) {
        let file: Rc<str> = Rc::from("t.lync");
        let line_map = Lexer::line_map(src, file.clone());
        let mut diags = DiagnosticSink::new(20, false);
        let tokens = Lexer::new(file, src).tokenize(&mut diags, &line_map);
        (tokens, diags)
    }

    #[test]
    fn tokenizes_keywords_and_identifiers() {
        let (tokens, diags) = lex("def main(): int { return 0; }");
        assert!(!diags.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::Def);
        assert_eq!(tokens[1].kind, TokenKind::Ident("main".into()));
    }

    #[test]
    fn single_ampersand_is_lexical_error() {
        let (_tokens, diags) = lex("a & b");
        assert!(diags.has_errors());
    }

    #[test]
    fn double_ampersand_is_fine() {
        let (_tokens, diags) = lex("a && b");
        assert!(!diags.has_errors());
    }

    #[test]
    fn range_operator() {
        let (tokens, diags) = lex("0..=9");
        assert!(!diags.has_errors());
        assert_eq!(tokens[1].kind, TokenKind::DotDotEq);
    }

    #[test]
    fn string_and_char_literals() {
        let (tokens, diags) = lex("\"hi\\n\" 'a'");
        assert!(!diags.has_errors());
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral("hi\n".into()));
        assert_eq!(tokens[1].kind, TokenKind::CharLiteral('a'));
    }
}
