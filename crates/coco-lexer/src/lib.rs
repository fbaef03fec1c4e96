//! Lexical analysis for Controller Code
//!
//! Statements are separated by newlines, so `Newline` is a real token.
//! Every other kind of whitespace and `#` comments are skipped.

use coco_ast::Span;
use logos::Logos;

/// Controller Code tokens
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Arithmetic operator words
    #[token("plus")]
    Plus,

    #[token("minus")]
    Minus,

    #[token("times")]
    Times,

    #[token("divide")]
    Divide,

    /// Assignment (=)
    #[token("=")]
    Assign,

    // Comparisons
    #[token("<")]
    Smaller,

    #[token(">")]
    Greater,

    /// Not equal (~)
    #[token("~")]
    NotEqual,

    /// Not smaller (~<)
    #[token("~<")]
    NotSmaller,

    /// Not greater (~>)
    #[token("~>")]
    NotGreater,

    /// Equal (~~)
    #[token("~~")]
    Equal,

    // Keywords
    #[token("input")]
    Input,

    #[token("print")]
    Print,

    #[token("function")]
    Function,

    #[token("if")]
    If,

    #[token("while")]
    While,

    #[token("start")]
    Start,

    #[token("end")]
    End,

    #[token("return")]
    Return,

    /// Decimal integer literal
    #[regex(r"[0-9]+")]
    Integer,

    /// Double quoted string literal, escapes are resolved by the parser
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    /// Variable or function name
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    Ident,

    /// Statement terminator
    #[token("\n")]
    Newline,

    /// Line comment (ignored)
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    /// Whitespace (ignored)
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Whitespace,

    /// End of input
    Eof,

    /// Lexer error
    Error,
}

/// Token with location information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
    pub text: String,
}

/// Lexer that produces tokens with spans
pub struct Lexer<'input> {
    lexer: logos::Lexer<'input, Token>,
    input: &'input str,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            lexer: Token::lexer(input),
            input,
        }
    }

    /// Get the next token with span information
    pub fn next_token(&mut self) -> SpannedToken {
        let token = match self.lexer.next() {
            Some(Ok(token)) => token,
            Some(Err(())) => Token::Error,
            None => {
                return SpannedToken {
                    token: Token::Eof,
                    span: Span::new(self.input.len(), self.input.len()),
                    text: String::new(),
                };
            }
        };
        let span = self.lexer.span();
        SpannedToken {
            token,
            span: Span::new(span.start, span.end),
            text: self.input[span].to_string(),
        }
    }

    /// Tokenize the entire input, always ending with `Eof`
    pub fn tokenize(&mut self) -> Vec<SpannedToken> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.token == Token::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
