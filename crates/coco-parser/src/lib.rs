//! LALRPOP-based parser for Controller Code
//!
//! The logos lexer feeds a LALRPOP grammar (`coco.lalrpop`). Newlines end
//! statements, so a final newline is implied when the input lacks one.

#![allow(clippy::all, clippy::pedantic, clippy::nursery)]

use coco_ast::{CocoError, Program, SourceMap, Span};
use coco_lexer::{Lexer, SpannedToken, Token};
use lalrpop_util::ParseError;

// Include the generated LALRPOP parser
lalrpop_util::lalrpop_mod!(pub coco);

pub mod literal;

use literal::LiteralError;

pub struct Parser {
    input: String,
    source_map: SourceMap,
    filename: String,
    tokens: Vec<SpannedToken>,
}

impl Parser {
    /// Create a new parser for the given input
    ///
    /// # Errors
    ///
    /// Returns `CocoError` if there are lexical errors in the input
    pub fn new(input: &str) -> Result<Self, CocoError> {
        Self::new_with_filename(input, "<input>")
    }

    /// Create a new parser for the given input with a filename
    ///
    /// # Errors
    ///
    /// Returns `CocoError` if there are lexical errors in the input
    pub fn new_with_filename(input: &str, filename: &str) -> Result<Self, CocoError> {
        let source_map = SourceMap::new(input);

        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize();

        if let Some(token) = tokens.iter().find(|token| token.token == Token::Error) {
            return Err(CocoError::syntax(
                format!("Unexpected character: {}", token.text),
                token.span,
                &source_map,
                filename,
            ));
        }

        Ok(Self {
            input: input.to_string(),
            source_map,
            filename: filename.to_string(),
            tokens,
        })
    }

    /// Parse the input into a program AST
    ///
    /// # Errors
    ///
    /// Returns `CocoError` if there are syntax errors during parsing
    pub fn parse(&self) -> Result<Program, CocoError> {
        let mut tokens: Vec<SpannedToken> = self
            .tokens
            .iter()
            .filter(|token| token.token != Token::Eof)
            .cloned()
            .collect();

        if tokens.last().is_some_and(|token| token.token != Token::Newline) {
            let end = self.input.len();
            tokens.push(SpannedToken {
                token: Token::Newline,
                span: Span::new(end, end),
                text: String::new(),
            });
        }

        let lalrpop_tokens = tokens.into_iter().map(|token| {
            let span = token.span;
            Ok::<_, LiteralError>((span.start, token, span.end))
        });

        coco::ProgramParser::new()
            .parse(lalrpop_tokens)
            .map_err(|err| self.convert_error(err))
    }

    fn convert_error(&self, err: ParseError<usize, SpannedToken, LiteralError>) -> CocoError {
        let (message, span) = match err {
            ParseError::InvalidToken { location } => {
                ("Invalid token".to_string(), Span::new(location, location))
            }
            ParseError::UnrecognizedEof { location, expected } => (
                format!("Unexpected end of input{}", expected_list(&expected)),
                Span::new(location, location),
            ),
            ParseError::UnrecognizedToken {
                token: (start, token, end),
                expected,
            } => (
                format!("Unexpected {}{}", describe(&token), expected_list(&expected)),
                Span::new(start, end),
            ),
            ParseError::ExtraToken {
                token: (start, token, end),
            } => (format!("Unexpected {}", describe(&token)), Span::new(start, end)),
            ParseError::User { error } => (error.message, error.span),
        };
        CocoError::syntax(message, span, &self.source_map, &self.filename)
    }

    /// Get access to the source map for error reporting
    #[must_use]
    pub const fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Get access to the filename
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Get access to the tokens (useful for debugging)
    #[must_use]
    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }
}

fn describe(token: &SpannedToken) -> String {
    if token.token == Token::Newline {
        "end of line".to_string()
    } else {
        format!("`{}`", token.text)
    }
}

fn expected_list(expected: &[String]) -> String {
    if expected.is_empty() {
        String::new()
    } else {
        format!(", expected one of: {}", expected.join(", "))
    }
}
