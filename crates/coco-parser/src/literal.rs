//! Literal decoding for Controller Code
//!
//! Turns the raw text of integer and string tokens into values. Failures are
//! reported as `LiteralError` so the grammar can hand them back through
//! `ParseError::User` with the literal's location.

use coco_ast::Span;

/// A literal that lexed fine but does not denote a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub message: String,
    pub span: Span,
}

impl LiteralError {
    #[must_use]
    pub const fn new(message: String, span: Span) -> Self {
        Self { message, span }
    }
}

/// Decode a decimal integer literal into a 32-bit value
///
/// # Errors
///
/// Returns `LiteralError` when the literal does not fit in an `i32`
pub fn integer(text: &str, span: Span) -> Result<i32, LiteralError> {
    text.parse::<i32>().map_err(|_| {
        LiteralError::new(format!("integer literal {text} does not fit in 32 bits"), span)
    })
}

/// Remove the surrounding double quotes and resolve escape sequences
///
/// Supported escapes: `\"`, `\\`, `\n` and `\t`.
///
/// # Errors
///
/// Returns `LiteralError` for unknown escapes or a literal that is not quoted
pub fn unquote(text: &str, span: Span) -> Result<String, LiteralError> {
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| LiteralError::new(format!("malformed string literal {text}"), span))?;

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some('\\') => result.push('\\'),
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some(other) => {
                return Err(LiteralError::new(
                    format!("unknown escape sequence \\{other}"),
                    span,
                ));
            }
            None => {
                return Err(LiteralError::new(
                    "string literal ends with a lone backslash".to_string(),
                    span,
                ));
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_literals() {
        assert_eq!(integer("15", Span::dummy()), Ok(15));
        assert_eq!(integer("2147483647", Span::dummy()), Ok(i32::MAX));

        let err = integer("2147483648", Span::new(3, 13)).unwrap_err();
        assert!(err.message.contains("2147483648"));
        assert_eq!(err.span, Span::new(3, 13));
    }

    #[test]
    fn test_unquote_plain() {
        assert_eq!(unquote(r#""hello world""#, Span::dummy()).unwrap(), "hello world");
        assert_eq!(unquote(r#""""#, Span::dummy()).unwrap(), "");
    }

    #[test]
    fn test_unquote_escapes() {
        let text = r#""say \"hi\"\n\tand \\ bye""#;
        assert_eq!(unquote(text, Span::dummy()).unwrap(), "say \"hi\"\n\tand \\ bye");
    }

    #[test]
    fn test_unquote_rejects_unknown_escape() {
        let err = unquote(r#""bad \q""#, Span::new(0, 8)).unwrap_err();
        assert_eq!(err.message, "unknown escape sequence \\q");
    }

    #[test]
    fn test_unquote_requires_quotes() {
        assert!(unquote("bare", Span::dummy()).is_err());
        assert!(unquote("\"", Span::dummy()).is_err());
    }
}
