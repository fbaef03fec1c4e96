//! Abstract Syntax Tree definitions for Controller Code
//!
//! Every AST node preserves location information for error reporting.

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// Line and column position in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Convert byte span to line/column positions
#[derive(Debug, Clone)]
pub struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(pos + 1);
            }
        }
        Self { line_starts }
    }

    #[must_use]
    pub fn position(&self, byte_offset: usize) -> Position {
        match self.line_starts.binary_search(&byte_offset) {
            Ok(line) => Position::new(line + 1, 1),
            Err(line) => {
                let line_start = self.line_starts[line - 1];
                Position::new(line, byte_offset - line_start + 1)
            }
        }
    }
}

impl Default for SourceMap {
    fn default() -> Self {
        Self::new("")
    }
}

/// AST node with location information
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    #[must_use]
    pub const fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Runtime value. Integers are 32 bits wide, matching `int` on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Str(String),
}

impl Value {
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => f.write_str(value),
        }
    }
}

/// Arithmetic operator words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// plus
    Plus,
    /// minus
    Minus,
    /// times
    Times,
    /// divide
    Divide,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Times => "times",
            Self::Divide => "divide",
        })
    }
}

/// Comparison operators used by `if` and `while`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// <
    Smaller,
    /// >
    Greater,
    /// ~
    NotEqual,
    /// ~<
    NotSmaller,
    /// ~>
    NotGreater,
    /// ~~
    Equal,
}

impl Comparison {
    /// Apply the comparison to an already computed ordering
    #[must_use]
    pub fn holds(self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};
        match self {
            Self::Smaller => ordering == Less,
            Self::Greater => ordering == Greater,
            Self::NotEqual => ordering != Equal,
            Self::NotSmaller => ordering != Less,
            Self::NotGreater => ordering != Greater,
            Self::Equal => ordering == Equal,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Smaller => "<",
            Self::Greater => ">",
            Self::NotEqual => "~",
            Self::NotSmaller => "~<",
            Self::NotGreater => "~>",
            Self::Equal => "~~",
        })
    }
}

/// Top-level program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Spanned<Statement>>,
}

/// An expression - operands of operations and calls are always atoms
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer or string literal: 5, "hello"
    Literal(Value),
    /// Variable reference: n
    Variable(String),
    /// Binary operation: n plus 1
    Operation {
        lhs: Box<Spanned<Expr>>,
        operator: Operator,
        rhs: Box<Spanned<Expr>>,
    },
    /// Function call: loopysum n
    Call {
        name: String,
        args: Vec<Spanned<Expr>>,
    },
    /// Read one integer from the input source
    Input,
}

/// Comparison between two expressions: n > 0
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub lhs: Spanned<Expr>,
    pub comparison: Comparison,
    pub rhs: Spanned<Expr>,
}

/// A Controller Code statement, one per line
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// name = expr
    Assignment { name: String, value: Spanned<Expr> },
    /// print expr, or the older form: name = print
    Print { value: Spanned<Expr> },
    /// if condition start ... end
    If {
        condition: Condition,
        body: Vec<Spanned<Statement>>,
    },
    /// while condition start ... end
    While {
        condition: Condition,
        body: Vec<Spanned<Statement>>,
    },
    /// function name params... start ... end
    Function {
        name: String,
        params: Vec<String>,
        body: Vec<Spanned<Statement>>,
    },
    /// return expr
    Return { value: Spanned<Expr> },
}

/// Error types with location information
#[derive(thiserror::Error, Debug)]
pub enum CocoError {
    #[error("Coco:{filename}:{line}:{column}: ERR_SYNTAX: {message}")]
    Syntax {
        message: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("Coco:{filename}:{line}:{column}: ERR_UNDEF_VAR: {var} is not set")]
    UndefinedVariable {
        var: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("Coco:{filename}:{line}:{column}: ERR_UNDEF_FUNC: {function} is not defined")]
    UndefinedFunction {
        function: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error(
        "Coco:{filename}:{line}:{column}: ERR_ARITY: {function} expects {expected} argument(s), got {found}"
    )]
    Arity {
        function: String,
        expected: usize,
        found: usize,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("Coco:{filename}:{line}:{column}: ERR_TYPE: {message}")]
    Type {
        message: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("Coco:{filename}:{line}:{column}: ERR_ARITH: {message}")]
    Arithmetic {
        message: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("Coco:{filename}:{line}:{column}: ERR_LIMIT: {message}")]
    Limit {
        message: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },

    #[error("Coco:{filename}:{line}:{column}: ERR_INPUT: {message}")]
    Input {
        message: String,
        span: Span,
        filename: String,
        line: usize,
        column: usize,
    },
}

/// Category used by the constructors that only carry a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    Type,
    Arithmetic,
    Limit,
    Input,
}

impl CocoError {
    /// Build a message-only error of the given kind, located through `source_map`
    #[must_use]
    pub fn new(
        kind: ErrorKind,
        message: String,
        span: Span,
        source_map: &SourceMap,
        filename: &str,
    ) -> Self {
        let pos = source_map.position(span.start);
        let filename = filename.to_string();
        let (line, column) = (pos.line, pos.column);
        match kind {
            ErrorKind::Syntax => Self::Syntax { message, span, filename, line, column },
            ErrorKind::Type => Self::Type { message, span, filename, line, column },
            ErrorKind::Arithmetic => Self::Arithmetic { message, span, filename, line, column },
            ErrorKind::Limit => Self::Limit { message, span, filename, line, column },
            ErrorKind::Input => Self::Input { message, span, filename, line, column },
        }
    }

    #[must_use]
    pub fn syntax(message: String, span: Span, source_map: &SourceMap, filename: &str) -> Self {
        Self::new(ErrorKind::Syntax, message, span, source_map, filename)
    }

    #[must_use]
    pub fn undefined_variable(
        var: String,
        span: Span,
        source_map: &SourceMap,
        filename: &str,
    ) -> Self {
        let pos = source_map.position(span.start);
        Self::UndefinedVariable {
            var,
            span,
            filename: filename.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }

    #[must_use]
    pub fn undefined_function(
        function: String,
        span: Span,
        source_map: &SourceMap,
        filename: &str,
    ) -> Self {
        let pos = source_map.position(span.start);
        Self::UndefinedFunction {
            function,
            span,
            filename: filename.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }

    #[must_use]
    pub fn arity(
        function: String,
        expected: usize,
        found: usize,
        span: Span,
        source_map: &SourceMap,
        filename: &str,
    ) -> Self {
        let pos = source_map.position(span.start);
        Self::Arity {
            function,
            expected,
            found,
            span,
            filename: filename.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Syntax { span, .. }
            | Self::UndefinedVariable { span, .. }
            | Self::UndefinedFunction { span, .. }
            | Self::Arity { span, .. }
            | Self::Type { span, .. }
            | Self::Arithmetic { span, .. }
            | Self::Limit { span, .. }
            | Self::Input { span, .. } => *span,
        }
    }
}
