//! Controller Code interpreter
//!
//! Walks the AST statement by statement. Everything the program prints is
//! collected into an output buffer and handed back with the outcome.

use coco_ast::{
    CocoError, Condition, ErrorKind, Expr, Operator, Program, SourceMap, Span, Spanned,
    Statement, Value,
};
use std::collections::HashMap;
use std::io::{self, BufRead};
use std::rc::Rc;
use tracing::{debug, trace, warn};

pub mod scope;

use scope::Scope;

/// Guards against runaway programs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of nested function calls
    pub max_call_depth: usize,
    /// Maximum number of `start ... end` blocks open at once, function
    /// bodies included
    pub max_block_depth: usize,
    /// Maximum number of iterations a single `while` may run
    pub max_loop_iterations: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: 64,
            max_block_depth: 256,
            max_loop_iterations: 1_000_000,
        }
    }
}

/// Result of running a program or calling a function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Everything printed, one line per print
    pub stdout: String,
    /// Value given to `return`, if execution ended with one
    pub value: Option<Value>,
}

/// How a statement finished
enum Flow {
    Normal,
    Return(Value),
}

#[derive(Debug)]
struct FunctionDef {
    params: Vec<String>,
    body: Vec<Spanned<Statement>>,
}

pub struct Interpreter {
    globals: Scope,
    frames: Vec<Scope>,
    block_depth: usize,
    functions: HashMap<String, Rc<FunctionDef>>,
    stdout: String,
    input: Box<dyn BufRead>,
    limits: Limits,
    source_map: SourceMap,
    filename: String,
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            globals: Scope::new(),
            frames: Vec::new(),
            block_depth: 0,
            functions: HashMap::new(),
            stdout: String::new(),
            input: Box::new(io::empty()),
            limits: Limits::default(),
            source_map: SourceMap::default(),
            filename: "<interpreter>".to_string(),
        }
    }

    /// Report runtime errors against the given source
    #[must_use]
    pub fn with_source(mut self, source_map: SourceMap, filename: &str) -> Self {
        self.source_map = source_map;
        self.filename = filename.to_string();
        self
    }

    /// Read `input` expressions from the given reader
    #[must_use]
    pub fn with_input(mut self, input: impl BufRead + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Execute a Controller Code program
    ///
    /// Function definitions stay registered afterwards, so a program can be
    /// loaded once and its functions invoked through [`Interpreter::call`].
    ///
    /// # Errors
    ///
    /// Returns `CocoError` on the first runtime error. Output printed before
    /// the error stays available through [`Interpreter::take_output`].
    pub fn execute(&mut self, program: Program) -> Result<Outcome, CocoError> {
        let value = match self.execute_block(&program.statements, Span::dummy())? {
            Flow::Normal => None,
            Flow::Return(value) => Some(value),
        };
        Ok(Outcome {
            stdout: self.take_output(),
            value,
        })
    }

    /// Call a function defined by a previously executed program
    ///
    /// # Errors
    ///
    /// Returns `CocoError` if the function is unknown, the argument count is
    /// wrong, or its body fails.
    pub fn call(&mut self, name: &str, args: &[Value]) -> Result<Outcome, CocoError> {
        let value = self.call_function(name, args.to_vec(), Span::dummy())?;
        Ok(Outcome {
            stdout: self.take_output(),
            value: Some(value),
        })
    }

    /// Drain the output buffer
    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.stdout)
    }

    /// Number of parameters of a defined function
    #[must_use]
    pub fn function_arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).map(|function| function.params.len())
    }

    /// Look up a global variable
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    #[must_use]
    pub const fn globals(&self) -> &Scope {
        &self.globals
    }

    fn execute_block(
        &mut self,
        statements: &[Spanned<Statement>],
        span: Span,
    ) -> Result<Flow, CocoError> {
        if self.block_depth >= self.limits.max_block_depth {
            warn!(limit = self.limits.max_block_depth, "block depth limit reached");
            return Err(self.error(
                ErrorKind::Limit,
                format!(
                    "blocks nested deeper than {}",
                    self.limits.max_block_depth
                ),
                span,
            ));
        }

        self.block_depth += 1;
        let flow = self.execute_statements(statements);
        self.block_depth -= 1;
        flow
    }

    fn execute_statements(&mut self, statements: &[Spanned<Statement>]) -> Result<Flow, CocoError> {
        for statement in statements {
            if let Flow::Return(value) = self.execute_statement(statement)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn execute_statement(&mut self, statement: &Spanned<Statement>) -> Result<Flow, CocoError> {
        match &statement.node {
            Statement::Assignment { name, value } => {
                let value = self.evaluate(value)?;
                self.scope_mut().set(name.clone(), value);
                Ok(Flow::Normal)
            }
            Statement::Print { value } => {
                let value = self.evaluate(value)?;
                self.stdout.push_str(&value.to_string());
                self.stdout.push('\n');
                Ok(Flow::Normal)
            }
            Statement::If { condition, body } => {
                if self.test(condition)? {
                    self.execute_block(body, statement.span)
                } else {
                    Ok(Flow::Normal)
                }
            }
            Statement::While { condition, body } => self.execute_while(condition, body, statement.span),
            Statement::Function { name, params, body } => {
                debug!(function = %name, arity = params.len(), "defining function");
                let function = FunctionDef {
                    params: params.clone(),
                    body: body.clone(),
                };
                self.functions.insert(name.clone(), Rc::new(function));
                Ok(Flow::Normal)
            }
            Statement::Return { value } => Ok(Flow::Return(self.evaluate(value)?)),
        }
    }

    fn execute_while(
        &mut self,
        condition: &Condition,
        body: &[Spanned<Statement>],
        span: Span,
    ) -> Result<Flow, CocoError> {
        let mut iterations: u64 = 0;
        while self.test(condition)? {
            iterations += 1;
            if iterations > self.limits.max_loop_iterations {
                warn!(limit = self.limits.max_loop_iterations, "loop iteration limit reached");
                return Err(self.error(
                    ErrorKind::Limit,
                    format!(
                        "loop exceeded {} iterations",
                        self.limits.max_loop_iterations
                    ),
                    span,
                ));
            }
            if let Flow::Return(value) = self.execute_block(body, span)? {
                return Ok(Flow::Return(value));
            }
        }
        trace!(iterations, "loop finished");
        Ok(Flow::Normal)
    }

    fn test(&mut self, condition: &Condition) -> Result<bool, CocoError> {
        let lhs = self.evaluate(&condition.lhs)?;
        let rhs = self.evaluate(&condition.rhs)?;
        let ordering = match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => {
                let span = Span::new(condition.lhs.span.start, condition.rhs.span.end);
                return Err(self.error(
                    ErrorKind::Type,
                    format!(
                        "cannot compare {} with {} using {}",
                        lhs.type_name(),
                        rhs.type_name(),
                        condition.comparison
                    ),
                    span,
                ));
            }
        };
        Ok(condition.comparison.holds(ordering))
    }

    fn evaluate(&mut self, expr: &Spanned<Expr>) -> Result<Value, CocoError> {
        match &expr.node {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Variable(name) => self.scope().get(name).cloned().ok_or_else(|| {
                CocoError::undefined_variable(
                    name.clone(),
                    expr.span,
                    &self.source_map,
                    &self.filename,
                )
            }),
            Expr::Operation { lhs, operator, rhs } => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                self.apply(*operator, lhs, rhs, expr.span)
            }
            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg)?);
                }
                self.call_function(name, values, expr.span)
            }
            Expr::Input => self.read_input(expr.span),
        }
    }

    fn apply(
        &self,
        operator: Operator,
        lhs: Value,
        rhs: Value,
        span: Span,
    ) -> Result<Value, CocoError> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                let result = match operator {
                    Operator::Plus => a.checked_add(b),
                    Operator::Minus => a.checked_sub(b),
                    Operator::Times => a.checked_mul(b),
                    Operator::Divide => {
                        if b == 0 {
                            return Err(self.error(
                                ErrorKind::Arithmetic,
                                "division by zero".to_string(),
                                span,
                            ));
                        }
                        a.checked_div(b)
                    }
                };
                result.map(Value::Int).ok_or_else(|| {
                    self.error(
                        ErrorKind::Arithmetic,
                        format!("{a} {operator} {b} overflows 32 bits"),
                        span,
                    )
                })
            }
            (Value::Str(a), Value::Str(b)) if operator == Operator::Plus => Ok(Value::Str(a + &b)),
            (lhs, rhs) => Err(self.error(
                ErrorKind::Type,
                format!(
                    "cannot apply {operator} to {} and {}",
                    lhs.type_name(),
                    rhs.type_name()
                ),
                span,
            )),
        }
    }

    fn call_function(&mut self, name: &str, args: Vec<Value>, span: Span) -> Result<Value, CocoError> {
        let function = self.functions.get(name).cloned().ok_or_else(|| {
            CocoError::undefined_function(name.to_string(), span, &self.source_map, &self.filename)
        })?;

        if args.len() != function.params.len() {
            return Err(CocoError::arity(
                name.to_string(),
                function.params.len(),
                args.len(),
                span,
                &self.source_map,
                &self.filename,
            ));
        }

        if self.frames.len() >= self.limits.max_call_depth {
            warn!(function = %name, limit = self.limits.max_call_depth, "call depth limit reached");
            return Err(self.error(
                ErrorKind::Limit,
                format!(
                    "call to {name} exceeds the maximum call depth of {}",
                    self.limits.max_call_depth
                ),
                span,
            ));
        }

        let mut frame = Scope::new();
        for (param, value) in function.params.iter().zip(args) {
            frame.set(param.clone(), value);
        }

        debug!(function = %name, depth = self.frames.len() + 1, "calling function");
        self.frames.push(frame);
        let flow = self.execute_block(&function.body, span);
        self.frames.pop();

        match flow? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Err(self.error(
                ErrorKind::Type,
                format!("function {name} ended without returning a value"),
                span,
            )),
        }
    }

    fn read_input(&mut self, span: Span) -> Result<Value, CocoError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|err| self.error(ErrorKind::Input, format!("cannot read input: {err}"), span))?;
        if read == 0 {
            return Err(self.error(ErrorKind::Input, "end of input".to_string(), span));
        }

        let text = line.trim();
        text.parse::<i32>().map(Value::Int).map_err(|_| {
            self.error(
                ErrorKind::Input,
                format!("expected an integer, got `{text}`"),
                span,
            )
        })
    }

    fn scope(&self) -> &Scope {
        self.frames.last().unwrap_or(&self.globals)
    }

    fn scope_mut(&mut self) -> &mut Scope {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    fn error(&self, kind: ErrorKind, message: String, span: Span) -> CocoError {
        CocoError::new(kind, message, span, &self.source_map, &self.filename)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
