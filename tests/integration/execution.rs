//! Integration tests for parser + interpreter pipeline
//! Tests program execution, function frames and runtime errors

use coco_ast::{CocoError, Value};
use coco_interpreter::{Interpreter, Limits};
use coco_parser::Parser;
use std::io::Cursor;

fn interpreter_for(parser: &Parser) -> Interpreter {
    Interpreter::new().with_source(parser.source_map().clone(), parser.filename())
}

#[test]
fn test_parser_interpreter_simple_execution() {
    let parser = Parser::new("x = 12\nx = print").unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = Interpreter::new();
    let result = interpreter.execute(program).unwrap();

    assert_eq!(result.stdout, "12\n");
    assert_eq!(result.value, None);
}

#[test]
fn test_parser_interpreter_loop() {
    let source = "\
n = 6
total = 0
while n > 0 start
    total = total plus n
    n = n minus 1
end
print total
";
    let parser = Parser::new(source).unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = Interpreter::new();
    let result = interpreter.execute(program).unwrap();

    assert_eq!(result.stdout, "21\n");
    assert_eq!(interpreter.variable("n"), Some(&Value::Int(0)));
}

#[test]
fn test_parser_interpreter_recursion() {
    let source = "\
function fact n start
    if n < 2 start
        return 1
    end
    m = n minus 1
    r = fact m
    return n times r
end
print fact 10
";
    let parser = Parser::new(source).unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = Interpreter::new();
    let result = interpreter.execute(program).unwrap();

    assert_eq!(result.stdout, "3628800\n");
}

#[test]
fn test_function_frames_do_not_touch_globals() {
    let source = "\
n = 100
function bump n start
    n = n plus 1
    return n
end
x = bump 1
";
    let parser = Parser::new(source).unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = Interpreter::new();
    interpreter.execute(program).unwrap();

    assert_eq!(interpreter.variable("n"), Some(&Value::Int(100)));
    assert_eq!(interpreter.variable("x"), Some(&Value::Int(2)));
}

#[test]
fn test_call_after_execute() {
    let parser = Parser::new("function coco a b start\na = print\nb = print\nreturn b\nend").unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = Interpreter::new();
    interpreter.execute(program).unwrap();
    assert_eq!(interpreter.function_arity("coco"), Some(2));

    let outcome = interpreter.call("coco", &[Value::Int(4), Value::Int(12)]).unwrap();
    assert_eq!(outcome.stdout, "4\n12\n");
    assert_eq!(outcome.value, Some(Value::Int(12)));
}

#[test]
fn test_input_statement() {
    let parser = Parser::new("a = input\nprint a plus 1").unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = Interpreter::new().with_input(Cursor::new("41\n"));
    let result = interpreter.execute(program).unwrap();

    assert_eq!(result.stdout, "42\n");
}

#[test]
fn test_error_propagation_undefined_variable() {
    let parser = Parser::new_with_filename("print 1\nprint y", "prog.coco").unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = interpreter_for(&parser);
    let error = interpreter.execute(program).unwrap_err();

    assert!(matches!(error, CocoError::UndefinedVariable { .. }));
    assert_eq!(error.to_string(), "Coco:prog.coco:2:7: ERR_UNDEF_VAR: y is not set");
    assert_eq!(interpreter.take_output(), "1\n");
}

#[test]
fn test_error_propagation_arithmetic() {
    let parser = Parser::new("x = 1 divide 0").unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = interpreter_for(&parser);
    let error = interpreter.execute(program).unwrap_err();

    assert!(matches!(error, CocoError::Arithmetic { .. }));
    assert!(error.to_string().contains("division by zero"));
}

#[test]
fn test_error_propagation_loop_limit() {
    let parser = Parser::new("while 1 ~~ 1 start\nx = 1\nend").unwrap();
    let program = parser.parse().unwrap();

    let limits = Limits {
        max_loop_iterations: 50,
        ..Limits::default()
    };
    let mut interpreter = interpreter_for(&parser).with_limits(limits);
    let error = interpreter.execute(program).unwrap_err();

    assert!(matches!(error, CocoError::Limit { .. }));
    assert!(error.to_string().contains("loop exceeded 50 iterations"));
}

#[test]
fn test_deep_nesting_is_a_limit_error() {
    let depth = 3000;
    let source = format!(
        "{}print 1\n{}",
        "if 1 ~~ 1 start\n".repeat(depth),
        "end\n".repeat(depth)
    );
    let parser = Parser::new_with_filename(&source, "deep.coco").unwrap();
    let program = parser.parse().unwrap();

    let mut interpreter = interpreter_for(&parser);
    let error = interpreter.execute(program).unwrap_err();

    assert!(matches!(error, CocoError::Limit { .. }));
    assert!(error.to_string().starts_with("Coco:deep.coco:256:1: ERR_LIMIT: blocks nested deeper than 256"));
}
