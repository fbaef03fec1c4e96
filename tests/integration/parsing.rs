//! Integration tests for lexer + parser pipeline
//! Tests component interactions at the parsing boundary

use coco_ast::{Comparison, Expr, Operator, Statement, Value};
use coco_lexer::{Lexer, Token};
use coco_parser::Parser;

#[test]
fn test_lexer_parser_assignment() {
    let parser = Parser::new("total = 0").unwrap();
    let program = parser.parse().unwrap();

    assert_eq!(program.statements.len(), 1);
    match &program.statements[0].node {
        Statement::Assignment { name, value } => {
            assert_eq!(name, "total");
            assert_eq!(value.node, Expr::Literal(Value::Int(0)));
        }
        _ => panic!("Expected assignment"),
    }
}

#[test]
fn test_lexer_parser_operator_words() {
    let parser = Parser::new("n = n minus 1").unwrap();
    let program = parser.parse().unwrap();

    match &program.statements[0].node {
        Statement::Assignment { value, .. } => match &value.node {
            Expr::Operation { lhs, operator, rhs } => {
                assert_eq!(lhs.node, Expr::Variable("n".to_string()));
                assert_eq!(*operator, Operator::Minus);
                assert_eq!(rhs.node, Expr::Literal(Value::Int(1)));
            }
            _ => panic!("Expected operation"),
        },
        _ => panic!("Expected assignment"),
    }
}

#[test]
fn test_lexer_parser_both_print_forms() {
    let parser = Parser::new("a = print\nprint a").unwrap();
    let program = parser.parse().unwrap();

    assert_eq!(program.statements.len(), 2);
    for statement in &program.statements {
        match &statement.node {
            Statement::Print { value } => {
                assert_eq!(value.node, Expr::Variable("a".to_string()));
            }
            _ => panic!("Expected print"),
        }
    }
}

#[test]
fn test_lexer_parser_function_definition() {
    let source = "\
function coco a b start
    a = print
    b = print
    return b
end
";
    let parser = Parser::new(source).unwrap();
    let program = parser.parse().unwrap();

    assert_eq!(program.statements.len(), 1);
    match &program.statements[0].node {
        Statement::Function { name, params, body } => {
            assert_eq!(name, "coco");
            assert_eq!(params, &["a", "b"]);
            assert_eq!(body.len(), 3);
            assert!(matches!(body[2].node, Statement::Return { .. }));
        }
        _ => panic!("Expected function"),
    }
}

#[test]
fn test_lexer_parser_while_condition() {
    let parser = Parser::new("while n ~< 1 start\nn = n minus 1\nend").unwrap();
    let program = parser.parse().unwrap();

    match &program.statements[0].node {
        Statement::While { condition, body } => {
            assert_eq!(condition.comparison, Comparison::NotSmaller);
            assert_eq!(body.len(), 1);
        }
        _ => panic!("Expected while"),
    }
}

#[test]
fn test_lexer_parser_call_with_atoms() {
    let parser = Parser::new("x = coco 4 y").unwrap();
    let program = parser.parse().unwrap();

    match &program.statements[0].node {
        Statement::Assignment { value, .. } => match &value.node {
            Expr::Call { name, args } => {
                assert_eq!(name, "coco");
                assert_eq!(args.len(), 2);
                assert_eq!(args[0].node, Expr::Literal(Value::Int(4)));
                assert_eq!(args[1].node, Expr::Variable("y".to_string()));
            }
            _ => panic!("Expected call"),
        },
        _ => panic!("Expected assignment"),
    }
}

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let source = "# header\n\nx = 1 # trailing\n\n\nprint x\n";
    let parser = Parser::new(source).unwrap();
    let program = parser.parse().unwrap();

    assert_eq!(program.statements.len(), 2);
}

#[test]
fn test_lexer_feeds_parser_tokens() {
    let parser = Parser::new("x = input").unwrap();
    let kinds: Vec<Token> = parser.tokens().iter().map(|token| token.token).collect();

    assert_eq!(kinds, vec![Token::Ident, Token::Assign, Token::Input, Token::Eof]);
    assert_eq!(Lexer::new("x = input").tokenize().len(), kinds.len());
}

#[test]
fn test_error_propagation_from_lexer() {
    let result = Parser::new_with_filename("x = 1\nx = $", "bad.coco");
    let error = result.err().unwrap();

    assert_eq!(
        error.to_string(),
        "Coco:bad.coco:2:5: ERR_SYNTAX: Unexpected character: $"
    );
}

#[test]
fn test_error_propagation_from_parser() {
    let parser = Parser::new_with_filename("while n > 0 start\nn = n minus 1\n", "loop.coco").unwrap();
    let error = parser.parse().unwrap_err();

    let message = error.to_string();
    assert!(message.starts_with("Coco:loop.coco:"));
    assert!(message.contains("ERR_SYNTAX: Unexpected end of input"));
}

#[test]
fn test_integer_literal_out_of_range() {
    let parser = Parser::new("x = 99999999999").unwrap();
    let error = parser.parse().unwrap_err();

    assert!(error.to_string().contains("does not fit in 32 bits"));
}
