//! Unit tests for the parser module.
//!
//! This module contains tests for parsing:
//! - Operator precedence and associativity
//! - Calls, variables and parenthesized expressions
//! - Prototypes, definitions and externs
//! - Error reporting without consuming the offending token

use std::rc::Rc;

use super::{
    expr::{parse_binary_rhs, parse_expression, parse_primary},
    parser::{parse, Parser},
    precedence::PrecedenceTable,
    proto::{parse_definition, parse_extern, parse_prototype, parse_top_level_expr},
};
use crate::{
    ast::ast::{Expr, Item, Prototype, ANONYMOUS_FUNCTION_NAME},
    errors::errors::{ErrorImpl, ErrorKind},
    lexer::{
        lexer::tokenize,
        tokens::{TokenKind, TokenStream},
    },
};

fn parser_for(source: &str) -> Parser<TokenStream> {
    parser_with(source, PrecedenceTable::standard())
}

fn parser_with(source: &str, precedence: PrecedenceTable) -> Parser<TokenStream> {
    let tokens = tokenize(source.to_string(), Some("test.ash".to_string())).unwrap();
    Parser::from_tokens(tokens, Rc::new("test.ash".to_string()), precedence)
}

fn num(value: f64) -> Expr {
    Expr::number(value)
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let mut parser = parser_for("1+2*3");
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(
        expr,
        Expr::binary('+', num(1.0), Expr::binary('*', num(2.0), num(3.0)))
    );
    assert_eq!(parser.current_token_kind(), TokenKind::EOF);
}

#[test]
fn test_equal_precedence_associates_left() {
    let mut parser = parser_for("1+2+3");
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(
        expr,
        Expr::binary('+', Expr::binary('+', num(1.0), num(2.0)), num(3.0))
    );

    let mut parser = parser_for("a-b+c");
    let expr = parse_expression(&mut parser).unwrap();
    assert_eq!(expr.to_string(), "(+ (- a b) c)");
}

#[test]
fn test_parentheses_override_precedence() {
    let mut parser = parser_for("(1+2)*3");
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(
        expr,
        Expr::binary('*', Expr::binary('+', num(1.0), num(2.0)), num(3.0))
    );
}

#[test]
fn test_mixed_precedence_chain() {
    let mut parser = parser_for("a<b+c*d-e");
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(expr.to_string(), "(< a (- (+ b (* c d)) e))");

    let mut parser = parser_for("a*b+c*d<e");
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(expr.to_string(), "(< (+ (* a b) (* c d)) e)");
}

#[test]
fn test_lower_precedence_after_higher_returns_to_outer_loop() {
    let mut parser = parser_for("a+b*c<d");
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(expr.to_string(), "(< (+ a (* b c)) d)");
}

#[test]
fn test_custom_precedence_table() {
    let mut table = PrecedenceTable::standard();
    table.install('/', 40);

    let mut parser = parser_with("a+b/c", table);
    let expr = parse_expression(&mut parser).unwrap();
    assert_eq!(expr.to_string(), "(+ a (/ b c))");

    // Without '/' installed, the expression stops before it.
    let mut parser = parser_for("a+b/c");
    let expr = parse_expression(&mut parser).unwrap();
    assert_eq!(expr.to_string(), "(+ a b)");
    assert!(parser.at_char('/'));
}

#[test]
fn test_empty_table_parses_no_binary_operators() {
    let mut parser = parser_with("1+2", PrecedenceTable::new());
    let expr = parse_expression(&mut parser).unwrap();

    assert_eq!(expr, num(1.0));
    assert!(parser.at_char('+'));
}

#[test]
fn test_uninstalled_operator_is_never_binary() {
    let mut table = PrecedenceTable::standard();
    table.install('%', 0).install('^', -5);

    for op in ['/', '%', '^', '/', '%'] {
        assert_eq!(table.precedence(op), None);
        assert!(!table.is_binary_operator(op));
    }
    assert_eq!(table.precedence('*'), Some(40));
    assert_eq!(table.precedence('/'), None);
}

#[test]
fn test_get_token_precedence() {
    let parser = parser_for("<");
    assert_eq!(parser.get_token_precedence(), 10);

    let parser = parser_for("foo");
    assert_eq!(parser.get_token_precedence(), -1);

    let parser = parser_for("/");
    assert_eq!(parser.get_token_precedence(), -1);
}

#[test]
fn test_parse_binary_rhs_with_high_minimum_returns_lhs() {
    let mut parser = parser_for("+ 2");
    let expr = parse_binary_rhs(&mut parser, 30, num(1.0)).unwrap();

    assert_eq!(expr, num(1.0));
    assert!(parser.at_char('+'));
}

#[test]
fn test_parse_variable_and_calls() {
    let mut parser = parser_for("x");
    assert_eq!(parse_expression(&mut parser).unwrap(), Expr::variable("x"));

    let mut parser = parser_for("foo()");
    assert_eq!(
        parse_expression(&mut parser).unwrap(),
        Expr::call("foo", vec![])
    );

    let mut parser = parser_for("foo(1, x+2, bar(y))");
    assert_eq!(
        parse_expression(&mut parser).unwrap(),
        Expr::call(
            "foo",
            vec![
                num(1.0),
                Expr::binary('+', Expr::variable("x"), num(2.0)),
                Expr::call("bar", vec![Expr::variable("y")]),
            ]
        )
    );
    assert_eq!(parser.current_token_kind(), TokenKind::EOF);
}

#[test]
fn test_parse_nested_parentheses() {
    let mut parser = parser_for("((4))");
    assert_eq!(parse_expression(&mut parser).unwrap(), num(4.0));
}

#[test]
fn test_unknown_token_when_expecting_expression() {
    let mut parser = parser_for("+ 1");
    let error = parse_primary(&mut parser).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::Parse);
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ExpectedExpression {
            token: "+".to_string()
        }
    );
    // The offending token is not consumed.
    assert!(parser.at_char('+'));
}

#[test]
fn test_missing_close_paren() {
    let mut parser = parser_for("(1 + 2 ;");
    let error = parse_expression(&mut parser).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedCloseParen");
    assert_eq!(error.get_position().0, 7);
    assert!(parser.at_char(';'));
}

#[test]
fn test_bad_argument_separator() {
    let mut parser = parser_for("foo(1 2)");
    let error = parse_expression(&mut parser).unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::ExpectedArgumentSeparator {
            token: "2".to_string()
        }
    );
    assert_eq!(parser.current_token_kind(), TokenKind::Number);
}

#[test]
fn test_argument_failure_fails_whole_call() {
    let mut parser = parser_for("foo(1, )");
    let error = parse_expression(&mut parser).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedExpression");
    assert!(parser.at_char(')'));
}

#[test]
fn test_unparseable_number() {
    let tokens = vec![crate::lexer::tokens::Token {
        kind: TokenKind::Number,
        value: "1.2.3".to_string(),
        span: crate::Span {
            start: crate::Position(0, Rc::new("test.ash".to_string())),
            end: crate::Position(5, Rc::new("test.ash".to_string())),
        },
    }];
    let mut parser = Parser::from_tokens(
        tokens,
        Rc::new("test.ash".to_string()),
        PrecedenceTable::standard(),
    );

    let error = parse_expression(&mut parser).unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
    assert_eq!(parser.current_token_kind(), TokenKind::Number);
}

#[test]
fn test_parse_prototype() {
    let mut parser = parser_for("foo(a b c)");
    let proto = parse_prototype(&mut parser).unwrap();

    assert_eq!(proto.name, "foo");
    assert_eq!(proto.params, vec!["a", "b", "c"]);

    let mut parser = parser_for("bar()");
    let proto = parse_prototype(&mut parser).unwrap();
    assert_eq!(proto, Prototype::new("bar", vec![]));
}

#[test]
fn test_prototype_errors() {
    let mut parser = parser_for("(a)");
    let error = parse_prototype(&mut parser).unwrap_err();
    assert_eq!(error.get_error_name(), "ExpectedFunctionName");
    assert!(parser.at_char('('));

    let mut parser = parser_for("foo a)");
    let error = parse_prototype(&mut parser).unwrap_err();
    assert_eq!(error.get_error_name(), "ExpectedPrototypeOpenParen");
    assert_eq!(parser.current_token().value, "a");

    let mut parser = parser_for("foo(a, b)");
    let error = parse_prototype(&mut parser).unwrap_err();
    assert_eq!(error.get_error_name(), "ExpectedPrototypeCloseParen");
    assert!(parser.at_char(','));
}

#[test]
fn test_parse_definition() {
    let mut parser = parser_for("def add(a b) a + b");
    let function = parse_definition(&mut parser).unwrap();

    assert_eq!(function.prototype, Prototype::new("add", vec!["a".into(), "b".into()]));
    assert_eq!(
        function.body,
        Expr::binary('+', Expr::variable("a"), Expr::variable("b"))
    );
}

#[test]
fn test_definition_without_body_fails() {
    let mut parser = parser_for("def foo(x)");
    let error = parse_definition(&mut parser).unwrap_err();

    assert_eq!(error.get_error_name(), "ExpectedExpression");
    assert_eq!(parser.current_token_kind(), TokenKind::EOF);
}

#[test]
fn test_parse_extern() {
    let mut parser = parser_for("extern sin(x)");
    let proto = parse_extern(&mut parser).unwrap();

    assert_eq!(proto, Prototype::new("sin", vec!["x".into()]));
}

#[test]
fn test_parse_top_level_expr() {
    let mut parser = parser_for("1 + x");
    let function = parse_top_level_expr(&mut parser).unwrap();

    assert_eq!(function.prototype.name, ANONYMOUS_FUNCTION_NAME);
    assert!(function.prototype.params.is_empty());
    assert_eq!(function.body.to_string(), "(+ 1 x)");
}

#[test]
fn test_parse_items() {
    let source = "extern sin(x); def foo(x) sin(x) * 2; foo(3)";
    let tokens = tokenize(source.to_string(), None).unwrap();
    let (_, items) = parse(tokens, Rc::new("shell".to_string()), PrecedenceTable::standard());
    let items = items.unwrap();

    assert_eq!(items.len(), 3);
    assert!(matches!(&items[0], Item::Extern(proto) if proto.name == "sin"));
    assert!(matches!(&items[1], Item::Definition(function) if function.prototype.name == "foo"));
    assert!(matches!(&items[2], Item::Expression(function) if function.prototype.is_anonymous()));
}

#[test]
fn test_parse_items_stops_at_first_error() {
    let tokens = tokenize("def foo(x) x; def (".to_string(), None).unwrap();
    let (parser, items) = parse(tokens, Rc::new("shell".to_string()), PrecedenceTable::standard());

    assert_eq!(items.unwrap_err().get_error_name(), "ExpectedFunctionName");
    assert!(parser.at_char('('));
}
