//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorKind, ErrorTip};
use crate::Position;
use std::rc::Rc;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::ExpectedExpression {
            token: "+".to_string(),
        },
        Position(10, Rc::new("test.ash".to_string())),
    );

    assert_eq!(error.get_error_name(), "ExpectedExpression");
    assert_eq!(error.get_position().0, 10);
    assert_eq!(error.kind(), ErrorKind::Parse);
}

#[test]
fn test_error_messages_name_the_expected_construct() {
    let error = Error::unpositioned(ErrorImpl::ExpectedExpression {
        token: "+".to_string(),
    });
    assert!(error
        .to_string()
        .starts_with("unknown token when expecting an expression"));

    let error = Error::unpositioned(ErrorImpl::ExpectedArgumentSeparator {
        token: ";".to_string(),
    });
    assert!(error
        .to_string()
        .starts_with("expected ')' or ',' in argument list"));

    let error = Error::unpositioned(ErrorImpl::ExpectedPrototypeCloseParen {
        token: ",".to_string(),
    });
    assert!(error.to_string().starts_with("expected ')' in prototype"));
}

#[test]
fn test_lowering_error_kinds() {
    let errors = [
        ErrorImpl::UnknownVariable {
            variable: "x".to_string(),
        },
        ErrorImpl::UnknownFunction {
            function: "foo".to_string(),
        },
        ErrorImpl::IncorrectArgumentCount {
            function: "foo".to_string(),
            expected: 2,
            received: 1,
        },
        ErrorImpl::InvalidBinaryOperator { operator: '/' },
        ErrorImpl::FunctionRedefinition {
            function: "foo".to_string(),
        },
    ];

    for error_impl in errors {
        let error = Error::unpositioned(error_impl);
        assert_eq!(error.kind(), ErrorKind::Lowering);
    }
}

#[test]
fn test_unrecognised_token_is_lex_error() {
    let error = Error::unpositioned(ErrorImpl::UnrecognisedToken {
        token: "@".to_string(),
    });

    assert_eq!(error.kind(), ErrorKind::Lex);
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_or_at_only_fills_null_positions() {
    let form = Position(7, Rc::new("test.ash".to_string()));

    let error = Error::unpositioned(ErrorImpl::UnknownVariable {
        variable: "y".to_string(),
    })
    .or_at(form.clone());
    assert_eq!(error.get_position().0, 7);

    let error = Error::new(
        ErrorImpl::ExpectedCloseParen {
            token: "EOF".to_string(),
        },
        Position(3, Rc::new("test.ash".to_string())),
    )
    .or_at(form);
    assert_eq!(error.get_position().0, 3);
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::unpositioned(ErrorImpl::IncorrectArgumentCount {
        function: "add".to_string(),
        expected: 2,
        received: 3,
    });

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "`add` expects 2 arguments, received 3"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
