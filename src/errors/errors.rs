use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// Broad classification of an [`Error`], by the phase that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lex,
    Parse,
    Lowering,
}

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    /// Creates an error that is not tied to a source position yet.
    ///
    /// Lowering works on position-free AST nodes, so its errors start out
    /// with a null position and the driver attaches the form's position.
    pub fn unpositioned(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl, Position::null())
    }

    /// Replaces a null position with `position`; real positions are kept.
    pub fn or_at(mut self, position: Position) -> Self {
        if self.position.is_null() {
            self.position = position;
        }
        self
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorKind::Lex,
            ErrorImpl::ExpectedExpression { .. }
            | ErrorImpl::ExpectedCloseParen { .. }
            | ErrorImpl::ExpectedArgumentSeparator { .. }
            | ErrorImpl::ExpectedFunctionName { .. }
            | ErrorImpl::ExpectedPrototypeOpenParen { .. }
            | ErrorImpl::ExpectedPrototypeCloseParen { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorKind::Parse,
            ErrorImpl::UnknownVariable { .. }
            | ErrorImpl::UnknownFunction { .. }
            | ErrorImpl::IncorrectArgumentCount { .. }
            | ErrorImpl::InvalidBinaryOperator { .. }
            | ErrorImpl::DuplicateParameter { .. }
            | ErrorImpl::FunctionRedefinition { .. }
            | ErrorImpl::PrototypeMismatch { .. }
            | ErrorImpl::MalformedFunction { .. }
            | ErrorImpl::Backend { .. } => ErrorKind::Lowering,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::ExpectedExpression { .. } => "ExpectedExpression",
            ErrorImpl::ExpectedCloseParen { .. } => "ExpectedCloseParen",
            ErrorImpl::ExpectedArgumentSeparator { .. } => "ExpectedArgumentSeparator",
            ErrorImpl::ExpectedFunctionName { .. } => "ExpectedFunctionName",
            ErrorImpl::ExpectedPrototypeOpenParen { .. } => "ExpectedPrototypeOpenParen",
            ErrorImpl::ExpectedPrototypeCloseParen { .. } => "ExpectedPrototypeCloseParen",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::UnknownVariable { .. } => "UnknownVariable",
            ErrorImpl::UnknownFunction { .. } => "UnknownFunction",
            ErrorImpl::IncorrectArgumentCount { .. } => "IncorrectArgumentCount",
            ErrorImpl::InvalidBinaryOperator { .. } => "InvalidBinaryOperator",
            ErrorImpl::DuplicateParameter { .. } => "DuplicateParameter",
            ErrorImpl::FunctionRedefinition { .. } => "FunctionRedefinition",
            ErrorImpl::PrototypeMismatch { .. } => "PrototypeMismatch",
            ErrorImpl::MalformedFunction { .. } => "MalformedFunction",
            ErrorImpl::Backend { .. } => "BackendError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::ExpectedExpression { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, expected a number, identifier or `(`",
                token
            )),
            ErrorImpl::ExpectedCloseParen { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you forget a closing `)`?",
                token
            )),
            ErrorImpl::ExpectedArgumentSeparator { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, arguments are separated by `,`",
                token
            )),
            ErrorImpl::ExpectedFunctionName { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, a prototype starts with the function name",
                token
            )),
            ErrorImpl::ExpectedPrototypeOpenParen { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, parameters are listed inside `( )`",
                token
            )),
            ErrorImpl::ExpectedPrototypeCloseParen { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, parameter names are not separated by commas",
                token
            )),
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::UnknownVariable { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` is not a parameter here", variable))
            }
            ErrorImpl::UnknownFunction { function } => ErrorTip::Suggestion(format!(
                "Function `{}` must be defined or declared with `extern` first",
                function
            )),
            ErrorImpl::IncorrectArgumentCount {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::InvalidBinaryOperator { operator } => ErrorTip::Suggestion(format!(
                "Operator `{}` has a precedence but no lowering",
                operator
            )),
            ErrorImpl::DuplicateParameter {
                function,
                parameter,
            } => ErrorTip::Suggestion(format!(
                "Parameter `{}` appears more than once in `{}`",
                parameter, function
            )),
            ErrorImpl::FunctionRedefinition { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already has a body", function))
            }
            ErrorImpl::PrototypeMismatch {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` was declared with {} parameters, not {}",
                function, expected, received
            )),
            ErrorImpl::MalformedFunction { .. } => ErrorTip::None,
            ErrorImpl::Backend { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexing
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },

    // Parsing
    #[error("unknown token when expecting an expression: {token:?}")]
    ExpectedExpression { token: String },
    #[error("expected ')': {token:?}")]
    ExpectedCloseParen { token: String },
    #[error("expected ')' or ',' in argument list: {token:?}")]
    ExpectedArgumentSeparator { token: String },
    #[error("expected function name in prototype: {token:?}")]
    ExpectedFunctionName { token: String },
    #[error("expected '(' in prototype: {token:?}")]
    ExpectedPrototypeOpenParen { token: String },
    #[error("expected ')' in prototype: {token:?}")]
    ExpectedPrototypeCloseParen { token: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Lowering
    #[error("unknown variable name: {variable:?}")]
    UnknownVariable { variable: String },
    #[error("unknown function referenced: {function:?}")]
    UnknownFunction { function: String },
    #[error("incorrect number of arguments passed to {function:?}: expected {expected}, received {received}")]
    IncorrectArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("invalid binary operator: {operator:?}")]
    InvalidBinaryOperator { operator: char },
    #[error("duplicate parameter {parameter:?} in prototype of {function:?}")]
    DuplicateParameter { function: String, parameter: String },
    #[error("function {function:?} cannot be redefined")]
    FunctionRedefinition { function: String },
    #[error("function {function:?} redeclared with {received} parameters, previously {expected}")]
    PrototypeMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("function {function:?} failed verification")]
    MalformedFunction { function: String },
    #[error("backend error: {message}")]
    Backend { message: String },
}
