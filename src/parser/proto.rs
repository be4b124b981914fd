use crate::{
    ast::ast::{Function, Prototype},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{TokenKind, TokenSource},
};

use super::{expr::parse_expression, parser::Parser};

/// prototype ::= id '(' id* ')'
pub fn parse_prototype<S: TokenSource>(parser: &mut Parser<S>) -> Result<Prototype, Error> {
    if parser.current_token_kind() != TokenKind::Identifier {
        return Err(parser.unexpected(|token| ErrorImpl::ExpectedFunctionName { token }));
    }
    let name = parser.advance().value;

    if !parser.at_char('(') {
        return Err(parser.unexpected(|token| ErrorImpl::ExpectedPrototypeOpenParen { token }));
    }
    parser.advance();

    let mut params = vec![];
    while parser.current_token_kind() == TokenKind::Identifier {
        params.push(parser.advance().value);
    }

    if !parser.at_char(')') {
        return Err(parser.unexpected(|token| ErrorImpl::ExpectedPrototypeCloseParen { token }));
    }
    parser.advance();

    Ok(Prototype { name, params })
}

/// definition ::= 'def' prototype expression
pub fn parse_definition<S: TokenSource>(parser: &mut Parser<S>) -> Result<Function, Error> {
    parser.advance(); // def
    let prototype = parse_prototype(parser)?;
    let body = parse_expression(parser)?;

    Ok(Function { prototype, body })
}

/// external ::= 'extern' prototype
pub fn parse_extern<S: TokenSource>(parser: &mut Parser<S>) -> Result<Prototype, Error> {
    parser.advance(); // extern
    parse_prototype(parser)
}

/// toplevelexpr ::= expression
pub fn parse_top_level_expr<S: TokenSource>(parser: &mut Parser<S>) -> Result<Function, Error> {
    let body = parse_expression(parser)?;

    Ok(Function {
        prototype: Prototype::anonymous(),
        body,
    })
}
