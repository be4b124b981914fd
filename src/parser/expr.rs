use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{TokenKind, TokenSource},
};

use super::parser::Parser;

/// expression ::= primary binoprhs
pub fn parse_expression<S: TokenSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    let lhs = parse_primary(parser)?;

    parse_binary_rhs(parser, 0, lhs)
}

/// primary ::= identifierexpr | numberexpr | parenexpr
pub fn parse_primary<S: TokenSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    match parser.current_token_kind() {
        TokenKind::Identifier => parse_identifier_expr(parser),
        TokenKind::Number => parse_number_expr(parser),
        TokenKind::Char('(') => parse_paren_expr(parser),
        _ => Err(parser.unexpected(|token| ErrorImpl::ExpectedExpression { token })),
    }
}

/// numberexpr ::= number
pub fn parse_number_expr<S: TokenSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    let value = parser
        .current_token()
        .value
        .parse::<f64>()
        .map_err(|_| parser.unexpected(|token| ErrorImpl::NumberParseError { token }))?;

    parser.advance();
    Ok(Expr::Number(value))
}

/// parenexpr ::= '(' expression ')'
pub fn parse_paren_expr<S: TokenSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    parser.advance(); // (
    let expr = parse_expression(parser)?;

    if !parser.at_char(')') {
        return Err(parser.unexpected(|token| ErrorImpl::ExpectedCloseParen { token }));
    }
    parser.advance();

    Ok(expr)
}

/// identifierexpr
///   ::= identifier
///   ::= identifier '(' expression* ')'
pub fn parse_identifier_expr<S: TokenSource>(parser: &mut Parser<S>) -> Result<Expr, Error> {
    let name = parser.advance().value;

    if !parser.at_char('(') {
        return Ok(Expr::Variable(name));
    }
    parser.advance();

    let mut args = vec![];

    if !parser.at_char(')') {
        loop {
            args.push(parse_expression(parser)?);

            if parser.at_char(')') {
                break;
            }

            if !parser.at_char(',') {
                return Err(parser.unexpected(|token| ErrorImpl::ExpectedArgumentSeparator { token }));
            }
            parser.advance();
        }
    }

    parser.advance(); // )

    Ok(Expr::Call { callee: name, args })
}

/// binoprhs ::= (binop primary)*
///
/// Precedence climbing: operators binding at least as tightly as
/// `min_precedence` are folded into `lhs`. When the operator after the
/// right operand binds strictly tighter than the current one, that operand
/// is first extended with a recursive call, which makes equal precedences
/// associate to the left.
pub fn parse_binary_rhs<S: TokenSource>(
    parser: &mut Parser<S>,
    min_precedence: i32,
    mut lhs: Expr,
) -> Result<Expr, Error> {
    loop {
        let precedence = parser.get_token_precedence();

        if precedence < min_precedence {
            return Ok(lhs);
        }

        // Only char tokens carry a precedence.
        let TokenKind::Char(op) = parser.current_token_kind() else {
            return Ok(lhs);
        };
        parser.advance();

        let mut rhs = parse_primary(parser)?;

        let next_precedence = parser.get_token_precedence();
        if precedence < next_precedence {
            rhs = parse_binary_rhs(parser, precedence + 1, rhs)?;
        }

        lhs = Expr::Binary {
            op,
            left: Box::new(lhs),
            right: Box::new(rhs),
        };
    }
}
