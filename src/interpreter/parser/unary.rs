use std::iter::Peekable;

use crate::{
    ast::{Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{ParseResult, parse_expression},
            utils::{expect, nested, parse_comma_separated, ran_out},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators:
/// - `-`  (numeric negation)
/// - `NOT` or `!` (logical not)
///
/// Unary operators are right-associative, so an input like `NOT -x` is parsed
/// as `NOT (-x)`.
///
/// If no unary operator is present, the function delegates to
/// [`parse_primary`] and then applies any indexing via [`parse_postfix`].
///
/// Grammar:
/// ```text
///     unary := ("-" | "NOT" | "!") unary
///            | primary postfix*
/// ```
/// # Parameters
/// - `tokens`: Token iterator with lookahead.
///
/// # Returns
/// An [`Expr::UnaryOp`] or a primary expression possibly followed by postfixes.
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let (op, line) = match tokens.peek() {
        Some((Token::Minus, line)) => (UnaryOperator::Negate, *line),
        Some((Token::Not, line)) => (UnaryOperator::Not, *line),
        _ => {
            let primary = parse_primary(tokens)?;
            return parse_postfix(tokens, primary);
        },
    };
    tokens.next();
    let expr = nested(tokens, parse_unary)?;
    Ok(Expr::UnaryOp { op,
                       expr: Box::new(expr),
                       line })
}

/// Parses a primary (atomic) expression.
///
/// Primary expressions form the base of the expression grammar and include:
/// - numeric, string and boolean literals
/// - variables
/// - calls
/// - parenthesized expressions
///
/// Grammar (simplified):
/// ```text
///     primary := literal
///              | identifier ["(" arguments ")"]
///              | "(" expression ")"
/// ```
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of a primary expression.
///
/// # Returns
/// The parsed primary [`Expr`] or a `ParseError` on failure.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.next() else {
        return Err(ran_out());
    };
    let line = *line;

    match token {
        Token::Integer(n) => Ok(Expr::Literal { value: (*n).into(),
                                                line }),
        Token::Real(r) => Ok(Expr::Literal { value: (*r).into(),
                                             line }),
        Token::Bool(b) => Ok(Expr::Literal { value: (*b).into(),
                                             line }),
        Token::Str(s) => Ok(Expr::Literal { value: s.as_str().into(),
                                            line }),
        Token::LParen => {
            let expr = parse_expression(tokens)?;
            expect(tokens, &Token::RParen, line)?;
            Ok(expr)
        },
        Token::Identifier(name) => parse_identifier_or_call(tokens, name.clone(), line),
        tok => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line }),
    }
}

/// Parses a variable reference or a call, once the name is consumed.
///
/// A name directly followed by `(` is a call; anything else is a variable.
///
/// Grammar: `identifier_or_call := IDENT ["(" [expression ("," expression)*] ")"]`
pub(crate) fn parse_identifier_or_call<'a, I>(tokens: &mut Peekable<I>,
                                              name: String,
                                              line: usize)
                                              -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, line)?;
        return Ok(Expr::Call { name,
                               arguments,
                               line });
    }
    Ok(Expr::Variable { name, line })
}

/// Parses array indexing applied to an expression.
///
/// Multiple chained indices are allowed:
/// ```text
///        a[0][1]
/// ```
///
/// Grammar:
/// ```text
///     postfix := primary
///              | postfix "[" expression "]"
/// ```
/// # Parameters
/// - `tokens`: Token iterator after a primary expression.
/// - `node`: The expression to which indexing will be applied.
///
/// # Errors
/// Returns a `ParseError` if an `[` is not properly closed with `]` or the
/// index expression fails to parse.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    while let Some((Token::LBracket, index_line)) = tokens.peek() {
        let line = *index_line;
        tokens.next();
        let index = parse_expression(tokens)?;
        expect(tokens, &Token::RBracket, line)?;
        node = Expr::Index { target: Box::new(node),
                             index: Box::new(index),
                             line };
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ast::LiteralValue, interpreter::lexer::tokenize};

    fn parse(source: &str) -> ParseResult<Expr> {
        let tokens = tokenize(source).unwrap();
        parse_unary(&mut tokens.iter().peekable())
    }

    #[test]
    fn parses_call_with_arguments() {
        let Expr::Call { name, arguments, .. } = parse("add(1, x)").unwrap() else {
            panic!("expected a call");
        };
        assert_eq!(name, "ADD");
        assert_eq!(arguments.len(), 2);
    }

    #[test]
    fn parses_chained_indexing() {
        let Expr::Index { target, index, .. } = parse("grid[1][\"b\"]").unwrap() else {
            panic!("expected an index");
        };
        assert!(matches!(*target, Expr::Index { .. }));
        assert_eq!(*index,
                   Expr::Literal { value: LiteralValue::Str("b".to_string()),
                                   line:  1, });
    }

    #[test]
    fn negation_nests() {
        let Expr::UnaryOp { op, expr, .. } = parse("NOT -x").unwrap() else {
            panic!("expected a unary operation");
        };
        assert_eq!(op, UnaryOperator::Not);
        assert!(matches!(*expr, Expr::UnaryOp { op: UnaryOperator::Negate, .. }));
    }

    #[test]
    fn unclosed_group_is_an_error() {
        assert_eq!(parse("(1"), Err(ParseError::UnexpectedEndOfInput { line: 1 }));
    }

    #[test]
    fn deep_groups_are_rejected_without_overflowing() {
        let depth = 10_000;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(parse(&source), Err(ParseError::NestingTooDeep { line: 1 }));
    }

    #[test]
    fn long_prefix_chains_are_bounded() {
        let source = format!("{}1", "- ".repeat(10_000));
        assert_eq!(parse(&source), Err(ParseError::NestingTooDeep { line: 1 }));

        let source = format!("{}1", "NOT ".repeat(100));
        assert!(parse(&source).is_ok());
    }
}
