use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::ParseResult,
            statement::{parse_let, parse_statement},
            utils::{nested, skip_separators},
        },
    },
};

/// Parses the body of a compound statement.
///
/// A body consists of zero or more statements separated by `:` or newlines.
/// Parsing continues until a token accepted by `is_end` is found; that token
/// is consumed and returned so callers can tell `ELSE` from `ENDIF`.
///
/// Grammar: `block := (separator* statement)* separator* END`
///
/// # Parameters
/// - `tokens`: Token stream positioned after the opening header.
/// - `is_end`: Predicate recognizing the closing keyword(s).
/// - `line`: Line of the opening keyword, reported if the input ends.
///
/// # Returns
/// The statements of the body and the closing token with its line.
///
/// # Errors
/// - `UnexpectedEndOfInput` if the input ends before a closing keyword.
/// - `NestingTooDeep` when bodies nest too deeply.
/// - Propagates any statement parse error.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>,
                          is_end: impl Fn(&Token) -> bool,
                          line: usize)
                          -> ParseResult<(Vec<Statement>, &'a (Token, usize))>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    nested(tokens, |tokens| {
        let mut statements = Vec::new();

        loop {
            skip_separators(tokens);

            match tokens.peek() {
                None => return Err(ParseError::UnexpectedEndOfInput { line }),
                Some((tok, _)) if is_end(tok) => break,
                Some((Token::Let, _)) => statements.extend(parse_let(tokens)?),
                Some(_) => statements.push(parse_statement(tokens)?),
            }
        }

        let end = tokens.next()
                        .ok_or(ParseError::UnexpectedEndOfInput { line })?;
        Ok((statements, end))
    })
}
