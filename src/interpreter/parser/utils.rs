use std::{cell::Cell, iter::Peekable};

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
    util::stack::ensure_sufficient_stack,
};

/// Deepest nesting of expressions and blocks the parser accepts.
///
/// Every parenthesized group, index, argument list, prefix operator and
/// statement body counts as one level.
pub const MAX_NESTING_DEPTH: usize = 256;

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// Releases one nesting level when a nested parse finishes.
struct NestingGuard;

impl Drop for NestingGuard {
    fn drop(&mut self) {
        NESTING.set(NESTING.get().saturating_sub(1));
    }
}

/// Runs `parse` one nesting level deeper.
///
/// The level is released again on every exit path, so the counter is back at
/// zero once a parse returns. The parse runs on a grown stack when little
/// native stack is left.
///
/// # Errors
/// - `NestingTooDeep` with the line of the next token once more than
///   [`MAX_NESTING_DEPTH`] levels are open.
/// - Propagates any error from `parse`.
pub(in crate::interpreter::parser) fn nested<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse: impl FnOnce(&mut Peekable<I>) -> ParseResult<T>)
    -> ParseResult<T>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((_, line)) = tokens.peek() else {
        return parse(tokens);
    };
    let line = *line;

    let depth = NESTING.get() + 1;
    NESTING.set(depth);
    let _guard = NestingGuard;

    if depth > MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep { line });
    }
    ensure_sufficient_stack(|| parse(tokens))
}

/// Error for input that ran out where no opening line is at hand.
///
/// [`parse_program`](crate::interpreter::parser::core::parse_program) moves
/// it to the last line of the source.
pub(in crate::interpreter::parser) const fn ran_out() -> ParseError {
    ParseError::UnexpectedEndOfInput { line: 0 }
}

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by call argument lists and subroutine parameter
/// lists. It repeatedly calls `parse_item` to parse one element, expecting
/// either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `)`).
/// - `line`: Line of the opening token, reported if the input ends.
///
/// # Returns
/// A vector of parsed items.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    line: usize)
    -> Result<Vec<T>, ParseError>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected ',' or {closing:?}, found {tok:?}"),
                                                         line:  *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its canonical name.
///
/// The next token must be `Token::Identifier`.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at an identifier.
///
/// # Returns
/// A `String` containing the identifier.
///
/// # Errors
/// Returns a `ParseError` if:
/// - the next token is not an identifier,
/// - the input ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected identifier, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ran_out()),
    }
}

/// Consumes the next token, which must equal `expected`.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `expected`: The required token.
/// - `line`: Line reported if the input ends.
///
/// # Returns
/// The line of the consumed token.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    line: usize)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, l)) if tok == expected => Ok(*l),
        Some((tok, l)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected {expected:?}, found {tok:?}"),
                                              line:  *l, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Skips any run of statement separators (`:` and newlines).
pub(in crate::interpreter::parser) fn skip_separators<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a (Token, usize)>
{
    while let Some((tok, _)) = tokens.peek()
          && tok.is_separator()
    {
        tokens.next();
    }
}

/// Returns `true` if the next token ends the current statement.
///
/// A statement ends at a separator, at the end of input, or at a keyword that
/// closes an enclosing block, which allows `IF A THEN PRINT A ENDIF` on one
/// line.
pub(in crate::interpreter::parser) fn at_statement_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.peek() {
        None => true,
        Some((tok, _)) => {
            tok.is_separator()
            || matches!(tok,
                        Token::Else | Token::EndIf | Token::Next | Token::Wend | Token::EndSub)
        },
    }
}

/// Requires the current statement to end at the next token.
///
/// # Errors
/// `UnexpectedToken` when anything but a statement end follows, such as a
/// second statement on the same line without a `:`.
pub(in crate::interpreter::parser) fn expect_statement_end<'a, I>(tokens: &mut Peekable<I>)
                                                                  -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    if at_statement_end(tokens) {
        return Ok(());
    }
    match tokens.peek() {
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected end of statement, found {tok:?}"),
                                              line:  *line, })
        },
        None => Ok(()),
    }
}

/// Returns the line of the next token, or `fallback` at the end of input.
pub(in crate::interpreter::parser) fn peek_line<'a, I>(tokens: &mut Peekable<I>,
                                                       fallback: usize)
                                                       -> usize
    where I: Iterator<Item = &'a (Token, usize)>
{
    tokens.peek().map_or(fallback, |(_, line)| *line)
}
