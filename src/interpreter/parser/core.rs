use std::{iter::Peekable, sync::Arc};

use crate::{
    ast::{Expr, Statement, SubroutineTable},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            binary::parse_logical_or,
            statement::{parse_let, parse_statement, parse_subroutine},
            utils::{nested, skip_separators},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, logical `OR`/`XOR`, and
/// recursively descends through the precedence hierarchy.
///
/// Grammar: `expression := logical_or`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node.
///
/// # Errors
/// `NestingTooDeep` when groups, indices and argument lists nest too deeply.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    nested(tokens, parse_logical_or)
}

/// Parses a whole program.
///
/// Top-level statements are collected in order. `SUB` definitions are removed
/// from the statement stream and registered under their name and parameter
/// count; two definitions with the same pair are rejected.
///
/// Grammar: `program := (separator* (sub | statement))* separator*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the start of the source.
///
/// # Returns
/// The top-level statements and the subroutine table.
///
/// # Errors
/// - `DuplicateSubroutine` when a `(name, arity)` pair is defined twice.
/// - `UnexpectedEndOfInput` on the opening line of an unclosed block, or on
///   the last line of the source when nothing else was open.
/// - Propagates any statement or expression parse error.
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>)
                            -> ParseResult<(Vec<Statement>, SubroutineTable)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let last_line = tokens.clone().last().map_or(1, |(_, line)| *line);

    parse_top_level(tokens).map_err(|err| match err {
                               ParseError::UnexpectedEndOfInput { line: 0 } => {
                                   ParseError::UnexpectedEndOfInput { line: last_line }
                               },
                               err => err,
                           })
}

fn parse_top_level<'a, I>(tokens: &mut Peekable<I>)
                          -> ParseResult<(Vec<Statement>, SubroutineTable)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut statements = Vec::new();
    let mut subroutines = SubroutineTable::new();

    loop {
        skip_separators(tokens);

        match tokens.peek() {
            None => break,
            Some((Token::Sub, _)) => {
                let def = parse_subroutine(tokens)?;
                let key = def.key();
                if subroutines.contains_key(&key) {
                    return Err(ParseError::DuplicateSubroutine { name:  key.0,
                                                                 arity: key.1,
                                                                 line:  def.line, });
                }
                subroutines.insert(key, Arc::new(def));
            },
            Some((Token::Let, _)) => statements.extend(parse_let(tokens)?),
            Some(_) => statements.push(parse_statement(tokens)?),
        }
    }

    Ok((statements, subroutines))
}
