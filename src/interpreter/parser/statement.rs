use std::iter::Peekable;

use crate::{
    ast::{Expr, ForLoop, Statement, SubroutineDef, Target},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{
                at_statement_end, expect, expect_statement_end, parse_comma_separated,
                parse_identifier, peek_line, ran_out,
            },
        },
    },
};

/// Parses a single statement.
///
/// The leading token selects the statement form. An identifier starts either
/// a call (`NAME(args)`) or an implicit assignment (`NAME = value`,
/// `NAME[k] = value`).
///
/// `LET` may declare several assignments at once, so it is handled by
/// [`parse_let`] and dispatched by the callers that own a statement list.
///
/// Every statement must be followed by a separator, the end of input or a
/// keyword closing the enclosing block.
///
/// # Parameters
/// - `tokens`: Token iterator containing `(Token, line)` pairs.
///
/// # Returns
/// A parsed [`Statement`] node.
///
/// # Errors
/// - `NestedSubroutine` for a `SUB` outside the top level.
/// - `InvalidAssignmentTarget` for a statement that starts like an
///   expression but is not a call or an assignment.
/// - `UnexpectedToken` for a second statement on the same line without `:`.
/// - `UnexpectedToken`/`UnexpectedEndOfInput` for anything else malformed.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let statement = parse_statement_body(tokens)?;
    expect_statement_end(tokens)?;
    Ok(statement)
}

fn parse_statement_body<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let Some((token, line)) = tokens.peek() else {
        return Err(ran_out());
    };
    let line = *line;

    match token {
        Token::Print => parse_print(tokens, line),
        Token::Dim => parse_dim(tokens, line),
        Token::If => parse_if(tokens, line),
        Token::For => parse_for(tokens, line),
        Token::While => parse_while(tokens, line),
        Token::Return => parse_return(tokens, line),
        Token::Call => {
            tokens.next();
            let (name, arguments) = parse_invocation(tokens, line)?;
            Ok(Statement::Call { name,
                                 arguments,
                                 line })
        },
        Token::Command => {
            tokens.next();
            let (name, arguments) = parse_invocation(tokens, line)?;
            Ok(Statement::Command { name,
                                    arguments,
                                    line })
        },
        Token::Abort => {
            tokens.next();
            Ok(Statement::Abort { line })
        },
        Token::Rem(text) => {
            tokens.next();
            Ok(Statement::Remark { text: text.clone(),
                                   line })
        },
        Token::Sub => Err(ParseError::NestedSubroutine { line }),
        Token::Identifier(_) => parse_identifier_statement(tokens, line),
        Token::Integer(_)
        | Token::Real(_)
        | Token::Str(_)
        | Token::Bool(_)
        | Token::LParen
        | Token::Minus
        | Token::Not => Err(ParseError::InvalidAssignmentTarget { line }),
        tok => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line }),
    }
}

/// Parses `LET target = value [, target = value]*`.
///
/// Each comma-separated assignment becomes its own statement, executed left
/// to right.
///
/// # Example
/// ```
/// use hostbasic::interpreter::{lexer::tokenize, parser::statement::parse_let};
///
/// let tokens = tokenize("LET a = 1, b[2] = 3").unwrap();
/// let statements = parse_let(&mut tokens.iter().peekable()).unwrap();
///
/// assert_eq!(statements.len(), 2);
/// ```
///
/// # Errors
/// Propagates malformed targets and values, and rejects anything but a
/// statement end after the last assignment.
pub fn parse_let<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = peek_line(tokens, 1);
    expect(tokens, &Token::Let, line)?;
    let mut statements = vec![parse_assignment(tokens, line)?];
    while let Some((Token::Comma, _)) = tokens.peek() {
        tokens.next();
        let line = peek_line(tokens, line);
        statements.push(parse_assignment(tokens, line)?);
    }
    expect_statement_end(tokens)?;
    Ok(statements)
}

/// Parses a top-level subroutine definition.
///
/// ```text
///     SUB NAME(A, B)
///         ...
///     ENDSUB
/// ```
///
/// The parameter list may be omitted for a subroutine without parameters.
///
/// # Errors
/// - `NestedSubroutine` if the body contains another `SUB`.
/// - `UnexpectedEndOfInput` if `ENDSUB` is missing.
pub fn parse_subroutine<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<SubroutineDef>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let line = peek_line(tokens, 1);
    expect(tokens, &Token::Sub, line)?;
    let name = parse_identifier(tokens)?;

    let params = if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        parse_comma_separated(tokens, parse_identifier, &Token::RParen, line)?
    } else {
        Vec::new()
    };

    let (body, _) = parse_block(tokens, |tok| matches!(tok, Token::EndSub), line)?;

    Ok(SubroutineDef { name,
                       params,
                       body,
                       line })
}

/// Parses an assignment target followed by `=` and a value.
///
/// Grammar: `assignment := IDENT ("[" expression "]")* "=" expression`
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = parse_identifier(tokens)?;

    let mut indices = Vec::new();
    while let Some((Token::LBracket, index_line)) = tokens.peek() {
        let index_line = *index_line;
        tokens.next();
        indices.push(parse_expression(tokens)?);
        expect(tokens, &Token::RBracket, index_line)?;
    }

    match tokens.next() {
        Some((Token::Equals, _)) => {},
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: format!("Expected '=' in assignment, found {tok:?}"),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    }

    let value = parse_expression(tokens)?;
    Ok(Statement::Assignment { target: Target { name, indices },
                               value,
                               line })
}

/// Parses a statement that starts with an identifier.
///
/// `NAME(args)` is a call whose result is discarded; anything else must be an
/// implicit assignment.
fn parse_identifier_statement<'a, I>(tokens: &mut Peekable<I>,
                                     line: usize)
                                     -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let mut lookahead = tokens.clone();
    lookahead.next();
    if let Some((Token::LParen, _)) = lookahead.peek() {
        let (name, arguments) = parse_invocation(tokens, line)?;
        return Ok(Statement::Call { name,
                                    arguments,
                                    line });
    }
    parse_assignment(tokens, line)
}

/// Parses `NAME` or `NAME(args)` after `CALL` or `COMMAND`.
fn parse_invocation<'a, I>(tokens: &mut Peekable<I>,
                           line: usize)
                           -> ParseResult<(String, Vec<Expr>)>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    let name = parse_identifier(tokens)?;
    let arguments = if let Some((Token::LParen, _)) = tokens.peek() {
        tokens.next();
        parse_comma_separated(tokens, parse_expression, &Token::RParen, line)?
    } else {
        Vec::new()
    };
    Ok((name, arguments))
}

/// Parses `PRINT [expression ("," expression)*]`.
fn parse_print<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();

    let mut arguments = Vec::new();
    if !at_statement_end(tokens) {
        arguments.push(parse_expression(tokens)?);
        while let Some((Token::Comma, _)) = tokens.peek() {
            tokens.next();
            arguments.push(parse_expression(tokens)?);
        }
    }
    Ok(Statement::Print { arguments, line })
}

/// Parses `DIM NAME` or `DIM NAME[key]`.
fn parse_dim<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let name = parse_identifier(tokens)?;

    let index = if let Some((Token::LBracket, _)) = tokens.peek() {
        tokens.next();
        let index = parse_expression(tokens)?;
        expect(tokens, &Token::RBracket, line)?;
        Some(index)
    } else {
        None
    };

    Ok(Statement::Dim { name, index, line })
}

/// Parses `IF cond THEN ... [ELSE ...] ENDIF`.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let condition = parse_expression(tokens)?;
    expect(tokens, &Token::Then, line)?;

    let (then_branch, (end, else_line)) =
        parse_block(tokens, |tok| matches!(tok, Token::Else | Token::EndIf), line)?;

    let else_branch = if *end == Token::Else {
        let (statements, _) = parse_block(tokens, |tok| matches!(tok, Token::EndIf), *else_line)?;
        Some(statements)
    } else {
        None
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       line })
}

/// Parses `FOR var = start TO end [STEP step] ... NEXT [var]`.
///
/// # Errors
/// `MismatchedNext` when `NEXT` names a different variable.
fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let var = parse_identifier(tokens)?;
    expect(tokens, &Token::Equals, line)?;
    let start = parse_expression(tokens)?;
    expect(tokens, &Token::To, line)?;
    let end = parse_expression(tokens)?;

    let step = if let Some((Token::Step, _)) = tokens.peek() {
        tokens.next();
        Some(parse_expression(tokens)?)
    } else {
        None
    };

    let (body, (_, next_line)) = parse_block(tokens, |tok| matches!(tok, Token::Next), line)?;

    if let Some((Token::Identifier(found), _)) = tokens.peek() {
        if *found != var {
            return Err(ParseError::MismatchedNext { expected: var,
                                                    found:    found.clone(),
                                                    line:     *next_line, });
        }
        tokens.next();
    }

    Ok(Statement::For { context: ForLoop { var,
                                           start,
                                           end,
                                           step,
                                           body },
                        line })
}

/// Parses `WHILE cond ... WEND`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let condition = parse_expression(tokens)?;
    let (body, _) = parse_block(tokens, |tok| matches!(tok, Token::Wend), line)?;

    Ok(Statement::While { condition,
                          body,
                          line })
}

/// Parses `RETURN [expression]`.
fn parse_return<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)> + Clone
{
    tokens.next();
    let value = if at_statement_end(tokens) {
        None
    } else {
        Some(parse_expression(tokens)?)
    };
    Ok(Statement::Return { value, line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::lexer::tokenize;

    fn parse(source: &str) -> ParseResult<Statement> {
        let tokens = tokenize(source).unwrap();
        parse_statement(&mut tokens.iter().peekable())
    }

    #[test]
    fn implicit_assignment_with_indices() {
        let Statement::Assignment { target, .. } = parse("grid[1][2] = 5").unwrap() else {
            panic!("expected an assignment");
        };
        assert_eq!(target.name, "GRID");
        assert_eq!(target.indices.len(), 2);
    }

    #[test]
    fn bare_call_is_a_call_statement() {
        assert!(matches!(parse("hit(3)").unwrap(), Statement::Call { .. }));
    }

    #[test]
    fn if_with_else_on_one_line() {
        let Statement::If { then_branch,
                            else_branch,
                            .. } = parse("IF a THEN b = 1 ELSE b = 2 ENDIF").unwrap()
        else {
            panic!("expected an if");
        };
        assert_eq!(then_branch.len(), 1);
        assert_eq!(else_branch.map(|b| b.len()), Some(1));
    }

    #[test]
    fn for_rejects_mismatched_next() {
        assert_eq!(parse("FOR i = 1 TO 3\nNEXT j"),
                   Err(ParseError::MismatchedNext { expected: "I".to_string(),
                                                    found:    "J".to_string(),
                                                    line:     2, }));
    }

    #[test]
    fn nested_sub_is_rejected() {
        assert_eq!(parse("SUB inner\nENDSUB"), Err(ParseError::NestedSubroutine { line: 1 }));
    }

    #[test]
    fn expression_statement_is_rejected() {
        assert_eq!(parse("1 + 2"), Err(ParseError::InvalidAssignmentTarget { line: 1 }));
    }

    #[test]
    fn statements_need_a_separator() {
        assert_eq!(parse("FOO(1) PRINT 2"),
                   Err(ParseError::UnexpectedToken { token: "Expected end of statement, found Print"
                                                                .to_string(),
                                                     line:  1, }));
        assert!(matches!(parse("X = 1 Y = 2"), Err(ParseError::UnexpectedToken { line: 1, .. })));
        assert!(matches!(parse("CALL FOO 3"), Err(ParseError::UnexpectedToken { line: 1, .. })));
        assert!(parse("FOO(1) : PRINT 2").is_ok());
        assert!(parse("IF X THEN FOO(1) ELSE X = 2 ENDIF").is_ok());
    }

    #[test]
    fn unterminated_while_reports_opening_line() {
        assert_eq!(parse("WHILE TRUE\nPRINT 1"),
                   Err(ParseError::UnexpectedEndOfInput { line: 1 }));
    }
}
