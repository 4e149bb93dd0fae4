use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language. Keywords are
/// matched without regard to ASCII case.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Numeric literal tokens, such as `3.14`, `.5`, `2.0` or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", parse_float)]
    Real(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens in double or single quotes, such as `"STR"` or
    /// `'STR'`. The payload is the unescaped content.
    #[regex(r#""([^"\\\n\r]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n\r]|\\.)*'", parse_string)]
    Str(String),
    /// Boolean literal tokens, `TRUE` or `FALSE`.
    #[token("true", parse_bool, ignore(case))]
    #[token("false", parse_bool, ignore(case))]
    Bool(bool),
    /// `REM` comments; the payload is the remark text without the keyword.
    #[regex(r"[Rr][Ee][Mm]([ \t][^\n\r]*)?", parse_remark, allow_greedy = true)]
    Rem(String),
    /// `LET`
    #[token("let", ignore(case))]
    Let,
    /// `DIM`
    #[token("dim", ignore(case))]
    Dim,
    /// `PRINT`
    #[token("print", ignore(case))]
    Print,
    /// `IF`
    #[token("if", ignore(case))]
    If,
    /// `THEN`
    #[token("then", ignore(case))]
    Then,
    /// `ELSE`
    #[token("else", ignore(case))]
    Else,
    /// `ENDIF`
    #[token("endif", ignore(case))]
    EndIf,
    /// `FOR`
    #[token("for", ignore(case))]
    For,
    /// `TO`
    #[token("to", ignore(case))]
    To,
    /// `STEP`
    #[token("step", ignore(case))]
    Step,
    /// `NEXT`
    #[token("next", ignore(case))]
    Next,
    /// `WHILE`
    #[token("while", ignore(case))]
    While,
    /// `WEND`
    #[token("wend", ignore(case))]
    Wend,
    /// `SUB`
    #[token("sub", ignore(case))]
    Sub,
    /// `ENDSUB`
    #[token("endsub", ignore(case))]
    EndSub,
    /// `RETURN`
    #[token("return", ignore(case))]
    Return,
    /// `CALL`
    #[token("call", ignore(case))]
    Call,
    /// `COMMAND`
    #[token("command", ignore(case))]
    Command,
    /// `ABORT`
    #[token("abort", ignore(case))]
    Abort,
    /// `AND` or `&&`
    #[token("and", ignore(case))]
    #[token("&&")]
    And,
    /// `OR` or `||`
    #[token("or", ignore(case))]
    #[token("||")]
    Or,
    /// `XOR`
    #[token("xor", ignore(case))]
    Xor,
    /// `NOT` or `!`
    #[token("not", ignore(case))]
    #[token("!")]
    Not,
    /// Identifier tokens; variable, subroutine or native names such as `hp`
    /// or `STAT`. The payload is canonicalized to upper case.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_ascii_uppercase())]
    Identifier(String),
    /// `->`; lexed for host tooling, not accepted by any statement.
    #[token("->")]
    Arrow,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`, the statement separator.
    #[token(":")]
    Colon,
    /// `=`
    #[token("=")]
    Equals,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=` or `<>`
    #[token("!=")]
    #[token("<>")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,

    /// Line terminators, which also separate statements.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Token::NewLine
    })]
    NewLine,
    /// Spaces, tabs, feeds and carriage returns.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Returns `true` for tokens that separate statements (`:` and newlines).
    #[must_use]
    pub const fn is_separator(&self) -> bool {
        matches!(self, Self::Colon | Self::NewLine)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
/// Automatically resets or increments as newlines are processed.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Converts source text into `(token, line)` pairs.
///
/// Lexing stops at the first malformed token, which is reported as a syntax
/// error carrying the line it appeared on.
///
/// # Errors
/// - `UnterminatedString` for a quote with no closing quote on its line.
/// - `LiteralTooLarge` for an integer literal that does not fit in `i64`.
/// - `InvalidCharacter` for anything else the lexer cannot match.
///
/// # Example
/// ```
/// use hostbasic::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("let a = 2").unwrap();
/// assert_eq!(tokens[0], (Token::Let, 1));
/// assert_eq!(tokens[1], (Token::Identifier("A".to_string()), 1));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        match token {
            // Newlines bump the counter before we see them.
            Ok(Token::NewLine) => tokens.push((Token::NewLine, line - 1)),
            Ok(tok) => tokens.push((tok, line)),
            Err(()) => {
                let slice = lexer.slice();
                return Err(if slice.starts_with(['"', '\'']) {
                               ParseError::UnterminatedString { line }
                           } else if slice.starts_with(|c: char| c.is_ascii_digit()) {
                               ParseError::LiteralTooLarge { line }
                           } else {
                               ParseError::InvalidCharacter { found: slice.to_string(),
                                                              line }
                           });
            },
        }
    }

    Ok(tokens)
}

/// Parses a floating-point literal from the current token slice.
///
/// # Returns
/// - `Some(f64)`: The parsed floating-point value if successful.
/// - `None`: If the token slice is not a valid float.
fn parse_float(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}
/// Parses an integer literal from the current token slice.
///
/// # Returns
/// - `Some(i64)`: The parsed integer value if successful.
/// - `None`: If the literal overflows `i64`.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}
/// Parses a boolean literal from the current token slice.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
/// Strips the quotes from a string literal and resolves its escapes.
///
/// Recognized escapes are `\n`, `\t`, `\\`, `\"` and `\'`; any other escaped
/// character is kept as written.
fn parse_string(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            other @ ('\\' | '"' | '\'') => out.push(other),
            other => {
                out.push('\\');
                out.push(other);
            },
        }
    }
    Some(out)
}
/// Extracts the remark text following `REM`.
fn parse_remark(lex: &logos::Lexer<Token>) -> String {
    lex.slice()[3..].trim().to_string()
}
