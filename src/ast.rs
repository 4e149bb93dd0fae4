use std::{collections::HashMap, sync::Arc};

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw, constant values that can appear directly in
/// source code: integers, reals, booleans and strings. It is embedded in
/// [`Expr::Literal`] and converted into a runtime `Variant` on evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Real(f64),
    /// A boolean literal value: `TRUE` or `FALSE`.
    Bool(bool),
    /// A string literal, already unescaped.
    Str(String),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Operators are plain enum tags; only the leaf variants (literal, variable,
/// index and call) carry node-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable in the active frame.
    Variable {
        /// Canonical (upper-case) name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Array element read (e.g. `MEMO[n]`).
    Index {
        /// The expression producing the array handle.
        target: Box<Self>,
        /// The key expression.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A unary operation (negation or logical not).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary operation (arithmetic, comparison or logic).
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Call of a subroutine, native or built-in (e.g. `ADD(1, 2)`).
    Call {
        /// Canonical name of the callee.
        name:      String,
        /// Arguments, evaluated left to right.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use hostbasic::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "X".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::Index { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Call { line, .. } => *line,
        }
    }
}

/// The storage location written by an assignment.
///
/// `A` has no indices; `A[i][j]` has two.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    /// Canonical name of the variable.
    pub name:    String,
    /// Index expressions, outermost first.
    pub indices: Vec<Expr>,
}

/// Represents a user-defined subroutine.
///
/// Identity for registration and dispatch is the pair of name and parameter
/// count, see [`SubroutineKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubroutineDef {
    /// Canonical name of the subroutine.
    pub name:   String,
    /// The parameter names, in call order.
    pub params: Vec<String>,
    /// The statements executed on each call.
    pub body:   Vec<Statement>,
    /// Line number of the `SUB` keyword.
    pub line:   usize,
}

impl SubroutineDef {
    /// Returns the registry key of this subroutine.
    #[must_use]
    pub fn key(&self) -> SubroutineKey {
        (self.name.clone(), self.params.len())
    }
}

/// Registry key of a callable: canonical name and argument count.
pub type SubroutineKey = (String, usize);

/// Subroutines of a program, shared between every context that runs it.
pub type SubroutineTable = HashMap<SubroutineKey, Arc<SubroutineDef>>;

/// Parsed `FOR` loop header and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// The loop variable name.
    pub var:   String,
    /// Initial value, assigned once.
    pub start: Expr,
    /// Inclusive bound, evaluated once.
    pub end:   Expr,
    /// Optional step, evaluated once; defaults to 1.
    pub step:  Option<Expr>,
    /// The loop body.
    pub body:  Vec<Statement>,
}

/// Represents a statement.
///
/// Statements are executed in order by the evaluator; each execution yields a
/// flow signal that tells enclosing blocks whether to continue. Blocks are
/// plain `Vec<Statement>` sequences owned by the compound statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `LET A = 1`, `A[k] = v` or the implicit form without `LET`.
    Assignment {
        /// Where the value is written.
        target: Target,
        /// The value which is being assigned.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// `DIM A` or `DIM A[k]`.
    Dim {
        /// Canonical name of the variable.
        name:  String,
        /// Key of the slot to clear, if any.
        index: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `IF cond THEN ... ELSE ... ENDIF`.
    If {
        /// The condition expression.
        condition:   Expr,
        /// Statements run when the condition holds.
        then_branch: Vec<Self>,
        /// Statements run otherwise, if an `ELSE` was given.
        else_branch: Option<Vec<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `WHILE cond ... WEND`.
    While {
        /// Condition re-evaluated before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `FOR var = start TO end STEP step ... NEXT`.
    For {
        /// Header and body of the loop.
        context: ForLoop,
        /// Line number in the source code.
        line:    usize,
    },
    /// `RETURN` with an optional value.
    Return {
        /// The returned expression.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `CALL NAME(args)`, discarding the result.
    Call {
        /// Canonical name of the callee.
        name:      String,
        /// Arguments, evaluated left to right.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `PRINT a, b, ...`.
    Print {
        /// Values rendered and joined with a single space.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `COMMAND NAME(args)`, forwarded to the host command hook.
    Command {
        /// Canonical name of the command.
        name:      String,
        /// Arguments, evaluated left to right.
        arguments: Vec<Expr>,
        /// Line number in the source code.
        line:      usize,
    },
    /// `ABORT`.
    Abort {
        /// Line number in the source code.
        line: usize,
    },
    /// `REM text`, forwarded to the host log hook.
    Remark {
        /// The comment text.
        text: String,
        /// Line number in the source code.
        line: usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Assignment { line, .. }
            | Self::Dim { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Return { line, .. }
            | Self::Call { line, .. }
            | Self::Print { line, .. }
            | Self::Command { line, .. }
            | Self::Abort { line }
            | Self::Remark { line, .. } => *line,
        }
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic, comparisons and logic.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Remainder (`%`)
    Mod,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==` or `=`)
    Equal,
    /// Not equal to (`!=` or `<>`)
    NotEqual,
    /// Logical exclusive or (`XOR`)
    Xor,
    /// Logical and (`AND`, `&&`)
    And,
    /// Logical or (`OR`, `||`)
    Or,
}
/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (e.g. `-x`).
    Negate,
    /// Logical NOT (e.g. `NOT x`).
    Not,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
            Sub, Xor,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            Xor => "XOR",
            And => "AND",
            Or => "OR",
        };
        write!(f, "{operator}")
    }
}
