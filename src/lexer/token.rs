//! Token and terminal definitions shared by every stage of the pipeline
//!
//! A [`Token`] is the unit handed from the lexer to the parser through the
//! [`TokenChannel`](crate::channel::TokenChannel). The same type is stored in
//! syntax tree nodes and on the evaluator's operand stack, which is why the
//! set of [`TerminalKind`]s also contains the [`TerminalKind::NonTerminal`]
//! marker used for synthesized grammar nodes.

use std::fmt;

/// Closed set of lexical categories recognized by the automata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    Id,
    BuiltinTypeInt,
    BuiltinTypeFloat,
    BuiltinTypeChar,
    ControlFlowBranch,
    ControlFlowWhile,
    ArithmeticOpPlus,
    ArithmeticOpMinus,
    ArithmeticOpMult,
    ArithmeticOpDiv,
    LogicalOp,
    AssignmentOp,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Semicolon,
    OpenScope,
    ClosedScope,
    OpeningBracket,
    ClosingBracket,
    FileEnd,
    NonTerminal,
    Error,
}

impl TerminalKind {
    /// Grammar spelling of the terminal, as it appears in productions.
    ///
    /// `NonTerminal` and `Error` are not grammar terminals and have none.
    pub fn canonical(self) -> Option<&'static str> {
        let name = match self {
            TerminalKind::Id => "id",
            TerminalKind::BuiltinTypeInt => "int",
            TerminalKind::BuiltinTypeFloat => "float",
            TerminalKind::BuiltinTypeChar => "char",
            TerminalKind::ControlFlowBranch => "if",
            TerminalKind::ControlFlowWhile => "while",
            TerminalKind::ArithmeticOpPlus => "+",
            TerminalKind::ArithmeticOpMinus => "-",
            TerminalKind::ArithmeticOpMult => "*",
            TerminalKind::ArithmeticOpDiv => "/",
            TerminalKind::LogicalOp => "logop",
            TerminalKind::AssignmentOp => "=",
            TerminalKind::IntLiteral => "int literal",
            TerminalKind::FloatLiteral => "float literal",
            TerminalKind::StringLiteral => "string literal",
            TerminalKind::Semicolon => ";",
            TerminalKind::OpenScope => "{",
            TerminalKind::ClosedScope => "}",
            TerminalKind::OpeningBracket => "(",
            TerminalKind::ClosingBracket => ")",
            TerminalKind::FileEnd => "eof",
            TerminalKind::NonTerminal | TerminalKind::Error => return None,
        };
        Some(name)
    }

    pub fn is_arithmetic_op(self) -> bool {
        matches!(
            self,
            TerminalKind::ArithmeticOpPlus
                | TerminalKind::ArithmeticOpMinus
                | TerminalKind::ArithmeticOpMult
                | TerminalKind::ArithmeticOpDiv
        )
    }

    pub fn is_numeric_literal(self) -> bool {
        matches!(self, TerminalKind::IntLiteral | TerminalKind::FloatLiteral)
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            Some(name) => write!(f, "{}", name),
            None if *self == TerminalKind::NonTerminal => write!(f, "nonterminal"),
            None => write!(f, "error"),
        }
    }
}

/// Line and column of a byte in the input, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Advance past `byte`, moving to the next line on `\n`.
    pub fn advance(&mut self, byte: u8) {
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

impl Default for SourceLocation {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Immutable lexeme/kind pair.
///
/// Equality compares lexemes only: the parser uses it for grammar-symbol
/// bookkeeping, where a synthesized `E'` placeholder and any other `E'` are
/// the same symbol. Compare `kind` explicitly when lexical category matters.
#[derive(Debug, Clone)]
pub struct Token {
    pub lexeme: String,
    pub kind: TerminalKind,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, kind: TerminalKind) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind,
        }
    }

    /// The end-of-input sentinel emitted after every lexer run.
    pub fn end_of_input() -> Self {
        Self::new("eof", TerminalKind::FileEnd)
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == TerminalKind::FileEnd
    }

    pub fn is_nonterminal(&self) -> bool {
        self.kind == TerminalKind::NonTerminal
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.lexeme == other.lexeme
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TerminalKind::FileEnd => write!(f, "end of input"),
            TerminalKind::NonTerminal => write!(f, "nonterminal {}", self.lexeme),
            kind => write!(f, "{} '{}'", kind, self.lexeme),
        }
    }
}
