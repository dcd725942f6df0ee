//! Parse error types
//!
//! Every grammar mismatch is a normal failure: the parser stops at the first
//! one and reports it. There is no resynchronization.

use super::grammar::NonTerminal;
use crate::lexer::token::{TerminalKind, Token};
use std::fmt;

#[derive(Debug, Clone)]
pub enum ParseError {
    /// The symbol stack requires a terminal the input does not provide.
    TerminalMismatch { expected: TerminalKind, found: Token },

    /// No table entry for the nonterminal under the current lookahead.
    TableMiss { nonterminal: NonTerminal, found: Token },

    /// A complete expression was followed by more input.
    TrailingInput { found: Token },

    /// The channel closed before the end-of-input sentinel arrived.
    StreamClosed,

    /// An expansion named a nonterminal with no open node in the tree.
    NoPendingNode { nonterminal: NonTerminal },

    /// A nonterminal-tagged token whose lexeme names no grammar symbol.
    UnknownNonTerminal { name: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TerminalMismatch { expected, found } => {
                write!(f, "Parse error: expected '{}', found {}", expected, found)
            }
            ParseError::TableMiss { nonterminal, found } => {
                write!(
                    f,
                    "Parse error: unexpected {} while expanding {}",
                    found, nonterminal
                )
            }
            ParseError::TrailingInput { found } => {
                write!(f, "Parse error: unexpected {} after complete expression", found)
            }
            ParseError::StreamClosed => {
                write!(f, "Parse error: token stream ended without an end-of-input marker")
            }
            ParseError::NoPendingNode { nonterminal } => {
                write!(f, "Syntax tree has no open {} node to expand", nonterminal)
            }
            ParseError::UnknownNonTerminal { name } => {
                write!(f, "Unknown nonterminal '{}'", name)
            }
        }
    }
}

impl std::error::Error for ParseError {}
