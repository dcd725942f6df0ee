//! Grammar symbols and the LL(1) parsing table
//!
//! The covered grammar is the classic left-recursion-free arithmetic
//! expression grammar:
//!
//! ```text
//! E  -> E' S
//! S  -> + E' S | - E' S | ε
//! E' -> T F
//! F  -> * T F | / T F | ε
//! T  -> id | int-literal | float-literal | ( E )
//! ```
//!
//! ε entries are keyed on the follow set of `S`/`F`: `+`, `-`, `)`, `;` and
//! end of input.

use crate::lexer::token::{TerminalKind, Token};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NonTerminal {
    /// `E`
    Expr,
    /// `S`, the additive tail
    Sum,
    /// `E'`
    Term,
    /// `F`, the multiplicative tail
    Factor,
    /// `T`
    Operand,
}

impl NonTerminal {
    pub fn name(self) -> &'static str {
        match self {
            NonTerminal::Expr => "E",
            NonTerminal::Sum => "S",
            NonTerminal::Term => "E'",
            NonTerminal::Factor => "F",
            NonTerminal::Operand => "T",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let nonterminal = match name {
            "E" => NonTerminal::Expr,
            "S" => NonTerminal::Sum,
            "E'" => NonTerminal::Term,
            "F" => NonTerminal::Factor,
            "T" => NonTerminal::Operand,
            _ => return None,
        };
        Some(nonterminal)
    }

    /// Placeholder token stored in the syntax tree for this nonterminal.
    pub fn token(self) -> Token {
        Token::new(self.name(), TerminalKind::NonTerminal)
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An entry of the parser's symbol stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarSymbol {
    Terminal(TerminalKind),
    NonTerminal(NonTerminal),
    /// `$`, the bottom-of-stack marker.
    End,
}

impl fmt::Display for GrammarSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarSymbol::Terminal(kind) => write!(f, "{}", kind),
            GrammarSymbol::NonTerminal(nt) => write!(f, "{}", nt),
            GrammarSymbol::End => write!(f, "$"),
        }
    }
}

/// Right-hand side of a production, left to right. Empty for ε.
pub type Production = Vec<GrammarSymbol>;

/// `(nonterminal, lookahead) -> production`
#[derive(Debug, Clone, Default)]
pub struct ParsingTable {
    entries: FxHashMap<(NonTerminal, TerminalKind), Production>,
}

impl ParsingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for the arithmetic expression grammar.
    pub fn arithmetic() -> Self {
        use GrammarSymbol::{NonTerminal as N, Terminal as T};
        use NonTerminal as NT;
        use TerminalKind as K;

        let operand_starts = [K::Id, K::IntLiteral, K::FloatLiteral, K::OpeningBracket];
        let sum_follow = [K::FileEnd, K::ClosingBracket, K::Semicolon];
        let mut table = ParsingTable::new();

        for kind in operand_starts {
            table.insert(NT::Expr, kind, vec![N(NT::Term), N(NT::Sum)]);
            table.insert(NT::Term, kind, vec![N(NT::Operand), N(NT::Factor)]);
        }

        for op in [K::ArithmeticOpPlus, K::ArithmeticOpMinus] {
            table.insert(NT::Sum, op, vec![T(op), N(NT::Term), N(NT::Sum)]);
        }
        for kind in sum_follow {
            table.insert(NT::Sum, kind, Vec::new());
        }

        for op in [K::ArithmeticOpMult, K::ArithmeticOpDiv] {
            table.insert(NT::Factor, op, vec![T(op), N(NT::Operand), N(NT::Factor)]);
        }
        for kind in sum_follow
            .into_iter()
            .chain([K::ArithmeticOpPlus, K::ArithmeticOpMinus])
        {
            table.insert(NT::Factor, kind, Vec::new());
        }

        for kind in [K::Id, K::IntLiteral, K::FloatLiteral] {
            table.insert(NT::Operand, kind, vec![T(kind)]);
        }
        table.insert(
            NT::Operand,
            K::OpeningBracket,
            vec![T(K::OpeningBracket), N(NT::Expr), T(K::ClosingBracket)],
        );

        table
    }

    pub fn insert(&mut self, nonterminal: NonTerminal, lookahead: TerminalKind, production: Production) {
        self.entries.insert((nonterminal, lookahead), production);
    }

    pub fn get(&self, nonterminal: NonTerminal, lookahead: TerminalKind) -> Option<&[GrammarSymbol]> {
        self.entries
            .get(&(nonterminal, lookahead))
            .map(Vec::as_slice)
    }

    /// Lookaheads with an entry for `nonterminal`, in no particular order.
    pub fn expected(&self, nonterminal: NonTerminal) -> Vec<TerminalKind> {
        self.entries
            .keys()
            .filter(|(nt, _)| *nt == nonterminal)
            .map(|&(_, kind)| kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon_entries_cover_follow_sets() {
        let table = ParsingTable::arithmetic();
        for kind in [
            TerminalKind::FileEnd,
            TerminalKind::ClosingBracket,
            TerminalKind::Semicolon,
        ] {
            assert_eq!(table.get(NonTerminal::Sum, kind), Some(&[][..]));
            assert_eq!(table.get(NonTerminal::Factor, kind), Some(&[][..]));
        }
        assert_eq!(
            table.get(NonTerminal::Factor, TerminalKind::ArithmeticOpPlus),
            Some(&[][..])
        );
        assert!(table
            .get(NonTerminal::Sum, TerminalKind::ArithmeticOpMult)
            .is_none());
    }

    #[test]
    fn test_bracketed_operand() {
        let table = ParsingTable::arithmetic();
        assert_eq!(
            table.get(NonTerminal::Operand, TerminalKind::OpeningBracket),
            Some(
                &[
                    GrammarSymbol::Terminal(TerminalKind::OpeningBracket),
                    GrammarSymbol::NonTerminal(NonTerminal::Expr),
                    GrammarSymbol::Terminal(TerminalKind::ClosingBracket),
                ][..]
            )
        );
    }

    #[test]
    fn test_no_entry_for_assignment() {
        let table = ParsingTable::arithmetic();
        assert!(table
            .get(NonTerminal::Sum, TerminalKind::AssignmentOp)
            .is_none());
        let mut expected = table.expected(NonTerminal::Expr);
        expected.sort_by_key(|k| k.to_string());
        assert_eq!(expected.len(), 4);
    }
}
