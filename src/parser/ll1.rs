//! Table-driven LL(1) parser
//!
//! The parser consumes tokens from a [`TokenChannel`] while the lexer is
//! still producing them. Every expansion is recorded in a [`SyntaxTree`] as
//! it happens, so the finished tree is the full derivation.

use super::errors::ParseError;
use super::grammar::{GrammarSymbol, NonTerminal, ParsingTable};
use super::tree::SyntaxTree;
use crate::channel::TokenChannel;
use crate::lexer::token::{TerminalKind, Token};

pub struct Ll1Parser<'c> {
    channel: &'c TokenChannel,
    table: ParsingTable,
    stack: Vec<GrammarSymbol>,
    tree: SyntaxTree,
}

impl<'c> Ll1Parser<'c> {
    pub fn new(channel: &'c TokenChannel) -> Self {
        Self::with_table(channel, ParsingTable::arithmetic())
    }

    pub fn with_table(channel: &'c TokenChannel, table: ParsingTable) -> Self {
        Ll1Parser {
            channel,
            table,
            stack: Vec::new(),
            tree: SyntaxTree::new(),
        }
    }

    /// Parse one expression, optionally terminated by `;`, up to the
    /// end-of-input sentinel.
    pub fn parse(mut self) -> Result<SyntaxTree, ParseError> {
        let start = NonTerminal::Expr;
        self.stack = vec![GrammarSymbol::End, GrammarSymbol::NonTerminal(start)];
        self.tree.insert(None, vec![start.token()])?;

        loop {
            let lookahead = self.peek()?;
            match self.stack.last().copied() {
                None | Some(GrammarSymbol::End) => {
                    self.finish(lookahead)?;
                    return Ok(self.tree);
                }
                Some(GrammarSymbol::Terminal(expected)) => {
                    if lookahead.kind != expected {
                        return Err(ParseError::TerminalMismatch {
                            expected,
                            found: lookahead,
                        });
                    }
                    self.stack.pop();
                    self.channel.pop();
                }
                Some(GrammarSymbol::NonTerminal(nonterminal)) => {
                    self.expand(nonterminal, lookahead)?;
                }
            }
        }
    }

    fn peek(&self) -> Result<Token, ParseError> {
        self.channel.consume().ok_or(ParseError::StreamClosed)
    }

    fn expand(&mut self, nonterminal: NonTerminal, lookahead: Token) -> Result<(), ParseError> {
        let production = match self.table.get(nonterminal, lookahead.kind) {
            Some(production) => production.to_vec(),
            None => {
                return Err(ParseError::TableMiss {
                    nonterminal,
                    found: lookahead,
                })
            }
        };

        self.stack.pop();
        self.stack.extend(production.iter().rev().copied());

        let children = production
            .iter()
            .enumerate()
            .map(|(position, symbol)| match *symbol {
                GrammarSymbol::Terminal(kind) if position == 0 && kind == lookahead.kind => {
                    lookahead.clone()
                }
                GrammarSymbol::Terminal(kind) => {
                    Token::new(kind.canonical().unwrap_or_default(), kind)
                }
                GrammarSymbol::NonTerminal(child) => child.token(),
                GrammarSymbol::End => Token::end_of_input(),
            })
            .collect();
        self.tree.insert(Some(nonterminal), children)
    }

    /// The symbol stack is down to `$`: accept `;` then end of input.
    fn finish(&mut self, lookahead: Token) -> Result<(), ParseError> {
        let sentinel = if lookahead.kind == TerminalKind::Semicolon {
            self.channel.pop();
            self.peek()?
        } else {
            lookahead
        };

        if !sentinel.is_end_of_input() {
            return Err(ParseError::TrailingInput { found: sentinel });
        }
        self.channel.pop();
        self.stack.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn lexed(source: &str) -> TokenChannel {
        let channel = TokenChannel::new();
        Lexer::new().run_reader(source.as_bytes(), &channel).unwrap();
        channel
    }

    fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
        let channel = lexed(source);
        Ll1Parser::new(&channel).parse()
    }

    #[test]
    fn test_parse_simple_expressions() {
        for source in ["3", "3+4*2", "(3+4)*2;", "a/b-c", "1.5*x;", "((1))"] {
            let tree = parse(source).unwrap_or_else(|e| panic!("{}: {}", source, e));
            assert!(!tree.has_pending(), "{}", source);
        }
    }

    #[test]
    fn test_terminal_tokens_keep_lexemes() {
        let tree = parse("12*x").unwrap();
        let terminals: Vec<(TerminalKind, &str)> = tree
            .terminals()
            .iter()
            .map(|t| (t.kind, t.lexeme.as_str()))
            .collect();
        assert_eq!(
            terminals,
            vec![
                (TerminalKind::IntLiteral, "12"),
                (TerminalKind::ArithmeticOpMult, "*"),
                (TerminalKind::Id, "x"),
            ]
        );
    }

    #[test]
    fn test_consumes_whole_stream() {
        let channel = lexed("1+2;");
        Ll1Parser::new(&channel).parse().unwrap();
        assert!(channel.is_empty());
    }

    #[test]
    fn test_table_miss_on_assignment() {
        match parse("x=1+2;") {
            Err(ParseError::TableMiss { nonterminal, found }) => {
                assert_eq!(nonterminal, NonTerminal::Factor);
                assert_eq!(found.kind, TerminalKind::AssignmentOp);
            }
            other => panic!("expected table miss, got {:?}", other),
        }
    }

    #[test]
    fn test_terminal_mismatch_on_missing_bracket() {
        assert!(matches!(
            parse("(1+2;"),
            Err(ParseError::TerminalMismatch {
                expected: TerminalKind::ClosingBracket,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_input_is_table_miss() {
        assert!(matches!(
            parse(""),
            Err(ParseError::TableMiss {
                nonterminal: NonTerminal::Expr,
                ..
            })
        ));
    }

    #[test]
    fn test_trailing_input() {
        assert!(matches!(
            parse("1+2) "),
            Err(ParseError::TrailingInput { .. })
        ));
        match parse("1; 2") {
            Err(ParseError::TrailingInput { found }) => assert_eq!(found.lexeme, "2"),
            other => panic!("expected trailing input, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_stream_without_sentinel() {
        let channel = TokenChannel::new();
        channel.produce(Token::new("1", TerminalKind::IntLiteral));
        channel.close();
        assert!(matches!(
            Ll1Parser::new(&channel).parse(),
            Err(ParseError::StreamClosed)
        ));
    }
}
