//! Deterministic finite automata, one per lexical category
//!
//! Every automaton shares the same [`TransitionTable`] representation, keyed
//! first by input byte and then by the current state. The set of automata is
//! closed, so an [`Automaton`] carries an [`AutomatonKind`] tag and resolves
//! its accepting states to [`TerminalKind`]s with a single `match`.
//!
//! # Priority
//!
//! [`Automaton::priority_list`] returns the automata in the order the lexer
//! tries them. Keyword and literal forms come before the identifier
//! catch-all, which is always last.

use super::token::TerminalKind;
use rustc_hash::{FxHashMap, FxHashSet};

pub type StateId = u32;

/// Initial state of every automaton.
pub const INITIAL_STATE: StateId = 0;

/// `(symbol, state) -> state` transitions stored as one row per symbol.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    rows: FxHashMap<u8, FxHashMap<StateId, StateId>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: u8, from: StateId, to: StateId) {
        self.rows.entry(symbol).or_default().insert(from, to);
    }

    /// Adds the same `from -> to` edge for every symbol in `symbols`.
    pub fn add_all(&mut self, symbols: impl IntoIterator<Item = u8>, from: StateId, to: StateId) {
        for symbol in symbols {
            self.add(symbol, from, to);
        }
    }

    pub fn next(&self, symbol: u8, from: StateId) -> Option<StateId> {
        self.rows.get(&symbol)?.get(&from).copied()
    }
}

/// The lexical categories, each backed by its own automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AutomatonKind {
    StringLiteral,
    BuiltinType,
    Semicolon,
    Scope,
    Bracket,
    ControlFlow,
    ArithmeticOp,
    RelationalOp,
    AssignmentOp,
    FloatLiteral,
    IntLiteral,
    Identifier,
}

impl AutomatonKind {
    /// Tried in this order; the identifier catch-all must stay last.
    pub const PRIORITY: [AutomatonKind; 12] = [
        AutomatonKind::StringLiteral,
        AutomatonKind::BuiltinType,
        AutomatonKind::Semicolon,
        AutomatonKind::Scope,
        AutomatonKind::Bracket,
        AutomatonKind::ControlFlow,
        AutomatonKind::ArithmeticOp,
        AutomatonKind::RelationalOp,
        AutomatonKind::AssignmentOp,
        AutomatonKind::FloatLiteral,
        AutomatonKind::IntLiteral,
        AutomatonKind::Identifier,
    ];
}

fn digits() -> impl Iterator<Item = u8> {
    b'0'..=b'9'
}

fn alphanumerics() -> impl Iterator<Item = u8> {
    digits().chain(b'A'..=b'Z').chain(b'a'..=b'z')
}

/// Adds a linear chain of states spelling `word` after `from`, reusing
/// `states` as the target of each successive byte.
fn spell(table: &mut TransitionTable, word: &[u8], from: StateId, states: &[StateId]) {
    let mut current = from;
    for (&byte, &next) in word.iter().zip(states) {
        table.add(byte, current, next);
        current = next;
    }
}

/// A deterministic automaton for one [`AutomatonKind`].
#[derive(Debug, Clone)]
pub struct Automaton {
    kind: AutomatonKind,
    current_state: StateId,
    accepting_states: FxHashSet<StateId>,
    transitions: TransitionTable,
}

impl Automaton {
    pub fn new(kind: AutomatonKind) -> Self {
        let mut table = TransitionTable::new();
        let accepting: &[StateId] = match kind {
            AutomatonKind::ArithmeticOp => {
                table.add(b'+', 0, 1);
                table.add(b'-', 0, 2);
                table.add(b'*', 0, 3);
                table.add(b'/', 0, 4);
                &[1, 2, 3, 4]
            }
            AutomatonKind::RelationalOp => {
                // `!` and `=` share state 3, which only accepts once `=` follows
                table.add(b'<', 0, 1);
                table.add(b'>', 0, 2);
                table.add(b'!', 0, 3);
                table.add(b'=', 0, 3);
                table.add(b'=', 1, 4);
                table.add(b'=', 2, 5);
                table.add(b'=', 3, 6);
                &[1, 2, 4, 5, 6]
            }
            AutomatonKind::AssignmentOp => {
                table.add(b'=', 0, 1);
                &[1]
            }
            AutomatonKind::BuiltinType => {
                spell(&mut table, b"int", 0, &[1, 2, 3]);
                spell(&mut table, b"float", 0, &[4, 5, 6, 7, 8]);
                spell(&mut table, b"char", 0, &[9, 10, 11, 12]);
                &[3, 8, 12]
            }
            AutomatonKind::ControlFlow => {
                spell(&mut table, b"if", 0, &[1, 2]);
                spell(&mut table, b"while", 0, &[3, 4, 5, 6, 7]);
                &[2, 7]
            }
            AutomatonKind::StringLiteral => {
                table.add(b'"', 0, 1);
                table.add_all((b' '..=b'~').filter(|&b| b != b'"'), 1, 1);
                table.add(b'"', 1, 2);
                &[2]
            }
            AutomatonKind::Scope => {
                table.add(b'{', 0, 1);
                table.add(b'}', 0, 2);
                &[1, 2]
            }
            AutomatonKind::Bracket => {
                table.add(b'(', 0, 1);
                table.add(b')', 0, 2);
                &[1, 2]
            }
            AutomatonKind::Semicolon => {
                table.add(b';', 0, 1);
                &[1]
            }
            AutomatonKind::IntLiteral => {
                table.add_all(digits(), 0, 1);
                table.add_all(digits(), 1, 1);
                &[1]
            }
            AutomatonKind::FloatLiteral => {
                table.add_all(digits(), 0, 1);
                table.add_all(digits(), 1, 1);
                table.add(b'.', 1, 2);
                table.add_all(digits(), 2, 3);
                table.add_all(digits(), 3, 3);
                &[3]
            }
            AutomatonKind::Identifier => {
                table.add_all(alphanumerics(), 0, 1);
                table.add_all(alphanumerics(), 1, 1);
                &[1]
            }
        };

        Automaton {
            kind,
            current_state: INITIAL_STATE,
            accepting_states: accepting.iter().copied().collect(),
            transitions: table,
        }
    }

    /// All automata, in the order the lexer tries them.
    pub fn priority_list() -> Vec<Automaton> {
        AutomatonKind::PRIORITY.iter().map(|&kind| Automaton::new(kind)).collect()
    }

    pub fn kind(&self) -> AutomatonKind {
        self.kind
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    /// Feed one symbol. Returns `false` and leaves the state unchanged when
    /// there is no transition for `symbol` out of the current state.
    pub fn transition(&mut self, symbol: u8) -> bool {
        match self.transitions.next(symbol, self.current_state) {
            Some(next) => {
                self.current_state = next;
                true
            }
            None => false,
        }
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting_states.contains(&self.current_state)
    }

    pub fn reset(&mut self) {
        self.current_state = INITIAL_STATE;
    }

    /// Terminal produced when the automaton stops in `state`.
    ///
    /// Non-accepting states map to [`TerminalKind::Error`].
    pub fn terminal_for(&self, state: StateId) -> TerminalKind {
        if !self.accepting_states.contains(&state) {
            return TerminalKind::Error;
        }
        match (self.kind, state) {
            (AutomatonKind::ArithmeticOp, 1) => TerminalKind::ArithmeticOpPlus,
            (AutomatonKind::ArithmeticOp, 2) => TerminalKind::ArithmeticOpMinus,
            (AutomatonKind::ArithmeticOp, 3) => TerminalKind::ArithmeticOpMult,
            (AutomatonKind::ArithmeticOp, 4) => TerminalKind::ArithmeticOpDiv,
            (AutomatonKind::RelationalOp, _) => TerminalKind::LogicalOp,
            (AutomatonKind::AssignmentOp, _) => TerminalKind::AssignmentOp,
            (AutomatonKind::BuiltinType, 3) => TerminalKind::BuiltinTypeInt,
            (AutomatonKind::BuiltinType, 8) => TerminalKind::BuiltinTypeFloat,
            (AutomatonKind::BuiltinType, 12) => TerminalKind::BuiltinTypeChar,
            (AutomatonKind::ControlFlow, 2) => TerminalKind::ControlFlowBranch,
            (AutomatonKind::ControlFlow, 7) => TerminalKind::ControlFlowWhile,
            (AutomatonKind::StringLiteral, _) => TerminalKind::StringLiteral,
            (AutomatonKind::Scope, 1) => TerminalKind::OpenScope,
            (AutomatonKind::Scope, 2) => TerminalKind::ClosedScope,
            (AutomatonKind::Bracket, 1) => TerminalKind::OpeningBracket,
            (AutomatonKind::Bracket, 2) => TerminalKind::ClosingBracket,
            (AutomatonKind::Semicolon, _) => TerminalKind::Semicolon,
            (AutomatonKind::IntLiteral, _) => TerminalKind::IntLiteral,
            (AutomatonKind::FloatLiteral, _) => TerminalKind::FloatLiteral,
            (AutomatonKind::Identifier, _) => TerminalKind::Id,
            _ => TerminalKind::Error,
        }
    }

    /// Terminal for the state the automaton currently rests in.
    pub fn terminal(&self) -> TerminalKind {
        self.terminal_for(self.current_state)
    }
}
