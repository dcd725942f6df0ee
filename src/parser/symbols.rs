//! Scoped symbol table
//!
//! A stack of frames, innermost last. Duplicate names are rejected within a
//! frame but may shadow names of enclosing frames. Lookup scans from the
//! innermost frame outward and never reorders or removes frames.

use crate::lexer::token::{TerminalKind, Token};
use rustc_hash::FxHashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolType {
    Func,
    Int,
    Float,
    Char,
    Pointer,
}

impl SymbolType {
    /// Type named by a built-in type keyword token.
    pub fn from_keyword(kind: TerminalKind) -> Option<Self> {
        match kind {
            TerminalKind::BuiltinTypeInt => Some(SymbolType::Int),
            TerminalKind::BuiltinTypeFloat => Some(SymbolType::Float),
            TerminalKind::BuiltinTypeChar => Some(SymbolType::Char),
            _ => None,
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolType::Func => "func",
            SymbolType::Int => "int",
            SymbolType::Float => "float",
            SymbolType::Char => "char",
            SymbolType::Pointer => "pointer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageSpecifier {
    #[default]
    Auto,
    Static,
    Extern,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub ty: SymbolType,
    pub storage: StorageSpecifier,
}

impl Symbol {
    pub fn new(ty: SymbolType) -> Self {
        Symbol {
            ty,
            storage: StorageSpecifier::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// The name already exists in the current scope.
    Duplicate { name: String },
    /// A scope was closed with only the global scope open.
    UnbalancedScope,
}

impl fmt::Display for SymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolError::Duplicate { name } => {
                write!(f, "Symbol '{}' is already declared in this scope", name)
            }
            SymbolError::UnbalancedScope => write!(f, "Closing scope without a matching opening"),
        }
    }
}

impl std::error::Error for SymbolError {}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    frames: Vec<FxHashMap<String, Symbol>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable {
            frames: vec![FxHashMap::default()],
        }
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open scopes, counting the global one.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_scope(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop_scope(&mut self) -> Result<(), SymbolError> {
        if self.frames.len() == 1 {
            return Err(SymbolError::UnbalancedScope);
        }
        self.frames.pop();
        Ok(())
    }

    pub fn insert(&mut self, name: &str, symbol: Symbol) -> Result<(), SymbolError> {
        let Some(frame) = self.frames.last_mut() else {
            return Err(SymbolError::UnbalancedScope);
        };
        if frame.contains_key(name) {
            return Err(SymbolError::Duplicate {
                name: name.to_string(),
            });
        }
        frame.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Feed one token: `{` opens a scope, `}` closes one, an identifier is
    /// declared in the current scope with type `ty`. Other tokens are ignored.
    pub fn observe(&mut self, token: &Token, ty: SymbolType) -> Result<(), SymbolError> {
        match token.kind {
            TerminalKind::OpenScope => {
                self.push_scope();
                Ok(())
            }
            TerminalKind::ClosedScope => self.pop_scope(),
            TerminalKind::Id => self.insert(&token.lexeme, Symbol::new(ty)),
            _ => Ok(()),
        }
    }

    /// Walk a token stream, declaring every identifier that directly follows
    /// a built-in type keyword and tracking braces.
    pub fn declare_from(&mut self, tokens: &[Token]) -> Result<(), SymbolError> {
        let mut declared_type = None;
        for token in tokens {
            match (token.kind, declared_type) {
                (TerminalKind::Id, Some(ty)) => self.observe(token, ty)?,
                (TerminalKind::OpenScope | TerminalKind::ClosedScope, _) => {
                    self.observe(token, SymbolType::Int)?
                }
                _ => {}
            }
            declared_type = SymbolType::from_keyword(token.kind);
        }
        Ok(())
    }

    /// Every visible binding, innermost scope first, as `(depth, name, symbol)`.
    pub fn visible(&self) -> Vec<(usize, &str, &Symbol)> {
        let mut bindings: Vec<(usize, &str, &Symbol)> = self
            .frames
            .iter()
            .enumerate()
            .rev()
            .flat_map(|(depth, frame)| {
                frame
                    .iter()
                    .map(move |(name, symbol)| (depth, name.as_str(), symbol))
            })
            .collect();
        bindings.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(b.1)));
        bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_str;

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut table = SymbolTable::new();
        table.insert("x", Symbol::new(SymbolType::Int)).unwrap();
        assert_eq!(
            table.insert("x", Symbol::new(SymbolType::Float)),
            Err(SymbolError::Duplicate {
                name: "x".to_string()
            })
        );
        assert_eq!(table.lookup("x").map(|s| s.ty), Some(SymbolType::Int));
    }

    #[test]
    fn test_shadowing_and_lookup_order() {
        let mut table = SymbolTable::new();
        table.insert("x", Symbol::new(SymbolType::Int)).unwrap();
        table.insert("f", Symbol::new(SymbolType::Func)).unwrap();
        table.push_scope();
        table.insert("x", Symbol::new(SymbolType::Char)).unwrap();

        assert_eq!(table.lookup("x").map(|s| s.ty), Some(SymbolType::Char));
        assert_eq!(table.lookup("f").map(|s| s.ty), Some(SymbolType::Func));
        // lookup leaves the scopes untouched
        assert_eq!(table.depth(), 2);

        table.pop_scope().unwrap();
        assert_eq!(table.lookup("x").map(|s| s.ty), Some(SymbolType::Int));
        assert!(table.lookup("y").is_none());
    }

    #[test]
    fn test_global_scope_cannot_be_popped() {
        let mut table = SymbolTable::new();
        assert_eq!(table.pop_scope(), Err(SymbolError::UnbalancedScope));
        assert_eq!(table.depth(), 1);
    }

    #[test]
    fn test_storage_specifier() {
        let mut table = SymbolTable::new();
        let symbol = Symbol {
            ty: SymbolType::Pointer,
            storage: StorageSpecifier::Static,
        };
        table.insert("p", symbol).unwrap();
        assert_eq!(table.lookup("p"), Some(&symbol));
        assert_eq!(Symbol::new(SymbolType::Int).storage, StorageSpecifier::Auto);
    }

    #[test]
    fn test_observe_tracks_braces() {
        let mut table = SymbolTable::new();
        let tokens = tokenize_str("{ a { a } }").unwrap();
        for token in &tokens {
            table.observe(token, SymbolType::Int).unwrap();
        }
        assert_eq!(table.depth(), 1);

        let mut table = SymbolTable::new();
        let stray = Token::new("}", TerminalKind::ClosedScope);
        assert_eq!(
            table.observe(&stray, SymbolType::Int),
            Err(SymbolError::UnbalancedScope)
        );
    }

    #[test]
    fn test_declare_from_token_stream() {
        let mut table = SymbolTable::new();
        let tokens = tokenize_str("int x; float y; { char x; x = y; }").unwrap();
        table.declare_from(&tokens[..9]).unwrap();

        // inside the block: x is the char, y still the outer float
        assert_eq!(table.depth(), 2);
        assert_eq!(table.lookup("x").map(|s| s.ty), Some(SymbolType::Char));
        assert_eq!(table.lookup("y").map(|s| s.ty), Some(SymbolType::Float));
        assert_eq!(table.visible().first().map(|b| b.1), Some("x"));

        let mut table = SymbolTable::new();
        assert_eq!(
            table.declare_from(&tokenize_str("int x; int x;").unwrap()),
            Err(SymbolError::Duplicate {
                name: "x".to_string()
            })
        );
    }
}
