//! Compilation driver
//!
//! Runs the lexer and the parser on two threads joined by a [`TokenChannel`],
//! then converts the syntax tree to an AST and evaluates it on the calling
//! thread.

use crate::channel::TokenChannel;
use crate::lexer::token::Token;
use crate::lexer::{LexError, Lexer};
use crate::parser::{Ll1Parser, ParseError, SyntaxTree};
use crate::vm::{evaluate, VmError};
use std::fmt;
use std::io::{self, Cursor};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[derive(Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Vm(VmError),
    /// A pipeline thread could not be started.
    Spawn { worker: &'static str, source: io::Error },
    /// A pipeline thread panicked.
    WorkerPanicked { worker: &'static str },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{}", e),
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Vm(e) => write!(f, "Runtime error: {}", e),
            CompileError::Spawn { worker, source } => {
                write!(f, "Failed to start {} thread: {}", worker, source)
            }
            CompileError::WorkerPanicked { worker } => write!(f, "The {} thread panicked", worker),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Lex(e) => Some(e),
            CompileError::Parse(e) => Some(e),
            CompileError::Vm(e) => Some(e),
            CompileError::Spawn { source, .. } => Some(source),
            CompileError::WorkerPanicked { .. } => None,
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<VmError> for CompileError {
    fn from(e: VmError) -> Self {
        CompileError::Vm(e)
    }
}

/// Every artifact of a successful run.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub syntax_tree: SyntaxTree,
    pub ast: SyntaxTree,
    pub result: Token,
}

/// Closes the channel when dropped, so a panicking lexer still wakes the
/// parser.
struct CloseOnDrop(Arc<TokenChannel>);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

fn spawn_worker<T, F>(worker: &'static str, f: F) -> Result<JoinHandle<T>, CompileError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name(worker.to_string())
        .spawn(f)
        .map_err(|source| CompileError::Spawn { worker, source })
}

fn run_front_end<L>(lex: L) -> Result<SyntaxTree, CompileError>
where
    L: FnOnce(&TokenChannel) -> Result<(), LexError> + Send + 'static,
{
    let channel = Arc::new(TokenChannel::new());

    let lexer = {
        let guard = CloseOnDrop(Arc::clone(&channel));
        spawn_worker("lexer", move || lex(&*guard.0))?
    };

    let parser = {
        let channel = Arc::clone(&channel);
        spawn_worker("parser", move || Ll1Parser::new(&channel).parse())
    };
    let parser = match parser {
        Ok(handle) => handle,
        Err(e) => return Err(without_parser(lexer, e)),
    };

    let lexed = lexer.join();
    let parsed = parser.join();

    // A lexer failure truncates the stream, so it explains any parse error
    lexed.map_err(|_| CompileError::WorkerPanicked { worker: "lexer" })??;
    let tree = parsed.map_err(|_| CompileError::WorkerPanicked { worker: "parser" })??;
    Ok(tree)
}

/// Joins a lexer whose parser never started. The spawn failure is reported
/// over anything the lexer returned, since no tokens were consumed.
fn without_parser(lexer: JoinHandle<Result<(), LexError>>, spawn_error: CompileError) -> CompileError {
    let _lexed = lexer.join();
    spawn_error
}

/// Lex and parse the file at `path` concurrently.
pub fn front_end(path: impl AsRef<Path>) -> Result<SyntaxTree, CompileError> {
    let path = path.as_ref().to_path_buf();
    run_front_end(move |channel| Lexer::new().run(&path, channel))
}

/// Lex and parse an in-memory source concurrently.
pub fn front_end_source(source: &str) -> Result<SyntaxTree, CompileError> {
    let bytes = source.as_bytes().to_vec();
    run_front_end(move |channel| Lexer::new().run_reader(Cursor::new(bytes), channel))
}

/// Convert a syntax tree to its AST and evaluate it.
pub fn back_end(syntax_tree: SyntaxTree) -> Result<Compilation, CompileError> {
    let ast = syntax_tree.clone().into_ast();
    let result = evaluate(&ast)?;
    Ok(Compilation {
        syntax_tree,
        ast,
        result,
    })
}

pub fn compile_file(path: impl AsRef<Path>) -> Result<Compilation, CompileError> {
    back_end(front_end(path)?)
}

pub fn compile_source(source: &str) -> Result<Compilation, CompileError> {
    back_end(front_end_source(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::token::{SourceLocation, TerminalKind};

    #[test]
    fn test_compile_source() {
        let compilation = compile_source("3+4*2;").unwrap();
        assert_eq!(compilation.result.lexeme, "11");
        assert_eq!(compilation.result.kind, TerminalKind::IntLiteral);
        assert!(compilation.syntax_tree.contains_nonterminal());
        assert!(!compilation.ast.contains_nonterminal());
    }

    #[test]
    fn test_lex_error_wins_over_parse_error() {
        // the parser sees a truncated stream and fails too
        assert!(matches!(
            compile_source("(1 + \"oops"),
            Err(CompileError::Lex(LexError::UnrecognizedInput { .. }))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = compile_file("/nonexistent/input.c").unwrap_err();
        assert!(matches!(err, CompileError::Lex(LexError::Io { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_panicking_lexer_does_not_hang_parser() {
        let result = run_front_end(|channel| {
            channel.produce(Token::new("1", TerminalKind::IntLiteral));
            panic!("lexer blew up");
        });
        assert!(matches!(
            result,
            Err(CompileError::WorkerPanicked { worker: "lexer" })
        ));
    }

    #[test]
    fn test_runtime_error_is_reported() {
        let err = compile_source("5/0;").unwrap_err();
        assert!(matches!(err, CompileError::Vm(VmError::DivisionByZero { .. })));
        assert!(err.to_string().starts_with("Runtime error"));
    }

    #[test]
    fn test_parser_spawn_failure_outranks_lexer_result() {
        let lexer = spawn_worker("lexer", || {
            Err(LexError::UnrecognizedInput {
                byte: b'@',
                location: SourceLocation::new(1, 1),
            })
        })
        .unwrap();
        let spawn_error = CompileError::Spawn {
            worker: "parser",
            source: io::Error::new(io::ErrorKind::WouldBlock, "no threads left"),
        };
        let err = without_parser(lexer, spawn_error);
        assert!(matches!(err, CompileError::Spawn { worker: "parser", .. }));
        assert!(err.to_string().contains("no threads left"));
    }
}
