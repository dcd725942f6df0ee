//! Automaton-driven lexer
//!
//! The lexer reads its input in chunks through a [`ScanBuffer`] and, at every
//! non-whitespace position, tries the automata of [`automaton`] in priority
//! order. Each automaton is fed bytes until a transition fails or input runs
//! out; the first one that stops in an accepting state wins and the matched
//! range becomes a [`Token`]. An automaton that stops anywhere else is reset
//! and the scan rewinds to the start of the attempt for the next one.
//!
//! Matching is greedy per automaton, not longest-match across automata, so
//! the priority order decides ambiguities: `ifx` lexes as `if` followed by the
//! identifier `x`.
//!
//! Every run ends by producing the end-of-input sentinel and closing the
//! channel, on success and on failure alike, so the parser is never left
//! waiting.

pub mod automaton;
pub mod buffer;
pub mod token;

use crate::channel::TokenChannel;
use automaton::Automaton;
use buffer::ScanBuffer;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use token::{SourceLocation, TerminalKind, Token};

/// Default number of bytes read per chunk.
pub const INPUT_BUFFER_SIZE: usize = 4096;

/// Lexer error type
#[derive(Debug)]
pub enum LexError {
    /// The input could not be opened or read.
    Io { path: Option<PathBuf>, source: io::Error },
    /// No automaton, including the identifier catch-all, accepts here.
    UnrecognizedInput { byte: u8, location: SourceLocation },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::Io {
                path: Some(path),
                source,
            } => write!(f, "Cannot read '{}': {}", path.display(), source),
            LexError::Io { path: None, source } => write!(f, "Cannot read input: {}", source),
            LexError::UnrecognizedInput { byte, location } => {
                let shown = if byte.is_ascii_graphic() {
                    format!("'{}'", *byte as char)
                } else {
                    format!("'\\x{:02x}'", byte)
                };
                write!(
                    f,
                    "Lexer error at line {}, column {}: unrecognized input starting at {}",
                    location.line, location.column, shown
                )
            }
        }
    }
}

impl std::error::Error for LexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexError::Io { source, .. } => Some(source),
            LexError::UnrecognizedInput { .. } => None,
        }
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n')
}

/// Lexer for the expression language
pub struct Lexer {
    automata: Vec<Automaton>,
    chunk_size: usize,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            automata: Automaton::priority_list(),
            chunk_size: INPUT_BUFFER_SIZE,
        }
    }

    /// Use chunks of `chunk_size` bytes instead of [`INPUT_BUFFER_SIZE`].
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Lex the file at `path` into `channel`.
    ///
    /// The sentinel is produced and the channel closed even when the file
    /// cannot be opened.
    pub fn run(&mut self, path: impl AsRef<Path>, channel: &TokenChannel) -> Result<(), LexError> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => self.run_reader(file, channel).map_err(|e| match e {
                LexError::Io { path: None, source } => LexError::Io {
                    path: Some(path.to_path_buf()),
                    source,
                },
                other => other,
            }),
            Err(source) => {
                finish(channel);
                Err(LexError::Io {
                    path: Some(path.to_path_buf()),
                    source,
                })
            }
        }
    }

    /// Lex everything `reader` yields into `channel`, then produce the
    /// sentinel and close the channel.
    pub fn run_reader<R: Read>(&mut self, reader: R, channel: &TokenChannel) -> Result<(), LexError> {
        let result = self.scan(ScanBuffer::new(reader, self.chunk_size), channel);
        for automaton in &mut self.automata {
            automaton.reset();
        }
        finish(channel);
        result
    }

    fn scan<R: Read>(&mut self, mut buffer: ScanBuffer<R>, channel: &TokenChannel) -> Result<(), LexError> {
        let io_error = |source| LexError::Io { path: None, source };
        let mut location = SourceLocation::default();
        let mut pos = 0;

        loop {
            if pos == buffer.len() {
                if buffer.is_exhausted() {
                    return Ok(());
                }
                pos -= buffer.refill(pos).map_err(io_error)?;
                continue;
            }

            let byte = buffer.byte(pos);
            if is_whitespace(byte) {
                location.advance(byte);
                pos += 1;
                continue;
            }

            let mut start = pos;
            let mut matched = None;

            for automaton in &mut self.automata {
                let mut cursor = start;
                loop {
                    if cursor == buffer.len() {
                        if buffer.is_exhausted() {
                            break;
                        }
                        let shift = buffer.refill(start).map_err(io_error)?;
                        start -= shift;
                        cursor -= shift;
                        continue;
                    }
                    if !automaton.transition(buffer.byte(cursor)) {
                        break;
                    }
                    cursor += 1;
                }

                let accepted = automaton.is_accepting();
                let kind = automaton.terminal();
                automaton.reset();

                if accepted {
                    matched = Some((cursor, kind));
                    break;
                }
            }

            let Some((end, kind)) = matched else {
                return Err(LexError::UnrecognizedInput { byte, location });
            };

            let lexeme = buffer.slice(start, end);
            for &b in lexeme {
                location.advance(b);
            }
            channel.produce(Token::new(String::from_utf8_lossy(lexeme), kind));
            pos = end;
        }
    }
}

fn finish(channel: &TokenChannel) {
    channel.produce(Token::end_of_input());
    channel.close();
}

/// Lex a whole stream and collect the tokens, sentinel included.
pub fn tokenize<R: Read>(reader: R) -> Result<Vec<Token>, LexError> {
    let channel = TokenChannel::new();
    Lexer::new().run_reader(reader, &channel)?;
    Ok(channel.drain())
}

/// Lex an in-memory source string.
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, LexError> {
    tokenize(source.as_bytes())
}

/// Drops the sentinel and pairs each token's kind with its lexeme, which is
/// the comparison tests need since [`Token`] equality ignores kinds.
pub fn kinds_and_lexemes(tokens: &[Token]) -> Vec<(TerminalKind, &str)> {
    tokens
        .iter()
        .filter(|t| !t.is_end_of_input())
        .map(|t| (t.kind, t.lexeme.as_str()))
        .collect()
}
