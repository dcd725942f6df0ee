//! # Introduction
//!
//! A front end and evaluator for arithmetic expressions in a small C-like
//! language. The lexer and the parser run concurrently, connected by a
//! blocking token channel; the resulting syntax tree is collapsed into an AST
//! and evaluated by a stack machine.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer ──channel──▶ LL(1) Parser → Syntax tree → AST → Stack VM
//!          (thread)           (thread)
//! ```
//!
//! 1. [`lexer`]: automaton-driven tokenizer over a chunked read buffer.
//! 2. [`channel`]: FIFO with peek/pop consumption and a close signal.
//! 3. [`parser`]: table-driven LL(1) parser building a child-sibling syntax
//!    tree, plus the AST rewrite and a scoped symbol table.
//! 4. [`vm`]: post-order evaluation of the AST.
//! 5. [`driver`]: runs the stages for one input and reports the first error.
//! 6. [`ui`]: ratatui viewer for every stage's output; not part of the stable
//!    library API.
//!
//! ## Accepted language
//!
//! The lexer knows `int`, `float`, `char`, `if`, `while`, identifiers,
//! integer, float and string literals, `+ - * /`, `=`, `< > <= >= == !=`,
//! `;`, braces and parentheses. The grammar accepts a single arithmetic
//! expression, optionally terminated by `;`.

pub mod channel;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod ui;
pub mod vm;

pub use driver::{compile_file, compile_source, Compilation, CompileError};
