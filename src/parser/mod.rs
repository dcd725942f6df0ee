//! Expression parser
//!
//! Turns the token stream into a syntax tree and then into an AST:
//! - [`grammar`]: grammar symbols and the LL(1) parsing table
//! - [`ll1`]: table-driven parser reading from the token channel
//! - [`tree`]: child-sibling syntax tree, built incrementally and collapsed
//!   into the AST
//! - [`symbols`]: scoped symbol table
//! - [`errors`]: parse error type
//!
//! # Supported language
//!
//! One arithmetic expression over identifiers, integer and float literals,
//! `+ - * /` and parentheses, optionally terminated by `;`. The lexer knows
//! more of the language (keywords, assignment, relational operators, scopes,
//! string literals) than the grammar accepts.

pub mod errors;
pub mod grammar;
pub mod ll1;
pub mod symbols;
pub mod tree;

pub use errors::ParseError;
pub use ll1::Ll1Parser;
pub use tree::SyntaxTree;
