//! Stack-based evaluator for the AST
//!
//! - [`engine`]: post-order stack machine
//! - [`errors`]: evaluation error types

pub mod engine;
pub mod errors;

pub use engine::{evaluate, StackVm};
pub use errors::VmError;
