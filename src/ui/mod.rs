//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: compiles one file, holds every stage's output, runs the
//!   keyboard event loop
//! - **[`panes`]**: stateless render functions for each pane (source, tokens,
//!   symbols, syntax tree, AST, status bar)
//! - **[`theme`]**: color palette shared by all panes
//!
//! Construct an [`App`] with [`App::load`] and call [`App::run`].
//!
//! [`App::run`]: app::App::run
//! [`App::load`]: app::App::load

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
