//! Viewer application state and event loop

use crate::channel::TokenChannel;
use crate::driver::{front_end_source, CompileError};
use crate::lexer::token::Token;
use crate::lexer::{LexError, Lexer};
use crate::parser::symbols::{SymbolTable, SymbolType};
use crate::parser::tree::SyntaxTree;
use crate::vm::evaluate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Symbols,
    SyntaxTree,
    Ast,
}

impl FocusedPane {
    /// Move focus clockwise: source -> syntax tree -> AST -> symbols -> tokens
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::SyntaxTree,
            FocusedPane::SyntaxTree => FocusedPane::Ast,
            FocusedPane::Ast => FocusedPane::Symbols,
            FocusedPane::Symbols => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Source,
        }
    }

    /// Move focus counter-clockwise
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Symbols,
            FocusedPane::Symbols => FocusedPane::Ast,
            FocusedPane::Ast => FocusedPane::SyntaxTree,
            FocusedPane::SyntaxTree => FocusedPane::Source,
        }
    }
}

const PAGE: usize = 10;

/// The viewer state: every stage's output for one source file
pub struct App {
    pub source_code: String,

    /// Tokens produced before the lexer stopped, sentinel included
    pub tokens: Vec<Token>,
    pub lex_error: Option<String>,
    /// 1-based line of the lexer error, if it has a position
    pub error_line: Option<usize>,

    /// Bindings visible at the end of the input as `(depth, name, type)`
    pub symbols: Vec<(usize, String, SymbolType)>,
    pub symbol_error: Option<String>,

    pub syntax_tree: Option<SyntaxTree>,
    pub ast: Option<SyntaxTree>,

    /// Rendered result, or the first error of the pipeline
    pub outcome: Result<String, String>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tokens_scroll: usize,
    pub symbols_scroll: usize,
    pub tree_scroll: usize,
    pub ast_scroll: usize,

    pub should_quit: bool,
}

impl App {
    /// Read and compile the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let source_code = fs::read_to_string(path)?;
        Ok(App::from_source(source_code))
    }

    pub fn from_source(source_code: String) -> Self {
        let channel = TokenChannel::new();
        let lexed = Lexer::new().run_reader(source_code.as_bytes(), &channel);
        let tokens = channel.drain();
        let error_line = match &lexed {
            Err(LexError::UnrecognizedInput { location, .. }) => Some(location.line),
            _ => None,
        };
        let lex_error = lexed.err().map(|e| e.to_string());

        let mut table = SymbolTable::new();
        let symbol_error = table.declare_from(&tokens).err().map(|e| e.to_string());
        let symbols = table
            .visible()
            .into_iter()
            .map(|(depth, name, symbol)| (depth, name.to_string(), symbol.ty))
            .collect();

        let (syntax_tree, ast, outcome) = match front_end_source(&source_code) {
            Ok(tree) => {
                let ast = tree.clone().into_ast();
                let outcome = evaluate(&ast)
                    .map(|result| format!("{} ({})", result.lexeme, result.kind))
                    .map_err(|e| CompileError::from(e).to_string());
                (Some(tree), Some(ast), outcome)
            }
            Err(e) => (None, None, Err(e.to_string())),
        };

        App {
            source_code,
            tokens,
            lex_error,
            error_line,
            symbols,
            symbol_error,
            syntax_tree,
            ast,
            outcome,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            tokens_scroll: 0,
            symbols_scroll: 0,
            tree_scroll: 0,
            ast_scroll: 0,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Tokens | Symbols (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Percentage(25),
            ])
            .split(columns[0]);

        // Right column: Syntax tree (top) | AST (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.error_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_tokens_pane(
            frame,
            left_rows[1],
            &self.tokens,
            self.lex_error.as_deref(),
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        super::panes::render_symbols_pane(
            frame,
            left_rows[2],
            &self.symbols,
            self.symbol_error.as_deref(),
            self.focused_pane == FocusedPane::Symbols,
            &mut self.symbols_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            right_rows[0],
            " Syntax Tree ",
            self.syntax_tree.as_ref(),
            "(parse failed)",
            self.focused_pane == FocusedPane::SyntaxTree,
            &mut self.tree_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            right_rows[1],
            " AST ",
            self.ast.as_ref(),
            "(no AST)",
            self.focused_pane == FocusedPane::Ast,
            &mut self.ast_scroll,
        );

        let outcome = match &self.outcome {
            Ok(result) => Ok(result.as_str()),
            Err(error) => Err(error.as_str()),
        };
        super::panes::render_status_bar(frame, main_chunks[1], outcome);
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Tokens => &mut self.tokens_scroll,
            FocusedPane::Symbols => &mut self.symbols_scroll,
            FocusedPane::SyntaxTree => &mut self.tree_scroll,
            FocusedPane::Ast => &mut self.ast_scroll,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            // Overshoot is clamped when the pane renders
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            KeyCode::PageUp => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(PAGE);
            }
            KeyCode::PageDown => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(PAGE);
            }
            KeyCode::Home => {
                *self.focused_scroll() = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_from_source_success() {
        let app = App::from_source("(3+4)*2;\n".to_string());
        assert_eq!(app.outcome, Ok("14 (int literal)".to_string()));
        assert!(app.syntax_tree.is_some());
        assert!(app.ast.is_some());
        assert!(app.lex_error.is_none());
        assert_eq!(app.tokens.len(), 9);
    }

    #[test]
    fn test_from_source_lex_error_keeps_partial_tokens() {
        let app = App::from_source("1 +\n\"open".to_string());
        assert_eq!(app.error_line, Some(2));
        assert!(app.lex_error.is_some());
        assert!(app.syntax_tree.is_none());
        assert!(app.outcome.is_err());
        // 1, +, sentinel
        assert_eq!(app.tokens.len(), 3);
    }

    #[test]
    fn test_from_source_runtime_error() {
        let app = App::from_source("5/0".to_string());
        assert!(app.ast.is_some());
        assert!(matches!(&app.outcome, Err(message) if message.contains("Division by zero")));
    }

    #[test]
    fn test_focus_cycles_through_all_panes() {
        let mut app = App::from_source("1".to_string());
        let start = app.focused_pane;
        for _ in 0..5 {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.focused_pane, start);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Tokens);
    }

    #[test]
    fn test_scroll_keys_move_focused_pane_only() {
        let mut app = App::from_source("1".to_string());
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.tree_scroll, PAGE - 1);
        assert_eq!(app.source_scroll, 0);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.tree_scroll, 0);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_from_source_collects_declarations() {
        let app = App::from_source("int x; { float y; } char z;".to_string());
        assert!(app.symbol_error.is_none());
        // y went out of scope with its block
        assert_eq!(
            app.symbols,
            vec![
                (0, "x".to_string(), SymbolType::Int),
                (0, "z".to_string(), SymbolType::Char),
            ]
        );

        let app = App::from_source("int a; int a;".to_string());
        assert!(matches!(&app.symbol_error, Some(message) if message.contains("'a'")));
    }
}
