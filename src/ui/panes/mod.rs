//! Pane rendering
//!
//! - [`source`]: the input file with keyword and literal highlighting
//! - [`tokens`]: the token stream as the lexer produced it
//! - [`tree`]: an indented outline of a syntax tree or AST
//! - [`symbols`]: declarations found in the token stream, by scope
//! - [`status`]: status bar with the evaluation result and keybindings
//!
//! Each module exports one `render_*` function taking the frame, the target
//! area, the data to show, whether the pane has focus, and its scroll offset.

pub mod source;
pub mod status;
pub mod symbols;
pub mod tokens;
pub mod tree;

pub use source::render_source_pane;
pub use status::render_status_bar;
pub use symbols::render_symbols_pane;
pub use tokens::render_tokens_pane;
pub use tree::render_tree_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered pane block, highlighted when focused.
fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `scroll_offset` so the last page stays full and return the number
/// of visible rows.
fn clamp_scroll(total_items: usize, area: Rect, scroll_offset: &mut usize) -> usize {
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // borders
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }
    visible_height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_scroll() {
        let area = Rect::new(0, 0, 20, 7);
        let mut offset = 100;
        assert_eq!(clamp_scroll(10, area, &mut offset), 5);
        assert_eq!(offset, 5);

        let mut offset = 3;
        clamp_scroll(4, area, &mut offset);
        assert_eq!(offset, 0);
    }
}
