//! Declared symbols pane rendering

use super::{clamp_scroll, pane_block};
use crate::parser::symbols::SymbolType;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

/// Rows as `(scope label, name, type)`. Scope 0 is the global scope.
fn symbol_rows(symbols: &[(usize, String, SymbolType)]) -> Vec<(String, String, String)> {
    symbols
        .iter()
        .map(|(depth, name, ty)| {
            let scope = if *depth == 0 {
                "global".to_string()
            } else {
                format!("scope {}", depth)
            };
            (scope, name.clone(), ty.to_string())
        })
        .collect()
}

/// Render the bindings still visible at the end of the input, innermost
/// scope first. A declaration error, if any, follows them.
pub fn render_symbols_pane(
    frame: &mut Frame,
    area: Rect,
    symbols: &[(usize, String, SymbolType)],
    symbol_error: Option<&str>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Symbols ", is_focused).padding(Padding::new(1, 0, 0, 0));

    let mut items: Vec<ListItem> = symbol_rows(symbols)
        .into_iter()
        .map(|(scope, name, ty)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<9}", scope), Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(format!("{:<8}", ty), Style::default().fg(DEFAULT_THEME.type_name)),
                Span::styled(name, Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    if items.is_empty() && symbol_error.is_none() {
        items.push(ListItem::new("(no declarations)").style(Style::default().fg(DEFAULT_THEME.comment)));
    }
    if let Some(message) = symbol_error {
        items.push(ListItem::new(message.to_string()).style(Style::default().fg(DEFAULT_THEME.error)));
    }

    let visible_height = clamp_scroll(items.len(), area, scroll_offset);
    let visible_items: Vec<ListItem> = items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
