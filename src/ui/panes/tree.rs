//! Syntax tree and AST pane rendering
//!
//! Trees are drawn as an indented outline in pre-order. Nonterminal nodes are
//! dimmed so the terminals that survive into the AST stand out.

use super::{clamp_scroll, pane_block};
use crate::parser::tree::SyntaxTree;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

/// Outline rows as `(indent, lexeme, is_nonterminal)`.
fn outline_rows(tree: &SyntaxTree) -> Vec<(String, String, bool)> {
    tree.outline()
        .into_iter()
        .map(|(depth, id)| {
            let token = tree.token(id);
            ("  ".repeat(depth), token.lexeme.clone(), token.is_nonterminal())
        })
        .collect()
}

/// Render a tree pane titled `title`, or `placeholder` when there is no
/// tree to show.
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    tree: Option<&SyntaxTree>,
    placeholder: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(title, is_focused);

    let Some(tree) = tree.filter(|t| !t.is_empty()) else {
        let paragraph = Paragraph::new(placeholder.to_string())
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = outline_rows(tree);
    let visible_height = clamp_scroll(rows.len(), area, scroll_offset);

    let items: Vec<ListItem> = rows
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(indent, lexeme, is_nonterminal)| {
            let style = if is_nonterminal {
                Style::default()
                    .fg(DEFAULT_THEME.nonterminal)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD)
            };
            ListItem::new(Line::from(vec![Span::raw(indent), Span::styled(lexeme, style)]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
