//! Token stream pane rendering

use super::{clamp_scroll, pane_block};
use crate::lexer::token::{TerminalKind, Token};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

fn kind_style(kind: TerminalKind) -> Style {
    match kind {
        TerminalKind::IntLiteral | TerminalKind::FloatLiteral => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        TerminalKind::StringLiteral => Style::default().fg(DEFAULT_THEME.string),
        TerminalKind::BuiltinTypeInt | TerminalKind::BuiltinTypeFloat | TerminalKind::BuiltinTypeChar => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        TerminalKind::ControlFlowBranch | TerminalKind::ControlFlowWhile => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TerminalKind::FileEnd => Style::default().fg(DEFAULT_THEME.comment),
        kind if kind.is_arithmetic_op() => Style::default().fg(DEFAULT_THEME.operator),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the token pane. A lexer error, if any, is appended after the
/// tokens produced before it.
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    lex_error: Option<&str>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tokens ", is_focused).padding(Padding::new(1, 0, 0, 0));

    let mut items: Vec<ListItem> = tokens
        .iter()
        .enumerate()
        .map(|(idx, token)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:3} ", idx),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(format!("{:<15}", token.kind.to_string()), kind_style(token.kind)),
                Span::styled(token.lexeme.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    if let Some(message) = lex_error {
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
