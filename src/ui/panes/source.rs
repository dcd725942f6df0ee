//! Source pane rendering with syntax highlighting
//!
//! Highlighting uses a character scanner rather than the lexer so that the
//! pane still renders input the lexer rejects. The line holding a lexer
//! error, if any, is drawn in the error color.

use super::{clamp_scroll, pane_block};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

fn highlight_source_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];

        let mut end_index = i + 1;
        let style = if c == '"' {
            while end_index < chars.len() && chars[end_index].1 != '"' {
                end_index += 1;
            }
            end_index = (end_index + 1).min(chars.len());
            Style::default().fg(DEFAULT_THEME.string)
        } else if c.is_ascii_digit() {
            while end_index < chars.len()
                && (chars[end_index].1.is_ascii_digit() || chars[end_index].1 == '.')
            {
                end_index += 1;
            }
            Style::default().fg(DEFAULT_THEME.number)
        } else if c.is_alphanumeric() {
            while end_index < chars.len() && chars[end_index].1.is_alphanumeric() {
                end_index += 1;
            }
            let end = chars.get(end_index).map_or(line.len(), |&(pos, _)| pos);
            word_style(&line[start..end])
        } else {
            match c {
                '{' | '}' | '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
                '+' | '-' | '*' | '/' | '=' | '!' | '<' | '>' => {
                    Style::default().fg(DEFAULT_THEME.operator)
                }
                _ => Style::default().fg(DEFAULT_THEME.fg),
            }
        };

        let end = chars.get(end_index).map_or(line.len(), |&(pos, _)| pos);
        spans.push(Span::styled(&line[start..end], style));
        i = end_index;
    }

    Line::from(spans)
}

fn word_style(word: &str) -> Style {
    match word {
        "int" | "float" | "char" => Style::default().fg(DEFAULT_THEME.type_name),
        "if" | "while" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the source pane. `error_line` is 1-based.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Source ", is_focused);
    let lines: Vec<&str> = source_code.lines().collect();
    let visible_height = clamp_scroll(lines.len(), area, scroll_offset);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let mut content = highlight_source_line(line);

            let num_style = if error_line == Some(line_num) {
                let error_style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content.spans {
                    span.style = error_style;
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
