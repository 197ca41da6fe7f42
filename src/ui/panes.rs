//! Rendering logic for each TUI pane

use crate::memory::VariableStore;
use crate::parser::lexer::Keyword;
use crate::ui::theme::DEFAULT_THEME;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Syntax highlighting for a single line of Bare Bones
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in line.char_indices() {
        if c.is_ascii_alphabetic() {
            word_start.get_or_insert(i);
            continue;
        }

        if let Some(start) = word_start.take() {
            spans.push(word_span(&line[start..i]));
        }

        let style = match c {
            '0'..='9' => Style::default().fg(DEFAULT_THEME.number),
            ';' => Style::default().fg(DEFAULT_THEME.comment),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if let Some(start) = word_start {
        spans.push(word_span(&line[start..]));
    }

    Line::from(spans)
}

fn word_span(word: &str) -> Span<'_> {
    let style = if Keyword::from_word(word).is_some() {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.variable)
    };
    Span::styled(word, style)
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
    target_line_row: &mut Option<usize>,
) {
    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();

    // Account for borders (2), min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the current line at a fixed visual row, centered the first time
    let target_row = target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    *target_line_row = Some(target_row);

    if current_line > 0 && current_line <= total_lines {
        let target_line_idx = current_line - 1;
        *scroll_offset = target_line_idx.saturating_sub(target_row);

        if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            *scroll_offset = (*scroll_offset).min(max_scroll);
        } else {
            *scroll_offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let line_num_str = format!("{:4} ", line_num);

            let (num_style, content_base_style) = if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let mut content_line = highlight_source_code(line);

            if is_current {
                for span in &mut content_line.spans {
                    span.style = span.style.patch(content_base_style);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Shorten a long decimal so it fits in `max_chars`, keeping the leading digits
fn format_value(value: &str, max_chars: usize) -> String {
    let digits = value.chars().count();
    if digits <= max_chars {
        return value.to_string();
    }

    let suffix = format!("… ({} digits)", digits);
    let suffix_len = suffix.chars().count();
    if suffix_len < max_chars {
        let head: String = value.chars().take(max_chars - suffix_len).collect();
        return format!("{}{}", head, suffix);
    }

    // Too narrow for the digit count
    if max_chars == 0 {
        return String::new();
    }
    let head: String = value.chars().take(max_chars - 1).collect();
    format!("{}…", head)
}

/// Render the variables pane: every written variable in name order
pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    store: &VariableStore,
    last_written: Option<&str>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(format!(" Variables ({}) ", store.len()))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let entries = store.sorted();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    *scroll_offset = (*scroll_offset).min(entries.len().saturating_sub(visible_height));

    let name_width = entries
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let value_width = (area.width as usize)
        .saturating_sub(name_width + 7)
        .max(8);

    let lines: Vec<Line> = if entries.is_empty() {
        vec![Line::from(Span::styled(
            "  (no variables yet)",
            Style::default().fg(DEFAULT_THEME.comment),
        ))]
    } else {
        entries
            .iter()
            .skip(*scroll_offset)
            .take(visible_height)
            .map(|(name, value)| {
                let is_last = last_written == Some(*name);
                let marker = if is_last { "▶ " } else { "  " };
                let name_style = if is_last {
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(DEFAULT_THEME.variable)
                };

                Line::from(vec![
                    Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                    Span::styled(format!("{:<width$}", name, width = name_width), name_style),
                    Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(
                        format_value(&value.to_string(), value_width),
                        Style::default().fg(DEFAULT_THEME.number),
                    ),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

/// Render the status bar
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    current_step: usize,
    total_steps: usize,
    steps_executed: u64,
    is_playing: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Left side: Step info and status
    let left_spans = vec![
        Span::styled(
            format!(" Step {}/{} ", current_step + 1, total_steps),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} executed ", steps_executed),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.secondary),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" ←/→ ", key_style),
        Span::styled(" step ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" 1-9 ", key_style),
        Span::styled(" jump ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ⎵ ", key_style),
        Span::styled(" play ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↵ / ⌫ ", key_style),
        Span::styled(" end/start ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let is_at_start = current_step == 0;
    let is_at_end = current_step + 1 >= total_steps;

    let badge = if is_playing {
        Some((" ▶ PLAYING ", DEFAULT_THEME.secondary))
    } else if is_at_end {
        Some((" END ", DEFAULT_THEME.error))
    } else if is_at_start {
        Some((" START ", DEFAULT_THEME.success))
    } else {
        None
    };

    if let Some((text, color)) = badge {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
