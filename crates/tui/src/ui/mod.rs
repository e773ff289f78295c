use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use textwrap::wrap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, ConfirmAction, Focus, SettingsField, SettingsForm, StatusKind, QTY_CHOICES};
use crate::strings::{
    build_status_line, help_lines_ascii, APP_TITLE, CONFIRM_CLEAR_HISTORY, HISTORY_EMPTY,
    LABEL_AUTH_TOKEN, LABEL_ENDPOINT, PLACEHOLDER, SETTINGS_HINT, TITLE_CONFIRM, TITLE_HELP,
    TITLE_HISTORY, TITLE_LABEL, TITLE_QTY, TITLE_SETTINGS,
};
use crate::theme::THEME;

const CHIP_MAX_WIDTH: usize = 24;

pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        APP_TITLE,
        Style::default().fg(THEME.title).add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, chunks[0]);

    draw_history(f, chunks[1], app);
    let overlay_open = app.settings_form.is_some() || app.confirm.is_some() || app.show_help;
    draw_input(f, chunks[2], app, !overlay_open);
    draw_qty(f, chunks[3], app);
    draw_message(f, chunks[4], app);
    draw_status(f, chunks[5], app);

    if let Some(form) = &app.settings_form {
        draw_settings(f, area, form, app.confirm.is_none());
    }
    if let Some(action) = app.confirm {
        draw_confirm(f, area, action);
    }
    if app.show_help {
        draw_help(f, area);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(THEME.border_focus)
    } else {
        Style::default().fg(THEME.border_inactive)
    }
}

fn chip_text(item: &str) -> String {
    let flat = item.replace('\n', " ");
    if UnicodeWidthStr::width(flat.as_str()) <= CHIP_MAX_WIDTH {
        return flat;
    }
    let mut out = String::new();
    let mut used = 0usize;
    for g in flat.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > CHIP_MAX_WIDTH - 3 {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push_str("...");
    out
}

// First chip index to render so that `selected` ends up inside `width`.
fn chip_window_start(widths: &[usize], selected: usize, width: usize) -> usize {
    let mut start = 0usize;
    loop {
        let span: usize = widths[start..=selected.min(widths.len().saturating_sub(1))]
            .iter()
            .map(|w| w + 1)
            .sum();
        if span <= width || start >= selected {
            return start;
        }
        start += 1;
    }
}

fn draw_history(f: &mut Frame, area: Rect, app: &mut App) {
    let focused = app.focus == Focus::History;
    let block = Block::default()
        .title(TITLE_HISTORY)
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(area);
    app.history_hits.clear();

    if app.history_items.is_empty() {
        let para = Paragraph::new(Span::styled(
            HISTORY_EMPTY,
            Style::default().fg(THEME.placeholder),
        ))
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let chips: Vec<String> = app.history_items.iter().map(|s| format!(" {} ", chip_text(s))).collect();
    let widths: Vec<usize> = chips.iter().map(|c| UnicodeWidthStr::width(c.as_str())).collect();
    let start = if focused {
        chip_window_start(&widths, app.history_selected, inner.width as usize)
    } else {
        0
    };

    let mut spans: Vec<Span> = Vec::new();
    let mut x = inner.x;
    let right = inner.x + inner.width;
    for (i, chip) in chips.iter().enumerate().skip(start) {
        if x >= right {
            break;
        }
        let w = (widths[i] as u16).min(right - x);
        let style = if focused && i == app.history_selected {
            Style::default()
                .fg(THEME.chip_selected_fg)
                .bg(THEME.chip_selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(THEME.chip_fg).add_modifier(Modifier::REVERSED)
        };
        spans.push(Span::styled(chip.clone(), style));
        spans.push(Span::raw(" "));
        app.history_hits.push((Rect::new(x, inner.y, w, 1), i));
        x = x.saturating_add(w + 1);
    }
    let para = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(para, area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App, show_cursor: bool) {
    let focused = app.focus == Focus::Input;
    let block = Block::default()
        .title(TITLE_LABEL)
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner_width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2).max(1);
    let graphemes: Vec<&str> = app.input.buffer.graphemes(true).collect();
    let upto = app.input.cursor.min(graphemes.len());
    let (line_idx, col_width) = measure_prefix_line_col(&graphemes, upto, inner_width);
    let offset_y = line_idx.saturating_sub(visible.saturating_sub(1));

    let para = if app.input.is_empty() {
        Paragraph::new(Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(THEME.placeholder),
        )))
        .block(block)
    } else {
        Paragraph::new(app.input.buffer.clone())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((offset_y, 0))
    };
    f.render_widget(para, area);

    if focused && show_cursor {
        let cursor_x = area.x + 1 + col_width;
        let cursor_y = area.y + 1 + line_idx.saturating_sub(offset_y);
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_qty(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(TITLE_QTY)
        .borders(Borders::ALL)
        .border_style(border_style(false));
    let mut spans: Vec<Span> = Vec::new();
    for q in QTY_CHOICES {
        let style = if q == app.qty {
            Style::default()
                .fg(THEME.qty_selected_fg)
                .bg(THEME.qty_selected_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", q), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_message(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = &app.status else {
        return;
    };
    let color = match status.kind {
        StatusKind::Info => THEME.status_info,
        StatusKind::Error => THEME.status_error,
    };
    let width = area.width.max(1) as usize;
    let lines: Vec<Line> = wrap(&status.text, width)
        .into_iter()
        .take(area.height as usize)
        .map(|l| Line::from(Span::styled(l.into_owned(), Style::default().fg(color))))
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let focus = match app.focus {
        Focus::Input => "Label",
        Focus::History => "Recent",
    };
    let line = build_status_line(
        focus,
        app.qty,
        app.history_items.len(),
        app.is_printing(),
        area.width,
    );
    let para = Paragraph::new(Span::styled(line, Style::default().fg(THEME.border_inactive)));
    f.render_widget(para, area);
}

fn draw_settings(f: &mut Frame, area: Rect, form: &SettingsForm, show_cursor: bool) {
    let popup_area = centered_rect(70, 50, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_SETTINGS,
            Style::default().fg(THEME.title).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let field_style = |active: bool| {
        if active {
            Style::default().fg(THEME.border_focus).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };
    let ep_active = form.field == SettingsField::Endpoint;
    let lines = vec![
        Line::from(Span::styled(LABEL_ENDPOINT, field_style(ep_active))),
        Line::from(format!(">> {}", form.endpoint.buffer)),
        Line::from(""),
        Line::from(Span::styled(LABEL_AUTH_TOKEN, field_style(!ep_active))),
        Line::from(format!(">> {}", form.auth_token.buffer)),
        Line::from(""),
        Line::from(Span::styled(SETTINGS_HINT, Style::default().fg(THEME.placeholder))),
    ];
    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(block), popup_area);

    if show_cursor {
        let (field, row) = if ep_active {
            (&form.endpoint, 2)
        } else {
            (&form.auth_token, 5)
        };
        let prefix: String = field.buffer.graphemes(true).take(field.cursor).collect();
        let cursor_x = popup_area.x + 4 + UnicodeWidthStr::width(prefix.as_str()) as u16;
        let cursor_y = popup_area.y + row;
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_confirm(f: &mut Frame, area: Rect, action: ConfirmAction) {
    let popup_area = centered_rect(60, 30, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_CONFIRM,
            Style::default().fg(THEME.title).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let text = match action {
        ConfirmAction::ClearHistory => CONFIRM_CLEAR_HISTORY,
    };
    let para = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    let block = Block::default()
        .title(Span::styled(
            TITLE_HELP,
            Style::default().fg(THEME.title).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);
    let lines = help_lines_ascii()
        .iter()
        .map(|s| Line::from(*s))
        .collect::<Vec<Line>>();
    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(Clear, popup_area);
    f.render_widget(para, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}

// Line index and display column of the caret after `upto` graphemes,
// wrapping at `width` the same way the input paragraph does.
fn measure_prefix_line_col(graphemes: &[&str], upto: usize, width: u16) -> (u16, u16) {
    if width == 0 {
        return (0, 0);
    }
    let mut line = 0usize;
    let mut col = 0usize;
    for g in graphemes.iter().take(upto) {
        if *g == "\n" {
            line += 1;
            col = 0;
            continue;
        }
        let w = UnicodeWidthStr::width(*g);
        if col + w > width as usize {
            line += 1;
            col = 0;
        }
        col += w;
    }
    (line as u16, col as u16)
}
