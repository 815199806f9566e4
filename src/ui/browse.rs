use crate::app::{App, Focus, InputMode, ViewState};
use crate::browse::{GameCard, GamesPane, Tone};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();

    // Layout: header(3) + search(3) + body(min) + status(1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(app, frame, chunks[0]);
    render_search_bar(app, frame, chunks[1]);

    // ── Body ──
    if app.folder_chooser_visible() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[2]);
        render_folders(app, frame, body[0]);
        render_pane(app, frame, body[1]);
    } else {
        render_pane(app, frame, chunks[2]);
    }

    render_status_bar(app, frame, chunks[3]);

    if let Some(toast) = &app.toast {
        render_toast(&toast.text, frame, chunks[2]);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = if app.is_admin() { " Games Catalog · Admin" } else { " Games Catalog" };
    let header_text = match (&app.view, app.selected_folder()) {
        (ViewState::Search { query, .. }, _) => format!("{}   [search: {}]", title, query),
        (ViewState::Browse { .. }, Some(folder)) => format!("{}   [{}]", title, folder.name),
        (ViewState::Browse { .. }, None) => title.to_string(),
    };
    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(header, area);
}

fn render_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let style = match app.input_mode {
        InputMode::Editing => Style::default().fg(Color::Yellow),
        InputMode::Normal => Style::default().fg(Color::DarkGray),
    };
    let label = if app.input_mode == InputMode::Editing {
        " Search (Enter to keep, Esc to clear): "
    } else {
        " Search (/): "
    };

    let title = if app.search_pending() { " Search … " } else { " Search " };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);
    if app.clear_indicator_visible() {
        block = block.title_top(
            Line::from(Span::styled(" ✕ Esc clears ", Style::default().fg(Color::Red)))
                .alignment(Alignment::Right),
        );
    }

    let bar = Paragraph::new(format!("{}{}", label, app.search_input))
        .style(style)
        .block(block);
    frame.render_widget(bar, area);

    if app.input_mode == InputMode::Editing {
        let cursor_x = area.x + 1 + label.width() as u16 + app.search_input.width() as u16;
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn render_folders(app: &App, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = app
        .folders
        .iter()
        .map(|f| ListItem::new(truncate_str(&f.name, (area.width as usize).saturating_sub(4))))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(app.focus == Focus::Folders))
                .title(" Folders ")
                .title_bottom(Line::from(format!(" {} ", app.folders.len())).alignment(Alignment::Right)),
        )
        .highlight_style(highlight())
        .highlight_symbol("▸ ");

    let mut state = ListState::default();
    if !app.folders.is_empty() {
        state.select(Some(app.folder_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pane(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(app.focus == Focus::Games))
        .title(" Games ");

    match &app.pane {
        GamesPane::Empty => frame.render_widget(block, area),
        GamesPane::Message { title, body, tone } => {
            let body_style = match tone {
                Tone::Muted => Style::default().fg(Color::DarkGray),
                Tone::Error => Style::default().fg(Color::Red),
            };
            let mut lines = vec![Line::from("")];
            if let Some(title) = title {
                lines.push(Line::from(Span::styled(
                    title.as_str(),
                    body_style.add_modifier(Modifier::BOLD),
                )));
            }
            lines.push(Line::from(Span::styled(body.as_str(), body_style)));
            let message = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(message, area);
        }
        GamesPane::Cards { header, cards } => {
            let inner = block.inner(area);
            frame.render_widget(block, area);

            let list_area = match header {
                Some((title, subtitle)) => {
                    let parts = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([Constraint::Length(2), Constraint::Min(1)])
                        .split(inner);
                    let lines = vec![
                        Line::from(Span::styled(
                            title.as_str(),
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                        )),
                        Line::from(Span::styled(subtitle.as_str(), Style::default().fg(Color::DarkGray))),
                    ];
                    frame.render_widget(Paragraph::new(lines), parts[0]);
                    parts[1]
                }
                None => inner,
            };

            let width = (list_area.width as usize).saturating_sub(4);
            let items: Vec<ListItem> = cards.iter().map(|card| card_item(card, width)).collect();
            let list = List::new(items).highlight_style(highlight()).highlight_symbol("▸ ");

            let mut state = ListState::default();
            if !cards.is_empty() {
                state.select(Some(app.game_selected));
            }
            frame.render_stateful_widget(list, list_area, &mut state);
        }
    }
}

fn card_item(card: &GameCard, width: usize) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        truncate_str(&card.name, width),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))];
    for (label, value) in card.fields() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}: ", label), Style::default().fg(Color::Cyan)),
            Span::raw(truncate_str(value, width.saturating_sub(label.len() + 4))),
        ]));
    }
    if !card.description.is_empty() {
        let first = card.description.lines().next().unwrap_or("").trim();
        lines.push(Line::from(Span::raw(format!("  {}", truncate_str(first, width.saturating_sub(2))))));
    }
    lines.push(Line::from(Span::styled(
        format!("  View Details: {}", card.details_path()),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut spans = vec![
        Span::styled(" ↑↓", key_style),
        Span::raw(" Navigate  "),
        Span::styled("Tab", key_style),
        Span::raw(" Pane  "),
        Span::styled("/", key_style),
        Span::raw(" Search  "),
        Span::styled("Enter", key_style),
        Span::raw(" Open  "),
    ];
    if app.is_admin() {
        spans.extend([
            Span::styled("a", key_style),
            Span::raw(" Add  "),
            Span::styled("e", key_style),
            Span::raw(" Edit  "),
            Span::styled("d", key_style),
            Span::raw(" Delete  "),
            Span::styled("n", key_style),
            Span::raw(" Folder  "),
        ]);
    }
    spans.extend([
        Span::styled("?", key_style),
        Span::raw(" Help  "),
        Span::styled("q", key_style),
        Span::raw(" Quit  "),
        Span::styled(app.status_msg.as_str(), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_toast(text: &str, frame: &mut Frame, area: Rect) {
    let width = (text.width() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.bottom().saturating_sub(4),
        width,
        height: area.height.min(3),
    };
    frame.render_widget(Clear, rect);
    let toast = Paragraph::new(text.to_string())
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        );
    frame.render_widget(toast, rect);
}

/// Truncate a string to `max_width` display columns, adding "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}
