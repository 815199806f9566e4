use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::centered_rect;
use crate::modal::{
    ConfirmModal, FolderFormModal, FormField, GameDetailModal, GameFormModal, Modal,
};

pub fn render(modal: &Modal, frame: &mut Frame) {
    match modal {
        Modal::GameDetail(detail) => render_detail(detail, frame),
        Modal::GameForm(form) => render_game_form(form, frame),
        Modal::FolderForm(form) => render_folder_form(form, frame),
        Modal::Confirm(confirm) => render_confirm(confirm, frame),
    }
}

fn hint(text: &str) -> Line<'_> {
    Line::from(format!(" {} ", text)).style(Style::default().fg(Color::DarkGray))
}

fn render_detail(detail: &GameDetailModal, frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    lines.extend(detail.description.lines().map(|l| Line::from(l.to_string())));
    if let Some(link) = &detail.link {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Video: ", Style::default().fg(Color::Cyan)),
            Span::styled(link.as_str(), Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]));
    }

    let footer = if detail.link.is_some() { "o: Open video | Esc: Close" } else { "Esc: Close" };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} ", detail.title))
                .title_bottom(hint(footer)),
        );
    frame.render_widget(paragraph, area);
}

fn render_game_form(form: &GameFormModal, frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" {} ", form.title))
        .title_bottom(hint("Tab: Next field | Space: Toggle folder | Enter: Save | Esc: Cancel"));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text_fields: Vec<FormField> = FormField::ALL
        .into_iter()
        .filter(|f| *f != FormField::Folders)
        .collect();
    let mut constraints: Vec<Constraint> = text_fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in text_fields.iter().enumerate() {
        let focused = form.focus == *field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(form.field(*field).to_string())
            .style(Style::default().fg(Color::White))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style)
                    .title(format!(" {} ", field.label())),
            );
        frame.render_widget(input, chunks[i]);

        if focused {
            let value = form.field(*field);
            let x = chunks[i].x + 1 + unicode_width::UnicodeWidthStr::width(value) as u16;
            frame.set_cursor_position((x.min(chunks[i].right().saturating_sub(2)), chunks[i].y + 1));
        }
    }

    // ── Folder multi-select ──
    let folders_area = chunks[text_fields.len()];
    let focused = form.focus == FormField::Folders;
    let folder_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(format!(" {} ", FormField::Folders.label()));

    if !form.folders_loaded {
        let loading = Paragraph::new("Loading folders...")
            .style(Style::default().fg(Color::DarkGray))
            .block(folder_block);
        frame.render_widget(loading, folders_area);
        return;
    }

    let items: Vec<ListItem> = form
        .folders
        .iter()
        .map(|f| {
            let mark = if f.selected { "[x] " } else { "[ ] " };
            let style = if f.selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![Span::styled(mark, style), Span::raw(f.name.as_str())]))
        })
        .collect();
    let list = List::new(items)
        .block(folder_block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default();
    if focused && !form.folders.is_empty() {
        state.select(Some(form.folder_cursor));
    }
    frame.render_stateful_widget(list, folders_area, &mut state);
}

fn render_folder_form(form: &FolderFormModal, frame: &mut Frame) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Add Folder ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title_bottom(hint("Enter: Save | Esc: Cancel"));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let input = Paragraph::new(form.name.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Name "));
    frame.render_widget(input, chunks[1]);

    let x = chunks[1].x + 1 + unicode_width::UnicodeWidthStr::width(form.name.as_str()) as u16;
    frame.set_cursor_position((x.min(chunks[1].right().saturating_sub(2)), chunks[1].y + 1));
}

fn render_confirm(confirm: &ConfirmModal, frame: &mut Frame) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(confirm.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(": Yes   "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(": No"),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Confirm ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    frame.render_widget(paragraph, area);
}
