use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::centered_rect;

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(keys: &'a str, action: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<10}", keys), Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

pub fn render(admin: bool, frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let mut help_text = vec![
        Line::from(""),
        section("Global"),
        binding("?", "Toggle this help"),
        binding("q", "Quit application"),
        binding("r", "Reload folders"),
        Line::from(""),
        section("Browse"),
        binding("↑/k ↓/j", "Navigate up/down"),
        binding("Tab", "Switch between folders and games"),
        binding("Enter", "Show folder's games / game details"),
        binding("o", "Open the game's page in a browser"),
        Line::from(""),
        section("Search"),
        binding("/", "Edit the search (results update as you type)"),
        binding("Enter", "Stop editing, keep results"),
        binding("Esc", "Clear search and return to folders"),
    ];

    if admin {
        help_text.extend([
            Line::from(""),
            section("Admin"),
            binding("a", "Add a game (current folder pre-selected)"),
            binding("e", "Edit selected game"),
            binding("d", "Delete selected game"),
            binding("n", "Add a folder"),
            Line::from(""),
            section("Game form"),
            binding("Tab/↑↓", "Move between fields"),
            binding("Space", "Toggle folder under cursor"),
            binding("Enter", "Save"),
            binding("Esc", "Cancel"),
        ]);
    }
    help_text.push(Line::from(""));

    let help = Paragraph::new(help_text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help: Keybindings ")
                .title_bottom(Line::from(" Press any key to close ").style(Style::default().fg(Color::DarkGray))),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(help, area);
}
