mod browse;
mod help;
mod modal;

use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

/// Top-level render dispatch.
pub fn render(app: &App, frame: &mut Frame) {
    browse::render(app, frame);

    // Overlays, topmost last
    if let Some(active) = app.modals.active() {
        modal::render(active, frame);
    } else if app.show_help {
        help::render(app.is_admin(), frame);
    }
}

/// Create a centered rectangle using percentage of parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Surface;
    use crate::browse::GamesPane;
    use crate::config::Config;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_folder_message_is_drawn() {
        let mut app = App::new(Surface::Public, &Config::default());
        app.pane = GamesPane::muted(crate::browse::FOLDER_EMPTY);
        assert!(screen(&app).contains("No games available in this folder yet."));
    }

    #[test]
    fn test_admin_status_bar_lists_crud_keys() {
        let app = App::new(Surface::Admin, &Config::default());
        let s = screen(&app);
        assert!(s.contains("Delete"));
        let app = App::new(Surface::Public, &Config::default());
        assert!(!screen(&app).contains("Delete"));
    }
}
