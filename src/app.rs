use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{error, info, warn};

use crate::api::Surface;
use crate::browse::GamesPane;
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::event::{AppEvent, Command, GameChange, ModalRequest};
use crate::modal::{GameDetailModal, ModalController, ModalKey};
use crate::model::{Folder, FolderId, GameDraft, GameId};

pub const DELETE_CONFIRM: &str = "Are you sure you want to delete this game?";

/// Which listing the card pane belongs to. The folder chooser is shown
/// only while browsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Browse { folder: Option<FolderId> },
    /// `folder` is the folder that was open when the search started; it is
    /// where refreshes go once the search is cleared.
    Search { query: String, folder: Option<FolderId> },
}

impl ViewState {
    pub fn current_folder(&self) -> Option<FolderId> {
        match self {
            ViewState::Browse { folder } | ViewState::Search { folder, .. } => *folder,
        }
    }

    pub fn is_search_mode(&self) -> bool {
        matches!(self, ViewState::Search { .. })
    }
}

/// Which pane has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Folders,
    Games,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub text: String,
}

/// Main application state.
///
/// Every state change happens here, on the UI loop. Anything that needs
/// the network comes back out as a [`Command`] for the runtime to spawn.
pub struct App {
    pub surface: Surface,
    pub should_quit: bool,
    pub show_help: bool,

    pub view: ViewState,
    pub focus: Focus,

    // Folder chooser
    pub folders: Vec<Folder>,
    pub folder_selected: usize,

    // Card pane
    pub pane: GamesPane,
    pub game_selected: usize,

    // Search bar
    pub search_input: String,
    pub input_mode: InputMode,
    search_debounce: Debouncer<String>,

    pub modals: ModalController,
    pub toast: Option<Toast>,
    toast_seq: u64,
    delete_toast: Duration,
    folder_toast: Duration,

    pub status_msg: String,
}

impl App {
    pub fn new(surface: Surface, config: &Config) -> Self {
        Self {
            surface,
            should_quit: false,
            show_help: false,

            view: ViewState::Browse { folder: None },
            focus: Focus::Folders,

            folders: Vec::new(),
            folder_selected: 0,

            pane: GamesPane::Empty,
            game_selected: 0,

            search_input: String::new(),
            input_mode: InputMode::Normal,
            search_debounce: Debouncer::new(config.search_debounce()),

            modals: ModalController::new(),
            toast: None,
            toast_seq: 0,
            delete_toast: config.delete_toast(),
            folder_toast: config.folder_toast(),

            status_msg: "Loading folders...".to_string(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.surface == Surface::Admin
    }

    /// Initial data load.
    pub fn init(&mut self) -> Vec<Command> {
        vec![Command::LoadFolders]
    }

    /// The clear-search indicator is visible whenever the bar holds text.
    pub fn clear_indicator_visible(&self) -> bool {
        !self.search_input.trim().is_empty()
    }

    /// A typed query is waiting out the debounce delay.
    pub fn search_pending(&self) -> bool {
        self.search_debounce.is_pending()
    }

    pub fn folder_chooser_visible(&self) -> bool {
        !self.view.is_search_mode()
    }

    pub fn selected_folder(&self) -> Option<&Folder> {
        self.folders.get(self.folder_selected)
    }

    pub fn selected_game(&self) -> Option<GameId> {
        self.pane.cards().get(self.game_selected).map(|c| c.id)
    }

    // ── Browse & search ──

    /// Switch to a folder's games. Leaves search mode.
    pub fn show_games(&mut self, folder: FolderId) -> Vec<Command> {
        info!(folder, "show folder");
        self.view = ViewState::Browse { folder: Some(folder) };
        self.search_input.clear();
        self.search_debounce.cancel();
        self.pane = GamesPane::loading();
        self.game_selected = 0;
        vec![Command::LoadFolderGames(folder)]
    }

    /// Run a search. A blank query clears search instead.
    pub fn search_games(&mut self, query: &str) -> Vec<Command> {
        let query = query.trim();
        if query.is_empty() {
            self.clear_search();
            return Vec::new();
        }
        info!(query, "search");
        let folder = self.view.current_folder();
        self.view = ViewState::Search {
            query: query.to_string(),
            folder,
        };
        self.focus = Focus::Games;
        vec![Command::Search(query.to_string())]
    }

    /// Leave search mode and bring the folder chooser back. The pane stays
    /// blank until a folder is picked again.
    pub fn clear_search(&mut self) {
        let folder = self.view.current_folder();
        self.view = ViewState::Browse { folder };
        self.search_input.clear();
        self.search_debounce.cancel();
        self.pane = GamesPane::Empty;
        self.game_selected = 0;
        self.focus = Focus::Folders;
    }

    /// React to an edit of the search bar.
    pub fn search_input_changed(&mut self) -> Vec<Command> {
        let query = self.search_input.trim().to_string();
        if query.is_empty() {
            self.clear_search();
            return Vec::new();
        }
        let token = self.search_debounce.schedule(query);
        vec![Command::StartDebounce {
            token,
            delay: self.search_debounce.delay(),
        }]
    }

    // ── Events from tasks ──

    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Command> {
        match event {
            AppEvent::OpenModal(request) => match request {
                ModalRequest::GameForm { initial, reply } => {
                    let seq = self.modals.open_game_form(initial, reply);
                    vec![Command::LoadFormFolders { seq }]
                }
                ModalRequest::FolderForm { reply } => {
                    self.modals.open_folder_form(reply);
                    Vec::new()
                }
                ModalRequest::Confirm { message, reply } => {
                    self.modals.open_confirm(&message, reply);
                    Vec::new()
                }
            },
            AppEvent::FoldersLoaded(Ok(folders)) => {
                self.status_msg = format!("{} folders", folders.len());
                self.folders = folders;
                if self.folder_selected >= self.folders.len() {
                    self.folder_selected = self.folders.len().saturating_sub(1);
                }
                Vec::new()
            }
            AppEvent::FoldersLoaded(Err(e)) => {
                error!(error = %e, "loading folders failed");
                self.status_msg = e.user_message();
                Vec::new()
            }
            AppEvent::FormFoldersLoaded { seq, folders } => {
                if !self.modals.set_form_folders(seq, folders) {
                    warn!(seq, "folder list arrived after the game form closed");
                }
                Vec::new()
            }
            AppEvent::FolderGamesLoaded { folder, result } => {
                if let Err(e) = &result {
                    error!(folder, error = %e, "loading games failed");
                }
                self.pane = GamesPane::for_folder(&result);
                self.game_selected = 0;
                Vec::new()
            }
            AppEvent::SearchLoaded { query, result } => {
                if let Err(e) = &result {
                    error!(query, error = %e, "search failed");
                }
                self.pane = GamesPane::for_search(&query, &result);
                self.game_selected = 0;
                Vec::new()
            }
            AppEvent::DebounceElapsed(token) => match self.search_debounce.fire(token) {
                Some(query) => self.search_games(&query),
                None => Vec::new(),
            },
            AppEvent::GameChanged(change) => self.refresh_after(change),
            AppEvent::FolderAdded { name } => {
                let mut commands = vec![Command::LoadFolders];
                let ttl = self.folder_toast;
                commands.push(self.show_toast(format!("Folder \"{}\" added!", name), ttl));
                commands
            }
            AppEvent::ToastExpired(id) => {
                if self.toast.as_ref().is_some_and(|t| t.id == id) {
                    self.toast = None;
                }
                Vec::new()
            }
        }
    }

    /// Pick the view to reload after a game mutation: search results first,
    /// then the open folder, then a change-specific fallback.
    fn refresh_after(&mut self, change: GameChange) -> Vec<Command> {
        let mut commands = if self.view.is_search_mode() {
            let query = self.search_input.trim().to_string();
            if query.is_empty() {
                Vec::new()
            } else {
                self.search_games(&query)
            }
        } else if let Some(folder) = self.view.current_folder() {
            self.show_games(folder)
        } else {
            match change {
                GameChange::Created => vec![Command::LoadFolders],
                GameChange::Updated => Vec::new(),
                GameChange::Deleted(id) => {
                    self.pane.remove_card(id);
                    self.clamp_game_selection();
                    Vec::new()
                }
            }
        };

        if let GameChange::Deleted(_) = change {
            let ttl = self.delete_toast;
            commands.push(self.show_toast("Game deleted".to_string(), ttl));
        }
        commands
    }

    fn show_toast(&mut self, text: String, ttl: Duration) -> Command {
        self.toast_seq += 1;
        self.toast = Some(Toast {
            id: self.toast_seq,
            text,
        });
        Command::ExpireToast {
            id: self.toast_seq,
            after: ttl,
        }
    }

    fn clamp_game_selection(&mut self) {
        let len = self.pane.cards().len();
        if self.game_selected >= len {
            self.game_selected = len.saturating_sub(1);
        }
    }

    // ── Keys ──

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }

        if self.modals.is_open() {
            return match self.modals.handle_key(key) {
                ModalKey::OpenLink(link) => vec![Command::OpenUrl(link)],
                _ => Vec::new(),
            };
        }

        if self.input_mode == InputMode::Editing {
            return self.handle_search_key(key);
        }

        // Help toggle
        if key.code == KeyCode::Char('?') {
            self.show_help = !self.show_help;
            return Vec::new();
        }
        if self.show_help {
            self.show_help = false;
            return Vec::new();
        }

        self.handle_normal_key(key)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.clear_search();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Down => {
                self.input_mode = InputMode::Normal;
                Vec::new()
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.search_input_changed()
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.search_input_changed()
            }
            _ => Vec::new(),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Editing;
                Vec::new()
            }
            KeyCode::Esc => {
                if self.view.is_search_mode() || !self.search_input.is_empty() {
                    self.clear_search();
                }
                Vec::new()
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Folders => Focus::Games,
                    Focus::Games if self.folder_chooser_visible() => Focus::Folders,
                    Focus::Games => Focus::Games,
                };
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                Vec::new()
            }
            KeyCode::Enter => match self.focus {
                Focus::Folders => match self.selected_folder() {
                    Some(folder) => {
                        let id = folder.id;
                        self.focus = Focus::Games;
                        self.show_games(id)
                    }
                    None => Vec::new(),
                },
                Focus::Games => {
                    if let Some(card) = self.pane.cards().get(self.game_selected) {
                        let detail = GameDetailModal::new(&card.name, &card.description, &card.video_link);
                        self.modals.open_detail(detail);
                    }
                    Vec::new()
                }
            },
            KeyCode::Char('o') => match self.selected_game() {
                Some(id) => vec![Command::OpenGamePage(id)],
                None => Vec::new(),
            },
            KeyCode::Char('r') => vec![Command::LoadFolders],
            KeyCode::Char(c) if self.is_admin() => self.handle_admin_key(c),
            _ => Vec::new(),
        }
    }

    fn handle_admin_key(&mut self, c: char) -> Vec<Command> {
        match c {
            'a' => {
                let folder_ids = self.view.current_folder().into_iter().collect();
                vec![Command::AddGame {
                    initial: GameDraft {
                        folder_ids,
                        ..Default::default()
                    },
                }]
            }
            'e' => self.selected_game().map(Command::EditGame).into_iter().collect(),
            'd' => self.selected_game().map(Command::DeleteGame).into_iter().collect(),
            'n' => vec![Command::AddFolder],
            _ => Vec::new(),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.focus {
            Focus::Folders => (&mut self.folder_selected, self.folders.len()),
            Focus::Games => (&mut self.game_selected, self.pane.cards().len()),
        };
        if len == 0 {
            return;
        }
        *selected = selected.saturating_add_signed(delta).min(len - 1);
    }
}
