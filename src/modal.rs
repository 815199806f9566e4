use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::{mpsc, oneshot};

use crate::event::{AppEvent, ModalRequest};
use crate::model::{Folder, FolderId, GameDraft};

pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure?";

/// Sending half of a modal's single-use result channel.
#[derive(Debug)]
pub struct Reply<T>(oneshot::Sender<T>);

impl<T> Reply<T> {
    fn resolve(self, value: T) {
        // The awaiting workflow may have given up; nothing to do then.
        let _ = self.0.send(value);
    }
}

/// Resolves to `Some(result)` when the modal is submitted, or `None` when
/// it is closed (or replaced) without submitting.
#[derive(Debug)]
pub struct ModalTicket<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for ModalTicket<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(Result::ok)
    }
}

pub fn ticket<T>() -> (Reply<T>, ModalTicket<T>) {
    let (tx, rx) = oneshot::channel();
    (Reply(tx), ModalTicket { rx })
}

/// Lets a background workflow open a modal on the UI loop and await the
/// user's answer.
#[derive(Debug, Clone)]
pub struct ModalHandle {
    events: mpsc::UnboundedSender<AppEvent>,
}

impl ModalHandle {
    pub fn new(events: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { events }
    }

    async fn open<T>(&self, make: impl FnOnce(Reply<T>) -> ModalRequest) -> Option<T> {
        let (reply, ticket) = ticket();
        if self.events.send(AppEvent::OpenModal(make(reply))).is_err() {
            return None;
        }
        ticket.await
    }

    pub async fn game_form(&self, initial: GameDraft) -> Option<GameDraft> {
        self.open(|reply| ModalRequest::GameForm { initial, reply }).await
    }

    pub async fn folder_form(&self) -> Option<String> {
        self.open(|reply| ModalRequest::FolderForm { reply }).await
    }

    pub async fn confirm(&self, message: &str) -> bool {
        let message = message.to_string();
        self.open(|reply| ModalRequest::Confirm { message, reply })
            .await
            .is_some()
    }
}

// ── Modal contents ──

#[derive(Debug, Clone)]
pub struct GameDetailModal {
    pub title: String,
    pub description: String,
    /// Only set when there is somewhere to go.
    pub link: Option<String>,
}

impl GameDetailModal {
    pub fn new(title: &str, description: &str, link: &str) -> Self {
        let link = match link.trim() {
            "" | "#" => None,
            l => Some(l.to_string()),
        };
        Self {
            title: title.to_string(),
            description: description.to_string(),
            link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Players,
    Time,
    Materials,
    Description,
    VideoLink,
    Folders,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        Self::Name,
        Self::Players,
        Self::Time,
        Self::Materials,
        Self::Description,
        Self::VideoLink,
        Self::Folders,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Players => "Number of players",
            Self::Time => "Time",
            Self::Materials => "Materials",
            Self::Description => "Description",
            Self::VideoLink => "Video link",
            Self::Folders => "Folders",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderOption {
    pub id: FolderId,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug)]
pub struct GameFormModal {
    pub title: &'static str,
    pub name: String,
    pub number_of_players: String,
    pub time: String,
    pub materials: String,
    pub description: String,
    pub video_link: String,
    pub folders: Vec<FolderOption>,
    pub folders_loaded: bool,
    pub folder_cursor: usize,
    pub focus: FormField,
    initial_folder_ids: Vec<FolderId>,
    reply: Option<Reply<GameDraft>>,
}

impl GameFormModal {
    pub fn new(initial: GameDraft, reply: Reply<GameDraft>) -> Self {
        // A blank name reads as "new", even when editing an existing game.
        let title = if initial.name.is_empty() { "Add Game" } else { "Edit Game" };
        Self {
            title,
            name: initial.name,
            number_of_players: initial.number_of_players,
            time: initial.time,
            materials: initial.materials,
            description: initial.description,
            video_link: initial.video_link,
            folders: Vec::new(),
            folders_loaded: false,
            folder_cursor: 0,
            focus: FormField::Name,
            initial_folder_ids: initial.folder_ids,
            reply: Some(reply),
        }
    }

    /// Fill the multi-select, pre-selecting the folders the form was seeded with.
    pub fn set_folders(&mut self, folders: Vec<Folder>) {
        self.folders = folders
            .into_iter()
            .map(|f| FolderOption {
                selected: self.initial_folder_ids.contains(&f.id),
                id: f.id,
                name: f.name,
            })
            .collect();
        self.folders_loaded = true;
        self.folder_cursor = 0;
    }

    pub fn selected_folder_ids(&self) -> Vec<FolderId> {
        self.folders.iter().filter(|f| f.selected).map(|f| f.id).collect()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Players => &self.number_of_players,
            FormField::Time => &self.time,
            FormField::Materials => &self.materials,
            FormField::Description => &self.description,
            FormField::VideoLink => &self.video_link,
            FormField::Folders => "",
        }
    }

    fn field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Name => Some(&mut self.name),
            FormField::Players => Some(&mut self.number_of_players),
            FormField::Time => Some(&mut self.time),
            FormField::Materials => Some(&mut self.materials),
            FormField::Description => Some(&mut self.description),
            FormField::VideoLink => Some(&mut self.video_link),
            FormField::Folders => None,
        }
    }

    /// The trimmed payload the form would submit right now.
    pub fn draft(&self) -> GameDraft {
        GameDraft {
            name: self.name.trim().to_string(),
            number_of_players: self.number_of_players.trim().to_string(),
            time: self.time.trim().to_string(),
            materials: self.materials.trim().to_string(),
            description: self.description.trim().to_string(),
            video_link: self.video_link.trim().to_string(),
            folder_ids: self.selected_folder_ids(),
        }
    }

    fn toggle_folder(&mut self) {
        if let Some(option) = self.folders.get_mut(self.folder_cursor) {
            option.selected = !option.selected;
        }
    }
}

#[derive(Debug)]
pub struct FolderFormModal {
    pub name: String,
    reply: Option<Reply<String>>,
}

#[derive(Debug)]
pub struct ConfirmModal {
    pub message: String,
    reply: Option<Reply<()>>,
}

#[derive(Debug)]
pub enum Modal {
    GameDetail(GameDetailModal),
    GameForm(GameFormModal),
    FolderForm(FolderFormModal),
    Confirm(ConfirmModal),
}

/// What a key press did to the active modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKey {
    /// No modal was open.
    Ignored,
    Handled,
    Closed,
    Submitted,
    OpenLink(String),
}

/// Owns the single visible modal. Opening one replaces (and cancels)
/// whatever was showing.
#[derive(Debug, Default)]
pub struct ModalController {
    active: Option<Modal>,
    seq: u64,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&Modal> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Bumped on every open, so late async fills can tell whether they
    /// still belong to the modal on screen.
    #[cfg(test)]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    fn show(&mut self, modal: Modal) -> u64 {
        self.seq += 1;
        self.active = Some(modal);
        self.seq
    }

    pub fn open_detail(&mut self, detail: GameDetailModal) -> u64 {
        self.show(Modal::GameDetail(detail))
    }

    pub fn open_game_form(&mut self, initial: GameDraft, reply: Reply<GameDraft>) -> u64 {
        self.show(Modal::GameForm(GameFormModal::new(initial, reply)))
    }

    pub fn open_folder_form(&mut self, reply: Reply<String>) -> u64 {
        self.show(Modal::FolderForm(FolderFormModal {
            name: String::new(),
            reply: Some(reply),
        }))
    }

    pub fn open_confirm(&mut self, message: &str, reply: Reply<()>) -> u64 {
        let message = if message.is_empty() {
            DEFAULT_CONFIRM_MESSAGE.to_string()
        } else {
            message.to_string()
        };
        self.show(Modal::Confirm(ConfirmModal {
            message,
            reply: Some(reply),
        }))
    }

    /// Hide the modal. A pending reply is dropped, which resolves its
    /// ticket to `None`.
    pub fn close(&mut self) {
        self.active = None;
    }

    /// Hand a fetched folder list to the game form opened as `seq`.
    pub fn set_form_folders(&mut self, seq: u64, folders: Vec<Folder>) -> bool {
        if seq != self.seq {
            return false;
        }
        match &mut self.active {
            Some(Modal::GameForm(form)) => {
                form.set_folders(folders);
                true
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalKey {
        let Some(modal) = self.active.as_mut() else {
            return ModalKey::Ignored;
        };

        match modal {
            Modal::GameDetail(detail) => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                    self.close();
                    ModalKey::Closed
                }
                KeyCode::Char('o') => match &detail.link {
                    Some(link) => ModalKey::OpenLink(link.clone()),
                    None => ModalKey::Handled,
                },
                _ => ModalKey::Handled,
            },
            Modal::GameForm(form) => match key.code {
                KeyCode::Esc => {
                    self.close();
                    ModalKey::Closed
                }
                KeyCode::Enter => {
                    let draft = form.draft();
                    let reply = form.reply.take();
                    self.close();
                    if let Some(reply) = reply {
                        reply.resolve(draft);
                    }
                    ModalKey::Submitted
                }
                KeyCode::Tab => {
                    form.focus = form.focus.next();
                    ModalKey::Handled
                }
                KeyCode::BackTab => {
                    form.focus = form.focus.prev();
                    ModalKey::Handled
                }
                KeyCode::Down if form.focus == FormField::Folders => {
                    if form.folder_cursor + 1 < form.folders.len() {
                        form.folder_cursor += 1;
                    }
                    ModalKey::Handled
                }
                KeyCode::Up if form.focus == FormField::Folders => {
                    form.folder_cursor = form.folder_cursor.saturating_sub(1);
                    ModalKey::Handled
                }
                KeyCode::Char(' ') if form.focus == FormField::Folders => {
                    form.toggle_folder();
                    ModalKey::Handled
                }
                KeyCode::Down => {
                    form.focus = form.focus.next();
                    ModalKey::Handled
                }
                KeyCode::Up => {
                    form.focus = form.focus.prev();
                    ModalKey::Handled
                }
                KeyCode::Backspace => {
                    let focus = form.focus;
                    if let Some(value) = form.field_mut(focus) {
                        value.pop();
                    }
                    ModalKey::Handled
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    let focus = form.focus;
                    if let Some(value) = form.field_mut(focus) {
                        value.push(c);
                    }
                    ModalKey::Handled
                }
                _ => ModalKey::Handled,
            },
            Modal::FolderForm(form) => match key.code {
                KeyCode::Esc => {
                    self.close();
                    ModalKey::Closed
                }
                KeyCode::Enter => {
                    let name = form.name.trim().to_string();
                    let reply = form.reply.take();
                    self.close();
                    if let Some(reply) = reply {
                        reply.resolve(name);
                    }
                    ModalKey::Submitted
                }
                KeyCode::Backspace => {
                    form.name.pop();
                    ModalKey::Handled
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    form.name.push(c);
                    ModalKey::Handled
                }
                _ => ModalKey::Handled,
            },
            Modal::Confirm(confirm) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    let reply = confirm.reply.take();
                    self.close();
                    if let Some(reply) = reply {
                        reply.resolve(());
                    }
                    ModalKey::Submitted
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.close();
                    ModalKey::Closed
                }
                _ => ModalKey::Handled,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(modals: &mut ModalController, s: &str) {
        for c in s.chars() {
            modals.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn folders() -> Vec<Folder> {
        vec![
            Folder { id: 1, name: "Party".into() },
            Folder { id: 2, name: "Strategy".into() },
            Folder { id: 3, name: "Kids".into() },
        ]
    }

    #[test]
    fn test_detail_hides_placeholder_links() {
        assert_eq!(GameDetailModal::new("A", "d", "#").link, None);
        assert_eq!(GameDetailModal::new("A", "d", "  ").link, None);
        assert_eq!(
            GameDetailModal::new("A", "d", "https://v/1").link.as_deref(),
            Some("https://v/1")
        );
    }

    #[test]
    fn test_detail_open_link_key() {
        let mut modals = ModalController::new();
        modals.open_detail(GameDetailModal::new("A", "d", "https://v/1"));
        assert_eq!(
            modals.handle_key(key(KeyCode::Char('o'))),
            ModalKey::OpenLink("https://v/1".to_string())
        );
        assert_eq!(modals.handle_key(key(KeyCode::Esc)), ModalKey::Closed);
        assert!(!modals.is_open());
    }

    #[test]
    fn test_game_form_title_follows_name() {
        let (reply, _t) = ticket();
        let form = GameFormModal::new(GameDraft { name: "Chess".into(), ..Default::default() }, reply);
        assert_eq!(form.title, "Edit Game");

        let (reply, _t) = ticket();
        let form = GameFormModal::new(GameDraft::default(), reply);
        assert_eq!(form.title, "Add Game");
    }

    #[test]
    fn test_game_form_without_folder_ids_preselects_nothing() {
        let mut modals = ModalController::new();
        let (reply, _t) = ticket();
        let seq = modals.open_game_form(GameDraft::default(), reply);
        assert!(modals.set_form_folders(seq, folders()));

        let Some(Modal::GameForm(form)) = modals.active() else {
            panic!("expected game form");
        };
        assert!(form.folders_loaded);
        assert!(form.selected_folder_ids().is_empty());
    }

    #[test]
    fn test_game_form_preselects_initial_folders() {
        let mut modals = ModalController::new();
        let (reply, _t) = ticket();
        let initial = GameDraft { folder_ids: vec![3, 1], ..Default::default() };
        let seq = modals.open_game_form(initial, reply);
        modals.set_form_folders(seq, folders());

        let Some(Modal::GameForm(form)) = modals.active() else {
            panic!("expected game form");
        };
        assert_eq!(form.selected_folder_ids(), vec![1, 3]);
    }

    #[test]
    fn test_stale_folder_fill_is_ignored() {
        let mut modals = ModalController::new();
        let (reply, _t) = ticket();
        let old = modals.open_game_form(GameDraft::default(), reply);
        let (reply, _t2) = ticket();
        modals.open_folder_form(reply);
        assert!(!modals.set_form_folders(old, folders()));
    }

    #[tokio::test]
    async fn test_game_form_submit_trims_and_collects_folders() {
        let mut modals = ModalController::new();
        let (reply, ticket) = ticket();
        let seq = modals.open_game_form(GameDraft::default(), reply);
        modals.set_form_folders(seq, folders());

        type_str(&mut modals, "  Chess ");
        modals.handle_key(key(KeyCode::Tab));
        type_str(&mut modals, " 2 ");
        modals.handle_key(key(KeyCode::BackTab));
        modals.handle_key(key(KeyCode::BackTab));
        // Now on the folder list: pick the second entry.
        modals.handle_key(key(KeyCode::Down));
        modals.handle_key(key(KeyCode::Char(' ')));

        assert_eq!(modals.handle_key(key(KeyCode::Enter)), ModalKey::Submitted);
        assert!(!modals.is_open());

        let draft = ticket.await.expect("submitted");
        assert_eq!(draft.name, "Chess");
        assert_eq!(draft.number_of_players, "2");
        assert_eq!(draft.folder_ids, vec![2]);
    }

    #[tokio::test]
    async fn test_closing_cancels_ticket() {
        let mut modals = ModalController::new();
        let (reply, ticket) = ticket::<GameDraft>();
        modals.open_game_form(GameDraft::default(), reply);
        assert_eq!(modals.handle_key(key(KeyCode::Esc)), ModalKey::Closed);
        assert_eq!(ticket.await, None);
    }

    #[tokio::test]
    async fn test_reopening_cancels_previous_ticket() {
        let mut modals = ModalController::new();
        let (reply, first) = ticket::<()>();
        modals.open_confirm("Delete?", reply);
        let (reply, _second) = ticket::<()>();
        modals.open_confirm("Delete?", reply);
        assert_eq!(first.await, None);
    }

    #[tokio::test]
    async fn test_folder_form_resolves_trimmed_name() {
        let mut modals = ModalController::new();
        let (reply, ticket) = ticket();
        modals.open_folder_form(reply);
        type_str(&mut modals, "  Outdoor  ");
        modals.handle_key(key(KeyCode::Enter));
        assert_eq!(ticket.await.as_deref(), Some("Outdoor"));
    }

    #[tokio::test]
    async fn test_confirm_yes_and_default_message() {
        let mut modals = ModalController::new();
        let (reply, ticket) = ticket();
        modals.open_confirm("", reply);
        match modals.active() {
            Some(Modal::Confirm(c)) => assert_eq!(c.message, DEFAULT_CONFIRM_MESSAGE),
            _ => panic!("expected confirm"),
        }
        assert_eq!(modals.handle_key(key(KeyCode::Char('y'))), ModalKey::Submitted);
        assert_eq!(ticket.await, Some(()));
    }

    #[tokio::test]
    async fn test_modal_handle_round_trip() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = ModalHandle::new(tx);

        let waiter = tokio::spawn(async move { handle.confirm("Sure?").await });

        let Some(AppEvent::OpenModal(ModalRequest::Confirm { message, reply })) = rx.recv().await else {
            panic!("expected confirm request");
        };
        assert_eq!(message, "Sure?");
        let mut modals = ModalController::new();
        modals.open_confirm(&message, reply);
        modals.handle_key(key(KeyCode::Enter));

        assert!(waiter.await.unwrap());
    }

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::Folders.next(), FormField::Name);
        assert_eq!(FormField::Name.prev(), FormField::Folders);
    }
}
