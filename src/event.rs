use std::time::Duration;

use crate::api::ApiError;
use crate::debounce::Token;
use crate::modal::Reply;
use crate::model::{Folder, FolderId, Game, GameDraft, GameId, SearchResponse};

/// A modal a background workflow wants shown, with the channel its
/// answer goes back on.
#[derive(Debug)]
pub enum ModalRequest {
    GameForm { initial: GameDraft, reply: Reply<GameDraft> },
    FolderForm { reply: Reply<String> },
    Confirm { message: String, reply: Reply<()> },
}

/// What a finished game mutation was, so the controller can pick a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameChange {
    Created,
    Updated,
    Deleted(GameId),
}

/// Messages delivered to the UI loop from spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    OpenModal(ModalRequest),
    FoldersLoaded(Result<Vec<Folder>, ApiError>),
    FormFoldersLoaded { seq: u64, folders: Vec<Folder> },
    FolderGamesLoaded { folder: FolderId, result: Result<Vec<Game>, ApiError> },
    SearchLoaded { query: String, result: Result<SearchResponse, ApiError> },
    DebounceElapsed(Token),
    GameChanged(GameChange),
    FolderAdded { name: String },
    ToastExpired(u64),
}

/// Side effects requested by the controller. The runtime turns each one
/// into a spawned task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadFolders,
    LoadFormFolders { seq: u64 },
    LoadFolderGames(FolderId),
    Search(String),
    StartDebounce { token: Token, delay: Duration },
    ExpireToast { id: u64, after: Duration },
    AddGame { initial: GameDraft },
    EditGame(GameId),
    DeleteGame(GameId),
    AddFolder,
    OpenGamePage(GameId),
    OpenUrl(String),
}
