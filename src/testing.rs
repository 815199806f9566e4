//! In-memory `CatalogApi` for exercising workflows without a backend.

use std::sync::Mutex;

use crate::api::{ApiError, CatalogApi};
use crate::model::{Folder, FolderId, Game, GameDraft, GameId, SearchHit, SearchResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListFolders,
    CreateFolder(String),
    GetGame(GameId),
    CreateGame(GameDraft),
    UpdateGame(GameId, GameDraft),
    DeleteGame(GameId),
    FolderGames(FolderId),
    Search(String),
}

#[derive(Default)]
pub struct FakeCatalog {
    pub folders: Vec<Folder>,
    pub games: Vec<Game>,
    pub fail: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folders(mut self, folders: &[(FolderId, &str)]) -> Self {
        self.folders = folders
            .iter()
            .map(|(id, name)| Folder { id: *id, name: name.to_string() })
            .collect();
        self
    }

    pub fn with_game(mut self, game: Game) -> Self {
        self.games.push(game);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(ApiError::Status { status: 500, message: "Internal Server Error".into() })
        } else {
            Ok(())
        }
    }
}

impl CatalogApi for FakeCatalog {
    async fn list_folders(&self) -> Result<Vec<Folder>, ApiError> {
        self.record(Call::ListFolders)?;
        Ok(self.folders.clone())
    }

    async fn create_folder(&self, name: &str) -> Result<Folder, ApiError> {
        self.record(Call::CreateFolder(name.to_string()))?;
        Ok(Folder { id: 100, name: name.to_string() })
    }

    async fn get_game(&self, id: GameId) -> Result<Game, ApiError> {
        self.record(Call::GetGame(id))?;
        self.games
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(ApiError::Status { status: 404, message: "Game not found".into() })
    }

    async fn create_game(&self, draft: &GameDraft) -> Result<Game, ApiError> {
        self.record(Call::CreateGame(draft.clone()))?;
        Ok(Game {
            id: 200,
            name: draft.name.clone(),
            folder_ids: draft.folder_ids.clone(),
            ..Default::default()
        })
    }

    async fn update_game(&self, id: GameId, draft: &GameDraft) -> Result<(), ApiError> {
        self.record(Call::UpdateGame(id, draft.clone()))
    }

    async fn delete_game(&self, id: GameId) -> Result<(), ApiError> {
        self.record(Call::DeleteGame(id))
    }

    async fn folder_games(&self, folder: FolderId) -> Result<Vec<Game>, ApiError> {
        self.record(Call::FolderGames(folder))?;
        Ok(self
            .games
            .iter()
            .filter(|g| g.folder_ids.contains(&folder))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        self.record(Call::Search(query.to_string()))?;
        let needle = query.to_lowercase();
        let results: Vec<SearchHit> = self
            .games
            .iter()
            .filter(|g| g.name.to_lowercase().contains(&needle))
            .map(|g| SearchHit {
                game: g.clone(),
                folder_names: self
                    .folders
                    .iter()
                    .filter(|f| g.folder_ids.contains(&f.id))
                    .map(|f| f.name.clone())
                    .collect(),
            })
            .collect();
        Ok(SearchResponse {
            count: results.len(),
            query: query.to_string(),
            results,
        })
    }
}
