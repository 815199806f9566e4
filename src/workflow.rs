use std::sync::Arc;

use reqwest::Url;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::api::{self, ApiError, CatalogApi};
use crate::app::DELETE_CONFIRM;
use crate::event::{AppEvent, Command, GameChange};
use crate::modal::ModalHandle;
use crate::model::{GameDraft, GameId};

// ── CRUD workflows ──
//
// Each one runs as its own task: open a modal, wait for the answer, call
// the backend, then tell the UI loop what changed. Errors bubble up to the
// spawner, which only logs them.

pub async fn add_game<A: CatalogApi>(
    api: &A,
    modals: &ModalHandle,
    events: &UnboundedSender<AppEvent>,
    initial: GameDraft,
) -> Result<(), ApiError> {
    let Some(draft) = modals.game_form(initial).await else {
        debug!("add game cancelled");
        return Ok(());
    };
    let game = api.create_game(&draft).await?;
    info!(id = game.id, name = %game.name, "game created");
    let _ = events.send(AppEvent::GameChanged(GameChange::Created));
    Ok(())
}

pub async fn edit_game<A: CatalogApi>(
    api: &A,
    modals: &ModalHandle,
    events: &UnboundedSender<AppEvent>,
    id: GameId,
) -> Result<(), ApiError> {
    let game = api.get_game(id).await?;
    let Some(draft) = modals.game_form(GameDraft::from(&game)).await else {
        debug!(id, "edit game cancelled");
        return Ok(());
    };
    api.update_game(id, &draft).await?;
    info!(id, "game updated");
    let _ = events.send(AppEvent::GameChanged(GameChange::Updated));
    Ok(())
}

pub async fn delete_game<A: CatalogApi>(
    api: &A,
    modals: &ModalHandle,
    events: &UnboundedSender<AppEvent>,
    id: GameId,
) -> Result<(), ApiError> {
    if !modals.confirm(DELETE_CONFIRM).await {
        debug!(id, "delete cancelled");
        return Ok(());
    }
    api.delete_game(id).await?;
    info!(id, "game deleted");
    let _ = events.send(AppEvent::GameChanged(GameChange::Deleted(id)));
    Ok(())
}

pub async fn add_folder<A: CatalogApi>(
    api: &A,
    modals: &ModalHandle,
    events: &UnboundedSender<AppEvent>,
) -> Result<(), ApiError> {
    let Some(name) = modals.folder_form().await else {
        debug!("add folder cancelled");
        return Ok(());
    };
    if name.is_empty() {
        debug!("empty folder name, nothing to do");
        return Ok(());
    }
    let folder = api.create_folder(&name).await?;
    info!(id = folder.id, name = %name, "folder created");
    let _ = events.send(AppEvent::FolderAdded { name });
    Ok(())
}

// ── Runtime ──

/// Executes controller commands as tokio tasks that report back over the
/// event channel.
pub struct Runtime<A: CatalogApi> {
    api: Arc<A>,
    events: UnboundedSender<AppEvent>,
    modals: ModalHandle,
    site: Url,
}

impl<A: CatalogApi> Runtime<A> {
    pub fn new(api: Arc<A>, events: UnboundedSender<AppEvent>, site: Url) -> Self {
        let modals = ModalHandle::new(events.clone());
        Self { api, events, modals, site }
    }

    pub fn dispatch(&self, commands: Vec<Command>) {
        for command in commands {
            self.spawn(command);
        }
    }

    fn spawn(&self, command: Command) {
        let api = Arc::clone(&self.api);
        let events = self.events.clone();
        let modals = self.modals.clone();

        match command {
            Command::LoadFolders => {
                tokio::spawn(async move {
                    let result = api.list_folders().await;
                    let _ = events.send(AppEvent::FoldersLoaded(result));
                });
            }
            Command::LoadFormFolders { seq } => {
                tokio::spawn(async move {
                    match api.list_folders().await {
                        Ok(folders) => {
                            let _ = events.send(AppEvent::FormFoldersLoaded { seq, folders });
                        }
                        Err(e) => error!(error = %e, "loading folders for game form failed"),
                    }
                });
            }
            Command::LoadFolderGames(folder) => {
                tokio::spawn(async move {
                    let result = api.folder_games(folder).await;
                    let _ = events.send(AppEvent::FolderGamesLoaded { folder, result });
                });
            }
            Command::Search(query) => {
                tokio::spawn(async move {
                    let result = api.search(&query).await;
                    let _ = events.send(AppEvent::SearchLoaded { query, result });
                });
            }
            Command::StartDebounce { token, delay } => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = events.send(AppEvent::DebounceElapsed(token));
                });
            }
            Command::ExpireToast { id, after } => {
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = events.send(AppEvent::ToastExpired(id));
                });
            }
            Command::AddGame { initial } => {
                tokio::spawn(async move {
                    if let Err(e) = add_game(api.as_ref(), &modals, &events, initial).await {
                        report_failure("adding game", &e);
                    }
                });
            }
            Command::EditGame(id) => {
                tokio::spawn(async move {
                    if let Err(e) = edit_game(api.as_ref(), &modals, &events, id).await {
                        report_failure(&format!("editing game {}", id), &e);
                    }
                });
            }
            Command::DeleteGame(id) => {
                tokio::spawn(async move {
                    if let Err(e) = delete_game(api.as_ref(), &modals, &events, id).await {
                        report_failure(&format!("deleting game {}", id), &e);
                    }
                });
            }
            Command::AddFolder => {
                tokio::spawn(async move {
                    if let Err(e) = add_folder(api.as_ref(), &modals, &events).await {
                        report_failure("adding folder", &e);
                    }
                });
            }
            Command::OpenGamePage(id) => match api::game_page_url(&self.site, id) {
                Ok(url) => open_url(url.as_str()),
                Err(e) => warn!(id, error = %e, "cannot build game page url"),
            },
            Command::OpenUrl(url) => open_url(&url),
        }
    }
}

fn report_failure(action: &str, e: &ApiError) {
    if e.is_client_error() {
        warn!(error = %e, "{} rejected", action);
    } else {
        error!(error = %e, "{} failed", action);
    }
}

/// Hand a link to the desktop's opener.
fn open_url(link: &str) {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    match std::process::Command::new(opener)
        .arg(link)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        Ok(_) => info!(link, "opened link"),
        Err(e) => warn!(link, error = %e, "could not launch {}", opener),
    }
}
