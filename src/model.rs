use serde::{Deserialize, Serialize};

pub type FolderId = u64;
pub type GameId = u64;

/// A named grouping of games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
}

/// A catalog entry as returned by the game and folder listing endpoints.
///
/// The public folder listing omits `folder_ids`, and `materials` /
/// `video_link` may come back as `null`, so everything but `id` and `name`
/// falls back to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub number_of_players: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub materials: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub video_link: String,
    #[serde(default)]
    pub folder_ids: Vec<FolderId>,
}

/// A game matched by the search endpoint, with the names of its folders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub game: Game,
    #[serde(default)]
    pub folder_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: usize,
    #[serde(default)]
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// Create/update payload sent for a game. Every text field is trimmed
/// before it leaves the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDraft {
    pub name: String,
    pub number_of_players: String,
    pub time: String,
    pub materials: String,
    pub description: String,
    pub video_link: String,
    pub folder_ids: Vec<FolderId>,
}

impl From<&Game> for GameDraft {
    fn from(game: &Game) -> Self {
        Self {
            name: game.name.clone(),
            number_of_players: game.number_of_players.clone(),
            time: game.time.clone(),
            materials: game.materials.clone(),
            description: game.description.clone(),
            video_link: game.video_link.clone(),
            folder_ids: game.folder_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFolder {
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
