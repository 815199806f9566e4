use crate::api::ApiError;
use crate::model::{Game, GameId, SearchHit, SearchResponse};

pub const LOADING_GAMES: &str = "Loading games...";
pub const FOLDER_EMPTY: &str = "No games available in this folder yet.";
pub const NO_GAMES_LEFT: &str = "No games available yet.";
pub const FOLDER_ERROR: &str = "Error loading games. Please try again.";
pub const NO_RESULTS_TITLE: &str = "No games found";
pub const SEARCH_ERROR_TITLE: &str = "Search Error";
pub const SEARCH_ERROR: &str = "Failed to search games. Please try again.";

/// One game as shown in the card pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCard {
    pub id: GameId,
    pub name: String,
    pub players: String,
    pub time: String,
    pub materials: Option<String>,
    pub description: String,
    pub video_link: String,
    /// Only search results carry categories.
    pub categories: Option<String>,
}

impl GameCard {
    pub fn from_game(game: &Game) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            players: game.number_of_players.clone(),
            time: game.time.clone(),
            materials: (!game.materials.is_empty()).then(|| game.materials.clone()),
            description: game.description.clone(),
            video_link: game.video_link.clone(),
            categories: None,
        }
    }

    pub fn from_hit(hit: &SearchHit) -> Self {
        let categories = if hit.folder_names.is_empty() {
            "None".to_string()
        } else {
            hit.folder_names.join(", ")
        };
        Self {
            categories: Some(categories),
            ..Self::from_game(&hit.game)
        }
    }

    pub fn details_path(&self) -> String {
        format!("/game/{}/", self.id)
    }

    /// Labelled lines below the title, in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("Players", self.players.as_str()), ("Time", self.time.as_str())];
        if let Some(categories) = &self.categories {
            fields.push(("Categories", categories.as_str()));
        }
        if let Some(materials) = &self.materials {
            fields.push(("Materials", materials.as_str()));
        }
        fields
    }

    pub fn text(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        lines.extend(self.fields().into_iter().map(|(k, v)| format!("{}: {}", k, v)));
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        lines.push(format!("View Details: {}", self.details_path()));
        lines
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Error,
}

/// Contents of the game card container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GamesPane {
    #[default]
    Empty,
    Message {
        title: Option<String>,
        body: String,
        tone: Tone,
    },
    Cards {
        header: Option<(String, String)>,
        cards: Vec<GameCard>,
    },
}

impl GamesPane {
    pub fn muted(body: &str) -> Self {
        GamesPane::Message {
            title: None,
            body: body.to_string(),
            tone: Tone::Muted,
        }
    }

    pub fn loading() -> Self {
        Self::muted(LOADING_GAMES)
    }

    pub fn for_folder(result: &Result<Vec<Game>, ApiError>) -> Self {
        match result {
            Ok(games) if games.is_empty() => Self::muted(FOLDER_EMPTY),
            Ok(games) => GamesPane::Cards {
                header: None,
                cards: games.iter().map(GameCard::from_game).collect(),
            },
            Err(_) => GamesPane::Message {
                title: None,
                body: FOLDER_ERROR.to_string(),
                tone: Tone::Error,
            },
        }
    }

    pub fn for_search(query: &str, result: &Result<SearchResponse, ApiError>) -> Self {
        match result {
            Ok(resp) if resp.results.is_empty() => GamesPane::Message {
                title: Some(NO_RESULTS_TITLE.to_string()),
                body: format!("No games match your search for \"{}\"", query),
                tone: Tone::Muted,
            },
            Ok(resp) => GamesPane::Cards {
                header: Some((
                    format!("Search Results ({} found)", resp.count),
                    format!("Searching for: \"{}\"", query),
                )),
                cards: resp.results.iter().map(GameCard::from_hit).collect(),
            },
            Err(_) => GamesPane::Message {
                title: Some(SEARCH_ERROR_TITLE.to_string()),
                body: SEARCH_ERROR.to_string(),
                tone: Tone::Error,
            },
        }
    }

    pub fn cards(&self) -> &[GameCard] {
        match self {
            GamesPane::Cards { cards, .. } => cards,
            _ => &[],
        }
    }

    /// Drop the card for `id` locally. When that empties the pane a
    /// placeholder takes its place.
    pub fn remove_card(&mut self, id: GameId) {
        if let GamesPane::Cards { cards, .. } = self {
            cards.retain(|c| c.id != id);
            if cards.is_empty() {
                *self = Self::muted(NO_GAMES_LEFT);
            }
        }
    }

    /// Plain-text rendering, top to bottom.
    pub fn text(&self) -> Vec<String> {
        match self {
            GamesPane::Empty => Vec::new(),
            GamesPane::Message { title, body, .. } => {
                title.iter().cloned().chain(std::iter::once(body.clone())).collect()
            }
            GamesPane::Cards { header, cards } => {
                let mut lines = Vec::new();
                if let Some((title, sub)) = header {
                    lines.push(title.clone());
                    lines.push(sub.clone());
                }
                for card in cards {
                    lines.push(String::new());
                    lines.extend(card.text());
                }
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: GameId, name: &str) -> Game {
        Game {
            id,
            name: name.to_string(),
            number_of_players: "2-4".into(),
            time: "10m".into(),
            ..Default::default()
        }
    }

    fn hit(id: GameId, name: &str, folders: &[&str]) -> SearchHit {
        SearchHit {
            game: game(id, name),
            folder_names: folders.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_folder_message() {
        let pane = GamesPane::for_folder(&Ok(Vec::new()));
        assert_eq!(pane.text(), vec![FOLDER_EMPTY.to_string()]);
        assert!(pane.cards().is_empty());
    }

    #[test]
    fn test_folder_error_message() {
        let err = ApiError::Status { status: 404, message: "Folder not found".into() };
        let pane = GamesPane::for_folder(&Err(err));
        assert_eq!(pane.text(), vec![FOLDER_ERROR.to_string()]);
    }

    #[test]
    fn test_search_header_and_cards() {
        let resp = SearchResponse {
            count: 2,
            query: "dice".into(),
            results: vec![hit(1, "Dice A", &["Party"]), hit(2, "Dice B", &[])],
        };
        let pane = GamesPane::for_search("dice", &Ok(resp));
        let text = pane.text();
        assert_eq!(text[0], "Search Results (2 found)");
        assert_eq!(text[1], "Searching for: \"dice\"");
        assert_eq!(pane.cards().len(), 2);
        assert_eq!(pane.cards()[0].categories.as_deref(), Some("Party"));
        assert_eq!(pane.cards()[1].categories.as_deref(), Some("None"));
    }

    #[test]
    fn test_search_without_results() {
        let resp = SearchResponse { count: 0, query: "zzz".into(), results: vec![] };
        let pane = GamesPane::for_search("zzz", &Ok(resp));
        assert_eq!(
            pane.text(),
            vec![
                NO_RESULTS_TITLE.to_string(),
                "No games match your search for \"zzz\"".to_string()
            ]
        );
    }

    #[test]
    fn test_card_hides_empty_materials() {
        let card = GameCard::from_game(&game(5, "Tag"));
        assert!(card.materials.is_none());
        assert!(!card.text().iter().any(|l| l.starts_with("Materials")));
        assert_eq!(card.details_path(), "/game/5/");

        let mut with = game(6, "Jenga");
        with.materials = "blocks".into();
        let card = GameCard::from_game(&with);
        assert!(card.text().contains(&"Materials: blocks".to_string()));
    }

    #[test]
    fn test_remove_last_card_shows_placeholder() {
        let mut pane = GamesPane::for_folder(&Ok(vec![game(1, "A"), game(2, "B")]));
        pane.remove_card(1);
        assert_eq!(pane.cards().len(), 1);
        pane.remove_card(2);
        assert_eq!(pane.text(), vec![NO_GAMES_LEFT.to_string()]);
    }
}
