use crate::domain::card::{Card, Label, Member};
use crate::domain::ids::{BoardId, CardId, ListId, UserId};
use crate::domain::list::List;
use crate::error::{FlowlogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Background applied to new boards
pub const DEFAULT_BACKGROUND: &str = "#0079bf";

/// Rendered in place of a background descriptor the client does not understand
pub const FALLBACK_GRADIENT: &str = "linear-gradient(135deg, #0079bf 0%, #5067c5 100%)";

/// Board background descriptor
///
/// The server stores a single string; its prefix decides how it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Background {
    /// Solid color such as `#0079bf`
    Color(String),
    /// CSS gradient such as `linear-gradient(...)`
    Gradient(String),
    /// Image reference such as `url(https://...)`
    Image(String),
    Other(String),
}

impl Background {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Color(s) | Self::Gradient(s) | Self::Image(s) | Self::Other(s) => s,
        }
    }

    /// The descriptor to render, substituting the fallback gradient for unknown values
    pub fn render_value(&self) -> &str {
        match self {
            Self::Other(_) => FALLBACK_GRADIENT,
            _ => self.as_str(),
        }
    }
}

impl From<String> for Background {
    fn from(value: String) -> Self {
        if value.starts_with('#') {
            Self::Color(value)
        } else if value.starts_with("linear") {
            Self::Gradient(value)
        } else if value.starts_with("url") {
            Self::Image(value)
        } else {
            Self::Other(value)
        }
    }
}

impl From<Background> for String {
    fn from(value: Background) -> Self {
        match value {
            Background::Color(s)
            | Background::Gradient(s)
            | Background::Image(s)
            | Background::Other(s) => s,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::Color(DEFAULT_BACKGROUND.to_string())
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Client-held snapshot of a board and everything nested in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Board {
    pub fn new(id: BoardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            background: Background::default(),
            owner_id: None,
            lists: Vec::new(),
            labels: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn list(&self, list_id: ListId) -> Option<&List> {
        self.lists.iter().find(|list| list.id == list_id)
    }

    pub fn list_mut(&mut self, list_id: ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|list| list.id == list_id)
    }

    /// Index of a list in display order
    pub fn list_index(&self, list_id: ListId) -> Result<usize> {
        self.lists
            .iter()
            .position(|list| list.id == list_id)
            .ok_or_else(|| FlowlogError::ListNotFound(list_id.to_string()))
    }

    /// Finds a card anywhere on the board
    pub fn find_card(&self, card_id: CardId) -> Option<&Card> {
        self.lists
            .iter()
            .flat_map(|list| list.cards.iter())
            .find(|card| card.id == card_id)
    }

    /// Total number of cards across all lists
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|list| list.cards.len()).sum()
    }

    /// Rewrites every list's `order` to its position
    pub fn renumber_lists(&mut self) {
        for (index, list) in self.lists.iter_mut().enumerate() {
            list.order = index as u32;
        }
    }

    /// Appends a list created by the server
    pub fn add_list(&mut self, mut list: List) {
        list.board_id = self.id;
        list.order = self.lists.len() as u32;
        list.renumber_cards();
        self.lists.push(list);
    }

    pub fn rename_list(&mut self, list_id: ListId, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FlowlogError::ValidationError(
                "list title must not be empty".to_string(),
            ));
        }
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| FlowlogError::ListNotFound(list_id.to_string()))?;
        list.title = title.to_string();
        Ok(())
    }

    pub fn set_list_color(&mut self, list_id: ListId, color: Option<String>) -> Result<()> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| FlowlogError::ListNotFound(list_id.to_string()))?;
        list.color = color;
        Ok(())
    }

    /// Removes a list together with its cards
    pub fn remove_list(&mut self, list_id: ListId) -> Result<List> {
        let index = self.list_index(list_id)?;
        let removed = self.lists.remove(index);
        self.renumber_lists();
        Ok(removed)
    }

    /// Appends a card created by the server to the end of its list
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        let list = self
            .list_mut(card.list_id)
            .ok_or_else(|| FlowlogError::ListNotFound(card.list_id.to_string()))?;
        list.cards.push(card);
        list.renumber_cards();
        Ok(())
    }

    /// Swaps in an edited card, keeping its position
    pub fn replace_card(&mut self, updated: Card) -> Result<()> {
        for list in &mut self.lists {
            if let Some(slot) = list.cards.iter_mut().find(|card| card.id == updated.id) {
                let order = slot.order;
                let list_id = slot.list_id;
                *slot = updated;
                slot.order = order;
                slot.list_id = list_id;
                return Ok(());
            }
        }
        Err(FlowlogError::CardNotFound(updated.id.to_string()))
    }

    pub fn remove_card(&mut self, card_id: CardId) -> Result<Card> {
        for list in &mut self.lists {
            if let Some(index) = list.position_of(card_id) {
                let removed = list.cards.remove(index);
                list.renumber_cards();
                return Ok(removed);
            }
        }
        Err(FlowlogError::CardNotFound(card_id.to_string()))
    }
}

/// Summary row returned by the board listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub owner_id: Option<UserId>,
}
