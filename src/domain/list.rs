use crate::domain::card::Card;
use crate::domain::ids::{BoardId, CardId, ListId};
use serde::{Deserialize, Serialize};

/// An ordered column of cards on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    pub board_id: BoardId,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl List {
    pub fn new(id: ListId, board_id: BoardId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color: None,
            board_id,
            order: 0,
            cards: Vec::new(),
        }
    }

    /// Position of a card within this list
    pub fn position_of(&self, card_id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == card_id)
    }

    /// Rewrites every card's `order` to its position and pins its `list_id`
    pub fn renumber_cards(&mut self) {
        let list_id = self.id;
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.order = index as u32;
            card.list_id = list_id;
        }
    }

    /// Card ids in display order
    pub fn card_ids(&self) -> Vec<CardId> {
        self.cards.iter().map(|card| card.id).collect()
    }
}
