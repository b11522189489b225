use crate::domain::board::Board;
use crate::domain::card::Card;
use crate::domain::ids::{LabelId, UserId};
use crate::domain::list::List;

/// Display filter over a board's cards
///
/// All set criteria must hold for a card to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilter {
    /// Case-insensitive substring of the card title
    pub query: Option<String>,
    pub label: Option<LabelId>,
    pub member: Option<UserId>,
}

impl CardFilter {
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query)
        };
        self
    }

    pub fn with_label(mut self, label: LabelId) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_member(mut self, member: UserId) -> Self {
        self.member = Some(member);
        self
    }

    /// Checks if any criterion is set
    pub fn is_active(&self) -> bool {
        self.query.is_some() || self.label.is_some() || self.member.is_some()
    }

    pub fn matches(&self, card: &Card) -> bool {
        if let Some(query) = &self.query {
            if !card.title.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }
        if let Some(label) = self.label {
            if !card.has_label(label) {
                return false;
            }
        }
        if let Some(member) = self.member {
            if !card.has_member(member) {
                return false;
            }
        }
        true
    }
}

/// Returns a copy of the board's lists keeping only matching cards
///
/// Lists themselves are never hidden, and the cards keep their stored `order`.
pub fn filter_lists(board: &Board, filter: &CardFilter) -> Vec<List> {
    board
        .lists
        .iter()
        .map(|list| List {
            cards: list
                .cards
                .iter()
                .filter(|card| filter.matches(card))
                .cloned()
                .collect(),
            ..list.clone()
        })
        .collect()
}
