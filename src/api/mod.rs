use crate::{
    domain::{Board, BoardId, CardPosition, ListPosition},
    error::Result,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;
pub mod memory;

pub use http::HttpBoardApi;
pub use memory::MemoryBoardApi;

/// Body of `PUT /lists/reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderListsRequest {
    pub items: Vec<ListPosition>,
    pub board_id: BoardId,
}

/// Body of `PUT /cards/reorder`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderCardsRequest {
    pub items: Vec<CardPosition>,
}

/// Authoritative store for board structure
///
/// Reorder calls carry the complete post-move ranking, so repeating one is
/// harmless. Requests carry no sequence token; the store applies whichever
/// arrives last.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// Loads a board with its lists, cards, labels, members and checklists
    async fn fetch_board(&self, id: BoardId) -> Result<Board>;

    /// Stores a new ranking for the lists of a board
    async fn reorder_lists(&self, board_id: BoardId, items: &[ListPosition]) -> Result<()>;

    /// Stores a new ranking for cards, moving any whose `list_id` changed
    async fn reorder_cards(&self, items: &[CardPosition]) -> Result<()>;
}
