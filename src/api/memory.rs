use crate::{
    api::BoardApi,
    domain::{Board, BoardId, CardPosition, ListPosition},
    error::{FlowlogError, Result},
};
use async_trait::async_trait;
use std::{
    collections::{HashMap, VecDeque},
    sync::atomic::{AtomicUsize, Ordering},
    sync::Mutex,
};
use tokio::sync::RwLock;

/// In-process authoritative store
///
/// Applies reorders the way the FlowLog server does: each item's `order`
/// (and `listId` for cards) is written as-is, then siblings are ranked by
/// it. Queued failures let callers exercise the error path.
#[derive(Default)]
pub struct MemoryBoardApi {
    boards: RwLock<HashMap<BoardId, Board>>,
    failures: Mutex<VecDeque<u16>>,
    list_reorders: AtomicUsize,
    card_reorders: AtomicUsize,
}

impl MemoryBoardApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given boards
    pub fn with_boards(boards: impl IntoIterator<Item = Board>) -> Self {
        let map = boards.into_iter().map(|board| (board.id, board)).collect();
        Self {
            boards: RwLock::new(map),
            ..Self::default()
        }
    }

    /// Inserts or replaces a board
    pub async fn insert_board(&self, board: Board) {
        self.boards.write().await.insert(board.id, board);
    }

    /// Copy of the stored board, if any
    pub async fn snapshot(&self, id: BoardId) -> Option<Board> {
        self.boards.read().await.get(&id).cloned()
    }

    /// Makes the next reorder request fail with the given HTTP status
    pub fn fail_next_with(&self, status: u16) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(status);
        }
    }

    /// Number of list reorder requests received, failed ones included
    pub fn list_reorder_count(&self) -> usize {
        self.list_reorders.load(Ordering::SeqCst)
    }

    /// Number of card reorder requests received, failed ones included
    pub fn card_reorder_count(&self) -> usize {
        self.card_reorders.load(Ordering::SeqCst)
    }

    fn take_injected_failure(&self) -> Result<()> {
        let next = self
            .failures
            .lock()
            .map_err(|_| FlowlogError::NetworkError("store lock poisoned".to_string()))?
            .pop_front();
        match next {
            Some(status) => Err(FlowlogError::ServerError {
                status,
                message: "injected failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BoardApi for MemoryBoardApi {
    async fn fetch_board(&self, id: BoardId) -> Result<Board> {
        self.boards
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| FlowlogError::BoardNotFound(id.to_string()))
    }

    async fn reorder_lists(&self, board_id: BoardId, items: &[ListPosition]) -> Result<()> {
        self.list_reorders.fetch_add(1, Ordering::SeqCst);
        self.take_injected_failure()?;

        let mut boards = self.boards.write().await;
        let board = boards
            .get_mut(&board_id)
            .ok_or_else(|| FlowlogError::BoardNotFound(board_id.to_string()))?;

        for item in items {
            if let Some(list) = board.list_mut(item.id) {
                list.order = item.order;
            }
        }
        board.lists.sort_by_key(|list| list.order);
        Ok(())
    }

    async fn reorder_cards(&self, items: &[CardPosition]) -> Result<()> {
        self.card_reorders.fetch_add(1, Ordering::SeqCst);
        self.take_injected_failure()?;

        let mut boards = self.boards.write().await;

        // Validate up front so a bad item leaves the store untouched.
        for item in items {
            let card_known = boards
                .values()
                .any(|board| board.find_card(item.id).is_some());
            if !card_known {
                return Err(FlowlogError::CardNotFound(item.id.to_string()));
            }
            let list_known = boards.values().any(|board| board.list(item.list_id).is_some());
            if !list_known {
                return Err(FlowlogError::ListNotFound(item.list_id.to_string()));
            }
        }

        for item in items {
            let mut moved = None;
            for list in boards.values_mut().flat_map(|board| board.lists.iter_mut()) {
                if let Some(index) = list.position_of(item.id) {
                    moved = Some(list.cards.remove(index));
                    break;
                }
            }
            let Some(mut card) = moved else { continue };
            card.order = item.order;
            card.list_id = item.list_id;

            if let Some(dest) = boards
                .values_mut()
                .flat_map(|board| board.lists.iter_mut())
                .find(|list| list.id == item.list_id)
            {
                dest.cards.push(card);
            }
        }

        for list in boards.values_mut().flat_map(|board| board.lists.iter_mut()) {
            list.cards.sort_by_key(|card| card.order);
        }
        Ok(())
    }
}
