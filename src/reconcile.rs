use crate::{
    api::BoardApi,
    domain::{BoardId, CardPosition, ListId, ListPosition},
    error::{FlowlogError, Result},
};
use std::sync::Arc;

/// Persists locally-applied reorders to the authoritative store
///
/// Every call sends a complete ranking, so repeating one is harmless.
/// Nothing here retries or times out; a failure is returned once.
#[derive(Clone)]
pub struct Reconciler {
    api: Arc<dyn BoardApi>,
}

impl Reconciler {
    pub fn new(api: Arc<dyn BoardApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn BoardApi> {
        &self.api
    }

    /// Sends the full ranking of a board's lists
    pub async fn persist_list_order(
        &self,
        board_id: BoardId,
        ordered_list_ids: &[ListId],
    ) -> Result<()> {
        let items: Vec<ListPosition> = ordered_list_ids
            .iter()
            .enumerate()
            .map(|(index, id)| ListPosition {
                id: *id,
                order: index as u32,
            })
            .collect();
        self.api.reorder_lists(board_id, &items).await
    }

    /// Sends `(card, order, list)` triples for one or two affected lists
    pub async fn persist_card_order(&self, positions: &[CardPosition]) -> Result<()> {
        if positions.is_empty() {
            return Err(FlowlogError::ValidationError(
                "card reorder must name at least one card".to_string(),
            ));
        }
        self.api.reorder_cards(positions).await
    }
}
