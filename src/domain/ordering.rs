use crate::domain::board::Board;
use crate::domain::ids::{CardId, ListId};
use crate::error::{FlowlogError, Result};
use serde::{Deserialize, Serialize};

/// Ranked position of a list, as sent to `PUT /lists/reorder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPosition {
    pub id: ListId,
    pub order: u32,
}

/// Ranked position of a card within a list, as sent to `PUT /cards/reorder`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPosition {
    pub id: CardId,
    pub order: u32,
    pub list_id: ListId,
}

/// Moves an element of `items` from `from` to `to`, shifting everything in between
///
/// Returns `IndexOutOfBounds` without touching `items` if either index is invalid.
fn splice_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = items.len();
    if from >= len {
        return Err(FlowlogError::IndexOutOfBounds { index: from, len });
    }
    if to >= len {
        return Err(FlowlogError::IndexOutOfBounds { index: to, len });
    }
    if from != to {
        let moved = items.remove(from);
        items.insert(to, moved);
    }
    Ok(())
}

/// Reorders the lists of a board
///
/// Removes the list at `source_index` and reinserts it at `dest_index`, then
/// renumbers every list so `order` matches display position. Moving a list
/// onto its own position returns the board untouched.
///
/// # Examples
/// ```
/// use flowlog_core::domain::{move_list, Board, BoardId, List, ListId};
///
/// let mut board = Board::new(BoardId(1), "Roadmap");
/// for (id, title) in [(1, "A"), (2, "B"), (3, "C")] {
///     board.add_list(List::new(ListId(id), BoardId(1), title));
/// }
///
/// let board = move_list(board, 0, 2).unwrap();
/// let titles: Vec<_> = board.lists.iter().map(|l| l.title.as_str()).collect();
/// assert_eq!(titles, ["B", "C", "A"]);
/// assert_eq!(board.lists[2].order, 2);
/// ```
pub fn move_list(mut board: Board, source_index: usize, dest_index: usize) -> Result<Board> {
    if source_index == dest_index && source_index < board.lists.len() {
        return Ok(board);
    }
    splice_move(&mut board.lists, source_index, dest_index)?;
    board.renumber_lists();
    Ok(board)
}

/// Moves a card within a list or between two lists
///
/// For a move inside one list, `dest_index` must address an existing slot.
/// For a move to another list it may equal that list's length, appending the
/// card. The moved card takes the destination `list_id` and every card in
/// the affected list(s) is renumbered.
pub fn move_card(
    mut board: Board,
    source_list_id: ListId,
    source_index: usize,
    dest_list_id: ListId,
    dest_index: usize,
) -> Result<Board> {
    let source_pos = board.list_index(source_list_id)?;
    let dest_pos = board.list_index(dest_list_id)?;

    if source_pos == dest_pos {
        let list = &mut board.lists[source_pos];
        if source_index == dest_index && source_index < list.cards.len() {
            return Ok(board);
        }
        splice_move(&mut list.cards, source_index, dest_index)?;
        list.renumber_cards();
        return Ok(board);
    }

    let source_len = board.lists[source_pos].cards.len();
    if source_index >= source_len {
        return Err(FlowlogError::IndexOutOfBounds {
            index: source_index,
            len: source_len,
        });
    }
    let dest_len = board.lists[dest_pos].cards.len();
    if dest_index > dest_len {
        return Err(FlowlogError::IndexOutOfBounds {
            index: dest_index,
            len: dest_len,
        });
    }

    let mut card = board.lists[source_pos].cards.remove(source_index);
    card.list_id = dest_list_id;
    board.lists[dest_pos].cards.insert(dest_index, card);

    board.lists[source_pos].renumber_cards();
    board.lists[dest_pos].renumber_cards();
    Ok(board)
}

/// Current ranking of every list on the board
pub fn list_positions(board: &Board) -> Vec<ListPosition> {
    board
        .lists
        .iter()
        .enumerate()
        .map(|(index, list)| ListPosition {
            id: list.id,
            order: index as u32,
        })
        .collect()
}

/// Current ranking of the cards in the given lists, in the order the lists are named
pub fn card_positions(board: &Board, list_ids: &[ListId]) -> Result<Vec<CardPosition>> {
    let mut positions = Vec::new();
    for list_id in list_ids {
        let list = board
            .list(*list_id)
            .ok_or_else(|| FlowlogError::ListNotFound(list_id.to_string()))?;
        positions.extend(list.cards.iter().enumerate().map(|(index, card)| CardPosition {
            id: card.id,
            order: index as u32,
            list_id: list.id,
        }));
    }
    Ok(positions)
}

/// Checks that list and card `order` values are dense and zero-based
pub fn is_densely_ordered(board: &Board) -> bool {
    board.lists.iter().enumerate().all(|(i, list)| {
        list.order == i as u32
            && list
                .cards
                .iter()
                .enumerate()
                .all(|(j, card)| card.order == j as u32 && card.list_id == list.id)
    })
}
