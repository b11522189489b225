//! Drag-and-drop scenarios against the in-memory store

use flowlog_core::{
    domain::ordering::is_densely_ordered, Board, BoardId, BoardSession, Card, CardId, DragKind,
    DragPhase, List, ListId, MemoryBoardApi, PersistOutcome,
};
use std::sync::Arc;

/// Lists A, B, C with cards c1, c2 on A and c3 on B
fn board() -> Board {
    let mut board = Board::new(BoardId(1), "Launch");
    board.add_list(List::new(ListId(1), BoardId(1), "A"));
    board.add_list(List::new(ListId(2), BoardId(1), "B"));
    board.add_list(List::new(ListId(3), BoardId(1), "C"));
    board.add_card(Card::new(CardId(1), ListId(1), "c1")).unwrap();
    board.add_card(Card::new(CardId(2), ListId(1), "c2")).unwrap();
    board.add_card(Card::new(CardId(3), ListId(2), "c3")).unwrap();
    board
}

async fn open() -> (BoardSession, Arc<MemoryBoardApi>) {
    let store = Arc::new(MemoryBoardApi::with_boards([board()]));
    let session = BoardSession::load(store.clone(), BoardId(1)).await.unwrap();
    (session, store)
}

fn list_titles(board: &Board) -> Vec<&str> {
    board.lists.iter().map(|l| l.title.as_str()).collect()
}

#[tokio::test]
async fn move_list_first_to_last_is_persisted() {
    let (mut session, store) = open().await;

    let handle = session.move_list(0, 2).unwrap().expect("a request");
    assert_eq!(list_titles(session.board()), vec!["B", "C", "A"]);
    assert!(is_densely_ordered(session.board()));

    assert_eq!(handle.outcome().await, PersistOutcome::Confirmed);
    let stored = store.snapshot(BoardId(1)).await.unwrap();
    assert_eq!(list_titles(&stored), vec!["B", "C", "A"]);
    assert_eq!(session.phase(), DragPhase::Idle);
}

#[tokio::test]
async fn move_card_across_lists_updates_both_lists() {
    let (mut session, store) = open().await;

    let handle = session
        .move_card(ListId(1), 0, ListId(2), 1)
        .unwrap()
        .expect("a request");

    let local = session.board();
    assert_eq!(local.list(ListId(1)).unwrap().card_ids(), vec![CardId(2)]);
    assert_eq!(
        local.list(ListId(2)).unwrap().card_ids(),
        vec![CardId(3), CardId(1)]
    );
    assert_eq!(local.find_card(CardId(1)).unwrap().list_id, ListId(2));
    assert_eq!(local.find_card(CardId(2)).unwrap().order, 0);
    assert_eq!(local.card_count(), 3);

    handle.join().await.unwrap();
    let stored = store.snapshot(BoardId(1)).await.unwrap();
    assert_eq!(&stored, session.board());
}

#[tokio::test]
async fn dropping_in_place_sends_nothing() {
    let (mut session, store) = open().await;
    let before = session.board().clone();

    assert!(session.move_list(1, 1).unwrap().is_none());
    assert!(session.move_card(ListId(1), 0, ListId(1), 0).unwrap().is_none());

    assert_eq!(session.board(), &before);
    assert_eq!(store.list_reorder_count(), 0);
    assert_eq!(store.card_reorder_count(), 0);
}

#[tokio::test]
async fn failed_persist_keeps_optimistic_state() {
    let (mut session, store) = open().await;
    store.fail_next_with(500);

    let handle = session.move_list(0, 2).unwrap().expect("a request");
    let gesture = handle.gesture_id();
    assert_eq!(handle.outcome().await, PersistOutcome::FailedSilently);

    assert_eq!(list_titles(session.board()), vec!["B", "C", "A"]);
    assert_eq!(
        session.last_outcome(),
        Some((gesture, PersistOutcome::FailedSilently))
    );
    assert_eq!(session.phase(), DragPhase::Idle);

    let stored = store.snapshot(BoardId(1)).await.unwrap();
    assert_eq!(list_titles(&stored), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn refresh_restores_server_order_after_failure() {
    let (mut session, store) = open().await;
    store.fail_next_with(503);

    session.move_card(ListId(1), 1, ListId(3), 0).unwrap().unwrap().outcome().await;
    assert_eq!(session.board().list(ListId(3)).unwrap().cards.len(), 1);

    session.refresh().await.unwrap();
    assert!(session.board().list(ListId(3)).unwrap().cards.is_empty());
    assert_eq!(
        session.board().list(ListId(1)).unwrap().card_ids(),
        vec![CardId(1), CardId(2)]
    );
}

#[tokio::test]
async fn overlapping_moves_each_send_a_request() {
    let (mut session, store) = open().await;

    session.begin_drag(DragKind::List);
    let first = session.move_list(0, 1).unwrap().unwrap();
    session.begin_drag(DragKind::List);
    let second = session.move_list(2, 0).unwrap().unwrap();

    first.join().await.unwrap();
    second.join().await.unwrap();

    assert_eq!(store.list_reorder_count(), 2);
    // Requests carry full rankings, so the later one fully determines the result.
    let stored = store.snapshot(BoardId(1)).await.unwrap();
    assert_eq!(list_titles(&stored), list_titles(session.board()));
}

#[tokio::test]
async fn card_count_is_stable_across_many_moves() {
    let (mut session, _store) = open().await;
    let moves = [
        (ListId(1), 0, ListId(3), 0),
        (ListId(2), 0, ListId(3), 1),
        (ListId(3), 1, ListId(3), 0),
        (ListId(3), 0, ListId(1), 1),
    ];

    for (from_list, from, to_list, to) in moves {
        if let Some(handle) = session.move_card(from_list, from, to_list, to).unwrap() {
            handle.join().await.unwrap();
        }
        assert_eq!(session.board().card_count(), 3);
        assert!(is_densely_ordered(session.board()));
    }
}
