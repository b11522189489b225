//! Optimistic drag-and-drop session over one board
//!
//! A move is applied to the local board and published to observers before
//! its persistence request is even spawned. The request then runs on its own
//! tokio task; the caller never waits for it.
//!
//! ```text
//! Idle -> Dragging -> Dropped (local apply) -> Persisting -> Confirmed | FailedSilently -> Idle
//! ```
//!
//! A failed request is logged and dropped. The local board keeps the move,
//! so it can disagree with the server until the next [`BoardSession::refresh`].
//! Requests from overlapping moves race; the server keeps whichever lands last.

use crate::{
    api::BoardApi,
    domain::{card_positions, move_card, move_list, Board, BoardId, ListId},
    error::{FlowlogError, Result},
    reconcile::Reconciler,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::{sync::watch, task::JoinHandle};
use uuid::Uuid;

/// What is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    List,
    Card,
}

/// Phase of the gesture currently driving the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging { gesture: Uuid, kind: DragKind },
    Dropped { gesture: Uuid },
    Persisting { gesture: Uuid },
}

/// Terminal state of one gesture's persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Confirmed,
    FailedSilently,
}

#[derive(Debug)]
struct GestureTracker {
    phase: DragPhase,
    last_outcome: Option<(Uuid, PersistOutcome)>,
}

impl GestureTracker {
    fn finish(&mut self, gesture: Uuid, outcome: PersistOutcome) {
        self.last_outcome = Some((gesture, outcome));
        // A newer gesture may already own the phase.
        if self.phase == (DragPhase::Persisting { gesture }) {
            self.phase = DragPhase::Idle;
        }
    }
}

/// Handle on a spawned persistence request
///
/// Dropping it does not cancel the request.
#[derive(Debug)]
pub struct PersistHandle {
    gesture: Uuid,
    task: JoinHandle<Result<()>>,
}

impl PersistHandle {
    pub fn gesture_id(&self) -> Uuid {
        self.gesture
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the request and returns its raw result
    ///
    /// A panicked or cancelled task yields `TaskFailed`, which is not a
    /// persistence error.
    pub async fn join(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| FlowlogError::TaskFailed(e.to_string()))?
    }

    pub async fn outcome(self) -> PersistOutcome {
        match self.join().await {
            Ok(()) => PersistOutcome::Confirmed,
            Err(_) => PersistOutcome::FailedSilently,
        }
    }
}

/// Client-side view model of one board plus its reconciliation client
///
/// Must be used from within a tokio runtime; moves spawn their persistence.
pub struct BoardSession {
    board: Board,
    reconciler: Reconciler,
    tracker: Arc<Mutex<GestureTracker>>,
    updates: watch::Sender<Board>,
}

impl BoardSession {
    pub fn new(board: Board, api: Arc<dyn BoardApi>) -> Self {
        let (updates, _) = watch::channel(board.clone());
        Self {
            board,
            reconciler: Reconciler::new(api),
            tracker: Arc::new(Mutex::new(GestureTracker {
                phase: DragPhase::Idle,
                last_outcome: None,
            })),
            updates,
        }
    }

    /// Fetches a board and opens a session on it
    pub async fn load(api: Arc<dyn BoardApi>, id: BoardId) -> Result<Self> {
        let board = api.fetch_board(id).await?;
        tracing::debug!(board_id = %id, lists = board.lists.len(), "Board loaded");
        Ok(Self::new(board, api))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Receives every new board value as soon as it is applied
    pub fn subscribe(&self) -> watch::Receiver<Board> {
        self.updates.subscribe()
    }

    pub fn phase(&self) -> DragPhase {
        self.tracker().phase
    }

    /// Outcome of the most recently finished persistence request
    pub fn last_outcome(&self) -> Option<(Uuid, PersistOutcome)> {
        self.tracker().last_outcome
    }

    /// Applies a server-confirmed edit (create, rename, delete) to the local board
    pub fn update_board<T>(&mut self, edit: impl FnOnce(&mut Board) -> Result<T>) -> Result<T> {
        let mut next = self.board.clone();
        let value = edit(&mut next)?;
        self.publish(next);
        Ok(value)
    }

    /// Replaces the local board with the server's copy
    ///
    /// This is the only way a move whose persistence failed gets undone.
    pub async fn refresh(&mut self) -> Result<()> {
        let board = self.reconciler.api().fetch_board(self.board.id).await?;
        self.publish(board);
        Ok(())
    }

    /// Starts a drag gesture and returns its id
    pub fn begin_drag(&mut self, kind: DragKind) -> Uuid {
        let gesture = Uuid::new_v4();
        self.tracker().phase = DragPhase::Dragging { gesture, kind };
        gesture
    }

    /// Ends a gesture dropped outside any target
    pub fn cancel_drag(&mut self) {
        let mut tracker = self.tracker();
        if matches!(tracker.phase, DragPhase::Dragging { .. }) {
            tracker.phase = DragPhase::Idle;
        }
    }

    /// Moves a list and persists the new ranking in the background
    ///
    /// Returns `None` when the list is dropped on its own slot: nothing
    /// changes and no request is sent. Invalid indices fail before any change.
    pub fn move_list(
        &mut self,
        source_index: usize,
        dest_index: usize,
    ) -> Result<Option<PersistHandle>> {
        let gesture = self.current_gesture(DragKind::List);

        if source_index == dest_index {
            if source_index >= self.board.lists.len() {
                self.cancel_drag();
                return Err(FlowlogError::IndexOutOfBounds {
                    index: source_index,
                    len: self.board.lists.len(),
                });
            }
            self.settle_noop(gesture);
            return Ok(None);
        }

        let next = match move_list(self.board.clone(), source_index, dest_index) {
            Ok(next) => next,
            Err(e) => {
                self.cancel_drag();
                return Err(e);
            }
        };
        self.apply_drop(gesture, next);

        let board_id = self.board.id;
        let ranking: Vec<ListId> = self.board.lists.iter().map(|list| list.id).collect();
        let reconciler = self.reconciler.clone();
        let tracker = Arc::clone(&self.tracker);

        self.tracker().phase = DragPhase::Persisting { gesture };
        let task = tokio::spawn(async move {
            let result = reconciler.persist_list_order(board_id, &ranking).await;
            report(&tracker, gesture, "list", &result);
            result
        });

        Ok(Some(PersistHandle { gesture, task }))
    }

    /// Moves a card within or across lists and persists the affected rankings
    ///
    /// A cross-list move sends the rankings of both lists in one request.
    pub fn move_card(
        &mut self,
        source_list_id: ListId,
        source_index: usize,
        dest_list_id: ListId,
        dest_index: usize,
    ) -> Result<Option<PersistHandle>> {
        let gesture = self.current_gesture(DragKind::Card);

        let next = match move_card(
            self.board.clone(),
            source_list_id,
            source_index,
            dest_list_id,
            dest_index,
        ) {
            Ok(next) => next,
            Err(e) => {
                self.cancel_drag();
                return Err(e);
            }
        };

        if source_list_id == dest_list_id && source_index == dest_index {
            self.settle_noop(gesture);
            return Ok(None);
        }

        let affected: Vec<ListId> = if source_list_id == dest_list_id {
            vec![source_list_id]
        } else {
            vec![source_list_id, dest_list_id]
        };
        let positions = card_positions(&next, &affected)?;
        self.apply_drop(gesture, next);

        let reconciler = self.reconciler.clone();
        let tracker = Arc::clone(&self.tracker);

        self.tracker().phase = DragPhase::Persisting { gesture };
        let task = tokio::spawn(async move {
            let result = reconciler.persist_card_order(&positions).await;
            report(&tracker, gesture, "card", &result);
            result
        });

        Ok(Some(PersistHandle { gesture, task }))
    }

    fn tracker(&self) -> MutexGuard<'_, GestureTracker> {
        self.tracker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Gesture id of the drag in progress, or a fresh one for a direct move
    fn current_gesture(&mut self, kind: DragKind) -> Uuid {
        if let DragPhase::Dragging { gesture, .. } = self.phase() {
            return gesture;
        }
        self.begin_drag(kind)
    }

    fn settle_noop(&mut self, gesture: Uuid) {
        tracing::trace!(gesture_id = %gesture, "Dropped in place; nothing to persist");
        self.tracker().phase = DragPhase::Idle;
    }

    fn apply_drop(&mut self, gesture: Uuid, next: Board) {
        self.publish(next);
        self.tracker().phase = DragPhase::Dropped { gesture };
    }

    fn publish(&mut self, next: Board) {
        self.board = next;
        self.updates.send_replace(self.board.clone());
    }
}

fn report(tracker: &Mutex<GestureTracker>, gesture: Uuid, what: &str, result: &Result<()>) {
    let outcome = match result {
        Ok(()) => {
            tracing::debug!(gesture_id = %gesture, kind = what, "Reorder persisted");
            PersistOutcome::Confirmed
        }
        Err(e) => {
            tracing::warn!(
                gesture_id = %gesture,
                kind = what,
                error = %e,
                "Reorder not persisted; keeping local order"
            );
            PersistOutcome::FailedSilently
        }
    };
    tracker
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .finish(gesture, outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryBoardApi;
    use crate::domain::{Card, CardId, List};

    fn seeded_board() -> Board {
        let mut board = Board::new(BoardId(1), "Board");
        for (id, title) in [(1, "A"), (2, "B"), (3, "C")] {
            board.add_list(List::new(ListId(id), BoardId(1), title));
        }
        board.add_card(Card::new(CardId(1), ListId(1), "c1")).unwrap();
        board.add_card(Card::new(CardId(2), ListId(1), "c2")).unwrap();
        board.add_card(Card::new(CardId(3), ListId(2), "c3")).unwrap();
        board
    }

    fn session() -> (BoardSession, Arc<MemoryBoardApi>) {
        let store = Arc::new(MemoryBoardApi::with_boards([seeded_board()]));
        (BoardSession::new(seeded_board(), store.clone()), store)
    }

    #[tokio::test]
    async fn test_panicked_task_is_not_a_persistence_error() {
        let handle = PersistHandle {
            gesture: Uuid::new_v4(),
            task: tokio::spawn(async {
                if true {
                    panic!("reorder task crashed");
                }
                Ok::<(), FlowlogError>(())
            }),
        };

        let err = handle.join().await.unwrap_err();
        assert!(matches!(err, FlowlogError::TaskFailed(_)));
        assert!(!err.is_persistence_error());
    }

    #[tokio::test]
    async fn test_panicked_task_fails_silently() {
        let handle = PersistHandle {
            gesture: Uuid::new_v4(),
            task: tokio::spawn(async {
                if true {
                    panic!("reorder task crashed");
                }
                Ok::<(), FlowlogError>(())
            }),
        };
        assert_eq!(handle.outcome().await, PersistOutcome::FailedSilently);
    }

    #[tokio::test]
    async fn test_begin_and_cancel_drag() {
        let (mut session, store) = session();
        assert_eq!(session.phase(), DragPhase::Idle);

        let gesture = session.begin_drag(DragKind::Card);
        assert_eq!(
            session.phase(),
            DragPhase::Dragging {
                gesture,
                kind: DragKind::Card
            }
        );

        session.cancel_drag();
        assert_eq!(session.phase(), DragPhase::Idle);
        assert_eq!(store.card_reorder_count(), 0);
    }

    #[tokio::test]
    async fn test_move_list_uses_dragging_gesture_id() {
        let (mut session, _store) = session();
        let gesture = session.begin_drag(DragKind::List);

        let handle = session.move_list(0, 1).unwrap().unwrap();
        assert_eq!(handle.gesture_id(), gesture);
        assert_eq!(handle.outcome().await, PersistOutcome::Confirmed);
        assert_eq!(
            session.last_outcome(),
            Some((gesture, PersistOutcome::Confirmed))
        );
        assert_eq!(session.phase(), DragPhase::Idle);
    }

    #[tokio::test]
    async fn test_noop_move_returns_to_idle() {
        let (mut session, store) = session();
        session.begin_drag(DragKind::List);

        assert!(session.move_list(2, 2).unwrap().is_none());
        assert_eq!(session.phase(), DragPhase::Idle);
        assert_eq!(store.list_reorder_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_move_leaves_board_alone() {
        let (mut session, store) = session();
        let before = session.board().clone();

        assert!(session.move_list(0, 7).is_err());
        assert!(session.move_card(ListId(1), 0, ListId(99), 0).is_err());

        assert_eq!(session.board(), &before);
        assert_eq!(session.phase(), DragPhase::Idle);
        assert_eq!(store.list_reorder_count(), 0);
        assert_eq!(store.card_reorder_count(), 0);
    }

    #[tokio::test]
    async fn test_observer_sees_move_immediately() {
        let (mut session, _store) = session();
        let observer = session.subscribe();

        let handle = session.move_list(0, 2).unwrap().unwrap();
        assert_eq!(observer.borrow().lists[2].id, ListId(1));
        handle.join().await.unwrap();
    }

    #[tokio::test]
    async fn test_update_board_publishes_edit() {
        let (mut session, _store) = session();
        let observer = session.subscribe();

        session
            .update_board(|board| board.rename_list(ListId(2), "Doing"))
            .unwrap();
        assert_eq!(observer.borrow().list(ListId(2)).unwrap().title, "Doing");

        assert!(session
            .update_board(|board| board.rename_list(ListId(2), ""))
            .is_err());
        assert_eq!(session.board().list(ListId(2)).unwrap().title, "Doing");
    }

    #[test]
    fn test_finish_ignores_superseded_gesture() {
        let mut tracker = GestureTracker {
            phase: DragPhase::Idle,
            last_outcome: None,
        };
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        tracker.phase = DragPhase::Dragging {
            gesture: new,
            kind: DragKind::Card,
        };

        tracker.finish(old, PersistOutcome::FailedSilently);

        assert!(matches!(tracker.phase, DragPhase::Dragging { gesture, .. } if gesture == new));
        assert_eq!(
            tracker.last_outcome,
            Some((old, PersistOutcome::FailedSilently))
        );
    }
}
