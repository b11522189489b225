pub mod board;
pub mod card;
pub mod filter;
pub mod ids;
pub mod list;
pub mod ordering;

pub use board::{Background, Board, BoardSummary};
pub use card::{Card, Checklist, ChecklistItem, Label, Member};
pub use filter::{filter_lists, CardFilter};
pub use ids::{BoardId, CardId, ChecklistId, ChecklistItemId, LabelId, ListId, UserId};
pub use list::List;
pub use ordering::{card_positions, list_positions, move_card, move_list, CardPosition, ListPosition};
