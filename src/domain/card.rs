use crate::domain::ids::{
    BoardId, CardId, ChecklistId, ChecklistItemId, LabelId, ListId, UserId,
};
use crate::error::{FlowlogError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A colored tag defined on a board and attachable to its cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
}

/// A user account as it appears on boards and cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Member {
    /// Letter shown in place of a missing avatar
    pub fn initial(&self) -> Option<char> {
        self.name.chars().next().map(|c| c.to_ascii_uppercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub content: String,
    #[serde(default)]
    pub is_checked: bool,
}

impl ChecklistItem {
    pub fn toggle(&mut self) {
        self.is_checked = !self.is_checked;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: ChecklistId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Returns `(checked, total)` item counts
    pub fn progress(&self) -> (usize, usize) {
        let done = self.items.iter().filter(|item| item.is_checked).count();
        (done, self.items.len())
    }

    /// Checks if every item is ticked; an empty checklist is never complete
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.is_checked)
    }

    /// Toggles an item by id
    pub fn toggle_item(&mut self, item_id: ChecklistItemId) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| {
                FlowlogError::ValidationError(format!("checklist item not found: {}", item_id))
            })?;
        item.toggle();
        Ok(())
    }
}

/// A work item living in exactly one list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub list_id: ListId,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

impl Card {
    /// Creates a bare card; order is assigned when it joins a list
    pub fn new(id: CardId, list_id: ListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            due_date: None,
            cover_url: None,
            list_id,
            order: 0,
            labels: Vec::new(),
            members: Vec::new(),
            checklists: Vec::new(),
        }
    }

    /// Sets the title, rejecting blank input
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(FlowlogError::ValidationError(
                "card title must not be empty".to_string(),
            ));
        }
        self.title = trimmed.to_string();
        Ok(())
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>) {
        self.due_date = due;
    }

    /// Checks if the due date has passed relative to `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.map(|due| due < now).unwrap_or(false)
    }

    pub fn has_label(&self, label_id: LabelId) -> bool {
        self.labels.iter().any(|label| label.id == label_id)
    }

    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|member| member.id == user_id)
    }

    /// Attaches a label; labels form a set so duplicates are ignored
    pub fn attach_label(&mut self, label: Label) {
        if !self.has_label(label.id) {
            self.labels.push(label);
        }
    }

    pub fn detach_label(&mut self, label_id: LabelId) {
        self.labels.retain(|label| label.id != label_id);
    }

    /// Assigns a member; members form a set so duplicates are ignored
    pub fn assign_member(&mut self, member: Member) {
        if !self.has_member(member.id) {
            self.members.push(member);
        }
    }

    pub fn unassign_member(&mut self, user_id: UserId) {
        self.members.retain(|member| member.id != user_id);
    }

    /// Sums checklist progress across all checklists as `(checked, total)`
    pub fn checklist_progress(&self) -> (usize, usize) {
        self.checklists
            .iter()
            .map(Checklist::progress)
            .fold((0, 0), |(done, total), (d, t)| (done + d, total + t))
    }
}
