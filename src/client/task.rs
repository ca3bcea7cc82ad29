//! Internal task shape used by the manager and the list view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a checklist serialized into a task's notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: format!("item-{}", uuid::Uuid::new_v4()),
            text: text.into(),
            completed: false,
        }
    }
}

/// A task with typed timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub alert: bool,
    pub alert_time: Option<DateTime<Utc>>,
    pub version: i64,
}

impl Task {
    /// The checklist held in `notes`, or `None` if the notes are not a checklist.
    pub fn checklist(&self) -> Option<Vec<ChecklistItem>> {
        parse_checklist(self.notes.as_deref()?)
    }

    /// Flip one checklist item and write the list back into `notes`.
    /// Returns false when there is no checklist or no item with that id.
    pub fn toggle_checklist_item(&mut self, item_id: &str) -> bool {
        let Some(mut items) = self.checklist() else {
            return false;
        };
        let Some(item) = items.iter_mut().find(|i| i.id == item_id) else {
            return false;
        };
        item.completed = !item.completed;
        self.notes = Some(serialize_checklist(&items));
        true
    }

    /// Whether the task carries a reminder.
    pub fn has_reminder(&self) -> bool {
        self.alert && self.alert_time.is_some()
    }

    /// Whether the due date lies before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date.is_some_and(|due| due < now)
    }
}

/// A task payload submitted for creation: no identifier, no timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub alert: Option<bool>,
    pub alert_time: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Basic task: just a description.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Timed task: due date and an optional reminder.
    pub fn timed(
        text: impl Into<String>,
        due_date: DateTime<Utc>,
        alert_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            text: text.into(),
            due_date: Some(due_date),
            alert: Some(alert_time.is_some()),
            alert_time,
            ..Default::default()
        }
    }

    /// Checklist task: items are serialized into the notes.
    pub fn checklist(text: impl Into<String>, items: &[ChecklistItem]) -> Self {
        Self {
            text: text.into(),
            notes: Some(serialize_checklist(items)),
            ..Default::default()
        }
    }
}

fn parse_checklist(notes: &str) -> Option<Vec<ChecklistItem>> {
    serde_json::from_str(notes).ok()
}

fn serialize_checklist(items: &[ChecklistItem]) -> String {
    serde_json::to_string(items).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_notes(notes: Option<&str>) -> Task {
        let now = Utc::now();
        Task {
            id: "t1".to_string(),
            text: "Groceries".to_string(),
            completed: false,
            due_date: None,
            created_at: now,
            updated_at: now,
            notes: notes.map(str::to_string),
            alert: false,
            alert_time: None,
            version: 1,
        }
    }

    #[test]
    fn test_checklist_parses_items() {
        let task = task_with_notes(Some(
            r#"[{"id":"a","text":"milk","completed":false},{"id":"b","text":"eggs","completed":true}]"#,
        ));
        let items = task.checklist().unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[1].completed);
    }

    #[test]
    fn test_malformed_checklist_is_absent() {
        assert!(task_with_notes(Some("just a note")).checklist().is_none());
        assert!(task_with_notes(Some("[{\"id\":1}]")).checklist().is_none());
        assert!(task_with_notes(None).checklist().is_none());
    }

    #[test]
    fn test_toggle_checklist_item() {
        let draft = TaskDraft::checklist(
            "Groceries",
            &[ChecklistItem::new("milk"), ChecklistItem::new("eggs")],
        );
        let mut task = task_with_notes(draft.notes.as_deref());
        let eggs = task.checklist().unwrap()[1].id.clone();

        assert!(task.toggle_checklist_item(&eggs));
        let items = task.checklist().unwrap();
        assert!(!items[0].completed);
        assert!(items[1].completed);

        assert!(!task.toggle_checklist_item("missing"));
        assert!(!task_with_notes(Some("plain")).toggle_checklist_item(&eggs));
    }

    #[test]
    fn test_reminder_and_overdue_flags() {
        let now = Utc::now();
        let mut task = task_with_notes(None);
        assert!(!task.has_reminder());
        assert!(!task.is_overdue(now));

        task.alert = true;
        assert!(!task.has_reminder());
        task.alert_time = Some(now);
        assert!(task.has_reminder());

        task.due_date = Some(now - chrono::Duration::days(1));
        assert!(task.is_overdue(now));
        task.due_date = Some(now);
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn test_timed_draft_sets_alert() {
        let due = Utc::now();
        let draft = TaskDraft::timed("Call", due, Some(due));
        assert_eq!(draft.alert, Some(true));
        let quiet = TaskDraft::timed("Call", due, None);
        assert_eq!(quiet.alert, Some(false));
    }
}
