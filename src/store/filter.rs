use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::models::{TaskInput, TaskRecord, TaskStatus};

/// Owner-scoped task query.
///
/// The owner is mandatory, so every query the repository issues is restricted
/// to one user's records. The optional parts narrow it further by equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFilter {
    pub owner: String,
    pub id: Option<ObjectId>,
    pub status: Option<String>,
    pub file_id: Option<String>,
}

impl TaskFilter {
    pub fn owned_by(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            id: None,
            status: None,
            file_id: None,
        }
    }

    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_file(mut self, file_id: impl Into<String>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// Native filter document for the `task_management_data` collection.
    pub fn to_document(&self) -> Document {
        let mut filter = doc! { "userId": self.owner.as_str() };
        if let Some(id) = self.id {
            filter.insert("_id", id);
        }
        if let Some(status) = &self.status {
            filter.insert("taskStatus", status.as_str());
        }
        if let Some(file_id) = &self.file_id {
            filter.insert("fileId", file_id.as_str());
        }
        filter
    }

    /// Same predicate as `to_document`, evaluated against an in-memory record.
    pub fn matches(&self, record: &TaskRecord) -> bool {
        record.user_id == self.owner
            && self.id.map_or(true, |id| record.id == Some(id))
            && self
                .status
                .as_ref()
                .map_or(true, |status| &record.task_status == status)
            && self
                .file_id
                .as_ref()
                .map_or(true, |file_id| &record.file_id == file_id)
    }
}

/// A modification applied to one task record.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskChanges {
    /// Replace all five editable fields; set the file only when a new one was uploaded.
    Fields {
        input: TaskInput,
        file_id: Option<String>,
    },
    /// Replace the status only.
    Status(TaskStatus),
}

impl TaskChanges {
    pub fn to_update_document(&self) -> Document {
        let set = match self {
            TaskChanges::Fields { input, file_id } => {
                let mut set = doc! {
                    "name": input.name.as_str(),
                    "date": input.date.as_str(),
                    "description": input.description.as_str(),
                    "taskStatus": input.task_status.as_str(),
                    "taskCategory": input.task_category.as_str(),
                };
                if let Some(file_id) = file_id {
                    set.insert("fileId", file_id.as_str());
                }
                set
            }
            TaskChanges::Status(status) => doc! { "taskStatus": status.as_str() },
        };
        doc! { "$set": set }
    }

    /// Applies the change to `record`, returning whether any field changed.
    pub fn apply(&self, record: &mut TaskRecord) -> bool {
        let before = record.clone();
        match self {
            TaskChanges::Fields { input, file_id } => {
                record.name = input.name.clone();
                record.date = input.date.clone();
                record.description = input.description.clone();
                record.task_status = input.task_status.clone();
                record.task_category = input.task_category.clone();
                if let Some(file_id) = file_id {
                    record.file_id = file_id.clone();
                }
            }
            TaskChanges::Status(status) => record.task_status = status.as_str().to_string(),
        }
        *record != before
    }
}

/// Counts reported by an update; `matched` decides not-found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}
