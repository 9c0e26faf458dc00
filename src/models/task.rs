use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::config::Config;

/// The closed set of statuses accepted by a status-only update.
///
/// Create and general update store whatever string the client sent; only
/// `/updateTaskStatus` is checked against this enumeration.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[serde(rename = "TO-DO")]
    Todo,
    /// Task is currently being worked on.
    #[serde(rename = "IN-PROGRESS")]
    InProgress,
    /// Task is finished.
    #[serde(rename = "COMPLETED")]
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TO-DO",
            TaskStatus::InProgress => "IN-PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three task statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Field set shared by the JSON and multipart input paths of create and update.
///
/// Omitted or `null` fields deserialize to empty strings, so an update always
/// replaces all five fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskInput {
    #[validate(length(max = 200))]
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[validate(length(max = 64))]
    #[serde(deserialize_with = "null_as_empty")]
    pub date: String,
    #[validate(length(max = 5000))]
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[validate(length(max = 32))]
    #[serde(deserialize_with = "null_as_empty")]
    pub task_status: String,
    #[validate(length(max = 100))]
    #[serde(deserialize_with = "null_as_empty")]
    pub task_category: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A task as stored in the `task_management_data` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Store-assigned identifier; `None` only before the first insert.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Username of the owner.
    pub user_id: String,
    pub name: String,
    pub date: String,
    pub description: String,
    pub task_status: String,
    pub task_category: String,
    /// Hex identifier of the attached blob.
    #[serde(default)]
    pub file_id: String,
}

impl TaskRecord {
    pub fn new(owner: impl Into<String>, input: TaskInput, file_id: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id: owner.into(),
            name: input.name,
            date: input.date,
            description: input.description,
            task_status: input.task_status,
            task_category: input.task_category,
            file_id: file_id.into(),
        }
    }
}

/// A task as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub date: String,
    pub description: String,
    pub task_status: String,
    pub task_category: String,
    pub file_id: String,
    pub file_url: String,
}

impl Task {
    pub fn from_record(record: TaskRecord, config: &Config) -> Self {
        let file_url = config.file_url(&record.file_id);
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            user_id: record.user_id,
            name: record.name,
            date: record.date,
            description: record.description,
            task_status: record.task_status,
            task_category: record.task_category,
            file_id: record.file_id,
            file_url,
        }
    }
}
