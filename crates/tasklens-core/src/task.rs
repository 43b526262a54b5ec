use std::collections::BTreeSet;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{ParseTokenError, normalize_token};

/// Stable identity of a task record.
///
/// Wraps a version-7 UUID so identifiers sort by creation time, and
/// serializes transparently as the hyphenated string form.
#[derive(
    Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Mint an identifier for a newly captured task.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Workflow status of a task.
///
/// The declaration order is the sorting order used by
/// [`SortBy::Status`](crate::perspective::SortBy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskStatus {
    /// Captured but not yet processed.
    Inbox,
    /// Actionable and ready to work on.
    NextAction,
    /// Blocked on someone or something else.
    Waiting,
    /// Deliberately parked for later review.
    Someday,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// Token representation used in persisted configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::NextAction => "next_action",
            Self::Waiting => "waiting",
            Self::Someday => "someday",
            Self::Completed => "completed",
        }
    }

    /// Human-readable name, used as a grouping label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::NextAction => "Next Action",
            Self::Waiting => "Waiting",
            Self::Someday => "Someday",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "inbox" => Ok(Self::Inbox),
            "next_action" | "nextaction" => Ok(Self::NextAction),
            "waiting" => Ok(Self::Waiting),
            "someday" => Ok(Self::Someday),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(ParseTokenError::new("status", s)),
        }
    }
}

/// Task priority with a total order (`Low < Medium < High`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Default weighting.
    Medium,
    /// Do this first.
    High,
}

impl Priority {
    /// Token representation used in persisted configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Human-readable name, used as a grouping label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTokenError::new("priority", s)),
        }
    }
}

/// Immutable snapshot of a task as consumed by the query engine.
///
/// The task collection is owned by an external store; this crate borrows
/// snapshots per call and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Identifier of the task.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Free-form notes in Markdown.
    #[serde(default)]
    pub notes: String,
    /// Workflow status.
    pub status: TaskStatus,
    /// Owning project name, if any.
    #[serde(default)]
    pub project: Option<String>,
    /// GTD context (e.g. `@office`), if any.
    #[serde(default)]
    pub context: Option<String>,
    /// Flagged for attention.
    #[serde(default)]
    pub flagged: bool,
    /// Priority weighting.
    pub priority: Priority,
    /// Due instant, if any.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due: Option<OffsetDateTime>,
    /// Defer-until instant, if any.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub defer: Option<OffsetDateTime>,
    /// Estimated effort in minutes, if any.
    #[serde(default)]
    pub effort_minutes: Option<u32>,
    /// Attached tag names.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Parent task, when this task is a subtask.
    #[serde(default)]
    pub parent: Option<TaskId>,
    /// Direct subtasks.
    #[serde(default)]
    pub subtasks: BTreeSet<TaskId>,
    /// Number of file attachments.
    #[serde(default)]
    pub attachment_count: u32,
    /// Creation instant.
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    /// Last modification instant.
    #[serde(with = "time::serde::rfc3339")]
    pub modified: OffsetDateTime,
}

impl Task {
    /// Create a fresh inbox task with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>, now: OffsetDateTime) -> Self {
        Self {
            id: TaskId::new(),
            title: title.into(),
            notes: String::new(),
            status: TaskStatus::Inbox,
            project: None,
            context: None,
            flagged: false,
            priority: Priority::Medium,
            due: None,
            defer: None,
            effort_minutes: None,
            tags: BTreeSet::new(),
            parent: None,
            subtasks: BTreeSet::new(),
            attachment_count: 0,
            created: now,
            modified: now,
        }
    }

    /// A task is deferred while its defer instant lies in the future.
    #[must_use]
    pub fn is_deferred(&self, now: OffsetDateTime) -> bool {
        self.defer.is_some_and(|defer| defer > now)
    }

    /// Whether the task has at least one subtask.
    #[must_use]
    pub fn has_subtasks(&self) -> bool {
        !self.subtasks.is_empty()
    }

    /// Whether the task itself is a subtask of another task.
    #[must_use]
    pub const fn is_subtask(&self) -> bool {
        self.parent.is_some()
    }

    /// Whether the task carries any file attachments.
    #[must_use]
    pub const fn has_attachments(&self) -> bool {
        self.attachment_count > 0
    }
}
