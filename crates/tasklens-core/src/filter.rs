use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::task::{Priority, Task, TaskStatus};
use crate::text::TextQuery;

/// Flat conjunction (AND) of independently optional criteria.
///
/// An absent field imposes no constraint, so the default filter matches
/// every task. Boards and built-in perspectives use this record; the
/// rule-driven [`SmartPerspective`](crate::perspective::SmartPerspective)
/// replaces it with a typed predicate list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Required workflow status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Required project name (case-insensitive equality).
    #[serde(default)]
    pub project: Option<String>,
    /// Required context (case-insensitive equality).
    #[serde(default)]
    pub context: Option<String>,
    /// Required flagged state.
    #[serde(default)]
    pub flagged: Option<bool>,
    /// Required priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Due instant must be present and strictly before this bound.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_before: Option<OffsetDateTime>,
    /// Due instant must be present and strictly after this bound.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_after: Option<OffsetDateTime>,
    /// Defer instant must be present and strictly after this bound.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub defer_after: Option<OffsetDateTime>,
    /// Effort must be present and at least this many minutes.
    #[serde(default)]
    pub effort_min: Option<u32>,
    /// Effort must be present and at most this many minutes.
    #[serde(default)]
    pub effort_max: Option<u32>,
    /// Required tag names (logical AND, case-insensitive).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Freeform text matched across title, notes, project, context, tags.
    #[serde(default)]
    pub text: Option<String>,
}

impl Filter {
    /// Start building a filter.
    #[must_use]
    pub fn builder() -> FilterBuilder {
        FilterBuilder::default()
    }

    /// Whether no criterion is set. An empty filter matches every task.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluate the conjunction of every present criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if let Some(project) = &self.project
            && !task
                .project
                .as_deref()
                .is_some_and(|actual| actual.eq_ignore_ascii_case(project))
        {
            return false;
        }
        if let Some(context) = &self.context
            && !task
                .context
                .as_deref()
                .is_some_and(|actual| actual.eq_ignore_ascii_case(context))
        {
            return false;
        }
        if self.flagged.is_some_and(|flagged| task.flagged != flagged) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if let Some(bound) = self.due_before
            && !task.due.is_some_and(|due| due < bound)
        {
            return false;
        }
        if let Some(bound) = self.due_after
            && !task.due.is_some_and(|due| due > bound)
        {
            return false;
        }
        if let Some(bound) = self.defer_after
            && !task.defer.is_some_and(|defer| defer > bound)
        {
            return false;
        }
        if let Some(min) = self.effort_min
            && !task.effort_minutes.is_some_and(|effort| effort >= min)
        {
            return false;
        }
        if let Some(max) = self.effort_max
            && !task.effort_minutes.is_some_and(|effort| effort <= max)
        {
            return false;
        }
        if !self.tags.is_empty() {
            let has = |name: &String| {
                task.tags
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(name))
            };
            if !self.tags.iter().all(has) {
                return false;
            }
        }
        if let Some(text) = &self.text
            && let Some(query) = TextQuery::new(text)
            && !query.matches(task)
        {
            return false;
        }
        true
    }
}

/// Consuming builder for [`Filter`] values.
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filter: Filter,
}

impl FilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a workflow status.
    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    /// Require a project by name.
    #[must_use]
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.filter.project = Some(project.into());
        self
    }

    /// Require a context by name.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.filter.context = Some(context.into());
        self
    }

    /// Require the flagged state.
    #[must_use]
    pub const fn flagged(mut self, flagged: bool) -> Self {
        self.filter.flagged = Some(flagged);
        self
    }

    /// Require a priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.filter.priority = Some(priority);
        self
    }

    /// Require a due instant strictly before the bound.
    #[must_use]
    pub const fn due_before(mut self, bound: OffsetDateTime) -> Self {
        self.filter.due_before = Some(bound);
        self
    }

    /// Require a due instant strictly after the bound.
    #[must_use]
    pub const fn due_after(mut self, bound: OffsetDateTime) -> Self {
        self.filter.due_after = Some(bound);
        self
    }

    /// Require a defer instant strictly after the bound.
    #[must_use]
    pub const fn defer_after(mut self, bound: OffsetDateTime) -> Self {
        self.filter.defer_after = Some(bound);
        self
    }

    /// Require a minimum effort estimate in minutes.
    #[must_use]
    pub const fn effort_min(mut self, minutes: u32) -> Self {
        self.filter.effort_min = Some(minutes);
        self
    }

    /// Require a maximum effort estimate in minutes.
    #[must_use]
    pub const fn effort_max(mut self, minutes: u32) -> Self {
        self.filter.effort_max = Some(minutes);
        self
    }

    /// Add a required tag (logical AND with previously added tags).
    #[must_use]
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.filter.tags.push(name.into());
        self
    }

    /// Configure the freeform search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let raw = text.into();
        let trimmed = raw.trim();
        self.filter.text = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Build the final [`Filter`].
    #[must_use]
    pub fn build(self) -> Filter {
        self.filter
    }
}
