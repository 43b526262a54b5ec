use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::date_range::DateRangeToken;
use crate::error::{ParseTokenError, normalize_token};
use crate::filter::Filter;
use crate::predicate::FilterRule;
use crate::task::Task;

/// Grouping policy for a displayed task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupBy {
    /// Single "All" group.
    #[default]
    None,
    /// Bucket by workflow status display name.
    Status,
    /// Bucket by project name ("No Project" for orphans).
    Project,
    /// Bucket by context name ("No Context" for orphans).
    Context,
    /// Bucket by priority display name.
    Priority,
    /// Six-way due-date buckets (Overdue, Today, Tomorrow, This Week,
    /// Later, No Due Date).
    DueDate,
}

/// Sort key for a displayed task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Title, case-insensitive.
    Title,
    /// Creation instant.
    Created,
    /// Last modification instant.
    Modified,
    /// Due instant; tasks without one sort last.
    #[default]
    Due,
    /// Defer instant; tasks without one sort last.
    Defer,
    /// Priority.
    Priority,
    /// Workflow status.
    Status,
    /// Effort estimate; tasks without one sort last.
    Effort,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// Orient a comparison result along this direction.
    #[must_use]
    pub const fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Combinator over a smart perspective's rule list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterLogic {
    /// Every rule must match.
    #[default]
    And,
    /// At least one rule must match.
    Or,
}

impl fmt::Display for FilterLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "and",
            Self::Or => "or",
        })
    }
}

impl FromStr for FilterLogic {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "and" | "all" => Ok(Self::And),
            "or" | "any" => Ok(Self::Or),
            _ => Err(ParseTokenError::new("filter logic", s)),
        }
    }
}

/// Named filter + sort + group configuration for displaying a task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perspective {
    /// Identifier of the perspective.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Flat conjunction filter.
    pub filter: Filter,
    /// Grouping policy.
    pub group_by: GroupBy,
    /// Sort key.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Include completed tasks.
    pub show_completed: bool,
    /// Include tasks whose defer instant lies in the future.
    pub show_deferred: bool,
}

impl Perspective {
    /// Create a perspective with an empty filter and default policies.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            filter: Filter::default(),
            group_by: GroupBy::default(),
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            show_completed: false,
            show_deferred: false,
        }
    }

    /// Whether a task passes both the filter and the visibility toggles.
    #[must_use]
    pub fn matches(&self, task: &Task, now: OffsetDateTime) -> bool {
        visible(task, self.show_completed, self.show_deferred, now) && self.filter.matches(task)
    }

    /// Filter and stable-sort a task snapshot for display.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task], now: OffsetDateTime) -> Vec<&'a Task> {
        let mut out: Vec<&Task> = tasks.iter().filter(|task| self.matches(task, now)).collect();
        sort_tasks(&mut out, self.sort_by, self.sort_direction);
        tracing::trace!(
            perspective = %self.name,
            input = tasks.len(),
            visible = out.len(),
            "applied perspective"
        );
        out
    }

    /// Bucket tasks by the grouping policy.
    ///
    /// Every input task lands in exactly one group; groups are emitted in
    /// ascending label order, independent of the task-level sort direction.
    #[must_use]
    pub fn group<'a>(
        &self,
        tasks: &'a [Task],
        now: OffsetDateTime,
    ) -> Vec<(String, Vec<&'a Task>)> {
        group_tasks(tasks, self.group_by, now)
    }
}

/// A perspective driven by an ordered list of typed predicate rules
/// combined with ALL/ANY logic instead of a fixed filter record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartPerspective {
    /// Identifier of the perspective.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Ordered predicate rules.
    pub rules: Vec<FilterRule>,
    /// ALL/ANY combinator. An empty rule list matches every task.
    pub logic: FilterLogic,
    /// Grouping policy.
    pub group_by: GroupBy,
    /// Sort key.
    pub sort_by: SortBy,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Include completed tasks.
    pub show_completed: bool,
    /// Include tasks whose defer instant lies in the future.
    pub show_deferred: bool,
}

impl SmartPerspective {
    /// Create a smart perspective with no rules and default policies.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            rules: Vec::new(),
            logic: FilterLogic::default(),
            group_by: GroupBy::default(),
            sort_by: SortBy::default(),
            sort_direction: SortDirection::default(),
            show_completed: false,
            show_deferred: false,
        }
    }

    /// Whether a task passes the visibility toggles and the combined rules.
    #[must_use]
    pub fn matches(&self, task: &Task, now: OffsetDateTime) -> bool {
        if !visible(task, self.show_completed, self.show_deferred, now) {
            return false;
        }
        if self.rules.is_empty() {
            return true;
        }
        match self.logic {
            FilterLogic::And => self.rules.iter().all(|rule| rule.matches(task, now)),
            FilterLogic::Or => self.rules.iter().any(|rule| rule.matches(task, now)),
        }
    }

    /// Filter and stable-sort a task snapshot for display.
    #[must_use]
    pub fn apply<'a>(&self, tasks: &'a [Task], now: OffsetDateTime) -> Vec<&'a Task> {
        let mut out: Vec<&Task> = tasks.iter().filter(|task| self.matches(task, now)).collect();
        sort_tasks(&mut out, self.sort_by, self.sort_direction);
        tracing::trace!(
            perspective = %self.name,
            input = tasks.len(),
            visible = out.len(),
            "applied smart perspective"
        );
        out
    }

    /// Bucket tasks by the grouping policy; same contract as
    /// [`Perspective::group`].
    #[must_use]
    pub fn group<'a>(
        &self,
        tasks: &'a [Task],
        now: OffsetDateTime,
    ) -> Vec<(String, Vec<&'a Task>)> {
        group_tasks(tasks, self.group_by, now)
    }
}

fn visible(task: &Task, show_completed: bool, show_deferred: bool, now: OffsetDateTime) -> bool {
    (show_completed || task.status != crate::task::TaskStatus::Completed)
        && (show_deferred || !task.is_deferred(now))
}

fn sort_tasks(tasks: &mut [&Task], key: SortBy, direction: SortDirection) {
    tasks.sort_by(|a, b| compare_tasks(a, b, key, direction));
}

fn compare_tasks(a: &Task, b: &Task, key: SortBy, direction: SortDirection) -> Ordering {
    match key {
        SortBy::Title => direction.orient(
            a.title
                .to_ascii_lowercase()
                .cmp(&b.title.to_ascii_lowercase()),
        ),
        SortBy::Created => direction.orient(a.created.cmp(&b.created)),
        SortBy::Modified => direction.orient(a.modified.cmp(&b.modified)),
        SortBy::Due => compare_optional(a.due, b.due, direction),
        SortBy::Defer => compare_optional(a.defer, b.defer, direction),
        SortBy::Priority => direction.orient(a.priority.cmp(&b.priority)),
        SortBy::Status => direction.orient(a.status.cmp(&b.status)),
        SortBy::Effort => compare_optional(a.effort_minutes, b.effort_minutes, direction),
    }
}

/// Three-way comparison for optional sort keys. Absent values always land
/// at the visual end regardless of direction; present values order along
/// the direction.
fn compare_optional<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => direction.orient(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn group_tasks<'a>(
    tasks: &'a [Task],
    group_by: GroupBy,
    now: OffsetDateTime,
) -> Vec<(String, Vec<&'a Task>)> {
    if group_by == GroupBy::None {
        return vec![("All".to_owned(), tasks.iter().collect())];
    }
    let mut buckets: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        buckets
            .entry(group_label(task, group_by, now))
            .or_default()
            .push(task);
    }
    buckets.into_iter().collect()
}

fn group_label(task: &Task, group_by: GroupBy, now: OffsetDateTime) -> String {
    match group_by {
        GroupBy::None => "All".to_owned(),
        GroupBy::Status => task.status.display_name().to_owned(),
        GroupBy::Project => task
            .project
            .clone()
            .unwrap_or_else(|| "No Project".to_owned()),
        GroupBy::Context => task
            .context
            .clone()
            .unwrap_or_else(|| "No Context".to_owned()),
        GroupBy::Priority => task.priority.display_name().to_owned(),
        GroupBy::DueDate => due_bucket(task.due, now).to_owned(),
    }
}

/// Six-way due-date bucket. Overdue, Today, and Tomorrow take precedence
/// over the generic This Week bucket.
fn due_bucket(due: Option<OffsetDateTime>, now: OffsetDateTime) -> &'static str {
    let Some(due) = due else {
        return "No Due Date";
    };
    let day = due.to_offset(now.offset()).date();
    let today = now.date();
    if day < today {
        return "Overdue";
    }
    if day == today {
        return "Today";
    }
    if today.next_day().is_some_and(|tomorrow| day == tomorrow) {
        return "Tomorrow";
    }
    if DateRangeToken::ThisWeek.contains(due, now) {
        return "This Week";
    }
    "Later"
}
