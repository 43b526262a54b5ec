use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::normalize_token;
use crate::task::Task;
use crate::value::{FilterOperator, FilterProperty, FilterValue};

/// One `(property, operator, value)` predicate triple.
///
/// Evaluation is total: a triple whose operator or value does not fit the
/// property answers `false` instead of erroring, so a half-edited or
/// corrupt rule excludes tasks rather than crashing the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Identity of the rule; the triple itself is immutable value data.
    pub id: Uuid,
    /// Task field under test.
    pub property: FilterProperty,
    /// Comparison operator.
    pub operator: FilterOperator,
    /// Typed comparison payload.
    pub value: FilterValue,
}

impl FilterRule {
    /// Create a rule with a fresh identity.
    #[must_use]
    pub fn new(property: FilterProperty, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            id: Uuid::now_v7(),
            property,
            operator,
            value,
        }
    }

    /// Evaluate this rule against a task snapshot.
    ///
    /// `now` anchors relative date windows (`isWithin`); all other
    /// comparisons ignore it.
    #[must_use]
    pub fn matches(&self, task: &Task, now: OffsetDateTime) -> bool {
        match self.property {
            FilterProperty::Title => match_text(&task.title, self.operator, &self.value),
            FilterProperty::Notes => match_text(&task.notes, self.operator, &self.value),
            FilterProperty::Project => {
                match_optional_text(task.project.as_deref(), self.operator, &self.value)
            }
            FilterProperty::Context => {
                match_optional_text(task.context.as_deref(), self.operator, &self.value)
            }
            FilterProperty::Status => {
                match_enumerated(task.status.as_str(), self.operator, &self.value)
            }
            FilterProperty::Priority => {
                match_enumerated(task.priority.as_str(), self.operator, &self.value)
            }
            FilterProperty::Due => match_date(task.due, self.operator, &self.value, now),
            FilterProperty::Defer => match_date(task.defer, self.operator, &self.value, now),
            FilterProperty::Created => {
                match_date(Some(task.created), self.operator, &self.value, now)
            }
            FilterProperty::Modified => {
                match_date(Some(task.modified), self.operator, &self.value, now)
            }
            FilterProperty::Effort => match_number(
                task.effort_minutes.map(i64::from),
                self.operator,
                &self.value,
            ),
            FilterProperty::Flagged => match_boolean(task.flagged, self.operator, &self.value),
            FilterProperty::HasSubtasks => {
                match_boolean(task.has_subtasks(), self.operator, &self.value)
            }
            FilterProperty::IsSubtask => {
                match_boolean(task.is_subtask(), self.operator, &self.value)
            }
            FilterProperty::HasAttachments => {
                match_boolean(task.has_attachments(), self.operator, &self.value)
            }
            FilterProperty::Tags => match_tags(&task.tags, self.operator, &self.value),
        }
    }
}

/// Case-insensitive matcher for always-present text fields.
fn match_text(actual: &str, operator: FilterOperator, value: &FilterValue) -> bool {
    match operator {
        FilterOperator::IsEmpty => actual.is_empty(),
        FilterOperator::IsNotEmpty => !actual.is_empty(),
        FilterOperator::Contains
        | FilterOperator::NotContains
        | FilterOperator::Equals
        | FilterOperator::NotEquals
        | FilterOperator::StartsWith
        | FilterOperator::EndsWith => {
            let FilterValue::Text(expected) = value else {
                return false;
            };
            let actual = actual.to_ascii_lowercase();
            let expected = expected.to_ascii_lowercase();
            match operator {
                FilterOperator::Contains => actual.contains(&expected),
                FilterOperator::NotContains => !actual.contains(&expected),
                FilterOperator::Equals => actual == expected,
                FilterOperator::NotEquals => actual != expected,
                FilterOperator::StartsWith => actual.starts_with(&expected),
                FilterOperator::EndsWith => actual.ends_with(&expected),
                _ => false,
            }
        }
        _ => false,
    }
}

/// Optional-text matcher: absence satisfies only `isEmpty`, presence
/// delegates to the text matcher.
fn match_optional_text(actual: Option<&str>, operator: FilterOperator, value: &FilterValue) -> bool {
    actual.map_or_else(
        || matches!(operator, FilterOperator::IsEmpty),
        |text| match_text(text, operator, value),
    )
}

/// Enum-as-text matcher (status, priority): `equals`/`notEquals` only,
/// compared in normalized token form.
fn match_enumerated(actual: &str, operator: FilterOperator, value: &FilterValue) -> bool {
    let FilterValue::Text(expected) = value else {
        return false;
    };
    let expected = normalize_token(expected);
    match operator {
        FilterOperator::Equals => actual == expected,
        FilterOperator::NotEquals => actual != expected,
        _ => false,
    }
}

fn match_date(
    actual: Option<OffsetDateTime>,
    operator: FilterOperator,
    value: &FilterValue,
    now: OffsetDateTime,
) -> bool {
    match operator {
        FilterOperator::IsEmpty => actual.is_none(),
        FilterOperator::IsNotEmpty => actual.is_some(),
        FilterOperator::IsWithin => match (actual, value) {
            (Some(instant), FilterValue::DateRange(token)) => token.contains(instant, now),
            _ => false,
        },
        FilterOperator::LessThan
        | FilterOperator::LessThanOrEqual
        | FilterOperator::GreaterThan
        | FilterOperator::GreaterThanOrEqual => match (actual, value) {
            (Some(instant), FilterValue::Date(bound)) => match operator {
                FilterOperator::LessThan => instant < *bound,
                FilterOperator::LessThanOrEqual => instant <= *bound,
                FilterOperator::GreaterThan => instant > *bound,
                FilterOperator::GreaterThanOrEqual => instant >= *bound,
                _ => false,
            },
            _ => false,
        },
        _ => false,
    }
}

fn match_number(actual: Option<i64>, operator: FilterOperator, value: &FilterValue) -> bool {
    match operator {
        FilterOperator::IsEmpty => actual.is_none(),
        FilterOperator::IsNotEmpty => actual.is_some(),
        FilterOperator::Equals
        | FilterOperator::NotEquals
        | FilterOperator::LessThan
        | FilterOperator::LessThanOrEqual
        | FilterOperator::GreaterThan
        | FilterOperator::GreaterThanOrEqual => match (actual, value) {
            (Some(number), FilterValue::Number(bound)) => match operator {
                FilterOperator::Equals => number == *bound,
                FilterOperator::NotEquals => number != *bound,
                FilterOperator::LessThan => number < *bound,
                FilterOperator::LessThanOrEqual => number <= *bound,
                FilterOperator::GreaterThan => number > *bound,
                FilterOperator::GreaterThanOrEqual => number >= *bound,
                _ => false,
            },
            _ => false,
        },
        _ => false,
    }
}

/// Boolean matcher: without a stored `Boolean` payload, `isTrue`/`isFalse`
/// read the task field directly; with one, they compare for equality.
fn match_boolean(actual: bool, operator: FilterOperator, value: &FilterValue) -> bool {
    match (operator, value) {
        (FilterOperator::IsTrue | FilterOperator::IsFalse, FilterValue::Boolean(expected)) => {
            actual == *expected
        }
        (FilterOperator::IsTrue, _) => actual,
        (FilterOperator::IsFalse, _) => !actual,
        _ => false,
    }
}

/// Tag matcher. `contains` requires ALL listed names to be present
/// (AND-within-list); `notContains` requires none of them. Names compare
/// case-insensitively.
fn match_tags(tags: &BTreeSet<String>, operator: FilterOperator, value: &FilterValue) -> bool {
    match operator {
        FilterOperator::IsEmpty => tags.is_empty(),
        FilterOperator::IsNotEmpty => !tags.is_empty(),
        FilterOperator::Contains | FilterOperator::NotContains => {
            let FilterValue::TextList(names) = value else {
                return false;
            };
            let present: BTreeSet<String> = tags.iter().map(|tag| tag.to_ascii_lowercase()).collect();
            let hit = |name: &String| present.contains(&name.to_ascii_lowercase());
            if operator == FilterOperator::Contains {
                names.iter().all(hit)
            } else {
                !names.iter().any(hit)
            }
        }
        _ => false,
    }
}
