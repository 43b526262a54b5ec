use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::date_range::DateRangeToken;
use crate::error::{ParseTokenError, normalize_token};

/// Typed payload carried by a [`FilterRule`](crate::predicate::FilterRule).
///
/// A rule whose value variant does not fit its property's
/// [`PropertyKind`] evaluates to `false` instead of erroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterValue {
    /// Free text, compared case-insensitively.
    Text(String),
    /// Integer payload (effort minutes).
    Number(i64),
    /// Literal instant for date comparisons.
    Date(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
    /// Boolean payload.
    Boolean(bool),
    /// Named relative window for `isWithin`.
    DateRange(DateRangeToken),
    /// Ordered tag-name list for tag matching.
    TextList(Vec<String>),
}

/// Comparison operator of a predicate triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Substring match.
    Contains,
    /// Negated substring match.
    NotContains,
    /// Equality.
    Equals,
    /// Negated equality.
    NotEquals,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Strictly less than.
    LessThan,
    /// Less than or equal.
    LessThanOrEqual,
    /// Strictly greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanOrEqual,
    /// Boolean field is set.
    IsTrue,
    /// Boolean field is unset.
    IsFalse,
    /// Field is absent or blank.
    IsEmpty,
    /// Field is present and non-blank.
    IsNotEmpty,
    /// Date falls within a named relative window.
    IsWithin,
}

impl FilterOperator {
    /// Token representation used in persisted configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::NotContains => "not_contains",
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::LessThan => "less_than",
            Self::LessThanOrEqual => "less_than_or_equal",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanOrEqual => "greater_than_or_equal",
            Self::IsTrue => "is_true",
            Self::IsFalse => "is_false",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
            Self::IsWithin => "is_within",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "contains" => Ok(Self::Contains),
            "not_contains" => Ok(Self::NotContains),
            "equals" => Ok(Self::Equals),
            "not_equals" => Ok(Self::NotEquals),
            "starts_with" => Ok(Self::StartsWith),
            "ends_with" => Ok(Self::EndsWith),
            "less_than" => Ok(Self::LessThan),
            "less_than_or_equal" => Ok(Self::LessThanOrEqual),
            "greater_than" => Ok(Self::GreaterThan),
            "greater_than_or_equal" => Ok(Self::GreaterThanOrEqual),
            "is_true" => Ok(Self::IsTrue),
            "is_false" => Ok(Self::IsFalse),
            "is_empty" => Ok(Self::IsEmpty),
            "is_not_empty" => Ok(Self::IsNotEmpty),
            "is_within" => Ok(Self::IsWithin),
            _ => Err(ParseTokenError::new("operator", s)),
        }
    }
}

/// Task field a predicate triple tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterProperty {
    /// Task title.
    Title,
    /// Free-form notes.
    Notes,
    /// Owning project (optional text).
    Project,
    /// GTD context (optional text).
    Context,
    /// Workflow status.
    Status,
    /// Priority weighting.
    Priority,
    /// Due instant.
    Due,
    /// Defer-until instant.
    Defer,
    /// Creation instant.
    Created,
    /// Last modification instant.
    Modified,
    /// Estimated effort in minutes.
    Effort,
    /// Flagged marker.
    Flagged,
    /// Task has subtasks.
    HasSubtasks,
    /// Task is itself a subtask.
    IsSubtask,
    /// Task carries attachments.
    HasAttachments,
    /// Attached tag names.
    Tags,
}

/// Value category of a [`FilterProperty`], driving evaluator dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Always-present text (title, notes).
    Text,
    /// Optional text (project, context).
    OptionalText,
    /// Enum compared as text (status, priority).
    Enumerated,
    /// Instant-valued.
    Date,
    /// Integer-valued.
    Number,
    /// Boolean-valued.
    Boolean,
    /// Set of tag names.
    TagList,
}

const TEXT_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::StartsWith,
    FilterOperator::EndsWith,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const ENUM_OPERATORS: &[FilterOperator] = &[FilterOperator::Equals, FilterOperator::NotEquals];

const DATE_OPERATORS: &[FilterOperator] = &[
    FilterOperator::IsWithin,
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const NUMBER_OPERATORS: &[FilterOperator] = &[
    FilterOperator::LessThan,
    FilterOperator::LessThanOrEqual,
    FilterOperator::GreaterThan,
    FilterOperator::GreaterThanOrEqual,
    FilterOperator::Equals,
    FilterOperator::NotEquals,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[FilterOperator] = &[FilterOperator::IsTrue, FilterOperator::IsFalse];

const TAG_OPERATORS: &[FilterOperator] = &[
    FilterOperator::Contains,
    FilterOperator::NotContains,
    FilterOperator::IsEmpty,
    FilterOperator::IsNotEmpty,
];

impl FilterProperty {
    /// Value category of this property.
    #[must_use]
    pub const fn kind(self) -> PropertyKind {
        match self {
            Self::Title | Self::Notes => PropertyKind::Text,
            Self::Project | Self::Context => PropertyKind::OptionalText,
            Self::Status | Self::Priority => PropertyKind::Enumerated,
            Self::Due | Self::Defer | Self::Created | Self::Modified => PropertyKind::Date,
            Self::Effort => PropertyKind::Number,
            Self::Flagged | Self::HasSubtasks | Self::IsSubtask | Self::HasAttachments => {
                PropertyKind::Boolean
            }
            Self::Tags => PropertyKind::TagList,
        }
    }

    /// Operators a rule-builder UI should offer for this property.
    ///
    /// Advisory only: the evaluator itself accepts any combination and
    /// answers `false` for combinations outside this table.
    #[must_use]
    pub const fn allowed_operators(self) -> &'static [FilterOperator] {
        match self.kind() {
            PropertyKind::Text | PropertyKind::OptionalText => TEXT_OPERATORS,
            PropertyKind::Enumerated => ENUM_OPERATORS,
            PropertyKind::Date => DATE_OPERATORS,
            PropertyKind::Number => NUMBER_OPERATORS,
            PropertyKind::Boolean => BOOLEAN_OPERATORS,
            PropertyKind::TagList => TAG_OPERATORS,
        }
    }

    /// Token representation used in persisted configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Notes => "notes",
            Self::Project => "project",
            Self::Context => "context",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Due => "due",
            Self::Defer => "defer",
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Effort => "effort",
            Self::Flagged => "flagged",
            Self::HasSubtasks => "has_subtasks",
            Self::IsSubtask => "is_subtask",
            Self::HasAttachments => "has_attachments",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for FilterProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterProperty {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "title" => Ok(Self::Title),
            "notes" => Ok(Self::Notes),
            "project" => Ok(Self::Project),
            "context" => Ok(Self::Context),
            "status" => Ok(Self::Status),
            "priority" => Ok(Self::Priority),
            "due" => Ok(Self::Due),
            "defer" => Ok(Self::Defer),
            "created" => Ok(Self::Created),
            "modified" => Ok(Self::Modified),
            "effort" => Ok(Self::Effort),
            "flagged" => Ok(Self::Flagged),
            "has_subtasks" => Ok(Self::HasSubtasks),
            "is_subtask" => Ok(Self::IsSubtask),
            "has_attachments" => Ok(Self::HasAttachments),
            "tags" => Ok(Self::Tags),
            _ => Err(ParseTokenError::new("property", s)),
        }
    }
}
