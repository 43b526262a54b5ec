use serde::{Deserialize, Serialize};
use tasklens_core::Task;
use tasklens_core::error::normalize_token;

/// Task field a rule condition tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionProperty {
    /// Workflow status, compared as text.
    Status,
    /// Priority, compared as text.
    Priority,
    /// Owning project name.
    Project,
    /// GTD context name.
    Context,
    /// Task title.
    Title,
    /// A single tag name carried in the condition value.
    HasTag,
    /// Flagged marker (boolean-shaped).
    Flagged,
    /// Task belongs to a project (boolean-shaped).
    HasProject,
    /// Task has a context (boolean-shaped).
    HasContext,
    /// Task has a due instant (boolean-shaped).
    HasDueDate,
    /// Task is a subtask (boolean-shaped).
    IsSubtask,
}

/// Comparison operator of a rule condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    /// Equality.
    Equals,
    /// Negated equality.
    NotEquals,
    /// Substring match.
    Contains,
    /// Negated substring match.
    NotContains,
    /// Boolean field is set.
    IsTrue,
    /// Boolean field is unset.
    IsFalse,
}

/// Boolean test gating whether a matched-trigger rule actually fires.
///
/// Text properties compare case-insensitively. Boolean-shaped properties
/// answer only to `isTrue`/`isFalse`. `hasTag` matches a single literal
/// tag name case-sensitively; this is deliberately stricter than the
/// predicate evaluator's case-insensitive contains-all tag semantics,
/// since this path names one exact tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCondition {
    /// Task field under test.
    pub property: ConditionProperty,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Comparison payload.
    pub value: String,
}

impl RuleCondition {
    /// Build a condition.
    #[must_use]
    pub fn new(
        property: ConditionProperty,
        operator: ConditionOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            property,
            operator,
            value: value.into(),
        }
    }

    /// Evaluate the condition against a task snapshot. Combinations outside
    /// the property's shape answer `false`.
    #[must_use]
    pub fn evaluate(&self, task: &Task) -> bool {
        match self.property {
            ConditionProperty::Status => {
                enumerated_condition(task.status.as_str(), self.operator, &self.value)
            }
            ConditionProperty::Priority => {
                enumerated_condition(task.priority.as_str(), self.operator, &self.value)
            }
            ConditionProperty::Project => {
                text_condition(task.project.as_deref().unwrap_or(""), self.operator, &self.value)
            }
            ConditionProperty::Context => {
                text_condition(task.context.as_deref().unwrap_or(""), self.operator, &self.value)
            }
            ConditionProperty::Title => text_condition(&task.title, self.operator, &self.value),
            ConditionProperty::HasTag => {
                let present = task.tags.contains(&self.value);
                match self.operator {
                    ConditionOperator::Equals | ConditionOperator::IsTrue => present,
                    ConditionOperator::NotEquals | ConditionOperator::IsFalse => !present,
                    _ => false,
                }
            }
            ConditionProperty::Flagged => boolean_condition(task.flagged, self.operator),
            ConditionProperty::HasProject => {
                boolean_condition(task.project.is_some(), self.operator)
            }
            ConditionProperty::HasContext => {
                boolean_condition(task.context.is_some(), self.operator)
            }
            ConditionProperty::HasDueDate => boolean_condition(task.due.is_some(), self.operator),
            ConditionProperty::IsSubtask => boolean_condition(task.is_subtask(), self.operator),
        }
    }
}

/// Case-insensitive text comparison.
fn text_condition(actual: &str, operator: ConditionOperator, expected: &str) -> bool {
    let actual = actual.to_ascii_lowercase();
    let expected = expected.to_ascii_lowercase();
    match operator {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        ConditionOperator::Contains => actual.contains(&expected),
        ConditionOperator::NotContains => !actual.contains(&expected),
        ConditionOperator::IsTrue | ConditionOperator::IsFalse => false,
    }
}

/// Enum-as-text comparison in normalized token form, so `"Next Action"`
/// matches the `next_action` status.
fn enumerated_condition(actual: &str, operator: ConditionOperator, expected: &str) -> bool {
    let expected = normalize_token(expected);
    match operator {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        ConditionOperator::Contains => actual.contains(&expected),
        ConditionOperator::NotContains => !actual.contains(&expected),
        ConditionOperator::IsTrue | ConditionOperator::IsFalse => false,
    }
}

fn boolean_condition(actual: bool, operator: ConditionOperator) -> bool {
    match operator {
        ConditionOperator::IsTrue => actual,
        ConditionOperator::IsFalse => !actual,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklens_core::{Priority, TaskStatus};
    use time::macros::datetime;

    fn task(title: &str) -> Task {
        Task::new(title, datetime!(2026-03-11 12:00 UTC))
    }

    #[test]
    fn status_conditions_accept_display_spellings() {
        let mut subject = task("triage");
        subject.status = TaskStatus::NextAction;

        let equals = RuleCondition::new(
            ConditionProperty::Status,
            ConditionOperator::Equals,
            "Next Action",
        );
        assert!(equals.evaluate(&subject));

        let not_someday = RuleCondition::new(
            ConditionProperty::Status,
            ConditionOperator::NotEquals,
            "someday",
        );
        assert!(not_someday.evaluate(&subject));
    }

    #[test]
    fn text_conditions_are_case_insensitive() {
        let mut subject = task("Call the Bank");
        subject.project = Some("Finance".into());

        assert!(
            RuleCondition::new(ConditionProperty::Title, ConditionOperator::Contains, "bank")
                .evaluate(&subject)
        );
        assert!(
            RuleCondition::new(ConditionProperty::Project, ConditionOperator::Equals, "finance")
                .evaluate(&subject)
        );
        // Absent optional fields compare as empty text.
        assert!(
            RuleCondition::new(ConditionProperty::Context, ConditionOperator::NotEquals, "@home")
                .evaluate(&subject)
        );
    }

    #[test]
    fn has_tag_matches_a_single_name_case_sensitively() {
        let mut subject = task("tagged");
        subject.tags.insert("Urgent".into());

        let exact = RuleCondition::new(ConditionProperty::HasTag, ConditionOperator::Equals, "Urgent");
        assert!(exact.evaluate(&subject));

        let wrong_case =
            RuleCondition::new(ConditionProperty::HasTag, ConditionOperator::Equals, "urgent");
        assert!(!wrong_case.evaluate(&subject));

        let negated =
            RuleCondition::new(ConditionProperty::HasTag, ConditionOperator::NotEquals, "urgent");
        assert!(negated.evaluate(&subject));
    }

    #[test]
    fn boolean_shaped_properties_answer_only_to_is_true_and_is_false() {
        let mut subject = task("booleans");
        subject.priority = Priority::High;
        subject.due = Some(datetime!(2026-03-20 09:00 UTC));

        assert!(
            RuleCondition::new(ConditionProperty::HasDueDate, ConditionOperator::IsTrue, "")
                .evaluate(&subject)
        );
        assert!(
            RuleCondition::new(ConditionProperty::HasProject, ConditionOperator::IsFalse, "")
                .evaluate(&subject)
        );
        assert!(
            !RuleCondition::new(ConditionProperty::Flagged, ConditionOperator::Equals, "true")
                .evaluate(&subject)
        );
    }
}
