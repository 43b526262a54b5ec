use crate::action::{ActionType, DateUnit, RelativeDateValue, RuleAction};
use crate::condition::{ConditionOperator, ConditionProperty, RuleCondition};
use crate::rule::{Rule, TriggerType};

/// Stock automations shipped with the application. Callers clone and edit
/// them like any user-created rule.
#[must_use]
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        flag_high_priority(),
        inherit_context_from_project(),
        snooze_someday_tasks(),
    ]
}

/// Flag newly created high-priority tasks.
fn flag_high_priority() -> Rule {
    let mut rule = Rule::new("Flag high priority", TriggerType::TaskCreated);
    rule.conditions.push(RuleCondition::new(
        ConditionProperty::Priority,
        ConditionOperator::Equals,
        "high",
    ));
    rule.actions.push(RuleAction::new(ActionType::Flag));
    rule
}

/// Copy the project's context onto tasks that join a project without one.
fn inherit_context_from_project() -> Rule {
    let mut rule = Rule::new("Inherit context from project", TriggerType::ProjectChanged);
    rule.conditions.push(RuleCondition::new(
        ConditionProperty::HasContext,
        ConditionOperator::IsFalse,
        "",
    ));
    rule.actions
        .push(RuleAction::new(ActionType::CopyContextFromProject));
    rule
}

/// Push tasks parked as someday out of sight for a month.
fn snooze_someday_tasks() -> Rule {
    let mut rule = Rule::new("Snooze someday tasks", TriggerType::StatusChanged);
    rule.trigger_value = Some("someday".into());
    rule.actions.push(
        RuleAction::new(ActionType::SetDeferDate)
            .with_relative_date(RelativeDateValue::new(1, DateUnit::Months)),
    );
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{TaskChangeContext, fire};
    use tasklens_core::{Priority, Task};
    use time::macros::datetime;

    #[test]
    fn templates_are_enabled_and_actionable() {
        let rules = builtin_rules();
        assert_eq!(rules.len(), 3);
        for rule in &rules {
            assert!(rule.is_enabled, "{} must start enabled", rule.name);
            assert!(!rule.actions.is_empty(), "{} must carry actions", rule.name);
            assert_eq!(rule.trigger_count, 0);
        }
    }

    #[test]
    fn high_priority_template_fires_on_creation() {
        let now = datetime!(2026-03-11 12:00 UTC);
        let mut task = Task::new("urgent thing", now);
        task.priority = Priority::High;

        let context = TaskChangeContext::new(TriggerType::TaskCreated, &task);
        // Firings borrow from the rules slice, so it must outlive them.
        let rules = builtin_rules();
        let firings = fire(&context, &rules);
        assert_eq!(firings.len(), 1);
        assert_eq!(firings[0].actions[0].kind, ActionType::Flag);
    }
}
