//! End-to-end automation flow: change event in, ordered action lists out,
//! bookkeeping recorded by the caller.

use tasklens_core::{
    FilterOperator, FilterProperty, FilterRule, FilterValue, Priority, Task, TaskStatus,
};
use tasklens_rules::{
    ActionType, ConditionLogic, ConditionOperator, ConditionProperty, DateUnit, RelativeDateValue,
    Rule, RuleAction, RuleCondition, TaskChangeContext, TriggerType, fire,
};
use time::OffsetDateTime;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2026-03-11 12:00 UTC);

fn task(title: &str) -> Task {
    Task::new(title, NOW)
}

fn defer_waiting_rule() -> Rule {
    let mut rule = Rule::new("Defer waiting tasks", TriggerType::StatusChanged);
    rule.trigger_value = Some("waiting".into());
    rule.conditions.push(RuleCondition::new(
        ConditionProperty::HasDueDate,
        ConditionOperator::IsFalse,
        "",
    ));
    rule.actions.push(
        RuleAction::new(ActionType::SetDeferDate)
            .with_relative_date(RelativeDateValue::new(1, DateUnit::Weeks)),
    );
    rule.actions
        .push(RuleAction::new(ActionType::AddTag).with_value("waiting-on"));
    rule
}

#[test]
fn matched_rule_yields_its_actions_in_order() {
    let subject = task("chase signature");
    let context = TaskChangeContext::new(TriggerType::StatusChanged, &subject)
        .with_values(Some("next_action"), Some("waiting"));

    let rules = vec![defer_waiting_rule()];
    let firings = fire(&context, &rules);
    assert_eq!(firings.len(), 1);

    let kinds: Vec<ActionType> = firings[0].actions.iter().map(|a| a.kind).collect();
    assert_eq!(kinds, vec![ActionType::SetDeferDate, ActionType::AddTag]);

    let deferred = firings[0].actions[0]
        .effective_date(NOW)
        .unwrap_or_else(|| panic!("defer action must carry a relative date"));
    assert_eq!(deferred, datetime!(2026-03-18 12:00 UTC));
}

#[test]
fn caller_records_the_firing_after_executing_actions() {
    let subject = task("chase signature");
    let context = TaskChangeContext::new(TriggerType::StatusChanged, &subject)
        .with_values(None::<&str>, Some("waiting"));

    let mut rules = vec![defer_waiting_rule()];
    let fired: Vec<usize> = fire(&context, &rules)
        .iter()
        .enumerate()
        .map(|(index, _)| index)
        .collect();

    for index in fired {
        let rule = rules[index].clone().with_trigger(NOW);
        rules[index] = rule;
    }

    assert_eq!(rules[0].trigger_count, 1);
    assert_eq!(rules[0].last_triggered, Some(NOW));

    // A second identical event fires again; bookkeeping does not gate it.
    assert_eq!(fire(&context, &rules).len(), 1);
    assert_eq!(rules[0].clone().with_trigger(NOW).trigger_count, 2);
}

#[test]
fn any_logic_fires_on_a_single_holding_condition() {
    let mut subject = task("mixed");
    subject.status = TaskStatus::NextAction;
    subject.priority = Priority::Low;

    let mut rule = Rule::new("either", TriggerType::TaskCreated);
    rule.condition_logic = ConditionLogic::Any;
    rule.conditions = vec![
        RuleCondition::new(ConditionProperty::Priority, ConditionOperator::Equals, "high"),
        RuleCondition::new(ConditionProperty::Status, ConditionOperator::Equals, "next_action"),
    ];
    rule.actions.push(RuleAction::new(ActionType::Flag));

    let context = TaskChangeContext::new(TriggerType::TaskCreated, &subject);
    assert_eq!(fire(&context, std::slice::from_ref(&rule)).len(), 1);

    rule.condition_logic = ConditionLogic::All;
    assert!(fire(&context, std::slice::from_ref(&rule)).is_empty());
}

#[test]
fn tag_semantics_differ_between_evaluator_and_conditions() {
    // The predicate evaluator treats tag `contains` as case-insensitive
    // contains-all; automation conditions match one literal name
    // case-sensitively. Both behaviors are intentional; pin them here.
    let mut subject = task("tagged");
    subject.tags.insert("Errand".into());
    subject.tags.insert("weekend".into());

    let evaluator_rule = FilterRule::new(
        FilterProperty::Tags,
        FilterOperator::Contains,
        FilterValue::TextList(vec!["errand".into(), "WEEKEND".into()]),
    );
    assert!(evaluator_rule.matches(&subject, NOW));

    let condition =
        RuleCondition::new(ConditionProperty::HasTag, ConditionOperator::Equals, "errand");
    assert!(!condition.evaluate(&subject));

    let exact =
        RuleCondition::new(ConditionProperty::HasTag, ConditionOperator::Equals, "Errand");
    assert!(exact.evaluate(&subject));
}

#[test]
fn rules_round_trip_through_json() {
    let rule = defer_waiting_rule();
    let json =
        serde_json::to_string(&rule).unwrap_or_else(|err| panic!("rule must serialize: {err}"));
    let back: Rule =
        serde_json::from_str(&json).unwrap_or_else(|err| panic!("rule must deserialize: {err}"));
    assert_eq!(back, rule);
}
