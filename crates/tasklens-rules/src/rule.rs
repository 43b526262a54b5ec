use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tasklens_core::Task;
use tasklens_core::error::{ParseTokenError, normalize_token};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::action::RuleAction;
use crate::condition::RuleCondition;

/// Task-change event category that makes a rule eligible to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerType {
    /// A task was created.
    TaskCreated,
    /// A task reached the completed status.
    TaskCompleted,
    /// The workflow status changed.
    StatusChanged,
    /// The owning project changed.
    ProjectChanged,
    /// The GTD context changed.
    ContextChanged,
    /// The priority changed.
    PriorityChanged,
    /// A tag was attached.
    TagAdded,
    /// The flagged marker changed.
    FlagChanged,
    /// A due instant was set or moved.
    DueDateSet,
}

impl TriggerType {
    /// Token representation used in persisted configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::TaskCompleted => "task_completed",
            Self::StatusChanged => "status_changed",
            Self::ProjectChanged => "project_changed",
            Self::ContextChanged => "context_changed",
            Self::PriorityChanged => "priority_changed",
            Self::TagAdded => "tag_added",
            Self::FlagChanged => "flag_changed",
            Self::DueDateSet => "due_date_set",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "task_created" => Ok(Self::TaskCreated),
            "task_completed" => Ok(Self::TaskCompleted),
            "status_changed" => Ok(Self::StatusChanged),
            "project_changed" => Ok(Self::ProjectChanged),
            "context_changed" => Ok(Self::ContextChanged),
            "priority_changed" => Ok(Self::PriorityChanged),
            "tag_added" => Ok(Self::TagAdded),
            "flag_changed" => Ok(Self::FlagChanged),
            "due_date_set" => Ok(Self::DueDateSet),
            _ => Err(ParseTokenError::new("trigger", s)),
        }
    }
}

/// Combinator over a rule's condition list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionLogic {
    /// Every condition must hold.
    #[default]
    All,
    /// At least one condition must hold.
    Any,
}

/// A trigger + condition + action automation record.
///
/// Rules are created and edited by the user (or cloned from the built-in
/// templates); the engine only reads them. The caller owns the single
/// mutable copy and records successful firings through
/// [`with_trigger`](Self::with_trigger).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Identifier of the rule.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Disabled rules never fire.
    pub is_enabled: bool,
    /// Event category this rule reacts to.
    pub trigger: TriggerType,
    /// Optional exact-match constraint against the event's new value.
    #[serde(default)]
    pub trigger_value: Option<String>,
    /// Ordered conditions gating the firing.
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    /// ALL/ANY combinator over the conditions.
    pub condition_logic: ConditionLogic,
    /// Ordered actions to execute when the rule fires.
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    /// Instant of the most recent firing.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_triggered: Option<OffsetDateTime>,
    /// Number of recorded firings.
    #[serde(default)]
    pub trigger_count: u64,
}

impl Rule {
    /// Create an enabled rule with no conditions or actions.
    #[must_use]
    pub fn new(name: impl Into<String>, trigger: TriggerType) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            is_enabled: true,
            trigger,
            trigger_value: None,
            conditions: Vec::new(),
            condition_logic: ConditionLogic::default(),
            actions: Vec::new(),
            last_triggered: None,
            trigger_count: 0,
        }
    }

    /// Record a firing, returning the updated rule value. The engine's
    /// evaluation path stays side-effect-free; the caller replaces its
    /// copy with the returned value after executing the actions.
    #[must_use]
    pub fn with_trigger(mut self, at: OffsetDateTime) -> Self {
        self.last_triggered = Some(at);
        self.trigger_count = self.trigger_count.saturating_add(1);
        self
    }

    /// Evaluate the condition list under the rule's combinator. An empty
    /// list always holds.
    #[must_use]
    pub fn conditions_hold(&self, task: &Task) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        match self.condition_logic {
            ConditionLogic::All => self.conditions.iter().all(|c| c.evaluate(task)),
            ConditionLogic::Any => self.conditions.iter().any(|c| c.evaluate(task)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ConditionOperator, ConditionProperty};
    use tasklens_core::Priority;
    use time::macros::datetime;

    #[test]
    fn trigger_tokens_round_trip() {
        for trigger in [
            TriggerType::TaskCreated,
            TriggerType::TaskCompleted,
            TriggerType::StatusChanged,
            TriggerType::ProjectChanged,
            TriggerType::ContextChanged,
            TriggerType::PriorityChanged,
            TriggerType::TagAdded,
            TriggerType::FlagChanged,
            TriggerType::DueDateSet,
        ] {
            let parsed: TriggerType = trigger
                .as_str()
                .parse()
                .unwrap_or_else(|err| panic!("trigger token must parse: {err}"));
            assert_eq!(parsed, trigger);
        }
        assert!("task_touched".parse::<TriggerType>().is_err());
    }

    #[test]
    fn with_trigger_returns_an_updated_value() {
        let rule = Rule::new("bookkeeping", TriggerType::TaskCreated);
        let at = datetime!(2026-03-11 12:00 UTC);

        let fired = rule.clone().with_trigger(at);
        assert_eq!(fired.trigger_count, 1);
        assert_eq!(fired.last_triggered, Some(at));
        // The original value is untouched.
        assert_eq!(rule.trigger_count, 0);
        assert!(rule.last_triggered.is_none());
    }

    #[test]
    fn condition_logic_combines_all_and_any() {
        let now = datetime!(2026-03-11 12:00 UTC);
        let mut task = Task::new("combine", now);
        task.priority = Priority::High;

        let high = RuleCondition::new(ConditionProperty::Priority, ConditionOperator::Equals, "high");
        let flagged = RuleCondition::new(ConditionProperty::Flagged, ConditionOperator::IsTrue, "");

        let mut rule = Rule::new("logic", TriggerType::TaskCreated);
        rule.conditions = vec![high, flagged];
        assert!(!rule.conditions_hold(&task));

        rule.condition_logic = ConditionLogic::Any;
        assert!(rule.conditions_hold(&task));

        rule.conditions.clear();
        assert!(rule.conditions_hold(&task));
    }
}
