use tasklens_core::Task;

use crate::action::RuleAction;
use crate::rule::{Rule, TriggerType};

/// Ephemeral snapshot of a task mutation, constructed by the store at the
/// mutation point and fed into [`fire`]. Not persisted.
#[derive(Debug, Clone)]
pub struct TaskChangeContext<'a> {
    /// What changed.
    pub change: TriggerType,
    /// Previous field value, when the change has one.
    pub old_value: Option<String>,
    /// New field value, when the change has one.
    pub new_value: Option<String>,
    /// The task after the mutation.
    pub task: &'a Task,
}

impl<'a> TaskChangeContext<'a> {
    /// Build a context for a change without field values.
    #[must_use]
    pub const fn new(change: TriggerType, task: &'a Task) -> Self {
        Self {
            change,
            old_value: None,
            new_value: None,
            task,
        }
    }

    /// Attach the old/new field values of the change.
    #[must_use]
    pub fn with_values(
        mut self,
        old_value: Option<impl Into<String>>,
        new_value: Option<impl Into<String>>,
    ) -> Self {
        self.old_value = old_value.map(Into::into);
        self.new_value = new_value.map(Into::into);
        self
    }
}

/// A rule that matched a change event, with the actions the caller must
/// execute against the task.
#[derive(Debug, Clone, Copy)]
pub struct RuleFiring<'a> {
    /// The matched rule. After executing the actions the caller records
    /// the firing via [`Rule::with_trigger`].
    pub rule: &'a Rule,
    /// The rule's actions, in declaration order.
    pub actions: &'a [RuleAction],
}

/// Select the enabled rules whose trigger and conditions match the change
/// event, preserving input order.
///
/// Pure: calling `fire` twice on the same inputs yields the same firings in
/// the same order. The engine neither mutates tasks nor records trigger
/// bookkeeping; both are the caller's job.
#[must_use]
pub fn fire<'a>(context: &TaskChangeContext<'_>, rules: &'a [Rule]) -> Vec<RuleFiring<'a>> {
    let mut firings = Vec::new();
    for rule in rules {
        if !rule.is_enabled || rule.trigger != context.change {
            continue;
        }
        if let Some(expected) = &rule.trigger_value
            && context.new_value.as_deref() != Some(expected.as_str())
        {
            tracing::trace!(rule = %rule.name, "trigger value mismatch");
            continue;
        }
        if !rule.conditions_hold(context.task) {
            tracing::trace!(rule = %rule.name, "conditions did not hold");
            continue;
        }
        tracing::debug!(
            rule = %rule.name,
            trigger = %rule.trigger,
            actions = rule.actions.len(),
            "rule matched change event"
        );
        firings.push(RuleFiring {
            rule,
            actions: &rule.actions,
        });
    }
    firings
}
