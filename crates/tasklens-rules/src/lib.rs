//! Trigger-condition-action automation over task-change events.
//!
//! The engine is side-effect-free: [`fire`] selects the enabled rules whose
//! trigger and conditions match a [`TaskChangeContext`] and returns their
//! actions as data. The external store executes the actions and owns the
//! single mutable copy of each [`Rule`]; after executing a firing it calls
//! [`Rule::with_trigger`] to record the bookkeeping.

/// Data-only action descriptions and relative-date arithmetic.
pub mod action;
/// Boolean conditions gating a triggered rule.
pub mod condition;
/// Rule selection over task-change events.
pub mod engine;
/// Rule records and trigger types.
pub mod rule;
/// Built-in rule templates.
pub mod templates;

pub use action::{ActionType, DateUnit, RelativeDateValue, RuleAction};
pub use condition::{ConditionOperator, ConditionProperty, RuleCondition};
pub use engine::{RuleFiring, TaskChangeContext, fire};
pub use rule::{ConditionLogic, Rule, TriggerType};
