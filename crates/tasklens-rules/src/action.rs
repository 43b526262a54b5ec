use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};
use uuid::Uuid;

/// Calendar unit of a relative date offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateUnit {
    /// Calendar days.
    Days,
    /// Seven-day weeks.
    Weeks,
    /// Calendar months, clamped to the last valid day.
    Months,
}

/// Signed calendar offset applied to a base instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelativeDateValue {
    /// Signed amount; negative values subtract.
    pub amount: i64,
    /// Calendar unit.
    pub unit: DateUnit,
}

impl RelativeDateValue {
    /// Build an offset.
    #[must_use]
    pub const fn new(amount: i64, unit: DateUnit) -> Self {
        Self { amount, unit }
    }

    /// Add the offset to `base`.
    ///
    /// Month arithmetic clamps to the last valid day of the target month
    /// (Jan 31 + 1 month = Feb 28/29). Calendar math that cannot resolve
    /// returns `base` unchanged, keeping the signature total.
    #[must_use]
    pub fn apply(self, base: OffsetDateTime) -> OffsetDateTime {
        match self.unit {
            DateUnit::Days => add_days(base, self.amount).unwrap_or(base),
            DateUnit::Weeks => self
                .amount
                .checked_mul(7)
                .and_then(|days| add_days(base, days))
                .unwrap_or(base),
            DateUnit::Months => add_months(base, self.amount).unwrap_or(base),
        }
    }
}

// Duration::days panics on i64 overflow, so build the span via seconds.
fn add_days(base: OffsetDateTime, days: i64) -> Option<OffsetDateTime> {
    let seconds = days.checked_mul(24 * 60 * 60)?;
    base.checked_add(Duration::seconds(seconds))
}

fn add_months(base: OffsetDateTime, months: i64) -> Option<OffsetDateTime> {
    let date = base.date();
    let zero_based = i64::from(u8::from(date.month())) - 1 + months;
    let year = i32::try_from(i64::from(date.year()) + zero_based.div_euclid(12)).ok()?;
    let month = Month::try_from(u8::try_from(zero_based.rem_euclid(12) + 1).ok()?).ok()?;
    let day = date.day().min(month.length(year));
    let shifted = Date::from_calendar_date(year, month, day).ok()?;
    Some(base.replace_date(shifted))
}

/// Kind of effect a fired rule asks the store to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    /// Set the workflow status to the action value.
    SetStatus,
    /// Set the priority to the action value.
    SetPriority,
    /// Move the task to the named project.
    SetProject,
    /// Set the GTD context to the action value.
    SetContext,
    /// Attach the named tag.
    AddTag,
    /// Detach the named tag.
    RemoveTag,
    /// Flag the task.
    Flag,
    /// Unflag the task.
    Unflag,
    /// Set the due instant, optionally offset by the relative date.
    SetDueDate,
    /// Set the defer instant, optionally offset by the relative date.
    SetDeferDate,
    /// Copy the owning project's context onto the task.
    CopyContextFromProject,
    /// Copy the parent task's project onto the task.
    CopyProjectFromParent,
    /// Move the task to the named board.
    MoveToBoard,
}

impl ActionType {
    /// Whether this action reads its string value. Actions that answer
    /// `false` ignore both `value` and `relative_date`.
    #[must_use]
    pub const fn requires_value(self) -> bool {
        !matches!(
            self,
            Self::Flag | Self::Unflag | Self::CopyContextFromProject | Self::CopyProjectFromParent
        )
    }
}

/// Data-only description of an effect to apply to a task when a rule fires.
///
/// The engine never applies actions itself; the external store interprets
/// them against the task named by the change event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleAction {
    /// Identifier of the action.
    pub id: Uuid,
    /// Effect kind.
    pub kind: ActionType,
    /// String payload for value-bearing actions.
    #[serde(default)]
    pub value: Option<String>,
    /// Calendar offset for `setDueDate`/`setDeferDate`.
    #[serde(default)]
    pub relative_date: Option<RelativeDateValue>,
}

impl RuleAction {
    /// Create an action without payloads.
    #[must_use]
    pub fn new(kind: ActionType) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            value: None,
            relative_date: None,
        }
    }

    /// Attach a string payload.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a relative date offset.
    #[must_use]
    pub const fn with_relative_date(mut self, relative_date: RelativeDateValue) -> Self {
        self.relative_date = Some(relative_date);
        self
    }

    /// Resolve the action's effective instant against a base supplied by
    /// the caller (usually "now" or an existing task date). `None` when the
    /// action carries no relative date.
    #[must_use]
    pub fn effective_date(&self, base: OffsetDateTime) -> Option<OffsetDateTime> {
        self.relative_date.map(|offset| offset.apply(base))
    }
}
