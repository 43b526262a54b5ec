//! Declarative task query engine for GTD-style task collections.
//!
//! Everything in this crate is a pure function over an immutable task
//! snapshot and an explicit reference instant. The crate never reads the
//! system clock and never mutates a task; it returns decisions (booleans,
//! orderings, groupings) that the surrounding application applies.

/// Named relative date windows.
pub mod date_range;
/// Token parse errors and normalization.
pub mod error;
/// Flat conjunction filters.
pub mod filter;
/// Filter + sort + group display policies.
pub mod perspective;
/// Single-rule predicate evaluation.
pub mod predicate;
/// Task snapshot model.
pub mod task;
/// Freeform text matching.
pub mod text;
/// Typed filter values, operators, and properties.
pub mod value;

pub use date_range::DateRangeToken;
pub use error::ParseTokenError;
pub use filter::{Filter, FilterBuilder};
pub use perspective::{
    FilterLogic, GroupBy, Perspective, SmartPerspective, SortBy, SortDirection,
};
pub use predicate::FilterRule;
pub use task::{Priority, Task, TaskId, TaskStatus};
pub use text::TextQuery;
pub use value::{FilterOperator, FilterProperty, FilterValue, PropertyKind};
