use crate::task::Task;

/// Case-insensitive substring matcher over a task's textual fields.
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_ascii_lowercase(),
        })
    }

    /// Determine whether any textual field on the task contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title)
            || self.matches_field(&task.notes)
            || task
                .project
                .as_deref()
                .is_some_and(|project| self.matches_field(project))
            || task
                .context
                .as_deref()
                .is_some_and(|context| self.matches_field(context))
            || task.tags.iter().any(|tag| self.matches_field(tag))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_ascii_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Task {
        let mut task = Task::new("Plan Kitchen Remodel", datetime!(2026-03-11 12:00 UTC));
        task.notes = "Get three quotes first".into();
        task.project = Some("Home Renovation".into());
        task.context = Some("@phone".into());
        task.tags.insert("budget".into());
        task
    }

    #[test]
    fn query_skips_blank_inputs() {
        assert!(TextQuery::new("").is_none());
        assert!(TextQuery::new("   ").is_none());
        assert!(TextQuery::new("\n").is_none());
    }

    #[test]
    fn query_finds_text_across_fields() {
        let task = sample();
        for needle in ["kitchen", "QUOTES", "renovation", "@Phone", "budget"] {
            let query = TextQuery::new(needle)
                .unwrap_or_else(|| panic!("query must exist for inputs with content"));
            assert!(query.matches(&task), "needle {needle:?} must match");
        }

        let missing = TextQuery::new("bathroom")
            .unwrap_or_else(|| panic!("query must exist for inputs with content"));
        assert!(!missing.matches(&task));
    }
}
