use thiserror::Error;

/// Error returned when a user-facing token cannot be mapped to a model enum.
#[derive(Debug, Clone, Error)]
#[error("unknown {kind} token: {token}")]
pub struct ParseTokenError {
    /// The enum family the token was parsed against (e.g. `"status"`).
    pub kind: &'static str,
    /// The rejected input, as supplied by the caller.
    pub token: String,
}

impl ParseTokenError {
    /// Build a parse error for the given enum family and raw input.
    #[must_use]
    pub fn new(kind: &'static str, token: &str) -> Self {
        Self {
            kind,
            token: token.to_owned(),
        }
    }
}

/// Normalize a user-facing token: trim, lowercase, and unify `-`/space
/// separators to `_`. All `FromStr` implementations in this workspace parse
/// the normalized form.
#[must_use]
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_unifies_separators() {
        assert_eq!(normalize_token(" Next-Action "), "next_action");
        assert_eq!(normalize_token("THIS WEEK"), "this_week");
        assert_eq!(normalize_token("done"), "done");
    }

    #[test]
    fn parse_error_reports_kind_and_token() {
        let err = ParseTokenError::new("priority", "urgentish");
        assert_eq!(err.to_string(), "unknown priority token: urgentish");
    }
}
