use std::error::Error;

/// Base trait for all Foundry errors
pub trait FoundryError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error was caused by user input rather than the system
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Render items as a newline-separated bulleted list (`- a\n- b`).
pub(crate) fn bullet_list<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullet_list() {
        assert_eq!(bullet_list(&["a", "b"]), "- a\n- b");
        assert_eq!(bullet_list::<&str>(&[]), "");
    }
}
