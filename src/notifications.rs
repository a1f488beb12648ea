use crate::errors::ConsoleError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Dismissible banner shown after a user action completes or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Builds an error banner, preferring the backend's own message over `fallback`.
    pub fn from_error(err: &ConsoleError, fallback: &str) -> Self {
        match err {
            ConsoleError::Validation(fields) => Self::error(
                fields
                    .iter()
                    .next()
                    .map(|(_, message)| message.to_string())
                    .unwrap_or_else(|| fallback.to_string()),
            ),
            ConsoleError::Busy => Self::error(err.to_string()),
            ConsoleError::NotAuthenticated => Self::error("Please log in to continue"),
            _ => Self::error(err.server_message().unwrap_or(fallback)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Success => write!(f, "[ok] {}", self.message),
            NotificationLevel::Error => write!(f, "[error] {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FieldErrors;

    #[test]
    fn backend_message_wins_over_fallback() {
        let err = ConsoleError::from_status(400, Some("Duplicate mill name".into()));
        let note = Notification::from_error(&err, "Failed to save mill. Please try again.");
        assert!(note.is_error());
        assert_eq!(note.message, "Duplicate mill name");
    }

    #[test]
    fn fallback_used_without_server_message() {
        let err = ConsoleError::from_status(500, None);
        let note = Notification::from_error(&err, "Failed to fetch mills");
        assert_eq!(note.to_string(), "[error] Failed to fetch mills");
    }

    #[test]
    fn validation_shows_first_field_message() {
        let err = ConsoleError::Validation(FieldErrors::single(
            "quantity",
            "Quantity must be between 1 and 2000",
        ));
        let note = Notification::from_error(&err, "unused");
        assert_eq!(note.message, "Quantity must be between 1 and 2000");
    }
}
