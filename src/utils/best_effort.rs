use std::fmt::Display;

/// Marks a fallible call whose failure must not fail the request.
///
/// The error is logged with the operation name and dropped; the caller gets
/// `Some(value)` on success and may ignore the outcome entirely.
pub trait BestEffort<T> {
    fn best_effort(self, operation: &str) -> Option<T>;
}

impl<T, E: Display> BestEffort<T> for Result<T, E> {
    fn best_effort(self, operation: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(operation, error = %e, "best-effort operation failed");
                None
            }
        }
    }
}
