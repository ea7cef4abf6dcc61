//! Confirmation gate port.

/// Asks the operator to approve an action.
pub trait Confirm: Send + Sync {
    /// Presents `question` and returns `true` only on an explicit yes.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read.
    fn confirm(&self, question: &str) -> Result<bool, Box<dyn std::error::Error + Send + Sync>>;
}
