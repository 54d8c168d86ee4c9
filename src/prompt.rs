use crate::error::PromptError;

/// Asks the human a question and hands back the answer.
///
/// Every interactive step (series disambiguation, per-file match, final
/// confirmation) goes through this trait so the flow can run against a
/// scripted implementation in tests.
pub trait Prompt {
    /// Returns the index of the chosen entry in `labels`. `default` is the
    /// entry highlighted when the question is shown.
    fn select(&mut self, message: &str, labels: &[String], default: usize) -> Result<usize, PromptError>;

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, PromptError>;
}

impl<P: Prompt + ?Sized> Prompt for &mut P {
    fn select(&mut self, message: &str, labels: &[String], default: usize) -> Result<usize, PromptError> {
        (**self).select(message, labels, default)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool, PromptError> {
        (**self).confirm(message, default)
    }
}
