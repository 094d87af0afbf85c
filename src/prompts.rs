//! Prompt templates for the two-step summarization protocol.
//!
//! Centralising both prompts here serves two purposes:
//!
//! 1. **Single source of truth** — tweaking the instructions requires
//!    editing exactly one place.
//! 2. **Testability** — unit tests can inspect the assembled prompts
//!    without a live model.
//!
//! Every page goes through two sequential generation calls: the first asks
//! the model to elaborate on and explain the raw page text; the second asks
//! it to clean that explanation up into readable prose, passing the first
//! response as context. The second response is the page's summary.

/// Build the first-step prompt: elaborate on and explain the page text.
pub fn elaborate_prompt(text: &str) -> String {
    format!("Please elaborate and explain this text clearly: {text}")
}

/// Build the second-step prompt: clean the explanation into readable form.
///
/// `explanation` is the (trimmed) response to the first-step prompt.
pub fn cleanup_prompt(explanation: &str) -> String {
    format!("Now, clean the explanation and present it in a readable format. Text: {explanation}")
}
