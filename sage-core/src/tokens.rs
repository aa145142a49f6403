//! Client-side token estimation
//!
//! Estimates the token cost of an outgoing conversation before the model
//! call, using the `cl100k_base` BPE vocabulary. The estimate is advisory:
//! the provider reports authoritative counts after the call, and those are
//! what the response side of the advisor logs.

use crate::models::{Message, Role};
use anyhow::{Context, Result};
use tiktoken_rs::CoreBPE;

/// BPE-backed token count estimator.
///
/// Estimation is total: empty text costs 0, and turns whose role is outside
/// {system, user, assistant} contribute 0 regardless of content. A turn that
/// cannot be costed degrades to 0 rather than failing the exchange.
pub struct TokenEstimator {
    bpe: CoreBPE,
}

impl TokenEstimator {
    /// Build an estimator over the `cl100k_base` vocabulary
    pub fn new() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().context("Failed to load cl100k_base vocabulary")?;
        Ok(Self { bpe })
    }

    /// Estimate the token count of a single piece of text
    pub fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len()
    }

    /// Estimate the token cost of one conversation turn.
    ///
    /// Unrecognized roles are a no-op, not an error.
    pub fn estimate_message(&self, message: &Message) -> usize {
        match message.role {
            Role::System | Role::User | Role::Assistant => self.estimate(&message.content),
            Role::Other => 0,
        }
    }

    /// Estimate the total token cost of an ordered message sequence.
    ///
    /// The contract is per-turn summation: each turn is estimated
    /// independently and the estimates are summed. This is not the same as
    /// estimating the concatenated text (BPE merges are not additive across
    /// turn boundaries) and is deliberately not required to be.
    pub fn estimate_messages(&self, messages: &[Message]) -> usize {
        messages.iter().map(|m| self.estimate_message(m)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> TokenEstimator {
        TokenEstimator::new().expect("cl100k_base should load")
    }

    #[test]
    fn test_empty_text_costs_zero() {
        assert_eq!(estimator().estimate(""), 0);
    }

    #[test]
    fn test_nonempty_text_costs_something() {
        assert!(estimator().estimate("Hello, world!") > 0);
    }

    #[test]
    fn test_other_role_costs_zero_regardless_of_content() {
        let est = estimator();
        let msg = Message {
            role: Role::Other,
            content: "this text would normally cost plenty of tokens".to_string(),
        };
        assert_eq!(est.estimate_message(&msg), 0);
    }

    #[test]
    fn test_empty_turn_contributes_zero_to_total() {
        let est = estimator();
        let with_empty = vec![
            Message::system("You are helpful"),
            Message::user(""),
            Message::user("Hello"),
        ];
        let without_empty = vec![Message::system("You are helpful"), Message::user("Hello")];
        assert_eq!(
            est.estimate_messages(&with_empty),
            est.estimate_messages(&without_empty)
        );
    }

    #[test]
    fn test_estimate_is_per_turn_additive() {
        let est = estimator();
        let messages = vec![
            Message::system("You are a helpful AI assistant."),
            Message::user("What is the capital of France?"),
            Message::assistant("Paris."),
        ];
        let summed: usize = messages.iter().map(|m| est.estimate_message(m)).sum();
        assert_eq!(est.estimate_messages(&messages), summed);
    }

    #[test]
    fn test_empty_sequence_costs_zero() {
        assert_eq!(estimator().estimate_messages(&[]), 0);
    }
}
