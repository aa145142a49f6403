//! Assistant pipeline for one question/answer exchange
//!
//! Assembles the conversation (system prompt, prior turns, new question),
//! runs the advisor chain around the outbound model call, and records the
//! completed exchange in memory.

use crate::advisor::{AdvisorChain, ChatLoggerAdvisor, TokenUsageAdvisor};
use crate::config::Config;
use crate::memory::ConversationMemory;
use crate::models::{ChatRequest, Message};
use crate::openrouter;
use anyhow::{Context, Result};
use tracing::info;

/// Maximum allowed question length to prevent abuse
const MAX_QUESTION_LENGTH: usize = 1000;

/// Default system prompt prepended to every conversation
pub const SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant, provide short, focused answers.";

/// A configured assistant: chain, memory, and provider credentials.
/// One instance serves any number of concurrent exchanges.
pub struct Assistant {
    config: Config,
    chain: AdvisorChain,
    memory: ConversationMemory,
}

impl Assistant {
    /// Build the assistant with the default advisor chain: token usage
    /// accounting closest to the call, request/response logging outermost
    pub fn new(config: Config) -> Result<Self> {
        let chain = AdvisorChain::new()
            .with(TokenUsageAdvisor::new()?.order(1))
            .with(ChatLoggerAdvisor::new().order(2));
        let memory = ConversationMemory::new(config.memory_window);

        Ok(Self {
            config,
            chain,
            memory,
        })
    }

    /// Answer one question within a conversation.
    ///
    /// The exchange is stateless apart from memory: history is read before
    /// the call and the two new turns are recorded only on success.
    pub async fn ask(&self, conversation_id: &str, question: &str) -> Result<String> {
        use std::time::Instant;

        let question = question.trim();
        if question.is_empty() {
            anyhow::bail!("Question cannot be empty");
        }
        if question.len() > MAX_QUESTION_LENGTH {
            anyhow::bail!(
                "Question too long: {} characters (max {})",
                question.len(),
                MAX_QUESTION_LENGTH
            );
        }

        let mut messages = vec![Message::system(SYSTEM_PROMPT)];
        messages.extend(self.memory.history(conversation_id));
        messages.push(Message::user(question));

        let request = ChatRequest::new(self.config.model.as_str(), messages);
        let api_key = self.config.openrouter_api_key.clone();

        let start = Instant::now();
        let response = self
            .chain
            .around(request, move |req| async move {
                openrouter::chat_completion(&req, &api_key).await
            })
            .await?;
        let duration_ms = start.elapsed().as_millis();

        let answer = response
            .content()
            .context("No response content from API (empty choices)")?
            .to_string();

        info!(
            model = %self.config.model,
            conversation = %conversation_id,
            duration_ms = %duration_ms,
            "Exchange completed"
        );

        self.memory.record(
            conversation_id,
            Message::user(question),
            Message::assistant(answer.as_str()),
        );

        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            openrouter_api_key: "test-key".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            addr: "127.0.0.1:3000".to_string(),
            memory_window: 20,
        }
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let assistant = Assistant::new(test_config()).unwrap();
        let result = assistant.ask("c1", "   ").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_overlong_question_is_rejected() {
        let assistant = Assistant::new(test_config()).unwrap();
        let question = "x".repeat(MAX_QUESTION_LENGTH + 1);
        let result = assistant.ask("c1", &question).await;
        assert!(result.is_err());
    }
}
