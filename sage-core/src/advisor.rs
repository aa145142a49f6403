//! Advisor chain around the outbound model call
//!
//! An advisor observes one exchange: its `before` hook runs on the outgoing
//! request, its `after` hook on the incoming response. Advisors are
//! side-effect-only with respect to logging; they pass the request and
//! response through unchanged. The chain owns execution order: ascending
//! advisor order for the `before` phase, mirrored for the `after` phase.

use crate::extract::json_path_u64;
use crate::models::{ChatRequest, ChatResponse};
use crate::tokens::TokenEstimator;
use anyhow::Result;
use serde::Serialize;
use std::future::Future;
use thiserror::Error;
use tracing::debug;

/// Errors an advisor can raise. Any advisor error aborts the exchange.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// The response could not be lowered to a JSON tree for usage
    /// extraction. Fatal for the exchange, never swallowed.
    #[error("failed to serialize response for usage extraction: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One stage in the interception chain around the model call.
///
/// Both hooks default to pass-through. Implementations must return the
/// value they received; the hooks exist for observation, not rewriting.
pub trait Advisor: Send + Sync {
    /// Position in the chain; lower runs first in the `before` phase
    fn order(&self) -> i32;

    /// Observe the outgoing request
    fn before(&self, request: ChatRequest) -> Result<ChatRequest, AdvisorError> {
        Ok(request)
    }

    /// Observe the incoming response
    fn after(&self, response: ChatResponse) -> Result<ChatResponse, AdvisorError> {
        Ok(response)
    }
}

/// Ordered registry of advisors wrapping a single outbound call.
///
/// Sorting happens here, once per registration; advisors only declare their
/// order. Each exchange is stateless and independent, so one chain can serve
/// any number of concurrent exchanges.
#[derive(Default)]
pub struct AdvisorChain {
    // Kept sorted by ascending order; registration order breaks ties.
    advisors: Vec<Box<dyn Advisor>>,
}

impl AdvisorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an advisor, keeping the chain sorted by ascending order
    pub fn with(mut self, advisor: impl Advisor + 'static) -> Self {
        self.advisors.push(Box::new(advisor));
        self.advisors.sort_by_key(|a| a.order());
        self
    }

    /// Run the full chain around one outbound call: every `before` in
    /// ascending order, the call itself, then every `after` in mirrored
    /// (descending) order.
    pub async fn around<F, Fut>(&self, mut request: ChatRequest, call: F) -> Result<ChatResponse>
    where
        F: FnOnce(ChatRequest) -> Fut,
        Fut: Future<Output = Result<ChatResponse>>,
    {
        for advisor in &self.advisors {
            request = advisor.before(request)?;
        }

        let mut response = call(request).await?;

        for advisor in self.advisors.iter().rev() {
            response = advisor.after(response)?;
        }

        Ok(response)
    }
}

/// Logs token accounting for each exchange: a client-side BPE estimate of
/// the outgoing conversation before the call, and the provider-reported
/// usage counters after it.
pub struct TokenUsageAdvisor {
    order: i32,
    estimator: TokenEstimator,
}

impl TokenUsageAdvisor {
    /// Create the advisor with order 0
    pub fn new() -> Result<Self> {
        Ok(Self {
            order: 0,
            estimator: TokenEstimator::new()?,
        })
    }

    /// Set the advisor's position in the chain
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    fn request_line(&self, request: &ChatRequest) -> String {
        let token_count = self.estimator.estimate_messages(&request.messages);
        format!(
            "Request: {} messages ~ {} tokens.",
            request.messages.len(),
            token_count
        )
    }

    /// Lower the response to a JSON tree and read the usage counters by
    /// path. Serialization failure is fatal; a missing usage path is not —
    /// it degrades to a sentinel line.
    fn response_line<T: Serialize>(response: &T) -> Result<String, AdvisorError> {
        let tree = serde_json::to_value(response)?;

        let prompt_tokens = json_path_u64(&tree, "usage.prompt_tokens");
        let completion_tokens = json_path_u64(&tree, "usage.completion_tokens");
        let total_tokens = json_path_u64(&tree, "usage.total_tokens");

        Ok(match (prompt_tokens, completion_tokens, total_tokens) {
            (Some(p), Some(c), Some(t)) => format!(
                "Response: promptTokens = {}, completionTokens = {}, totalTokens = {}.",
                p, c, t
            ),
            _ => "Response: usage metadata unavailable.".to_string(),
        })
    }
}

impl Advisor for TokenUsageAdvisor {
    fn order(&self) -> i32 {
        self.order
    }

    fn before(&self, request: ChatRequest) -> Result<ChatRequest, AdvisorError> {
        debug!("{}", self.request_line(&request));
        Ok(request)
    }

    fn after(&self, response: ChatResponse) -> Result<ChatResponse, AdvisorError> {
        debug!("{}", Self::response_line(&response)?);
        Ok(response)
    }
}

/// Dumps the full request and response bodies as JSON at debug level
pub struct ChatLoggerAdvisor {
    order: i32,
}

impl ChatLoggerAdvisor {
    pub fn new() -> Self {
        Self { order: 0 }
    }

    /// Set the advisor's position in the chain
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Default for ChatLoggerAdvisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor for ChatLoggerAdvisor {
    fn order(&self) -> i32 {
        self.order
    }

    fn before(&self, request: ChatRequest) -> Result<ChatRequest, AdvisorError> {
        debug!("request: {}", serde_json::to_string(&request)?);
        Ok(request)
    }

    fn after(&self, response: ChatResponse) -> Result<ChatResponse, AdvisorError> {
        debug!("response: {}", serde_json::to_string(&response)?);
        Ok(response)
    }
}
