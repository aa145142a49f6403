pub mod advisor;
pub mod assistant;
pub mod config;
pub mod extract;
pub mod http;
pub mod memory;
pub mod models;
pub mod openrouter;
pub mod tokens;

// Re-export commonly used types
pub use advisor::{Advisor, AdvisorChain, AdvisorError, ChatLoggerAdvisor, TokenUsageAdvisor};
pub use assistant::{Assistant, SYSTEM_PROMPT};
pub use config::Config;
pub use memory::ConversationMemory;
pub use models::{ChatRequest, ChatResponse, Choice, Message, ResponseMessage, Role, Usage};
pub use tokens::TokenEstimator;
