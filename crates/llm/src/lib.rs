pub mod advisor;
pub mod provider;
pub mod providers;

pub use advisor::{Advice, ModelReply, RecipeAdvisor, EMPTY_REPLY_FALLBACK, NO_MATCH_FALLBACK};
pub use provider::{LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
