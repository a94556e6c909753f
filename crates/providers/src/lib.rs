pub mod traits;
pub mod openai_compatible;

pub use traits::{
    ChatMessage, ChatRole, CompletionProvider, CompletionRequest, ProviderError,
};
pub use openai_compatible::OpenAICompatibleProvider;
