pub mod openai;
pub mod provider;
pub mod types;

pub use openai::OpenAiProvider;
pub use provider::{embed_text, Completion, Embedder};
pub use types::{ChatMessage, ChatRequest};
