//! LLM adapter modules.
//!
//! Implementations of the [`Llm`](crate::port::outbound::llm::Llm) port for
//! Anthropic Claude and OpenAI.

pub mod anthropic;
pub mod client;
pub mod openai;

pub use anthropic::Anthropic;
pub use openai::OpenAi;
