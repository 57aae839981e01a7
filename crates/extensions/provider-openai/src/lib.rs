//! OpenAI-compatible vision model client for AutoProbe.
//!
//! Serves OpenAI, Azure OpenAI and Qwen (DashScope compatible mode)
//! through the chat completions API.

mod api;
mod images;
mod provider;

pub use provider::{OpenAIVisionModel, ProviderKind, VisionModelConfig};
