//! Vision-language model protocol.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::ModelError;

/// A model that answers a text prompt about one or more screenshots.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Model identifier, for logs.
    fn id(&self) -> &str;

    /// Send `prompt` with the images at `images` attached, in order.
    async fn get_response(&self, prompt: &str, images: &[PathBuf]) -> Result<String, ModelError>;
}
