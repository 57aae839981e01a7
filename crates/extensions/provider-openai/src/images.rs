//! Screenshot encoding for multimodal messages.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use autoprobe_protocols::ModelError;

use crate::api::{ApiMessage, ContentPart, ImageUrl, MessageContent};

fn mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
}

/// Read an image and encode it as a `data:` URL.
pub async fn data_url(path: &Path) -> Result<String, ModelError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ModelError::ImageUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type(path),
        STANDARD.encode(bytes)
    ))
}

/// One user message: the prompt followed by every image, in order.
pub async fn user_message<P: AsRef<Path>>(
    prompt: &str,
    images: &[P],
) -> Result<ApiMessage, ModelError> {
    let mut parts = vec![ContentPart::Text {
        text: prompt.to_string(),
    }];
    for image in images {
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: data_url(image.as_ref()).await?,
                detail: Some("high".to_string()),
            },
        });
    }
    Ok(ApiMessage {
        role: "user".to_string(),
        content: MessageContent::Parts(parts),
    })
}
