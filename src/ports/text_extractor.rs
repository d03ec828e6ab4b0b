//! Text extraction port.

use async_trait::async_trait;

use super::{CollaboratorError, Extraction, ExtractionRequest};

/// Port for extracting structured values from a free-text message.
///
/// Extracted values are untrusted: every pair must pass field validation
/// before the orchestrator merges it, and pairs that fail are quietly
/// dropped to be re-asked structurally on the next step.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Maps a user message onto flat `path -> value` bindings.
    async fn extract(&self, request: ExtractionRequest) -> Result<Extraction, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_extractor_is_object_safe() {
        fn _accepts_dyn(_extractor: &dyn TextExtractor) {}
    }
}
