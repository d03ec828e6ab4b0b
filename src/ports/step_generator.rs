//! Interview step generation port.

use async_trait::async_trait;

use super::{CollaboratorError, StepRequest};
use crate::domain::interview::UiBlock;

/// Port for generating the next set of interview UI blocks.
///
/// Implementations are typically language-model backed. The result is
/// advisory content only: the engine records and forwards it but never
/// trusts it for correctness: submitted values are validated against the
/// schema regardless of what was asked.
#[async_trait]
pub trait InterviewStepGenerator: Send + Sync {
    /// Produces the blocks for the next conversational step.
    async fn generate(&self, request: StepRequest) -> Result<Vec<UiBlock>, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_generator_is_object_safe() {
        fn _accepts_dyn(_generator: &dyn InterviewStepGenerator) {}
    }
}
