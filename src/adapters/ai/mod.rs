//! Language-model collaborator adapters.

mod anthropic;
mod mock;

pub use anthropic::{AnthropicCollaborator, AnthropicConfig};
pub use mock::{MockStepGenerator, MockTextExtractor};
