//! Foundation - shared value objects for the domain layer.

mod ids;

pub use ids::SessionId;
