//! Session - the mutable state of one running interview.

mod session;
mod turn;

pub use session::Session;
pub use turn::{ConversationTurn, TurnRole};
