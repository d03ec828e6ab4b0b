//! Interview content model - the UI blocks a turn presents to the user.

mod ui_blocks;

pub use ui_blocks::{FormElement, InputType, UiBlock};
