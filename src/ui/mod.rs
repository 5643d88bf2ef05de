pub mod markup;
pub mod output;

pub use output::{display_error, display_history, display_message, display_session};
