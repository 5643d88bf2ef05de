mod client;
mod input;

pub use client::{
    ChatClient, ChatView, ClearConfirmation, ANALYZE_FAILED, CLEAR_FAILED, CLEAR_PROMPT,
    LOAD_HISTORY_FAILED,
};
pub use input::{
    split_terminal_line, terminal_command, GestureOutcome, SubmitGesture, TerminalCommand,
};
