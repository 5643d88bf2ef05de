/// The line-submit key, with or without the modifier held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitGesture {
    /// Enter
    Submit,
    /// Shift+Enter
    ShiftSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Submitted,
    NewlineInserted,
    /// Submit while blank or while a request is in flight.
    Ignored,
}

/// Terminal stand-in for shift+enter: a line ending in a backslash continues.
pub fn split_terminal_line(line: &str) -> (&str, SubmitGesture) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.strip_suffix('\\') {
        Some(rest) => (rest, SubmitGesture::ShiftSubmit),
        None => (line, SubmitGesture::Submit),
    }
}

/// Commands recognised on any interactive line, even mid-message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalCommand {
    Quit,
    Clear,
}

pub fn terminal_command(line: &str) -> Option<TerminalCommand> {
    match line.trim() {
        "/quit" | "/exit" => Some(TerminalCommand::Quit),
        "/clear" => Some(TerminalCommand::Clear),
        _ => None,
    }
}
