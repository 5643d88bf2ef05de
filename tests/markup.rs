use clinic_assist::chat::{split_terminal_line, terminal_command, SubmitGesture, TerminalCommand};
use colored::*;
use clinic_assist::models::ChatMessage;
use clinic_assist::ui::markup::{parse, to_html, to_terminal, Span};

#[test]
fn test_parse_bold_italic_and_line_break() {
    let spans = parse("**A** *B*\nC");

    assert_eq!(
        spans,
        vec![
            Span::Strong(vec![Span::Text("A".to_string())]),
            Span::Text(" ".to_string()),
            Span::Emphasis("B".to_string()),
            Span::LineBreak,
            Span::Text("C".to_string()),
        ]
    );
}

#[test]
fn test_html_rendering() {
    assert_eq!(
        to_html("**A** *B*\nC"),
        "<strong>A</strong> <em>B</em><br/>C"
    );
}

#[test]
fn test_html_escapes_markup_in_response() {
    assert_eq!(
        to_html("<script>alert(1)</script> & **ok**"),
        "&lt;script&gt;alert(1)&lt;/script&gt; &amp; <strong>ok</strong>"
    );
}

#[test]
fn test_italic_inside_bold_nests_in_every_renderer() {
    let text = "**a *b* c**";

    assert_eq!(
        parse(text),
        vec![Span::Strong(vec![
            Span::Text("a ".to_string()),
            Span::Emphasis("b".to_string()),
            Span::Text(" c".to_string()),
        ])]
    );
    assert_eq!(to_html(text), "<strong>a <em>b</em> c</strong>");

    let terminal = to_terminal(text);
    let expected = format!("{}{}{}", "a ".bold(), "b".bold().italic(), " c".bold());
    assert_eq!(terminal, expected);
    assert!(!terminal.contains('*'));
}

#[test]
fn test_unclosed_italic_inside_bold_stays_literal() {
    assert_eq!(to_html("*x* **y *z***"), "<em>x</em> <strong>y *z</strong>*");
}

#[test]
fn test_markers_do_not_span_lines() {
    let spans = parse("*open\nclose*");

    assert_eq!(
        spans,
        vec![
            Span::Text("*open".to_string()),
            Span::LineBreak,
            Span::Text("close*".to_string()),
        ]
    );
}

#[test]
fn test_unmatched_marker_stays_literal() {
    assert_eq!(parse("2 * 3"), vec![Span::Text("2 * 3".to_string())]);
    assert_eq!(to_html("2 * 3"), "2 * 3");
}

#[test]
fn test_rendering_leaves_stored_message_unchanged() {
    let message: ChatMessage = serde_json::from_str(
        r#"{"id": 1, "userMessage": "fever", "aiResponse": "**A** *B*\nC", "createdAt": "2024-05-01T10:00:00Z"}"#,
    )
    .unwrap();

    let _ = to_html(&message.ai_response);
    let terminal = to_terminal(&message.ai_response);

    assert_eq!(message.ai_response, "**A** *B*\nC");
    assert!(terminal.contains('A'));
    assert!(terminal.contains('\n'));
    assert!(!terminal.contains("**"));
}

#[test]
fn test_terminal_line_gestures() {
    assert_eq!(
        split_terminal_line("fever\\"),
        ("fever", SubmitGesture::ShiftSubmit)
    );
    assert_eq!(split_terminal_line("fever\r\n"), ("fever", SubmitGesture::Submit));
    assert_eq!(split_terminal_line(""), ("", SubmitGesture::Submit));
}

#[test]
fn test_terminal_commands() {
    assert_eq!(terminal_command("/quit"), Some(TerminalCommand::Quit));
    assert_eq!(terminal_command(" /exit \r"), Some(TerminalCommand::Quit));
    assert_eq!(terminal_command("/clear"), Some(TerminalCommand::Clear));
    assert_eq!(terminal_command("quit"), None);
    assert_eq!(terminal_command("fever"), None);
}
