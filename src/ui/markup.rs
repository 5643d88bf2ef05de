//! Display-time transform for AI responses: `**bold**`, `*italic*` and line
//! breaks. The stored text is never modified; these functions only borrow it.

use colored::*;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    /// Bold run; holds only `Text` and `Emphasis` spans.
    Strong(Vec<Span>),
    Emphasis(String),
    LineBreak,
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"))
}

fn italic_pattern() -> &'static Regex {
    static ITALIC: OnceLock<Regex> = OnceLock::new();
    ITALIC.get_or_init(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"))
}

/// Split a response into styled spans. Markers never span lines.
pub fn parse(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            spans.push(Span::LineBreak);
        }
        let mut last = 0;
        for caps in bold_pattern().captures_iter(line) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_italics(&line[last..whole.start()], &mut spans);
            let mut strong = Vec::new();
            push_italics(inner.as_str(), &mut strong);
            spans.push(Span::Strong(strong));
            last = whole.end();
        }
        push_italics(&line[last..], &mut spans);
    }
    spans
}

fn push_italics(segment: &str, spans: &mut Vec<Span>) {
    let mut last = 0;
    for caps in italic_pattern().captures_iter(segment) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text(&segment[last..whole.start()], spans);
        spans.push(Span::Emphasis(inner.as_str().to_string()));
        last = whole.end();
    }
    push_text(&segment[last..], spans);
}

fn push_text(text: &str, spans: &mut Vec<Span>) {
    if !text.is_empty() {
        spans.push(Span::Text(text.to_string()));
    }
}

/// HTML rendering: `<strong>`, `<em>`, `<br/>`. Everything else is escaped.
pub fn to_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for span in parse(text) {
        write_html(&span, &mut out);
    }
    out
}

fn write_html(span: &Span, out: &mut String) {
    match span {
        Span::Text(t) => out.push_str(&escape_html(t)),
        Span::Strong(children) => {
            out.push_str("<strong>");
            for child in children {
                write_html(child, out);
            }
            out.push_str("</strong>");
        }
        Span::Emphasis(t) => {
            out.push_str("<em>");
            out.push_str(&escape_html(t));
            out.push_str("</em>");
        }
        Span::LineBreak => out.push_str("<br/>"),
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Terminal rendering with bold and italic escapes.
pub fn to_terminal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for span in parse(text) {
        write_terminal(&span, false, &mut out);
    }
    out
}

fn write_terminal(span: &Span, bold: bool, out: &mut String) {
    match span {
        Span::Text(t) if bold => out.push_str(&t.bold().to_string()),
        Span::Text(t) => out.push_str(t),
        Span::Strong(children) => {
            for child in children {
                write_terminal(child, true, out);
            }
        }
        Span::Emphasis(t) if bold => out.push_str(&t.bold().italic().to_string()),
        Span::Emphasis(t) => out.push_str(&t.italic().to_string()),
        Span::LineBreak => out.push('\n'),
    }
}
