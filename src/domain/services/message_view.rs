#[cfg(test)]
#[path = "message_view_test.rs"]
mod tests;

use std::mem;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use super::markup::tokenize;
use super::markup::Segment;
use crate::domain::models::Message;
use crate::domain::models::Role;

const INDENT: &str = "   ";

fn role_color(role: Role) -> Color {
    match role {
        Role::User => return Color::Cyan,
        Role::Assistant => return Color::Green,
        Role::System => return Color::Red,
        Role::Unknown => return Color::Gray,
    }
}

fn code_style() -> Style {
    return Style::default().fg(Color::Yellow);
}

fn link_style() -> Style {
    return Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED);
}

/// Flattens an inline segment into spans, layering the styles of the
/// segments that enclose it.
fn push_inline(spans: &mut Vec<Span<'static>>, segment: Segment, style: Style) {
    match segment {
        Segment::Text(text) => {
            spans.push(Span::styled(text, style));
        }
        Segment::InlineCode(code) => {
            spans.push(Span::styled(code, style.patch(code_style())));
        }
        Segment::Bold(children) => {
            for child in children {
                push_inline(spans, child, style.add_modifier(Modifier::BOLD));
            }
        }
        Segment::Italic(children) => {
            for child in children {
                push_inline(spans, child, style.add_modifier(Modifier::ITALIC));
            }
        }
        Segment::Link { children, url } => {
            for child in children {
                push_inline(spans, child, style.patch(link_style()));
            }
            spans.push(Span::styled(
                format!(" ({url})"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        // Block level, tokenize never nests these.
        Segment::LineBreak | Segment::CodeBlock { .. } => (),
    }
}

fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut lines = vec![];
    let mut current: Vec<Span<'static>> = vec![];
    let mut current_width = 0;

    for span in spans {
        let style = span.style;
        for piece in span.content.split_inclusive(' ') {
            let mut word = piece.to_string();
            loop {
                let word_width = word.chars().count();
                if current_width + word_width <= width {
                    current_width += word_width;
                    current.push(Span::styled(word, style));
                    break;
                }

                if current_width > 0 {
                    lines.push(mem::take(&mut current));
                    current_width = 0;
                    continue;
                }

                // Longer than a whole line, hard split it.
                let head: String = word.chars().take(width).collect();
                word = word.chars().skip(width).collect();
                current.push(Span::styled(head, style));
                lines.push(mem::take(&mut current));
                if word.is_empty() {
                    break;
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    return lines;
}

/// Terminal rendering of a single message: a header with avatar, label and
/// time, then the formatted body indented beneath it.
pub struct MessageView<'a> {
    message: &'a Message,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message) -> MessageView<'a> {
        return MessageView { message };
    }

    pub fn header(&self) -> Line<'static> {
        let role = self.message.role;
        let mut spans = vec![
            Span::raw(format!("{} ", role.avatar())),
            Span::styled(
                role.label(),
                Style::default()
                    .fg(role_color(role))
                    .add_modifier(Modifier::BOLD),
            ),
        ];

        let time = self.message.formatted_time();
        if !time.is_empty() {
            spans.push(Span::styled(
                format!("  {time}"),
                Style::default().fg(Color::DarkGray),
            ));
        }

        return Line::from(spans);
    }

    fn text_style(&self) -> Style {
        if self.message.role == Role::System {
            return Style::default().fg(Color::Red);
        }

        return Style::default();
    }

    fn push_wrapped(lines: &mut Vec<Line<'static>>, spans: Vec<Span<'static>>, width: usize) {
        for wrapped in wrap_spans(spans, width) {
            let mut line = vec![Span::raw(INDENT)];
            line.extend(wrapped);
            lines.push(Line::from(line));
        }
    }

    fn push_code_block(lines: &mut Vec<Line<'static>>, language: &str, body: &str, width: usize) {
        let border = Style::default().fg(Color::DarkGray);
        lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(format!("╭─ {language}"), border),
        ]));

        for code_line in body.trim_end_matches('\n').split('\n') {
            let spans = vec![Span::styled(code_line.to_string(), code_style())];
            for wrapped in wrap_spans(spans, width.saturating_sub(2)) {
                let mut line = vec![Span::raw(INDENT), Span::styled("│ ", border)];
                line.extend(wrapped);
                lines.push(Line::from(line));
            }
        }

        lines.push(Line::from(vec![Span::raw(INDENT), Span::styled("╰─", border)]));
    }

    pub fn as_lines(&self, width: usize) -> Vec<Line<'static>> {
        let body_width = width.saturating_sub(INDENT.len());
        let text_style = self.text_style();
        let mut lines = vec![self.header()];
        let mut current: Vec<Span<'static>> = vec![];

        for segment in tokenize(&self.message.content) {
            match segment {
                Segment::LineBreak => {
                    MessageView::push_wrapped(&mut lines, mem::take(&mut current), body_width);
                }
                Segment::CodeBlock { language, body } => {
                    if !current.is_empty() {
                        MessageView::push_wrapped(&mut lines, mem::take(&mut current), body_width);
                    }
                    MessageView::push_code_block(&mut lines, &language, &body, body_width);
                }
                inline => {
                    push_inline(&mut current, inline, text_style);
                }
            }
        }

        if !current.is_empty() {
            MessageView::push_wrapped(&mut lines, current, body_width);
        }

        lines.push(Line::from(""));

        return lines;
    }
}
