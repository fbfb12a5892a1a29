use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use super::Role;

const FRAMES: [&str; 4] = ["   ", ".  ", ".. ", "..."];

/// In-flow indicator drawn after the last message while a request is in
/// flight.
#[derive(Default)]
pub struct Loading {
    frame: usize,
}

impl Loading {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);

        return vec![
            Line::from(vec![
                Span::raw(format!("{} ", Role::Assistant.avatar())),
                Span::styled(format!("Thinking{}", FRAMES[self.frame]), style),
            ]),
            Line::from(""),
        ];
    }
}
