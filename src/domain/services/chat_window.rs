#[cfg(test)]
#[path = "chat_window_test.rs"]
mod tests;

use anyhow::Result;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Margin;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Frame;
use tokio::sync::mpsc;
use tui_textarea::Input;
use tui_textarea::Key;
use tui_textarea::TextArea;

use super::MessageView;
use super::Scroll;
use super::SessionState;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::InputArea;
use crate::domain::models::Loading;

pub const WELCOME_TEXT: &str = "Welcome! Ask any legal question to get started.";

fn welcome_lines() -> Vec<Line<'static>> {
    return vec![
        Line::from(""),
        Line::from(Span::styled(
            WELCOME_TEXT,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];
}

/// The interactive chat surface. Only the transient input text and view
/// state live here, the message log belongs to the `SessionState` passed in.
pub struct ChatWindow<'a> {
    pub textarea: TextArea<'a>,
    pub scroll: Scroll,
    loading: Loading,
    lines: Vec<Line<'static>>,
    rendered_revision: Option<u64>,
    rendered_loading: bool,
    last_known_width: u16,
    last_known_height: u16,
}

impl Default for ChatWindow<'_> {
    fn default() -> Self {
        return ChatWindow {
            textarea: InputArea::default(),
            scroll: Scroll::default(),
            loading: Loading::default(),
            lines: vec![],
            rendered_revision: None,
            rendered_loading: false,
            last_known_width: 0,
            last_known_height: 0,
        };
    }
}

impl<'a> ChatWindow<'a> {
    pub fn input_text(&self) -> String {
        return InputArea::text(&self.textarea);
    }

    /// Sends the trimmed input. Blank input and submits during an in-flight
    /// request do nothing. The input clears without waiting for the reply.
    pub fn submit(
        &mut self,
        state: &mut SessionState,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        let text = self.input_text();
        let content = text.trim();
        if content.is_empty() || state.is_loading() {
            return Ok(());
        }

        let request = state.begin_send(content)?;
        self.textarea = InputArea::default();
        tx.send(Action::SendMessage(request))?;

        return Ok(());
    }

    pub fn handle_input(
        &mut self,
        input: Input,
        state: &mut SessionState,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        match input {
            Input {
                key: Key::Enter,
                shift: false,
                ..
            } => {
                self.submit(state, tx)?;
            }
            Input {
                key: Key::Enter,
                shift: true,
                ..
            } => {
                self.textarea.insert_newline();
            }
            input => {
                self.textarea.input(input);
            }
        }

        return Ok(());
    }

    pub fn reload(
        &mut self,
        state: &mut SessionState,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        if state.is_loading() {
            return Ok(());
        }

        let session_id = state.session_id().to_string();
        state.begin_load(&session_id);
        tx.send(Action::LoadHistory(session_id))?;

        return Ok(());
    }

    /// Applies one event. Returns true when the application should exit.
    pub async fn handle_event(
        &mut self,
        event: Event,
        state: &mut SessionState,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        match event {
            Event::ChatResponse(outcome) => {
                state.complete_send(outcome);
            }
            Event::HistoryResponse(outcome) => {
                state.complete_load(outcome);
            }
            Event::HealthCheckFailed(err) => {
                state.set_error(&format!(
                    "The legal assistant API isn't reachable, replies may fail. Error: {err}"
                ));
            }
            Event::KeyboardCTRLC() => {
                return Ok(true);
            }
            Event::KeyboardCTRLN() => {
                state.create_new_session().await;
            }
            Event::KeyboardCTRLR() => {
                self.reload(state, tx)?;
            }
            Event::KeyboardEsc() => {
                state.dismiss_error();
            }
            Event::KeyboardInput(input) => {
                self.handle_input(input, state, tx)?;
            }
            Event::KeyboardPaste(text) => {
                self.textarea.insert_str(text.replace('\r', ""));
            }
            Event::UIScrollDown() => {
                self.scroll.down();
            }
            Event::UIScrollUp() => {
                self.scroll.up();
            }
            Event::UIScrollPageDown() => {
                self.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                self.scroll.up_page();
            }
            Event::UITick() => {
                self.loading.tick();
            }
            Event::UIResize() => (),
        }

        return Ok(false);
    }

    fn list_length(&self) -> usize {
        if self.rendered_loading {
            return self.lines.len() + self.loading.lines().len();
        }

        return self.lines.len();
    }

    /// Rebuilds the rendered lines when the log, loading flag or width
    /// changed, and follows the newest line whenever the log changed.
    pub fn sync(&mut self, state: &SessionState, width: u16, height: u16) {
        let revision_changed = self.rendered_revision != Some(state.revision());
        let loading_changed = self.rendered_loading != state.is_loading();

        if revision_changed || width != self.last_known_width {
            if state.messages().is_empty() {
                self.lines = welcome_lines();
            } else {
                self.lines = state
                    .messages()
                    .iter()
                    .flat_map(|message| {
                        return MessageView::new(message).as_lines(width as usize);
                    })
                    .collect();
            }
        }

        self.rendered_revision = Some(state.revision());
        self.rendered_loading = state.is_loading();
        self.last_known_width = width;
        self.last_known_height = height;

        self.scroll.set_state(self.list_length(), height as usize);
        if revision_changed || loading_changed {
            self.scroll.last();
        }
    }

    fn visible_lines(&self) -> Vec<Line<'static>> {
        let mut loading_lines = vec![];
        if self.rendered_loading {
            loading_lines = self.loading.lines();
        }

        return self
            .lines
            .iter()
            .chain(loading_lines.iter())
            .skip(self.scroll.position)
            .take(self.last_known_height as usize)
            .cloned()
            .collect();
    }

    fn render_header(&self, frame: &mut Frame, rect: Rect, state: &SessionState) {
        let short_id = state.session_id().split('-').next().unwrap_or_default();
        let mut spans = vec![
            Span::styled(" Counsel ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("session {short_id}"),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if let Some(err) = state.error() {
            spans.push(Span::styled(
                format!("  ⚠ {err} (Esc to dismiss)"),
                Style::default().fg(Color::Red),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), rect);
    }

    pub fn render(&mut self, frame: &mut Frame, state: &SessionState) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(InputArea::height(&self.textarea)),
            ])
            .split(frame.size());

        self.render_header(frame, layout[0], state);

        // Leave a column for the scrollbar.
        self.sync(state, layout[1].width.saturating_sub(1), layout[1].height);
        frame.render_widget(Paragraph::new(self.visible_lines()), layout[1]);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            layout[1].inner(&Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut self.scroll.scrollbar_state,
        );

        self.textarea
            .set_block(InputArea::block(state.is_loading()));
        frame.render_widget(self.textarea.widget(), layout[2]);
    }
}
