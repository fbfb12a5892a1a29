use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use tui_textarea::TextArea;

const MIN_HEIGHT: u16 = 3;
const MAX_HEIGHT: u16 = 10;

pub struct InputArea {}

impl<'a> InputArea {
    pub fn default() -> TextArea<'a> {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_block(InputArea::block(false));

        return textarea;
    }

    pub fn block(disabled: bool) -> Block<'a> {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .padding(Padding::new(1, 1, 0, 0));

        if disabled {
            block = block
                .title("Waiting for a reply...")
                .border_style(Style::default().fg(Color::DarkGray));
        } else {
            block = block.title("Ask a legal question (Enter to send, Shift+Enter for a new line)");
        }

        return block;
    }

    /// Grows with the text, borders included, between three and ten rows.
    pub fn height(textarea: &TextArea<'a>) -> u16 {
        let rows = u16::try_from(textarea.lines().len()).unwrap_or(MAX_HEIGHT);
        return rows.saturating_add(2).clamp(MIN_HEIGHT, MAX_HEIGHT);
    }

    pub fn text(textarea: &TextArea<'a>) -> String {
        return textarea.lines().join("\n");
    }
}
