#[cfg(test)]
#[path = "export_test.rs"]
mod tests;

use super::markup::escape_html;
use super::markup::to_html;
use crate::domain::models::Message;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; color: #222; }
.message { border-radius: 8px; padding: 0.75rem 1rem; margin: 0.75rem 0; }
.message-user { background: #e8f1fb; }
.message-assistant { background: #eef7ee; }
.message-system { background: #fdecea; }
.message-unknown { background: #f2f2f2; }
.meta { font-size: 0.85rem; color: #555; margin-bottom: 0.25rem; }
.meta time { margin-left: 0.5rem; }
pre { background: #272822; color: #f8f8f2; padding: 0.75rem; overflow-x: auto; }
"#;

pub struct HtmlExport {}

impl HtmlExport {
    pub fn message(message: &Message) -> String {
        let role = message.role;
        let time = message.formatted_time();
        let mut meta = format!(
            "<span class=\"avatar\">{}</span> <span class=\"label\">{}</span>",
            role.avatar(),
            role.label()
        );
        if !time.is_empty() {
            meta = format!("{meta}<time>{time}</time>");
        }

        return format!(
            "<div class=\"message message-{}\">\n<div class=\"meta\">{meta}</div>\n<div class=\"content\">{}</div>\n</div>",
            role.as_str(),
            to_html(&message.content)
        );
    }

    /// A standalone HTML document for a whole conversation.
    pub fn document(session_id: &str, messages: &[Message]) -> String {
        let body = messages
            .iter()
            .map(HtmlExport::message)
            .collect::<Vec<String>>()
            .join("\n");

        return format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Conversation {session}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>Conversation {session}</h1>\n{body}\n</body>\n</html>\n",
            session = escape_html(session_id),
        );
    }
}
