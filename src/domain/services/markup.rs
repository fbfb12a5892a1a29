#[cfg(test)]
#[path = "markup_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| {
    return Regex::new(r"```([A-Za-z0-9_+\-]*)\n?((?s:.*?))```").unwrap();
});

static INLINE_CODE: Lazy<Regex> = Lazy::new(|| {
    return Regex::new(r"`([^`\n]+)`").unwrap();
});

static INLINE: Lazy<Regex> = Lazy::new(|| {
    return Regex::new(
        r"\*\*(?P<bold>[^*\n]+?)\*\*|\*(?P<italic>[^*\n]+?)\*|\[(?P<text>[^\]\n]+)\]\((?P<url>[^)\s]+)\)",
    )
    .unwrap();
});

static CODE_SLOT: Lazy<Regex> = Lazy::new(|| {
    return Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap();
});

const LINK_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];
const SLOT_OPEN: char = '\u{E000}';
const SLOT_CLOSE: char = '\u{E001}';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    CodeBlock { language: String, body: String },
    InlineCode(String),
    Bold(Vec<Segment>),
    Italic(Vec<Segment>),
    Link { children: Vec<Segment>, url: String },
    LineBreak,
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    return escaped;
}

/// Claimed inline code spans. Text refers to them through slot markers so
/// the emphasis and link passes can wrap them without looking inside.
struct CodeSlots {
    spans: Vec<String>,
}

impl CodeSlots {
    fn push_line(&self, segments: &mut Vec<Segment>, line: &str) {
        let mut cursor = 0;
        for caps in CODE_SLOT.captures_iter(line) {
            let (Some(whole), Some(idx)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(code) = idx
                .as_str()
                .parse::<usize>()
                .ok()
                .and_then(|idx| return self.spans.get(idx))
            else {
                continue;
            };

            if whole.start() > cursor {
                segments.push(Segment::Text(line[cursor..whole.start()].to_string()));
            }
            segments.push(Segment::InlineCode(code.to_string()));
            cursor = whole.end();
        }

        if cursor < line.len() {
            segments.push(Segment::Text(line[cursor..].to_string()));
        }
    }

    fn push_text(&self, segments: &mut Vec<Segment>, text: &str) {
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                segments.push(Segment::LineBreak);
            }
            self.push_line(segments, line);
        }
    }
}

fn is_linkable(url: &str) -> bool {
    let lowered = url.to_lowercase();
    return LINK_SCHEMES
        .iter()
        .any(|scheme| return lowered.starts_with(scheme));
}

fn inline_segment(caps: &Captures, slots: &CodeSlots) -> Option<Segment> {
    if let Some(bold) = caps.name("bold") {
        return Some(Segment::Bold(tokenize_inline(bold.as_str(), slots)));
    }
    if let Some(italic) = caps.name("italic") {
        return Some(Segment::Italic(tokenize_inline(italic.as_str(), slots)));
    }

    let text = caps.name("text")?.as_str();
    let url = caps.name("url")?.as_str();
    if url.contains(SLOT_OPEN) || !is_linkable(url) {
        return None;
    }

    return Some(Segment::Link {
        children: tokenize_inline(text, slots),
        url: url.to_string(),
    });
}

/// Emphasis and links over text whose code spans are already claimed.
/// Bodies are tokenized again so markup nests.
fn tokenize_inline(text: &str, slots: &CodeSlots) -> Vec<Segment> {
    let mut segments = vec![];
    let mut cursor = 0;
    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some(segment) = inline_segment(&caps, slots) else {
            continue;
        };

        slots.push_text(&mut segments, &text[cursor..whole.start()]);
        segments.push(segment);
        cursor = whole.end();
    }

    slots.push_text(&mut segments, &text[cursor..]);

    return segments;
}

fn tokenize_inline_code(text: &str, segments: &mut Vec<Segment>) {
    let mut slots = CodeSlots { spans: vec![] };
    let slotted = INLINE_CODE.replace_all(text, |caps: &Captures| {
        let code = caps
            .get(1)
            .map(|m| return m.as_str().to_string())
            .unwrap_or_default();
        slots.spans.push(code);
        return format!("{SLOT_OPEN}{}{SLOT_CLOSE}", slots.spans.len() - 1);
    });

    segments.extend(tokenize_inline(&slotted, &slots));
}

/// Splits content into display segments. Code is claimed first so emphasis
/// and link markers inside it stay literal. Input is used as is, callers
/// targeting HTML must escape it beforehand.
pub fn tokenize(text: &str) -> Vec<Segment> {
    let text = text
        .replace("\r\n", "\n")
        .replace(|c: char| return c == SLOT_OPEN || c == SLOT_CLOSE, "");
    let mut segments = vec![];
    let mut cursor = 0;

    for caps in FENCED_CODE.captures_iter(&text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        tokenize_inline_code(&text[cursor..whole.start()], &mut segments);
        segments.push(Segment::CodeBlock {
            language: caps
                .get(1)
                .map(|m| return m.as_str().to_string())
                .unwrap_or_default(),
            body: caps
                .get(2)
                .map(|m| return m.as_str().to_string())
                .unwrap_or_default(),
        });
        cursor = whole.end();
    }

    tokenize_inline_code(&text[cursor..], &mut segments);

    return segments;
}

fn segments_to_html(segments: &[Segment]) -> String {
    return segments
        .iter()
        .map(segment_to_html)
        .collect::<Vec<String>>()
        .join("");
}

fn segment_to_html(segment: &Segment) -> String {
    match segment {
        Segment::Text(text) => return text.to_string(),
        Segment::CodeBlock { language, body } => {
            if language.is_empty() {
                return format!("<pre><code>{body}</code></pre>");
            }
            return format!("<pre><code class=\"language-{language}\">{body}</code></pre>");
        }
        Segment::InlineCode(code) => return format!("<code>{code}</code>"),
        Segment::Bold(children) => {
            return format!("<strong>{}</strong>", segments_to_html(children));
        }
        Segment::Italic(children) => return format!("<em>{}</em>", segments_to_html(children)),
        Segment::Link { children, url } => {
            return format!(
                "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                segments_to_html(children)
            );
        }
        Segment::LineBreak => return "<br>".to_string(),
    }
}

/// Renders raw message content as HTML. Escaping runs before any markup is
/// recognised, so nothing in the content can produce tags of its own.
pub fn to_html(content: &str) -> String {
    return segments_to_html(&tokenize(&escape_html(content)));
}
