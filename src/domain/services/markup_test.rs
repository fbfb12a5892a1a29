use test_utils::markdown_fixture;

use super::escape_html;
use super::to_html;
use super::tokenize;
use super::Segment;

#[test]
fn it_escapes_all_special_characters() {
    assert_eq!(
        escape_html(r#"a & b < c > d "e" 'f'"#),
        "a &amp; b &lt; c &gt; d &quot;e&quot; &#39;f&#39;"
    );
}

#[test]
fn it_neutralizes_script_tags() {
    let html = to_html("<script>alert(1)</script>");
    assert_eq!(html, "&lt;script&gt;alert(1)&lt;/script&gt;");
    assert!(!html.contains("<script>"));
}

#[test]
fn it_renders_fenced_code_without_double_escaping() {
    let html = to_html("Try:\n```rust\nif a < b && c {}\n```");
    assert_eq!(
        html,
        "Try:<br><pre><code class=\"language-rust\">if a &lt; b &amp;&amp; c {}\n</code></pre>"
    );
    assert!(!html.contains("&amp;lt;"));
}

#[test]
fn it_renders_fenced_code_without_language() {
    let html = to_html("```\nplain\n```");
    assert_eq!(html, "<pre><code>plain\n</code></pre>");
}

#[test]
fn it_keeps_markers_inside_code_literal() {
    let html = to_html("`**not bold**` and ```\n*not italic*\n```");
    assert_eq!(
        html,
        "<code>**not bold**</code> and <pre><code>*not italic*\n</code></pre>"
    );
}

#[test]
fn it_renders_inline_code() {
    assert_eq!(
        to_html("Call `fn <T>()` now"),
        "Call <code>fn &lt;T&gt;()</code> now"
    );
}

#[test]
fn it_renders_emphasis() {
    insta::assert_snapshot!(
        to_html("**Negligence** is *one* tort"),
        @"<strong>Negligence</strong> is <em>one</em> tort"
    );
}

#[test]
fn it_renders_links_in_a_new_context() {
    assert_eq!(
        to_html("See [the code](https://example.com/a?b=1&c=2)"),
        "See <a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" rel=\"noopener noreferrer\">the code</a>"
    );
}

#[test]
fn it_leaves_unsafe_link_schemes_as_text() {
    let html = to_html("[click](javascript:alert(1))");
    assert!(!html.contains("<a "));
    assert_eq!(html, "[click](javascript:alert(1))");
}

#[test]
fn it_cannot_break_out_of_link_attributes() {
    let html = to_html(r#"[x](https://a.com/"onmouseover="alert(1))"#);
    assert!(!html.contains(r#""onmouseover"#));
    assert!(html.contains("&quot;onmouseover=&quot;"));
}

#[test]
fn it_converts_remaining_newlines() {
    assert_eq!(to_html("one\ntwo\n\nthree"), "one<br>two<br><br>three");
}

#[test]
fn it_does_not_double_escape_substituted_markup() {
    let html = to_html("**a & b**");
    assert_eq!(html, "<strong>a &amp; b</strong>");
    assert!(!html.contains("&amp;amp;"));
}

#[test]
fn it_tokenizes_raw_content() {
    let segments = tokenize("Hi **there**\n```sh\nls\n```\n[docs](https://docs.rs)");

    assert_eq!(
        segments,
        vec![
            Segment::Text("Hi ".to_string()),
            Segment::Bold(vec![Segment::Text("there".to_string())]),
            Segment::LineBreak,
            Segment::CodeBlock {
                language: "sh".to_string(),
                body: "ls\n".to_string(),
            },
            Segment::LineBreak,
            Segment::Link {
                children: vec![Segment::Text("docs".to_string())],
                url: "https://docs.rs".to_string(),
            },
        ]
    );
}

#[test]
fn it_renders_emphasis_inside_link_text() {
    assert_eq!(
        to_html("[**Rule** 11](https://x.test)"),
        "<a href=\"https://x.test\" target=\"_blank\" rel=\"noopener noreferrer\"><strong>Rule</strong> 11</a>"
    );
}

#[test]
fn it_renders_emphasis_around_inline_code() {
    assert_eq!(
        to_html("**bold with `code` inside**"),
        "<strong>bold with <code>code</code> inside</strong>"
    );
    assert_eq!(
        to_html("*see `a < b`*"),
        "<em>see <code>a &lt; b</code></em>"
    );
}

#[test]
fn it_renders_links_inside_emphasis() {
    insta::assert_snapshot!(
        to_html("**read [this](https://x.test)**"),
        @r###"<strong>read <a href="https://x.test" target="_blank" rel="noopener noreferrer">this</a></strong>"###
    );
}

#[test]
fn it_keeps_code_opaque_when_nested() {
    let segments = tokenize("**`*x*` and [y](https://x.test)**");

    assert_eq!(
        segments,
        vec![Segment::Bold(vec![
            Segment::InlineCode("*x*".to_string()),
            Segment::Text(" and ".to_string()),
            Segment::Link {
                children: vec![Segment::Text("y".to_string())],
                url: "https://x.test".to_string(),
            },
        ])]
    );
}

#[test]
fn it_keeps_code_in_rejected_link_targets() {
    assert_eq!(
        to_html("[x](`y`)"),
        "[x](<code>y</code>)"
    );
}

#[test]
fn it_normalizes_crlf_line_endings() {
    assert_eq!(to_html("line1\r\nline2"), "line1<br>line2");
    assert_eq!(
        tokenize("a\r\nb"),
        vec![
            Segment::Text("a".to_string()),
            Segment::LineBreak,
            Segment::Text("b".to_string()),
        ]
    );
}

#[test]
fn it_leaves_unclosed_markers_alone() {
    assert_eq!(
        tokenize("a *b and ```c"),
        vec![Segment::Text("a *b and ```c".to_string())]
    );
}

#[test]
fn it_formats_fixture() {
    let html = to_html(markdown_fixture());

    assert_eq!(html.matches("<pre><code").count(), 2);
    assert!(html.contains("<strong>duty of care</strong>"));
    assert!(html.contains("<em>breach</em>"));
    assert!(html.contains("&lt;b&gt;"));
    assert!(!html.contains("<b>"));
}
