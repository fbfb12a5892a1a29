pub fn markdown_fixture() -> &'static str {
    return r#"
Negligence requires a **duty of care**, a *breach* of that duty, causation and damages.

A simple checklist in Python:

```python
elements = ["duty", "breach", "causation", "damages"]
print(len(elements) > 3)
```

Raw markup such as <b>this</b> must never render as HTML.

```
no language here
```

Read more at [Cornell LII](https://www.law.cornell.edu/wex/negligence).
"#
    .trim();
}

pub fn history_fixture() -> &'static str {
    return r#"{"messages":[{"id":"1","content":"hi","role":"user","created_at":"2024-01-01T00:00:00Z"}],"session_id":"abc"}"#;
}
