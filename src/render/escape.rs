//! Markdown escaping.

/// Escape characters that would otherwise start Markdown formatting.
///
/// # Examples
///
/// ```
/// use dexsheet::render::escape_markdown;
///
/// assert_eq!(escape_markdown("*Overgrow*"), "\\*Overgrow\\*");
/// assert_eq!(escape_markdown("Lv. 1"), "Lv. 1");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;

    while let Some(c) = chars.next() {
        match c {
            '\\' | '*' | '_' | '[' | ']' | '`' | '|' | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            '#' if at_line_start => result.push_str("\\#"),
            '!' if chars.peek() == Some(&'[') => result.push_str("\\!"),
            _ => result.push(c),
        }
        at_line_start = c == '\n';
    }

    result
}

/// Escape a table cell: Markdown escaping plus line breaks folded to spaces.
pub fn escape_cell(text: &str) -> String {
    let escaped = escape_markdown(text);
    if escaped.contains(['\n', '\r']) {
        escaped.split(['\n', '\r']).filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ")
    } else {
        escaped
    }
}
