//! Prompt-side text helpers shared by the classifier and validators.

/// Prefixes every line with its 1-indexed number, `"{n}: {line}"`.
///
/// Model-driven checks see numbered content so that the line ranges they
/// report can be mapped straight back onto the file.
#[must_use]
pub fn add_line_numbers(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for (i, line) in content.lines().enumerate() {
        out.push_str(&format!("{}: {line}\n", i + 1));
    }
    out
}

/// Extracts the JSON payload from a model reply.
///
/// Prefers the first ```json fenced block; a reply that is bare JSON
/// (starts with `{` or `[` after trimming) is accepted as-is. Returns
/// `None` for anything else, including an unterminated fence.
#[must_use]
pub fn extract_json_block(reply: &str) -> Option<&str> {
    if let Some(start) = reply.find("```json") {
        let rest = &reply[start + "```json".len()..];
        let rest = rest.strip_prefix('\n').unwrap_or(rest);
        let end = rest.find("```")?;
        return Some(rest[..end].trim());
    }

    let trimmed = reply.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        Some(trimmed)
    } else {
        None
    }
}
