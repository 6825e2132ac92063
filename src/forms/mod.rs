//! JSON request payloads accepted by the API and their conversion into domain types.

pub mod categories;
pub mod orders;
pub mod products;

/// Trim the input, collapse whitespace runs into one space and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize every line, strip blank edges and keep at most one empty line in a row.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut previous_empty = false;

    for line in input.lines().map(sanitize_inline_text) {
        if line.is_empty() {
            if previous_empty || result.is_empty() {
                continue;
            }
            previous_empty = true;
            result.push(line);
        } else {
            previous_empty = false;
            result.push(line);
        }
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}
