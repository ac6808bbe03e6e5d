//! Brace-depth scanning for C-style initializer literals.

/// Finds the `}` that closes the `{` at byte offset `open`.
///
/// Returns the offset one past the closing brace, or `None` if `open` is not
/// a `{` or the literal never closes. Nesting depth is unbounded. Braces
/// inside `//` line comments and `/* */` block comments are not counted; a
/// block comment that never ends leaves the literal unclosed.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let tail = text.get(open..)?;
    if !tail.starts_with('{') {
        return None;
    }

    // Every delimiter is ASCII, so byte offsets stay on char boundaries
    let bytes = tail.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'/', Some(b'/')) => {
                i = tail[i..].find('\n').map_or(bytes.len(), |nl| i + nl);
                continue;
            }
            (b'/', Some(b'*')) => {
                i += 2 + tail[i + 2..].find("*/")? + 2;
                continue;
            }
            (b'{', _) => depth += 1,
            (b'}', _) => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}
