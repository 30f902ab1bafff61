/// Result of [`escape_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped {
    pub text: String,
    /// Input was cut short to stay within capacity
    pub truncated: bool,
}

/// Escape `input` for use inside a double-quoted JSON string.
///
/// Backslash, double quote, newline, carriage return and tab become
/// two-character escapes; everything else is copied as is. Output never
/// exceeds `capacity - 1` bytes: escaping stops at the first character
/// that would not fit, leaving a whole-character prefix.
pub fn escape_json(input: &str, capacity: usize) -> Escaped {
    let mut text = String::with_capacity(capacity.min(input.len().saturating_mul(2)));

    for ch in input.chars() {
        let escape = match ch {
            '\\' => Some("\\\\"),
            '"' => Some("\\\""),
            '\n' => Some("\\n"),
            '\r' => Some("\\r"),
            '\t' => Some("\\t"),
            _ => None,
        };
        let width = escape.map_or(ch.len_utf8(), str::len);
        if text.len().saturating_add(width.max(2)) >= capacity {
            return Escaped {
                text,
                truncated: true,
            };
        }
        match escape {
            Some(seq) => text.push_str(seq),
            None => text.push(ch),
        }
    }

    Escaped {
        text,
        truncated: false,
    }
}
