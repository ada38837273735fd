//! Splitting raw command text into directive segments and pulling quoted
//! values out of them.

/// Splits raw command text on line-continuation backslashes and trims each
/// piece. Empty pieces are dropped.
///
/// A backslash only counts as a continuation when nothing but spaces or tabs
/// sit between it and the end of the line (or the end of the input), so
/// escapes inside a body survive.
pub fn split_directives(raw: &str) -> Vec<&str> {
    let bytes = raw.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(next) = continuation_end(bytes, i + 1) {
                segments.push(&raw[start..i]);
                start = next;
                i = next;
                continue;
            }
        }
        i += 1;
    }
    segments.push(&raw[start..]);

    segments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Index just past the line break that follows a continuation backslash,
/// or `None` if the backslash does not end its line.
fn continuation_end(bytes: &[u8], mut i: usize) -> Option<usize> {
    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }
    match bytes.get(i) {
        None => Some(i),
        Some(b'\n') => Some(i + 1),
        Some(b'\r') if bytes.get(i + 1) == Some(&b'\n') => Some(i + 2),
        Some(b'\r') => Some(i + 1),
        Some(_) => None,
    }
}

/// Returns the first non-empty single-quoted substring of `segment`.
/// Empty pairs (`''`) are skipped.
pub fn first_quoted(segment: &str) -> Option<&str> {
    let mut rest = segment;
    while let Some(open) = rest.find('\'') {
        let after = &rest[open + 1..];
        let close = after.find('\'')?;
        if close > 0 {
            return Some(&after[..close]);
        }
        rest = &after[close + 1..];
    }
    None
}

/// Trims `value` and strips one pair of surrounding single quotes.
pub fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .map(str::trim)
        .unwrap_or(value)
}

/// Splits `piece` on the first `separator`, requiring both halves to be
/// non-empty.
pub fn split_pair<'a>(piece: &'a str, separator: &str) -> Option<(&'a str, &'a str)> {
    let (key, value) = piece.split_once(separator)?;
    (!key.is_empty() && !value.is_empty()).then_some((key, value))
}
