use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DELIMITER_REGEX: Regex = Regex::new(
        r#"(?x)
        [?!？！;…—«»()\[\]{}"]|    # Always a boundary
        [.,:](?:\s|$)              # Only before whitespace, so 3.14 and 10:30 stay whole
        "#
    )
    .unwrap();
}

/// Split text after every sentence delimiter. Delimiters stay attached to the
/// token they close.
pub fn split(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut last_end = 0;

    for m in DELIMITER_REGEX.find_iter(input) {
        push_trimmed(&mut tokens, &input[last_end..m.end()]);
        last_end = m.end();
    }

    if last_end < input.len() {
        push_trimmed(&mut tokens, &input[last_end..]);
    }

    tokens
}

fn push_trimmed(tokens: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        tokens.push(text.to_string());
    }
}

/// Break a token into pieces of at most `max_len` characters, cutting at the
/// last whitespace inside the limit when there is one.
pub fn minimize(token: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = token.trim();

    while rest.chars().count() > max_len {
        let limit = rest
            .char_indices()
            .nth(max_len)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let cut = match rest[..limit].rfind(char::is_whitespace) {
            Some(i) if i > 0 => i,
            _ => limit,
        };

        pieces.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }

    pieces
}

/// Greedily join neighbouring tokens while the result fits in `max_len`.
pub fn merge(tokens: Vec<String>, max_len: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();

    for token in tokens {
        match merged.last_mut() {
            Some(current)
                if current.chars().count() + 1 + token.chars().count() <= max_len =>
            {
                current.push(' ');
                current.push_str(&token);
            }
            _ => merged.push(token),
        }
    }

    merged
}
