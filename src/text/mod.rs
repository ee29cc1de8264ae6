pub mod preprocess;
pub mod tokenizer;

/// Longest text the speech endpoint accepts in a single request.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Split text into chunks the speech engine can synthesize one at a time.
///
/// Text that already fits is sent whole. Longer text is cut at sentence
/// punctuation, oversized sentences are cut at word boundaries, and the
/// resulting pieces are packed back together up to `max_len` characters.
/// Chunks without any letter or digit are dropped since the engine rejects
/// them.
pub fn chunks(input: &str, max_len: usize) -> Vec<String> {
    let prepared = preprocess::apply(input.trim());

    let tokens = if prepared.chars().count() <= max_len {
        vec![prepared]
    } else {
        let pieces = tokenizer::split(&prepared)
            .iter()
            .flat_map(|token| tokenizer::minimize(token, max_len))
            .collect();
        tokenizer::merge(pieces, max_len)
    };

    tokens
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunks("  Olá mundo  ", MAX_CHUNK_CHARS), vec!["Olá mundo"]);
    }

    #[test]
    fn long_text_respects_limit() {
        let sentence = "O juiz decidiu que a empresa deve devolver o valor pago, com correção monetária e juros. ";
        let text = sentence.repeat(20);
        let result = chunks(&text, MAX_CHUNK_CHARS);

        assert!(result.len() > 1);
        assert!(result.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));

        let original: Vec<&str> = text.split_whitespace().collect();
        let rebuilt: Vec<&str> = result.iter().flat_map(|c| c.split_whitespace()).collect();
        assert_eq!(original, rebuilt);
    }

    #[test]
    fn long_word_runs_are_hard_split() {
        let text = "a".repeat(250);
        let result = chunks(&text, MAX_CHUNK_CHARS);
        assert_eq!(result.len(), 3);
        assert_eq!(result[2].len(), 50);
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert!(chunks("...", MAX_CHUNK_CHARS).is_empty());
        assert!(chunks("   ", MAX_CHUNK_CHARS).is_empty());
    }

    #[test]
    fn abbreviations_do_not_split() {
        let text = format!("{} O Dr. Silva assinou.", "palavra ".repeat(15));
        let result = chunks(&text, 40);
        assert!(result.iter().any(|c| c.contains("Dr Silva")));
    }
}
