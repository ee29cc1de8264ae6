use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Words split across lines with a hyphen: "deci-\nsão"
    static ref HYPHENATED_BREAK: Regex = Regex::new(r"-\r?\n").unwrap();

    // Abbreviations whose trailing period is not the end of a sentence
    static ref ABBREVIATION: Regex = Regex::new(
        r"(?ix)
        \b(
            art|dr|dra|sr|sra|srta|prof|profa|exmo|exma|  # Portuguese
            st|mr|mrs|ms|jr                               # English
        )\.
        "
    )
    .unwrap();

    // Tone marks glued to the following word: "Atenção!O prazo"
    static ref TONE_MARK: Regex = Regex::new(r"([?!？！])([^\s?!？！])").unwrap();
}

/// Normalize text before it is split into engine-sized chunks.
pub fn apply(input: &str) -> String {
    let joined = HYPHENATED_BREAK.replace_all(input, "");
    let expanded = ABBREVIATION.replace_all(&joined, "$1");
    TONE_MARK.replace_all(&expanded, "$1 $2").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_hyphenated_line_breaks() {
        assert_eq!(apply("a deci-\nsão final"), "a decisão final");
        assert_eq!(apply("a deci-\r\nsão"), "a decisão");
    }

    #[test]
    fn drops_period_after_abbreviation() {
        assert_eq!(apply("O Dr. Silva e a Sra. Costa"), "O Dr Silva e a Sra Costa");
        assert_eq!(apply("PROF. Lima"), "PROF Lima");
    }

    #[test]
    fn keeps_regular_periods() {
        assert_eq!(apply("Fim. Outro"), "Fim. Outro");
        assert_eq!(apply("drama."), "drama.");
    }

    #[test]
    fn spaces_after_tone_marks() {
        assert_eq!(apply("Atenção!O prazo"), "Atenção! O prazo");
        assert_eq!(apply("Sério?!Sim"), "Sério?! Sim");
        assert_eq!(apply("Ok! Certo"), "Ok! Certo");
    }

    #[test]
    fn empty_input() {
        assert_eq!(apply(""), "");
    }
}
