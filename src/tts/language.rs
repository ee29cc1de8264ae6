/// Languages accepted by `/gerar-audio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Portuguese,
    BrazilianPortuguese,
    English,
    Spanish,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::Portuguese,
        Language::BrazilianPortuguese,
        Language::English,
        Language::Spanish,
    ];

    /// Resolve a request's language code. Absent means Brazilian Portuguese;
    /// anything outside the allow-list silently falls back to Portuguese.
    pub fn resolve(code: Option<&str>) -> Self {
        match code {
            None => Language::BrazilianPortuguese,
            Some(code) => Self::from_code(code).unwrap_or(Language::Portuguese),
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Portuguese => "pt",
            Language::BrazilianPortuguese => "pt-br",
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    /// Locale passed to the speech engine. Both Portuguese variants share a voice.
    pub fn locale(&self) -> &'static str {
        match self {
            Language::Portuguese | Language::BrazilianPortuguese => "pt",
            Language::English => "en",
            Language::Spanish => "es",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_codes() {
        assert_eq!(Language::resolve(Some("pt")), Language::Portuguese);
        assert_eq!(Language::resolve(Some("pt-br")), Language::BrazilianPortuguese);
        assert_eq!(Language::resolve(Some("en")), Language::English);
        assert_eq!(Language::resolve(Some("es")), Language::Spanish);
    }

    #[test]
    fn test_absent_defaults_to_brazilian_portuguese() {
        assert_eq!(Language::resolve(None), Language::BrazilianPortuguese);
    }

    #[test]
    fn test_unknown_falls_back_to_portuguese() {
        for code in ["fr", "", "PT", "en-US", "pt_br"] {
            assert_eq!(Language::resolve(Some(code)).locale(), "pt", "code {:?}", code);
        }
    }

    #[test]
    fn test_locales() {
        assert_eq!(Language::BrazilianPortuguese.locale(), "pt");
        assert_eq!(Language::English.locale(), "en");
        assert_eq!(Language::Spanish.locale(), "es");
    }
}
