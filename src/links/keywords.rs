use crate::config::KeywordsConfig;

/// Page language, as far as link relevance is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    German,
    French,
    Spanish,
}

// Link keywords per language. Both anchor text and URL paths are matched
// against these, so each table mixes display phrases and slug forms.
const ENGLISH_KEYWORDS: &[&str] = &[
    "contact",
    "about",
    "get in touch",
    "reach us",
    "communication",
    "contacts",
    "about the company",
    "contact us",
    "team",
    "support",
];

const GERMAN_KEYWORDS: &[&str] = &[
    "kontakt",
    "impressum",
    "über uns",
    "ueber-uns",
    "team",
    "unternehmen",
    "erreichen",
];

const FRENCH_KEYWORDS: &[&str] = &[
    "contact",
    "contactez",
    "à propos",
    "a-propos",
    "équipe",
    "equipe",
    "qui sommes-nous",
    "nous joindre",
];

const SPANISH_KEYWORDS: &[&str] = &[
    "contacto",
    "contáctenos",
    "contactenos",
    "sobre nosotros",
    "acerca de",
    "equipo",
    "quiénes somos",
    "quienes-somos",
];

// High-frequency function words used to tell languages apart. Spaces on
// both sides keep them from matching inside longer words.
const ENGLISH_MARKERS: &[&str] = &[" the ", " and ", " for ", " with ", " this "];
const GERMAN_MARKERS: &[&str] = &[" und ", " der ", " die ", " das ", " nicht ", " mit "];
const FRENCH_MARKERS: &[&str] = &[" le ", " la ", " les ", " des ", " est ", " vous "];
const SPANISH_MARKERS: &[&str] = &[" el ", " los ", " las ", " una ", " para ", " con "];

/// Relevance keyword tables for all supported languages
///
/// Built-in tables can be replaced per language through the `[keywords]`
/// config section.
#[derive(Debug, Clone)]
pub struct KeywordTables {
    english: Vec<String>,
    german: Vec<String>,
    french: Vec<String>,
    spanish: Vec<String>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            english: to_owned_lowercase(ENGLISH_KEYWORDS),
            german: to_owned_lowercase(GERMAN_KEYWORDS),
            french: to_owned_lowercase(FRENCH_KEYWORDS),
            spanish: to_owned_lowercase(SPANISH_KEYWORDS),
        }
    }
}

impl KeywordTables {
    /// Builds tables with any configured per-language overrides applied
    pub fn with_overrides(overrides: &KeywordsConfig) -> Self {
        let mut tables = Self::default();
        if let Some(list) = &overrides.english {
            tables.english = normalize_overrides(list);
        }
        if let Some(list) = &overrides.german {
            tables.german = normalize_overrides(list);
        }
        if let Some(list) = &overrides.french {
            tables.french = normalize_overrides(list);
        }
        if let Some(list) = &overrides.spanish {
            tables.spanish = normalize_overrides(list);
        }
        tables
    }

    /// Returns the keyword table for the given language
    pub fn table(&self, language: Language) -> &[String] {
        match language {
            Language::English => &self.english,
            Language::German => &self.german,
            Language::French => &self.french,
            Language::Spanish => &self.spanish,
        }
    }
}

fn to_owned_lowercase(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_lowercase()).collect()
}

fn normalize_overrides(keywords: &[String]) -> Vec<String> {
    keywords.iter().map(|k| k.trim().to_lowercase()).collect()
}

/// Guesses the language of a page from its visible text
///
/// Counts occurrences of high-frequency function words per language.
/// English is the default and only loses to a strictly higher count,
/// so short or ambiguous pages fall back to the English keyword table.
pub fn guess_language(text: &str) -> Language {
    let haystack = format!(" {} ", text.to_lowercase());
    let score =
        |markers: &[&str]| -> usize { markers.iter().map(|m| haystack.matches(m).count()).sum() };

    let mut best = Language::English;
    let mut best_score = score(ENGLISH_MARKERS);

    let candidates = [
        (Language::German, score(GERMAN_MARKERS)),
        (Language::French, score(FRENCH_MARKERS)),
        (Language::Spanish, score(SPANISH_MARKERS)),
    ];

    for (language, count) in candidates {
        if count > best_score {
            best = language;
            best_score = count;
        }
    }

    best
}
