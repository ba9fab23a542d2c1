use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::language::{Script, SignLanguage};

const BUILTIN_LEXICON: &str = include_str!("../../resources/lexicon.toml");

/// On-disk layout of a lexicon document.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    common_signs: HashMap<String, String>,
    #[serde(default)]
    dictionaries: DictionaryTables,
    #[serde(default)]
    regional_to_isl: HashMap<String, String>,
    #[serde(default)]
    transliteration: HashMap<String, HashMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct DictionaryTables {
    #[serde(default)]
    asl: HashMap<String, String>,
    #[serde(default)]
    isl: HashMap<String, String>,
    #[serde(default)]
    hindi: HashMap<String, String>,
    #[serde(default)]
    telugu: HashMap<String, String>,
    #[serde(default)]
    gujarati: HashMap<String, String>,
}

/// Immutable lookup tables used by the sign resolver.
#[derive(Debug, Clone)]
pub struct Lexicon {
    common_signs: HashMap<String, String>,
    asl: HashMap<String, String>,
    /// ISL vocabulary including the native-script regional dictionaries.
    isl: HashMap<String, String>,
    regional_to_isl: HashMap<String, String>,
    /// `None` marks a character that is skipped when spelling.
    transliteration: HashMap<Script, HashMap<char, Option<char>>>,
    max_phrase_len: usize,
}

impl Lexicon {
    /// The lexicon compiled into the binary.
    pub fn builtin() -> Result<Self, DomainError> {
        Self::from_toml_str(BUILTIN_LEXICON)
    }

    /// Parse and validate a lexicon document.
    pub fn from_toml_str(content: &str) -> Result<Self, DomainError> {
        let file: LexiconFile = toml::from_str(content)?;

        let common_signs = lowercase_keys(file.common_signs);
        let asl = lowercase_keys(file.dictionaries.asl);
        let mut isl = lowercase_keys(file.dictionaries.isl);
        for regional in [
            file.dictionaries.hindi,
            file.dictionaries.telugu,
            file.dictionaries.gujarati,
        ] {
            for (key, value) in lowercase_keys(regional) {
                isl.entry(key).or_insert(value);
            }
        }

        let mut transliteration = HashMap::new();
        for (script_name, table) in file.transliteration {
            let script = parse_script(&script_name)?;
            transliteration.insert(script, parse_transliteration(&script_name, table)?);
        }

        let regional_to_isl: HashMap<String, String> = file
            .regional_to_isl
            .into_iter()
            .map(|(k, v)| (normalize_phrase(&k), v.to_lowercase()))
            .collect();

        let max_phrase_len = asl
            .keys()
            .chain(isl.keys())
            .chain(regional_to_isl.keys())
            .map(|k| k.split(' ').count())
            .max()
            .unwrap_or(1);

        Ok(Self {
            common_signs,
            asl,
            isl,
            regional_to_isl,
            transliteration,
            max_phrase_len,
        })
    }

    pub fn common_sign(&self, token: &str) -> Option<&str> {
        self.common_signs.get(token).map(String::as_str)
    }

    /// Word or phrase entry in the vocabulary used for `language`.
    pub fn dictionary_entry(&self, language: SignLanguage, key: &str) -> Option<&str> {
        let table = if language.uses_isl() { &self.isl } else { &self.asl };
        table.get(key).map(String::as_str)
    }

    /// Canonical ISL token for a native word form or phrase.
    pub fn regional_mapping(&self, native: &str) -> Option<&str> {
        self.regional_to_isl.get(native).map(String::as_str)
    }

    /// Latin letter for a native character. `Some(None)` means the character is
    /// known and deliberately skipped; `None` means it is not in the table.
    pub fn transliterate(&self, script: Script, c: char) -> Option<Option<char>> {
        self.transliteration.get(&script)?.get(&c).copied()
    }

    #[cfg(test)]
    pub fn transliteration_table(&self, script: Script) -> Option<&HashMap<char, Option<char>>> {
        self.transliteration.get(&script)
    }

    /// Most tokens in any phrase key.
    pub fn max_phrase_len(&self) -> usize {
        self.max_phrase_len
    }
}

fn lowercase_keys(table: HashMap<String, String>) -> HashMap<String, String> {
    table
        .into_iter()
        .map(|(k, v)| (normalize_phrase(&k).to_lowercase(), v))
        .collect()
}

/// Collapse internal whitespace so phrase keys match joined tokens.
fn normalize_phrase(key: &str) -> String {
    key.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_script(name: &str) -> Result<Script, DomainError> {
    match name {
        "devanagari" => Ok(Script::Devanagari),
        "telugu" => Ok(Script::Telugu),
        "gujarati" => Ok(Script::Gujarati),
        other => Err(DomainError::Config(format!(
            "unknown transliteration script '{}'",
            other
        ))),
    }
}

fn parse_transliteration(
    script_name: &str,
    table: HashMap<String, String>,
) -> Result<HashMap<char, Option<char>>, DomainError> {
    let mut parsed = HashMap::with_capacity(table.len());
    for (key, value) in table {
        let mut chars = key.chars();
        let c = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(DomainError::Config(format!(
                    "{} transliteration key '{}' must be a single character",
                    script_name, key
                )))
            }
        };

        let mut letters = value.chars();
        let letter = match (letters.next(), letters.next()) {
            (None, _) => None,
            (Some(l), None) if l.is_ascii_uppercase() => Some(l),
            _ => {
                return Err(DomainError::Config(format!(
                    "{} transliteration of '{}' must be one uppercase letter or empty, got '{}'",
                    script_name, key, value
                )))
            }
        };
        parsed.insert(c, letter);
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lexicon_loads() {
        let lexicon = Lexicon::builtin().unwrap();
        assert_eq!(lexicon.common_sign("hello"), Some("hello.mp4"));
        assert_eq!(
            lexicon.dictionary_entry(SignLanguage::Isl, "dhanyavaad"),
            Some("thank.mp4")
        );
        // Native-script dictionaries are part of the ISL vocabulary only
        assert_eq!(
            lexicon.dictionary_entry(SignLanguage::Hindi, "भारी बारिश"),
            Some("heavy rain.mp4")
        );
        assert_eq!(lexicon.dictionary_entry(SignLanguage::Asl, "भारी बारिश"), None);
        assert_eq!(lexicon.regional_mapping("नमस्ते"), Some("namaste"));
        assert!(lexicon.max_phrase_len() >= 2);
    }

    #[test]
    fn test_every_transliteration_is_a_letter_or_skip() {
        let lexicon = Lexicon::builtin().unwrap();
        for script in [Script::Devanagari, Script::Telugu, Script::Gujarati] {
            let table = lexicon.transliteration_table(script).unwrap();
            assert!(!table.is_empty());
            for (c, letter) in table {
                assert_eq!(Script::of(*c), script, "{} is filed under {:?}", c, script);
                if let Some(l) = letter {
                    assert!(l.is_ascii_uppercase());
                }
            }
        }
        assert_eq!(lexicon.transliterate(Script::Devanagari, '्'), Some(None));
        assert_eq!(lexicon.transliterate(Script::Telugu, 'క'), Some(Some('K')));
        assert_eq!(lexicon.transliterate(Script::Gujarati, 'ા'), None);
    }

    #[test]
    fn test_rejects_multi_letter_transliteration() {
        let err = Lexicon::from_toml_str(
            r#"
            [transliteration.devanagari]
            "क" = "KA"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_script() {
        let err = Lexicon::from_toml_str(
            r#"
            [transliteration.tamil]
            "க" = "K"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Config(_)));
    }

    #[test]
    fn test_keys_are_case_folded() {
        let lexicon = Lexicon::from_toml_str(
            r#"
            [dictionaries.asl]
            "Thank  You" = "thank_you.mp4"
            "#,
        )
        .unwrap();
        assert_eq!(
            lexicon.dictionary_entry(SignLanguage::Asl, "thank you"),
            Some("thank_you.mp4")
        );
        assert_eq!(lexicon.max_phrase_len(), 2);
    }
}
