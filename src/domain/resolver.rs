use std::sync::Arc;

use crate::domain::language::{Script, SignLanguage};
use crate::domain::lexicon::Lexicon;
use crate::domain::media::{MediaCatalog, MediaCategory};

/// Maps text to the ordered media references that render it in sign language.
///
/// Lookup per position, first hit wins: a multi-token phrase, the common-sign
/// table, the language dictionary, a `<word>.mp4` file, and finally
/// letter-by-letter fingerspelling. A table hit only counts when its file is in
/// the catalog. Resolution never mutates shared state.
#[derive(Debug, Clone)]
pub struct SignResolver {
    lexicon: Arc<Lexicon>,
    catalog: Arc<MediaCatalog>,
    not_understood: String,
}

impl SignResolver {
    pub fn new(
        lexicon: Arc<Lexicon>,
        catalog: Arc<MediaCatalog>,
        not_understood: impl Into<String>,
    ) -> Self {
        Self {
            lexicon,
            catalog,
            not_understood: not_understood.into(),
        }
    }

    pub fn catalog(&self) -> &MediaCatalog {
        &self.catalog
    }

    /// Resolve whitespace-separated text. An empty result means nothing matched.
    pub fn resolve(&self, text: &str, language: SignLanguage) -> Vec<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        self.resolve_tokens(&tokens, language)
    }

    /// Like [`resolve`](Self::resolve) but substitutes the not-understood clip
    /// for an empty result when that clip exists.
    pub fn resolve_or_fallback(&self, text: &str, language: SignLanguage) -> Vec<String> {
        let paths = self.resolve(text, language);
        if !paths.is_empty() {
            return paths;
        }
        self.catalog
            .reference(MediaCategory::Videos, &self.not_understood)
            .into_iter()
            .collect()
    }

    pub fn resolve_tokens<S: AsRef<str>>(
        &self,
        tokens: &[S],
        language: SignLanguage,
    ) -> Vec<String> {
        let tokens: Vec<&str> = tokens
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| !t.trim().is_empty())
            .collect();
        let mut out = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if let Some(consumed) = self.resolve_phrase(&tokens[i..], language, &mut out) {
                i += consumed;
                continue;
            }

            let token = tokens[i];
            let word = if language.uses_isl() {
                self.lexicon.regional_mapping(token).unwrap_or(token)
            } else {
                token
            };
            self.resolve_word(word, language, &mut out);
            i += 1;
        }

        out
    }

    /// Try the longest multi-token phrase starting at `tokens[0]`.
    /// Returns the number of tokens consumed on a hit.
    fn resolve_phrase(
        &self,
        tokens: &[&str],
        language: SignLanguage,
        out: &mut Vec<String>,
    ) -> Option<usize> {
        let longest = self.lexicon.max_phrase_len().min(tokens.len());
        for len in (2..=longest).rev() {
            let phrase = tokens[..len].join(" ");

            if language.uses_isl() {
                if let Some(mapped) = self.lexicon.regional_mapping(&phrase) {
                    self.resolve_word(mapped, language, out);
                    return Some(len);
                }
            }

            let key = phrase.to_lowercase();
            if let Some(reference) = self
                .lexicon
                .dictionary_entry(language, &key)
                .and_then(|file| self.video(file))
            {
                out.push(reference);
                return Some(len);
            }
        }
        None
    }

    fn resolve_word(&self, word: &str, language: SignLanguage, out: &mut Vec<String>) {
        let key = word.to_lowercase();

        let whole_word = self
            .lexicon
            .common_sign(&key)
            .and_then(|file| self.video(file))
            .or_else(|| {
                self.lexicon
                    .dictionary_entry(language, &key)
                    .and_then(|file| self.video(file))
            })
            .or_else(|| self.video(&format!("{}.mp4", key)));

        match whole_word {
            Some(reference) => out.push(reference),
            None => self.fingerspell(word, language, out),
        }
    }

    fn fingerspell(&self, word: &str, language: SignLanguage, out: &mut Vec<String>) {
        let category = letter_category(language);
        let mut imaged = false;

        for c in word.chars() {
            let Some(symbol) = self.spelling_symbol(c, language) else {
                continue;
            };
            let file = letter_file(language, &symbol);
            if let Some(reference) = self.catalog.reference(category, &file) {
                out.push(reference);
                imaged = true;
            }
        }

        if imaged {
            let space_file = letter_file(language, "SPACE");
            if let Some(space) = self.catalog.reference(category, &space_file) {
                out.push(space);
            }
        }
    }

    /// Image name stem for one character, or `None` to skip it.
    fn spelling_symbol(&self, c: char, language: SignLanguage) -> Option<String> {
        if language.uses_isl() {
            let script = Script::of(c);
            if matches!(script, Script::Devanagari | Script::Telugu | Script::Gujarati) {
                return self
                    .lexicon
                    .transliterate(script, c)
                    .flatten()
                    .map(String::from);
            }
        }

        if c.is_ascii_digit() {
            Some(c.to_string())
        } else if c.is_alphabetic() {
            Some(c.to_uppercase().collect())
        } else {
            None
        }
    }

    fn video(&self, file: &str) -> Option<String> {
        self.catalog.reference(MediaCategory::Videos, file)
    }
}

fn letter_category(language: SignLanguage) -> MediaCategory {
    if language.uses_isl() {
        MediaCategory::IslLetters
    } else {
        MediaCategory::AslLetters
    }
}

fn letter_file(language: SignLanguage, symbol: &str) -> String {
    if language.uses_isl() {
        format!("{}.jpg", symbol)
    } else {
        format!("{}_test.jpg", symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MediaCatalog {
        let mut catalog = MediaCatalog::new();
        for video in [
            "hello.mp4",
            "yes.mp4",
            "no.mp4",
            "please.mp4",
            "sorry.mp4",
            "thank.mp4",
            "namaste.mp4",
            "rain.mp4",
            "heavy rain.mp4",
            "weather.mp4",
            "Monday.mp4",
            "not_understand.mp4",
        ] {
            catalog.insert(MediaCategory::Videos, video);
        }
        for symbol in ('A'..='Z').map(String::from).chain(('0'..='9').map(String::from)) {
            catalog.insert(MediaCategory::AslLetters, format!("{}_test.jpg", symbol));
            catalog.insert(MediaCategory::IslLetters, format!("{}.jpg", symbol));
        }
        catalog.insert(MediaCategory::AslLetters, "SPACE_test.jpg");
        catalog.insert(MediaCategory::IslLetters, "SPACE.jpg");
        catalog
    }

    fn resolver() -> SignResolver {
        SignResolver::new(
            Arc::new(Lexicon::builtin().unwrap()),
            Arc::new(catalog()),
            "not_understand.mp4",
        )
    }

    #[test]
    fn test_hello_resolves_to_video() {
        assert_eq!(
            resolver().resolve("hello", SignLanguage::Asl),
            vec!["mp4videos/hello.mp4"]
        );
    }

    #[test]
    fn test_unknown_word_is_fingerspelled() {
        assert_eq!(
            resolver().resolve("xyz123", SignLanguage::Asl),
            vec![
                "alphabetimages/X_test.jpg",
                "alphabetimages/Y_test.jpg",
                "alphabetimages/Z_test.jpg",
                "alphabetimages/1_test.jpg",
                "alphabetimages/2_test.jpg",
                "alphabetimages/3_test.jpg",
                "alphabetimages/SPACE_test.jpg",
            ]
        );
    }

    #[test]
    fn test_common_signs_one_reference_per_token() {
        let resolver = resolver();
        let tokens = ["yes", "No", "please", "hello", "sorry", "yes"];
        for language in SignLanguage::ALL {
            let paths = resolver.resolve_tokens(&tokens, language);
            let expected: Vec<String> = tokens
                .iter()
                .map(|t| format!("mp4videos/{}.mp4", t.to_lowercase()))
                .collect();
            assert_eq!(paths, expected, "language {}", language);
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = resolver();
        for (text, language) in [
            ("hello world", SignLanguage::Asl),
            ("नमस्ते दोस्त", SignLanguage::Hindi),
            ("వర్షం 42!", SignLanguage::Telugu),
        ] {
            assert_eq!(resolver.resolve(text, language), resolver.resolve(text, language));
        }
    }

    #[test]
    fn test_unimageable_word_yields_nothing() {
        let resolver = resolver();
        assert!(resolver.resolve("?!", SignLanguage::Asl).is_empty());
        assert_eq!(
            resolver.resolve_or_fallback("?!", SignLanguage::Asl),
            vec!["mp4videos/not_understand.mp4"]
        );
    }

    #[test]
    fn test_fallback_absent_clip_is_empty() {
        let resolver = SignResolver::new(
            Arc::new(Lexicon::builtin().unwrap()),
            Arc::new(MediaCatalog::new()),
            "not_understand.mp4",
        );
        assert!(resolver.resolve_or_fallback("hello", SignLanguage::Asl).is_empty());
    }

    #[test]
    fn test_regional_word_maps_to_isl_vocabulary() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve("नमस्ते", SignLanguage::Hindi),
            vec!["mp4videos/namaste.mp4"]
        );
        // Telugu greeting maps to the same canonical token
        assert_eq!(
            resolver.resolve("నమస్కారం", SignLanguage::Telugu),
            vec!["mp4videos/namaste.mp4"]
        );
        assert_eq!(
            resolver.resolve("dhanyavaad", SignLanguage::Isl),
            vec!["mp4videos/thank.mp4"]
        );
    }

    #[test]
    fn test_native_phrase_beats_single_words() {
        let resolver = resolver();
        assert_eq!(
            resolver.resolve("भारी बारिश", SignLanguage::Hindi),
            vec!["mp4videos/heavy rain.mp4"]
        );
        assert_eq!(
            resolver.resolve("heavy rain today", SignLanguage::Asl)[0],
            "mp4videos/heavy rain.mp4"
        );
    }

    #[test]
    fn test_direct_probe_keeps_disk_name() {
        assert_eq!(
            resolver().resolve("MONDAY", SignLanguage::Asl),
            vec!["mp4videos/Monday.mp4"]
        );
    }

    #[test]
    fn test_regional_word_is_transliterated() {
        // कमल: K + M + L, no video for it
        assert_eq!(
            resolver().resolve("कमल", SignLanguage::Hindi),
            vec![
                "indianalphabetsandnumbers/K.jpg",
                "indianalphabetsandnumbers/M.jpg",
                "indianalphabetsandnumbers/L.jpg",
                "indianalphabetsandnumbers/SPACE.jpg",
            ]
        );
    }

    #[test]
    fn test_virama_is_skipped() {
        // क्य: K, virama (skip), Y
        assert_eq!(
            resolver().resolve("क्य", SignLanguage::Isl),
            vec![
                "indianalphabetsandnumbers/K.jpg",
                "indianalphabetsandnumbers/Y.jpg",
                "indianalphabetsandnumbers/SPACE.jpg",
            ]
        );
    }

    #[test]
    fn test_missing_file_falls_through_to_spelling() {
        // "good" is a common sign but good.mp4 is not in the catalog
        let paths = resolver().resolve("good", SignLanguage::Asl);
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], "alphabetimages/G_test.jpg");
        assert_eq!(paths[4], "alphabetimages/SPACE_test.jpg");
    }

    #[test]
    fn test_unknown_tokens_spell_every_imageable_char() {
        let resolver = resolver();
        for word in ["qwv", "zz9", "b-r-b", "ok."] {
            let imageable = word.chars().filter(|c| c.is_ascii_alphanumeric()).count();
            let paths = resolver.resolve(word, SignLanguage::Asl);
            assert!(paths.len() >= imageable, "{} gave {:?}", word, paths);
        }
    }
}
