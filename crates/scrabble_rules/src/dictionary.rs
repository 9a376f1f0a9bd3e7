//! Word membership: the dictionary collaborator and an in-memory word list.

use std::collections::HashSet;
use std::io::BufRead;

use tracing::{info, instrument};

/// Membership test for played words.
///
/// Implementations must be case and diacritic insensitive; see
/// [`normalize_word`].
pub trait Dictionary: Send + Sync {
    /// Whether `word` is playable.
    fn exists(&self, word: &str) -> bool;
}

/// Uppercases, trims and strips French diacritics.
pub fn normalize_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    for c in word.trim().chars().flat_map(char::to_uppercase) {
        match c {
            'À' | 'Â' | 'Ä' | 'Á' | 'Ã' => out.push('A'),
            'Ç' => out.push('C'),
            'É' | 'È' | 'Ê' | 'Ë' => out.push('E'),
            'Î' | 'Ï' | 'Í' | 'Ì' => out.push('I'),
            'Ñ' => out.push('N'),
            'Ô' | 'Ö' | 'Ó' | 'Ò' | 'Õ' => out.push('O'),
            'Ù' | 'Û' | 'Ü' | 'Ú' => out.push('U'),
            'Ÿ' | 'Ý' => out.push('Y'),
            'Æ' => out.push_str("AE"),
            'Œ' => out.push_str("OE"),
            // Combining marks left over from decomposed input.
            '\u{0300}'..='\u{036F}' => {}
            other => out.push(other),
        }
    }
    out
}

/// A dictionary held in memory, one normalized entry per word.
#[derive(Debug, Clone, Default)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Builds a word list from any sequence of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| normalize_word(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Reads one word per line.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    #[instrument(skip(reader))]
    pub fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        let list = Self::from_words(lines);
        info!(words = list.len(), "Dictionary loaded");
        Ok(list)
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True if the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Dictionary for WordList {
    fn exists(&self, word: &str) -> bool {
        self.words.contains(&normalize_word(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize_word(" été "), "ETE");
        assert_eq!(normalize_word("cœur"), "COEUR");
        assert_eq!(normalize_word("Noël"), "NOEL");
        assert_eq!(normalize_word("e\u{0301}te\u{0301}"), "ETE");
    }

    #[test]
    fn test_lookup_is_case_and_accent_insensitive() {
        let dict = WordList::from_words(["Château", "chat"]);
        assert!(dict.exists("CHATEAU"));
        assert!(dict.exists("château"));
        assert!(dict.exists("CHAT"));
        assert!(!dict.exists("CHATS"));
    }

    #[test]
    fn test_from_reader_skips_blank_lines() {
        let dict = WordList::from_reader("chat\n\n  \nzoo\n".as_bytes()).expect("read");
        assert_eq!(dict.len(), 2);
        assert!(dict.exists("ZOO"));
    }
}
