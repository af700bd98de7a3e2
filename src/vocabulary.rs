use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const EMBEDDED_VOCABULARY: &str = include_str!("resources/brain_regions.txt");

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary from '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("vocabulary contains no usable words")]
    Empty,
}

/// The fixed list of terms a round can be played with.
///
/// Words are lowercase ASCII, unique, and the list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    /// The brain-region list compiled into the binary.
    pub fn embedded() -> Result<Self, VocabularyError> {
        load_vocabulary_from_str(EMBEDDED_VOCABULARY)
    }

    pub fn from_words<I, S>(words: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words: Vec<String> = words
            .into_iter()
            .filter_map(|word| normalize_word(word.as_ref()))
            .filter(|word| seen.insert(word.clone()))
            .collect();

        if words.is_empty() {
            return Err(VocabularyError::Empty);
        }
        Ok(Self { words })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }
}

/// Lines are trimmed and lowercased; anything that is not purely a-z
/// (blank lines, `#` headings, hyphenated terms) is skipped.
fn normalize_word(line: &str) -> Option<String> {
    let word = line.trim().to_ascii_lowercase();
    if !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()) {
        Some(word)
    } else {
        None
    }
}

pub fn load_vocabulary_from_str(data: &str) -> Result<Vocabulary, VocabularyError> {
    Vocabulary::from_words(data.lines())
}

pub fn load_vocabulary_from_file<P: AsRef<Path>>(path: P) -> Result<Vocabulary, VocabularyError> {
    let path = path.as_ref();
    let io_error = |source| VocabularyError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line.map_err(io_error)?);
    }
    Vocabulary::from_words(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_vocabulary_loads() {
        let vocabulary = Vocabulary::embedded().unwrap();
        assert!(vocabulary.len() > 100);
        assert!(vocabulary.contains("pons"));
        assert!(vocabulary.contains("hippocampus"));
        assert!(
            vocabulary
                .words()
                .iter()
                .all(|w| w.chars().all(|c| c.is_ascii_lowercase()))
        );
    }

    #[test]
    fn test_embedded_vocabulary_skips_headings() {
        let vocabulary = Vocabulary::embedded().unwrap();
        assert!(!vocabulary.words().iter().any(|w| w.contains('#')));
        assert!(!vocabulary.contains("cerebral cortex"));
    }

    #[test]
    fn test_lines_are_trimmed_and_lowercased() {
        let vocabulary = load_vocabulary_from_str("  Pons  \nMEDULLA\n").unwrap();
        assert_eq!(vocabulary.words(), ["pons", "medulla"]);
    }

    #[test]
    fn test_non_letter_lines_are_skipped() {
        let vocabulary =
            load_vocabulary_from_str("pons\n\n# heading\narea 17\nbroca's\nfornix").unwrap();
        assert_eq!(vocabulary.words(), ["pons", "fornix"]);
    }

    #[test]
    fn test_duplicates_are_removed_in_order() {
        let vocabulary = load_vocabulary_from_str("olfactory\npons\nOlfactory\noptic").unwrap();
        assert_eq!(vocabulary.words(), ["olfactory", "pons", "optic"]);
    }

    #[test]
    fn test_empty_vocabulary_is_rejected() {
        assert!(matches!(
            load_vocabulary_from_str("# nothing here\n\n123"),
            Err(VocabularyError::Empty)
        ));
    }

    #[test]
    fn test_get_by_index() {
        let vocabulary = Vocabulary::from_words(["pons", "vermis"]).unwrap();
        assert_eq!(vocabulary.get(1), Some("vermis"));
        assert_eq!(vocabulary.get(2), None);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("hangbrain_vocabulary_unit_test.txt");
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "Thalamus").unwrap();
            writeln!(file, "putamen").unwrap();
        }

        let vocabulary = load_vocabulary_from_file(&path).unwrap();
        assert_eq!(vocabulary.words(), ["thalamus", "putamen"]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_reports_path() {
        let path = std::env::temp_dir().join("hangbrain_no_such_vocabulary.txt");
        let _ = std::fs::remove_file(&path);

        match load_vocabulary_from_file(&path) {
            Err(VocabularyError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
