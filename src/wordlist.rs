use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;

static WORDS_DIR: Dir = include_dir!("src/words");

/// A single embedded word list tier.
#[derive(Deserialize, Clone, Debug)]
pub struct WordList {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl WordList {
    pub fn load(name: &str) -> Self {
        let file = WORDS_DIR
            .get_file(format!("{name}.json"))
            .expect("word list not found");

        let contents = file
            .contents_utf8()
            .expect("word list is not valid utf-8");

        from_str(contents).expect("unable to deserialize word list json")
    }
}

/// Difficulty tier controlling which word lists feed the vocabulary.
/// Tiers nest: easy ⊂ medium ⊂ hard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Next tier, wrapping. Used by the settings cycle on the results screen.
    pub fn cycled(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    fn tier_names(self) -> &'static [&'static str] {
        match self {
            Difficulty::Easy => &["easy"],
            Difficulty::Medium => &["easy", "medium"],
            Difficulty::Hard => &["easy", "medium", "hard"],
        }
    }

    /// The full vocabulary for this tier: the union of its own list and
    /// every easier list.
    pub fn vocabulary(self) -> Vec<String> {
        self.tier_names()
            .iter()
            .flat_map(|name| WordList::load(name).words)
            .collect()
    }

    pub fn stats(self) -> VocabularyStats {
        let vocab = self.vocabulary();
        let total_words = vocab.len();
        let total_len: usize = vocab.iter().map(|w| w.chars().count()).sum();
        let avg_length = if total_words > 0 {
            total_len as f64 / total_words as f64
        } else {
            0.0
        };

        let description = match self {
            Difficulty::Easy => "common words with 2-5 characters",
            Difficulty::Medium => "mix of common and intermediate words",
            Difficulty::Hard => "complex words with 8+ characters",
        };

        VocabularyStats {
            total_words,
            avg_length,
            description,
        }
    }
}

/// Summary of a difficulty tier's vocabulary, shown on the results screen.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyStats {
    pub total_words: usize,
    pub avg_length: f64,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_easy_list() {
        let list = WordList::load("easy");

        assert_eq!(list.name, "easy");
        assert!(!list.words.is_empty());
        assert_eq!(list.size as usize, list.words.len());
    }

    #[test]
    fn test_load_all_tiers() {
        for name in ["easy", "medium", "hard"] {
            let list = WordList::load(name);
            assert_eq!(list.name, name);
            assert!(!list.words.is_empty());
        }
    }

    #[test]
    #[should_panic(expected = "word list not found")]
    fn test_load_unknown_list_panics() {
        let _ = WordList::load("klingon");
    }

    #[test]
    fn test_word_list_deserialization() {
        let json_data = r#"
        {
            "name": "test",
            "size": 3,
            "words": ["hello", "world", "test"]
        }
        "#;

        let list: WordList = from_str(json_data).expect("failed to deserialize test list");

        assert_eq!(list.name, "test");
        assert_eq!(list.size, 3);
        assert_eq!(list.words.len(), 3);
    }

    #[test]
    fn test_vocabularies_nest() {
        let easy = Difficulty::Easy.vocabulary();
        let medium = Difficulty::Medium.vocabulary();
        let hard = Difficulty::Hard.vocabulary();

        assert!(easy.len() < medium.len());
        assert!(medium.len() < hard.len());

        // Every easy word is part of the larger tiers.
        for word in &easy {
            assert!(medium.contains(word));
            assert!(hard.contains(word));
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Difficulty::from_name("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name("MEDIUM"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::from_name("Hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("expert"), None);
    }

    #[test]
    fn test_cycled_wraps() {
        assert_eq!(Difficulty::Easy.cycled(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.cycled(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.cycled(), Difficulty::Easy);
    }

    #[test]
    fn test_display_lowercases_cleanly() {
        assert_eq!(Difficulty::Easy.to_string().to_lowercase(), "easy");
        assert_eq!(Difficulty::Hard.to_string().to_lowercase(), "hard");
    }

    #[test]
    fn test_stats() {
        let stats = Difficulty::Easy.stats();

        assert!(stats.total_words > 0);
        assert!(stats.avg_length > 0.0);
        assert!(!stats.description.is_empty());

        // Larger tiers pull in longer words, so the average grows.
        let hard_stats = Difficulty::Hard.stats();
        assert!(hard_stats.avg_length > stats.avg_length);
        assert!(hard_stats.total_words > stats.total_words);
    }
}
