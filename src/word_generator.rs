use crate::wordlist::Difficulty;
use rand::Rng;

/// Configuration for word generation
#[derive(Debug, Clone, Copy)]
pub struct WordGenConfig {
    pub number_of_words: usize,
    pub difficulty: Difficulty,
}

/// Supplies the ordered list of target words for a test.
pub struct WordGenerator {
    config: WordGenConfig,
}

impl WordGenerator {
    pub fn new(config: WordGenConfig) -> Self {
        Self { config }
    }

    /// Draw exactly `number_of_words` words, uniformly with replacement,
    /// from the difficulty tier's vocabulary.
    pub fn supply(&self) -> Vec<String> {
        let vocabulary = self.config.difficulty.vocabulary();
        if vocabulary.is_empty() {
            return Vec::new();
        }

        let mut rng = rand::thread_rng();
        (0..self.config.number_of_words)
            .map(|_| vocabulary[rng.gen_range(0..vocabulary.len())].clone())
            .collect()
    }
}
