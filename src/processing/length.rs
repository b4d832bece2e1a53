//! Summary length bounds derived from input size.

/// Lower bound on the requested summary length, independent of input size.
pub const MIN_LENGTH: usize = 30;
/// Smallest maximum length ever requested.
pub const MAX_LENGTH_FLOOR: usize = 50;
/// Largest maximum length ever requested.
pub const MAX_LENGTH_CEILING: usize = 130;

/// Length window handed to a summarization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    /// Upper bound on summary length.
    pub max_length: usize,
    /// Lower bound on summary length.
    pub min_length: usize,
}

impl LengthBounds {
    /// Bounds for an input of `word_count` words. Callers reject empty input first.
    pub fn for_word_count(word_count: usize) -> Self {
        debug_assert!(word_count > 0, "length policy invoked on empty input");
        Self {
            max_length: compute_max_length(word_count),
            min_length: MIN_LENGTH,
        }
    }

    /// Generation budget in model tokens; words run to more than one token on average.
    pub fn token_budget(self) -> usize {
        self.max_length * 2
    }
}

/// Half the input word count, clamped to `[MAX_LENGTH_FLOOR, MAX_LENGTH_CEILING]`.
pub fn compute_max_length(word_count: usize) -> usize {
    (word_count / 2).clamp(MAX_LENGTH_FLOOR, MAX_LENGTH_CEILING)
}

/// Number of whitespace-delimited tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_inputs_hit_the_floor() {
        assert_eq!(compute_max_length(1), 50);
        assert_eq!(compute_max_length(40), 50);
        assert_eq!(compute_max_length(101), 50);
    }

    #[test]
    fn midrange_is_half_the_words() {
        assert_eq!(compute_max_length(160), 80);
        assert_eq!(compute_max_length(161), 80);
    }

    #[test]
    fn long_inputs_hit_the_ceiling() {
        assert_eq!(compute_max_length(260), 130);
        assert_eq!(compute_max_length(300), 130);
        assert_eq!(compute_max_length(1_000_000), 130);
    }

    #[test]
    fn minimum_is_constant() {
        assert_eq!(LengthBounds::for_word_count(3).min_length, MIN_LENGTH);
        assert_eq!(LengthBounds::for_word_count(5_000).min_length, MIN_LENGTH);
    }

    #[test]
    fn words_are_whitespace_tokens() {
        assert_eq!(count_words("  one\ttwo\nthree   four "), 4);
        assert_eq!(count_words(" \n "), 0);
    }
}
