/// English function words stripped before vectorization
const STOP_WORDS: [&str; 20] = [
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "in", "on", "at", "to",
    "for", "of", "with", "by", "from", "as",
];

/// Normalizes a text span into tokens
///
/// Lowercases ASCII, replaces every character that is not a lowercase Latin
/// letter, digit, whitespace, or Hangul syllable with a space, then splits on
/// whitespace. Stop words and single-character tokens are dropped. Order and
/// duplicates are preserved; term frequency depends on both.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            match c {
                'a'..='z' | '0'..='9' | '가'..='힣' => c,
                c if c.is_whitespace() => c,
                _ => ' ',
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() > 1 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits() {
        assert_eq!(tokenize("Happy Music"), vec!["happy", "music"]);
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(tokenize("chill-vibes (official)"), vec!["chill", "vibes", "official"]);
    }

    #[test]
    fn test_removes_stop_words() {
        assert_eq!(tokenize("the best of pop"), vec!["best", "pop"]);
    }

    #[test]
    fn test_drops_single_character_tokens() {
        assert_eq!(tokenize("k pop x mix"), vec!["pop", "mix"]);
    }

    #[test]
    fn test_keeps_hangul() {
        assert_eq!(tokenize("행복한 음악!"), vec!["행복한", "음악"]);
    }

    #[test]
    fn test_drops_japanese_characters() {
        // Only Latin, digits, and Hangul survive normalization
        assert_eq!(tokenize("楽しい music"), vec!["music"]);
    }

    #[test]
    fn test_preserves_duplicates_and_order() {
        assert_eq!(tokenize("pop rock pop"), vec!["pop", "rock", "pop"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
