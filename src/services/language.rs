use crate::models::Language;

/// Minimum share of classified characters for a language to win
const DOMINANCE_THRESHOLD: f64 = 0.3;

/// Detects the dominant language of a text span
///
/// Counts code points in three fixed ranges: Hangul syllables, Latin letters,
/// and the hiragana/katakana/CJK-ideograph ranges used by Japanese text. The
/// language with the highest count wins, but only when it accounts for at
/// least 30% of the classified characters; everything else is `unknown`.
/// Ties break in `ko, en, ja` order.
pub fn detect_language(text: &str) -> Language {
    let mut korean = 0usize;
    let mut english = 0usize;
    let mut japanese = 0usize;

    for c in text.chars() {
        match c {
            '가'..='힣' => korean += 1,
            'a'..='z' | 'A'..='Z' => english += 1,
            'ぁ'..='ん' | 'ァ'..='ヶ' | '一'..='龯' => japanese += 1,
            _ => {}
        }
    }

    let total = korean + english + japanese;
    if total == 0 {
        return Language::Unknown;
    }

    // First maximal language wins
    let mut best = (Language::Ko, korean);
    for candidate in [(Language::En, english), (Language::Ja, japanese)] {
        if candidate.1 > best.1 {
            best = candidate;
        }
    }

    if best.1 as f64 / total as f64 >= DOMINANCE_THRESHOLD {
        best.0
    } else {
        Language::Unknown
    }
}
