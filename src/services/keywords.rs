use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{DocumentVector, HistoryEntry, Language, LanguagePreference};
use crate::services::language::detect_language;
use crate::services::profile::{
    build_user_profile, filter_by_emotion, language_preference, PROFILE_HISTORY_DEPTH,
};

/// Fewer filtered entries than this and the caller falls back to defaults
pub const MIN_HISTORY_FOR_KEYWORDS: usize = 5;

/// Final keyword list size
pub const KEYWORD_TARGET: usize = 6;

/// Profile terms feeding keyword selection
const TOP_TERM_LIMIT: usize = 10;

/// Minimum character length for a profile term to qualify as a keyword
const MIN_TERM_CHARS: usize = 3;

/// Preference ratio at which one language dominates the keyword mix
const PRIMARY_LANGUAGE_THRESHOLD: f64 = 0.5;

/// Per-emotion search keywords in the three supported languages
pub struct EmotionLexicon {
    pub ko: [&'static str; 5],
    pub en: [&'static str; 5],
    pub ja: [&'static str; 5],
}

static HAPPY: EmotionLexicon = EmotionLexicon {
    ko: ["행복한", "즐거운", "신나는", "밝은", "경쾌한"],
    en: ["happy", "cheerful", "upbeat", "energetic", "joyful"],
    ja: ["楽しい", "明るい", "ハッピー", "元気", "陽気"],
};

static CRYING: EmotionLexicon = EmotionLexicon {
    ko: ["슬픈", "눈물", "애절한", "감성적인", "우울한"],
    en: ["sad", "crying", "tearful", "emotional", "heartbreaking"],
    ja: ["泣ける", "悲しい", "涙", "感動的", "切ない"],
};

static ANGRY: EmotionLexicon = EmotionLexicon {
    ko: ["화난", "강렬한", "격렬한", "빠른", "파워풀"],
    en: ["angry", "intense", "aggressive", "powerful", "fierce"],
    ja: ["激しい", "怒り", "パワフル", "強烈", "アグレッシブ"],
};

static SLEEP: EmotionLexicon = EmotionLexicon {
    ko: ["수면", "자장가", "편안한", "잔잔한", "힐링"],
    en: ["sleep", "lullaby", "peaceful", "calm", "relaxing"],
    ja: ["睡眠", "子守唄", "静か", "リラックス", "癒し"],
};

static LOVE: EmotionLexicon = EmotionLexicon {
    ko: ["사랑", "로맨틱", "달콤한", "감성적인", "따뜻한"],
    en: ["love", "romantic", "sweet", "emotional", "tender"],
    ja: ["愛", "ロマンチック", "甘い", "ラブソング", "優しい"],
};

static EXCITED: EmotionLexicon = EmotionLexicon {
    ko: ["신나는", "흥겨운", "활기찬", "에너지", "업템포"],
    en: ["excited", "energetic", "lively", "dynamic", "upbeat"],
    ja: ["エキサイティング", "活気", "ダイナミック", "元気", "アップテンポ"],
};

impl EmotionLexicon {
    /// Lexicon for an emotion tag; unknown tags fall back to `happy`
    pub fn for_emotion(tag: &str) -> &'static EmotionLexicon {
        match tag {
            "crying" => &CRYING,
            "angry" => &ANGRY,
            "sleep" => &SLEEP,
            "love" => &LOVE,
            "excited" => &EXCITED,
            _ => &HAPPY,
        }
    }

    pub fn keywords(&self, language: Language) -> &[&'static str] {
        match language {
            Language::Ko => &self.ko,
            Language::En => &self.en,
            Language::Ja => &self.ja,
            Language::Unknown => &[],
        }
    }
}

/// Keywords plus the profile facts they were derived from
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordBundle {
    pub keywords: Vec<String>,
    pub language_preference: LanguagePreference,
    pub top_terms: Vec<String>,
}

/// Outcome of keyword synthesis
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordOutcome {
    /// Fewer than [`MIN_HISTORY_FOR_KEYWORDS`] entries after emotion filtering
    InsufficientHistory,
    /// History produced an empty profile; the preference map is still reported
    EmptyProfile(LanguagePreference),
    Generated(KeywordBundle),
}

/// Synthesizes personalized multilingual search keywords
///
/// Combines the emotion lexicon with the user's top profile terms, weighted
/// by the language distribution of their history. Keyword order is shuffled
/// for variety; callers must treat membership, not order, as the contract.
pub fn generate_keywords(
    emotion: &str,
    history: &[HistoryEntry],
    rng: &mut impl Rng,
) -> KeywordOutcome {
    let history = filter_by_emotion(history, emotion);

    if history.len() < MIN_HISTORY_FOR_KEYWORDS {
        return KeywordOutcome::InsufficientHistory;
    }

    let preferences = language_preference(&history);
    let profile = build_user_profile(&history, PROFILE_HISTORY_DEPTH);
    if profile.is_empty() {
        return KeywordOutcome::EmptyProfile(preferences);
    }

    let top_terms = top_terms(&profile, TOP_TERM_LIMIT);
    let lexicon = EmotionLexicon::for_emotion(emotion);

    let primary_language = Language::RANKED
        .iter()
        .copied()
        .find(|lang| preferences.get(lang).copied().unwrap_or(0.0) >= PRIMARY_LANGUAGE_THRESHOLD);

    let mut keywords = match primary_language {
        Some(language) => dominant_language_keywords(lexicon, language, &top_terms, rng),
        None => multilingual_keywords(lexicon, &preferences, &top_terms, rng),
    };

    // Deduplicate keeping first occurrence, then cap at the target size
    let mut seen = HashSet::new();
    keywords.retain(|keyword| seen.insert(keyword.clone()));
    keywords.truncate(KEYWORD_TARGET);

    // Backfill from the lexicon in ko, en, ja order until the target is met
    if keywords.len() < KEYWORD_TARGET {
        for language in Language::RANKED {
            for keyword in lexicon.keywords(language) {
                if keywords.len() >= KEYWORD_TARGET {
                    break;
                }
                if !keywords.iter().any(|k| k == keyword) {
                    keywords.push((*keyword).to_string());
                }
            }
        }
    }

    KeywordOutcome::Generated(KeywordBundle {
        keywords,
        language_preference: preferences,
        top_terms,
    })
}

/// Profile terms ranked by TF-IDF weight descending
///
/// Weight ties break on the term itself to keep the ranking deterministic.
pub fn top_terms(profile: &DocumentVector, limit: usize) -> Vec<String> {
    let mut terms: Vec<(&String, f64)> = profile.iter().map(|(term, &w)| (term, w)).collect();
    terms.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });
    terms.into_iter().take(limit).map(|(term, _)| term.clone()).collect()
}

/// Keyword mix for a user with one clearly dominant language
///
/// Four shuffled emotion keywords plus two of the user's own terms in that
/// language. When fewer than two terms qualify, the remainder of the shuffled
/// emotion pool fills in and the final backfill tops the list up.
fn dominant_language_keywords(
    lexicon: &EmotionLexicon,
    language: Language,
    top_terms: &[String],
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut emotion_pool: Vec<&str> = lexicon.keywords(language).to_vec();
    emotion_pool.shuffle(rng);

    let mut keywords: Vec<String> = emotion_pool.iter().take(4).map(|s| s.to_string()).collect();

    let mut user_pool: Vec<&String> = top_terms
        .iter()
        .filter(|term| qualifies(term, language))
        .collect();

    if user_pool.len() >= 2 {
        user_pool.shuffle(rng);
        keywords.extend(user_pool.into_iter().take(2).cloned());
    } else {
        keywords.extend(emotion_pool.iter().skip(4).take(2).map(|s| s.to_string()));
    }

    keywords
}

/// Keyword mix for a multilingual user
///
/// Each language gets a shuffled pool of its emotion keywords plus matching
/// profile terms, and a slot count proportional to its preference ratio with
/// a floor of one. Excess slots are shaved off the largest allocation until
/// exactly [`KEYWORD_TARGET`] remain.
fn multilingual_keywords(
    lexicon: &EmotionLexicon,
    preferences: &LanguagePreference,
    top_terms: &[String],
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut pools: HashMap<Language, Vec<String>> = HashMap::new();
    for language in Language::RANKED {
        let mut pool: Vec<String> = lexicon
            .keywords(language)
            .iter()
            .map(|s| s.to_string())
            .collect();
        pool.extend(
            top_terms
                .iter()
                .filter(|term| qualifies(term, language))
                .cloned(),
        );
        pool.shuffle(rng);
        pools.insert(language, pool);
    }

    let mut allocations: Vec<(Language, usize)> = Language::RANKED
        .iter()
        .map(|&language| {
            let ratio = preferences.get(&language).copied().unwrap_or(0.0);
            let slots = ((ratio * KEYWORD_TARGET as f64) as usize).max(1);
            (language, slots)
        })
        .collect();

    while allocations.iter().map(|(_, slots)| slots).sum::<usize>() > KEYWORD_TARGET {
        // First maximal allocation, in ko, en, ja order
        let mut largest = 0;
        for i in 1..allocations.len() {
            if allocations[i].1 > allocations[largest].1 {
                largest = i;
            }
        }
        allocations[largest].1 -= 1;
    }

    let mut keywords = Vec::new();
    for (language, slots) in allocations {
        keywords.extend(pools[&language].iter().take(slots).cloned());
    }
    keywords
}

fn qualifies(term: &str, language: Language) -> bool {
    detect_language(term) == language && term.chars().count() >= MIN_TERM_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(id: &str, title: &str, emotion: &str) -> HistoryEntry {
        serde_json::from_value(serde_json::json!({
            "videoId": id,
            "title": title,
            "playedAt": "2025-01-01T00:00:00Z",
            "emotion": emotion,
        }))
        .unwrap()
    }

    fn korean_history(count: usize) -> Vec<HistoryEntry> {
        (0..count)
            .map(|i| entry(&format!("h{i}"), "행복한 발라드 음악 모음집", "happy"))
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_short_history_is_insufficient() {
        let history = korean_history(3);
        assert_eq!(
            generate_keywords("happy", &history, &mut rng()),
            KeywordOutcome::InsufficientHistory
        );
    }

    #[test]
    fn test_emotion_filter_applies_before_count_check() {
        // Six entries, but only three match the requested emotion
        let mut history = korean_history(3);
        history.extend((0..3).map(|i| entry(&format!("s{i}"), "슬픈 노래", "crying")));
        assert_eq!(
            generate_keywords("happy", &history, &mut rng()),
            KeywordOutcome::InsufficientHistory
        );
    }

    #[test]
    fn test_unusable_text_reports_empty_profile_with_preferences() {
        let history: Vec<HistoryEntry> =
            (0..5).map(|i| entry(&format!("h{i}"), "!!!", "")).collect();
        match generate_keywords("", &history, &mut rng()) {
            KeywordOutcome::EmptyProfile(prefs) => {
                assert!((prefs[&Language::Unknown] - 1.0).abs() < 1e-9);
            }
            other => panic!("expected EmptyProfile, got {other:?}"),
        }
    }

    #[test]
    fn test_dominant_korean_keywords_stay_in_domain() {
        let history = korean_history(10);
        match generate_keywords("happy", &history, &mut rng()) {
            KeywordOutcome::Generated(bundle) => {
                assert!(bundle.keywords.len() <= KEYWORD_TARGET);
                assert!(!bundle.keywords.is_empty());

                let unique: HashSet<&String> = bundle.keywords.iter().collect();
                assert_eq!(unique.len(), bundle.keywords.len(), "keywords must be unique");

                // Every keyword comes from the lexicon or the user's own terms
                let lexicon = EmotionLexicon::for_emotion("happy");
                for keyword in &bundle.keywords {
                    let from_lexicon = Language::RANKED
                        .iter()
                        .any(|&l| lexicon.keywords(l).contains(&keyword.as_str()));
                    let from_profile = bundle.top_terms.contains(keyword);
                    assert!(from_lexicon || from_profile, "unexpected keyword {keyword}");
                }

                assert!((bundle.language_preference[&Language::Ko] - 1.0).abs() < 1e-9);
            }
            other => panic!("expected Generated, got {other:?}"),
        }
    }

    #[test]
    fn test_keyword_list_filled_to_target() {
        let history = korean_history(10);
        match generate_keywords("happy", &history, &mut rng()) {
            KeywordOutcome::Generated(bundle) => {
                // 15 distinct lexicon words guarantee the backfill reaches 6
                assert_eq!(bundle.keywords.len(), KEYWORD_TARGET);
            }
            other => panic!("expected Generated, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_emotion_falls_back_to_happy() {
        let history = korean_history(10);
        match generate_keywords("mysterious", &history, &mut rng()) {
            KeywordOutcome::Generated(bundle) => {
                let lexicon = EmotionLexicon::for_emotion("happy");
                let happy_words: HashSet<&str> = Language::RANKED
                    .iter()
                    .flat_map(|&l| lexicon.keywords(l).iter().copied())
                    .collect();
                let lexicon_hits = bundle
                    .keywords
                    .iter()
                    .filter(|k| happy_words.contains(k.as_str()))
                    .count();
                assert!(lexicon_hits >= 4);
            }
            other => panic!("expected Generated, got {other:?}"),
        }
    }

    #[test]
    fn test_multilingual_allocation_sums_to_target() {
        // A 40/40/20 split: no language reaches the 50% threshold, so the
        // multilingual path allocates slots proportionally.
        let mut history: Vec<HistoryEntry> = Vec::new();
        history.extend((0..4).map(|i| entry(&format!("k{i}"), "행복한 음악 모음", "")));
        history.extend((0..4).map(|i| entry(&format!("e{i}"), "happy upbeat playlist", "")));
        history.extend((0..2).map(|i| entry(&format!("j{i}"), "楽しい音楽メドレー", "")));

        match generate_keywords("", &history, &mut rng()) {
            KeywordOutcome::Generated(bundle) => {
                assert_eq!(bundle.keywords.len(), KEYWORD_TARGET);
                let unique: HashSet<&String> = bundle.keywords.iter().collect();
                assert_eq!(unique.len(), bundle.keywords.len());
            }
            other => panic!("expected Generated, got {other:?}"),
        }
    }

    #[test]
    fn test_top_terms_ranked_by_weight() {
        let profile = DocumentVector::from([
            ("low".to_string(), 0.1),
            ("high".to_string(), 0.9),
            ("mid".to_string(), 0.5),
        ]);
        assert_eq!(top_terms(&profile, 2), vec!["high", "mid"]);
    }

    #[test]
    fn test_top_terms_tie_break_is_deterministic() {
        let profile = DocumentVector::from([
            ("beta".to_string(), 0.5),
            ("alpha".to_string(), 0.5),
        ]);
        assert_eq!(top_terms(&profile, 2), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_identical_seed_identical_keywords() {
        let history = korean_history(10);
        let first = generate_keywords("happy", &history, &mut rng());
        let second = generate_keywords("happy", &history, &mut rng());
        assert_eq!(first, second);
    }
}
