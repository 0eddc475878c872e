use std::collections::{HashMap, HashSet};

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

const TOP_FREQUENT_WORDS: usize = 10;
/// Texts with more sentences than this get regrouped into paragraphs.
const PARAGRAPH_SENTENCE_THRESHOLD: usize = 5;
const SENTENCES_PER_PARAGRAPH: usize = 3;
/// A single sentence with more words than this counts as a run-on.
const RUN_ON_WORD_COUNT: usize = 50;
const SHORT_RESPONSE_WORDS: usize = 10;
/// A token is flagged as repetitive above this fraction of total words.
const REPETITION_FRACTION: f64 = 0.1;

/// Frequency analysis skips these.
const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "but", "by", "can", "could", "did", "do", "does", "for", "from", "had",
    "has", "have", "he", "her", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "just", "like", "me", "my", "no", "not", "of", "on", "or", "our", "out", "she", "so", "some",
    "than", "that", "the", "their", "them", "then", "there", "they", "this", "to", "up", "us",
    "was", "we", "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

#[derive(Debug, Clone, Serialize)]
pub struct TextMetrics {
    pub sentence_count: usize,
    pub word_count: usize,
    pub avg_words_per_sentence: f64,
}

/// A recognized span with character offsets into the analyzed text.
#[derive(Debug, Clone, Serialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinguisticAnalysis {
    pub metrics: TextMetrics,
    /// Top non-stopword tokens by frequency, case-folded.
    pub frequent_words: Vec<(String, usize)>,
    pub entities: Vec<EntitySpan>,
    pub quality_issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnhancedTranscript {
    pub original_text: String,
    pub enhanced_text: String,
    pub enhancement_warnings: Vec<String>,
    pub content_analysis: LinguisticAnalysis,
    pub quality_score: f64,
}

/// Computes sentence/word metrics, word frequencies, entity spans and
/// content-level quality issues for a transcript text.
pub fn analyze(text: &str) -> LinguisticAnalysis {
    let sentence_count = text
        .unicode_sentences()
        .filter(|s| !s.trim().is_empty())
        .count();
    let words: Vec<&str> = text.unicode_words().collect();
    let word_count = words.len();
    let avg_words_per_sentence = if sentence_count > 0 {
        word_count as f64 / sentence_count as f64
    } else {
        0.0
    };

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for word in &words {
        let folded = word.to_lowercase();
        if STOPWORDS.contains(&folded.as_str()) {
            continue;
        }
        *frequencies.entry(folded).or_insert(0) += 1;
    }
    let mut frequent_words: Vec<(String, usize)> = frequencies.into_iter().collect();
    frequent_words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequent_words.truncate(TOP_FREQUENT_WORDS);

    let entities = extract_entities(text);

    let mut quality_issues = Vec::new();
    if sentence_count == 0 {
        quality_issues.push("No complete sentences detected".to_string());
    } else if sentence_count == 1 && word_count > RUN_ON_WORD_COUNT {
        quality_issues.push("Long text without proper sentence breaks".to_string());
    }
    if word_count < SHORT_RESPONSE_WORDS {
        quality_issues.push("Very short response".to_string());
    }
    for (word, count) in &frequent_words {
        if *count as f64 > word_count as f64 * REPETITION_FRACTION {
            quality_issues.push(format!("Frequent repetition of word '{word}'"));
        }
    }

    LinguisticAnalysis {
        metrics: TextMetrics {
            sentence_count,
            word_count,
            avg_words_per_sentence,
        },
        frequent_words,
        entities,
        quality_issues,
    }
}

/// Normalizes a transcript text in one pass over a single mutable string:
/// sentence-initial capitalization first, then terminal punctuation, then
/// paragraph regrouping derived from the already-corrected text.
pub fn enhance(text: &str) -> (String, Vec<String>) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (text.to_string(), Vec::new());
    }

    let mut warnings = Vec::new();
    let mut enhanced = trimmed.to_string();

    // Byte offsets of lowercase sentence-initial letters. Applied in reverse
    // so earlier replacements don't shift later offsets.
    let mut fixes: Vec<(usize, char)> = Vec::new();
    for (offset, sentence) in enhanced.split_sentence_bound_indices() {
        if let Some((rel, ch)) = sentence.char_indices().find(|(_, c)| c.is_alphabetic())
            && ch.is_lowercase()
        {
            fixes.push((offset + rel, ch));
        }
    }
    for (offset, ch) in fixes.into_iter().rev() {
        let upper: String = ch.to_uppercase().collect();
        enhanced.replace_range(offset..offset + ch.len_utf8(), &upper);
    }

    if !matches!(enhanced.chars().next_back(), Some('.' | '!' | '?')) {
        enhanced.push('.');
        warnings.push("Added missing sentence-ending punctuation".to_string());
    }

    let sentences: Vec<String> = enhanced
        .split_sentence_bounds()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if sentences.len() > PARAGRAPH_SENTENCE_THRESHOLD {
        enhanced = sentences
            .chunks(SENTENCES_PER_PARAGRAPH)
            .map(|chunk| chunk.join(" "))
            .collect::<Vec<_>>()
            .join("\n\n");
    }

    (enhanced, warnings)
}

/// Linguistic quality score in [0, 1]: starts at 1.0 and subtracts
/// penalties for detected issues, brevity and poor sentence structure.
pub fn quality_score(analysis: &LinguisticAnalysis) -> f64 {
    let mut score = 1.0;
    let metrics = &analysis.metrics;

    score -= analysis.quality_issues.len() as f64 * 0.1;

    if metrics.word_count < 20 {
        score -= 0.2;
    } else if metrics.word_count < 50 {
        score -= 0.1;
    }

    if metrics.sentence_count == 0 {
        score -= 0.3;
    } else if metrics.avg_words_per_sentence > 40.0 {
        score -= 0.2;
    }

    score.clamp(0.0, 1.0)
}

/// Runs analysis, enhancement and scoring as one bundle.
pub fn analyze_and_enhance(text: &str) -> EnhancedTranscript {
    let content_analysis = analyze(text);
    let (enhanced_text, enhancement_warnings) = enhance(text);
    let quality_score = quality_score(&content_analysis);

    EnhancedTranscript {
        original_text: text.to_string(),
        enhanced_text,
        enhancement_warnings,
        content_analysis,
        quality_score,
    }
}

struct Token<'a> {
    text: &'a str,
    /// Character offsets into the source text.
    start: usize,
    end: usize,
}

const EDGE_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']'];

/// Rule-based entity recognition: emails, URLs, numbers, and capitalized
/// name runs outside sentence-initial position.
fn extract_entities(text: &str) -> Vec<EntitySpan> {
    let tokens = whitespace_tokens(text);
    let sentence_starts = sentence_start_chars(text);
    let mut entities = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        let (front, core) = strip_edges(token.text);
        if core.is_empty() {
            i += 1;
            continue;
        }
        let start = token.start + front;
        let end = start + core.chars().count();

        if is_email(core) {
            entities.push(span(core, "EMAIL", start, end));
        } else if is_url(core) {
            entities.push(span(core, "URL", start, end));
        } else if is_number(core) {
            entities.push(span(core, "NUMBER", start, end));
        } else if is_capitalized_word(core) && !sentence_starts.contains(&start) {
            // Extend over consecutive capitalized tokens ("Sarah Connor").
            let mut parts = vec![core];
            let mut last_end = end;
            while i + 1 < tokens.len() {
                let (next_front, next_core) = strip_edges(tokens[i + 1].text);
                if !is_capitalized_word(next_core)
                    || sentence_starts.contains(&(tokens[i + 1].start + next_front))
                {
                    break;
                }
                i += 1;
                last_end = tokens[i].start + next_front + next_core.chars().count();
                parts.push(next_core);
            }
            entities.push(span(&parts.join(" "), "NAME", start, last_end));
        }
        i += 1;
    }

    entities
}

fn span(text: &str, label: &str, start: usize, end: usize) -> EntitySpan {
    EntitySpan {
        text: text.to_string(),
        label: label.to_string(),
        start,
        end,
    }
}

fn whitespace_tokens(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut char_idx = 0usize;
    let mut start_char = 0usize;
    let mut start_byte = 0usize;
    let mut in_token = false;

    for (byte_idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_token {
                tokens.push(Token {
                    text: &text[start_byte..byte_idx],
                    start: start_char,
                    end: char_idx,
                });
                in_token = false;
            }
        } else if !in_token {
            in_token = true;
            start_byte = byte_idx;
            start_char = char_idx;
        }
        char_idx += 1;
    }
    if in_token {
        tokens.push(Token {
            text: &text[start_byte..],
            start: start_char,
            end: char_idx,
        });
    }
    tokens
}

/// Character offsets of the first non-whitespace character of each sentence.
fn sentence_start_chars(text: &str) -> HashSet<usize> {
    let mut starts = HashSet::new();
    for (byte_offset, sentence) in text.split_sentence_bound_indices() {
        if let Some((rel, _)) = sentence.char_indices().find(|(_, c)| !c.is_whitespace()) {
            starts.insert(text[..byte_offset + rel].chars().count());
        }
    }
    starts
}

/// Trims edge punctuation, returning the trimmed-prefix length in chars
/// and the remaining core.
fn strip_edges(token: &str) -> (usize, &str) {
    let after_front = token.trim_start_matches(EDGE_PUNCT);
    let front = token.chars().count() - after_front.chars().count();
    (front, after_front.trim_end_matches(EDGE_PUNCT))
}

fn is_email(token: &str) -> bool {
    let Some((local, domain)) = token.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn is_url(token: &str) -> bool {
    token.starts_with("http://") || token.starts_with("https://") || token.starts_with("www.")
}

fn is_number(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '%' | '$' | '-'))
}

fn is_capitalized_word(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && chars.clone().count() >= 1
        && token.chars().all(|c| c.is_alphabetic() || c == '-')
}
