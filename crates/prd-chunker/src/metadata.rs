//! Per-chunk metadata: requirement ids, priority, document type and
//! keywords. Everything is derived from the chunk text alone.

use crate::patterns;
use crate::types::{Chunk, ChunkMetadata, DocumentType, Priority};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Default number of keywords per chunk
pub const DEFAULT_KEYWORD_TOP_N: usize = 10;

static MOSCOW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(must|should|could|won['’]?t)\b").expect("valid MoSCoW regex")
});

static PRIORITY_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(HIGH|MEDIUM|LOW)\b").expect("valid priority regex"));

static PRIORITY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bpriority\s*[:=]\s*(high|medium|low)\b").expect("valid priority label regex")
});

static KEYWORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Alphabetic}\p{Nd}]+").expect("valid keyword regex"));

/// Category patterns in tie-break order
static DOCUMENT_TYPES: Lazy<Vec<(DocumentType, Regex)>> = Lazy::new(|| {
    [
        (
            DocumentType::NonFunctional,
            r"(?i)\bnon[- ]?functional\b|\bNFR\b|비기능",
        ),
        (
            DocumentType::Functional,
            r"(?i)\bfunctional\s+requirements?\b|\bfeatures?\b|기능\s*요구",
        ),
        (DocumentType::Constraint, r"(?i)\bconstraints?\b|제약"),
        (DocumentType::Glossary, r"(?i)\bglossary\b|\bterminology\b|용어"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("valid document type regex")))
    .collect()
});

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // English
        "a", "an", "the", "and", "or", "but", "if", "then", "else", "of", "in", "on", "at", "to",
        "for", "from", "by", "with", "as", "is", "are", "was", "were", "be", "been", "being", "it",
        "its", "this", "that", "these", "those", "not", "no", "can", "will", "shall", "may",
        "must", "should", "could", "would", "do", "does", "did", "has", "have", "had", "all",
        "any", "each", "such", "into", "than", "so", "we", "you", "they", "he", "she", "our",
        "your", "their", "which", "who", "when", "where", "what", "how", "also", "there", "via",
        // Korean
        "및", "또는", "등", "이", "그", "저", "것", "수", "더", "를", "을", "은", "는", "가",
        "의", "에", "에서", "으로", "로", "와", "과", "도", "한다", "합니다", "있다", "있습니다",
        "있어야", "해야", "위한", "대한", "통해", "경우", "모든", "각", "이상",
        "이하", "그리고", "하지만", "또한",
    ]
    .into_iter()
    .collect()
});

/// Requirement ids in first-seen order, deduplicated
#[must_use]
pub fn extract_requirement_ids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    patterns::requirement_ids(text)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Priority from the leftmost MoSCoW word, then from explicit labels
#[must_use]
pub fn detect_priority(text: &str) -> Priority {
    if let Some(m) = MOSCOW.captures(text).and_then(|c| c.get(1)) {
        return match m.as_str().to_ascii_lowercase().as_str() {
            "must" => Priority::High,
            "should" => Priority::Medium,
            _ => Priority::Low,
        };
    }

    let level = PRIORITY_LABEL
        .captures(text)
        .or_else(|| PRIORITY_LITERAL.captures(text))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase());
    match level.as_deref() {
        Some("high") => Priority::High,
        Some("medium") => Priority::Medium,
        Some("low") => Priority::Low,
        _ => Priority::Unspecified,
    }
}

/// Category whose keywords appear earliest in the text
#[must_use]
pub fn detect_document_type(text: &str) -> DocumentType {
    DOCUMENT_TYPES
        .iter()
        .enumerate()
        .filter_map(|(rank, (kind, re))| re.find(text).map(|m| (m.start(), rank, *kind)))
        .min_by_key(|&(start, rank, _)| (start, rank))
        .map_or(DocumentType::Unspecified, |(_, _, kind)| kind)
}

/// Most frequent non-stopword terms, ties broken by first occurrence
#[must_use]
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, token) in KEYWORD_TOKEN.find_iter(text).enumerate() {
        let word = token.as_str().to_lowercase();
        if word.chars().count() < 2
            || word.chars().all(|c| c.is_numeric())
            || STOPWORDS.contains(word.as_str())
        {
            continue;
        }
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().take(top_n).map(|(word, _, _)| word).collect()
}

/// Fills [`ChunkMetadata`] for chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataEnricher {
    pub keyword_top_n: usize,
}

impl Default for MetadataEnricher {
    fn default() -> Self {
        Self {
            keyword_top_n: DEFAULT_KEYWORD_TOP_N,
        }
    }
}

impl MetadataEnricher {
    #[must_use]
    pub const fn new(keyword_top_n: usize) -> Self {
        Self { keyword_top_n }
    }

    /// Metadata for a piece of text
    #[must_use]
    pub fn extract(&self, text: &str) -> ChunkMetadata {
        ChunkMetadata {
            requirement_ids: extract_requirement_ids(text),
            priority: detect_priority(text),
            document_type: detect_document_type(text),
            keywords: extract_keywords(text, self.keyword_top_n),
        }
    }

    pub fn enrich(&self, chunk: &mut Chunk) {
        chunk.metadata = self.extract(&chunk.text);
    }

    pub fn enrich_all(&self, chunks: &mut [Chunk]) {
        for chunk in chunks {
            self.enrich(chunk);
        }
    }
}
