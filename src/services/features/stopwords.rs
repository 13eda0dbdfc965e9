//! English stop words removed before TF-IDF weighting.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Common English words that carry no information about a movie
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    // articles and determiners
    "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
    "all", "both", "either", "neither", "no", "none", "other", "another", "such",
    // pronouns
    "i", "me", "my", "myself", "we", "us", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
    // questions
    "what", "which", "who", "whom", "whose", "why", "when", "where", "how",
    // prepositions
    "about", "above", "across", "after", "against", "along", "among", "around", "at",
    "before", "behind", "below", "beneath", "beside", "besides", "between", "beyond", "by",
    "down", "during", "for", "from", "in", "inside", "into", "near", "of", "off", "on",
    "onto", "out", "over", "per", "through", "throughout", "to", "toward", "towards",
    "under", "until", "up", "upon", "via", "with", "within", "without",
    // conjunctions
    "and", "as", "because", "but", "if", "nor", "or", "since", "so", "than", "though",
    "unless", "whereas", "whether", "while", "yet",
    // auxiliaries
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "would", "should", "could", "can", "may", "might", "must", "will",
    "shall",
    // adverbs
    "again", "also", "already", "always", "ever", "here", "there", "just", "more", "most",
    "much", "never", "not", "now", "only", "own", "same", "then", "too", "very",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Whether a lowercased token is an English stop word
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}
