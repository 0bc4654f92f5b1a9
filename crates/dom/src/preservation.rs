//! Word-overlap estimate of how much original ePI text survives a lens.
//!
//! A word counts as preserved when its lowercase form occurs anywhere in the
//! lowercased enhanced text. This is a substring test, not a token test, so
//! `dose` is "preserved" by `overdose`. Recorded fixtures depend on it.

use crate::text::extract_text_content;
use lens_fhir::{extract_html_from_epi, Resource};
use serde::Serialize;

/// Fraction of significant words that must survive by default
pub const DEFAULT_PRESERVATION_THRESHOLD: f64 = 0.95;

/// Words of this many characters or fewer are ignored
const INSIGNIFICANT_WORD_MAX_CHARS: usize = 3;

/// Outcome of comparing original and enhanced ePI text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreservationReport {
    /// Number of original words longer than three characters
    pub significant_words: usize,

    /// Significant words not found in the enhanced text, in original order
    pub missing_words: Vec<String>,

    /// Preserved / significant; 1.0 when there are no significant words
    pub ratio: f64,
}

impl PreservationReport {
    #[must_use]
    pub fn preserved_words(&self) -> usize {
        self.significant_words - self.missing_words.len()
    }

    /// Inclusive threshold check
    #[must_use]
    pub fn meets(&self, threshold: f64) -> bool {
        self.ratio >= threshold
    }
}

/// Plain text of every section of an ePI, fragments joined by one space
#[must_use]
pub fn epi_plain_text(epi: &Resource) -> String {
    extract_html_from_epi(epi)
        .iter()
        .map(|html| extract_text_content(html))
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn content_preservation(original: &Resource, enhanced: &Resource) -> PreservationReport {
    let original_text = epi_plain_text(original);
    let enhanced_lower = epi_plain_text(enhanced).to_lowercase();

    let significant: Vec<&str> = original_text
        .split_whitespace()
        .filter(|word| word.chars().count() > INSIGNIFICANT_WORD_MAX_CHARS)
        .collect();

    let missing_words: Vec<String> = significant
        .iter()
        .filter(|word| !enhanced_lower.contains(&word.to_lowercase()))
        .map(|word| (*word).to_string())
        .collect();

    let ratio = if significant.is_empty() {
        1.0
    } else {
        (significant.len() - missing_words.len()) as f64 / significant.len() as f64
    };

    if !missing_words.is_empty() {
        log::debug!(
            "Content match: {:.1}% ({}/{} words missing)",
            ratio * 100.0,
            missing_words.len(),
            significant.len()
        );
    }

    PreservationReport {
        significant_words: significant.len(),
        missing_words,
        ratio,
    }
}

/// True when at least `threshold` of the original's significant words are
/// still present in the enhanced ePI
#[must_use]
pub fn is_content_preserved(original: &Resource, enhanced: &Resource, threshold: f64) -> bool {
    content_preservation(original, enhanced).meets(threshold)
}
