//! Token matcher
//!
//! Decides which recognized tokens correspond to flagged ingredients using
//! loose bidirectional containment after normalization. OCR tokenization may
//! split a phrase like "high fructose corn syrup" into separate words, and
//! the classifier may return either single words or multi-word phrases, so
//! either side can be the shorter string.

use serde::{Deserialize, Serialize};

use crate::config::MatchingSettings;
use crate::ocr::RecognizedToken;

/// One ingredient string the classifier flagged as undesirable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedTerm {
    /// The substring the classifier claims appears in the label
    pub text: String,
}

impl FlaggedTerm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A token judged to correspond to a flagged term.
///
/// Only tokens that passed the confidence gate (or carried no confidence)
/// are ever wrapped in an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedAnnotation {
    /// The token the annotation derives from
    pub token: RecognizedToken,
    /// The term it matched against (first matching term wins)
    pub term: FlaggedTerm,
}

/// Normalize text for comparison: lower-case, ASCII alphanumerics only.
///
/// Digits are retained so numeric additive codes ("Red 40", E-numbers) stay
/// matchable; everything else (punctuation, whitespace, non-ASCII) is
/// stripped to absorb OCR noise like "Suga r".
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Match recognized tokens against flagged ingredient terms.
///
/// A token is a hit when its normalized length is strictly greater than
/// `min_token_length`, its confidence (when present) is at least
/// `min_confidence`, and it is in bidirectional containment with at least one
/// term. Output preserves input token order, and each token appears at most
/// once.
pub fn match_tokens(
    tokens: &[RecognizedToken],
    terms: &[FlaggedTerm],
    settings: &MatchingSettings,
) -> Vec<MatchedAnnotation> {
    if tokens.is_empty() || terms.is_empty() {
        return Vec::new();
    }

    let normalized_terms: Vec<(&FlaggedTerm, String)> = terms
        .iter()
        .map(|term| (term, normalize(&term.text)))
        .collect();

    tokens
        .iter()
        .filter_map(|token| {
            let normalized = normalize(&token.text);

            // Very short tokens (single letters from noisy OCR) are the
            // dominant source of false positives; the guard is on the token
            // side only, a short term may still match a long token.
            if normalized.len() <= settings.min_token_length {
                return None;
            }

            // Below the confidence line the text itself is unreliable and
            // highlighting it would mislead. Tokens without a reported
            // confidence pass.
            if let Some(confidence) = token.confidence {
                if confidence < settings.min_confidence {
                    return None;
                }
            }

            normalized_terms
                .iter()
                .find(|(_, normalized_term)| {
                    // An empty normalized term is a substring of everything;
                    // reject the vacuous containment outright.
                    !normalized_term.is_empty()
                        && (normalized_term.contains(&normalized)
                            || normalized.contains(normalized_term.as_str()))
                })
                .map(|(term, _)| MatchedAnnotation {
                    token: token.clone(),
                    term: (*term).clone(),
                })
        })
        .collect()
}
